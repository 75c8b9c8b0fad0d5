use folio_core_types::RequestId;
use thiserror::Error;

/// Result type alias using FolioError
pub type Result<T> = std::result::Result<T, FolioError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure in the system is classified into one of these kinds. Each
/// kind has a stable error code for API clients and tests, and an HTTP
/// status used by the API layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Validation
    InvalidInput,
    NotFound,
    AlreadyExists,

    // Auth
    Unauthorised,
    InvalidCredentials,
    Forbidden,

    // Storage / IO
    StoreUnavailable,
    Persistence,
    Serialization,
    Io,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::Unauthorised => "ERR_UNAUTHORISED",
            ExErrorKind::InvalidCredentials => "ERR_INVALID_CREDENTIALS",
            ExErrorKind::Forbidden => "ERR_FORBIDDEN",
            ExErrorKind::StoreUnavailable => "ERR_STORE_UNAVAILABLE",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP status code reported for this kind
    pub fn status_code(&self) -> u16 {
        match self {
            ExErrorKind::InvalidInput => 400,
            ExErrorKind::Unauthorised | ExErrorKind::InvalidCredentials => 401,
            ExErrorKind::Forbidden => 403,
            ExErrorKind::NotFound => 404,
            ExErrorKind::AlreadyExists => 409,
            ExErrorKind::StoreUnavailable
            | ExErrorKind::Persistence
            | ExErrorKind::Serialization
            | ExErrorKind::Io
            | ExErrorKind::Internal => 500,
        }
    }

    /// Whether the message of this kind may be shown to API clients verbatim
    pub fn is_client_facing(&self) -> bool {
        self.status_code() < 500
    }
}

/// Canonical structured error type
///
/// Carries a classification plus the context needed to correlate a failure
/// with the request, collection and record it happened on.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    collection: Option<String>,
    record_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            collection: None,
            record_id: None,
            request_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add collection context
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Add record id context
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn collection(&self) -> Option<&str> {
        self.collection.as_deref()
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message safe to return to an API client.
    ///
    /// Server-side failures are reported generically; the detailed message
    /// stays in the logs.
    pub fn public_message(&self) -> &str {
        if self.kind.is_client_facing() {
            &self.message
        } else if self.kind == ExErrorKind::StoreUnavailable {
            "Storage backend unavailable"
        } else {
            "Internal server error"
        }
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(collection) = &self.collection {
            write!(f, " (collection: {})", collection)?;
        }
        if let Some(record_id) = &self.record_id {
            write!(f, " (record_id: {})", record_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain error taxonomy for Folio operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FolioError {
    // ===== Validation =====
    /// One or more required fields are absent or blank
    #[error("Missing required fields for {collection}: {}", fields.join(", "))]
    MissingFields {
        collection: String,
        fields: Vec<String>,
    },

    /// A field is present but has the wrong shape
    #[error("Invalid field '{field}': {reason}")]
    InvalidField { field: String, reason: String },

    /// The request body is not a JSON object
    #[error("Invalid payload: {reason}")]
    InvalidPayload { reason: String },

    // ===== Lookup =====
    #[error("Record {id} not found in {collection}")]
    RecordNotFound { collection: String, id: String },

    #[error("Unknown collection: {name}")]
    UnknownCollection { name: String },

    #[error("Comment {comment_id} not found on blog post {blog_id}")]
    CommentNotFound { blog_id: String, comment_id: String },

    #[error("Email already registered: {email}")]
    EmailTaken { email: String },

    // ===== Auth =====
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("Forbidden: {required_role} role required")]
    Forbidden { required_role: String },

    // ===== Storage =====
    /// Backing store could not be reached or rejected the request
    #[error("Store unavailable ({backend}): {message}")]
    StoreUnavailable { backend: String, message: String },

    #[error("Persistence error: {message}")]
    Persistence { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("IO error during {op}: {message}")]
    Io { op: String, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl FolioError {
    /// Classify this error into the canonical taxonomy
    pub fn kind(&self) -> ExErrorKind {
        match self {
            FolioError::MissingFields { .. }
            | FolioError::InvalidField { .. }
            | FolioError::InvalidPayload { .. } => ExErrorKind::InvalidInput,
            FolioError::RecordNotFound { .. }
            | FolioError::UnknownCollection { .. }
            | FolioError::CommentNotFound { .. } => ExErrorKind::NotFound,
            FolioError::EmailTaken { .. } => ExErrorKind::AlreadyExists,
            FolioError::InvalidCredentials => ExErrorKind::InvalidCredentials,
            FolioError::Unauthorized { .. } => ExErrorKind::Unauthorised,
            FolioError::Forbidden { .. } => ExErrorKind::Forbidden,
            FolioError::StoreUnavailable { .. } => ExErrorKind::StoreUnavailable,
            FolioError::Persistence { .. } => ExErrorKind::Persistence,
            FolioError::Serialization { .. } => ExErrorKind::Serialization,
            FolioError::Io { .. } => ExErrorKind::Io,
            FolioError::Internal { .. } => ExErrorKind::Internal,
        }
    }

    /// Shorthand for a not-found error on a collection record
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        FolioError::RecordNotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    pub fn unauthorized(reason: impl Into<String>) -> Self {
        FolioError::Unauthorized {
            reason: reason.into(),
        }
    }
}

impl From<FolioError> for ExError {
    fn from(err: FolioError) -> Self {
        let kind = err.kind();
        let message = err.to_string();
        match err {
            FolioError::MissingFields { collection, .. } => ExError::new(kind)
                .with_op("validate")
                .with_collection(collection)
                .with_message(message),

            FolioError::RecordNotFound { collection, id } => ExError::new(kind)
                .with_collection(collection)
                .with_record_id(id)
                .with_message(message),

            FolioError::CommentNotFound { blog_id, .. } => ExError::new(kind)
                .with_collection("blogs")
                .with_record_id(blog_id)
                .with_message(message),

            FolioError::StoreUnavailable { .. } => {
                ExError::new(kind).with_op("store").with_message(message)
            }

            FolioError::Io { op, .. } => ExError::new(kind).with_op(op).with_message(message),

            _ => ExError::new(kind).with_message(message),
        }
    }
}

impl From<serde_json::Error> for FolioError {
    fn from(err: serde_json::Error) -> Self {
        FolioError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_follow_taxonomy() {
        let cases = [
            (ExErrorKind::InvalidInput, 400),
            (ExErrorKind::NotFound, 404),
            (ExErrorKind::AlreadyExists, 409),
            (ExErrorKind::Unauthorised, 401),
            (ExErrorKind::InvalidCredentials, 401),
            (ExErrorKind::Forbidden, 403),
            (ExErrorKind::StoreUnavailable, 500),
            (ExErrorKind::Internal, 500),
        ];
        for (kind, status) in cases {
            assert_eq!(kind.status_code(), status, "Wrong status for {:?}", kind);
        }
    }

    #[test]
    fn test_display_includes_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("remove")
            .with_collection("projects")
            .with_record_id("7")
            .with_message("gone");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_NOT_FOUND]"));
        assert!(text.contains("'remove'"));
        assert!(text.contains("collection: projects"));
        assert!(text.contains("record_id: 7"));
    }

    #[test]
    fn test_public_message_hides_internal_detail() {
        let err: ExError = FolioError::Persistence {
            message: "disk I/O error at /var/lib/folio.db".to_string(),
        }
        .into();
        assert_eq!(err.public_message(), "Internal server error");
        assert!(err.message().contains("/var/lib"));
    }
}

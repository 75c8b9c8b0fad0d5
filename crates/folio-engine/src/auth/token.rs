//! HS256 session tokens
//!
//! Compact JWS form `header.claims.signature`, each segment URL-safe
//! base64 without padding. Only HS256 is issued or accepted.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use chrono::Utc;
use folio_core::errors::FolioError;
use folio_core::model::Role;
use folio_core_types::Sensitive;
use folio_store::Result;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const HEADER: &str = r#"{"alg":"HS256","typ":"JWT"}"#;

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub email: String,
    pub role: Role,
    /// Issued at, seconds since the epoch
    pub iat: i64,
    /// Expiry, seconds since the epoch
    pub exp: i64,
}

#[derive(Deserialize)]
struct Header {
    alg: String,
}

/// Issues and verifies tokens with one shared secret
#[derive(Debug, Clone)]
pub struct TokenSigner {
    secret: Sensitive<Vec<u8>>,
    ttl_secs: i64,
}

impl TokenSigner {
    pub fn new(secret: &Sensitive<String>, ttl_hours: u32) -> Self {
        Self {
            secret: Sensitive::new(secret.expose().as_bytes().to_vec()),
            ttl_secs: i64::from(ttl_hours) * 3600,
        }
    }

    fn mac(&self) -> Result<HmacSha256> {
        HmacSha256::new_from_slice(self.secret.expose()).map_err(|e| FolioError::Internal {
            message: format!("token key rejected: {}", e),
        })
    }

    /// Issue a token valid from now for the configured lifetime
    ///
    /// # Errors
    ///
    /// `Internal` if the claims cannot be encoded.
    pub fn issue(&self, user_id: &str, email: &str, role: Role) -> Result<String> {
        self.issue_at(user_id, email, role, Utc::now().timestamp())
    }

    /// Issue a token as of `now` (seconds since the epoch)
    ///
    /// # Errors
    ///
    /// `Internal` if the claims cannot be encoded.
    pub fn issue_at(&self, user_id: &str, email: &str, role: Role, now: i64) -> Result<String> {
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.ttl_secs,
        };
        let payload = serde_json::to_vec(&claims)?;
        let signing_input = format!(
            "{}.{}",
            URL_SAFE_NO_PAD.encode(HEADER),
            URL_SAFE_NO_PAD.encode(payload)
        );

        let mut mac = self.mac()?;
        mac.update(signing_input.as_bytes());
        let signature = URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes());

        Ok(format!("{}.{}", signing_input, signature))
    }

    /// Verify signature and expiry, returning the claims
    ///
    /// # Errors
    ///
    /// `Unauthorized` for malformed, forged, or expired tokens.
    pub fn verify(&self, token: &str) -> Result<Claims> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Verify as of `now` (seconds since the epoch)
    ///
    /// # Errors
    ///
    /// `Unauthorized` for malformed, forged, or expired tokens.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims> {
        let mut parts = token.split('.');
        let (header, payload, signature) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(h), Some(p), Some(s), None) => (h, p, s),
            _ => return Err(FolioError::unauthorized("malformed token")),
        };

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| FolioError::unauthorized("malformed token"))?;
        let mut mac = self.mac()?;
        mac.update(header.as_bytes());
        mac.update(b".");
        mac.update(payload.as_bytes());
        // constant-time comparison
        mac.verify_slice(&signature)
            .map_err(|_| FolioError::unauthorized("invalid token signature"))?;

        let header: Header = decode_segment(header)?;
        if header.alg != "HS256" {
            return Err(FolioError::unauthorized("unsupported token algorithm"));
        }

        let claims: Claims = decode_segment(payload)?;
        if claims.exp <= now {
            return Err(FolioError::unauthorized("token expired"));
        }
        Ok(claims)
    }
}

fn decode_segment<T: for<'de> Deserialize<'de>>(segment: &str) -> Result<T> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|_| FolioError::unauthorized("malformed token"))?;
    serde_json::from_slice(&bytes).map_err(|_| FolioError::unauthorized("malformed token"))
}

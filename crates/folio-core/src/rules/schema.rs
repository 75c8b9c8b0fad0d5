use serde_json::{Map, Value};

use crate::errors::{FolioError, Result};
use crate::model::{CollectionName, Record};

/// Field schema for one resource type
///
/// Only fields listed here are persisted from client payloads; `id` and
/// server-managed fields (timestamps, comments, likes, password hashes) are
/// never taken from the client.
#[derive(Debug)]
pub struct ResourceSchema {
    pub collection: CollectionName,
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

static EXPERIENCES: ResourceSchema = ResourceSchema {
    collection: CollectionName::Experiences,
    required: &["title", "company", "start_date"],
    optional: &["end_date", "description"],
};

static EDUCATION: ResourceSchema = ResourceSchema {
    collection: CollectionName::Education,
    required: &["school", "degree"],
    optional: &["field", "start_date", "end_date", "description"],
};

static PROJECTS: ResourceSchema = ResourceSchema {
    collection: CollectionName::Projects,
    required: &["title", "description"],
    optional: &["image_url", "project_url"],
};

static BLOGS: ResourceSchema = ResourceSchema {
    collection: CollectionName::Blogs,
    required: &["title", "content", "summary"],
    optional: &[],
};

static USERS: ResourceSchema = ResourceSchema {
    collection: CollectionName::Users,
    required: &["email", "password"],
    optional: &["name"],
};

pub fn schema_for(collection: CollectionName) -> &'static ResourceSchema {
    match collection {
        CollectionName::Experiences => &EXPERIENCES,
        CollectionName::Education => &EDUCATION,
        CollectionName::Projects => &PROJECTS,
        CollectionName::Blogs => &BLOGS,
        CollectionName::Users => &USERS,
    }
}

impl ResourceSchema {
    /// Check required fields are present non-blank strings and optional
    /// fields, when present, are strings or null.
    ///
    /// # Errors
    ///
    /// `MissingFields` listing every absent required field, or
    /// `InvalidField` for the first field with the wrong type.
    pub fn validate(&self, payload: &Map<String, Value>) -> Result<()> {
        require_fields(self.collection.as_str(), payload, self.required)?;

        for field in self.optional {
            match payload.get(*field) {
                None | Some(Value::Null) | Some(Value::String(_)) => {}
                Some(_) => {
                    return Err(FolioError::InvalidField {
                        field: (*field).to_string(),
                        reason: "expected a string".to_string(),
                    })
                }
            }
        }
        Ok(())
    }

    /// Project a payload onto the schema's fields
    ///
    /// Required values are trimmed; unknown keys are dropped.
    pub fn sanitize(&self, payload: &Map<String, Value>) -> Record {
        let mut record = Record::new();
        for field in self.required {
            if let Some(Value::String(s)) = payload.get(*field) {
                record.insert(*field, s.trim());
            }
        }
        for field in self.optional {
            if let Some(value) = payload.get(*field) {
                record.insert(*field, value.clone());
            }
        }
        record
    }

    /// Validate then sanitize in one step
    ///
    /// # Errors
    ///
    /// See [`ResourceSchema::validate`].
    pub fn accept(&self, payload: &Map<String, Value>) -> Result<Record> {
        self.validate(payload)?;
        Ok(self.sanitize(payload))
    }
}

/// Check that every field in `fields` is a non-blank string in `payload`
///
/// # Errors
///
/// `MissingFields` naming all absent or blank fields, or `InvalidField`
/// when a field holds a non-string value.
pub fn require_fields(label: &str, payload: &Map<String, Value>, fields: &[&str]) -> Result<()> {
    let mut missing = Vec::new();
    for field in fields {
        match payload.get(*field) {
            None | Some(Value::Null) => missing.push((*field).to_string()),
            Some(Value::String(s)) if s.trim().is_empty() => missing.push((*field).to_string()),
            Some(Value::String(_)) => {}
            Some(_) => {
                return Err(FolioError::InvalidField {
                    field: (*field).to_string(),
                    reason: "expected a string".to_string(),
                })
            }
        }
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(FolioError::MissingFields {
            collection: label.to_string(),
            fields: missing,
        })
    }
}

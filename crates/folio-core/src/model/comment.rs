use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A reader comment embedded in a blog post's `comments` array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub name: String,
    pub comment: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(id: String, name: String, comment: String) -> Self {
        Self {
            id,
            name,
            comment,
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_are_camel_case() {
        let c = Comment::new("1".into(), "Ada".into(), "Nice".into());
        let v = serde_json::to_value(&c).unwrap();
        assert!(v.get("createdAt").is_some());
        assert!(v.get("updatedAt").is_none());
    }
}

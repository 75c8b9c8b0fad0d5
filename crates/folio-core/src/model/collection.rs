use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::FolioError;

/// Identifier generation policy for a collection
///
/// Each collection uses exactly one policy for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPolicy {
    /// Integer id: highest numeric id present plus one, 1 for an empty collection
    MaxPlusOne,
    /// Digit-string id from the current time in milliseconds, bumped past
    /// any existing numeric id so it stays unique and monotonic
    Timestamp,
}

/// Named collections managed by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionName {
    Experiences,
    Education,
    Projects,
    Blogs,
    Users,
}

impl CollectionName {
    pub const ALL: [CollectionName; 5] = [
        CollectionName::Experiences,
        CollectionName::Education,
        CollectionName::Projects,
        CollectionName::Blogs,
        CollectionName::Users,
    ];

    /// Key under which the collection is persisted
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionName::Experiences => "experiences",
            CollectionName::Education => "education",
            CollectionName::Projects => "projects",
            CollectionName::Blogs => "blogs",
            CollectionName::Users => "users",
        }
    }

    pub fn id_policy(&self) -> IdPolicy {
        match self {
            CollectionName::Blogs => IdPolicy::Timestamp,
            CollectionName::Experiences
            | CollectionName::Education
            | CollectionName::Projects
            | CollectionName::Users => IdPolicy::MaxPlusOne,
        }
    }
}

impl std::fmt::Display for CollectionName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionName::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| FolioError::UnknownCollection {
                name: s.to_string(),
            })
    }
}

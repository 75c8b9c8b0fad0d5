pub mod collection;
pub mod comment;
pub mod record;
pub mod role;

pub use collection::{CollectionName, IdPolicy};
pub use comment::Comment;
pub use record::{Record, RecordId};
pub use role::Role;

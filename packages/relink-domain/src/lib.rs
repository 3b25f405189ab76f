pub mod candidate;
pub mod query;
pub mod record;

mod error;

pub use candidate::{SearchCandidate, SearchRequest};
pub use error::{Error, Result};
pub use query::{FieldValues, SearchField, SearchQuery};
pub use record::{Description, RecordId, RecordReference};

/// Values are kept verbatim; only empty or whitespace-only values are dropped.
pub fn non_blank(value: &str) -> Option<&str> {
	if value.trim().is_empty() { None } else { Some(value) }
}

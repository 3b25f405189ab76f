pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
	#[error("Invalid record identifier {id:?}: {reason}")]
	InvalidRecordId { id: String, reason: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Search index error: {message}")]
	Search { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	/// Record-level wrapper for any failure while redirecting one record.
	#[error("Could not publish the redirection changes for record {record_id}.")]
	Redirection {
		record_id: String,
		#[source]
		source: Box<Error>,
	},
}
impl Error {
	pub(crate) fn redirection(record_id: impl Into<String>, source: Self) -> Self {
		Self::Redirection { record_id: record_id.into(), source: Box::new(source) }
	}
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<relink_storage::Error> for Error {
	fn from(err: relink_storage::Error) -> Self {
		match err {
			relink_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			relink_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
		}
	}
}

impl From<relink_search::Error> for Error {
	fn from(err: relink_search::Error) -> Self {
		match err {
			relink_search::Error::InvalidConfig { message } => Self::InvalidRequest { message },
			other => Self::Search { message: other.to_string() },
		}
	}
}

impl From<relink_domain::Error> for Error {
	fn from(err: relink_domain::Error) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}

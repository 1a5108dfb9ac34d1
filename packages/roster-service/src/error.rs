pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
	#[error("{operation} timed out after {timeout_ms} ms.")]
	Timeout { operation: &'static str, timeout_ms: u64 },
}
impl From<roster_providers::Error> for Error {
	fn from(err: roster_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}

impl From<roster_storage::Error> for Error {
	fn from(err: roster_storage::Error) -> Self {
		match err {
			roster_storage::Error::InvalidArgument(message) => Self::InvalidRequest { message },
			other => Self::Storage { message: other.to_string() },
		}
	}
}

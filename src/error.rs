use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
	#[error("A wedding page with id `{0}` already exists")]
	DuplicateId(String),

	#[error("An account with email `{0}` already exists")]
	DuplicateOwner(String),

	#[error("Wedding page `{0}` not found")]
	NotFound(String),

	#[error("Photo `{0}` not found")]
	PhotoNotFound(String),

	#[error("Storage failure: {0}")]
	StorageFailure(String),
}

impl From<std::io::Error> for StoreError {
	fn from(err: std::io::Error) -> Self {
		StoreError::StorageFailure(err.to_string())
	}
}

impl From<serde_json::Error> for StoreError {
	fn from(err: serde_json::Error) -> Self {
		StoreError::StorageFailure(format!("malformed document: {}", err))
	}
}

impl From<sqlx::Error> for StoreError {
	fn from(err: sqlx::Error) -> Self {
		StoreError::StorageFailure(err.to_string())
	}
}

#[derive(Error, Debug)]
pub enum ExportError {
	#[error(transparent)]
	Store(#[from] StoreError),

	#[error("Nothing to export for page `{0}`")]
	NothingToExport(String),

	#[error("Failed to fetch photo: {0}")]
	Fetch(#[from] reqwest::Error),

	#[error("Failed to decode photo payload: {0}")]
	Decode(#[from] base64::DecodeError),

	#[error("Malformed data url")]
	MalformedDataUrl,

	#[error("Failed to write photo: {0}")]
	Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("Unknown store backend `{0}` (expected memory, file or postgres)")]
	UnknownBackend(String),

	#[error("{0} not set")]
	Missing(&'static str),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn io_errors_become_storage_failures() {
		let err: StoreError = std::io::Error::new(std::io::ErrorKind::Other, "disk gone").into();
		assert!(matches!(err, StoreError::StorageFailure(ref msg) if msg.contains("disk gone")));
	}

	#[test]
	fn store_errors_pass_through_export_errors() {
		let err: ExportError = StoreError::NotFound("alice-bob".to_string()).into();
		assert_eq!(err.to_string(), "Wedding page `alice-bob` not found");
	}
}

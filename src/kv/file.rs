use log::warn;
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::StoreError;

/// All keys of one store live in a single JSON object on disk.
///
/// Every write rewrites the whole file through a temp file and a rename, so a
/// crash leaves either the old or the new contents.
pub struct FileBackend {
	path: PathBuf,
	lock: Mutex<()>,
}

impl FileBackend {
	pub async fn open(data_dir: &Path, store_name: &str) -> Result<Self, StoreError> {
		fs::create_dir_all(data_dir).await?;

		Ok(Self {
			path: data_dir.join(format!("{}.json", store_name)),
			lock: Mutex::new(()),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}

	async fn read_entries(&self) -> Result<Map<String, Value>, StoreError> {
		let bytes = match fs::read(&self.path).await {
			Ok(bytes) => bytes,
			Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
			Err(err) => return Err(err.into()),
		};

		match serde_json::from_slice::<Value>(&bytes)? {
			Value::Object(entries) => Ok(entries),
			other => {
				warn!(
					"{} does not hold a JSON object (found {}), refusing to use it",
					self.path.display(),
					other
				);
				Err(StoreError::StorageFailure(format!(
					"{} is not a key-value document",
					self.path.display()
				)))
			}
		}
	}

	async fn write_entries(&self, entries: Map<String, Value>) -> Result<(), StoreError> {
		let file_name = self
			.path
			.file_name()
			.map(|n| n.to_string_lossy().into_owned())
			.unwrap_or_default();
		let tmp = self
			.path
			.with_file_name(format!("{}.{}.tmp", file_name, Uuid::new_v4()));

		fs::write(&tmp, serde_json::to_vec(&Value::Object(entries))?).await?;
		if let Err(err) = fs::rename(&tmp, &self.path).await {
			let _ = fs::remove_file(&tmp).await;
			return Err(err.into());
		}

		Ok(())
	}

	pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
		let _guard = self.lock.lock().await;
		Ok(self.read_entries().await?.remove(key))
	}

	pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
		let _guard = self.lock.lock().await;
		let mut entries = self.read_entries().await?;
		entries.insert(key.to_string(), value);
		self.write_entries(entries).await
	}

	pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
		let _guard = self.lock.lock().await;
		let mut entries = self.read_entries().await?;
		if entries.remove(key).is_some() {
			self.write_entries(entries).await?;
		}
		Ok(())
	}
}

//! Asynchronous key-value persistence.
//!
//! A [`KvStore`] wraps exactly one logical store. The backend is opened on first
//! use and the handle is kept for the lifetime of the store; callers racing on the
//! first access all wait on the same pending open.

pub mod file;
pub mod memory;
pub mod postgres;

use log::{debug, info};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard, OnceCell};

use crate::error::StoreError;

pub use self::file::FileBackend;
pub use self::memory::MemoryBackend;
pub use self::postgres::PgBackend;

pub const DEFAULT_STORE_NAME: &str = "PicDropDB";

#[derive(Debug, Clone)]
pub enum StoreKind {
	Memory,
	File { data_dir: PathBuf },
	Postgres { database_url: String },
}

impl StoreKind {
	/// Short name for logs; never includes connection credentials.
	pub fn label(&self) -> &'static str {
		match self {
			StoreKind::Memory => "memory",
			StoreKind::File { .. } => "file",
			StoreKind::Postgres { .. } => "postgres",
		}
	}
}

#[derive(Debug, Clone)]
pub struct StoreOptions {
	pub name: String,
	pub kind: StoreKind,
}

impl StoreOptions {
	pub fn memory() -> Self {
		Self {
			name: DEFAULT_STORE_NAME.to_string(),
			kind: StoreKind::Memory,
		}
	}
}

enum Backend {
	Memory(MemoryBackend),
	File(FileBackend),
	Postgres(PgBackend),
}

impl Backend {
	async fn open(options: &StoreOptions) -> Result<Self, StoreError> {
		let backend = match &options.kind {
			StoreKind::Memory => Backend::Memory(MemoryBackend::default()),
			StoreKind::File { data_dir } => {
				Backend::File(FileBackend::open(data_dir, &options.name).await?)
			}
			StoreKind::Postgres { database_url } => {
				Backend::Postgres(PgBackend::open(database_url, &options.name).await?)
			}
		};

		info!("Opened key-value store `{}` ({})", options.name, options.kind.label());
		Ok(backend)
	}

	async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
		match self {
			Backend::Memory(b) => Ok(b.get(key).await),
			Backend::File(b) => b.get(key).await,
			Backend::Postgres(b) => b.get(key).await,
		}
	}

	async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
		match self {
			Backend::Memory(b) => {
				b.set(key, value).await;
				Ok(())
			}
			Backend::File(b) => b.set(key, value).await,
			Backend::Postgres(b) => b.set(key, value).await,
		}
	}

	async fn remove(&self, key: &str) -> Result<(), StoreError> {
		match self {
			Backend::Memory(b) => {
				b.remove(key).await;
				Ok(())
			}
			Backend::File(b) => b.remove(key).await,
			Backend::Postgres(b) => b.remove(key).await,
		}
	}
}

struct Inner {
	options: StoreOptions,
	handle: OnceCell<Backend>,
	opens: AtomicUsize,
	write_lock: Mutex<()>,
	#[cfg(test)]
	fail_sets: std::sync::atomic::AtomicBool,
}

/// Cheaply cloneable handle onto one named store.
#[derive(Clone)]
pub struct KvStore {
	inner: Arc<Inner>,
}

impl KvStore {
	pub fn new(options: StoreOptions) -> Self {
		Self {
			inner: Arc::new(Inner {
				options,
				handle: OnceCell::new(),
				opens: AtomicUsize::new(0),
				write_lock: Mutex::new(()),
				#[cfg(test)]
				fail_sets: std::sync::atomic::AtomicBool::new(false),
			}),
		}
	}

	/// A process-local store, mostly for tests and demo runs.
	pub fn memory() -> Self {
		Self::new(StoreOptions::memory())
	}

	pub fn name(&self) -> &str {
		&self.inner.options.name
	}

	/// Held across a read-modify-write of a key. Shared by every clone of this
	/// store, so writers going through different handles still take turns.
	pub async fn write_guard(&self) -> MutexGuard<'_, ()> {
		self.inner.write_lock.lock().await
	}

	// A failed open is not cached, the next call tries again.
	async fn backend(&self) -> Result<&Backend, StoreError> {
		self.inner
			.handle
			.get_or_try_init(|| async {
				self.inner.opens.fetch_add(1, Ordering::SeqCst);
				Backend::open(&self.inner.options).await
			})
			.await
	}

	pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
		let value = self.backend().await?.get(key).await?;
		debug!("kv get `{}` (present: {})", key, value.is_some());
		Ok(value)
	}

	pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
		#[cfg(test)]
		if self.inner.fail_sets.load(Ordering::SeqCst) {
			return Err(StoreError::StorageFailure(format!("refusing to write `{}`", key)));
		}

		self.backend().await?.set(key, value).await?;
		debug!("kv set `{}`", key);
		Ok(())
	}

	pub async fn remove(&self, key: &str) -> Result<(), StoreError> {
		self.backend().await?.remove(key).await?;
		debug!("kv remove `{}`", key);
		Ok(())
	}

	pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
		match self.get(key).await? {
			Some(value) => Ok(Some(serde_json::from_value(value)?)),
			None => Ok(None),
		}
	}

	pub async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
		self.set(key, serde_json::to_value(value)?).await
	}

	/// Makes every following `set` fail while reads and removes keep working.
	#[cfg(test)]
	pub(crate) fn fail_sets(&self, fail: bool) {
		self.inner.fail_sets.store(fail, Ordering::SeqCst);
	}

	#[cfg(test)]
	pub(crate) fn open_count(&self) -> usize {
		self.inner.opens.load(Ordering::SeqCst)
	}
}

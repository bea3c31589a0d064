use log::{error, warn};
use tokio::sync::MutexGuard;

use crate::error::StoreError;
use crate::kv::KvStore;
use crate::models::Database;

/// Key holding the whole pages document.
pub const DB_KEY: &str = "picDropDB";

/// Handle passed to every page and photo operation.
///
/// Each operation loads the whole document, changes its own copy and writes the
/// whole document back. Mutating operations hold the store's write lock for the
/// full cycle, so writers going through any `Db` over the same [`KvStore`] cannot
/// lose each other's updates. Writers in another process talking to the same
/// store are not coordinated.
#[derive(Clone)]
pub struct Db {
	kv: KvStore,
}

impl Db {
	pub fn new(kv: KvStore) -> Self {
		Self { kv }
	}

	pub fn memory() -> Self {
		Self::new(KvStore::memory())
	}

	pub fn kv(&self) -> &KvStore {
		&self.kv
	}

	pub(crate) async fn write_guard(&self) -> MutexGuard<'_, ()> {
		self.kv.write_guard().await
	}

	/// Loads and validates the document. A missing document is an empty one.
	pub(crate) async fn load(&self) -> Result<Database, StoreError> {
		let mut database: Database = self.kv.get_json(DB_KEY).await?.unwrap_or_default();

		for (key, page) in database.iter_mut() {
			if &page.id != key {
				warn!("Page stored under `{}` claims id `{}`, using the key", key, page.id);
				page.id = key.clone();
			}
			for photo in page.photos.iter_mut() {
				if photo.enforce_privacy() {
					warn!("Private photo `{}` on `{}` was visible, hiding it", photo.id, key);
				}
			}
		}

		Ok(database)
	}

	/// Like [`Db::load`], but a storage failure reads as an empty document.
	pub(crate) async fn load_or_empty(&self) -> Database {
		match self.load().await {
			Ok(database) => database,
			Err(err) => {
				error!("Failed to read the pages document: {}", err);
				Database::new()
			}
		}
	}

	pub(crate) async fn save(&self, database: &Database) -> Result<(), StoreError> {
		self.kv.set_json(DB_KEY, database).await.map_err(|err| {
			error!("Failed to save the pages document: {}", err);
			err
		})
	}
}

use log::{info, warn};

use crate::api::Db;
use crate::error::StoreError;
use crate::models::{NewPageDetails, Page, PageDetails};
use crate::seed::{example_page, EXAMPLE_ID};
use crate::session::forget_owner;
use crate::utils::now_ms;

fn owned_by<'a>(database: impl IntoIterator<Item = &'a Page>, email: &str) -> Option<&'a Page> {
	database.into_iter().find(|page| page.details.owner() == Some(email))
}

impl Page {
	/// The page registered to `email`. Read failures count as "no such page".
	pub async fn find_by_owner_email(db: &Db, email: &str) -> Option<Self> {
		if email.is_empty() {
			return None;
		}

		let database = db.load_or_empty().await;
		owned_by(database.values(), email).cloned()
	}

	pub async fn create(
		db: &Db,
		id: &str,
		details: NewPageDetails,
		owner_email: &str,
	) -> Result<Self, StoreError> {
		if id.is_empty() || id == EXAMPLE_ID {
			return Err(StoreError::DuplicateId(id.to_string()));
		}

		let _guard = db.write_guard().await;
		let mut database = db.load().await?;

		if database.contains_key(id) {
			return Err(StoreError::DuplicateId(id.to_string()));
		}
		if !owner_email.is_empty() && owned_by(database.values(), owner_email).is_some() {
			return Err(StoreError::DuplicateOwner(owner_email.to_string()));
		}

		let owner = Some(owner_email.to_string()).filter(|email| !email.is_empty());
		let page = Page {
			id: id.to_string(),
			details: PageDetails::new(details, owner),
			photos: Vec::new(),
		};

		database.insert(id.to_string(), page.clone());
		db.save(&database).await?;
		info!("Created page `{}`", id);

		Ok(page)
	}

	/// Every user page; the example page is left out. Read failures give an
	/// empty list.
	pub async fn list_all(db: &Db) -> Vec<Self> {
		db.load_or_empty()
			.await
			.into_values()
			.filter(|page| page.id != EXAMPLE_ID)
			.collect()
	}

	pub async fn delete(db: &Db, id: &str) -> Result<(), StoreError> {
		let _guard = db.write_guard().await;
		let mut database = db.load().await?;

		let page = database
			.remove(id)
			.ok_or_else(|| StoreError::NotFound(id.to_string()))?;

		db.save(&database).await?;
		info!("Deleted page `{}` with {} photo(s)", id, page.photos.len());

		if let Some(email) = page.details.owner() {
			if let Err(err) = forget_owner(db.kv(), email).await {
				warn!("Could not clear stored identity for {}: {}", email, err);
			}
		}

		Ok(())
	}

	/// The page stored under `id`. The example page is created on first request.
	pub async fn get(db: &Db, id: &str) -> Result<Option<Self>, StoreError> {
		if id == EXAMPLE_ID {
			return Self::get_or_seed_example(db).await.map(Some);
		}

		Ok(db.load().await?.remove(id))
	}

	async fn get_or_seed_example(db: &Db) -> Result<Self, StoreError> {
		let _guard = db.write_guard().await;
		let mut database = db.load().await?;

		if let Some(page) = database.get(EXAMPLE_ID) {
			return Ok(page.clone());
		}

		let page = example_page(now_ms());
		database.insert(EXAMPLE_ID.to_string(), page.clone());
		db.save(&database).await?;
		info!("Seeded the example page with {} photos", page.photos.len());

		Ok(page)
	}

	/// Replaces the page details as a whole.
	pub async fn update_details(db: &Db, id: &str, details: PageDetails) -> Result<Self, StoreError> {
		let _guard = db.write_guard().await;
		let mut database = db.load().await?;

		if !database.contains_key(id) {
			return Err(StoreError::NotFound(id.to_string()));
		}
		if let Some(email) = details.owner() {
			let taken = database
				.values()
				.any(|page| page.id != id && page.details.owner() == Some(email));
			if taken {
				return Err(StoreError::DuplicateOwner(email.to_string()));
			}
		}

		let page = match database.get_mut(id) {
			Some(page) => page,
			None => return Err(StoreError::NotFound(id.to_string())),
		};
		page.details = details;
		let updated = page.clone();

		db.save(&database).await?;
		Ok(updated)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::api::DB_KEY;
	use crate::kv::KvStore;
	use crate::models::{BackgroundPosition, SessionUser};
	use crate::seed::EXAMPLE_PHOTO_COUNT;
	use crate::session::{identity_key, SessionContext, DEFAULT_ADMIN_EMAIL};
	use serde_json::json;

	fn new_details(names: &str) -> NewPageDetails {
		NewPageDetails {
			couple_names: names.to_string(),
			date: "Set Your Date!".to_string(),
			message: "Welcome to our wedding celebration!".to_string(),
		}
	}

	#[tokio::test]
	async fn create_then_get() {
		let db = Db::memory();
		let created = Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com")
			.await
			.unwrap();

		let fetched = Page::get(&db, "alice-bob").await.unwrap().unwrap();
		assert_eq!(fetched, created);
		assert!(fetched.photos.is_empty());
		assert_eq!(fetched.details.couple_names, "Alice & Bob");
		assert_eq!(fetched.details.owner(), Some("alice@example.com"));
		assert_eq!(fetched.details.background_position, "center");
	}

	#[tokio::test]
	async fn duplicate_id_wins_over_duplicate_owner() {
		let db = Db::memory();
		Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com")
			.await
			.unwrap();

		let same_id = Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com").await;
		assert!(matches!(same_id, Err(StoreError::DuplicateId(_))));

		let same_id_other_owner =
			Page::create(&db, "alice-bob", new_details("Alice & Bob"), "other@example.com").await;
		assert!(matches!(same_id_other_owner, Err(StoreError::DuplicateId(_))));

		let same_owner = Page::create(&db, "carol-dan", new_details("Carol & Dan"), "alice@example.com").await;
		assert!(matches!(same_owner, Err(StoreError::DuplicateOwner(_))));

		assert_eq!(Page::list_all(&db).await.len(), 1);
	}

	#[tokio::test]
	async fn find_by_owner_email() {
		let db = Db::memory();
		Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com")
			.await
			.unwrap();

		let found = Page::find_by_owner_email(&db, "alice@example.com").await.unwrap();
		assert_eq!(found.id, "alice-bob");
		assert!(Page::find_by_owner_email(&db, "bob@example.com").await.is_none());
		assert!(Page::find_by_owner_email(&db, "").await.is_none());
	}

	#[tokio::test]
	async fn unknown_page_is_absent() {
		let db = Db::memory();
		assert_eq!(Page::get(&db, "nobody").await.unwrap(), None);
		assert_eq!(db.kv().get(DB_KEY).await.unwrap(), None);
	}

	#[tokio::test]
	async fn example_is_seeded_once_and_never_listed() {
		let db = Db::memory();
		Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com")
			.await
			.unwrap();

		let first = Page::get(&db, EXAMPLE_ID).await.unwrap().unwrap();
		let second = Page::get(&db, EXAMPLE_ID).await.unwrap().unwrap();

		assert_eq!(first.photos.len(), EXAMPLE_PHOTO_COUNT);
		assert_eq!(first, second);

		let listed: Vec<String> = Page::list_all(&db).await.into_iter().map(|p| p.id).collect();
		assert_eq!(listed, vec!["alice-bob".to_string()]);
	}

	#[tokio::test]
	async fn concurrent_example_requests_seed_once() {
		let db = Db::memory();
		let calls: Vec<_> = (0..8)
			.map(|_| {
				let db = db.clone();
				tokio::spawn(async move { Page::get(&db, EXAMPLE_ID).await })
			})
			.collect();

		let mut pages = Vec::new();
		for call in calls {
			pages.push(call.await.unwrap().unwrap().unwrap());
		}

		assert!(pages.windows(2).all(|w| w[0] == w[1]));
	}

	#[tokio::test]
	async fn update_details_replaces_instead_of_merging() {
		let db = Db::memory();
		Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com")
			.await
			.unwrap();

		let mut details = PageDetails::new(new_details("Alice & Robert"), None);
		details.date = "June 1, 2025".to_string();
		details.profile_image_url = Some("data:image/png;base64,AA==".to_string());
		details.set_background(BackgroundPosition { x: 10.0, y: 90.0 });
		details.set_content_opacity(0.5);

		let updated = Page::update_details(&db, "alice-bob", details.clone()).await.unwrap();
		assert_eq!(updated.details, details);

		let fetched = Page::get(&db, "alice-bob").await.unwrap().unwrap();
		assert_eq!(fetched.details, details);
		assert_eq!(fetched.details.owner(), None);
	}

	#[tokio::test]
	async fn update_details_of_missing_page_fails() {
		let db = Db::memory();
		let result = Page::update_details(&db, "ghost", PageDetails::new(new_details("G"), None)).await;
		assert!(matches!(result, Err(StoreError::NotFound(_))));
	}

	#[tokio::test]
	async fn update_details_cannot_steal_an_owner_email() {
		let db = Db::memory();
		Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com")
			.await
			.unwrap();
		Page::create(&db, "carol-dan", new_details("Carol & Dan"), "carol@example.com")
			.await
			.unwrap();

		let details = PageDetails::new(new_details("Carol & Dan"), Some("alice@example.com".to_string()));
		let result = Page::update_details(&db, "carol-dan", details).await;
		assert!(matches!(result, Err(StoreError::DuplicateOwner(_))));
	}

	#[tokio::test]
	async fn delete_removes_page_and_owner_session() {
		let db = Db::memory();
		let session = SessionContext::new(db.kv().clone(), DEFAULT_ADMIN_EMAIL);
		Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com")
			.await
			.unwrap();
		session
			.login(SessionUser {
				name: "Alice & Bob".to_string(),
				email: "alice@example.com".to_string(),
				wedding_id: "alice-bob".to_string(),
				is_admin: None,
			})
			.await
			.unwrap();

		Page::delete(&db, "alice-bob").await.unwrap();

		assert_eq!(Page::get(&db, "alice-bob").await.unwrap(), None);
		assert_eq!(session.current().await.unwrap(), None);
		assert_eq!(db.kv().get(&identity_key("alice@example.com")).await.unwrap(), None);
		assert!(matches!(
			Page::delete(&db, "alice-bob").await,
			Err(StoreError::NotFound(_))
		));
	}

	#[tokio::test]
	async fn failed_delete_keeps_the_owner_logged_in() {
		let db = Db::memory();
		let session = SessionContext::new(db.kv().clone(), DEFAULT_ADMIN_EMAIL);
		Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com")
			.await
			.unwrap();
		session
			.login(SessionUser {
				name: "Alice & Bob".to_string(),
				email: "alice@example.com".to_string(),
				wedding_id: "alice-bob".to_string(),
				is_admin: None,
			})
			.await
			.unwrap();

		db.kv().fail_sets(true);
		assert!(matches!(
			Page::delete(&db, "alice-bob").await,
			Err(StoreError::StorageFailure(_))
		));
		db.kv().fail_sets(false);

		assert!(Page::get(&db, "alice-bob").await.unwrap().is_some());
		assert!(session.is_authenticated().await.unwrap());
		assert!(db.kv().get(&identity_key("alice@example.com")).await.unwrap().is_some());
	}

	#[tokio::test]
	async fn reserved_and_empty_ids_cannot_be_created() {
		let db = Db::memory();

		let example = Page::create(&db, EXAMPLE_ID, new_details("Mallory & Eve"), "mallory@example.com").await;
		assert!(matches!(example, Err(StoreError::DuplicateId(_))));

		let empty = Page::create(&db, "", new_details("!!!"), "eve@example.com").await;
		assert!(matches!(empty, Err(StoreError::DuplicateId(_))));

		assert!(Page::find_by_owner_email(&db, "mallory@example.com").await.is_none());
		assert!(Page::get(&db, EXAMPLE_ID).await.unwrap().unwrap().details.owner().is_none());
	}

	#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
	async fn separate_handles_seed_the_example_once() {
		let kv = KvStore::memory();
		let calls: Vec<_> = (0..8)
			.map(|_| {
				let db = Db::new(kv.clone());
				tokio::spawn(async move { Page::get(&db, EXAMPLE_ID).await })
			})
			.collect();

		let mut pages = Vec::new();
		for call in calls {
			pages.push(call.await.unwrap().unwrap().unwrap());
		}

		assert!(pages.windows(2).all(|w| w[0] == w[1]));
	}

	#[tokio::test]
	async fn read_failures_are_swallowed_only_by_lookups() {
		let kv = KvStore::memory();
		kv.set(DB_KEY, json!(["not", "a", "map"])).await.unwrap();
		let db = Db::new(kv);

		assert!(Page::list_all(&db).await.is_empty());
		assert!(Page::find_by_owner_email(&db, "alice@example.com").await.is_none());

		assert!(matches!(
			Page::get(&db, "alice-bob").await,
			Err(StoreError::StorageFailure(_))
		));
		assert!(matches!(
			Page::create(&db, "alice-bob", new_details("Alice & Bob"), "alice@example.com").await,
			Err(StoreError::StorageFailure(_))
		));
	}

	#[tokio::test]
	async fn stored_records_are_coerced_on_read() {
		let kv = KvStore::memory();
		kv.set(
			DB_KEY,
			json!({
				"alice-bob": {
					"id": "wrong",
					"details": { "coupleNames": "Alice & Bob", "date": "", "message": "" },
					"photos": [{
						"id": "p1",
						"url": "data:image/png;base64,AA==",
						"timestamp": 1,
						"isPublic": true,
						"isPrivate": true,
					}],
				},
			}),
		)
		.await
		.unwrap();
		let db = Db::new(kv);

		let page = Page::get(&db, "alice-bob").await.unwrap().unwrap();
		assert_eq!(page.id, "alice-bob");
		assert!(!page.photos[0].is_public);
	}
}

//! Who is logged in on this device.
//!
//! The session is kept apart from the pages document, under its own key, and is
//! either absent (logged out) or a [`SessionUser`] for a page owner or the admin.

use log::{info, warn};

use crate::api::Db;
use crate::error::StoreError;
use crate::kv::KvStore;
use crate::models::{Page, SessionUser};

pub const SESSION_KEY: &str = "currentUser";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@picdrop.com";

/// Key of the per-owner identity record written at login.
pub fn identity_key(email: &str) -> String {
	format!("user_{}", email)
}

pub struct SessionContext {
	kv: KvStore,
	admin_email: String,
}

impl SessionContext {
	pub fn new(kv: KvStore, admin_email: impl Into<String>) -> Self {
		Self {
			kv,
			admin_email: admin_email.into(),
		}
	}

	pub fn is_admin_email(&self, email: &str) -> bool {
		email == self.admin_email
	}

	/// Stores `user` as the current session. Admin rights come from the email
	/// alone and are decided here, never read from a page.
	pub async fn login(&self, mut user: SessionUser) -> Result<SessionUser, StoreError> {
		user.is_admin = if self.is_admin_email(&user.email) { Some(true) } else { None };

		self.kv.set_json(SESSION_KEY, &user).await?;
		self.kv.set_json(&identity_key(&user.email), &user).await?;
		info!("Logged in {} (admin: {})", user.email, user.is_admin());

		Ok(user)
	}

	/// Logs in the owner of the page registered to `email`.
	///
	/// The admin email logs in without a page. Returns `None` when no page
	/// belongs to the email.
	pub async fn login_with_email(&self, db: &Db, email: &str) -> Result<Option<SessionUser>, StoreError> {
		if self.is_admin_email(email) {
			let admin = SessionUser {
				name: "Admin".to_string(),
				email: email.to_string(),
				wedding_id: String::new(),
				is_admin: None,
			};
			return self.login(admin).await.map(Some);
		}

		let page = match Page::find_by_owner_email(db, email).await {
			Some(page) => page,
			None => return Ok(None),
		};

		let user = SessionUser {
			name: page.details.couple_names.clone(),
			email: page.details.owner().unwrap_or(email).to_string(),
			wedding_id: page.id.clone(),
			is_admin: None,
		};
		self.login(user).await.map(Some)
	}

	pub async fn logout(&self) -> Result<(), StoreError> {
		self.kv.remove(SESSION_KEY).await
	}

	/// The current session. A stored session that no longer decodes is dropped
	/// and reads as logged out.
	pub async fn current(&self) -> Result<Option<SessionUser>, StoreError> {
		let value = match self.kv.get(SESSION_KEY).await? {
			Some(value) => value,
			None => return Ok(None),
		};

		match serde_json::from_value::<SessionUser>(value) {
			Ok(user) => Ok(Some(user)),
			Err(err) => {
				warn!("Dropping unreadable session: {}", err);
				self.kv.remove(SESSION_KEY).await?;
				Ok(None)
			}
		}
	}

	pub async fn is_authenticated(&self) -> Result<bool, StoreError> {
		Ok(self.current().await?.is_some())
	}
}

/// Removes what is stored about `email`: its identity record, and the current
/// session if it belongs to that owner.
pub async fn forget_owner(kv: &KvStore, email: &str) -> Result<(), StoreError> {
	kv.remove(&identity_key(email)).await?;

	let current: Option<SessionUser> = kv.get_json(SESSION_KEY).await.unwrap_or(None);
	if current.map_or(false, |user| user.email == email) {
		kv.remove(SESSION_KEY).await?;
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::models::NewPageDetails;
	use serde_json::json;

	fn owner(email: &str, wedding_id: &str) -> SessionUser {
		SessionUser {
			name: "Alice & Bob".to_string(),
			email: email.to_string(),
			wedding_id: wedding_id.to_string(),
			is_admin: None,
		}
	}

	#[tokio::test]
	async fn starts_logged_out() {
		let session = SessionContext::new(KvStore::memory(), DEFAULT_ADMIN_EMAIL);
		assert_eq!(session.current().await.unwrap(), None);
		assert!(!session.is_authenticated().await.unwrap());
	}

	#[tokio::test]
	async fn login_then_logout() {
		let session = SessionContext::new(KvStore::memory(), DEFAULT_ADMIN_EMAIL);
		let user = session.login(owner("alice@example.com", "alice-bob")).await.unwrap();

		assert!(!user.is_admin());
		assert_eq!(session.current().await.unwrap(), Some(user));

		session.logout().await.unwrap();
		assert_eq!(session.current().await.unwrap(), None);
	}

	#[tokio::test]
	async fn admin_is_granted_by_email_only() {
		let session = SessionContext::new(KvStore::memory(), DEFAULT_ADMIN_EMAIL);

		let mut forged = owner("alice@example.com", "alice-bob");
		forged.is_admin = Some(true);
		assert!(!session.login(forged).await.unwrap().is_admin());

		let admin = session.login(owner("admin@picdrop.com", "")).await.unwrap();
		assert!(admin.is_admin());

		let lookalike = session.login(owner("Admin@PicDrop.com", "")).await.unwrap();
		assert!(!lookalike.is_admin());
		assert!(!session.is_admin_email("Admin@PicDrop.com"));
	}

	#[tokio::test]
	async fn unreadable_session_is_cleared() {
		let kv = KvStore::memory();
		kv.set(SESSION_KEY, json!("not a user")).await.unwrap();
		let session = SessionContext::new(kv.clone(), DEFAULT_ADMIN_EMAIL);

		assert_eq!(session.current().await.unwrap(), None);
		assert_eq!(kv.get(SESSION_KEY).await.unwrap(), None);
	}

	#[tokio::test]
	async fn login_with_email_finds_the_owned_page() {
		let db = Db::memory();
		let session = SessionContext::new(db.kv().clone(), DEFAULT_ADMIN_EMAIL);
		Page::create(
			&db,
			"alice-bob",
			NewPageDetails {
				couple_names: "Alice & Bob".to_string(),
				date: "Set Your Date!".to_string(),
				message: "Hi".to_string(),
			},
			"alice@example.com",
		)
		.await
		.unwrap();

		let user = session
			.login_with_email(&db, "alice@example.com")
			.await
			.unwrap()
			.unwrap();
		assert_eq!(user.wedding_id, "alice-bob");
		assert_eq!(user.name, "Alice & Bob");

		assert_eq!(session.login_with_email(&db, "nobody@example.com").await.unwrap(), None);
	}

	#[tokio::test]
	async fn forget_owner_only_clears_that_owners_session() {
		let kv = KvStore::memory();
		let session = SessionContext::new(kv.clone(), DEFAULT_ADMIN_EMAIL);
		session.login(owner("carol@example.com", "carol-dan")).await.unwrap();
		session.login(owner("alice@example.com", "alice-bob")).await.unwrap();

		forget_owner(&kv, "carol@example.com").await.unwrap();
		assert!(session.is_authenticated().await.unwrap());
		assert_eq!(kv.get(&identity_key("carol@example.com")).await.unwrap(), None);

		forget_owner(&kv, "alice@example.com").await.unwrap();
		assert!(!session.is_authenticated().await.unwrap());
	}
}

use log::{debug, info};
use std::collections::HashSet;

use crate::api::Db;
use crate::error::StoreError;
use crate::models::{Photo, PhotoUpload};
use crate::utils::{now_ms, to_data_url};

/// `new{ms}{index}`, suffixed when a photo with that id already exists.
fn fresh_photo_id(ms: i64, index: usize, taken: &HashSet<String>) -> String {
	let base = format!("new{}{}", ms, index);
	if !taken.contains(&base) {
		return base;
	}

	let mut n = 1;
	loop {
		let candidate = format!("{}-{}", base, n);
		if !taken.contains(&candidate) {
			return candidate;
		}
		n += 1;
	}
}

impl Photo {
	/// Stores guest uploads at the front of the page's photos, in the order given.
	pub async fn upload(db: &Db, page_id: &str, uploads: Vec<PhotoUpload>) -> Result<Vec<Self>, StoreError> {
		let _guard = db.write_guard().await;
		let mut database = db.load().await?;

		let page = database
			.get_mut(page_id)
			.ok_or_else(|| StoreError::NotFound(page_id.to_string()))?;

		let mut taken: HashSet<String> = page.photos.iter().map(|p| p.id.clone()).collect();
		let mut new_photos = Vec::with_capacity(uploads.len());

		// One upload at a time keeps the encoded photos in input order.
		for (index, upload) in uploads.into_iter().enumerate() {
			let url = to_data_url(upload.content, upload.mime_type).await?;
			let timestamp = now_ms();
			let id = fresh_photo_id(timestamp, index, &taken);
			taken.insert(id.clone());

			debug!("Encoded upload {} for `{}` as {}", index, page_id, id);
			new_photos.push(Photo {
				id,
				url,
				caption: upload.caption,
				uploader_name: upload.uploader_name,
				timestamp,
				is_public: !upload.is_private,
				is_sensitive: Some(if upload.is_private { false } else { upload.is_sensitive }),
				is_private: Some(upload.is_private),
			});
		}

		let mut photos = new_photos.clone();
		photos.append(&mut page.photos);
		page.photos = photos;
		db.save(&database).await?;
		info!("Uploaded {} photo(s) to `{}`", new_photos.len(), page_id);

		Ok(new_photos)
	}

	/// Removes every photo whose id is in `photo_ids`. Unknown ids are ignored.
	pub async fn delete_many(db: &Db, page_id: &str, photo_ids: &HashSet<String>) -> Result<(), StoreError> {
		let _guard = db.write_guard().await;
		let mut database = db.load().await?;

		let page = database
			.get_mut(page_id)
			.ok_or_else(|| StoreError::NotFound(page_id.to_string()))?;

		let before = page.photos.len();
		page.photos.retain(|photo| !photo_ids.contains(&photo.id));
		let removed = before - page.photos.len();

		db.save(&database).await?;
		info!("Deleted {} photo(s) from `{}`", removed, page_id);

		Ok(())
	}

	/// Flips whether a photo shows in the public gallery and returns the new
	/// state. Private photos always stay hidden.
	pub async fn toggle_visibility(db: &Db, page_id: &str, photo_id: &str) -> Result<bool, StoreError> {
		let _guard = db.write_guard().await;
		let mut database = db.load().await?;

		let page = database
			.get_mut(page_id)
			.ok_or_else(|| StoreError::NotFound(page_id.to_string()))?;
		let photo = page
			.photos
			.iter_mut()
			.find(|photo| photo.id == photo_id)
			.ok_or_else(|| StoreError::PhotoNotFound(photo_id.to_string()))?;

		photo.is_public = !photo.is_public;
		if photo.is_marked_private() {
			photo.is_public = false;
		}
		let is_public = photo.is_public;

		db.save(&database).await?;
		Ok(is_public)
	}
}

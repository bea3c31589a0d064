//! Downloading photos out of a page into a directory.

use log::{info, warn};
use reqwest::Client;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::api::Db;
use crate::error::{ExportError, StoreError};
use crate::models::{Page, Photo};
use crate::utils::{decode_payload, split_data_url};

/// Where a photo's bytes come from. Both forms are equally valid photo urls.
#[derive(Debug, Clone, PartialEq)]
pub enum PhotoSource<'a> {
	Inline { mime: &'a str, payload: &'a str },
	Remote(&'a str),
}

impl<'a> PhotoSource<'a> {
	pub fn parse(url: &'a str) -> Self {
		match split_data_url(url) {
			Some((mime, payload)) => PhotoSource::Inline { mime, payload },
			None => PhotoSource::Remote(url),
		}
	}

	pub async fn fetch(&self, client: &Client) -> Result<Vec<u8>, ExportError> {
		match self {
			PhotoSource::Inline { payload, .. } => Ok(decode_payload(payload)?),
			PhotoSource::Remote(url) => {
				if url.starts_with("data:") {
					return Err(ExportError::MalformedDataUrl);
				}
				let response = client.get(*url).send().await?.error_for_status()?;
				Ok(response.bytes().await?.to_vec())
			}
		}
	}

	fn extension(&self) -> &'static str {
		match self {
			PhotoSource::Inline { mime, .. } => match *mime {
				"image/jpeg" => "jpg",
				"image/gif" => "gif",
				"image/webp" => "webp",
				"image/heic" => "heic",
				_ => "png",
			},
			PhotoSource::Remote(_) => "png",
		}
	}
}

#[derive(Debug, Clone)]
pub enum ExportSelection {
	/// Everything guests can see.
	AllPublic,
	Selected(HashSet<String>),
}

pub fn export_file_name(photo: &Photo) -> String {
	let uploader = if photo.uploader_name.is_empty() {
		"guest"
	} else {
		photo.uploader_name.as_str()
	};
	let safe_uploader: String = uploader
		.chars()
		.map(|c| if c == '/' || c == '\\' { '_' } else { c })
		.collect();

	format!(
		"{}-{}.{}",
		safe_uploader,
		photo.id,
		PhotoSource::parse(&photo.url).extension()
	)
}

/// Writes the selected photos of `page_id` into `dir` and returns the written paths.
pub async fn export_photos(
	db: &Db,
	client: &Client,
	page_id: &str,
	selection: &ExportSelection,
	dir: &Path,
) -> Result<Vec<PathBuf>, ExportError> {
	let page = Page::get(db, page_id)
		.await?
		.ok_or_else(|| StoreError::NotFound(page_id.to_string()))?;

	let photos: Vec<&Photo> = page
		.photos
		.iter()
		.filter(|photo| match selection {
			ExportSelection::AllPublic => photo.is_public,
			ExportSelection::Selected(ids) => ids.contains(&photo.id),
		})
		.collect();

	if photos.is_empty() {
		return Err(ExportError::NothingToExport(page_id.to_string()));
	}

	fs::create_dir_all(dir).await?;

	let mut written = Vec::with_capacity(photos.len());
	for photo in photos {
		let bytes = match PhotoSource::parse(&photo.url).fetch(client).await {
			Ok(bytes) => bytes,
			Err(err) => {
				warn!("Could not fetch photo `{}` of `{}`: {}", photo.id, page_id, err);
				return Err(err);
			}
		};

		let path = dir.join(export_file_name(photo));
		fs::write(&path, bytes).await?;
		written.push(path);
	}

	info!("Exported {} photo(s) of `{}` to {}", written.len(), page_id, dir.display());
	Ok(written)
}

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
	pub id: String,
	/// A `data:` url for guest uploads, a plain http url for seeded photos.
	pub url: String,
	#[serde(default)]
	pub caption: String,
	#[serde(default)]
	pub uploader_name: String,
	/// Epoch milliseconds.
	pub timestamp: i64,
	pub is_public: bool,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_sensitive: Option<bool>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_private: Option<bool>,
}

impl Photo {
	pub fn is_marked_private(&self) -> bool {
		self.is_private.unwrap_or(false)
	}

	pub fn is_marked_sensitive(&self) -> bool {
		self.is_sensitive.unwrap_or(false)
	}

	/// Private photos are never public and never flagged sensitive.
	/// Returns `true` when the photo had to be corrected.
	pub fn enforce_privacy(&mut self) -> bool {
		if !self.is_marked_private() {
			return false;
		}

		let violated = self.is_public || self.is_marked_sensitive();
		self.is_public = false;
		if self.is_sensitive.is_some() {
			self.is_sensitive = Some(false);
		}
		violated
	}
}

/// One file submitted through the guest upload form.
#[derive(Debug, Clone, Default)]
pub struct PhotoUpload {
	pub content: Vec<u8>,
	/// Taken from the browser when known, otherwise sniffed from the bytes.
	pub mime_type: Option<String>,
	pub caption: String,
	pub uploader_name: String,
	pub is_sensitive: bool,
	pub is_private: bool,
}

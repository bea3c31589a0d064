use serde::{Deserialize, Serialize};

/// The identity kept for whoever is logged in on this device.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
	pub name: String,
	pub email: String,
	pub wedding_id: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub is_admin: Option<bool>,
}

impl SessionUser {
	pub fn is_admin(&self) -> bool {
		self.is_admin.unwrap_or(false)
	}
}

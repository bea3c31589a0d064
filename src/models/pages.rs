use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::Photo;

pub const DEFAULT_BACKGROUND_POSITION: &str = "center";
pub const DEFAULT_CONTENT_BACKGROUND_COLOR: &str = "rgba(253, 248, 245, 0.9)";
pub const DEFAULT_CONTENT_OPACITY: f64 = 0.9;

/// Every page, keyed by page id. Persisted as one JSON object.
pub type Database = BTreeMap<String, Page>;

fn default_background_position() -> String {
	DEFAULT_BACKGROUND_POSITION.to_string()
}

fn default_content_background_color() -> String {
	DEFAULT_CONTENT_BACKGROUND_COLOR.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page {
	pub id: String,
	pub details: PageDetails,
	#[serde(default)]
	pub photos: Vec<Photo>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageDetails {
	#[serde(default)]
	pub couple_names: String,
	#[serde(default)]
	pub date: String,
	#[serde(default)]
	pub message: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub owner_email: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub profile_image_url: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub background_image_url: Option<String>,
	/// `"X% Y%"` or `"center"`, see [`BackgroundPosition`].
	#[serde(default = "default_background_position")]
	pub background_position: String,
	/// CSS colour whose alpha carries the content panel opacity.
	#[serde(default = "default_content_background_color")]
	pub content_background_color: String,
}

/// The fields a couple fills in on sign-up.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPageDetails {
	pub couple_names: String,
	pub date: String,
	pub message: String,
}

impl PageDetails {
	pub fn new(details: NewPageDetails, owner_email: Option<String>) -> Self {
		Self {
			couple_names: details.couple_names,
			date: details.date,
			message: details.message,
			owner_email,
			profile_image_url: None,
			background_image_url: None,
			background_position: default_background_position(),
			content_background_color: default_content_background_color(),
		}
	}

	/// The owner email, if one is set and non-empty.
	pub fn owner(&self) -> Option<&str> {
		self.owner_email.as_deref().filter(|email| !email.is_empty())
	}

	pub fn background(&self) -> BackgroundPosition {
		BackgroundPosition::parse(&self.background_position).unwrap_or_default()
	}

	pub fn set_background(&mut self, position: BackgroundPosition) {
		self.background_position = position.to_string();
	}

	/// Alpha of `content_background_color`, falling back to the default opacity
	/// for anything that is not an `rgba(r, g, b, a)` colour.
	pub fn content_opacity(&self) -> f64 {
		parse_rgba_alpha(&self.content_background_color).unwrap_or(DEFAULT_CONTENT_OPACITY)
	}

	pub fn set_content_opacity(&mut self, opacity: f64) {
		let opacity = if opacity.is_nan() { DEFAULT_CONTENT_OPACITY } else { opacity.clamp(0.0, 1.0) };
		self.content_background_color = format!("rgba(253, 248, 245, {})", opacity);
	}
}

fn parse_rgba_alpha(color: &str) -> Option<f64> {
	let inner = color
		.trim()
		.strip_prefix("rgba(")?
		.strip_suffix(')')?;
	let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
	if parts.len() != 4 {
		return None;
	}

	parts[3].parse::<f64>().ok().filter(|a| (0.0..=1.0).contains(a))
}

/// Background focal point in percent of the image size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundPosition {
	pub x: f64,
	pub y: f64,
}

impl Default for BackgroundPosition {
	fn default() -> Self {
		Self { x: 50.0, y: 50.0 }
	}
}

impl BackgroundPosition {
	pub fn parse(value: &str) -> Option<Self> {
		let value = value.trim();
		if value == DEFAULT_BACKGROUND_POSITION {
			return Some(Self::default());
		}

		let mut parts = value.split_whitespace();
		let x = parse_percent(parts.next()?)?;
		let y = parse_percent(parts.next()?)?;
		if parts.next().is_some() {
			return None;
		}

		Some(Self { x, y })
	}

	/// Position of a click inside a `width` x `height` preview.
	pub fn from_click(x: f64, y: f64, width: f64, height: f64) -> Self {
		if width <= 0.0 || height <= 0.0 {
			return Self::default();
		}

		Self {
			x: (x / width * 100.0).clamp(0.0, 100.0),
			y: (y / height * 100.0).clamp(0.0, 100.0),
		}
	}
}

fn parse_percent(part: &str) -> Option<f64> {
	part.strip_suffix('%')?.parse::<f64>().ok()
}

impl std::fmt::Display for BackgroundPosition {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:.1}% {:.1}%", self.x, self.y)
	}
}

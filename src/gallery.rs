//! What guests see: filtering, ordering and the lightbox viewer state.

use std::cmp::Ordering;
use std::str::FromStr;
use std::time::Duration;

use crate::models::Photo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
	#[default]
	Newest,
	Oldest,
	UploaderAz,
	UploaderZa,
}

impl FromStr for SortOrder {
	type Err = std::convert::Infallible;

	/// Unknown values fall back to newest first.
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(match s {
			"oldest" => SortOrder::Oldest,
			"uploader-az" => SortOrder::UploaderAz,
			"uploader-za" => SortOrder::UploaderZa,
			_ => SortOrder::Newest,
		})
	}
}

impl SortOrder {
	pub fn as_str(&self) -> &'static str {
		match self {
			SortOrder::Newest => "newest",
			SortOrder::Oldest => "oldest",
			SortOrder::UploaderAz => "uploader-az",
			SortOrder::UploaderZa => "uploader-za",
		}
	}
}

fn compare_uploaders(a: &Photo, b: &Photo) -> Ordering {
	a.uploader_name
		.to_lowercase()
		.cmp(&b.uploader_name.to_lowercase())
		.then_with(|| a.uploader_name.cmp(&b.uploader_name))
}

/// Sorts in place. The sort is stable, so ties keep their stored order.
pub fn sort_photos(photos: &mut [Photo], order: SortOrder) {
	match order {
		SortOrder::Newest => photos.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
		SortOrder::Oldest => photos.sort_by(|a, b| a.timestamp.cmp(&b.timestamp)),
		SortOrder::UploaderAz => photos.sort_by(compare_uploaders),
		SortOrder::UploaderZa => photos.sort_by(|a, b| compare_uploaders(b, a)),
	}
}

/// The photos guests may see, in the requested order.
pub fn public_gallery(photos: &[Photo], order: SortOrder) -> Vec<Photo> {
	let mut visible: Vec<Photo> = photos.iter().filter(|p| p.is_public).cloned().collect();
	sort_photos(&mut visible, order);
	visible
}

/// Public sensitive photos are shown blurred until a guest reveals them.
pub fn needs_blur(photo: &Photo) -> bool {
	photo.is_public && photo.is_marked_sensitive()
}

/// Which photo of a list is open in the lightbox, if any.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lightbox {
	len: usize,
	selected: Option<usize>,
}

impl Lightbox {
	pub fn new(len: usize) -> Self {
		Self { len, selected: None }
	}

	pub fn selected(&self) -> Option<usize> {
		self.selected
	}

	/// Opens the photo with `photo_id`; no-op when it is not in `photos`.
	pub fn open(&mut self, photos: &[Photo], photo_id: &str) {
		self.len = photos.len();
		if let Some(index) = photos.iter().position(|p| p.id == photo_id) {
			self.selected = Some(index);
		}
	}

	pub fn close(&mut self) {
		self.selected = None;
	}

	pub fn next(&mut self) {
		if let Some(index) = self.selected {
			if self.len > 0 {
				self.selected = Some((index + 1) % self.len);
			}
		}
	}

	pub fn prev(&mut self) {
		if let Some(index) = self.selected {
			if self.len > 0 {
				self.selected = Some((index + self.len - 1) % self.len);
			}
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
	#[default]
	Cut,
	Crossfade,
}

pub const DEFAULT_SLIDESHOW_INTERVAL: Duration = Duration::from_millis(5000);

/// Two image slots so a crossfade can show the old photo fading out while the
/// new one fades in.
#[derive(Debug, Clone, PartialEq)]
pub struct Slideshow {
	pub interval: Duration,
	pub transition: Transition,
	active: bool,
	playing: bool,
	slots: [Option<String>; 2],
	active_slot: usize,
}

impl Default for Slideshow {
	fn default() -> Self {
		Self {
			interval: DEFAULT_SLIDESHOW_INTERVAL,
			transition: Transition::default(),
			active: false,
			playing: false,
			slots: [None, None],
			active_slot: 0,
		}
	}
}

impl Slideshow {
	pub fn new(interval: Duration, transition: Transition) -> Self {
		Self {
			interval,
			transition,
			..Self::default()
		}
	}

	pub fn start(&mut self) {
		self.active = true;
		self.playing = true;
	}

	pub fn stop(&mut self) {
		self.active = false;
		self.playing = false;
	}

	pub fn toggle_play(&mut self) {
		if self.active {
			self.playing = !self.playing;
		}
	}

	pub fn is_playing(&self) -> bool {
		self.active && self.playing
	}

	/// Arrow keys and the prev/next buttons pause automatic advancing.
	pub fn manual_navigation(&mut self) {
		self.playing = false;
	}

	/// Puts `photo_id` on screen.
	pub fn show(&mut self, photo_id: &str) {
		if self.active && self.transition == Transition::Crossfade {
			let inactive = 1 - self.active_slot;
			self.slots[inactive] = Some(photo_id.to_string());
			self.active_slot = inactive;
		} else {
			self.slots = [Some(photo_id.to_string()), None];
			self.active_slot = 0;
		}
	}

	pub fn active_slot(&self) -> usize {
		self.active_slot
	}

	pub fn slots(&self) -> &[Option<String>; 2] {
		&self.slots
	}

	pub fn current(&self) -> Option<&str> {
		self.slots[self.active_slot].as_deref()
	}
}

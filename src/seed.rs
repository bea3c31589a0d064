//! Demonstration content for the `example` page.

use crate::models::{Page, PageDetails, Photo};
use crate::models::{DEFAULT_BACKGROUND_POSITION, DEFAULT_CONTENT_BACKGROUND_COLOR};
use crate::utils::FIVE_MINUTES_MS;

/// Reserved id of the demo page; never listed among user pages.
pub const EXAMPLE_ID: &str = "example";

pub const EXAMPLE_PHOTO_COUNT: usize = 15;

const UPLOADERS: [&str; 4] = ["Alice", "Bob", "Charlie", "Diana"];
const CAPTION: &str = "A beautiful moment captured. ❤️";
const SENSITIVE: [usize; 2] = [2, 9];

/// Builds the example page. Photo `i` is taken `i * 5` minutes before `now_ms`.
pub fn example_page(now_ms: i64) -> Page {
	let photos = (0..EXAMPLE_PHOTO_COUNT)
		.map(|i| Photo {
			id: format!("mock{}", i + 1),
			url: format!("https://picsum.photos/seed/{}/800/1200", i + 1),
			caption: if i % 3 == 0 { CAPTION.to_string() } else { String::new() },
			uploader_name: UPLOADERS[i % UPLOADERS.len()].to_string(),
			timestamp: now_ms - i as i64 * FIVE_MINUTES_MS,
			is_public: true,
			is_sensitive: Some(SENSITIVE.contains(&i)),
			is_private: None,
		})
		.collect();

	Page {
		id: EXAMPLE_ID.to_string(),
		details: PageDetails {
			couple_names: "Jessica & Michael".to_string(),
			date: "October 26, 2024".to_string(),
			message: "Welcome to our wedding celebration! We would be honored if you'd share the moments you capture today.".to_string(),
			owner_email: None,
			profile_image_url: Some("https://picsum.photos/seed/couple/400/400".to_string()),
			background_image_url: Some("https://picsum.photos/seed/weddingbg/1920/1080".to_string()),
			background_position: DEFAULT_BACKGROUND_POSITION.to_string(),
			content_background_color: DEFAULT_CONTENT_BACKGROUND_COLOR.to_string(),
		},
		photos,
	}
}

//! Links couples hand out to their guests.

use crate::seed::EXAMPLE_ID;

pub const PAGE_SHARE_TEXT: &str = "Join us for our wedding celebration! Check out our page and share your photos:";
pub const PHOTO_SHARE_TEXT: &str = "Check out this photo from our wedding gallery!";

#[derive(Debug, Clone, PartialEq)]
pub struct ShareLinks {
	pub page_url: String,
	pub gallery_url: String,
	pub facebook: String,
	pub twitter: String,
	pub whatsapp: String,
	pub email: String,
}

fn with_trailing_slash(base_url: &str) -> String {
	if base_url.ends_with('/') {
		base_url.to_string()
	} else {
		format!("{}/", base_url)
	}
}

pub fn page_url(base_url: &str, page_id: &str) -> String {
	if page_id == EXAMPLE_ID {
		return format!("{}#/example", with_trailing_slash(base_url));
	}
	format!("{}#/w/{}", with_trailing_slash(base_url), page_id)
}

pub fn gallery_url(base_url: &str, page_id: &str) -> String {
	format!("{}/gallery", page_url(base_url, page_id))
}

pub fn facebook_share_url(target: &str) -> String {
	format!(
		"https://www.facebook.com/sharer/sharer.php?u={}",
		urlencoding::encode(target)
	)
}

pub fn twitter_share_url(target: &str, text: &str) -> String {
	let query = serde_urlencoded::to_string([("url", target), ("text", text)]).unwrap_or_default();
	format!("https://twitter.com/intent/tweet?{}", query)
}

pub fn whatsapp_share_url(target: &str, text: &str) -> String {
	format!(
		"https://api.whatsapp.com/send?text={}",
		urlencoding::encode(&format!("{} {}", text, target))
	)
}

pub fn email_share_url(target: &str, subject: &str, text: &str) -> String {
	format!(
		"mailto:?subject={}&body={}",
		urlencoding::encode(subject),
		urlencoding::encode(&format!("{} {}", text, target))
	)
}

impl ShareLinks {
	pub fn for_page(base_url: &str, page_id: &str, couple_names: &str) -> Self {
		let page_url = page_url(base_url, page_id);
		let subject = format!("Our Wedding Day: {}", couple_names);

		Self {
			gallery_url: gallery_url(base_url, page_id),
			facebook: facebook_share_url(&page_url),
			twitter: twitter_share_url(&page_url, PAGE_SHARE_TEXT),
			whatsapp: whatsapp_share_url(&page_url, PAGE_SHARE_TEXT),
			email: email_share_url(&page_url, &subject, PAGE_SHARE_TEXT),
			page_url,
		}
	}
}

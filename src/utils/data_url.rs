use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::StoreError;

pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Guesses an image mime type from the leading magic bytes.
pub fn sniff_mime(bytes: &[u8]) -> &'static str {
	match bytes {
		[0x89, b'P', b'N', b'G', ..] => "image/png",
		[0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
		[b'G', b'I', b'F', b'8', ..] => "image/gif",
		[b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
		[_, _, _, _, b'f', b't', b'y', b'p', b'h', b'e', b'i', b'c', ..] => "image/heic",
		_ => FALLBACK_MIME,
	}
}

pub fn encode_data_url(mime: &str, bytes: &[u8]) -> String {
	format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Encodes raw file bytes into a self-contained data url off the async threads.
pub async fn to_data_url(bytes: Vec<u8>, mime: Option<String>) -> Result<String, StoreError> {
	tokio::task::spawn_blocking(move || {
		let mime = mime
			.filter(|m| !m.is_empty())
			.unwrap_or_else(|| sniff_mime(&bytes).to_string());
		encode_data_url(&mime, &bytes)
	})
	.await
	.map_err(|e| StoreError::StorageFailure(format!("photo encoding task failed: {}", e)))
}

/// Splits `data:<mime>;base64,<payload>` into its mime type and payload.
pub fn split_data_url(url: &str) -> Option<(&str, &str)> {
	let rest = url.strip_prefix("data:")?;
	let (meta, payload) = rest.split_once(',')?;
	let mime = meta.strip_suffix(";base64")?;

	Some((if mime.is_empty() { FALLBACK_MIME } else { mime }, payload))
}

pub fn decode_payload(payload: &str) -> Result<Vec<u8>, base64::DecodeError> {
	STANDARD.decode(payload)
}

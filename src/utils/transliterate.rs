use translit::{CharsMapping, Transliterator};

/// Lowercase Cyrillic letters and their Latin spelling. Uppercase input is
/// lowered first.
fn cyrillic_table() -> CharsMapping {
	[
		("а", "a"),
		("б", "b"),
		("в", "v"),
		("г", "g"),
		("д", "d"),
		("е", "e"),
		("ё", "e"),
		("ж", "j"),
		("з", "z"),
		("и", "i"),
		("к", "k"),
		("л", "l"),
		("м", "m"),
		("н", "n"),
		("о", "o"),
		("п", "p"),
		("р", "r"),
		("с", "s"),
		("т", "t"),
		("у", "u"),
		("ф", "f"),
		("х", "h"),
		("ц", "c"),
		("ч", "ch"),
		("ш", "sh"),
		("щ", "shch"),
		("ы", "y"),
		("э", "e"),
		("ю", "u"),
		("я", "ya"),
		("й", "i"),
		("ъ", ""),
		("ь", ""),
	]
	.iter()
	.cloned()
	.collect()
}

/// Lowercases `text` and spells Cyrillic letters in Latin. Other characters pass
/// through unchanged.
pub fn transliterate(text: &str) -> String {
	Transliterator::new(cyrillic_table()).convert(&text.to_lowercase(), false)
}

/// Derives a page id from the couple's display names.
///
/// `"Alice & Bob"` becomes `"alice-bob"`. Cyrillic letters are transliterated and
/// anything outside `[a-z0-9-]` is dropped, so plain spaces disappear rather than
/// turning into dashes.
pub fn page_id_from_names(couple_names: &str) -> String {
	let joined = couple_names.to_lowercase().replace(" & ", "-");

	transliterate(&joined)
		.chars()
		.filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
		.collect()
}

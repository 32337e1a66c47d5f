use unicode_normalization::UnicodeNormalization;

/// Canonical form used to join planned category names to catalog names: NFKC, collapsed
/// whitespace, lowercase.
pub fn normalize(name: &str) -> String {
	let normalized: String = name.nfkc().collect();

	normalized.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

use std::cmp::Ordering;

/// Candidates must score strictly above this cosine similarity.
pub const SIMILARITY_THRESHOLD: f32 = 0.2;

/// Cosine similarity in [-1, 1]. Returns `None` for mismatched dimensions or a zero-length vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
	if a.len() != b.len() || a.is_empty() {
		return None;
	}

	let mut dot = 0.0_f64;
	let mut norm_a = 0.0_f64;
	let mut norm_b = 0.0_f64;

	for (x, y) in a.iter().zip(b) {
		let (x, y) = (f64::from(*x), f64::from(*y));

		dot += x * y;
		norm_a += x * x;
		norm_b += y * y;
	}

	if norm_a == 0.0 || norm_b == 0.0 {
		return None;
	}

	let sim = dot / (norm_a.sqrt() * norm_b.sqrt());

	Some(sim.clamp(-1.0, 1.0) as f32)
}

pub fn passes_threshold(similarity: f32) -> bool {
	similarity.is_finite() && similarity > SIMILARITY_THRESHOLD
}

/// Keeps candidates above the threshold, orders them by similarity descending and truncates to
/// `limit`. The sort is stable, so equal scores keep their input (catalog) order.
pub fn select_top<T>(candidates: Vec<T>, limit: usize, similarity: impl Fn(&T) -> f32) -> Vec<T> {
	let mut kept: Vec<T> =
		candidates.into_iter().filter(|candidate| passes_threshold(similarity(candidate))).collect();

	kept.sort_by(|a, b| similarity(b).partial_cmp(&similarity(a)).unwrap_or(Ordering::Equal));
	kept.truncate(limit);

	kept
}

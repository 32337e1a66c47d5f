/// Why an embedding cannot be stored or searched with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EmbeddingRejectReason {
	DimensionMismatch { expected: u32, got: usize },
	NonFinite,
	/// Cosine similarity against a zero vector is undefined.
	ZeroNorm,
}
impl std::fmt::Display for EmbeddingRejectReason {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::DimensionMismatch { expected, got } =>
				write!(f, "Embedding dimension mismatch: expected {expected}, got {got}."),
			Self::NonFinite => f.write_str("Embedding contains non-finite values."),
			Self::ZeroNorm => f.write_str("Embedding has zero norm."),
		}
	}
}

pub fn check_embedding(vector: &[f32], expected: u32) -> Result<(), EmbeddingRejectReason> {
	if vector.len() != expected as usize {
		return Err(EmbeddingRejectReason::DimensionMismatch { expected, got: vector.len() });
	}
	if vector.iter().any(|value| !value.is_finite()) {
		return Err(EmbeddingRejectReason::NonFinite);
	}
	if vector.iter().all(|value| *value == 0.0) {
		return Err(EmbeddingRejectReason::ZeroNorm);
	}

	Ok(())
}

/// Result of checking a model response against its output schema.
#[derive(Clone, Debug, PartialEq)]
pub enum SchemaOutcome<T> {
	Valid(T),
	Invalid { reason: String },
}
impl<T> SchemaOutcome<T> {
	pub fn invalid(reason: impl Into<String>) -> Self {
		Self::Invalid { reason: reason.into() }
	}

	pub fn is_valid(&self) -> bool {
		matches!(self, Self::Valid(_))
	}

	pub fn into_result(self) -> Result<T, String> {
		match self {
			Self::Valid(value) => Ok(value),
			Self::Invalid { reason } => Err(reason),
		}
	}
}

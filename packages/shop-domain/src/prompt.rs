/// Minimum number of characters in a shopper prompt. Whitespace counts.
pub const MIN_PROMPT_CHARS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PromptRejectReason {
	TooShort { chars: usize },
}

/// Returns the prompt unchanged, or why it cannot be used.
pub fn validate_prompt(prompt: &str) -> Result<&str, PromptRejectReason> {
	let chars = prompt.chars().count();

	if chars < MIN_PROMPT_CHARS {
		return Err(PromptRejectReason::TooShort { chars });
	}

	Ok(prompt)
}

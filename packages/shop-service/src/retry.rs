use std::{future::Future, time::Duration};

use tokio::time;

use shop_config::Retry;

#[derive(Debug, thiserror::Error)]
pub(crate) enum CallError {
	#[error(transparent)]
	Provider(#[from] shop_providers::Error),
	#[error("Model output does not match schema: {reason}")]
	Schema { reason: String },
	#[error("Call timed out after {after:?}.")]
	Timeout { after: Duration },
}
impl CallError {
	fn is_retryable(&self) -> bool {
		match self {
			Self::Provider(err) => err.is_retryable(),
			Self::Schema { .. } | Self::Timeout { .. } => true,
		}
	}
}

/// Runs `call` until it succeeds, fails with a non-retryable error, or `policy.max_attempts` is
/// exhausted. Each attempt is bounded by `timeout`.
pub(crate) async fn with_retry<T, F, Fut>(
	policy: &Retry,
	timeout: Duration,
	label: &str,
	mut call: F,
) -> Result<T, CallError>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = Result<T, CallError>>,
{
	let max_attempts = policy.max_attempts.max(1);
	let cap = Duration::from_millis(policy.max_backoff_ms);
	let mut backoff = Duration::from_millis(policy.base_backoff_ms).min(cap);
	let mut attempt = 1;

	loop {
		let result = match time::timeout(timeout, call()).await {
			Ok(result) => result,
			Err(_) => Err(CallError::Timeout { after: timeout }),
		};
		let err = match result {
			Ok(value) => return Ok(value),
			Err(err) => err,
		};

		if attempt >= max_attempts || !err.is_retryable() {
			return Err(err);
		}

		tracing::warn!(
			call = label,
			attempt,
			max_attempts,
			backoff_ms = backoff.as_millis() as u64,
			error = %err,
			"Retrying upstream call."
		);

		time::sleep(backoff).await;

		backoff = backoff.saturating_mul(2).min(cap);
		attempt += 1;
	}
}

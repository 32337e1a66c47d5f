use std::time::Duration;

use serde_json::Value;

use crate::{
	Candidate, ShopService,
	retry::{self, CallError},
};
use shop_domain::{ProductVerdict, verdict};
use shop_providers::structured::OutputSchema;

const SYSTEM_PROMPT: &str = "\
You review one catalog product against a shopper's request.
Rules:
- Mark the product suitable only if it genuinely fits the request.
- Reject items that are off in tone, formality or purpose.
- Be practical and honest, never promotional.
- Explain as if recommending the item face to face, referring to its design, style or use.
- Keep the reason to at most 50 words.
Output must match the provided JSON schema.";

impl ShopService {
	/// Judges one candidate. Failures after retries are logged and yield `None`.
	pub(crate) async fn validate_candidate(
		&self,
		prompt: &str,
		candidate: &Candidate,
	) -> Option<ProductVerdict> {
		let messages = build_validation_messages(prompt, candidate);
		let schema = verdict::output_schema();
		let output = OutputSchema { name: verdict::SCHEMA_NAME, schema: &schema };
		let llm_cfg = &self.cfg.providers.llm;
		let structured = &self.providers.structured;
		let messages = messages.as_slice();
		let timeout = Duration::from_millis(llm_cfg.timeout_ms);
		let result =
			retry::with_retry(&self.cfg.retry, timeout, "product_validation", move || async move {
				let raw = structured.generate(llm_cfg, messages, output).await?;

				verdict::parse_verdict(raw).into_result().map_err(|reason| CallError::Schema { reason })
			})
			.await;

		match result {
			Ok(verdict) => Some(verdict),
			Err(err) => {
				tracing::warn!(
					product_id = %candidate.product.id,
					error = %err,
					"Dropping candidate after validation failure."
				);

				None
			},
		}
	}
}

pub fn build_validation_messages(prompt: &str, candidate: &Candidate) -> Vec<Value> {
	let user = format!(
		"Shopper request:\n{prompt}\n\nProduct name: {}\nProduct description: {}",
		candidate.product.name, candidate.product.description
	);

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user }),
	]
}

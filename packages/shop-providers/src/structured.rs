use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// JSON schema the model output is constrained to.
#[derive(Clone, Copy, Debug)]
pub struct OutputSchema<'a> {
	pub name: &'a str,
	pub schema: &'a Value,
}

/// Calls an OpenAI-compatible chat completion endpoint with a strict `json_schema` response
/// format and returns the decoded JSON object. Schema conformance is the caller's concern.
pub async fn generate(
	cfg: &shop_config::LlmProviderConfig,
	messages: &[Value],
	output: OutputSchema<'_>,
) -> Result<Value> {
	let client = Client::builder().timeout(Duration::from_millis(cfg.timeout_ms)).build()?;
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": cfg.temperature,
		"messages": messages,
		"response_format": {
			"type": "json_schema",
			"json_schema": {
				"name": output.name,
				"strict": true,
				"schema": output.schema,
			},
		},
	});
	let request = client
		.post(crate::endpoint(&cfg.api_base, &cfg.path))
		.headers(crate::auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(&body);
	let json = crate::send_json(request).await?;

	parse_completion_json(json)
}

fn parse_completion_json(json: Value) -> Result<Value> {
	let message = json
		.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.ok_or_else(|| Error::invalid_response("Completion response is missing a message."))?;

	if let Some(refusal) = message.get("refusal").and_then(|v| v.as_str()) {
		return Err(Error::invalid_response(format!("Model refused the request: {refusal}")));
	}

	let content = message
		.get("content")
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::invalid_response("Completion message has no text content."))?;
	let parsed: Value = serde_json::from_str(strip_code_fence(content))
		.map_err(|_| Error::invalid_response("Completion content is not valid JSON."))?;

	if !parsed.is_object() {
		return Err(Error::invalid_response("Completion content is not a JSON object."));
	}

	Ok(parsed)
}

fn strip_code_fence(content: &str) -> &str {
	let trimmed = content.trim();
	let Some(inner) = trimmed.strip_prefix("```") else {
		return trimmed;
	};
	let inner = inner.strip_prefix("json").unwrap_or(inner);

	inner.strip_suffix("```").unwrap_or(inner).trim()
}

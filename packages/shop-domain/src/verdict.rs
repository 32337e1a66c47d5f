use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::outcome::SchemaOutcome;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ProductVerdict {
	pub suitable: bool,
	pub reason: String,
}

pub const SCHEMA_NAME: &str = "product_validation";

pub fn output_schema() -> Value {
	serde_json::json!({
		"type": "object",
		"properties": {
			"suitable": {
				"type": "boolean",
				"description": "True only if the product genuinely fits the request."
			},
			"reason": {
				"type": "string",
				"description": "Face-to-face recommendation, at most 50 words."
			}
		},
		"required": ["suitable", "reason"],
		"additionalProperties": false
	})
}

pub fn parse_verdict(value: Value) -> SchemaOutcome<ProductVerdict> {
	match serde_json::from_value::<ProductVerdict>(value) {
		Ok(verdict) if verdict.suitable && verdict.reason.trim().is_empty() =>
			SchemaOutcome::invalid("Accepted products must carry a reason."),
		Ok(verdict) => SchemaOutcome::Valid(ProductVerdict {
			suitable: verdict.suitable,
			reason: verdict.reason.trim().to_string(),
		}),
		Err(err) => SchemaOutcome::invalid(format!("Verdict does not match schema: {err}.")),
	}
}

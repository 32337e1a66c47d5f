use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::outcome::SchemaOutcome;

pub const MIN_ITEMS_PER_CATEGORY: u32 = 1;
pub const MAX_ITEMS_PER_CATEGORY: u32 = 5;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryPlan {
	pub greeting: String,
	pub categories: Vec<PlannedCategory>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlannedCategory {
	pub name: String,
	pub count: u32,
	pub reason: String,
}

#[derive(Deserialize)]
struct RawPlan {
	greeting: String,
	categories: Vec<RawPlannedCategory>,
}

#[derive(Deserialize)]
struct RawPlannedCategory {
	name: String,
	count: i64,
	reason: String,
}

pub const SCHEMA_NAME: &str = "category_plan";

pub fn output_schema() -> Value {
	serde_json::json!({
		"type": "object",
		"properties": {
			"greeting": {
				"type": "string",
				"description": "Warm greeting relevant to the request, at most 20 words."
			},
			"categories": {
				"type": "array",
				"description": "Chosen categories. Empty when nothing in the catalog matches.",
				"items": {
					"type": "object",
					"properties": {
						"name": {
							"type": "string",
							"description": "Exact name of one of the available categories."
						},
						"count": {
							"type": "integer",
							"description": "How many products to fetch, from 1 to 5."
						},
						"reason": {
							"type": "string",
							"description": "Why this category fits, at most 30 words."
						}
					},
					"required": ["name", "count", "reason"],
					"additionalProperties": false
				}
			}
		},
		"required": ["greeting", "categories"],
		"additionalProperties": false
	})
}

pub fn parse_plan(value: Value) -> SchemaOutcome<CategoryPlan> {
	let raw: RawPlan = match serde_json::from_value(value) {
		Ok(raw) => raw,
		Err(err) => return SchemaOutcome::invalid(format!("Plan does not match schema: {err}.")),
	};
	let mut categories = Vec::with_capacity(raw.categories.len());

	for (idx, item) in raw.categories.into_iter().enumerate() {
		if item.name.trim().is_empty() {
			return SchemaOutcome::invalid(format!("categories[{idx}].name must be non-empty."));
		}

		let count = match u32::try_from(item.count) {
			Ok(count) if (MIN_ITEMS_PER_CATEGORY..=MAX_ITEMS_PER_CATEGORY).contains(&count) =>
				count,
			_ => {
				return SchemaOutcome::invalid(format!(
					"categories[{idx}].count must be in the range \
					 {MIN_ITEMS_PER_CATEGORY}-{MAX_ITEMS_PER_CATEGORY}, got {}.",
					item.count
				));
			},
		};

		categories.push(PlannedCategory {
			name: item.name.trim().to_string(),
			count,
			reason: item.reason.trim().to_string(),
		});
	}

	SchemaOutcome::Valid(CategoryPlan { greeting: raw.greeting.trim().to_string(), categories })
}

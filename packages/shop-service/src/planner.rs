use std::{collections::HashMap, time::Duration};

use serde_json::Value;

use crate::{
	Error, Result, ShopService,
	retry::{self, CallError},
};
use shop_domain::{CategoryPlan, category_name, plan};
use shop_providers::structured::OutputSchema;
use shop_storage::models::Category;

const SYSTEM_PROMPT: &str = "\
You are a shopping assistant for an online store. Pick the product categories that best serve the \
shopper's request.
Rules:
- Choose only from the category names listed by the user message, spelled exactly as listed.
- Never invent categories.
- If nothing in the catalog matches, return an empty categories list.
- Decide whether the request needs one category or several.
- For each category, choose how many products to show, from 1 to 5.
- Greeting: at most 20 words, warm and relevant to the request.
- Reason per category: at most 30 words.
Output must match the provided JSON schema.";

/// A planned category joined back to its catalog row.
#[derive(Clone, Debug)]
pub struct ResolvedCategory {
	pub category: Category,
	pub count: u32,
	pub reason: String,
}

impl ShopService {
	pub(crate) async fn plan_categories(
		&self,
		prompt: &str,
		categories: &[Category],
	) -> Result<CategoryPlan> {
		let messages = build_plan_messages(prompt, categories);
		let schema = plan::output_schema();
		let output = OutputSchema { name: plan::SCHEMA_NAME, schema: &schema };
		let llm_cfg = &self.cfg.providers.llm;
		let structured = &self.providers.structured;
		let messages = messages.as_slice();
		let timeout = Duration::from_millis(llm_cfg.timeout_ms);

		retry::with_retry(&self.cfg.retry, timeout, "category_plan", move || async move {
			let raw = structured.generate(llm_cfg, messages, output).await?;

			plan::parse_plan(raw).into_result().map_err(|reason| CallError::Schema { reason })
		})
		.await
		.map_err(|err| Error::Upstream { message: format!("Category planning failed: {err}") })
	}
}

pub fn build_plan_messages(prompt: &str, categories: &[Category]) -> Vec<Value> {
	let listing = categories
		.iter()
		.map(|category| format!("- {}: {}", category.name, category.description))
		.collect::<Vec<_>>()
		.join("\n");
	let user = format!("Available categories:\n{listing}\n\nShopper request:\n{prompt}");

	vec![
		serde_json::json!({ "role": "system", "content": SYSTEM_PROMPT }),
		serde_json::json!({ "role": "user", "content": user }),
	]
}

/// Joins planned names to catalog categories, preserving plan order. Names are compared after
/// normalization; unknown names and repeats of an already resolved category are dropped.
pub fn resolve_plan(plan: &CategoryPlan, categories: &[Category]) -> Vec<ResolvedCategory> {
	let mut by_name = HashMap::with_capacity(categories.len());

	for category in categories {
		by_name.entry(category_name::normalize(&category.name)).or_insert(category);
	}

	let mut resolved: Vec<ResolvedCategory> = Vec::with_capacity(plan.categories.len());

	for planned in &plan.categories {
		let Some(category) = by_name.get(&category_name::normalize(&planned.name)) else {
			tracing::warn!(planned_category = %planned.name, "Dropping unknown planned category.");

			continue;
		};

		if resolved.iter().any(|existing| existing.category.id == category.id) {
			tracing::debug!(planned_category = %planned.name, "Dropping repeated planned category.");

			continue;
		}

		resolved.push(ResolvedCategory {
			category: (*category).clone(),
			count: planned.count,
			reason: planned.reason.clone(),
		});
	}

	resolved
}

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Candidate, ResolvedCategory};

#[derive(Clone, Debug)]
pub struct ValidatedCandidate {
	pub candidate: Candidate,
	pub suitable: bool,
	pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationGroup {
	pub category: CategoryRecommendation,
	pub products: Vec<ProductRecommendation>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecommendation {
	pub id: Uuid,
	pub name: String,
	pub description: String,
	pub reason: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProductRecommendation {
	pub id: Uuid,
	pub name: String,
	pub description: String,
	pub price: String,
	#[serde(rename = "categoryId")]
	pub category_id: Uuid,
	pub reason: String,
}

/// Builds the response groups in plan order. Only suitable candidates survive, each product
/// appears at most once across all groups, and groups left empty are omitted.
pub fn aggregate(
	groups: Vec<(ResolvedCategory, Vec<ValidatedCandidate>)>,
) -> Vec<RecommendationGroup> {
	let mut seen = HashSet::new();
	let mut results = Vec::with_capacity(groups.len());

	for (resolved, validated) in groups {
		let products: Vec<ProductRecommendation> = validated
			.into_iter()
			.filter(|item| item.suitable && seen.insert(item.candidate.product.id))
			.take(resolved.count as usize)
			.map(|item| {
				let product = item.candidate.product;

				ProductRecommendation {
					id: product.id,
					name: product.name,
					description: product.description,
					price: product.price,
					category_id: product.category_id,
					reason: item.reason,
				}
			})
			.collect();

		if products.is_empty() {
			continue;
		}

		results.push(RecommendationGroup {
			category: CategoryRecommendation {
				id: resolved.category.id,
				name: resolved.category.name,
				description: resolved.category.description,
				reason: resolved.reason,
			},
			products,
		});
	}

	results
}

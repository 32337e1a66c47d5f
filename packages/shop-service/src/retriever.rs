use std::collections::HashSet;

use uuid::Uuid;

use crate::{Candidate, Result, ShopService};
use shop_domain::similarity::{self, SIMILARITY_THRESHOLD};

impl ShopService {
	/// Nearest products of one category, above the similarity threshold, best first.
	pub(crate) async fn retrieve_candidates(
		&self,
		category_id: Uuid,
		query: &[f32],
		count: u32,
	) -> Result<Vec<Candidate>> {
		let rows = self
			.catalog
			.nearest_products(category_id, query, SIMILARITY_THRESHOLD, count)
			.await?;

		Ok(enforce_contract(rows, category_id, count))
	}
}

/// Applies the retrieval contract to store output: rows of the requested category only, no
/// repeated product, similarity strictly above the threshold, stable best-first order and at most
/// `count` rows.
pub fn enforce_contract(rows: Vec<Candidate>, category_id: Uuid, count: u32) -> Vec<Candidate> {
	let mut seen = HashSet::with_capacity(rows.len());
	let rows: Vec<Candidate> = rows
		.into_iter()
		.filter(|row| row.product.category_id == category_id && seen.insert(row.product.id))
		.collect();

	similarity::select_top(rows, count as usize, |row: &Candidate| row.similarity)
}

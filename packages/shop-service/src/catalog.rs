use uuid::Uuid;

use crate::BoxFuture;
use shop_domain::similarity;
use shop_storage::{
	db::Db,
	models::{Category, Product, ProductMatch},
	queries,
};

/// Read-only view of the catalog used by the recommendation pipeline.
pub trait CatalogStore
where
	Self: Send + Sync,
{
	fn categories<'a>(&'a self) -> BoxFuture<'a, shop_storage::Result<Vec<Category>>>;

	/// Products of `category_id` scoring strictly above `min_similarity`, best first.
	fn nearest_products<'a>(
		&'a self,
		category_id: Uuid,
		query: &'a [f32],
		min_similarity: f32,
		limit: u32,
	) -> BoxFuture<'a, shop_storage::Result<Vec<ProductMatch>>>;
}

pub struct PgCatalog {
	db: Db,
}
impl PgCatalog {
	pub fn new(db: Db) -> Self {
		Self { db }
	}
}
impl CatalogStore for PgCatalog {
	fn categories<'a>(&'a self) -> BoxFuture<'a, shop_storage::Result<Vec<Category>>> {
		Box::pin(queries::list_categories(&self.db))
	}

	fn nearest_products<'a>(
		&'a self,
		category_id: Uuid,
		query: &'a [f32],
		min_similarity: f32,
		limit: u32,
	) -> BoxFuture<'a, shop_storage::Result<Vec<ProductMatch>>> {
		Box::pin(queries::nearest_products(
			&self.db,
			category_id,
			query,
			f64::from(min_similarity),
			limit,
		))
	}
}

/// Catalog held in memory that scores products with cosine similarity in process.
#[derive(Default)]
pub struct MemoryCatalog {
	categories: Vec<Category>,
	products: Vec<(Product, Vec<f32>)>,
}
impl MemoryCatalog {
	pub fn new(categories: Vec<Category>) -> Self {
		Self { categories, products: Vec::new() }
	}

	/// Products must be inserted in catalog order; ties keep that order.
	pub fn insert_product(&mut self, product: Product, embedding: Vec<f32>) {
		self.products.push((product, embedding));
	}
}
impl CatalogStore for MemoryCatalog {
	fn categories<'a>(&'a self) -> BoxFuture<'a, shop_storage::Result<Vec<Category>>> {
		let categories = self.categories.clone();

		Box::pin(async move { Ok(categories) })
	}

	fn nearest_products<'a>(
		&'a self,
		category_id: Uuid,
		query: &'a [f32],
		min_similarity: f32,
		limit: u32,
	) -> BoxFuture<'a, shop_storage::Result<Vec<ProductMatch>>> {
		let mut rows: Vec<ProductMatch> = self
			.products
			.iter()
			.filter(|(product, _)| product.category_id == category_id)
			.filter_map(|(product, embedding)| {
				let similarity = similarity::cosine_similarity(query, embedding)?;

				(similarity > min_similarity)
					.then(|| ProductMatch { product: product.clone(), similarity })
			})
			.collect();

		rows.sort_by(|a, b| b.similarity.total_cmp(&a.similarity));
		rows.truncate(limit as usize);

		Box::pin(async move { Ok(rows) })
	}
}

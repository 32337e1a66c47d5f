use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Category {
	pub id: Uuid,
	pub name: String,
	pub description: String,
	pub created_at: OffsetDateTime,
}

/// Catalog product without its embedding. `price` is the exact decimal rendered by Postgres.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct Product {
	pub id: Uuid,
	pub category_id: Uuid,
	pub name: String,
	pub description: String,
	pub price: String,
	pub catalog_seq: i64,
}

#[derive(Clone, Debug, sqlx::FromRow)]
pub struct ProductMatch {
	#[sqlx(flatten)]
	pub product: Product,
	pub similarity: f32,
}

/// A product whose embedding still has to be computed, joined with its category text.
#[derive(Clone, Debug, sqlx::FromRow)]
pub struct PendingEmbedding {
	pub id: Uuid,
	pub name: String,
	pub description: String,
	pub category_name: Option<String>,
	pub category_description: Option<String>,
}

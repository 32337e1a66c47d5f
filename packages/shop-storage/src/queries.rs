use uuid::Uuid;

use crate::{
	Error, Result,
	db::Db,
	models::{Category, PendingEmbedding, ProductMatch},
};

pub async fn list_categories(db: &Db) -> Result<Vec<Category>> {
	let categories = sqlx::query_as::<_, Category>(
		"\
SELECT id, name, description, created_at
FROM categories
ORDER BY name ASC, id ASC",
	)
	.fetch_all(&db.pool)
	.await?;

	Ok(categories)
}

/// Products of one category ranked by cosine similarity to `query`, keeping only scores strictly
/// above `min_similarity`. Equal scores keep catalog insertion order. Zero-norm embeddings score
/// NaN in pgvector, which Postgres treats as greater than any number, so they are excluded.
pub async fn nearest_products(
	db: &Db,
	category_id: Uuid,
	query: &[f32],
	min_similarity: f64,
	limit: u32,
) -> Result<Vec<ProductMatch>> {
	if query.is_empty() {
		return Err(Error::InvalidArgument("Query vector must be non-empty.".to_string()));
	}

	let query_text = vector_to_pg(query);
	let rows = sqlx::query_as::<_, ProductMatch>(
		"\
SELECT *
FROM (
	SELECT
		id,
		category_id,
		name,
		description,
		price::text AS price,
		catalog_seq,
		(1 - (embedding <=> $2::text::vector))::real AS similarity
	FROM products
	WHERE category_id = $1 AND embedding IS NOT NULL
) AS scored
WHERE similarity > $3 AND similarity <> 'NaN'::real
ORDER BY similarity DESC, catalog_seq ASC
LIMIT $4",
	)
	.bind(category_id)
	.bind(query_text.as_str())
	.bind(min_similarity)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn count_missing_embeddings(db: &Db) -> Result<i64> {
	let count = sqlx::query_scalar::<_, i64>("SELECT count(*) FROM products WHERE embedding IS NULL")
		.fetch_one(&db.pool)
		.await?;

	Ok(count)
}

pub async fn products_missing_embeddings(db: &Db, limit: u32) -> Result<Vec<PendingEmbedding>> {
	let rows = sqlx::query_as::<_, PendingEmbedding>(
		"\
SELECT
	p.id,
	p.name,
	p.description,
	c.name AS category_name,
	c.description AS category_description
FROM products p
LEFT JOIN categories c ON c.id = p.category_id
WHERE p.embedding IS NULL
ORDER BY p.catalog_seq ASC
LIMIT $1",
	)
	.bind(i64::from(limit))
	.fetch_all(&db.pool)
	.await?;

	Ok(rows)
}

pub async fn set_product_embedding(db: &Db, product_id: Uuid, vec: &[f32]) -> Result<()> {
	let vec_text = vector_to_pg(vec);
	let result = sqlx::query(
		"\
UPDATE products
SET embedding = $2::text::vector, updated_at = now()
WHERE id = $1",
	)
	.bind(product_id)
	.bind(vec_text.as_str())
	.execute(&db.pool)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::InvalidArgument(format!("Product {product_id} does not exist.")));
	}

	Ok(())
}

pub fn vector_to_pg(vec: &[f32]) -> String {
	let mut out = String::with_capacity(vec.len() * 8);

	out.push('[');

	for (i, value) in vec.iter().enumerate() {
		if i > 0 {
			out.push(',');
		}

		out.push_str(&value.to_string());
	}

	out.push(']');

	out
}

use std::{future::Future, time::Duration};

use tokio::time;
use uuid::Uuid;

use crate::{Error, Result};
use shop_config::Retry;
use shop_domain::vector;
use shop_providers::embedding;
use shop_storage::{db::Db, models::PendingEmbedding, queries};

pub struct WorkerState {
	pub db: Db,
	pub embedding: shop_config::EmbeddingProviderConfig,
	pub retry: Retry,
	pub worker: shop_config::Worker,
}

/// Runs one backfill pass, or keeps polling when `worker.poll_interval_ms` is non-zero.
pub async fn run_worker(state: &WorkerState) -> Result<()> {
	if state.worker.poll_interval_ms == 0 {
		return backfill_once(state).await.map(|_| ());
	}

	let interval = Duration::from_millis(state.worker.poll_interval_ms);

	loop {
		if let Err(err) = backfill_once(state).await {
			tracing::error!(error = %err, "Embedding backfill failed.");
		}

		time::sleep(interval).await;
	}
}

/// Embeds every product without an embedding, one batch at a time. Returns the number of
/// products embedded.
pub async fn backfill_once(state: &WorkerState) -> Result<u64> {
	let total = queries::count_missing_embeddings(&state.db).await?;

	if total == 0 {
		tracing::debug!("No products are missing an embedding.");

		return Ok(0);
	}

	tracing::info!(total, "Backfilling product embeddings.");

	let mut done = 0_u64;

	loop {
		let batch = queries::products_missing_embeddings(&state.db, state.worker.batch_size).await?;

		if batch.is_empty() {
			break;
		}

		done += backfill_batch(state, &batch).await?;

		tracing::info!(done, total, "Embedded product batch.");
	}

	Ok(done)
}

async fn backfill_batch(state: &WorkerState, batch: &[PendingEmbedding]) -> Result<u64> {
	let texts: Vec<String> = batch.iter().map(embedding_text).collect();
	let texts = texts.as_slice();
	let cfg = &state.embedding;
	let vectors =
		with_backoff(&state.retry, "product_embedding", move || embedding::embed(cfg, texts))
			.await?;

	if vectors.len() != batch.len() {
		return Err(Error::Validation(format!(
			"Embedding provider returned {} vectors for {} products.",
			vectors.len(),
			batch.len()
		)));
	}

	for (product, vector) in batch.iter().zip(&vectors) {
		validate_vector(product.id, vector, state.embedding.dimensions)?;
		queries::set_product_embedding(&state.db, product.id, vector).await?;
	}

	Ok(batch.len() as u64)
}

/// Text embedded for a product. Blank parts are left out.
pub fn embedding_text(product: &PendingEmbedding) -> String {
	let parts = [
		("Product name", Some(product.name.as_str())),
		("Description", Some(product.description.as_str())),
		("Category", product.category_name.as_deref()),
		("Category description", product.category_description.as_deref()),
	];

	parts
		.iter()
		.filter_map(|(label, value)| {
			let value = (*value)?.trim();

			(!value.is_empty()).then(|| format!("{label}: {value}"))
		})
		.collect::<Vec<_>>()
		.join("\n")
}

/// Retries `call` with doubling backoff while the provider error is retryable, up to
/// `policy.max_attempts` attempts.
async fn with_backoff<T, F, Fut>(policy: &Retry, label: &str, mut call: F) -> Result<T>
where
	F: FnMut() -> Fut,
	Fut: Future<Output = shop_providers::Result<T>>,
{
	let max_attempts = policy.max_attempts.max(1);
	let cap = Duration::from_millis(policy.max_backoff_ms);
	let mut backoff = Duration::from_millis(policy.base_backoff_ms).min(cap);
	let mut attempt = 1;

	loop {
		let err = match call().await {
			Ok(value) => return Ok(value),
			Err(err) => err,
		};

		if attempt >= max_attempts || !err.is_retryable() {
			return Err(err.into());
		}

		tracing::warn!(
			call = label,
			attempt,
			max_attempts,
			backoff_ms = backoff.as_millis() as u64,
			error = %err,
			"Retrying embedding call."
		);

		time::sleep(backoff).await;

		backoff = backoff.saturating_mul(2).min(cap);
		attempt += 1;
	}
}

fn validate_vector(product_id: Uuid, vector: &[f32], expected: u32) -> Result<()> {
	vector::check_embedding(vector, expected)
		.map_err(|reason| Error::Validation(format!("Product {product_id}: {reason}")))
}

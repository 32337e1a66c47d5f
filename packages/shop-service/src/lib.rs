pub mod aggregate;
pub mod catalog;
pub mod embedding;
pub mod planner;
pub mod recommend;
pub mod retriever;
pub mod validator;

mod error;
mod retry;

pub use aggregate::{
	CategoryRecommendation, ProductRecommendation, RecommendationGroup, ValidatedCandidate,
};
pub use catalog::{CatalogStore, MemoryCatalog, PgCatalog};
pub use error::{Error, Result};
pub use planner::ResolvedCategory;
pub use recommend::{SemanticSearchRequest, SemanticSearchResponse};

use std::{future::Future, pin::Pin, sync::Arc};

use serde_json::Value;

use shop_config::{Config, EmbeddingProviderConfig, LlmProviderConfig};
use shop_providers::{structured, structured::OutputSchema};
use shop_storage::{db::Db, models::ProductMatch};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// A catalog product paired with its cosine similarity to the shopper prompt.
pub type Candidate = ProductMatch;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, shop_providers::Result<Vec<Vec<f32>>>>;
}

pub trait StructuredProvider
where
	Self: Send + Sync,
{
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		output: OutputSchema<'a>,
	) -> BoxFuture<'a, shop_providers::Result<Value>>;
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
	pub structured: Arc<dyn StructuredProvider>,
}
impl Providers {
	pub fn new(
		embedding: Arc<dyn EmbeddingProvider>,
		structured: Arc<dyn StructuredProvider>,
	) -> Self {
		Self { embedding, structured }
	}
}
impl Default for Providers {
	fn default() -> Self {
		let provider = Arc::new(DefaultProviders);

		Self { embedding: provider.clone(), structured: provider }
	}
}

pub struct ShopService {
	pub cfg: Config,
	pub catalog: Arc<dyn CatalogStore>,
	pub providers: Providers,
}
impl ShopService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, catalog: Arc::new(PgCatalog::new(db)), providers: Providers::default() }
	}

	pub fn with_parts(cfg: Config, catalog: Arc<dyn CatalogStore>, providers: Providers) -> Self {
		Self { cfg, catalog, providers }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, shop_providers::Result<Vec<Vec<f32>>>> {
		Box::pin(shop_providers::embedding::embed(cfg, texts))
	}
}
impl StructuredProvider for DefaultProviders {
	fn generate<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		output: OutputSchema<'a>,
	) -> BoxFuture<'a, shop_providers::Result<Value>> {
		Box::pin(structured::generate(cfg, messages, output))
	}
}

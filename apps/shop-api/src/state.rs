use std::sync::Arc;

use shop_service::ShopService;
use shop_storage::db::Db;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<ShopService>,
}
impl AppState {
	pub async fn new(config: shop_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(config.providers.embedding.dimensions).await?;

		Ok(Self::from_service(ShopService::new(config, db)))
	}

	pub fn from_service(service: ShopService) -> Self {
		Self { service: Arc::new(service) }
	}
}

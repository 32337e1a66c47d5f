pub mod error;
pub mod worker;

pub use error::{Error, Result};

use clap::Parser;

use shop_storage::db::Db;

#[derive(Debug, Parser)]
#[command(
	version = shop_cli::VERSION,
	rename_all = "kebab",
	styles = shop_cli::styles(),
)]
pub struct Args {
	#[command(flatten)]
	pub config: shop_cli::ConfigArgs,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = shop_config::load(&args.config.config)?;

	shop_cli::init_tracing(&config.service.log_level);

	let db = Db::connect(&config.storage.postgres).await?;

	db.ensure_schema(config.providers.embedding.dimensions).await?;

	let state = worker::WorkerState {
		db,
		embedding: config.providers.embedding,
		retry: config.retry,
		worker: config.worker,
	};

	worker::run_worker(&state).await?;

	Ok(())
}

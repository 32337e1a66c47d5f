use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = shop_api::Args::parse();

	shop_api::run(args).await
}

use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = shop_worker::Args::parse();

	shop_worker::run(args).await
}

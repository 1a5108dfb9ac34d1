use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = roster_api::Args::parse();

	roster_api::run(args).await
}

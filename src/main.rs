use clap::Parser;

use fillroute::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    cli::run(cli).await?;
    Ok(())
}

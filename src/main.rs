use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use deswap::application::{Cli, CommandExecutor};
use deswap::shared::config::ConfigLoader;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries command output; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;

    CommandExecutor::execute(cli.command, config).await?;
    Ok(())
}

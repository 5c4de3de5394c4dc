//! CLI commands and handlers
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::{info, warn};

use crate::application::services::{SwapOutcome, SwapService};
use crate::shared::config::AppConfig;
use crate::shared::errors::AppError;
use crate::shared::utils::format_units;

#[derive(Parser)]
#[command(name = "deswap")]
#[command(about = "Token swap widget over a simulated swap contract")]
pub struct Cli {
    /// Path to the TOML config (Config.toml is used when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Quote a swap and print the widget
    Quote {
        /// Token to sell
        #[arg(long)]
        from: String,

        /// Token to buy
        #[arg(long)]
        to: String,

        /// Amount to sell in whole units
        #[arg(short, long)]
        amount: String,

        /// Print the widget as JSON
        #[arg(long)]
        json: bool,
    },

    /// Connect the wallet, simulate and submit a swap
    Swap {
        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        #[arg(short, long)]
        amount: String,

        /// Stop after the dry run
        #[arg(long)]
        simulate_only: bool,
    },

    /// Drive the widget from stdin
    Interactive,

    /// List the configured tokens
    Tokens {
        #[arg(long)]
        json: bool,
    },
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(command: Commands, config: AppConfig) -> Result<(), AppError> {
        let mut service = SwapService::new(&config)?;
        match command {
            Commands::Quote { from, to, amount, json } => {
                Self::execute_quote_command(&mut service, &from, &to, &amount, json).await
            }
            Commands::Swap { from, to, amount, simulate_only } => {
                Self::execute_swap_command(&mut service, &from, &to, &amount, simulate_only).await
            }
            Commands::Interactive => {
                let stdin = BufReader::new(tokio::io::stdin());
                service.run_interactive(stdin).await
            }
            Commands::Tokens { json } => Self::execute_tokens_command(&service, json),
        }
    }

    async fn execute_quote_command(
        service: &mut SwapService,
        from: &str,
        to: &str,
        amount: &str,
        json: bool,
    ) -> Result<(), AppError> {
        let snapshot = service.quote(from, to, amount).await?;
        if json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            for line in snapshot.render() {
                println!("{}", line);
            }
        }
        Ok(())
    }

    async fn execute_swap_command(
        service: &mut SwapService,
        from: &str,
        to: &str,
        amount: &str,
        simulate_only: bool,
    ) -> Result<(), AppError> {
        let outcome = service.swap(from, to, amount, simulate_only).await?;
        service.print_status();

        match outcome {
            SwapOutcome::Simulated(prepared) => {
                let decimals = prepared.intent.token_out.decimals;
                println!("🧪 Simulation passed (request {})", prepared.id);
                println!(
                    "   Expected out: {} {}",
                    format_units(prepared.expected_amount_out, decimals),
                    prepared.intent.token_out.ticker()
                );
                println!("   Gas estimate: {}", prepared.gas_estimate);
                println!("   Deadline:     {}", prepared.intent.deadline);
            }
            SwapOutcome::Submitted(receipt) => {
                info!("Swap {} confirmed", receipt.hash);
                println!("🚀 Transaction: {}", receipt.hash);
            }
            SwapOutcome::Failed => {
                warn!("Swap was not accepted");
            }
        }
        Ok(())
    }

    fn execute_tokens_command(service: &SwapService, json: bool) -> Result<(), AppError> {
        let listing = service.token_listing();
        if json {
            println!("{}", serde_json::to_string_pretty(&listing)?);
            return Ok(());
        }

        println!("📋 {} tokens:", listing.len());
        for token in listing {
            let price = token
                .price_usd
                .map(|p| format!("${:.2}", p))
                .unwrap_or_else(|| "unpriced".to_string());
            println!(
                "   {:<6} {:<12} {:>2} decimals  {}",
                token.ticker, token.name, token.decimals, price
            );
        }
        Ok(())
    }
}

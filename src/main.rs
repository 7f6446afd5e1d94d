//! HLTV win-rates
//!
//! Scraper for HLTV player statistics plus a REST API and CLI serving a
//! win-rate model fitted on the scraped data.

mod cli;
mod config;
mod error;
mod model;
mod output;
mod routes;
mod scraper;
mod types;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hltv_winrates=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load_from(cli.config.as_deref())?;
    tracing::info!("Configuration loaded");

    match cli.command {
        Commands::Scrape {
            start_date,
            end_date,
            prize_min,
            output,
            fail_fast,
        } => cli::run_scrape(config, start_date, end_date, prize_min, output, fail_fast).await,
        Commands::Serve { host, port, model } => cli::run_server(config, host, port, model).await,
        Commands::Predict {
            input,
            format,
            model,
        } => cli::run_predict(config, input, format, model).await,
    }
}

//! CLI commands for hltv-winrates.
//!
//! Scrapes player data, serves the prediction API, or scores a scraped file.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::model::{create_shared_model, PlayerFeatures};
use crate::output::{read_players, write_players};
use crate::routes::{self, AppState};
use crate::scraper::fetcher::PageSource;
use crate::scraper::{
    Aggregator, Browser, EventQuery, FailurePolicy, HltvClient, PageFetcher, ScrapeOutcome,
};
use crate::types::PlayerPrediction;

#[derive(Parser)]
#[command(name = "hltv-winrates")]
#[command(version, about = "HLTV player stats scraper and win-rate prediction API", long_about = None)]
pub struct Cli {
    /// Config file (defaults to ./config.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scrape player records for events in a date range
    Scrape {
        /// First day of the event range (YYYY-MM-DD)
        #[arg(long, default_value = "2023-10-16")]
        start_date: NaiveDate,

        /// Last day of the event range (YYYY-MM-DD)
        #[arg(long, default_value = "2024-04-17")]
        end_date: NaiveDate,

        /// Minimum event prize pool in USD
        #[arg(long, default_value_t = 100_000)]
        prize_min: u64,

        /// Output file override
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Stop on the first failed event, match or player
        #[arg(long)]
        fail_fast: bool,
    },

    /// Start the API server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,

        /// Model path override
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Predict win rates for every player in a scraped file
    Predict {
        /// Scraped player file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output format (json, table)
        #[arg(short, long, default_value = "table")]
        format: String,

        /// Model path override
        #[arg(short, long)]
        model: Option<PathBuf>,
    },
}

/// Run the scrape pipeline and write the output file.
pub async fn run_scrape(
    config: AppConfig,
    start_date: NaiveDate,
    end_date: NaiveDate,
    prize_min: u64,
    output: Option<PathBuf>,
    fail_fast: bool,
) -> anyhow::Result<()> {
    if start_date > end_date {
        anyhow::bail!("start date {} is after end date {}", start_date, end_date);
    }

    let scraper = &config.scraper;
    let output = output.unwrap_or_else(|| PathBuf::from(&scraper.output_path));
    let query = EventQuery {
        start_date,
        end_date,
        prize_min,
        prize_max: scraper.prize_max,
    };
    let policy = if fail_fast {
        FailurePolicy::Abort
    } else {
        FailurePolicy::SkipAndLog
    };

    info!(
        "Scraping events {}..{} with prize pool {}..{} from {}",
        query.start_date, query.end_date, query.prize_min, query.prize_max, scraper.base_url
    );

    let browser = Browser::launch(scraper).await?;
    let fetcher = PageFetcher::new(browser, &scraper.base_url, scraper.delay())?;
    let client = HltvClient::new(fetcher, scraper.endpoints());

    scrape_to_file(client, &query, policy, &output, tokio::signal::ctrl_c()).await
}

/// Run the pipeline until it finishes or `interrupt` fires, close the page
/// source, and only then write the output. Nothing is written unless the
/// run completed.
async fn scrape_to_file<S, I>(
    client: HltvClient<S>,
    query: &EventQuery,
    policy: FailurePolicy,
    output: &Path,
    interrupt: I,
) -> anyhow::Result<()>
where
    S: PageSource,
    I: Future,
{
    let aggregator = Aggregator::new(&client, policy);
    let outcome = tokio::select! {
        biased;
        _ = interrupt => Err(anyhow::anyhow!("Interrupted")),
        res = aggregator.run(query) => res.map_err(anyhow::Error::from),
    };

    // Release the session before looking at the outcome
    if let Err(e) = client.into_source().close().await {
        warn!("{:#}", e);
    }

    let outcome = outcome.context("Scrape aborted, previous output left untouched")?;
    report_skipped(&outcome);
    write_players(output, &outcome.players)?;

    Ok(())
}

fn report_skipped(outcome: &ScrapeOutcome) {
    if outcome.skipped.is_empty() {
        return;
    }
    warn!("{} items were skipped:", outcome.skipped.len());
    for item in &outcome.skipped {
        warn!("  {} {}: {}", item.kind, item.id, item.reason);
    }
}

/// Run the API server.
pub async fn run_server(
    mut config: AppConfig,
    host: Option<String>,
    port: Option<u16>,
    model_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    // Override with CLI args
    if let Some(h) = host {
        config.server.host = h;
    }
    if let Some(p) = port {
        config.server.port = p;
    }
    if let Some(path) = model_path {
        config.model.path = path.to_string_lossy().to_string();
    }

    tracing::info!("Model path: {}", config.model.path);
    let model = create_shared_model(&config.model.path)?;
    tracing::info!("Model loaded successfully");

    let addr = std::net::SocketAddr::new(config.server.host.parse()?, config.server.port);
    let state = Arc::new(AppState { model, config });
    let app = routes::router(state);

    tracing::info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Score every player in a scraped file.
pub async fn run_predict(
    mut config: AppConfig,
    input: PathBuf,
    format: String,
    model_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    if let Some(path) = model_path {
        config.model.path = path.to_string_lossy().to_string();
    }

    eprintln!("Loading model from: {}", config.model.path);
    let model = create_shared_model(&config.model.path)?;

    let predictions = predict_file(&input, |f| model.predict(f))?;
    eprintln!("Scored {} players", predictions.len());

    match format.as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&predictions)?);
        }
        "table" => {
            print_table(&predictions);
        }
        _ => {
            eprintln!("Unknown format: {}. Using table.", format);
            print_table(&predictions);
        }
    }

    Ok(())
}

fn predict_file<F>(input: &Path, predict: F) -> anyhow::Result<Vec<PlayerPrediction>>
where
    F: Fn(&PlayerFeatures) -> anyhow::Result<f64>,
{
    let players = read_players(input)
        .with_context(|| format!("Failed to read players from {}", input.display()))?;

    players
        .iter()
        .map(|player| {
            let features = PlayerFeatures::from(player);
            let predicted = predict(&features)
                .with_context(|| format!("Prediction failed for {}", player.path))?;
            Ok(PlayerPrediction {
                path: player.path.clone(),
                kill_death_ratio: features.kill_death_ratio,
                hs: features.hs,
                adr: features.adr,
                rounds: features.rounds,
                observed_win_rate: player.win_rate(),
                predicted_win_rate: predicted,
            })
        })
        .collect()
}

/// Print predictions in table format, best first.
fn print_table(predictions: &[PlayerPrediction]) {
    let mut sorted: Vec<_> = predictions.iter().collect();
    sorted.sort_by(|a, b| b.predicted_win_rate.total_cmp(&a.predicted_win_rate));

    println!(
        "{:<32} {:>6} {:>6} {:>6} {:>7} {:>9} {:>9}",
        "player", "k/d", "hs%", "adr", "rounds", "observed", "predicted"
    );
    for p in sorted {
        let observed = p
            .observed_win_rate
            .map(|w| format!("{:.2}%", w * 100.0))
            .unwrap_or_else(|| "-".to_string());
        println!(
            "{:<32} {:>6.2} {:>6.1} {:>6.1} {:>7} {:>9} {:>8.2}%",
            p.path,
            p.kill_death_ratio,
            p.hs,
            p.adr,
            p.rounds,
            observed,
            p.predicted_win_rate * 100.0
        );
    }
}

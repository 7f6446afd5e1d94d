//! Configuration for the scraper and the prediction API.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, ScrapeError};

/// Scraper configuration: site endpoints, browser and output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_archive_path")]
    pub archive_path: String,
    #[serde(default = "default_results_path")]
    pub results_path: String,
    #[serde(default = "default_match_path")]
    pub match_path: String,
    #[serde(default = "default_player_path")]
    pub player_path: String,
    /// Fixed wait after every navigation, in seconds
    #[serde(default = "default_delay_secs")]
    pub delay_secs: f64,
    /// Upper bound sent with the archive query
    #[serde(default = "default_prize_max")]
    pub prize_max: u64,
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_headless")]
    pub headless: bool,
    #[serde(default)]
    pub chrome_executable: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    "https://www.hltv.org".to_string()
}

fn default_archive_path() -> String {
    "events/archive".to_string()
}

fn default_results_path() -> String {
    "results".to_string()
}

fn default_match_path() -> String {
    "matches".to_string()
}

fn default_player_path() -> String {
    "stats/players".to_string()
}

fn default_delay_secs() -> f64 {
    5.0
}

fn default_prize_max() -> u64 {
    2_000_000
}

fn default_output_path() -> String {
    "data/raw_data/raw_data.csv".to_string()
}

fn default_headless() -> bool {
    true
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            archive_path: default_archive_path(),
            results_path: default_results_path(),
            match_path: default_match_path(),
            player_path: default_player_path(),
            delay_secs: default_delay_secs(),
            prize_max: default_prize_max(),
            output_path: default_output_path(),
            headless: default_headless(),
            chrome_executable: None,
            user_agent: None,
        }
    }
}

impl ScraperConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.delay_secs)
    }

    /// Endpoint templates consumed by the scraper
    pub fn endpoints(&self) -> Endpoints {
        Endpoints {
            archive: self.archive_path.clone(),
            results: self.results_path.clone(),
            match_detail: self.match_path.clone(),
            player: self.player_path.clone(),
        }
    }
}

/// Named page paths, relative to the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub archive: String,
    pub results: String,
    pub match_detail: String,
    pub player: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        ScraperConfig::default().endpoints()
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_model_path")]
    pub path: String,
}

fn default_model_path() -> String {
    "models/winrates.json".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: default_model_path(),
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub model: ModelConfig,
}

impl AppConfig {
    /// Load configuration from defaults, a config file and the environment.
    ///
    /// Without an explicit path, `config.{toml,json,yaml}` in the working
    /// directory is used if present.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name("config").required(false),
        };

        let config = config::Config::builder()
            // Start with defaults
            .add_source(config::Config::try_from(&AppConfig::default())?)
            .add_source(file)
            // Override with environment variables (HLTV__SCRAPER__DELAY_SECS, etc.)
            .add_source(
                config::Environment::with_prefix("HLTV")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would only fail later, mid-run.
    pub fn validate(&self) -> Result<()> {
        let scraper = &self.scraper;

        url::Url::parse(&scraper.base_url).map_err(|e| {
            ScrapeError::Config(format!("invalid base_url '{}': {}", scraper.base_url, e))
        })?;

        if !scraper.delay_secs.is_finite() || scraper.delay_secs < 0.0 {
            return Err(ScrapeError::Config(format!(
                "delay_secs must be a non-negative number, got {}",
                scraper.delay_secs
            )));
        }

        let paths = [
            ("archive_path", &scraper.archive_path),
            ("results_path", &scraper.results_path),
            ("match_path", &scraper.match_path),
            ("player_path", &scraper.player_path),
            ("output_path", &scraper.output_path),
        ];
        for (name, value) in paths {
            if value.trim().is_empty() {
                return Err(ScrapeError::Config(format!("{} must not be empty", name)));
            }
        }

        Ok(())
    }
}

//! Error taxonomy for the scrape pipeline.

use std::fmt;

use thiserror::Error;

pub type Result<T> = core::result::Result<T, ScrapeError>;

/// Page shapes the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    EventArchive,
    EventResults,
    MatchDetail,
    PlayerStats,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PageKind::EventArchive => "event archive",
            PageKind::EventResults => "event results",
            PageKind::MatchDetail => "match detail",
            PageKind::PlayerStats => "player stats",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Unexpected {page} markup: {detail}")]
    Markup { page: PageKind, detail: String },

    #[error("Malformed player file, line {line}: {detail}")]
    Format { line: usize, detail: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Io Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Csv Error: {0}")]
    Csv(#[from] csv::Error),
}

impl ScrapeError {
    pub fn markup(page: PageKind, detail: impl Into<String>) -> Self {
        ScrapeError::Markup {
            page,
            detail: detail.into(),
        }
    }

    /// Errors scoped to a single event, match or player. Everything else
    /// invalidates the whole run.
    pub fn is_item_level(&self) -> bool {
        matches!(
            self,
            ScrapeError::Navigation { .. } | ScrapeError::Markup { .. }
        )
    }
}

impl From<config::ConfigError> for ScrapeError {
    fn from(value: config::ConfigError) -> Self {
        ScrapeError::Config(value.to_string())
    }
}

//! Web scraper for hltv.org
//!
//! Provides browser automation, HTML parsing, and the event/match/player
//! aggregation pipeline.

pub mod aggregator;
pub mod browser;
pub mod client;
pub mod fetcher;
pub mod parsers;
pub mod player;

pub use aggregator::{Aggregator, FailurePolicy, ScrapeOutcome};
pub use browser::Browser;
pub use client::{EventQuery, HltvClient};
pub use fetcher::PageFetcher;
pub use player::PlayerRecord;

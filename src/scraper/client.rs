//! HLTV page client: one method per page type, fetch then parse.

use chrono::NaiveDate;

use crate::config::Endpoints;
use crate::error::Result;
use crate::scraper::fetcher::{PageFetcher, PageSource};
use crate::scraper::parsers::{
    EventArchiveParser, EventResultsParser, MatchDetailParser, PlayerStatsParser,
};
use crate::scraper::player::{MatchObservation, PlayerStats};

/// Archive query: events between two dates with a prize pool in range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub prize_min: u64,
    pub prize_max: u64,
}

impl EventQuery {
    fn params(&self) -> [(&'static str, String); 4] {
        [
            ("startDate", self.start_date.format("%Y-%m-%d").to_string()),
            ("endDate", self.end_date.format("%Y-%m-%d").to_string()),
            ("prizeMin", self.prize_min.to_string()),
            ("prizeMax", self.prize_max.to_string()),
        ]
    }
}

pub struct HltvClient<S> {
    fetcher: PageFetcher<S>,
    endpoints: Endpoints,
}

impl<S: PageSource> HltvClient<S> {
    pub fn new(fetcher: PageFetcher<S>, endpoints: Endpoints) -> Self {
        Self { fetcher, endpoints }
    }

    /// Ids of events in the archive matching `query`
    pub async fn events(&self, query: &EventQuery) -> Result<Vec<String>> {
        let html = self
            .fetcher
            .fetch(&self.endpoints.archive, &query.params())
            .await?;
        EventArchiveParser::parse(&html)
    }

    /// Match paths (`<id>/<slug>`) played at an event
    pub async fn event_matches(&self, event_id: &str) -> Result<Vec<String>> {
        let html = self
            .fetcher
            .fetch(&self.endpoints.results, &[("event", event_id.to_string())])
            .await?;
        EventResultsParser::parse(&html)
    }

    /// Every player in a match with maps won/lost
    pub async fn match_players(&self, match_path: &str) -> Result<Vec<MatchObservation>> {
        let path = format!("{}/{}", self.endpoints.match_detail, match_path);
        let html = self.fetcher.fetch(&path, &[]).await?;
        MatchDetailParser::parse(&html)
    }

    /// Career stats for one player
    pub async fn player_stats(&self, player_path: &str) -> Result<PlayerStats> {
        let path = format!("{}/{}", self.endpoints.player, player_path);
        let html = self.fetcher.fetch(&path, &[]).await?;
        PlayerStatsParser::parse(&html)
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &PageFetcher<S> {
        &self.fetcher
    }

    pub fn into_source(self) -> S {
        self.fetcher.into_source()
    }
}

//! Walks events -> matches -> players, merges win/loss and enriches each
//! unique player with stats.

use std::fmt;
use tracing::{info, warn};

use crate::error::{Result, ScrapeError};
use crate::scraper::client::{EventQuery, HltvClient};
use crate::scraper::fetcher::PageSource;
use crate::scraper::player::{PlayerLedger, PlayerRecord};

/// What to do when a single event, match or player fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log the item, leave it out, keep going
    #[default]
    SkipAndLog,
    /// Stop the run on the first failure
    Abort,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Event,
    Match,
    Player,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemKind::Event => "event",
            ItemKind::Match => "match",
            ItemKind::Player => "player",
        })
    }
}

/// An item left out of the results and why
#[derive(Debug, Clone)]
pub struct SkippedItem {
    pub kind: ItemKind,
    pub id: String,
    pub reason: String,
}

/// Result of a full aggregation run
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub players: Vec<PlayerRecord>,
    pub skipped: Vec<SkippedItem>,
    pub events: usize,
    pub matches: usize,
}

pub struct Aggregator<'a, S> {
    client: &'a HltvClient<S>,
    policy: FailurePolicy,
}

impl<'a, S: PageSource> Aggregator<'a, S> {
    pub fn new(client: &'a HltvClient<S>, policy: FailurePolicy) -> Self {
        Self { client, policy }
    }

    pub async fn run(&self, query: &EventQuery) -> Result<ScrapeOutcome> {
        let mut outcome = ScrapeOutcome::default();

        let ledger = self.collect(query, &mut outcome).await?;
        info!(
            "Collected {} unique players from {} matches in {} events",
            ledger.len(),
            outcome.matches,
            outcome.events
        );

        outcome.players = self.enrich(ledger, &mut outcome.skipped).await?;
        info!(
            "Enriched {} players ({} items skipped)",
            outcome.players.len(),
            outcome.skipped.len()
        );

        Ok(outcome)
    }

    /// Merge every player observation from every match of every event.
    pub async fn collect(
        &self,
        query: &EventQuery,
        outcome: &mut ScrapeOutcome,
    ) -> Result<PlayerLedger> {
        // Without the archive there is nothing to walk
        let events = self.client.events(query).await?;
        info!(
            "Found {} events between {} and {}",
            events.len(),
            query.start_date,
            query.end_date
        );

        let mut ledger = PlayerLedger::new();

        for event_id in &events {
            let matches = match self.client.event_matches(event_id).await {
                Ok(m) => m,
                Err(e) => {
                    self.contain(ItemKind::Event, event_id, e, &mut outcome.skipped)?;
                    continue;
                }
            };
            outcome.events += 1;
            info!("Event {}: {} matches", event_id, matches.len());

            for match_path in &matches {
                match self.client.match_players(match_path).await {
                    Ok(players) => {
                        outcome.matches += 1;
                        for obs in &players {
                            ledger.record(obs);
                        }
                    }
                    Err(e) => {
                        self.contain(ItemKind::Match, match_path, e, &mut outcome.skipped)?
                    }
                }
            }
        }

        Ok(ledger)
    }

    /// Fetch stats once per unique player and finalize the records.
    pub async fn enrich(
        &self,
        ledger: PlayerLedger,
        skipped: &mut Vec<SkippedItem>,
    ) -> Result<Vec<PlayerRecord>> {
        let tallies = ledger.into_tallies();
        let mut records = Vec::with_capacity(tallies.len());

        for (i, tally) in tallies.into_iter().enumerate() {
            match self.client.player_stats(&tally.path).await {
                Ok(stats) => records.push(tally.finalize(stats)),
                Err(e) => self.contain(ItemKind::Player, &tally.path, e, skipped)?,
            }
            if (i + 1) % 50 == 0 {
                info!("Enriched {} players so far", i + 1);
            }
        }

        Ok(records)
    }

    /// Apply the failure policy to an item error.
    fn contain(
        &self,
        kind: ItemKind,
        id: &str,
        err: ScrapeError,
        skipped: &mut Vec<SkippedItem>,
    ) -> Result<()> {
        if self.policy == FailurePolicy::Abort || !err.is_item_level() {
            return Err(err);
        }
        warn!("Skipping {} {}: {}", kind, id, err);
        skipped.push(SkippedItem {
            kind,
            id: id.to_string(),
            reason: err.to_string(),
        });
        Ok(())
    }
}

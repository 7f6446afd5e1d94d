//! Player records: per-match observations, merged tallies and finalized rows.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One player's result in one match, as maps (or a single bo1 map) won and lost.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchObservation {
    pub path: String,
    pub win: u32,
    pub loss: u32,
}

/// Win/loss accumulated across every match a player appeared in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerTally {
    pub path: String,
    pub win: u32,
    pub loss: u32,
}

impl PlayerTally {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            win: 0,
            loss: 0,
        }
    }

    /// Add another observation of the same player.
    pub fn absorb(&mut self, obs: &MatchObservation) {
        debug_assert_eq!(self.path, obs.path);
        self.win += obs.win;
        self.loss += obs.loss;
    }

    /// Attach the scraped stats, producing the record that gets written.
    pub fn finalize(self, stats: PlayerStats) -> PlayerRecord {
        PlayerRecord {
            path: self.path,
            win: self.win,
            loss: self.loss,
            stats,
        }
    }
}

/// Career stats from the player's stats page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub kills: u32,
    pub deaths: u32,
    /// Headshot percentage, e.g. 47.3
    pub headshot: f64,
    /// Average damage per round
    pub adr: f64,
    pub rounds: u32,
}

/// A fully enriched player, one row of the output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub path: String,
    pub win: u32,
    pub loss: u32,
    #[serde(flatten)]
    pub stats: PlayerStats,
}

impl PlayerRecord {
    pub fn kill_death_ratio(&self) -> f64 {
        if self.stats.deaths == 0 {
            self.stats.kills as f64
        } else {
            self.stats.kills as f64 / self.stats.deaths as f64
        }
    }

    /// Observed share of maps won, `None` without any maps.
    pub fn win_rate(&self) -> Option<f64> {
        let played = self.win + self.loss;
        (played > 0).then(|| self.win as f64 / played as f64)
    }
}

/// Keyed collection of tallies, iterated in first-seen order.
#[derive(Debug, Default)]
pub struct PlayerLedger {
    tallies: Vec<PlayerTally>,
    index: HashMap<String, usize>,
}

impl PlayerLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a new player or add to the existing totals.
    pub fn record(&mut self, obs: &MatchObservation) {
        match self.index.get(&obs.path) {
            Some(&i) => self.tallies[i].absorb(obs),
            None => {
                let mut tally = PlayerTally::new(obs.path.clone());
                tally.absorb(obs);
                self.index.insert(obs.path.clone(), self.tallies.len());
                self.tallies.push(tally);
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, path: &str) -> Option<&PlayerTally> {
        self.index.get(path).map(|&i| &self.tallies[i])
    }

    pub fn len(&self) -> usize {
        self.tallies.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.tallies.is_empty()
    }

    pub fn into_tallies(self) -> Vec<PlayerTally> {
        self.tallies
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(path: &str, win: u32, loss: u32) -> MatchObservation {
        MatchObservation {
            path: path.to_string(),
            win,
            loss,
        }
    }

    #[test]
    fn test_record_sums_win_loss() {
        let mut ledger = PlayerLedger::new();
        ledger.record(&obs("7998/s1mple", 2, 1));
        ledger.record(&obs("7998/s1mple", 0, 1));

        let tally = ledger.get("7998/s1mple").unwrap();
        assert_eq!((tally.win, tally.loss), (2, 2));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn test_merge_is_order_independent() {
        let observations = [
            obs("1/a", 1, 0),
            obs("2/b", 0, 1),
            obs("1/a", 2, 1),
            obs("1/a", 0, 2),
        ];

        let mut forward = PlayerLedger::new();
        observations.iter().for_each(|o| forward.record(o));

        let mut backward = PlayerLedger::new();
        observations.iter().rev().for_each(|o| backward.record(o));

        for path in ["1/a", "2/b"] {
            assert_eq!(forward.get(path), backward.get(path));
        }
        assert_eq!(forward.get("1/a").map(|t| (t.win, t.loss)), Some((3, 3)));
    }

    #[test]
    fn test_ledger_keeps_first_seen_order() {
        let mut ledger = PlayerLedger::new();
        ledger.record(&obs("3/c", 1, 0));
        ledger.record(&obs("1/a", 1, 0));
        ledger.record(&obs("3/c", 0, 1));
        ledger.record(&obs("2/b", 0, 1));

        let paths: Vec<_> = ledger.into_tallies().into_iter().map(|t| t.path).collect();
        assert_eq!(paths, vec!["3/c", "1/a", "2/b"]);
    }

    #[test]
    fn test_finalize_carries_totals() {
        let mut tally = PlayerTally::new("11893/zywoo");
        tally.absorb(&obs("11893/zywoo", 3, 1));

        let record = tally.finalize(PlayerStats {
            kills: 900,
            deaths: 600,
            headshot: 41.5,
            adr: 88.2,
            rounds: 1200,
        });

        assert_eq!(record.win, 3);
        assert_eq!(record.loss, 1);
        assert!((record.kill_death_ratio() - 1.5).abs() < 1e-9);
        assert_eq!(record.win_rate(), Some(0.75));
    }

    #[test]
    fn test_kill_death_ratio_without_deaths() {
        let record = PlayerTally::new("1/a").finalize(PlayerStats {
            kills: 12,
            deaths: 0,
            headshot: 0.0,
            adr: 0.0,
            rounds: 0,
        });
        assert_eq!(record.kill_death_ratio(), 12.0);
        assert_eq!(record.win_rate(), None);
    }
}

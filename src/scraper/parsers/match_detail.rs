//! Match page parser: team scores and the players on each side.
//!
//! URL: https://www.hltv.org/matches/<id>/<slug>
//!
//! Score markup:
//! <div class="team1-gradient"> ... <div class="won">2</div> </div>
//! <div class="team2-gradient"> ... <div class="lost">1</div> </div>

use scraper::{ElementRef, Html};

use super::{element_text, link_captures, parse_number, pattern, selector};
use crate::error::{PageKind, Result, ScrapeError};
use crate::scraper::player::MatchObservation;

const PAGE: PageKind = PageKind::MatchDetail;

/// A single map is played to 13 rounds; series scores never get there.
const BO1_ROUND_THRESHOLD: u32 = 13;

/// Normalize a pair of team scores to maps won/lost.
///
/// Best-of-1 pages show round scores in the same place a series shows map
/// scores, so any score at or above 13 collapses the pair to a single map
/// won by the higher side.
pub fn series_result(team1: u32, team2: u32) -> (u32, u32) {
    if team1 >= BO1_ROUND_THRESHOLD || team2 >= BO1_ROUND_THRESHOLD {
        if team1 > team2 {
            (1, 0)
        } else {
            (0, 1)
        }
    } else {
        (team1, team2)
    }
}

/// Parser for match detail pages
pub struct MatchDetailParser;

impl MatchDetailParser {
    /// Every player in the match with their side's maps won and lost.
    pub fn parse(html: &str) -> Result<Vec<MatchObservation>> {
        let document = Html::parse_document(html);

        let (score1, score2) = Self::parse_scores(&document)?;
        let (first, second) = series_result(score1, score2);
        let scores = [first, second];

        let content_selector = selector(PAGE, "div.stats-content#all-content")?;
        let content = document
            .select(&content_selector)
            .next()
            .ok_or_else(|| ScrapeError::markup(PAGE, "missing div.stats-content#all-content"))?;

        let table_selector = selector(PAGE, "table.totalstats")?;
        let tables: Vec<ElementRef<'_>> = content.select(&table_selector).collect();
        if tables.len() != 2 {
            return Err(ScrapeError::markup(
                PAGE,
                format!("expected 2 team stat tables, found {}", tables.len()),
            ));
        }

        let player_re = pattern(PAGE, r"/player/(\d+/[^?#/]+)")?;
        let mut observations: Vec<MatchObservation> = Vec::new();

        for (i, table) in tables.into_iter().enumerate() {
            for path in link_captures(PAGE, table, &player_re)? {
                // A player only plays for one side of one match
                if observations.iter().any(|o| o.path == path) {
                    continue;
                }
                observations.push(MatchObservation {
                    path,
                    win: scores[i],
                    loss: scores[(i + 1) % 2],
                });
            }
        }

        Ok(observations)
    }

    /// Raw scores of the two teams, in page order.
    fn parse_scores(document: &Html) -> Result<(u32, u32)> {
        let team_selector = selector(PAGE, "div.team1-gradient, div.team2-gradient")?;
        let score_selector = selector(PAGE, "div.won, div.lost")?;

        let teams: Vec<ElementRef<'_>> = document.select(&team_selector).take(2).collect();
        if teams.len() < 2 {
            return Err(ScrapeError::markup(
                PAGE,
                format!("expected 2 team result blocks, found {}", teams.len()),
            ));
        }

        let mut scores = [0u32; 2];
        for (i, team) in teams.iter().enumerate() {
            let score = team.select(&score_selector).next().ok_or_else(|| {
                ScrapeError::markup(PAGE, format!("team {} has no won/lost score", i + 1))
            })?;
            scores[i] = parse_number(PAGE, "team score", &element_text(score))?;
        }

        Ok((scores[0], scores[1]))
    }
}

//! Player stats page parser.
//!
//! URL: https://www.hltv.org/stats/players/<id>/<slug>
//!
//! The overview lists unlabelled-by-class `div.stats-row` elements, each
//! `<span>label</span><span>value</span>`. Fields are only identifiable by
//! position, so the layout is checked against the expected labels before
//! any value is read.

use scraper::{ElementRef, Html};

use super::{element_text, parse_number, parse_stat, selector};
use crate::error::{PageKind, Result, ScrapeError};
use crate::scraper::player::PlayerStats;

const PAGE: PageKind = PageKind::PlayerStats;

const KILLS_ROW: usize = 0;
const HEADSHOT_ROW: usize = 1;
const DEATHS_ROW: usize = 2;
const ADR_ROW: usize = 4;
const ROUNDS_ROW: usize = 7;

/// Row index and a keyword its label must contain
const STAT_LAYOUT: [(usize, &str); 5] = [
    (KILLS_ROW, "kills"),
    (HEADSHOT_ROW, "headshot"),
    (DEATHS_ROW, "deaths"),
    (ADR_ROW, "damage"),
    (ROUNDS_ROW, "rounds"),
];

const MIN_ROWS: usize = ROUNDS_ROW + 1;

/// Parser for player stats overview pages
pub struct PlayerStatsParser;

impl PlayerStatsParser {
    pub fn parse(html: &str) -> Result<PlayerStats> {
        let document = Html::parse_document(html);

        let row_selector = selector(PAGE, "div.stats-row")?;
        let span_selector = selector(PAGE, "span")?;

        let rows: Vec<Vec<String>> = document
            .select(&row_selector)
            .map(|row: ElementRef<'_>| row.select(&span_selector).map(element_text).collect())
            .collect();

        Self::validate_layout(&rows)?;

        let value = |row: usize| rows[row][1].as_str();
        Ok(PlayerStats {
            kills: parse_number(PAGE, "kills", value(KILLS_ROW))?,
            headshot: parse_stat(PAGE, "headshot", value(HEADSHOT_ROW))?,
            deaths: parse_number(PAGE, "deaths", value(DEATHS_ROW))?,
            adr: parse_stat(PAGE, "adr", value(ADR_ROW))?,
            rounds: parse_number(PAGE, "rounds", value(ROUNDS_ROW))?,
        })
    }

    fn validate_layout(rows: &[Vec<String>]) -> Result<()> {
        if rows.len() < MIN_ROWS {
            return Err(ScrapeError::markup(
                PAGE,
                format!("expected at least {} stat rows, found {}", MIN_ROWS, rows.len()),
            ));
        }

        for (index, keyword) in STAT_LAYOUT {
            let row = &rows[index];
            if row.len() < 2 {
                return Err(ScrapeError::markup(
                    PAGE,
                    format!("stat row {} has {} spans, expected 2", index, row.len()),
                ));
            }
            if !row[0].to_lowercase().contains(keyword) {
                return Err(ScrapeError::markup(
                    PAGE,
                    format!(
                        "stat row {} should be '{}' but is labelled '{}'",
                        index, keyword, row[0]
                    ),
                ));
            }
        }

        Ok(())
    }
}

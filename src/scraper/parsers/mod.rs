//! HTML parsers for HLTV pages.

pub mod events;
pub mod match_detail;
pub mod matches;
pub mod player_stats;

pub use events::EventArchiveParser;
pub use match_detail::MatchDetailParser;
pub use matches::EventResultsParser;
pub use player_stats::PlayerStatsParser;

use regex::Regex;
use scraper::{ElementRef, Selector};
use std::str::FromStr;

use crate::error::{PageKind, Result, ScrapeError};

fn selector(page: PageKind, css: &str) -> Result<Selector> {
    Selector::parse(css)
        .map_err(|e| ScrapeError::markup(page, format!("invalid selector '{}': {:?}", css, e)))
}

fn pattern(page: PageKind, re: &str) -> Result<Regex> {
    Regex::new(re).map_err(|e| ScrapeError::markup(page, format!("invalid pattern '{}': {}", re, e)))
}

/// First capture group of every matching link under `scope`, deduplicated,
/// in document order.
fn link_captures(
    page: PageKind,
    scope: ElementRef<'_>,
    href_re: &Regex,
) -> Result<Vec<String>> {
    let link_selector = selector(page, "a[href]")?;
    let mut found: Vec<String> = Vec::new();

    for link in scope.select(&link_selector) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        if let Some(caps) = href_re.captures(href) {
            let value = caps[1].to_string();
            if !found.contains(&value) {
                found.push(value);
            }
        }
    }

    Ok(found)
}

/// Parse a displayed number, tolerating thousands separators and a trailing `%`.
fn parse_number<T: FromStr>(page: PageKind, field: &str, text: &str) -> Result<T> {
    let cleaned: String = text
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    cleaned
        .parse()
        .map_err(|_| ScrapeError::markup(page, format!("{} is not a number: '{}'", field, text.trim())))
}

/// Like [`parse_number`] for stats that must be real values: `NaN` and
/// infinities are rejected.
fn parse_stat(page: PageKind, field: &str, text: &str) -> Result<f64> {
    let value: f64 = parse_number(page, field, text)?;
    if !value.is_finite() {
        return Err(ScrapeError::markup(
            page,
            format!("{} is not a finite number: '{}'", field, text.trim()),
        ));
    }
    Ok(value)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

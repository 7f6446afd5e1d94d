//! Event archive parser.
//!
//! URL: https://www.hltv.org/events/archive?startDate=..&endDate=..&prizeMin=..&prizeMax=..

use scraper::Html;

use super::{link_captures, pattern, selector};
use crate::error::{PageKind, Result, ScrapeError};

const PAGE: PageKind = PageKind::EventArchive;

/// Parser for the event archive listing
pub struct EventArchiveParser;

impl EventArchiveParser {
    /// Extract event ids (`/events/<id>/<slug>`) from the archive listing.
    pub fn parse(html: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(html);

        let container_selector = selector(PAGE, "div.events-page")?;
        let container = document
            .select(&container_selector)
            .next()
            .ok_or_else(|| ScrapeError::markup(PAGE, "missing div.events-page"))?;

        let event_re = pattern(PAGE, r"/events/(\d+)/")?;
        link_captures(PAGE, container, &event_re)
    }
}

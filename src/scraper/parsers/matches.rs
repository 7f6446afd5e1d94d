//! Event results parser.
//!
//! URL: https://www.hltv.org/results?event=<id>

use scraper::Html;

use super::{link_captures, pattern, selector};
use crate::error::{PageKind, Result, ScrapeError};

const PAGE: PageKind = PageKind::EventResults;

/// Parser for an event's results listing
pub struct EventResultsParser;

impl EventResultsParser {
    /// Extract match paths (`<id>/<slug>`) from `/matches/<id>/<slug>` links.
    pub fn parse(html: &str) -> Result<Vec<String>> {
        let document = Html::parse_document(html);

        let container_selector = selector(PAGE, "div.results-all")?;
        let container = document
            .select(&container_selector)
            .next()
            .ok_or_else(|| ScrapeError::markup(PAGE, "missing div.results-all"))?;

        let match_re = pattern(PAGE, r"/matches/(\d+/[^?#/]+)")?;
        link_captures(PAGE, container, &match_re)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_HTML: &str = r#"<!DOCTYPE html>
<html>
<body>
<div class="results">
  <div class="results-all">
    <div class="results-sublist">
      <div class="result-con">
        <a href="/matches/2370727/vitality-vs-mouz-iem-katowice-2024" class="a-reset">
          <div class="result">Vitality 2 - 1 MOUZ</div>
        </a>
      </div>
      <div class="result-con">
        <a href="/matches/2370726/faze-vs-spirit-iem-katowice-2024?from=results" class="a-reset">FaZe vs Spirit</a>
      </div>
      <a href="/team/4608/natus-vincere">Team</a>
    </div>
  </div>
</div>
</body>
</html>"#;

    #[test]
    fn test_parse_match_paths() {
        let paths = EventResultsParser::parse(SAMPLE_HTML).unwrap();
        assert_eq!(
            paths,
            vec![
                "2370727/vitality-vs-mouz-iem-katowice-2024",
                "2370726/faze-vs-spirit-iem-katowice-2024",
            ]
        );
    }

    #[test]
    fn test_duplicate_links_counted_once() {
        let html = r#"<div class="results-all">
            <a href="/matches/1/a-vs-b">x</a>
            <a href="/matches/1/a-vs-b">y</a>
        </div>"#;
        assert_eq!(EventResultsParser::parse(html).unwrap(), vec!["1/a-vs-b"]);
    }

    #[test]
    fn test_missing_container() {
        assert!(EventResultsParser::parse("<html><body></body></html>").is_err());
    }
}

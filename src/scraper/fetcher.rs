//! Page fetching: URL construction, navigation and the post-load delay.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::error::{Result, ScrapeError};

/// Something that can load a URL and hand back the rendered markup.
#[async_trait]
pub trait PageSource: Send + Sync + Sized {
    /// Load `url`, replacing the current page.
    async fn navigate(&self, url: &str) -> anyhow::Result<()>;

    /// Markup of the current page as rendered right now.
    async fn content(&self) -> anyhow::Result<String>;

    /// Release the underlying session.
    async fn close(self) -> anyhow::Result<()>;
}

/// Join `base` and `path` and append form-encoded `params`.
pub fn build_url(base: &str, path: &str, params: &[(&str, String)]) -> Result<Url> {
    let joined = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    let mut url = Url::parse(&joined)
        .map_err(|e| ScrapeError::Config(format!("cannot build URL from '{}': {}", joined, e)))?;

    if !params.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())));
    }

    Ok(url)
}

/// Fetches pages one at a time through a [`PageSource`], waiting a fixed
/// delay after each navigation for client-side rendering to settle.
pub struct PageFetcher<S> {
    source: S,
    base_url: String,
    delay: Duration,
}

impl<S: PageSource> PageFetcher<S> {
    pub fn new(source: S, base_url: impl Into<String>, delay: Duration) -> Result<Self> {
        let base_url = base_url.into();
        Url::parse(&base_url)
            .map_err(|e| ScrapeError::Config(format!("invalid base_url '{}': {}", base_url, e)))?;

        Ok(Self {
            source,
            base_url,
            delay,
        })
    }

    pub async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let url = build_url(&self.base_url, path, params)?;
        let url = url.as_str();
        debug!("Fetching {}", url);

        self.source
            .navigate(url)
            .await
            .map_err(|e| navigation_error(url, e))?;

        tokio::time::sleep(self.delay).await;

        self.source
            .content()
            .await
            .map_err(|e| navigation_error(url, e))
    }

    #[cfg(test)]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Give the source back, e.g. to close it.
    pub fn into_source(self) -> S {
        self.source
    }
}

fn navigation_error(url: &str, err: anyhow::Error) -> ScrapeError {
    ScrapeError::Navigation {
        url: url.to_string(),
        reason: format!("{:#}", err),
    }
}

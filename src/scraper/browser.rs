//! Browser automation using chromiumoxide.

use anyhow::Result;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as ChromeBrowser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tracing::{debug, info};

use crate::config::ScraperConfig;
use crate::scraper::fetcher::PageSource;

/// A single browser tab held for the whole scrape
pub struct Browser {
    browser: ChromeBrowser,
    page: Page,
    handle: tokio::task::JoinHandle<()>,
}

impl Browser {
    /// Launch a browser instance with one blank tab
    pub async fn launch(config: &ScraperConfig) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg("--no-first-run")
            .arg("--no-default-browser-check")
            .arg("--disable-extensions")
            .arg("--mute-audio")
            .window_size(1920, 1080);

        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(ref path) = config.chrome_executable {
            builder = builder.chrome_executable(path);
        }
        if let Some(ref ua) = config.user_agent {
            builder = builder.arg(format!("--user-agent={}", ua));
        }

        let browser_config = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build browser config: {}", e))?;

        let (browser, mut handler) = ChromeBrowser::launch(browser_config)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to launch browser: {}", e))?;

        // Spawn handler task - must keep running for browser to work
        let handle = tokio::spawn(async move {
            loop {
                match handler.next().await {
                    Some(Ok(_)) => continue,
                    Some(Err(_)) => continue, // Don't break on errors
                    None => break,
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create new page: {}", e))?;

        info!("Browser session started (headless: {})", config.headless);
        Ok(Self {
            browser,
            page,
            handle,
        })
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[async_trait]
impl PageSource for Browser {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.page
            .goto(url.to_string())
            .await
            .map_err(|e| anyhow::anyhow!("Failed to load page: {}", e))?;
        debug!("Loaded {}", url);
        Ok(())
    }

    async fn content(&self) -> Result<String> {
        self.page
            .content()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to get page content: {}", e))
    }

    /// Close the browser and stop the CDP handler
    async fn close(self) -> Result<()> {
        let mut session = self;
        let _ = session.page.clone().close().await;
        session
            .browser
            .close()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to close browser: {}", e))?;
        let _ = session.browser.wait().await;
        session.handle.abort();
        info!("Browser session closed");
        Ok(())
    }
}

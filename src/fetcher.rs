//! Page fetching.
//!
//! [`PageFetcher`] is the seam between the scraping logic and the network.
//! The discoverer, the crawl-policy check and the execution strategies only
//! see `dyn PageFetcher`; [`HttpFetcher`] is the real implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Instant;
use tracing::{debug, instrument, warn};

/// Retrieves the text of a page.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return its body decoded as text.
    async fn fetch_text(&self, url: &str) -> Result<String>;

    /// Fetch `url`, logging and swallowing any failure.
    async fn fetch(&self, url: &str) -> Option<String> {
        match self.fetch_text(url).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!(%url, error = %e, "Fetch failed");
                None
            }
        }
    }
}

/// [`PageFetcher`] backed by a `reqwest` client with a fixed user agent and timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    #[instrument(level = "debug", skip_all, fields(%url))]
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let t0 = Instant::now();
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        // The site serves UTF-8 but does not always say so in Content-Type.
        let bytes = response.bytes().await?;
        let text = String::from_utf8_lossy(&bytes).into_owned();
        debug!(
            bytes = bytes.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(text)
    }
}

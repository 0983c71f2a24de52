//! External headline feeds.
//!
//! [`FeedFetcher`] is the seam between the importer and the network; the
//! reqwest-backed implementation lives here and the RSS parsing and
//! item-to-headline mapping live in [`rss`].

pub mod rss;

pub use rss::{FeedItem, parse_channel, to_headline};

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while fetching or parsing a feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request error
    #[error("feed request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Feed endpoint answered with a non-success status
    #[error("feed returned status {status}")]
    Status { status: u16 },

    /// Response body was not a parseable RSS document
    #[error("feed XML parse error: {0}")]
    Parse(String),
}

/// Fetches the raw body of a league's feed URL.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FeedError>;
}

/// reqwest-backed [`FeedFetcher`].
pub struct HttpFeedFetcher {
    client: reqwest::Client,
}

impl HttpFeedFetcher {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl Default for HttpFeedFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FeedError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text().await?)
    }
}

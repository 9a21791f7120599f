use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

use super::parse;
use super::types::FeedDocument;

pub const DEFAULT_TIMEOUT_SECS: u64 = 20;
const USER_AGENT: &str = "gator";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("http status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
}

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError>;
}

/// Single GET per call, no retry. Redirects follow the client default.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<FeedDocument, FetchError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let xml = resp.bytes().await?;
        parse::parse_document(&xml).map_err(|e| FetchError::Parse(e.to_string()))
    }
}

#[cfg(test)]
pub use stub::StubFetcher;

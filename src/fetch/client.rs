// src/fetch/client.rs
use crate::fetch::models::RawDocument;
use crate::utils::error::FetchError;
use async_trait::async_trait;
use reqwest::header;
use std::time::Duration;

// Some sites (Wikipedia included) answer bare clients with 403
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Anything that can turn a URL into page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError>;
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Fetches pages over HTTP with a fixed timeout and User-Agent.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout) // Covers connect and body read
            .build()?;
        Ok(Self { client, config })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    /// Downloads a page. Only a 200 response counts as success.
    async fn fetch(&self, url: &str) -> Result<RawDocument, FetchError> {
        tracing::info!("Downloading page from: {}", url);
        tracing::debug!(
            "Using User-Agent: {} (timeout {:?})",
            self.config.user_agent,
            self.config.timeout
        );

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "text/html,application/xhtml+xml,*/*")
            .send()
            .await?; // Propagates reqwest::Error as FetchError::Network

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::error!("HTTP error status: {} for URL: {}", status, url);
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let html = response.text().await?;
        tracing::debug!("Successfully downloaded {} bytes from {}", html.len(), url);

        Ok(RawDocument {
            url: url.to_string(),
            html,
        })
    }
}

//! HTTP access to the stats service.

use crate::errors::FetchError;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// The three read-only endpoints the dashboard polls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Stats,
    Globals,
    Hofs,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Endpoint::Stats => "/api/stats",
            Endpoint::Globals => "/api/globals",
            Endpoint::Hofs => "/api/hofs",
        }
    }

    /// Request path including the optional record limit
    pub fn request_path(self, record_limit: Option<usize>) -> String {
        match (self, record_limit) {
            (Endpoint::Globals | Endpoint::Hofs, Some(limit)) => {
                format!("{}?limit={}", self.path(), limit)
            }
            _ => self.path().to_string(),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Endpoint::Stats => "stats",
            Endpoint::Globals => "globals",
            Endpoint::Hofs => "HOFs",
        };
        f.write_str(name)
    }
}

/// GET capability used by the refresh cycle
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Fetch the body at `path` (relative to the service root)
    async fn fetch(&self, path: &str) -> Result<String, FetchError>;
}

/// `Fetch` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Create a fetcher for `base_url`, with an optional per-request timeout
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(url = %url, "Fetching");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                endpoint: path.to_string(),
            });
        }
        Ok(response.text().await?)
    }
}

//! One-shot HTTP fetches for the `curl` command.
//!
//! The shell only ever wants a body as text. Status codes are not treated
//! as failures: an error page is still output worth printing. Only
//! transport-level problems (DNS, refused connection, timeout) surface as
//! errors.

use std::time::Duration;

use async_trait::async_trait;
use scenesh_types::error::{Result, ShellError};

/// How long a single fetch may take before it is abandoned.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches a URL and returns the response body as text.
#[async_trait]
pub trait HttpFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

/// Production fetcher backed by a shared `reqwest` client.
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| ShellError::Transport(format!("client setup: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpFetcher for HttpClient {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ShellError::Transport(format!("{url}: {e}")))?;
        response
            .text()
            .await
            .map_err(|e| ShellError::Transport(format!("{url}: {e}")))
    }
}

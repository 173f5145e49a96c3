//! Joke fetching from the configured HTTP endpoint.

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

/// Characters dropped from the start of the raw response body.
pub const CUT_JOKE_LEFT: usize = 12;
/// Characters dropped from the end of the raw response body.
pub const CUT_JOKE_RIGHT: usize = 2;

/// Something that can produce a joke on demand.
#[async_trait]
pub trait JokeSource: Send + Sync {
    async fn fetch_joke(&self) -> Result<String, FetchError>;
}

/// Extracts the joke from a raw endpoint body.
///
/// The endpoint wraps each joke in a fixed-width envelope, so the joke is
/// whatever remains after dropping `CUT_JOKE_LEFT` characters from the front
/// and `CUT_JOKE_RIGHT` from the back. This is not a parser: if the endpoint
/// ever changes its envelope the output will be garbage. Bodies too short to
/// hold the envelope produce an empty joke.
pub fn trim_joke_body(raw: &str) -> String {
    let len = raw.chars().count();
    let end = len.saturating_sub(CUT_JOKE_RIGHT);
    if end <= CUT_JOKE_LEFT {
        return String::new();
    }
    raw.chars().skip(CUT_JOKE_LEFT).take(end - CUT_JOKE_LEFT).collect()
}

/// HTTP-backed joke source. One GET per joke, no retries.
pub struct JokeFetcher {
    endpoint: Url,
    http: reqwest::Client,
}

impl JokeFetcher {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl JokeSource for JokeFetcher {
    async fn fetch_joke(&self) -> Result<String, FetchError> {
        let response = self
            .http
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;
        debug!("Fetched {} byte joke body", body.len());

        Ok(trim_joke_body(&body))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport failure: DNS, connect, TLS, timeout.
    Http(String),
    /// Non-success HTTP status.
    Status(u16),
    /// The body could not be read or decoded.
    Body(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Http(e) => write!(f, "API request failed: {e}"),
            FetchError::Status(code) => write!(f, "API returned status {code}"),
            FetchError::Body(e) => write!(f, "API response unreadable: {e}"),
        }
    }
}

impl std::error::Error for FetchError {}

//! HTTP client for the SondeHub v2 API.

use reqwest::StatusCode;
use std::time::Instant;
use thiserror::Error;

/// Resource path for recovery reports.
pub const RECOVERED_PATH: &str = "recovered";

/// Failure to obtain a response body from the upstream API.
///
/// No retries happen at this layer; a failure is final for the call.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{kind} error '{status}' for url '{url}'")]
    Status {
        kind: &'static str,
        status: StatusCode,
        url: String,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    fn from_status(status: StatusCode, url: String) -> Self {
        let kind = if status.is_client_error() {
            "Client"
        } else if status.is_server_error() {
            "Server"
        } else {
            "Unexpected"
        };
        FetchError::Status { kind, status, url }
    }

    /// Upstream status code, when the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            FetchError::Transport(e) => e.status(),
        }
    }
}

#[derive(Clone)]
pub struct SondeHubClient {
    base_url: String,
    http: reqwest::Client,
}

impl SondeHubClient {
    /// Build a client for `base_url` with a crate-identifying user agent.
    ///
    /// No request timeout is configured; calls wait on the network layer's
    /// own limits.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http(base_url, http))
    }

    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            http,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Join the base URL and a resource path with exactly one `/`.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET `path` and return the body as text.
    ///
    /// Any 4xx/5xx status is reported as [`FetchError::Status`]; network
    /// failures surface as [`FetchError::Transport`].
    pub async fn fetch(&self, path: &str) -> Result<String, FetchError> {
        let url = self.url(path);
        let start = Instant::now();

        let result = self.send(&url).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;
        metrics::histogram!("upstream_fetch_latency_ms").record(elapsed_ms as f64);

        match result {
            Ok((status, body)) => {
                tracing::debug!(
                    url = %url,
                    status = status.as_u16(),
                    elapsed_ms,
                    bytes = body.len(),
                    "Upstream fetch completed"
                );
                Ok(body)
            }
            Err(e) => {
                metrics::counter!("upstream_fetch_failures_total").increment(1);
                tracing::warn!(
                    url = %url,
                    status = e.status().map(|s| s.as_u16()),
                    elapsed_ms,
                    error = %e,
                    "Upstream fetch failed"
                );
                Err(e)
            }
        }
    }

    /// Latest recovery reports, as raw JSON text.
    pub async fn recovered(&self) -> Result<String, FetchError> {
        self.fetch(RECOVERED_PATH).await
    }

    /// Perform the GET, returning the upstream status alongside the body.
    async fn send(&self, url: &str) -> Result<(StatusCode, String), FetchError> {
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(FetchError::from_status(status, url.to_string()));
        }
        Ok((status, resp.text().await?))
    }
}

use crate::client::SondeHubClient;
use crate::config::Config;
use crate::error::Result;

/// Application state shared across all request handlers.
/// Nothing in here is mutated per request; each tool call is independent.
pub struct AppState {
    pub client: SondeHubClient,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let client = SondeHubClient::new(config.api_base)?;

        tracing::info!(api_base = %client.base_url(), "SondeHub client initialized");

        Ok(Self { client })
    }
}

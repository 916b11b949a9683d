use crate::config::HarvestConfig;
use crate::error::{Error, Result};
use reqwest::Client;

/// Builds the HTTP client for one discovery or retrieval call.
///
/// A fresh client is created per call so no connection pool outlives it.
pub fn build_client(config: &HarvestConfig) -> Result<Client> {
    ::log::trace!(
        "Building HTTP client (timeout {}s, connect timeout {}s)",
        config.request_timeout_secs,
        config.connect_timeout_secs
    );

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .build()
        .map_err(Error::Client)
}

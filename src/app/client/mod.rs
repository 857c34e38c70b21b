//! HTTP client for retrieving the master playlist
//!
//! Failing to fetch the master playlist is the one network failure that ends
//! the run: without a complete parse there is nothing meaningful to write.
//!
//! The module is organized into:
//! - `config`: HTTP client configuration and building

use reqwest::Client;
use tracing::{debug, info};
use url::Url;

use crate::errors::{FetchError, FetchResult};

pub mod config;

pub use config::ClientConfig;

/// Shared HTTP client used for the master fetch and all probes
#[derive(Debug, Clone)]
pub struct PlaylistClient {
    client: Client,
    config: ClientConfig,
}

impl PlaylistClient {
    /// Creates a client with default settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError::ClientBuild` if the TLS backend cannot be initialised
    pub fn new() -> FetchResult<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Creates a client with custom configuration
    pub fn with_config(config: ClientConfig) -> FetchResult<Self> {
        let client = config.build_http_client()?;
        Ok(Self { client, config })
    }

    /// Downloads the master playlist as text
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if:
    /// - The URL cannot be parsed
    /// - The request fails or times out
    /// - The server answers with a non-success status
    pub async fn fetch_master(&self, url: &str) -> FetchResult<String> {
        let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl {
            url: url.to_string(),
            error: e.to_string(),
        })?;

        info!("Downloading master playlist from {}", parsed);

        let response = self
            .client
            .get(parsed.as_str())
            .timeout(self.config.master_timeout)
            .send()
            .await
            .map_err(|source| FetchError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await.map_err(|source| FetchError::Http {
            url: url.to_string(),
            source,
        })?;

        debug!("Fetched master playlist: {} bytes", text.len());
        Ok(text)
    }

    /// Get a reference to the underlying HTTP client
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

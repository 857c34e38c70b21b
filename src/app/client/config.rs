//! HTTP client configuration and building logic
//!
//! One `reqwest::Client` is shared by the master fetch and every probe so
//! connections to popular CDNs are pooled. The client carries no global
//! timeout; each request sets its own deadline.

use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::http;
use crate::errors::{FetchError, FetchResult};

/// Configuration for the shared HTTP client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// User agent sent with every request
    pub user_agent: String,
    /// Deadline for fetching the master playlist
    #[serde(with = "humantime_serde")]
    pub master_timeout: Duration,
    /// Connect timeout
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    /// Connection pool idle timeout
    #[serde(with = "humantime_serde")]
    pub pool_idle_timeout: Duration,
    /// Maximum idle connections kept per host
    pub pool_max_per_host: usize,
    /// Redirects followed before the request is treated as a loop
    pub max_redirects: usize,
    /// TCP nodelay (disable Nagle's algorithm)
    pub tcp_nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: http::USER_AGENT.to_string(),
            master_timeout: http::MASTER_TIMEOUT,
            connect_timeout: http::CONNECT_TIMEOUT,
            pool_idle_timeout: http::POOL_IDLE_TIMEOUT,
            pool_max_per_host: http::POOL_MAX_PER_HOST,
            max_redirects: http::MAX_REDIRECTS,
            tcp_nodelay: true,
        }
    }
}

impl ClientConfig {
    /// Builds the HTTP client with the specified configuration
    pub fn build_http_client(&self) -> FetchResult<Client> {
        Client::builder()
            .user_agent(self.user_agent.as_str())
            .connect_timeout(self.connect_timeout)
            .pool_idle_timeout(self.pool_idle_timeout)
            .pool_max_idle_per_host(self.pool_max_per_host)
            .redirect(Policy::limited(self.max_redirects))
            .tcp_nodelay(self.tcp_nodelay)
            .build()
            .map_err(FetchError::ClientBuild)
    }
}

//! Stream validator
//!
//! One bounded GET per candidate URL. The request asks for the first few KiB
//! only and carries its own deadline, so a slow or hostile server costs one
//! worker at most `timeout` and at most `range_end + 1` bytes of body.
//!
//! Decision order:
//! 1. unparseable URL → drop (`invalid url`)
//! 2. non-2xx status → drop (`bad status`)
//! 3. HLS content type → keep (`content-type match`)
//! 4. body prefix contains `#EXTM3U` → keep (`body marker match`)
//! 5. path ends in `.m3u8` → keep (`extension fallback`)
//! 6. otherwise → drop (`no signal`)
//!
//! Any transport failure, including timeouts and redirect loops, becomes a
//! drop with reason `network error`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, RANGE};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::app::models::{ProbeOutcome, VerdictReason};
use crate::constants::probe;

/// Anything that can turn a stream URL into a keep/drop outcome
#[async_trait]
pub trait StreamProbe: Send + Sync {
    /// Probe one URL; never fails, failures are encoded in the outcome
    async fn probe(&self, url: &str) -> ProbeOutcome;
}

/// Budgets for a single probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Deadline from request start to end of body read
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,
    /// Last byte offset requested (inclusive), `bytes=0-<range_end>`
    pub range_end: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: probe::DEFAULT_TIMEOUT,
            range_end: probe::DEFAULT_RANGE_END,
        }
    }
}

impl ProbeConfig {
    /// Value of the `Range` request header
    pub fn range_header(&self) -> String {
        format!("bytes=0-{}", self.range_end)
    }

    /// Maximum number of body bytes read, even if the server ignores the range
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.range_end.saturating_add(1)).unwrap_or(usize::MAX)
    }
}

/// HTTP implementation of [`StreamProbe`]
#[derive(Debug, Clone)]
pub struct StreamValidator {
    client: Client,
    config: ProbeConfig,
}

impl StreamValidator {
    /// Create a validator sharing an existing HTTP client
    pub fn new(client: Client, config: ProbeConfig) -> Self {
        Self { client, config }
    }

    /// Get the probe configuration
    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    /// Validate one stream URL
    pub async fn validate(&self, url: &str) -> ProbeOutcome {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Rejecting unparseable URL {}: {}", url, e);
                return ProbeOutcome::new(VerdictReason::InvalidUrl, None);
            }
        };

        match self.request(&parsed).await {
            Ok(outcome) => outcome,
            Err(e) if e.is_timeout() => {
                debug!("Probe timed out after {:?}: {}", self.config.timeout, url);
                ProbeOutcome::new(VerdictReason::NetworkError, None)
            }
            Err(e) => {
                debug!("Probe failed for {}: {}", url, e);
                ProbeOutcome::new(VerdictReason::NetworkError, e.status().map(|s| s.as_u16()))
            }
        }
    }

    async fn request(&self, url: &Url) -> Result<ProbeOutcome, reqwest::Error> {
        let mut response = self
            .client
            .get(url.as_str())
            .header(RANGE, self.config.range_header())
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);

        // Status and content type decide without touching the body
        if !response.status().is_success() || is_hls_content_type(content_type.as_deref()) {
            let reason = classify_response(status, content_type.as_deref(), &[], url);
            return Ok(ProbeOutcome::new(reason, Some(status)));
        }

        let body = read_prefix(&mut response, self.config.body_limit()).await?;
        let reason = classify_response(status, content_type.as_deref(), &body, url);
        Ok(ProbeOutcome::new(reason, Some(status)))
    }
}

#[async_trait]
impl StreamProbe for StreamValidator {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        self.validate(url).await
    }
}

/// Read at most `limit` bytes of the body, stopping early once reached
async fn read_prefix(response: &mut Response, limit: usize) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();
    while body.len() < limit {
        match response.chunk().await? {
            Some(chunk) => body.extend_from_slice(&chunk),
            None => break,
        }
    }
    body.truncate(limit);
    Ok(body)
}

/// Classify a received response
///
/// `body` is whatever prefix of the body was read; it is ignored when the
/// status or content type already decide the outcome.
pub fn classify_response(
    status: u16,
    content_type: Option<&str>,
    body: &[u8],
    url: &Url,
) -> VerdictReason {
    if !(200..300).contains(&status) {
        VerdictReason::BadStatus
    } else if is_hls_content_type(content_type) {
        VerdictReason::ContentTypeMatch
    } else if contains_marker(body) {
        VerdictReason::BodyMarkerMatch
    } else if has_manifest_extension(url) {
        VerdictReason::ExtensionFallback
    } else {
        VerdictReason::NoSignal
    }
}

/// Whether a `Content-Type` header names an HLS playlist
pub fn is_hls_content_type(content_type: Option<&str>) -> bool {
    let Some(value) = content_type else {
        return false;
    };
    let essence = value.split(';').next().unwrap_or("").trim();
    probe::HLS_CONTENT_TYPES
        .iter()
        .any(|candidate| essence.eq_ignore_ascii_case(candidate))
}

/// Whether the body prefix contains the playlist marker
pub fn contains_marker(body: &[u8]) -> bool {
    let marker = probe::MANIFEST_MARKER.as_bytes();
    body.windows(marker.len()).any(|window| window == marker)
}

/// Whether the URL path ends in `.m3u8`
pub fn has_manifest_extension(url: &Url) -> bool {
    url.path()
        .to_ascii_lowercase()
        .ends_with(probe::MANIFEST_EXTENSION)
}

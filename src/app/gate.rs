//! URL gate and seen-set
//!
//! The gate runs before any network call. A URL that passes is inserted into
//! the seen-set inside the same critical section as the duplicate check, so
//! two workers racing on the same URL can never both be admitted.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use tokio::sync::Mutex;

/// Why the gate refused a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GateRejection {
    /// Directive had no URL line
    Empty,
    /// Scheme is not `http` or `https`
    UnsupportedScheme,
    /// URL was already admitted earlier in this run
    Duplicate,
}

impl fmt::Display for GateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GateRejection::Empty => "empty url",
            GateRejection::UnsupportedScheme => "unsupported scheme",
            GateRejection::Duplicate => "duplicate",
        };
        f.pad(text)
    }
}

/// Gate decision for one URL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// URL is new and has been recorded; probe it
    Admitted,
    /// URL must not be probed
    Rejected(GateRejection),
}

impl GateDecision {
    pub fn is_admitted(&self) -> bool {
        matches!(self, GateDecision::Admitted)
    }
}

/// Concurrency-safe duplicate and syntax filter shared by all workers
#[derive(Debug, Default)]
pub struct UrlGate {
    seen: Mutex<HashSet<String>>,
}

impl UrlGate {
    /// Create a gate with an empty seen-set
    pub fn new() -> Self {
        Self::default()
    }

    /// Decide whether `url` should be probed, recording it if so
    pub async fn admit(&self, url: &str) -> GateDecision {
        if url.is_empty() {
            return GateDecision::Rejected(GateRejection::Empty);
        }

        if !has_http_scheme(url) {
            return GateDecision::Rejected(GateRejection::UnsupportedScheme);
        }

        let mut seen = self.seen.lock().await;
        if seen.insert(url.to_string()) {
            GateDecision::Admitted
        } else {
            GateDecision::Rejected(GateRejection::Duplicate)
        }
    }

    /// Whether `url` has already been admitted
    pub async fn contains(&self, url: &str) -> bool {
        self.seen.lock().await.contains(url)
    }

    /// Number of URLs admitted so far
    pub async fn seen_count(&self) -> usize {
        self.seen.lock().await.len()
    }

    /// Copy of the seen-set
    pub async fn snapshot(&self) -> HashSet<String> {
        self.seen.lock().await.clone()
    }
}

/// Case-insensitive `http://` or `https://` prefix check
fn has_http_scheme(url: &str) -> bool {
    let lower_prefix = |prefix: &str| {
        url.get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    };
    lower_prefix("http://") || lower_prefix("https://")
}

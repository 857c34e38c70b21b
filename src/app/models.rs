//! Data models for playlist entries and validation verdicts
//!
//! Entries are produced once by the parser and then shared read-only between
//! workers behind an `Arc`. Verdicts are produced exactly once per unique
//! stream URL.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// One `#EXTINF` directive plus the stream URL that follows it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaylistEntry {
    /// Position of the directive in parse order
    pub index: usize,
    /// Raw directive line, written back verbatim
    pub meta_line: String,
    /// Display title (everything after the first comma)
    pub name: String,
    /// `tvg-logo` attribute, empty if absent
    pub tvg_logo: String,
    /// `tvg-id` attribute, empty if absent
    pub tvg_id: String,
    /// Resource to validate, empty if the directive had no URL line
    pub stream_url: String,
}

impl PlaylistEntry {
    /// Whether the parser found a URL line for this directive
    pub fn has_stream_url(&self) -> bool {
        !self.stream_url.is_empty()
    }
}

/// Why a stream was kept or dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictReason {
    /// Response declared an HLS content type
    ContentTypeMatch,
    /// Response body contained the `#EXTM3U` marker
    BodyMarkerMatch,
    /// URL path ends in `.m3u8`
    ExtensionFallback,
    /// Non-success HTTP status
    BadStatus,
    /// Reachable, but nothing identified it as a playlist
    NoSignal,
    /// Timeout, DNS, connection, redirect or body-read failure
    NetworkError,
    /// URL could not be parsed
    InvalidUrl,
}

impl VerdictReason {
    /// Whether this reason means the entry survives
    pub fn is_keep(self) -> bool {
        matches!(
            self,
            VerdictReason::ContentTypeMatch
                | VerdictReason::BodyMarkerMatch
                | VerdictReason::ExtensionFallback
        )
    }

    /// Human-readable reason code
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictReason::ContentTypeMatch => "content-type match",
            VerdictReason::BodyMarkerMatch => "body marker match",
            VerdictReason::ExtensionFallback => "extension fallback",
            VerdictReason::BadStatus => "bad status",
            VerdictReason::NoSignal => "no signal",
            VerdictReason::NetworkError => "network error",
            VerdictReason::InvalidUrl => "invalid url",
        }
    }
}

impl fmt::Display for VerdictReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Result of probing a single URL, before it is tied to an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub reason: VerdictReason,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
}

impl ProbeOutcome {
    pub fn new(reason: VerdictReason, status: Option<u16>) -> Self {
        Self { reason, status }
    }

    pub fn keep(&self) -> bool {
        self.reason.is_keep()
    }
}

/// Keep/drop decision for one unique stream URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    /// Entry whose URL was probed (the first entry that claimed it)
    pub entry: PlaylistEntry,
    pub keep: bool,
    pub reason: VerdictReason,
    /// HTTP status, when a response was received
    pub status: Option<u16>,
    /// Worker that produced the verdict
    pub worker_id: usize,
    /// Wall time spent on the probe
    pub elapsed: Duration,
}

impl ValidationVerdict {
    /// Tie a probe outcome to the entry it was run for
    pub fn new(
        entry: PlaylistEntry,
        outcome: ProbeOutcome,
        worker_id: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            entry,
            keep: outcome.keep(),
            reason: outcome.reason,
            status: outcome.status,
            worker_id,
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(url: &str) -> PlaylistEntry {
        PlaylistEntry {
            index: 0,
            meta_line: "#EXTINF:-1,Test".to_string(),
            name: "Test".to_string(),
            tvg_logo: String::new(),
            tvg_id: String::new(),
            stream_url: url.to_string(),
        }
    }

    #[test]
    fn test_reason_keep_classification() {
        assert!(VerdictReason::ContentTypeMatch.is_keep());
        assert!(VerdictReason::BodyMarkerMatch.is_keep());
        assert!(VerdictReason::ExtensionFallback.is_keep());
        assert!(!VerdictReason::BadStatus.is_keep());
        assert!(!VerdictReason::NoSignal.is_keep());
        assert!(!VerdictReason::NetworkError.is_keep());
        assert!(!VerdictReason::InvalidUrl.is_keep());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(VerdictReason::NetworkError.to_string(), "network error");
        assert_eq!(
            VerdictReason::ExtensionFallback.to_string(),
            "extension fallback"
        );
    }

    #[test]
    fn test_reason_serializes_kebab_case() {
        let json = serde_json::to_string(&VerdictReason::BodyMarkerMatch).unwrap();
        assert_eq!(json, "\"body-marker-match\"");
    }

    #[test]
    fn test_verdict_follows_outcome() {
        let verdict = ValidationVerdict::new(
            entry("http://a.example/live.m3u8"),
            ProbeOutcome::new(VerdictReason::BadStatus, Some(404)),
            2,
            Duration::from_millis(12),
        );
        assert!(!verdict.keep);
        assert_eq!(verdict.status, Some(404));
        assert_eq!(verdict.worker_id, 2);
    }

    #[test]
    fn test_entry_without_url() {
        assert!(!entry("").has_stream_url());
        assert!(entry("http://a.example/x").has_stream_url());
    }
}

//! Pool statistics
//!
//! Built by the collector from worker messages, so no counter here is shared
//! between tasks.

use std::collections::BTreeMap;

use serde::Serialize;

use super::types::DispatchProgress;
use crate::app::gate::GateRejection;
use crate::app::models::{ValidationVerdict, VerdictReason};

/// Aggregate results of one dispatch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PoolStats {
    /// Workers spawned
    pub worker_count: usize,
    /// Entries handed to the pool
    pub total_entries: usize,
    /// Probes executed (one per unique admitted URL)
    pub probed: usize,
    /// Probes that kept their entry
    pub kept: usize,
    /// Gate refusals by kind
    pub rejections: BTreeMap<GateRejection, usize>,
    /// Probe outcomes by reason
    pub reasons: BTreeMap<VerdictReason, usize>,
}

impl PoolStats {
    pub fn new(total_entries: usize, worker_count: usize) -> Self {
        Self {
            worker_count,
            total_entries,
            ..Default::default()
        }
    }

    /// Record one probe result
    pub fn record_verdict(&mut self, verdict: &ValidationVerdict) {
        self.probed += 1;
        if verdict.keep {
            self.kept += 1;
        }
        *self.reasons.entry(verdict.reason).or_insert(0) += 1;
    }

    /// Record one gate refusal
    pub fn record_rejection(&mut self, reason: GateRejection) {
        *self.rejections.entry(reason).or_insert(0) += 1;
    }

    /// Probes that dropped their entry
    pub fn dropped(&self) -> usize {
        self.probed - self.kept
    }

    /// Entries the gate refused
    pub fn rejected(&self) -> usize {
        self.rejections.values().sum()
    }

    /// Entries fully handled so far
    pub fn processed(&self) -> usize {
        self.probed + self.rejected()
    }

    /// Count for one probe reason
    pub fn reason_count(&self, reason: VerdictReason) -> usize {
        self.reasons.get(&reason).copied().unwrap_or(0)
    }

    /// Count for one gate refusal kind
    pub fn rejection_count(&self, reason: GateRejection) -> usize {
        self.rejections.get(&reason).copied().unwrap_or(0)
    }

    /// Progress snapshot for observers
    pub fn progress(&self) -> DispatchProgress {
        DispatchProgress {
            total: self.total_entries,
            processed: self.processed(),
            kept: self.kept,
            dropped: self.dropped(),
            rejected: self.rejected(),
        }
    }

    /// One-line breakdown of drop reasons, e.g. `bad status: 3, network error: 7`
    pub fn drop_breakdown(&self) -> String {
        let parts: Vec<String> = self
            .reasons
            .iter()
            .filter(|(reason, _)| !reason.is_keep())
            .map(|(reason, count)| format!("{}: {}", reason, count))
            .collect();
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::app::models::{PlaylistEntry, ProbeOutcome};

    fn verdict(reason: VerdictReason) -> ValidationVerdict {
        let entry = PlaylistEntry {
            index: 0,
            meta_line: "#EXTINF:-1,A".to_string(),
            name: "A".to_string(),
            tvg_logo: String::new(),
            tvg_id: String::new(),
            stream_url: "http://a.example/a.m3u8".to_string(),
        };
        ValidationVerdict::new(entry, ProbeOutcome::new(reason, None), 0, Duration::ZERO)
    }

    #[test]
    fn test_counts_accumulate() {
        let mut stats = PoolStats::new(6, 2);
        stats.record_verdict(&verdict(VerdictReason::BodyMarkerMatch));
        stats.record_verdict(&verdict(VerdictReason::BadStatus));
        stats.record_verdict(&verdict(VerdictReason::NetworkError));
        stats.record_verdict(&verdict(VerdictReason::NetworkError));
        stats.record_rejection(GateRejection::Duplicate);
        stats.record_rejection(GateRejection::Empty);

        assert_eq!(stats.probed, 4);
        assert_eq!(stats.kept, 1);
        assert_eq!(stats.dropped(), 3);
        assert_eq!(stats.rejected(), 2);
        assert_eq!(stats.processed(), 6);
        assert_eq!(stats.reason_count(VerdictReason::NetworkError), 2);
        assert_eq!(stats.rejection_count(GateRejection::Duplicate), 1);

        let progress = stats.progress();
        assert_eq!(progress.total, 6);
        assert_eq!(progress.processed, 6);
    }

    #[test]
    fn test_drop_breakdown_skips_keep_reasons() {
        let mut stats = PoolStats::new(2, 1);
        assert_eq!(stats.drop_breakdown(), "none");

        stats.record_verdict(&verdict(VerdictReason::ContentTypeMatch));
        stats.record_verdict(&verdict(VerdictReason::BadStatus));
        assert_eq!(stats.drop_breakdown(), "bad status: 1");
    }

    #[test]
    fn test_stats_serialize_with_readable_keys() {
        let mut stats = PoolStats::new(1, 1);
        stats.record_verdict(&verdict(VerdictReason::NoSignal));
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["reasons"]["no-signal"], 1);
    }
}

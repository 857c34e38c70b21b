//! Messages exchanged between workers, the collector, and observers

use serde::Serialize;

use crate::app::gate::GateRejection;
use crate::app::models::ValidationVerdict;

/// What a worker reports for each entry it claims
#[derive(Debug, Clone)]
pub enum WorkerMessage {
    /// URL was probed
    Verdict(ValidationVerdict),
    /// URL was refused by the gate and never probed
    Rejected {
        index: usize,
        reason: GateRejection,
    },
}

/// Snapshot sent to progress observers after every worker message
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchProgress {
    /// Entries in the playlist
    pub total: usize,
    /// Entries claimed and finished (probed or rejected)
    pub processed: usize,
    /// Probes that kept their entry
    pub kept: usize,
    /// Probes that dropped their entry
    pub dropped: usize,
    /// Entries the gate refused
    pub rejected: usize,
}

impl DispatchProgress {
    /// Fraction of entries processed, 1.0 for an empty playlist
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Per-worker totals returned when a worker exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerSummary {
    pub worker_id: usize,
    /// Indices claimed from the cursor
    pub claimed: usize,
    /// Probes executed
    pub probed: usize,
}

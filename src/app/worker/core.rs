//! Core validation worker implementation
//!
//! Workers share one monotonically increasing cursor over the parsed entries.
//! Each claim is a single `fetch_add`, so every index is handed to exactly one
//! worker and a worker stuck on a slow probe never holds back the others.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::types::{WorkerMessage, WorkerSummary};
use crate::app::gate::{GateDecision, UrlGate};
use crate::app::models::{PlaylistEntry, ValidationVerdict};
use crate::app::validator::StreamProbe;

/// Individual validation worker
pub struct ValidationWorker<P: StreamProbe + ?Sized> {
    /// Worker identifier, unique within a pool
    id: usize,
    /// Shared claim cursor
    cursor: Arc<AtomicUsize>,
    /// Parsed entries, read-only
    entries: Arc<Vec<PlaylistEntry>>,
    /// Shared URL gate
    gate: Arc<UrlGate>,
    /// Probe used for admitted URLs
    probe: Arc<P>,
    /// Channel to the collector
    tx: mpsc::Sender<WorkerMessage>,
}

impl<P: StreamProbe + ?Sized> ValidationWorker<P> {
    /// Create a new validation worker
    pub fn new(
        id: usize,
        cursor: Arc<AtomicUsize>,
        entries: Arc<Vec<PlaylistEntry>>,
        gate: Arc<UrlGate>,
        probe: Arc<P>,
        tx: mpsc::Sender<WorkerMessage>,
    ) -> Self {
        Self {
            id,
            cursor,
            entries,
            gate,
            probe,
            tx,
        }
    }

    /// Claim and process entries until the cursor runs past the end
    pub async fn run(self) -> WorkerSummary {
        debug!("Worker {} starting", self.id);
        let mut summary = WorkerSummary {
            worker_id: self.id,
            ..Default::default()
        };

        loop {
            let index = self.cursor.fetch_add(1, Ordering::Relaxed);
            let Some(entry) = self.entries.get(index) else {
                break;
            };
            summary.claimed += 1;

            let message = match self.gate.admit(&entry.stream_url).await {
                GateDecision::Rejected(reason) => {
                    debug!(
                        "Worker {} skipped entry {} ({}): {}",
                        self.id, index, reason, entry.stream_url
                    );
                    WorkerMessage::Rejected { index, reason }
                }
                GateDecision::Admitted => {
                    summary.probed += 1;
                    WorkerMessage::Verdict(self.validate(entry).await)
                }
            };

            if self.tx.send(message).await.is_err() {
                warn!("Worker {} lost its collector, stopping", self.id);
                break;
            }
        }

        debug!(
            "Worker {} finished: {} claimed, {} probed",
            self.id, summary.claimed, summary.probed
        );
        summary
    }

    async fn validate(&self, entry: &PlaylistEntry) -> ValidationVerdict {
        let started = Instant::now();
        let outcome = self.probe.probe(&entry.stream_url).await;
        let verdict = ValidationVerdict::new(entry.clone(), outcome, self.id, started.elapsed());

        if verdict.keep {
            info!("KEEP: {} {}", entry.name, entry.stream_url);
        } else {
            debug!(
                "DROP ({}): {} {}",
                verdict.reason, entry.name, entry.stream_url
            );
        }

        verdict
    }
}

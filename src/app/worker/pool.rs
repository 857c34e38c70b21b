//! Worker pool management and verdict collection
//!
//! The pool spawns a fixed number of workers, drains their messages in
//! completion order, and waits for every worker before returning. The cursor
//! and the gate's seen-set are the only state the workers share.

use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::config::WorkerConfig;
use super::core::ValidationWorker;
use super::stats::PoolStats;
use super::types::{DispatchProgress, WorkerMessage};
use crate::app::gate::{GateRejection, UrlGate};
use crate::app::models::{PlaylistEntry, ValidationVerdict};
use crate::app::validator::StreamProbe;
use crate::errors::{DispatchError, DispatchResult};

/// Everything a dispatch produced
#[derive(Debug, Clone)]
pub struct DispatchOutcome {
    /// Verdicts in the order they completed
    pub verdicts: Vec<ValidationVerdict>,
    /// Entry indices the gate refused, in input order
    pub skipped: Vec<(usize, GateRejection)>,
    pub stats: PoolStats,
}

impl DispatchOutcome {
    /// Verdicts with `keep = true`, still in completion order
    pub fn kept(&self) -> impl Iterator<Item = &ValidationVerdict> {
        self.verdicts.iter().filter(|v| v.keep)
    }
}

/// Pool of concurrent validation workers
pub struct WorkerPool<P: StreamProbe + ?Sized + 'static> {
    config: WorkerConfig,
    probe: Arc<P>,
    gate: Arc<UrlGate>,
}

impl<P: StreamProbe + ?Sized + 'static> WorkerPool<P> {
    /// Create a pool with a fresh seen-set
    pub fn new(config: WorkerConfig, probe: Arc<P>) -> Self {
        Self {
            config,
            probe,
            gate: Arc::new(UrlGate::new()),
        }
    }

    /// The gate shared by this pool's workers
    pub fn gate(&self) -> &Arc<UrlGate> {
        &self.gate
    }

    /// Get pool configuration
    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Validate every entry and return the verdicts
    ///
    /// `progress` receives a snapshot after each processed entry. Snapshots
    /// are dropped rather than awaited when the observer falls behind.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::Configuration` for a zero-sized verdict buffer
    /// and `DispatchError::WorkerPanic` if a worker task panicked
    pub async fn run(
        &self,
        entries: Vec<PlaylistEntry>,
        progress: Option<mpsc::Sender<DispatchProgress>>,
    ) -> DispatchResult<DispatchOutcome> {
        if self.config.verdict_buffer_size == 0 {
            return Err(DispatchError::Configuration(
                "verdict buffer size must be greater than zero".to_string(),
            ));
        }

        let worker_count = self.config.effective_worker_count();
        let entries = Arc::new(entries);
        let cursor = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::channel(self.config.verdict_buffer_size);

        info!(
            "Validating {} entries with {} workers",
            entries.len(),
            worker_count
        );

        let handles: Vec<_> = (0..worker_count)
            .map(|id| {
                let worker = ValidationWorker::new(
                    id,
                    cursor.clone(),
                    entries.clone(),
                    self.gate.clone(),
                    self.probe.clone(),
                    tx.clone(),
                );
                tokio::spawn(worker.run())
            })
            .collect();

        // Only workers hold senders now; the loop below ends when the last exits
        drop(tx);

        let mut stats = PoolStats::new(entries.len(), worker_count);
        let mut verdicts = Vec::new();
        let mut skipped = Vec::new();

        while let Some(message) = rx.recv().await {
            match message {
                WorkerMessage::Verdict(verdict) => {
                    stats.record_verdict(&verdict);
                    verdicts.push(verdict);
                }
                WorkerMessage::Rejected { index, reason } => {
                    stats.record_rejection(reason);
                    skipped.push((index, reason));
                }
            }

            if let Some(progress_tx) = &progress {
                let _ = progress_tx.try_send(stats.progress());
            }
        }

        let mut panicked = None;
        for (worker_id, result) in join_all(handles).await.into_iter().enumerate() {
            match result {
                Ok(summary) => debug!(
                    "Worker {} joined: {} claimed, {} probed",
                    summary.worker_id, summary.claimed, summary.probed
                ),
                Err(e) => {
                    warn!("Worker {} panicked: {}", worker_id, e);
                    panicked.get_or_insert(worker_id);
                }
            }
        }

        if let Some(worker_id) = panicked {
            return Err(DispatchError::WorkerPanic { worker_id });
        }

        info!(
            "Validation finished: {} probed, {} kept, {} dropped, {} skipped",
            stats.probed,
            stats.kept,
            stats.dropped(),
            stats.rejected()
        );

        skipped.sort_unstable_by_key(|(index, _)| *index);

        Ok(DispatchOutcome {
            verdicts,
            skipped,
            stats,
        })
    }
}

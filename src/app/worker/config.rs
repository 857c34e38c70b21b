//! Worker pool configuration
//!
//! The pool size is clamped rather than rejected: asking for more than the
//! ceiling, or for zero workers, still produces a working pool.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::workers;

/// Configuration for the validation worker pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Requested number of concurrent validation workers
    pub max_concurrent: usize,
    /// Channel buffer size between workers and the collector
    pub verdict_buffer_size: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent: workers::DEFAULT_MAX_CONCURRENT,
            verdict_buffer_size: workers::VERDICT_BUFFER_SIZE,
        }
    }
}

impl WorkerConfig {
    /// Create a configuration with the given worker count
    pub fn with_max_concurrent(max_concurrent: usize) -> Self {
        Self {
            max_concurrent,
            ..Default::default()
        }
    }

    /// Number of workers actually spawned, within `1..=MAX_CONCURRENT_CEILING`
    pub fn effective_worker_count(&self) -> usize {
        let clamped = self
            .max_concurrent
            .clamp(1, workers::MAX_CONCURRENT_CEILING);
        if clamped != self.max_concurrent {
            warn!(
                "Requested {} workers, using {} (allowed range 1..={})",
                self.max_concurrent,
                clamped,
                workers::MAX_CONCURRENT_CEILING
            );
        }
        clamped
    }
}

//! Validation worker pool
//!
//! A fixed number of workers pull entries off a shared atomic cursor, pass
//! each URL through the [`UrlGate`](crate::app::gate::UrlGate), probe the
//! admitted ones, and stream verdicts back to a single collector.
//!
//! # Module Organization
//!
//! - [`config`] - Pool size and channel sizing
//! - [`types`] - Worker messages and progress snapshots
//! - [`stats`] - Aggregate counts built by the collector
//! - [`core`] - Individual worker loop
//! - [`pool`] - Spawning, collection, and joining
//!
//! # Basic Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use playlist_sieve::app::worker::{WorkerConfig, WorkerPool};
//! use playlist_sieve::app::{parse_playlist, PlaylistClient, ProbeConfig, StreamValidator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PlaylistClient::new()?;
//! let validator = StreamValidator::new(client.client().clone(), ProbeConfig::default());
//! let pool = WorkerPool::new(WorkerConfig::default(), Arc::new(validator));
//!
//! let entries = parse_playlist("#EXTM3U\n#EXTINF:-1,A\nhttp://a.example/live.m3u8\n");
//! let outcome = pool.run(entries, None).await?;
//! println!("{} kept", outcome.stats.kept);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod pool;
pub mod stats;
pub mod types;

#[cfg(test)]
mod tests;

// Re-export main public API
pub use config::WorkerConfig;
pub use self::core::ValidationWorker;
pub use pool::{DispatchOutcome, WorkerPool};
pub use stats::PoolStats;
pub use types::{DispatchProgress, WorkerMessage, WorkerSummary};

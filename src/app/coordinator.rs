//! Run orchestration
//!
//! The coordinator drives one session end to end: fetch the master playlist,
//! parse it, dispatch the entries to the worker pool, and write the kept
//! entries. A failed master fetch ends the session before anything is written.
//!
//! # Examples
//!
//! ```rust,no_run
//! use playlist_sieve::app::{Coordinator, CoordinatorConfig, PlaylistClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PlaylistClient::new()?;
//! let config = CoordinatorConfig::default()
//!     .with_master_url("https://iptv-org.github.io/iptv/index.m3u")
//!     .with_max_concurrent(8);
//!
//! let coordinator = Coordinator::new(config, client);
//! let result = coordinator.run(None).await?;
//! println!("{}", result.summary());
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::app::assembler::{self, OutputConfig, OutputOrder, VerdictReport};
use crate::app::client::PlaylistClient;
use crate::app::parser::{parse_playlist_with_stats, ParseStats};
use crate::app::validator::{ProbeConfig, StreamProbe, StreamValidator};
use crate::app::worker::{DispatchProgress, PoolStats, WorkerConfig, WorkerPool};
use crate::constants::playlist;
use crate::errors::Result;

/// Settings for one filtering session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    /// Master playlist to filter
    pub master_url: String,
    pub probe: ProbeConfig,
    pub workers: WorkerConfig,
    pub output: OutputConfig,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            master_url: playlist::DEFAULT_MASTER_URL.to_string(),
            probe: ProbeConfig::default(),
            workers: WorkerConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl CoordinatorConfig {
    /// Set the master playlist URL
    pub fn with_master_url(mut self, url: impl Into<String>) -> Self {
        self.master_url = url.into();
        self
    }

    /// Set the requested number of workers
    pub fn with_max_concurrent(mut self, count: usize) -> Self {
        self.workers.max_concurrent = count;
        self
    }

    /// Set the output playlist path
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.path = path.into();
        self
    }

    /// Set the output ordering
    pub fn with_order(mut self, order: OutputOrder) -> Self {
        self.output.order = order;
        self
    }

    /// Also write a JSON report of every verdict
    pub fn with_report(mut self, path: impl Into<PathBuf>) -> Self {
        self.output.report_path = Some(path.into());
        self
    }

    /// Set the per-probe budgets
    pub fn with_probe(mut self, probe: ProbeConfig) -> Self {
        self.probe = probe;
        self
    }
}

/// Final result of a filtering session
#[derive(Debug, Clone, Serialize)]
pub struct SessionResult {
    pub master_url: String,
    /// What the parser saw
    pub parse: ParseStats,
    /// What the pool did
    pub stats: PoolStats,
    /// Entries written to the output playlist
    pub written: usize,
    pub output_path: PathBuf,
    pub report_path: Option<PathBuf>,
    pub total_duration: Duration,
}

impl SessionResult {
    /// Entries that did not make it into the output, for any reason
    pub fn discarded(&self) -> usize {
        self.stats.total_entries.saturating_sub(self.written)
    }

    /// Human-readable one-paragraph summary
    pub fn summary(&self) -> String {
        format!(
            "Kept {} of {} entries ({} dropped, {} skipped by the gate) in {:.1}s\n\
             Drop reasons: {}\n\
             Output: {}",
            self.written,
            self.stats.total_entries,
            self.stats.dropped(),
            self.stats.rejected(),
            self.total_duration.as_secs_f64(),
            self.stats.drop_breakdown(),
            self.output_path.display()
        )
    }
}

/// Orchestrates fetch, parse, dispatch, and write for one session
pub struct Coordinator<P: StreamProbe + ?Sized + 'static = StreamValidator> {
    config: CoordinatorConfig,
    client: PlaylistClient,
    probe: Arc<P>,
}

impl Coordinator<StreamValidator> {
    /// Create a coordinator that probes over HTTP with the shared client
    pub fn new(config: CoordinatorConfig, client: PlaylistClient) -> Self {
        let validator = StreamValidator::new(client.client().clone(), config.probe.clone());
        Self::with_probe(config, client, Arc::new(validator))
    }
}

impl<P: StreamProbe + ?Sized + 'static> Coordinator<P> {
    /// Create a coordinator with a custom probe implementation
    pub fn with_probe(
        config: CoordinatorConfig,
        client: PlaylistClient,
        probe: Arc<P>,
    ) -> Self {
        Self {
            config,
            client,
            probe,
        }
    }

    /// Get the session configuration
    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Run the complete session
    ///
    /// # Errors
    ///
    /// Returns `AppError` if the master playlist cannot be fetched, a worker
    /// panics, or the output cannot be written. Nothing is written when the
    /// fetch or the dispatch fails, and the playlist is left untouched when
    /// the report cannot be written.
    pub async fn run(
        &self,
        progress: Option<mpsc::Sender<DispatchProgress>>,
    ) -> Result<SessionResult> {
        let start = Instant::now();

        let text = self.client.fetch_master(&self.config.master_url).await?;
        let (entries, parse) = parse_playlist_with_stats(&text);
        info!(
            "Parsed {} entries from master playlist ({} lines)",
            entries.len(),
            parse.lines
        );
        if parse.missing_url > 0 {
            debug!("{} directives had no URL line", parse.missing_url);
        }

        let pool = WorkerPool::new(self.config.workers.clone(), self.probe.clone());
        let outcome = pool.run(entries, progress).await?;

        // The playlist is committed only after the report is on disk
        if let Some(report_path) = &self.config.output.report_path {
            let report =
                VerdictReport::new(&self.config.master_url, &outcome.stats, &outcome.verdicts);
            assembler::write_report(report_path, &report).await?;
        }

        let written = assembler::write_playlist(&outcome.verdicts, &self.config.output).await?;

        let total_duration = start.elapsed();
        info!("Session finished in {:.2}s", total_duration.as_secs_f64());

        Ok(SessionResult {
            master_url: self.config.master_url.clone(),
            parse,
            stats: outcome.stats,
            written,
            output_path: self.config.output.path.clone(),
            report_path: self.config.output.report_path.clone(),
            total_duration,
        })
    }
}

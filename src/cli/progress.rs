//! Progress display for validation runs
//!
//! The dispatcher publishes [`DispatchProgress`] snapshots on a channel; this
//! module drains that channel into an indicatif bar. The entry count is only
//! known once the master playlist has been parsed, so the bar length is taken
//! from each snapshot rather than fixed up front.
//!
//! # Examples
//!
//! ```rust,no_run
//! use playlist_sieve::cli::ProgressDisplay;
//!
//! # async fn example() {
//! let (display, progress_tx) = ProgressDisplay::start(true);
//! // hand `progress_tx` to the coordinator ...
//! # drop(progress_tx);
//! let last = display.finish().await;
//! # let _ = last;
//! # }
//! ```

use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::DispatchProgress;
use crate::constants::workers;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}";

/// Live progress bar fed by dispatch snapshots
pub struct ProgressDisplay {
    bar: Option<ProgressBar>,
    update_task: JoinHandle<Option<DispatchProgress>>,
}

impl ProgressDisplay {
    /// Start draining progress snapshots
    ///
    /// Returns the display and the sender to hand to the dispatcher. With
    /// `enabled = false` snapshots are still drained but nothing is drawn.
    pub fn start(enabled: bool) -> (Self, mpsc::Sender<DispatchProgress>) {
        let (tx, mut rx) = mpsc::channel::<DispatchProgress>(workers::PROGRESS_BUFFER_SIZE);

        let bar = enabled.then(|| {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("##-"),
            );
            bar.set_message("Fetching master playlist");
            bar
        });

        let task_bar = bar.clone();
        let update_task = tokio::spawn(async move {
            let mut last = None;
            while let Some(progress) = rx.recv().await {
                if let Some(bar) = &task_bar {
                    render(bar, &progress);
                }
                last = Some(progress);
            }
            last
        });

        (Self { bar, update_task }, tx)
    }

    /// Wait for the channel to close and clear the bar
    ///
    /// Returns the last snapshot received, if any.
    pub async fn finish(self) -> Option<DispatchProgress> {
        let last = self.update_task.await.unwrap_or_else(|e| {
            debug!("Progress task ended abnormally: {}", e);
            None
        });

        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        last
    }
}

fn render(bar: &ProgressBar, progress: &DispatchProgress) {
    bar.set_length(progress.total as u64);
    bar.set_position(progress.processed as u64);
    bar.set_message(format_counts(progress));
}

/// Short status line, e.g. `12 kept, 30 dropped, 4 skipped`
pub fn format_counts(progress: &DispatchProgress) -> String {
    format!(
        "{} kept, {} dropped, {} skipped",
        progress.kept, progress.dropped, progress.rejected
    )
}

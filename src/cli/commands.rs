//! Command handlers for Playlist Sieve CLI
//!
//! This module implements the command handlers that coordinate between CLI
//! arguments, the loaded configuration, and the core pipeline.

use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::app::{Coordinator, PlaylistClient, ProbeOutcome, SessionResult, StreamValidator};
use crate::cli::{FilterArgs, ProbeArgs, ProgressDisplay};
use crate::config::AppConfig;
use crate::errors::{AppError, Result};

/// Handle the filter command
///
/// Runs the complete pipeline and prints a summary. Zero surviving entries is
/// still a success; the output then holds only the header line.
pub async fn handle_filter(args: FilterArgs, mut config: AppConfig) -> Result<()> {
    args.validate().map_err(AppError::generic)?;
    args.apply_to(&mut config);
    config.validate()?;

    info!(
        "Filtering {} into {}",
        config.source.master_url,
        config.output.path.display()
    );

    let client = PlaylistClient::with_config(config.client.clone())?;
    let coordinator = Coordinator::new(config.to_coordinator_config(), client);

    let (display, progress_tx) = ProgressDisplay::start(!args.no_progress);
    let result = coordinator.run(Some(progress_tx)).await;
    if let Some(last) = display.finish().await {
        debug!("Last progress snapshot: {:?}", last);
    }

    print_session_summary(&result?);
    Ok(())
}

fn print_session_summary(result: &SessionResult) {
    println!();
    println!("✅ Playlist filtered");
    println!("   Source:   {}", result.master_url);
    println!("   Entries:  {}", result.stats.total_entries);
    println!("   Kept:     {}", result.written);
    println!("   Dropped:  {} ({})", result.stats.dropped(), result.stats.drop_breakdown());
    println!("   Skipped:  {}", result.stats.rejected());
    println!("   Output:   {}", result.output_path.display());
    if let Some(report) = &result.report_path {
        println!("   Report:   {}", report.display());
    }
    println!("   Duration: {:.1}s", result.total_duration.as_secs_f64());
}

/// Handle the probe command
///
/// Probes each URL with the same validator the filter uses and prints one
/// line per URL in argument order.
pub async fn handle_probe(args: ProbeArgs, mut config: AppConfig) -> Result<()> {
    args.validate().map_err(AppError::generic)?;
    args.apply_to(&mut config);

    let client = PlaylistClient::with_config(config.client.clone())?;
    let validator = StreamValidator::new(client.client().clone(), config.probe.clone());
    let concurrency = config.dispatch.effective_worker_count();

    let start = Instant::now();
    let outcomes: Vec<(String, ProbeOutcome)> = stream::iter(args.urls)
        .map(|url| {
            let validator = &validator;
            async move {
                let outcome = validator.validate(&url).await;
                (url, outcome)
            }
        })
        .buffered(concurrency)
        .collect()
        .await;

    for (url, outcome) in &outcomes {
        println!("{}", format_probe_line(url, outcome));
    }

    let kept = outcomes.iter().filter(|(_, o)| o.keep()).count();
    info!(
        "Probed {} URLs in {:?}: {} kept",
        outcomes.len(),
        start.elapsed(),
        kept
    );
    Ok(())
}

/// One line of probe output, e.g. `KEEP  body marker match  200  http://...`
pub fn format_probe_line(url: &str, outcome: &ProbeOutcome) -> String {
    let verdict = if outcome.keep() { "KEEP" } else { "DROP" };
    let status = outcome
        .status
        .map(|s| s.to_string())
        .unwrap_or_else(|| "---".to_string());
    format!(
        "{:<5} {:<18} {:>3}  {}",
        verdict,
        outcome.reason.as_str(),
        status,
        url
    )
}

/// Handle the config command
pub async fn handle_config(config: AppConfig) -> Result<()> {
    config.validate()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

//! Output playlist assembly and writing
//!
//! Only verdicts with `keep = true` reach the output, each as its original
//! directive line followed by its stream URL. Files are written to a
//! temporary sibling and renamed into place, so the collaborator serving the
//! playlist never sees a half-written file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::app::models::{ValidationVerdict, VerdictReason};
use crate::app::worker::PoolStats;
use crate::constants::{files, playlist};
use crate::errors::{OutputError, OutputResult};

/// Order of entries in the written playlist
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum OutputOrder {
    /// Same order as the master playlist
    #[default]
    Input,
    /// Order in which probes finished
    Completion,
}

/// Where and how the result is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Filtered playlist location
    pub path: PathBuf,
    /// Entry ordering
    pub order: OutputOrder,
    /// Optional JSON report of every verdict
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(playlist::DEFAULT_OUTPUT_PATH),
            order: OutputOrder::default(),
            report_path: None,
        }
    }
}

/// Render kept verdicts as extended M3U text
///
/// Verdicts with `keep = false` are ignored, so callers may pass the full
/// verdict list. The result always starts with the `#EXTM3U` header line.
pub fn render_playlist<'a, I>(verdicts: I, order: OutputOrder) -> String
where
    I: IntoIterator<Item = &'a ValidationVerdict>,
{
    let mut kept: Vec<&ValidationVerdict> = verdicts.into_iter().filter(|v| v.keep).collect();
    if order == OutputOrder::Input {
        kept.sort_by_key(|v| v.entry.index);
    }

    let mut out = String::with_capacity(
        playlist::HEADER.len()
            + 1
            + kept
                .iter()
                .map(|v| v.entry.meta_line.len() + v.entry.stream_url.len() + 2)
                .sum::<usize>(),
    );
    out.push_str(playlist::HEADER);
    out.push('\n');
    for verdict in kept {
        out.push_str(&verdict.entry.meta_line);
        out.push('\n');
        out.push_str(&verdict.entry.stream_url);
        out.push('\n');
    }
    out
}

/// Write `contents` to `destination`, creating parent directories
///
/// # Errors
///
/// Returns `OutputError` if the directory cannot be created, the temporary
/// file cannot be written, or the final rename fails
pub async fn write_atomic(destination: &Path, contents: &[u8]) -> OutputResult<()> {
    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| OutputError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    let temp_path = temp_path_for(destination);
    tokio::fs::write(&temp_path, contents)
        .await
        .map_err(|source| OutputError::Write {
            path: temp_path.clone(),
            source,
        })?;

    if let Err(e) = tokio::fs::rename(&temp_path, destination).await {
        debug!("Rename of {} failed: {}", temp_path.display(), e);
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(OutputError::AtomicOperationFailed {
            temp_path,
            final_path: destination.to_path_buf(),
        });
    }

    Ok(())
}

/// Render and write the filtered playlist, returning the number of entries
pub async fn write_playlist(
    verdicts: &[ValidationVerdict],
    config: &OutputConfig,
) -> OutputResult<usize> {
    let text = render_playlist(verdicts, config.order);
    let written = verdicts.iter().filter(|v| v.keep).count();
    write_atomic(&config.path, text.as_bytes()).await?;
    info!(
        "Writing {} valid entries to {}",
        written,
        config.path.display()
    );
    Ok(written)
}

/// Temporary sibling of `destination`, unique per process
fn temp_path_for(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(format!(".{}{}", std::process::id(), files::TEMP_FILE_SUFFIX));
    destination.with_file_name(name)
}

/// One verdict in the JSON report
#[derive(Debug, Clone, Serialize)]
pub struct ReportEntry {
    pub index: usize,
    pub name: String,
    pub tvg_id: String,
    pub stream_url: String,
    pub keep: bool,
    pub reason: VerdictReason,
    pub status: Option<u16>,
    pub worker_id: usize,
    pub elapsed_ms: u128,
}

impl From<&ValidationVerdict> for ReportEntry {
    fn from(verdict: &ValidationVerdict) -> Self {
        Self {
            index: verdict.entry.index,
            name: verdict.entry.name.clone(),
            tvg_id: verdict.entry.tvg_id.clone(),
            stream_url: verdict.entry.stream_url.clone(),
            keep: verdict.keep,
            reason: verdict.reason,
            status: verdict.status,
            worker_id: verdict.worker_id,
            elapsed_ms: verdict.elapsed.as_millis(),
        }
    }
}

/// Machine-readable record of a run
#[derive(Debug, Clone, Serialize)]
pub struct VerdictReport {
    pub generated_at: DateTime<Utc>,
    pub master_url: String,
    pub stats: PoolStats,
    /// Verdicts sorted by entry index
    pub verdicts: Vec<ReportEntry>,
}

impl VerdictReport {
    pub fn new(master_url: &str, stats: &PoolStats, verdicts: &[ValidationVerdict]) -> Self {
        let mut entries: Vec<ReportEntry> = verdicts.iter().map(ReportEntry::from).collect();
        entries.sort_by_key(|e| e.index);
        Self {
            generated_at: Utc::now(),
            master_url: master_url.to_string(),
            stats: stats.clone(),
            verdicts: entries,
        }
    }
}

/// Write the JSON report
pub async fn write_report(path: &Path, report: &VerdictReport) -> OutputResult<()> {
    let json = serde_json::to_vec_pretty(report)?;
    write_atomic(path, &json).await?;
    info!("Wrote verdict report to {}", path.display());
    Ok(())
}

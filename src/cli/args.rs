//! Command-line argument parsing for Playlist Sieve
//!
//! This module defines the CLI structure using clap derive macros. Flags
//! given here override the config file and environment.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use serde::de::value::{Error as ValueError, StrDeserializer};
use serde::de::IntoDeserializer;

use crate::app::OutputOrder;
use crate::config::AppConfig;

/// Playlist Sieve - keep only the IPTV streams that answer
#[derive(Parser, Debug)]
#[command(
    name = "playlist_sieve",
    version,
    about = "Filter an IPTV master playlist down to live HLS streams",
    long_about = "Downloads an extended M3U master playlist, probes every stream URL concurrently
with a small ranged GET, and writes a playlist containing only the entries that look like
working HLS streams."
)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all subcommands
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Very verbose logging (debug level)
    #[arg(long, global = true)]
    pub very_verbose: bool,

    /// Quiet mode - suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch, validate, and write the filtered playlist
    Filter(FilterArgs),

    /// Probe individual stream URLs and print their verdicts
    Probe(ProbeArgs),

    /// Print the effective configuration as TOML
    Config,
}

/// Arguments for the filter command
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Master playlist URL
    #[arg(short, long, value_name = "URL")]
    pub master_url: Option<String>,

    /// Output playlist path
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Number of concurrent validation workers (at most 12)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Per-probe deadline, e.g. "9s" or "1500ms"
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Bytes requested from each stream
    #[arg(long, value_name = "BYTES")]
    pub range_bytes: Option<u64>,

    /// Order of entries in the output
    #[arg(long, value_enum)]
    pub order: Option<OutputOrder>,

    /// Also write a JSON report of every verdict
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

/// Arguments for the probe command
#[derive(Args, Debug, Clone)]
pub struct ProbeArgs {
    /// Stream URLs to probe
    #[arg(required = true, value_name = "URL")]
    pub urls: Vec<String>,

    /// Per-probe deadline, e.g. "9s" or "1500ms"
    #[arg(short, long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// Bytes requested from each stream
    #[arg(long, value_name = "BYTES")]
    pub range_bytes: Option<u64>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the logging level based on global arguments
    ///
    /// `configured` applies when no verbosity flag is given.
    pub fn log_level(&self, configured: tracing::Level) -> tracing::Level {
        if self.global.quiet {
            tracing::Level::ERROR
        } else if self.global.very_verbose {
            tracing::Level::DEBUG
        } else if self.global.verbose {
            tracing::Level::INFO
        } else {
            configured
        }
    }
}

impl FilterArgs {
    /// Check flag values before any network activity
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == Some(0) {
            return Err("Number of workers must be greater than 0".to_string());
        }
        validate_probe_flags(self.timeout, self.range_bytes)
    }

    /// Overlay the flags that were given onto `config`
    pub fn apply_to(&self, config: &mut AppConfig) {
        if let Some(url) = &self.master_url {
            config.source.master_url = url.clone();
        }
        if let Some(path) = &self.output {
            config.output.path = path.clone();
        }
        if let Some(workers) = self.workers {
            config.dispatch.max_concurrent = workers;
        }
        if let Some(order) = self.order {
            config.output.order = order;
        }
        if let Some(report) = &self.report {
            config.output.report_path = Some(report.clone());
        }
        apply_probe_flags(config, self.timeout, self.range_bytes);
    }
}

impl ProbeArgs {
    /// Check flag values before any network activity
    pub fn validate(&self) -> Result<(), String> {
        validate_probe_flags(self.timeout, self.range_bytes)
    }

    /// Overlay the flags that were given onto `config`
    pub fn apply_to(&self, config: &mut AppConfig) {
        apply_probe_flags(config, self.timeout, self.range_bytes);
    }
}

fn validate_probe_flags(timeout: Option<Duration>, range_bytes: Option<u64>) -> Result<(), String> {
    if timeout.is_some_and(|t| t.is_zero()) {
        return Err("Timeout must be greater than 0".to_string());
    }
    if range_bytes == Some(0) {
        return Err("Range size must be at least 1 byte".to_string());
    }
    Ok(())
}

fn apply_probe_flags(config: &mut AppConfig, timeout: Option<Duration>, range_bytes: Option<u64>) {
    if let Some(timeout) = timeout {
        config.probe.timeout = timeout;
    }
    if let Some(bytes) = range_bytes {
        config.probe.range_end = bytes.saturating_sub(1);
    }
}

/// Parse a duration given as plain seconds or in humantime form
fn parse_duration(value: &str) -> Result<Duration, String> {
    if let Ok(secs) = value.parse::<u64>() {
        return Ok(Duration::from_secs(secs));
    }
    let deserializer: StrDeserializer<'_, ValueError> = value.into_deserializer();
    humantime_serde::deserialize(deserializer).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_with(global: GlobalArgs) -> Cli {
        Cli {
            global,
            command: Commands::Config,
        }
    }

    #[test]
    fn test_filter_args_validation() {
        let mut args = FilterArgs::default();
        assert!(args.validate().is_ok());

        args.workers = Some(0);
        assert!(args.validate().is_err());

        args.workers = Some(20);
        assert!(args.validate().is_ok());

        args.range_bytes = Some(0);
        assert!(args.validate().is_err());

        args.range_bytes = Some(1024);
        args.timeout = Some(Duration::ZERO);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = FilterArgs {
            master_url: Some("http://127.0.0.1:8080/index.m3u".to_string()),
            output: Some(PathBuf::from("out/index.m3u")),
            workers: Some(3),
            timeout: Some(Duration::from_secs(2)),
            range_bytes: Some(4096),
            order: Some(OutputOrder::Completion),
            report: Some(PathBuf::from("report.json")),
            no_progress: true,
        };

        let mut config = AppConfig::default();
        args.apply_to(&mut config);

        assert_eq!(config.source.master_url, "http://127.0.0.1:8080/index.m3u");
        assert_eq!(config.output.path, PathBuf::from("out/index.m3u"));
        assert_eq!(config.dispatch.max_concurrent, 3);
        assert_eq!(config.probe.timeout, Duration::from_secs(2));
        assert_eq!(config.probe.range_end, 4095);
        assert_eq!(config.output.order, OutputOrder::Completion);
        assert_eq!(config.output.report_path, Some(PathBuf::from("report.json")));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let mut config = AppConfig::default();
        FilterArgs::default().apply_to(&mut config);
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_parse_duration_forms() {
        assert_eq!(parse_duration("9").unwrap(), Duration::from_secs(9));
        assert_eq!(parse_duration("9s").unwrap(), Duration::from_secs(9));
        assert_eq!(parse_duration("1500ms").unwrap(), Duration::from_millis(1500));
        assert!(parse_duration("soon").is_err());
    }

    #[test]
    fn test_command_line_parsing() {
        let cli = Cli::try_parse_from([
            "playlist_sieve",
            "-v",
            "filter",
            "--workers",
            "4",
            "--order",
            "completion",
            "--timeout",
            "3s",
        ])
        .unwrap();

        assert!(cli.global.verbose);
        match cli.command {
            Commands::Filter(args) => {
                assert_eq!(args.workers, Some(4));
                assert_eq!(args.order, Some(OutputOrder::Completion));
                assert_eq!(args.timeout, Some(Duration::from_secs(3)));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from(["playlist_sieve", "probe"]).is_err());
    }

    #[test]
    fn test_log_level() {
        let quiet = cli_with(GlobalArgs {
            verbose: false,
            very_verbose: false,
            quiet: true,
            config: None,
        });
        let verbose = cli_with(GlobalArgs {
            verbose: true,
            very_verbose: false,
            quiet: false,
            config: None,
        });
        let plain = cli_with(GlobalArgs {
            verbose: false,
            very_verbose: false,
            quiet: false,
            config: None,
        });

        assert_eq!(quiet.log_level(tracing::Level::INFO), tracing::Level::ERROR);
        assert_eq!(verbose.log_level(tracing::Level::WARN), tracing::Level::INFO);
        assert_eq!(plain.log_level(tracing::Level::WARN), tracing::Level::WARN);
    }
}

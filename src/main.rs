//! Playlist Sieve CLI application
//!
//! Command-line interface for filtering an IPTV master playlist down to the
//! streams that currently answer like HLS playlists.

use std::process;

use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use playlist_sieve::cli::{handle_config, handle_filter, handle_probe, Cli, Commands};
use playlist_sieve::config::AppConfig;
use playlist_sieve::errors::Result;

#[tokio::main]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Main application logic
async fn run() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    let config = AppConfig::load(cli.global.config.clone()).await?;

    init_logging(&cli, &config);

    info!("Playlist Sieve v{} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Filter(args) => {
            info!("Executing filter command");
            handle_filter(args, config).await
        }
        Commands::Probe(args) => {
            info!("Executing probe command");
            handle_probe(args, config).await
        }
        Commands::Config => handle_config(config).await,
    }
}

/// Initialize logging from CLI flags, falling back to the configured level
fn init_logging(cli: &Cli, config: &AppConfig) {
    let configured = config.logging.level.parse::<tracing::Level>();
    let log_level = cli.log_level(*configured.as_ref().unwrap_or(&tracing::Level::INFO));

    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = format!("playlist_sieve={}", log_level).parse() {
        filter = filter.add_directive(directive);
    }

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(cli.global.very_verbose) // Show levels only in very verbose mode
        .init();

    if configured.is_err() {
        warn!(
            "Unknown log level '{}' in config, using info",
            config.logging.level
        );
    }
    if cli.global.very_verbose {
        info!("Very verbose logging enabled");
    } else if cli.global.verbose {
        info!("Verbose logging enabled");
    }
}

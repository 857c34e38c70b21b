//! Prelude module for Playlist Sieve Library
//!
//! This module re-exports the most commonly used items from the library,
//! so typical integrations need a single `use playlist_sieve::prelude::*;`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use playlist_sieve::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let config = AppConfig::load(None).await?;
//!     let client = PlaylistClient::with_config(config.client.clone())?;
//!     let coordinator = Coordinator::new(config.to_coordinator_config(), client);
//!
//!     let result = coordinator.run(None).await?;
//!     println!("{}", result.summary());
//!     Ok(())
//! }
//! ```

// Core result types
pub use crate::errors::{AppError, Result};

// Configuration
pub use crate::config::AppConfig;

// Pipeline components
pub use crate::app::{
    // Orchestration
    Coordinator,
    CoordinatorConfig,
    SessionResult,

    // HTTP
    ClientConfig,
    PlaylistClient,

    // Parsing and gating
    parse_playlist,
    PlaylistEntry,
    UrlGate,

    // Validation
    ProbeConfig,
    ProbeOutcome,
    StreamProbe,
    StreamValidator,
    ValidationVerdict,
    VerdictReason,

    // Dispatch and output
    OutputConfig,
    OutputOrder,
    PoolStats,
    WorkerConfig,
    WorkerPool,
};

// Commonly used constants
pub use crate::constants::{DEFAULT_MASTER_URL, DEFAULT_MAX_CONCURRENT, USER_AGENT};

// Standard library re-exports that are commonly needed
pub use std::path::{Path, PathBuf};
pub use std::sync::Arc;

pub use tokio;

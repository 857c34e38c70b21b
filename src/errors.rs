//! Error types for Playlist Sieve
//!
//! Only the fatal class of failures is modelled here. Per-stream problems
//! (bad status, timeouts, refused connections) never become errors: the
//! validator folds them into a [`VerdictReason`](crate::app::VerdictReason)
//! and the run continues.

use std::path::PathBuf;
use thiserror::Error;

/// Master manifest retrieval and HTTP client errors
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP client could not be constructed
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    /// Transport-level failure while fetching the master manifest
    #[error("Request for master playlist {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Master manifest server answered with a non-success status
    #[error("Master playlist {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    /// Master manifest URL could not be parsed
    #[error("Invalid master playlist URL: {url} - {error}")]
    InvalidUrl { url: String, error: String },
}

/// Output manifest and report writing errors
#[derive(Error, Debug)]
pub enum OutputError {
    /// Containing directory could not be created
    #[error("Could not create output directory: {path}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing the output file failed
    #[error("Failed to write {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Atomic rename of the temporary file failed
    #[error("Atomic file operation failed: could not rename {temp_path} to {final_path}")]
    AtomicOperationFailed {
        temp_path: PathBuf,
        final_path: PathBuf,
    },

    /// Report serialization failed
    #[error("Failed to serialize verdict report")]
    Report(#[from] serde_json::Error),
}

/// Worker pool errors
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Worker panic or unexpected termination
    #[error("Worker {worker_id} panicked or terminated unexpectedly")]
    WorkerPanic { worker_id: usize },

    /// Invalid worker configuration
    #[error("Invalid worker configuration: {0}")]
    Configuration(String),
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Configuration file explicitly requested but missing
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Configuration file could not be read
    #[error("Failed to read configuration file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration format
    #[error("Invalid configuration format: {0}")]
    InvalidFormat(#[from] toml::de::Error),

    /// Configuration could not be rendered back to TOML
    #[error("Failed to render configuration")]
    Render(#[from] toml::ser::Error),

    /// Invalid configuration value
    #[error("Invalid configuration value for {field}: {value}. {reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },
}

/// Top-level application error that can represent any error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Master manifest fetch error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Output error
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Dispatch error
    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Generic application error with context
    #[error("Application error: {message}")]
    Generic { message: String },
}

impl AppError {
    /// Create a generic application error with a message
    pub fn generic(message: impl Into<String>) -> Self {
        Self::Generic {
            message: message.into(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Fetch(_) => "fetch",
            AppError::Output(_) => "output",
            AppError::Dispatch(_) => "dispatch",
            AppError::Config(_) => "config",
            AppError::Generic { .. } => "generic",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Fetch result type alias
pub type FetchResult<T> = std::result::Result<T, FetchError>;

/// Output result type alias
pub type OutputResult<T> = std::result::Result<T, OutputError>;

/// Dispatch result type alias
pub type DispatchResult<T> = std::result::Result<T, DispatchError>;

/// Configuration result type alias
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

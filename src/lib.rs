//! Playlist Sieve Library
//!
//! Filters an extended M3U master playlist down to the entries whose stream
//! URLs answer like HLS playlists. Probing is concurrent, bounded, and
//! deduplicated, and the filtered playlist is written atomically.

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod errors;
pub mod prelude;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};

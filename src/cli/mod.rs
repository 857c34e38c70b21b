//! Command-line interface components
//!
//! This module contains CLI-specific code for the Playlist Sieve application,
//! including argument parsing, command handlers, and progress display.

pub mod args;
pub mod commands;
pub mod progress;

pub use args::{Cli, Commands, FilterArgs, GlobalArgs, ProbeArgs};
pub use commands::{format_probe_line, handle_config, handle_filter, handle_probe};
pub use progress::{format_counts, ProgressDisplay};

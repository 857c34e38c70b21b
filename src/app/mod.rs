//! Core application logic for Playlist Sieve
//!
//! This module contains the pipeline components: the HTTP client for the
//! master playlist, the lenient M3U parser, the URL gate, the stream
//! validator, the worker pool, the output assembler, and the coordinator that
//! ties them together.
//!
//! # Examples
//!
//! ```rust,no_run
//! use playlist_sieve::app::{parse_playlist, PlaylistClient, ProbeConfig, StreamValidator};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = PlaylistClient::new()?;
//! let text = client
//!     .fetch_master("https://iptv-org.github.io/iptv/index.m3u")
//!     .await?;
//!
//! let validator = StreamValidator::new(client.client().clone(), ProbeConfig::default());
//! for entry in parse_playlist(&text).iter().take(5) {
//!     let outcome = validator.validate(&entry.stream_url).await;
//!     println!("{}: {}", entry.name, outcome.reason);
//! }
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod client;
pub mod coordinator;
pub mod gate;
pub mod models;
pub mod parser;
pub mod validator;
pub mod worker;

// Re-export main public API
pub use assembler::{render_playlist, OutputConfig, OutputOrder, VerdictReport};
pub use client::{ClientConfig, PlaylistClient};
pub use coordinator::{Coordinator, CoordinatorConfig, SessionResult};
pub use gate::{GateDecision, GateRejection, UrlGate};
pub use models::{PlaylistEntry, ProbeOutcome, ValidationVerdict, VerdictReason};
pub use parser::{parse_playlist, parse_playlist_with_stats, ParseStats};
pub use validator::{ProbeConfig, StreamProbe, StreamValidator};
pub use worker::{DispatchOutcome, DispatchProgress, PoolStats, WorkerConfig, WorkerPool};

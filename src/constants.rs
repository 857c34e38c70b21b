//! Application constants for Playlist Sieve
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain.

use std::time::Duration;

/// Environment variable names for overrides
pub mod env {
    /// Overrides the master playlist URL
    pub const MASTER_URL: &str = "PLAYLIST_SIEVE_MASTER_URL";

    /// Overrides the output playlist path
    pub const OUTPUT_PATH: &str = "PLAYLIST_SIEVE_OUTPUT";
}

/// HTTP client configuration constants
pub mod http {
    use super::Duration;

    /// Default user agent for all HTTP requests
    pub const USER_AGENT: &str = "Playlist-Sieve/0.1.0 (HLS stream validator)";

    /// Timeout for fetching the master playlist
    pub const MASTER_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Connection pool idle timeout
    pub const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(30);

    /// Maximum idle connections per host in pool
    pub const POOL_MAX_PER_HOST: usize = 4;

    /// Maximum number of redirects to follow
    pub const MAX_REDIRECTS: usize = 10;
}

/// Stream probe constants
pub mod probe {
    use super::Duration;

    /// Overall budget for one probe, connect through body read
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(9);

    /// Last byte offset requested in the `Range` header (inclusive)
    pub const DEFAULT_RANGE_END: u64 = 8191;

    /// Signature that opens every HLS playlist
    pub const MANIFEST_MARKER: &str = "#EXTM3U";

    /// File extension used by HLS playlists
    pub const MANIFEST_EXTENSION: &str = ".m3u8";

    /// Content types that identify an HLS playlist
    pub const HLS_CONTENT_TYPES: &[&str] = &[
        "application/vnd.apple.mpegurl",
        "application/x-mpegurl",
        "audio/mpegurl",
        "audio/x-mpegurl",
    ];
}

/// Playlist format constants
pub mod playlist {
    /// Default master playlist
    pub const DEFAULT_MASTER_URL: &str = "https://iptv-org.github.io/iptv/index.m3u";

    /// Default location of the filtered playlist
    pub const DEFAULT_OUTPUT_PATH: &str = "./playlist/index.m3u";

    /// Header line of an extended M3U file
    pub const HEADER: &str = "#EXTM3U";

    /// Directive that describes the next stream entry
    pub const DIRECTIVE: &str = "#EXTINF";

    /// Attribute carrying the channel logo
    pub const ATTR_TVG_LOGO: &str = "tvg-logo";

    /// Attribute carrying the guide identifier
    pub const ATTR_TVG_ID: &str = "tvg-id";
}

/// File operation constants
pub mod files {
    /// Temporary file suffix for atomic operations
    pub const TEMP_FILE_SUFFIX: &str = ".tmp";

    /// Project-local configuration file name
    pub const LOCAL_CONFIG_FILE: &str = "playlist-sieve.toml";

    /// Directory under the user config dir
    pub const CONFIG_DIR_NAME: &str = "playlist-sieve";
}

/// Worker and concurrency configuration
pub mod workers {
    /// Default number of concurrent validation workers
    pub const DEFAULT_MAX_CONCURRENT: usize = 12;

    /// Hard ceiling on concurrent validation workers
    pub const MAX_CONCURRENT_CEILING: usize = 12;

    /// Channel buffer size for verdict delivery
    pub const VERDICT_BUFFER_SIZE: usize = 64;

    /// Channel buffer size for progress events
    pub const PROGRESS_BUFFER_SIZE: usize = 256;
}

/// Logging constants
pub mod logging {
    /// Default log level
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

// Re-export commonly used constants for convenience
pub use http::USER_AGENT;
pub use playlist::{DEFAULT_MASTER_URL, DEFAULT_OUTPUT_PATH};
pub use probe::{DEFAULT_RANGE_END, DEFAULT_TIMEOUT as PROBE_TIMEOUT, MANIFEST_MARKER};
pub use workers::{DEFAULT_MAX_CONCURRENT, MAX_CONCURRENT_CEILING};

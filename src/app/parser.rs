//! Lenient extended-M3U parser
//!
//! Upstream playlists carry no schema guarantee, so nothing in here fails:
//! missing attributes become empty strings and a directive without a URL line
//! yields an entry with an empty `stream_url` that the URL gate later drops.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::app::models::PlaylistEntry;
use crate::constants::playlist;

static ATTRIBUTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([A-Za-z0-9_-]+)="([^"]*)""#).expect("attribute regex is valid"));

/// Counters collected while parsing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    /// Total lines in the input
    pub lines: usize,
    /// `#EXTINF` directives seen
    pub directives: usize,
    /// Directives with no URL line following them
    pub missing_url: usize,
    /// Non-blank lines not consumed as a directive or its URL
    pub skipped: usize,
}

/// Parse playlist text into entries, one per `#EXTINF` directive
pub fn parse_playlist(text: &str) -> Vec<PlaylistEntry> {
    parse_playlist_with_stats(text).0
}

/// Parse playlist text and also report what was seen
pub fn parse_playlist_with_stats(text: &str) -> (Vec<PlaylistEntry>, ParseStats) {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut stats = ParseStats {
        lines: lines.len(),
        ..Default::default()
    };
    let mut entries = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        i += 1;

        if line.is_empty() {
            continue;
        }

        if !line.starts_with(playlist::DIRECTIVE) {
            stats.skipped += 1;
            continue;
        }

        stats.directives += 1;

        // The URL is the next non-blank line, unless that line is another directive
        let mut stream_url = String::new();
        while i < lines.len() && lines[i].is_empty() {
            i += 1;
        }
        if i < lines.len() && !lines[i].starts_with(playlist::DIRECTIVE) {
            stream_url = lines[i].to_string();
            i += 1;
        }

        if stream_url.is_empty() {
            stats.missing_url += 1;
            debug!("Directive without stream URL: {}", line);
        }

        entries.push(PlaylistEntry {
            index: entries.len(),
            meta_line: line.to_string(),
            name: display_name(line),
            tvg_logo: extract_attribute(line, playlist::ATTR_TVG_LOGO),
            tvg_id: extract_attribute(line, playlist::ATTR_TVG_ID),
            stream_url,
        });
    }

    debug!(
        "Parsed {} entries from {} lines ({} without URL, {} skipped)",
        entries.len(),
        stats.lines,
        stats.missing_url,
        stats.skipped
    );

    (entries, stats)
}

/// Everything after the first comma, trimmed
pub fn display_name(meta_line: &str) -> String {
    meta_line
        .split_once(',')
        .map(|(_, name)| name.trim().to_string())
        .unwrap_or_default()
}

/// Value of `key="..."` on a directive line, or an empty string
pub fn extract_attribute(meta_line: &str, key: &str) -> String {
    ATTRIBUTE_RE
        .captures_iter(meta_line)
        .find(|caps| &caps[1] == key)
        .map(|caps| caps[2].to_string())
        .unwrap_or_default()
}

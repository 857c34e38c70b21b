//! Worker pool tests with scripted probes
//!
//! These tests drive the dispatcher without a network: probes return canned
//! outcomes and record how often, and how concurrently, they were called.


use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::app::models::{PlaylistEntry, ProbeOutcome, VerdictReason};
use crate::app::validator::StreamProbe;

/// Probe that answers from a script and counts calls
#[derive(Default)]
pub struct ScriptedProbe {
    /// Outcome per URL; unscripted URLs get `NoSignal`
    script: HashMap<String, VerdictReason>,
    /// Extra latency per URL
    delays: HashMap<String, Duration>,
    /// Latency for every call
    base_delay: Duration,
    /// URLs whose probe panics
    panics_on: Option<String>,
    calls: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ScriptedProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, url: &str, reason: VerdictReason) -> Self {
        self.script.insert(url.to_string(), reason);
        self
    }

    pub fn delay(mut self, url: &str, delay: Duration) -> Self {
        self.delays.insert(url.to_string(), delay);
        self
    }

    pub fn base_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn panic_on(mut self, url: &str) -> Self {
        self.panics_on = Some(url.to_string());
        self
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.calls.lock().unwrap().get(url).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StreamProbe for ScriptedProbe {
    async fn probe(&self, url: &str) -> ProbeOutcome {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_insert(0) += 1;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.panics_on.as_deref() == Some(url) {
            panic!("scripted probe panic for {url}");
        }

        let delay = self.base_delay + self.delays.get(url).copied().unwrap_or_default();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        let reason = self
            .script
            .get(url)
            .copied()
            .unwrap_or(VerdictReason::NoSignal);
        ProbeOutcome::new(reason, Some(200))
    }
}

/// Build entries with sequential indices from URLs
pub fn entries(urls: &[&str]) -> Vec<PlaylistEntry> {
    urls.iter()
        .enumerate()
        .map(|(index, url)| PlaylistEntry {
            index,
            meta_line: format!("#EXTINF:-1,Channel {index}"),
            name: format!("Channel {index}"),
            tvg_logo: String::new(),
            tvg_id: String::new(),
            stream_url: url.to_string(),
        })
        .collect()
}

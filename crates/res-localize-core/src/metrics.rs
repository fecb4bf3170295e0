//! Resolution counters.
//!
//! Each controller owns one [`LocalizationMetrics`]; share it through an
//! `Arc` when several controllers should report into the same counters.

use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Default)]
pub struct LocalizationMetrics {
    /// Lookups answered by the entry the component asked for.
    dictionary_hits: AtomicUsize,

    /// Lookups that had to fall back to a default entry (or to nothing).
    missing_localizations: AtomicUsize,

    /// Times a dictionary was rebuilt from storage.
    dictionary_rebuilds: AtomicUsize,

    /// Successful `set_language` calls.
    language_switches: AtomicUsize,
}

impl LocalizationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.dictionary_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_missing(&self) {
        self.missing_localizations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rebuild(&self) {
        self.dictionary_rebuilds.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_switch(&self) {
        self.language_switches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn dictionary_hits(&self) -> usize {
        self.dictionary_hits.load(Ordering::Relaxed)
    }

    pub fn missing_localizations(&self) -> usize {
        self.missing_localizations.load(Ordering::Relaxed)
    }

    pub fn dictionary_rebuilds(&self) -> usize {
        self.dictionary_rebuilds.load(Ordering::Relaxed)
    }

    pub fn language_switches(&self) -> usize {
        self.language_switches.load(Ordering::Relaxed)
    }

    pub fn report(&self) -> MetricsReport {
        let hits = self.dictionary_hits();
        let missing = self.missing_localizations();
        let lookups = hits + missing;
        let hit_rate = if lookups > 0 {
            (hits as f64 / lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            dictionary_hits: hits,
            missing_localizations: missing,
            hit_rate,
            dictionary_rebuilds: self.dictionary_rebuilds(),
            language_switches: self.language_switches(),
        }
    }

    pub fn reset(&self) {
        self.dictionary_hits.store(0, Ordering::Relaxed);
        self.missing_localizations.store(0, Ordering::Relaxed);
        self.dictionary_rebuilds.store(0, Ordering::Relaxed);
        self.language_switches.store(0, Ordering::Relaxed);
    }
}

/// Snapshot of [`LocalizationMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsReport {
    pub dictionary_hits: usize,
    pub missing_localizations: usize,
    /// Share of lookups served without fallback, as a percentage (0-100).
    pub hit_rate: f64,
    pub dictionary_rebuilds: usize,
    pub language_switches: usize,
}

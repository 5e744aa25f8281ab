//! Diagnostic counters for the translation path.
//!
//! Every degraded outcome on the translation path (missing key, fallback
//! substitution, failed load, failing subscriber) is counted here instead of
//! only being logged, so a test or the `check` binary can assert that a page
//! renders with zero missing translations.

use serde::Serialize;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Diagnostic counters shared by the store, resolver and language state.
#[derive(Debug, Default)]
pub struct TranslationMetrics {
    /// Number of resolutions served from the `(language, key)` cache
    cache_hits: AtomicUsize,

    /// Number of resolutions that had to walk a dictionary
    cache_misses: AtomicUsize,

    /// Number of resolutions answered by the fallback language
    fallback_hits: AtomicUsize,

    /// Number of resolutions that degraded to the raw key
    missing_translations: AtomicUsize,

    /// Number of unsupported language codes that were coerced
    unsupported_languages: AtomicUsize,

    /// Number of language loads that failed
    load_failures: AtomicUsize,

    /// Number of language-change subscribers that failed
    subscriber_failures: AtomicUsize,

    /// Distinct keys that degraded to the raw key
    missing_keys: Mutex<BTreeSet<String>>,
}

impl TranslationMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_cache_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cache_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fallback_hit(&self) {
        self.fallback_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a key that resolved in neither the requested nor the fallback language.
    pub fn record_missing(&self, key: &str) {
        self.missing_translations.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut keys) = self.missing_keys.lock() {
            keys.insert(key.to_string());
        }
    }

    pub fn record_unsupported_language(&self) {
        self.unsupported_languages.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_load_failure(&self) {
        self.load_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_subscriber_failure(&self) {
        self.subscriber_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn cache_hits(&self) -> usize {
        self.cache_hits.load(Ordering::Relaxed)
    }

    pub fn cache_misses(&self) -> usize {
        self.cache_misses.load(Ordering::Relaxed)
    }

    pub fn fallback_hits(&self) -> usize {
        self.fallback_hits.load(Ordering::Relaxed)
    }

    pub fn missing_translations(&self) -> usize {
        self.missing_translations.load(Ordering::Relaxed)
    }

    pub fn unsupported_languages(&self) -> usize {
        self.unsupported_languages.load(Ordering::Relaxed)
    }

    pub fn load_failures(&self) -> usize {
        self.load_failures.load(Ordering::Relaxed)
    }

    pub fn subscriber_failures(&self) -> usize {
        self.subscriber_failures.load(Ordering::Relaxed)
    }

    /// Distinct missing keys, sorted.
    pub fn missing_keys(&self) -> Vec<String> {
        self.missing_keys
            .lock()
            .map(|keys| keys.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Generate a metrics report.
    pub fn report(&self) -> MetricsReport {
        let hits = self.cache_hits();
        let misses = self.cache_misses();
        let total_lookups = hits + misses;
        let cache_hit_rate = if total_lookups > 0 {
            (hits as f64 / total_lookups as f64) * 100.0
        } else {
            0.0
        };

        MetricsReport {
            cache_hits: hits,
            cache_misses: misses,
            cache_hit_rate,
            fallback_hits: self.fallback_hits(),
            missing_translations: self.missing_translations(),
            missing_keys: self.missing_keys(),
            unsupported_languages: self.unsupported_languages(),
            load_failures: self.load_failures(),
            subscriber_failures: self.subscriber_failures(),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.cache_hits.store(0, Ordering::Relaxed);
        self.cache_misses.store(0, Ordering::Relaxed);
        self.fallback_hits.store(0, Ordering::Relaxed);
        self.missing_translations.store(0, Ordering::Relaxed);
        self.unsupported_languages.store(0, Ordering::Relaxed);
        self.load_failures.store(0, Ordering::Relaxed);
        self.subscriber_failures.store(0, Ordering::Relaxed);
        if let Ok(mut keys) = self.missing_keys.lock() {
            keys.clear();
        }
    }
}

/// Metrics report containing current translation statistics.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsReport {
    pub cache_hits: usize,
    pub cache_misses: usize,

    /// Cache hit rate as a percentage (0-100)
    pub cache_hit_rate: f64,

    pub fallback_hits: usize,
    pub missing_translations: usize,
    pub missing_keys: Vec<String>,
    pub unsupported_languages: usize,
    pub load_failures: usize,
    pub subscriber_failures: usize,
}

impl MetricsReport {
    /// True when nothing degraded: no missing keys, failed loads or failed subscribers.
    pub fn is_complete(&self) -> bool {
        self.missing_translations == 0 && self.load_failures == 0 && self.subscriber_failures == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Counter Tests ====================

    #[test]
    fn test_record_cache_hit_and_miss() {
        let metrics = TranslationMetrics::new();

        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_miss();

        assert_eq!(metrics.cache_hits(), 2);
        assert_eq!(metrics.cache_misses(), 1);
    }

    #[test]
    fn test_record_missing_tracks_distinct_keys() {
        let metrics = TranslationMetrics::new();

        metrics.record_missing("nav.missing");
        metrics.record_missing("hero.gone");
        metrics.record_missing("nav.missing");

        assert_eq!(metrics.missing_translations(), 3);
        assert_eq!(
            metrics.missing_keys(),
            vec!["hero.gone".to_string(), "nav.missing".to_string()]
        );
    }

    #[test]
    fn test_failure_counters() {
        let metrics = TranslationMetrics::new();

        metrics.record_load_failure();
        metrics.record_subscriber_failure();
        metrics.record_unsupported_language();
        metrics.record_fallback_hit();

        assert_eq!(metrics.load_failures(), 1);
        assert_eq!(metrics.subscriber_failures(), 1);
        assert_eq!(metrics.unsupported_languages(), 1);
        assert_eq!(metrics.fallback_hits(), 1);
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_empty() {
        let report = TranslationMetrics::new().report();

        assert_eq!(report.cache_hits, 0);
        assert_eq!(report.cache_hit_rate, 0.0);
        assert!(report.missing_keys.is_empty());
        assert!(report.is_complete());
    }

    #[test]
    fn test_report_cache_hit_rate() {
        let metrics = TranslationMetrics::new();

        // 3 hits, 1 miss = 75% hit rate
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_hit();
        metrics.record_cache_miss();

        assert_eq!(metrics.report().cache_hit_rate, 75.0);
    }

    #[test]
    fn test_report_incomplete_with_missing_translation() {
        let metrics = TranslationMetrics::new();
        metrics.record_missing("contact.form.send");

        let report = metrics.report();
        assert!(!report.is_complete());
        assert_eq!(report.missing_keys, vec!["contact.form.send".to_string()]);
    }

    #[test]
    fn test_report_serializes_to_json() {
        let metrics = TranslationMetrics::new();
        metrics.record_missing("a.b");

        let json = serde_json::to_value(metrics.report()).expect("Should serialize");
        assert_eq!(json["missing_translations"], 1);
        assert_eq!(json["missing_keys"][0], "a.b");
    }

    #[test]
    fn test_reset() {
        let metrics = TranslationMetrics::new();
        metrics.record_cache_hit();
        metrics.record_missing("x");
        metrics.reset();

        assert_eq!(metrics.cache_hits(), 0);
        assert_eq!(metrics.missing_translations(), 0);
        assert!(metrics.missing_keys().is_empty());
    }

    #[test]
    fn test_instances_are_independent() {
        let first = TranslationMetrics::new();
        let second = TranslationMetrics::new();
        first.record_cache_hit();

        assert_eq!(first.cache_hits(), 1);
        assert_eq!(second.cache_hits(), 0);
    }
}

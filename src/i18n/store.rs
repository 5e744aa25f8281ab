//! Translation store: owns the per-language dictionaries.

use crate::i18n::{DataSource, I18nError, Language, TranslationDictionary, TranslationMetrics};
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

pub struct TranslationStore {
    dictionaries: HashMap<Language, TranslationDictionary>,
    /// `(source, language)` pairs already fetched, so `load` is idempotent per source
    loaded: HashSet<(DataSource, Language)>,
    fallback: Language,
    /// Bumped on every mutation; resolver caches compare against it
    revision: u64,
    empty: TranslationDictionary,
    metrics: Arc<TranslationMetrics>,
}

impl TranslationStore {
    pub fn new(fallback: Language, metrics: Arc<TranslationMetrics>) -> Self {
        Self {
            dictionaries: HashMap::new(),
            loaded: HashSet::new(),
            fallback,
            revision: 0,
            empty: TranslationDictionary::new(),
            metrics,
        }
    }

    /// Fetch `source`'s data for every requested language not yet fetched from it.
    ///
    /// Languages are fetched concurrently. Data from several sources for the
    /// same language is deep-merged. A language whose data cannot be obtained
    /// stays unregistered; the failure is logged and counted, never returned.
    ///
    /// # Returns
    /// The number of languages newly loaded from this source.
    pub async fn load(&mut self, languages: &[Language], source: &DataSource) -> usize {
        let mut pending: Vec<Language> = Vec::new();
        for language in languages {
            if !self.loaded.contains(&(source.clone(), *language)) && !pending.contains(language) {
                pending.push(*language);
            }
        }

        if pending.is_empty() {
            debug!("All requested languages already loaded from {}", source);
            return 0;
        }

        // Fetched concurrently, merged in request order
        let concurrency = pending.len();
        let results = stream::iter(pending)
            .map(|language| async move { (language, source.fetch(language).await) })
            .buffered(concurrency)
            .collect::<Vec<_>>()
            .await;

        let mut loaded_count = 0;
        for (language, result) in results {
            match result {
                Ok(dictionary) => {
                    self.insert_or_merge(language, dictionary);
                    self.loaded.insert((source.clone(), language));
                    loaded_count += 1;
                    info!("✓ Translations loaded for {} from {}", language, source);
                }
                Err(e) => {
                    self.metrics.record_load_failure();
                    let failure = I18nError::LoadFailure {
                        language: language.code().to_string(),
                        source_name: source.to_string(),
                        reason: format!("{:#}", e),
                    };
                    error!("{}", failure);
                }
            }
        }

        loaded_count
    }

    /// Dictionary for a language, or the fallback's (with a warning), or an
    /// empty dictionary if even the fallback is absent.
    pub fn get(&self, language: Language) -> &TranslationDictionary {
        if let Some(dictionary) = self.dictionaries.get(&language) {
            return dictionary;
        }

        if language != self.fallback {
            warn!(
                "No translations for {}; falling back to {}",
                language, self.fallback
            );
            if let Some(dictionary) = self.dictionaries.get(&self.fallback) {
                return dictionary;
            }
        }

        warn!("No translations available for {}", language);
        &self.empty
    }

    /// Dictionary for exactly this language, without fallback or logging.
    pub fn dictionary(&self, language: Language) -> Option<&TranslationDictionary> {
        self.dictionaries.get(&language)
    }

    /// True iff `code` is in the fixed language set, whether or not data has loaded.
    pub fn is_supported(&self, code: &str) -> bool {
        Language::from_code(code).is_ok()
    }

    pub fn is_loaded(&self, language: Language) -> bool {
        self.dictionaries.contains_key(&language)
    }

    /// Languages with data, in registry order.
    pub fn loaded_languages(&self) -> Vec<Language> {
        Language::all()
            .into_iter()
            .filter(|language| self.is_loaded(*language))
            .collect()
    }

    /// Deep-merge extra translations into a language, creating it if absent.
    pub fn merge(&mut self, language: Language, partial: TranslationDictionary) {
        self.insert_or_merge(language, partial);
        debug!("Translations merged for {}", language);
    }

    /// Drop all data and load bookkeeping.
    pub fn reset(&mut self) {
        self.dictionaries.clear();
        self.loaded.clear();
        self.revision += 1;
    }

    pub fn fallback(&self) -> Language {
        self.fallback
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    fn insert_or_merge(&mut self, language: Language, dictionary: TranslationDictionary) {
        self.dictionaries
            .entry(language)
            .or_default()
            .merge(dictionary);
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> TranslationStore {
        TranslationStore::new(Language::SPANISH, Arc::new(TranslationMetrics::new()))
    }

    fn dictionary(value: serde_json::Value) -> TranslationDictionary {
        TranslationDictionary::from_value(value).unwrap()
    }

    // ==================== load Tests ====================

    #[tokio::test]
    async fn test_load_inline_registers_languages() {
        let mut store = store();
        let loaded = store
            .load(&[Language::SPANISH, Language::ENGLISH], &DataSource::Inline)
            .await;

        assert_eq!(loaded, 2);
        assert!(store.is_loaded(Language::SPANISH));
        assert!(store.is_loaded(Language::ENGLISH));
    }

    #[tokio::test]
    async fn test_load_is_idempotent_per_source() {
        let mut store = store();
        store.load(&[Language::ENGLISH], &DataSource::Inline).await;
        let revision = store.revision();

        let loaded = store
            .load(&[Language::ENGLISH, Language::ENGLISH], &DataSource::Inline)
            .await;

        assert_eq!(loaded, 0);
        assert_eq!(store.revision(), revision);
    }

    #[tokio::test]
    async fn test_load_failure_leaves_language_unregistered() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("es.json"), r#"{"nav":{"home":"Inicio"}}"#).unwrap();
        let template = dir.path().join("{lang}.json").to_string_lossy().to_string();

        let mut store = store();
        let loaded = store
            .load(
                &[Language::SPANISH, Language::ENGLISH],
                &DataSource::File(template),
            )
            .await;

        assert_eq!(loaded, 1);
        assert!(store.is_loaded(Language::SPANISH));
        assert!(!store.is_loaded(Language::ENGLISH));
        assert_eq!(store.metrics().load_failures(), 1);
    }

    #[tokio::test]
    async fn test_load_from_two_sources_merges() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.json");
        std::fs::write(&file, r#"{"personal":{"name":{"es":"Laura","en":"Laura"}}}"#).unwrap();

        let mut store = store();
        store.load(&[Language::ENGLISH], &DataSource::Inline).await;
        store
            .load(
                &[Language::ENGLISH],
                &DataSource::File(file.to_string_lossy().to_string()),
            )
            .await;

        let english = store.get(Language::ENGLISH);
        assert!(english.lookup("nav.inicio").is_some());
        assert!(english.lookup("personal.name").is_some());
    }

    // ==================== get Tests ====================

    #[test]
    fn test_get_falls_back_to_fallback_language() {
        let mut store = store();
        store.merge(Language::SPANISH, dictionary(json!({ "nav": { "home": "Inicio" } })));

        let dict = store.get(Language::ENGLISH);
        assert_eq!(dict.lookup("nav.home"), Some(&json!("Inicio")));
    }

    #[test]
    fn test_get_empty_when_nothing_loaded() {
        let store = store();
        assert!(store.get(Language::ENGLISH).is_empty());
        assert!(store.get(Language::SPANISH).is_empty());
    }

    // ==================== is_supported Tests ====================

    #[test]
    fn test_is_supported_independent_of_loading() {
        let store = store();
        assert!(store.is_supported("en"));
        assert!(store.is_supported("es"));
        assert!(!store.is_supported("fr"));
        assert!(!store.is_loaded(Language::ENGLISH));
    }

    // ==================== merge Tests ====================

    #[test]
    fn test_merge_creates_language_entry() {
        let mut store = store();
        store.merge(Language::ENGLISH, dictionary(json!({ "blog": { "title": "Blog" } })));

        assert!(store.is_loaded(Language::ENGLISH));
        assert_eq!(store.loaded_languages(), vec![Language::ENGLISH]);
    }

    #[test]
    fn test_merge_bumps_revision_and_keeps_existing_keys() {
        let mut store = store();
        store.merge(Language::SPANISH, dictionary(json!({ "nav": { "home": "Inicio" } })));
        let revision = store.revision();

        store.merge(Language::SPANISH, dictionary(json!({ "nav": { "blog": "Blog" } })));

        assert!(store.revision() > revision);
        let spanish = store.get(Language::SPANISH);
        assert_eq!(spanish.lookup("nav.home"), Some(&json!("Inicio")));
        assert_eq!(spanish.lookup("nav.blog"), Some(&json!("Blog")));
    }

    // ==================== reset Tests ====================

    #[tokio::test]
    async fn test_reset_allows_reload() {
        let mut store = store();
        store.load(&[Language::SPANISH], &DataSource::Inline).await;
        store.reset();

        assert!(!store.is_loaded(Language::SPANISH));
        assert_eq!(store.load(&[Language::SPANISH], &DataSource::Inline).await, 1);
    }
}

//! Translation completeness validation.
//!
//! Compares the loaded dictionaries of every supported language and reports
//! keys that only some languages define, per-language maps that lack an
//! entry, and `{{placeholder}}` sets that differ between languages.

use crate::i18n::{Language, TranslationStore};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

/// Validation report containing errors and warnings about the dictionaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Keys that will degrade to fallback text or the raw key
    pub errors: Vec<String>,

    /// Suspicious but renderable content
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_clean(&self) -> bool {
        !self.has_errors() && !self.has_warnings()
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Cross-language completeness checker.
pub struct CompletenessValidator;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

impl CompletenessValidator {
    /// Validate every supported language in the store against the others.
    ///
    /// # Returns
    /// A `ValidationReport`; errors for unloaded languages and missing
    /// entries, warnings for empty texts and placeholder mismatches.
    pub fn validate(store: &TranslationStore) -> ValidationReport {
        let mut report = ValidationReport::new();
        let languages = Language::all();

        for language in &languages {
            if !store.is_loaded(*language) {
                report
                    .errors
                    .push(format!("No translations loaded for '{}'", language));
            }
        }

        let keys: BTreeSet<String> = store
            .loaded_languages()
            .into_iter()
            .filter_map(|language| store.dictionary(language))
            .flat_map(|dictionary| dictionary.terminal_keys())
            .collect();

        for key in &keys {
            let mut placeholders: BTreeMap<&'static str, BTreeSet<String>> = BTreeMap::new();

            for language in store.loaded_languages() {
                let Some(dictionary) = store.dictionary(language) else {
                    continue;
                };

                match Self::text_for(dictionary.lookup(key), language) {
                    TextLookup::Found(text) => {
                        if text.trim().is_empty() {
                            report
                                .warnings
                                .push(format!("Empty translation for '{}' in '{}'", key, language));
                        }
                        placeholders.insert(language.code(), Self::extract_placeholders(text));
                    }
                    TextLookup::MissingEntry => report.errors.push(format!(
                        "Key '{}' has no '{}' entry",
                        key, language
                    )),
                    TextLookup::MissingKey => report
                        .errors
                        .push(format!("Missing key '{}' for '{}'", key, language)),
                }
            }

            let distinct: BTreeSet<&BTreeSet<String>> = placeholders.values().collect();
            if distinct.len() > 1 {
                report.warnings.push(format!(
                    "Placeholder mismatch for '{}': {:?}",
                    key, placeholders
                ));
            }
        }

        report
    }

    /// Text a language would display for a terminal value.
    fn text_for(value: Option<&Value>, language: Language) -> TextLookup<'_> {
        match value {
            Some(Value::String(text)) => TextLookup::Found(text),
            Some(Value::Object(map)) => match map.get(language.code()).and_then(Value::as_str) {
                Some(text) => TextLookup::Found(text),
                None => TextLookup::MissingEntry,
            },
            _ => TextLookup::MissingKey,
        }
    }

    /// Extract all `{{name}}` placeholder names from text
    fn extract_placeholders(text: &str) -> BTreeSet<String> {
        let regex = PLACEHOLDER_REGEX.get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").unwrap());

        regex
            .captures_iter(text)
            .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
            .collect()
    }
}

enum TextLookup<'a> {
    Found(&'a str),
    MissingEntry,
    MissingKey,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{DataSource, TranslationDictionary, TranslationMetrics};
    use serde_json::json;
    use std::sync::Arc;

    fn store() -> TranslationStore {
        TranslationStore::new(Language::SPANISH, Arc::new(TranslationMetrics::new()))
    }

    fn dictionary(value: Value) -> TranslationDictionary {
        TranslationDictionary::from_value(value).unwrap()
    }

    // ==================== Placeholder Extraction Tests ====================

    #[test]
    fn test_extract_placeholders_multiple() {
        let names = CompletenessValidator::extract_placeholders("© {{year}} {{owner}}");
        assert_eq!(
            names,
            BTreeSet::from(["owner".to_string(), "year".to_string()])
        );
    }

    #[test]
    fn test_extract_placeholders_none() {
        assert!(CompletenessValidator::extract_placeholders("Hola {name}").is_empty());
    }

    // ==================== validate Tests ====================

    #[tokio::test]
    async fn test_builtin_dictionaries_are_clean() {
        let mut store = store();
        store
            .load(&[Language::SPANISH, Language::ENGLISH], &DataSource::Inline)
            .await;

        let report = CompletenessValidator::validate(&store);
        assert!(report.is_clean(), "{:?}", report);
    }

    #[test]
    fn test_unloaded_language_is_an_error() {
        let mut store = store();
        store.merge(Language::SPANISH, dictionary(json!({ "nav": { "home": "Inicio" } })));

        let report = CompletenessValidator::validate(&store);
        assert!(report.has_errors());
        assert!(report.errors.iter().any(|e| e.contains("'en'")));
    }

    #[test]
    fn test_key_missing_in_one_language() {
        let mut store = store();
        store.merge(
            Language::SPANISH,
            dictionary(json!({ "nav": { "home": "Inicio", "blog": "Blog" } })),
        );
        store.merge(Language::ENGLISH, dictionary(json!({ "nav": { "home": "Home" } })));

        let report = CompletenessValidator::validate(&store);
        assert_eq!(report.errors, vec!["Missing key 'nav.blog' for 'en'".to_string()]);
    }

    #[test]
    fn test_localized_map_missing_entry() {
        let shared = json!({ "personal": { "title": { "es": "Ingeniera" } } });
        let mut store = store();
        store.merge(Language::SPANISH, dictionary(shared.clone()));
        store.merge(Language::ENGLISH, dictionary(shared));

        let report = CompletenessValidator::validate(&store);
        assert_eq!(
            report.errors,
            vec!["Key 'personal.title' has no 'en' entry".to_string()]
        );
    }

    #[test]
    fn test_placeholder_mismatch_is_a_warning() {
        let mut store = store();
        store.merge(
            Language::SPANISH,
            dictionary(json!({ "footer": { "copyright": "© {{year}} Laura" } })),
        );
        store.merge(
            Language::ENGLISH,
            dictionary(json!({ "footer": { "copyright": "© Laura" } })),
        );

        let report = CompletenessValidator::validate(&store);
        assert!(!report.has_errors());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("footer.copyright"));
    }

    #[test]
    fn test_empty_translation_is_a_warning() {
        let mut store = store();
        store.merge(Language::SPANISH, dictionary(json!({ "nav": { "home": "Inicio" } })));
        store.merge(Language::ENGLISH, dictionary(json!({ "nav": { "home": "  " } })));

        let report = CompletenessValidator::validate(&store);
        assert!(!report.has_errors());
        assert!(report.warnings[0].contains("Empty translation"));
    }

    // ==================== Report Tests ====================

    #[test]
    fn test_report_default_is_clean() {
        let report = ValidationReport::default();
        assert!(report.is_clean());
        assert!(!report.has_errors());
        assert!(!report.has_warnings());
    }
}

//! Key resolution: dot-path lookup with per-language fallback.
//!
//! `resolve` never fails. A key that exists in neither the requested nor the
//! fallback language comes back unchanged, so callers always get displayable
//! text and a missing translation shows up on the page as its raw key.

use crate::i18n::{I18nError, Language, TranslationMetrics, TranslationStore};
use regex::Regex;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// Interpolation parameters, keyed by placeholder name.
pub type Params = BTreeMap<String, String>;

static PLACEHOLDER_REGEX: OnceLock<Regex> = OnceLock::new();

pub struct KeyResolver {
    fallback: Language,
    /// Log missing keys at warn level instead of debug
    debug: bool,
    cache: RefCell<HashMap<(Language, String), String>>,
    /// Store revision the cache was filled against
    cache_revision: Cell<u64>,
    metrics: Arc<TranslationMetrics>,
}

impl KeyResolver {
    pub fn new(fallback: Language, debug: bool, metrics: Arc<TranslationMetrics>) -> Self {
        Self {
            fallback,
            debug,
            cache: RefCell::new(HashMap::new()),
            cache_revision: Cell::new(0),
            metrics,
        }
    }

    /// Resolve `key` for `language`, falling back to the fallback language
    /// and finally to the key itself.
    pub fn resolve(&self, store: &TranslationStore, key: &str, language: Language) -> String {
        if key.is_empty() {
            return String::new();
        }

        self.sync_with(store);

        let cache_key = (language, key.to_string());
        if let Some(cached) = self.cache.borrow().get(&cache_key) {
            self.metrics.record_cache_hit();
            return cached.clone();
        }
        self.metrics.record_cache_miss();

        let resolved = lookup(store, key, language).or_else(|| {
            if language == self.fallback {
                return None;
            }
            let fallback_text = lookup(store, key, self.fallback)?;
            self.metrics.record_fallback_hit();
            debug!("'{}' not found for {}; using {}", key, language, self.fallback);
            Some(fallback_text)
        });

        match resolved {
            Some(text) => {
                self.cache.borrow_mut().insert(cache_key, text.clone());
                text
            }
            None => {
                self.metrics.record_missing(key);
                let err = I18nError::MissingTranslation {
                    key: key.to_string(),
                    language: language.code().to_string(),
                };
                if self.debug {
                    warn!("{}", err);
                } else {
                    debug!("{}", err);
                }
                key.to_string()
            }
        }
    }

    /// Resolve against a raw language code. Unsupported codes are coerced to
    /// the fallback language.
    pub fn resolve_code(&self, store: &TranslationStore, key: &str, code: &str) -> String {
        let language = match Language::from_code(code) {
            Ok(language) => language,
            Err(e) => {
                self.metrics.record_unsupported_language();
                warn!("{}; resolving '{}' in {}", e, key, self.fallback);
                self.fallback
            }
        };
        self.resolve(store, key, language)
    }

    /// Resolve and substitute `{{name}}` placeholders from `params`.
    pub fn resolve_with(
        &self,
        store: &TranslationStore,
        key: &str,
        language: Language,
        params: &Params,
    ) -> String {
        interpolate(&self.resolve(store, key, language), params)
    }

    /// Drop every cached resolution.
    pub fn invalidate(&self) {
        self.cache.borrow_mut().clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn fallback(&self) -> Language {
        self.fallback
    }

    fn sync_with(&self, store: &TranslationStore) {
        if self.cache_revision.get() != store.revision() {
            self.invalidate();
            self.cache_revision.set(store.revision());
        }
    }
}

/// Walk one language's dictionary. A string terminal is returned as-is; a
/// per-language map yields its entry for `language`.
fn lookup(store: &TranslationStore, key: &str, language: Language) -> Option<String> {
    let value = store.dictionary(language)?.lookup(key)?;

    match value {
        Value::String(text) => Some(text.clone()),
        Value::Object(map) => map
            .get(language.code())
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

/// Replace `{{name}}` placeholders. Unknown placeholders are left intact.
pub fn interpolate(text: &str, params: &Params) -> String {
    if params.is_empty() || !text.contains("{{") {
        return text.to_string();
    }

    let regex = PLACEHOLDER_REGEX
        .get_or_init(|| Regex::new(r"\{\{(\w+)\}\}").expect("Placeholder regex is valid"));

    regex
        .replace_all(text, |caps: &regex::Captures| {
            params
                .get(&caps[1])
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

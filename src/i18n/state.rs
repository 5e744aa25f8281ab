//! Active-language state: the single source of truth for which language is
//! shown, its persisted preference, and change notification.
//!
//! The state is an explicit object handed to whoever needs it; there is no
//! ambient "current language" global.

use crate::config::I18nConfig;
use crate::i18n::{I18nError, Language, TranslationMetrics};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

// ==================== Persistence ====================

/// Key/value persistence for the language preference (local storage equivalent).
pub trait PreferenceStore {
    /// Read a stored value. Unreadable storage behaves like an absent key.
    fn load(&self, key: &str) -> Option<String>;

    fn save(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Process-local preferences, lost on exit.
#[derive(Debug, Default, Clone)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self { values }
    }
}

impl PreferenceStore for MemoryPreferences {
    fn load(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FilePreferences {
    path: PathBuf,
}

impl FilePreferences {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        match serde_json::from_str::<Value>(&content)
            .with_context(|| format!("Invalid JSON in {}", self.path.display()))?
        {
            Value::Object(map) => Ok(map),
            _ => anyhow::bail!("{} does not contain a JSON object", self.path.display()),
        }
    }
}

impl PreferenceStore for FilePreferences {
    fn load(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(map) => map.get(key).and_then(Value::as_str).map(str::to_string),
            Err(e) => {
                warn!("Preferences not available: {:#}", e);
                None
            }
        }
    }

    fn save(&mut self, key: &str, value: &str) -> Result<()> {
        // A corrupt file is replaced rather than blocking the save
        let mut map = self.read_all().unwrap_or_default();
        map.insert(key.to_string(), Value::String(value.to_string()));

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }

        let content = serde_json::to_string_pretty(&Value::Object(map))?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }
}

// ==================== Change Events ====================

/// Emitted once per successful `set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageChangeEvent {
    pub language: Language,
    pub previous_language: Language,
}

impl LanguageChangeEvent {
    pub fn changed(&self) -> bool {
        self.language != self.previous_language
    }
}

/// Language-change callback. Registration and removal are by `Rc` identity.
pub type Listener = Rc<dyn Fn(&LanguageChangeEvent) -> Result<()>>;

// ==================== State ====================

pub struct LanguageState {
    current: Language,
    fallback: Language,
    storage_key: String,
    storage: Box<dyn PreferenceStore>,
    subscribers: Vec<Listener>,
    metrics: Arc<TranslationMetrics>,
}

impl LanguageState {
    /// Build the state, choosing the starting language with [`LanguageState::initial`].
    pub fn new(
        settings: &I18nConfig,
        storage: Box<dyn PreferenceStore>,
        env_locale: Option<&str>,
        metrics: Arc<TranslationMetrics>,
    ) -> Self {
        let current = Self::initial(settings, storage.as_ref(), env_locale);
        info!("Initial language: {}", current);

        Self {
            current,
            fallback: settings.fallback_language,
            storage_key: settings.storage_key.clone(),
            storage,
            subscribers: Vec::new(),
            metrics,
        }
    }

    /// Starting language, in priority order:
    /// 1. the persisted preference, if it names a supported language
    /// 2. the environment locale's primary subtag, if detection is enabled and it matches
    /// 3. the configured default
    pub fn initial(
        settings: &I18nConfig,
        storage: &dyn PreferenceStore,
        env_locale: Option<&str>,
    ) -> Language {
        if let Some(saved) = storage.load(&settings.storage_key) {
            match Language::from_code(&saved) {
                Ok(language) => return language,
                Err(e) => debug!("Ignoring stored language preference: {}", e),
            }
        }

        if settings.detect_locale {
            if let Some(language) = env_locale.and_then(Language::from_locale) {
                return language;
            }
        }

        settings.default_language
    }

    pub fn current(&self) -> Language {
        self.current
    }

    pub fn fallback(&self) -> Language {
        self.fallback
    }

    /// Validate, persist and apply a new language without notifying anyone.
    ///
    /// Unsupported codes are replaced by the fallback language with a warning.
    pub(crate) fn switch(&mut self, code: &str) -> LanguageChangeEvent {
        let language = match Language::from_code(code) {
            Ok(language) => language,
            Err(e) => {
                self.metrics.record_unsupported_language();
                warn!("{}; using '{}' as fallback", e, self.fallback);
                self.fallback
            }
        };

        if let Err(e) = self.storage.save(&self.storage_key, language.code()) {
            warn!("Could not save language preference: {:#}", e);
        }

        let previous_language = self.current;
        self.current = language;

        if previous_language != language {
            info!("Language changed from {} to {}", previous_language, language);
        }

        LanguageChangeEvent {
            language,
            previous_language,
        }
    }

    /// Invoke every subscriber in registration order.
    ///
    /// A subscriber that returns an error or panics is logged and counted;
    /// the remaining subscribers still run.
    ///
    /// # Returns
    /// The number of subscribers that failed.
    pub(crate) fn notify(&self, event: &LanguageChangeEvent) -> usize {
        let mut failures = 0;

        for (index, listener) in self.subscribers.iter().enumerate() {
            let outcome = catch_unwind(AssertUnwindSafe(|| listener(event)));
            let reason = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => format!("{:#}", e),
                Err(_) => "subscriber panicked".to_string(),
            };

            failures += 1;
            self.metrics.record_subscriber_failure();
            error!("{}", I18nError::SubscriberFailure { index, reason });
        }

        failures
    }

    /// Switch and notify without any page work; `Site::set_language` is the
    /// public path.
    #[cfg(test)]
    pub(crate) fn set(&mut self, code: &str) -> LanguageChangeEvent {
        let event = self.switch(code);
        self.notify(&event);
        event
    }

    /// Register a listener. Registering the same `Rc` twice makes it run twice.
    pub fn subscribe(&mut self, listener: Listener) {
        self.subscribers.push(listener);
    }

    /// Remove the earliest registration of `listener`.
    ///
    /// # Returns
    /// `true` if a registration was removed.
    pub fn unsubscribe(&mut self, listener: &Listener) -> bool {
        match self
            .subscribers
            .iter()
            .position(|registered| Rc::ptr_eq(registered, listener))
        {
            Some(index) => {
                self.subscribers.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    // ==================== Helper Functions ====================

    fn settings() -> I18nConfig {
        I18nConfig::default()
    }

    fn state_with(storage: MemoryPreferences, env_locale: Option<&str>) -> LanguageState {
        LanguageState::new(
            &settings(),
            Box::new(storage),
            env_locale,
            Arc::new(TranslationMetrics::new()),
        )
    }

    type Log = Rc<RefCell<Vec<String>>>;

    fn recording_listener(log: &Log, name: &'static str) -> Listener {
        let log = Rc::clone(log);
        Rc::new(move |event: &LanguageChangeEvent| {
            log.borrow_mut().push(format!(
                "{}:{}->{}",
                name, event.previous_language, event.language
            ));
            Ok(())
        })
    }

    // ==================== initial Tests ====================

    #[test]
    fn test_initial_saved_preference_wins_over_locale() {
        let storage = MemoryPreferences::with_value("preferred-language", "en");
        let language = LanguageState::initial(&settings(), &storage, Some("es-CR"));
        assert_eq!(language, Language::ENGLISH);
    }

    #[test]
    fn test_initial_uses_environment_locale() {
        let language =
            LanguageState::initial(&settings(), &MemoryPreferences::new(), Some("en-US"));
        assert_eq!(language, Language::ENGLISH);
    }

    #[test]
    fn test_initial_ignores_unsupported_saved_value() {
        let storage = MemoryPreferences::with_value("preferred-language", "fr");
        let language = LanguageState::initial(&settings(), &storage, Some("en_US.UTF-8"));
        assert_eq!(language, Language::ENGLISH);
    }

    #[test]
    fn test_initial_unsupported_locale_uses_default() {
        let language =
            LanguageState::initial(&settings(), &MemoryPreferences::new(), Some("fr-FR"));
        assert_eq!(language, Language::SPANISH);
    }

    #[test]
    fn test_initial_detection_disabled() {
        let settings = I18nConfig {
            detect_locale: false,
            ..I18nConfig::default()
        };
        let language = LanguageState::initial(&settings, &MemoryPreferences::new(), Some("en-US"));
        assert_eq!(language, Language::SPANISH);
    }

    #[test]
    fn test_initial_custom_default() {
        let settings = I18nConfig {
            default_language: Language::ENGLISH,
            ..I18nConfig::default()
        };
        let language = LanguageState::initial(&settings, &MemoryPreferences::new(), None);
        assert_eq!(language, Language::ENGLISH);
    }

    // ==================== set Tests ====================

    #[test]
    fn test_set_updates_current_and_returns_event() {
        let mut state = state_with(MemoryPreferences::new(), None);
        let event = state.set("en");

        assert_eq!(state.current(), Language::ENGLISH);
        assert_eq!(
            event,
            LanguageChangeEvent {
                language: Language::ENGLISH,
                previous_language: Language::SPANISH,
            }
        );
        assert!(event.changed());
    }

    #[test]
    fn test_set_unsupported_uses_fallback() {
        let mut state = state_with(MemoryPreferences::new(), None);
        state.set("en");
        let event = state.set("fr");

        assert_eq!(state.current(), Language::SPANISH);
        assert_eq!(event.language, Language::SPANISH);
        assert_eq!(state.metrics.unsupported_languages(), 1);
    }

    #[test]
    fn test_set_persists_preference() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs").join("preferences.json");

        let mut state = LanguageState::new(
            &settings(),
            Box::new(FilePreferences::new(&path)),
            None,
            Arc::new(TranslationMetrics::new()),
        );
        state.set("en");

        let reopened = FilePreferences::new(&path);
        assert_eq!(reopened.load("preferred-language").as_deref(), Some("en"));
        assert_eq!(
            LanguageState::initial(&settings(), &reopened, Some("es-CR")),
            Language::ENGLISH
        );
    }

    #[test]
    fn test_subscribers_run_in_registration_order_with_same_event() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut state = state_with(MemoryPreferences::new(), None);
        state.set("es");
        state.subscribe(recording_listener(&log, "first"));
        state.subscribe(recording_listener(&log, "second"));

        state.set("en");

        assert_eq!(
            *log.borrow(),
            vec!["first:es->en".to_string(), "second:es->en".to_string()]
        );
    }

    #[test]
    fn test_failing_subscriber_does_not_stop_others() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut state = state_with(MemoryPreferences::new(), None);
        state.subscribe(Rc::new(|_: &LanguageChangeEvent| -> Result<()> {
            anyhow::bail!("boom")
        }));
        state.subscribe(Rc::new(|_: &LanguageChangeEvent| -> Result<()> {
            panic!("subscriber bug")
        }));
        state.subscribe(recording_listener(&log, "last"));

        let event = state.switch("en");
        let failures = state.notify(&event);

        assert_eq!(failures, 2);
        assert_eq!(state.metrics.subscriber_failures(), 2);
        assert_eq!(*log.borrow(), vec!["last:es->en".to_string()]);
    }

    #[test]
    fn test_duplicate_subscription_fires_twice() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut state = state_with(MemoryPreferences::new(), None);
        let listener = recording_listener(&log, "dup");
        state.subscribe(Rc::clone(&listener));
        state.subscribe(Rc::clone(&listener));

        state.set("en");
        assert_eq!(log.borrow().len(), 2);

        assert!(state.unsubscribe(&listener));
        assert_eq!(state.subscriber_count(), 1);
        state.set("es");
        assert_eq!(log.borrow().len(), 3);
    }

    #[test]
    fn test_unsubscribe_unknown_listener() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut state = state_with(MemoryPreferences::new(), None);
        state.subscribe(recording_listener(&log, "a"));

        let stranger = recording_listener(&log, "b");
        assert!(!state.unsubscribe(&stranger));
        assert_eq!(state.subscriber_count(), 1);
    }

    #[test]
    fn test_set_same_language_still_notifies() {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let mut state = state_with(MemoryPreferences::new(), None);
        state.subscribe(recording_listener(&log, "x"));

        let event = state.set("es");
        assert!(!event.changed());
        assert_eq!(*log.borrow(), vec!["x:es->es".to_string()]);
    }

    // ==================== Event Tests ====================

    #[test]
    fn test_event_serializes_camel_case() {
        let event = LanguageChangeEvent {
            language: Language::ENGLISH,
            previous_language: Language::SPANISH,
        };
        let json = serde_json::to_value(event).unwrap();
        assert_eq!(json, serde_json::json!({ "language": "en", "previousLanguage": "es" }));
    }

    // ==================== Storage Tests ====================

    #[test]
    fn test_file_preferences_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = FilePreferences::new(dir.path().join("none.json"));
        assert_eq!(prefs.load("preferred-language"), None);
    }

    #[test]
    fn test_file_preferences_corrupt_file_reads_as_absent_and_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json").unwrap();

        let mut prefs = FilePreferences::new(&path);
        assert_eq!(prefs.load("preferred-language"), None);

        prefs.save("preferred-language", "en").unwrap();
        assert_eq!(prefs.load("preferred-language").as_deref(), Some("en"));
    }

    #[test]
    fn test_file_preferences_keeps_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, r#"{"portfolio-theme":"dark"}"#).unwrap();

        let mut prefs = FilePreferences::new(&path);
        prefs.save("preferred-language", "en").unwrap();

        assert_eq!(prefs.load("portfolio-theme").as_deref(), Some("dark"));
        assert_eq!(prefs.load("preferred-language").as_deref(), Some("en"));
    }
}

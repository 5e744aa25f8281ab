//! Language type: validated, closed language representation.
//!
//! A `Language` can only be constructed for a code present and enabled in the
//! registry, so holding one is proof that the language is supported.

use crate::i18n::{I18nError, LanguageConfig, LanguageRegistry};
use serde::{Serialize, Serializer};
use std::fmt;

/// A validated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Language {
    /// ISO 639-1 language code (e.g., "es", "en")
    code: &'static str,
}

impl Language {
    /// Spanish, the primary language of the site.
    pub const SPANISH: Language = Language { code: "es" };

    /// English, the secondary language of the site.
    pub const ENGLISH: Language = Language { code: "en" };

    /// Create a Language from a language code string.
    ///
    /// Surrounding whitespace and ASCII case are ignored, so values read back
    /// from storage like `" EN"` still match.
    ///
    /// # Returns
    /// * `Ok(Language)` if the code is valid and the language is enabled
    /// * `Err` if the code is not found or the language is disabled
    pub fn from_code(code: &str) -> Result<Language, I18nError> {
        let normalized = code.trim().to_ascii_lowercase();
        match LanguageRegistry::get().find(&normalized) {
            Some(config) if config.enabled => Ok(Language { code: config.code }),
            Some(_) => Err(I18nError::DisabledLanguage(normalized)),
            None => Err(I18nError::UnsupportedLanguage(code.to_string())),
        }
    }

    /// Match a locale string such as `es-CR`, `en_US.UTF-8` or `EN` by its
    /// primary subtag.
    ///
    /// # Returns
    /// `Some(Language)` if the primary subtag names a supported language.
    pub fn from_locale(locale: &str) -> Option<Language> {
        let subtag = primary_subtag(locale);
        if subtag.is_empty() {
            return None;
        }
        Language::from_code(&subtag).ok()
    }

    /// Get the built-in fallback language.
    pub fn fallback() -> Language {
        let config = LanguageRegistry::get().fallback();
        Language { code: config.code }
    }

    /// All enabled languages in registry order.
    pub fn all() -> Vec<Language> {
        LanguageRegistry::get()
            .enabled()
            .map(|config| Language { code: config.code })
            .collect()
    }

    /// The language a two-state toggle switches to from this one.
    pub fn next(&self) -> Language {
        let all = Language::all();
        let index = all.iter().position(|lang| lang == self).unwrap_or(0);
        all[(index + 1) % all.len()]
    }

    /// Get the ISO 639-1 language code.
    pub fn code(&self) -> &'static str {
        self.code
    }

    /// Registry metadata. Handles only come from the registry, so the
    /// fallback entry is never actually substituted.
    pub fn config(&self) -> &'static LanguageConfig {
        let registry = LanguageRegistry::get();
        registry.find(self.code).unwrap_or_else(|| registry.fallback())
    }

    /// Get the English name of the language.
    pub fn name(&self) -> &'static str {
        self.config().name
    }

    /// Get the native name of the language.
    pub fn native_name(&self) -> &'static str {
        self.config().native_name
    }

    /// Selector flag for the language.
    pub fn flag(&self) -> &'static str {
        self.config().flag
    }

    /// Selector label for the language (e.g., "ES").
    pub fn label(&self) -> &'static str {
        self.config().label
    }

    /// Check if this is the built-in fallback language.
    pub fn is_fallback(&self) -> bool {
        self.config().is_fallback
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code)
    }
}

impl Serialize for Language {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code)
    }
}

/// Extract the lowercase primary subtag of a locale (`es-CR` → `es`).
pub fn primary_subtag(locale: &str) -> String {
    locale
        .trim()
        .split(&['-', '_', '.', '@'][..])
        .next()
        .unwrap_or("")
        .to_ascii_lowercase()
}

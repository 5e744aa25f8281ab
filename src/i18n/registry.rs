//! Table of the languages the portfolio is published in.
//!
//! The table is a `static` slice: the set of languages is closed, and every
//! `Language` handle reads its selector metadata from here.

/// Display and selection metadata for one site language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// ISO 639-1 code, also the key used in per-language maps (`"es"`)
    pub code: &'static str,

    /// English name, used in logs
    pub name: &'static str,

    /// Name in the language itself (`"Español"`)
    pub native_name: &'static str,

    /// Flag shown next to the active language in `#language-toggle`
    pub flag: &'static str,

    /// Short label for toggle buttons (`"ES"`)
    pub label: &'static str,

    /// Language used when a key or a requested language is unavailable
    pub is_fallback: bool,

    pub enabled: bool,
}

/// Read-only view over the site's language table.
#[derive(Debug)]
pub struct LanguageRegistry {
    languages: &'static [LanguageConfig],
}

static SITE_LANGUAGES: [LanguageConfig; 2] = [
    LanguageConfig {
        code: "es",
        name: "Spanish",
        native_name: "Español",
        flag: "🇪🇸",
        label: "ES",
        is_fallback: true,
        enabled: true,
    },
    LanguageConfig {
        code: "en",
        name: "English",
        native_name: "English",
        flag: "🇺🇸",
        label: "EN",
        is_fallback: false,
        enabled: true,
    },
];

static REGISTRY: LanguageRegistry = LanguageRegistry {
    languages: &SITE_LANGUAGES,
};

impl LanguageRegistry {
    pub fn get() -> &'static LanguageRegistry {
        &REGISTRY
    }

    /// Exact, case-sensitive lookup. Callers normalise codes first.
    pub fn find(&self, code: &str) -> Option<&'static LanguageConfig> {
        let languages: &'static [LanguageConfig] = self.languages;
        languages.iter().find(|lang| lang.code == code)
    }

    /// Enabled languages in table order; the toggle cycles in this order.
    pub fn enabled(&self) -> impl Iterator<Item = &'static LanguageConfig> {
        let languages: &'static [LanguageConfig] = self.languages;
        languages.iter().filter(|lang| lang.enabled)
    }

    /// The entry marked `is_fallback`, or the first entry if none is marked.
    pub fn fallback(&self) -> &'static LanguageConfig {
        let languages: &'static [LanguageConfig] = self.languages;
        languages
            .iter()
            .find(|lang| lang.is_fallback)
            .unwrap_or(&languages[0])
    }
}

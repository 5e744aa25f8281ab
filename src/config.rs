use crate::i18n::{DataSource, Language};
use crate::render::RenderStrategy;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Settings of the i18n core itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct I18nConfig {
    pub default_language: Language,
    pub fallback_language: Language,

    /// Key under which the chosen language is persisted
    pub storage_key: String,

    /// Whether the environment locale is consulted on startup
    pub detect_locale: bool,

    /// Log missing translations as warnings instead of debug messages
    pub debug: bool,

    pub render_strategy: RenderStrategy,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_language: Language::SPANISH,
            fallback_language: Language::fallback(),
            storage_key: "preferred-language".to_string(),
            detect_locale: true,
            debug: false,
            render_strategy: RenderStrategy::Full,
        }
    }
}

impl I18nConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            default_language: language_var("PORTFOLIO_DEFAULT_LANGUAGE", defaults.default_language)?,
            fallback_language: language_var(
                "PORTFOLIO_FALLBACK_LANGUAGE",
                defaults.fallback_language,
            )?,
            storage_key: std::env::var("PORTFOLIO_STORAGE_KEY")
                .unwrap_or(defaults.storage_key),
            detect_locale: std::env::var("PORTFOLIO_DETECT_LOCALE")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.detect_locale),
            debug: std::env::var("PORTFOLIO_DEBUG")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.debug),
            render_strategy: match std::env::var("PORTFOLIO_RENDER_STRATEGY") {
                Ok(value) => value
                    .parse()
                    .context("PORTFOLIO_RENDER_STRATEGY is invalid")?,
                Err(_) => defaults.render_strategy,
            },
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Data
    pub data_source: DataSource,
    pub page_path: PathBuf,

    // Persistence
    pub preferences_file: PathBuf,

    /// Environment locale, e.g. `en_US.UTF-8`
    pub locale: Option<String>,

    pub i18n: I18nConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            data_source: DataSource::parse(
                &std::env::var("PORTFOLIO_DATA_SOURCE")
                    .unwrap_or_else(|_| "data/portfolio.json".to_string()),
            ),
            page_path: std::env::var("PORTFOLIO_PAGE")
                .unwrap_or_else(|_| "data/page.json".to_string())
                .into(),

            preferences_file: std::env::var("PORTFOLIO_PREFERENCES_FILE")
                .unwrap_or_else(|_| ".portfolio/preferences.json".to_string())
                .into(),

            locale: ["PORTFOLIO_LOCALE", "LC_ALL", "LC_MESSAGES", "LANG"]
                .iter()
                .filter_map(|name| std::env::var(name).ok())
                .map(|value| value.trim().to_string())
                .find(|value| !value.is_empty()),

            i18n: I18nConfig::from_env()?,
        })
    }

    /// Sources to load, inline UI strings first.
    pub fn sources(&self) -> Vec<DataSource> {
        if self.data_source == DataSource::Inline {
            vec![DataSource::Inline]
        } else {
            vec![DataSource::Inline, self.data_source.clone()]
        }
    }
}

fn language_var(name: &str, default: Language) -> Result<Language> {
    match std::env::var(name) {
        Ok(code) => {
            Language::from_code(&code).with_context(|| format!("{} is not a supported language", name))
        }
        Err(_) => Ok(default),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

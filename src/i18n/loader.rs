//! Translation data sources.
//!
//! A source yields one dictionary per language. File and HTTP locations may
//! contain a `{lang}` placeholder (`data/{lang}.json`); without it the same
//! resource is used for every language, which is how the bilingual
//! portfolio data file (per-language maps at its leaves) is consumed.

use crate::i18n::{strings, Language, TranslationDictionary};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fmt;
use tracing::debug;

/// Placeholder replaced by the language code in file and HTTP locations.
pub const LANGUAGE_PLACEHOLDER: &str = "{lang}";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DataSource {
    /// Dictionaries compiled into the crate
    Inline,
    /// Local JSON file
    File(String),
    /// JSON document fetched over HTTP(S)
    Http(String),
}

impl DataSource {
    /// Interpret a configuration value: `inline`, an `http(s)://` URL, or a file path.
    pub fn parse(spec: &str) -> DataSource {
        let spec = spec.trim();
        if spec.eq_ignore_ascii_case("inline") {
            DataSource::Inline
        } else if spec.starts_with("http://") || spec.starts_with("https://") {
            DataSource::Http(spec.to_string())
        } else {
            DataSource::File(spec.to_string())
        }
    }

    /// Concrete location for a language, with `{lang}` substituted.
    pub fn location_for(&self, language: Language) -> Option<String> {
        match self {
            DataSource::Inline => None,
            DataSource::File(template) | DataSource::Http(template) => {
                Some(template.replace(LANGUAGE_PLACEHOLDER, language.code()))
            }
        }
    }

    /// Fetch the dictionary for one language.
    pub async fn fetch(&self, language: Language) -> Result<TranslationDictionary> {
        let value = match self {
            DataSource::Inline => return Ok(strings::builtin_dictionary(language)),
            DataSource::File(_) => {
                let path = self.location_for(language).unwrap_or_default();
                debug!("Reading translations for {} from {}", language, path);
                let content = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path))?;
                serde_json::from_str::<Value>(&content)
                    .with_context(|| format!("Invalid JSON in {}", path))?
            }
            DataSource::Http(_) => {
                let url = self.location_for(language).unwrap_or_default();
                debug!("Fetching translations for {} from {}", language, url);
                fetch_json(&url).await?
            }
        };

        TranslationDictionary::from_value(value)
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Inline => f.write_str("inline"),
            DataSource::File(path) => write!(f, "file {}", path),
            DataSource::Http(url) => write!(f, "http {}", url),
        }
    }
}

/// Single GET with no retry or timeout policy; a failure leaves the language unloaded.
async fn fetch_json(url: &str) -> Result<Value> {
    let client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to build HTTP client")?;

    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch {}", url))?
        .error_for_status()
        .with_context(|| format!("Server rejected request for {}", url))?;

    response
        .json::<Value>()
        .await
        .with_context(|| format!("Invalid JSON from {}", url))
}

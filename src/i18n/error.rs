//! Failure taxonomy for the translation path.
//!
//! None of these are returned from `resolve`, `set` or a render pass: those
//! degrade to visible fallback output. The enum exists so diagnostics carry a
//! typed reason, and for the few constructors that are allowed to fail
//! (`Language::from_code`, configuration parsing).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum I18nError {
    #[error("Unsupported language code: '{0}'")]
    UnsupportedLanguage(String),

    #[error("Language '{0}' is not enabled")]
    DisabledLanguage(String),

    #[error("Translation not found: '{key}' for language '{language}'")]
    MissingTranslation { key: String, language: String },

    #[error("Failed to load translations for '{language}' from {source_name}: {reason}")]
    LoadFailure {
        language: String,
        source_name: String,
        reason: String,
    },

    #[error("Language change subscriber #{index} failed: {reason}")]
    SubscriberFailure { index: usize, reason: String },

    #[error("Render target not found: {0}")]
    MissingDomTarget(String),

    #[error("Invalid interpolation parameters: {0}")]
    InvalidParams(String),
}

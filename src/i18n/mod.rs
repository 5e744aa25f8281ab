//! Internationalization (i18n) core for the bilingual portfolio.
//!
//! # Architecture
//!
//! - `registry`: Static table of the site languages and their selector metadata
//! - `language`: Type-safe, validated `Language` handle
//! - `dictionary`: Nested translation tree with dot-path lookup and deep merge
//! - `strings`: Inline UI dictionaries compiled into the crate
//! - `loader`: Where translation data comes from (inline, file, HTTP)
//! - `store`: Per-language dictionaries
//! - `resolver`: Key resolution with fallback, caching and interpolation
//! - `state`: Active language, persisted preference and change notification
//! - `validator`: Cross-language completeness checks
//! - `metrics`: Diagnostic counters for degraded lookups
//!
//! # Example
//!
//! ```rust,ignore
//! use portfolio_i18n::i18n::{DataSource, KeyResolver, Language, TranslationMetrics, TranslationStore};
//!
//! let metrics = Arc::new(TranslationMetrics::new());
//! let mut store = TranslationStore::new(Language::SPANISH, metrics.clone());
//! store.load(&Language::all(), &DataSource::Inline).await;
//!
//! let resolver = KeyResolver::new(Language::SPANISH, false, metrics);
//! assert_eq!(resolver.resolve(&store, "nav.inicio", Language::ENGLISH), "Home");
//! ```

mod dictionary;
mod error;
mod language;
mod loader;
mod metrics;
mod registry;
mod resolver;
mod state;
mod store;
mod strings;
mod validator;

pub use dictionary::{is_localized_map, TranslationDictionary};
pub use error::I18nError;
pub use language::{primary_subtag, Language};
pub use loader::{DataSource, LANGUAGE_PLACEHOLDER};
pub use metrics::{MetricsReport, TranslationMetrics};
pub use registry::{LanguageConfig, LanguageRegistry};
pub use resolver::{interpolate, KeyResolver, Params};
pub use state::{
    FilePreferences, LanguageChangeEvent, LanguageState, Listener, MemoryPreferences,
    PreferenceStore,
};
pub use store::TranslationStore;
pub use strings::builtin_dictionary;
pub use validator::{CompletenessValidator, ValidationReport};

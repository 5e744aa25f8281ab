//! Rendering: writing the active language into a [`ViewPort`].
//!
//! A render pass builds one [`RenderContext`] (a consistent language snapshot)
//! and runs the content renderer followed by every section renderer selected
//! by the [`RenderStrategy`]. Nothing in a pass suspends or fails; missing
//! data and missing regions are skipped.

mod content;
mod sections;

pub use content::{
    ContentRenderer, ALT_ATTRIBUTE, PARAMS_ATTRIBUTE, PLACEHOLDER_ATTRIBUTE, TITLE_ATTRIBUTE,
    TRANSLATE_ATTRIBUTE,
};
pub use sections::{
    AboutRenderer, CertificationsRenderer, ContactRenderer, ExperienceRenderer, HeroRenderer,
    LanguageToggleRenderer, NavigationRenderer, ProjectsRenderer, SkillsRenderer,
};

use crate::i18n::{KeyResolver, Language, Params, TranslationStore};
use crate::view::ViewPort;
use anyhow::bail;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

/// Everything a renderer may read during one pass.
pub struct RenderContext<'a> {
    store: &'a TranslationStore,
    resolver: &'a KeyResolver,
    language: Language,
}

impl<'a> RenderContext<'a> {
    pub fn new(store: &'a TranslationStore, resolver: &'a KeyResolver, language: Language) -> Self {
        Self {
            store,
            resolver,
            language,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn fallback(&self) -> Language {
        self.store.fallback()
    }

    /// Resolve a key in the pass language.
    pub fn t(&self, key: &str) -> String {
        self.resolver.resolve(self.store, key, self.language)
    }

    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.resolver
            .resolve_with(self.store, key, self.language, params)
    }

    /// Pick the pass language out of an inline per-language record.
    pub fn localized<'t>(&self, text: &'t LocalizedText) -> &'t str {
        text.get(self.language, self.fallback())
    }

    /// Deserialize a section only when `key.field` holds its records.
    ///
    /// UI strings share top-level keys with the structured data
    /// (`experience.title` next to `experience.jobs`), so a section whose
    /// record field is missing counts as absent, not as malformed.
    pub fn records<T: DeserializeOwned>(&self, key: &str, field: &str) -> Option<T> {
        self.store
            .get(self.language)
            .lookup(&format!("{}.{}", key, field))?;
        self.section(key)
    }

    /// Deserialize a structured data section.
    ///
    /// Absent or malformed sections both yield `None`; malformed ones are logged.
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.store.get(self.language).section::<T>(key)? {
            Ok(section) => Some(section),
            Err(e) => {
                warn!("Ignoring malformed '{}' data: {}", key, e);
                None
            }
        }
    }
}

/// Per-language text stored inline in a data record: `{"es": "...", "en": "..."}`.
///
/// Non-string members are tolerated so records can carry it flattened
/// alongside other fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, Value>);

impl LocalizedText {
    /// Text for `language`, else for `fallback`, else empty.
    pub fn get(&self, language: Language, fallback: Language) -> &str {
        self.entry(language)
            .or_else(|| self.entry(fallback))
            .unwrap_or("")
    }

    fn entry(&self, language: Language) -> Option<&str> {
        self.0.get(language.code()).and_then(Value::as_str)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for LocalizedText {
    fn from(entries: [(&str, &str); N]) -> Self {
        Self(
            entries
                .iter()
                .map(|(code, text)| (code.to_string(), Value::String(text.to_string())))
                .collect(),
        )
    }
}

/// Rebuilds one structured region of the page from data plus the pass language.
///
/// Implementations clear the region before writing so repeated passes never
/// accumulate, and return without touching anything when their data or
/// region is absent.
pub trait SectionRenderer {
    fn name(&self) -> &'static str;

    fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort);
}

/// Which renderers run on each pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStrategy {
    /// Per-key content plus every structured section
    #[default]
    Full,
    /// Per-key content and the language toggle only
    ContentOnly,
}

impl FromStr for RenderStrategy {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(RenderStrategy::Full),
            "content" | "content-only" => Ok(RenderStrategy::ContentOnly),
            other => bail!("Unknown render strategy '{}' (expected 'full' or 'content')", other),
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStrategy::Full => f.write_str("full"),
            RenderStrategy::ContentOnly => f.write_str("content"),
        }
    }
}

/// The content renderer plus the section renderers chosen by a strategy.
pub struct PageRenderer {
    strategy: RenderStrategy,
    content: ContentRenderer,
    sections: Vec<Box<dyn SectionRenderer>>,
}

impl PageRenderer {
    pub fn new(strategy: RenderStrategy) -> Self {
        let sections: Vec<Box<dyn SectionRenderer>> = match strategy {
            RenderStrategy::Full => vec![
                Box::new(NavigationRenderer),
                Box::new(HeroRenderer),
                Box::new(AboutRenderer),
                Box::new(SkillsRenderer),
                Box::new(ExperienceRenderer),
                Box::new(CertificationsRenderer),
                Box::new(ProjectsRenderer),
                Box::new(ContactRenderer),
                Box::new(LanguageToggleRenderer),
            ],
            RenderStrategy::ContentOnly => vec![Box::new(LanguageToggleRenderer)],
        };

        Self {
            strategy,
            content: ContentRenderer,
            sections,
        }
    }

    /// Run one complete pass. Returns once every renderer has finished.
    pub fn render(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) {
        let written = self.content.render_all(ctx, view);
        debug!("Content pass wrote {} elements in {}", written, ctx.language());

        for section in &self.sections {
            section.render(ctx, view);
        }
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn section_names(&self) -> Vec<&'static str> {
        self.sections.iter().map(|section| section.name()).collect()
    }
}

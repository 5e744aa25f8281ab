//! The portfolio's i18n facade.
//!
//! `Site` owns one store, one resolver, one language state, the page renderer
//! and the view port. Every language-affecting operation goes through it, so a
//! render pass always sees a single consistent language and the resolver cache
//! is cleared before anything renders in a new language.

use crate::config::I18nConfig;
use crate::i18n::{
    DataSource, I18nError, KeyResolver, Language, LanguageChangeEvent, LanguageState, Listener, Params,
    PreferenceStore, TranslationDictionary, TranslationMetrics, TranslationStore,
};
use crate::render::{PageRenderer, RenderContext, RenderStrategy};
use crate::view::{Selector, ViewPort};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Name of the document event fired after every successful language change.
pub const LANGUAGE_CHANGED_EVENT: &str = "languageChanged";

pub struct Site<V: ViewPort> {
    store: TranslationStore,
    resolver: KeyResolver,
    state: LanguageState,
    renderer: PageRenderer,
    view: V,
    metrics: Arc<TranslationMetrics>,
    /// Sources loaded so far, in load order, for `reload`
    sources: Vec<DataSource>,
    ready: bool,
}

impl<V: ViewPort> Site<V> {
    /// Build the site and pick the initial language. Nothing is loaded or rendered yet.
    pub fn new(
        config: &I18nConfig,
        view: V,
        preferences: Box<dyn PreferenceStore>,
        env_locale: Option<&str>,
    ) -> Self {
        let metrics = Arc::new(TranslationMetrics::new());

        Self {
            store: TranslationStore::new(config.fallback_language, metrics.clone()),
            resolver: KeyResolver::new(config.fallback_language, config.debug, metrics.clone()),
            state: LanguageState::new(config, preferences, env_locale, metrics.clone()),
            renderer: PageRenderer::new(config.render_strategy),
            view,
            metrics,
            sources: Vec::new(),
            ready: false,
        }
    }

    /// Load every supported language from each source, in order, then render.
    ///
    /// Failures are logged and counted; the affected language simply has no
    /// data from that source.
    ///
    /// # Returns
    /// The number of (source, language) pairs newly loaded.
    pub async fn load(&mut self, sources: &[DataSource]) -> usize {
        let languages = Language::all();
        let mut loaded = 0;

        for source in sources {
            loaded += self.store.load(&languages, source).await;
            if !self.sources.contains(source) {
                self.sources.push(source.clone());
            }
        }

        self.ready = true;
        info!(
            "Translations ready: {:?}",
            self.store
                .loaded_languages()
                .iter()
                .map(|language| language.code())
                .collect::<Vec<_>>()
        );
        self.render();
        loaded
    }

    /// Drop all data and load the remembered sources again.
    pub async fn reload(&mut self) -> usize {
        info!("Reloading translations");
        self.store.reset();
        self.resolver.invalidate();
        self.ready = false;

        let sources = std::mem::take(&mut self.sources);
        self.load(&sources).await
    }

    /// One complete render pass in the current language.
    pub fn render(&mut self) {
        let ctx = RenderContext::new(&self.store, &self.resolver, self.state.current());
        self.renderer.render(&ctx, &mut self.view);
    }

    /// Switch language: persist, clear caches, re-render, notify subscribers,
    /// then fire [`LANGUAGE_CHANGED_EVENT`] on the view.
    ///
    /// Unsupported codes switch to the fallback language. Every subscriber
    /// sees the already-updated language and the finished page.
    pub fn set_language(&mut self, code: &str) -> LanguageChangeEvent {
        let event = self.state.switch(code);

        if event.changed() {
            self.resolver.invalidate();
        }
        self.render();
        self.state.notify(&event);

        let detail = json!({
            "language": event.language.code(),
            "previousLanguage": event.previous_language.code(),
        });
        self.view.dispatch_event(LANGUAGE_CHANGED_EVENT, &detail);

        event
    }

    /// Switch to the other supported language.
    pub fn toggle_language(&mut self) -> LanguageChangeEvent {
        let next = self.state.current().next();
        self.set_language(next.code())
    }

    pub fn current_language(&self) -> Language {
        self.state.current()
    }

    /// Resolve a key in the current language.
    pub fn t(&self, key: &str) -> String {
        self.resolver.resolve(&self.store, key, self.state.current())
    }

    pub fn t_with(&self, key: &str, params: &Params) -> String {
        self.resolver
            .resolve_with(&self.store, key, self.state.current(), params)
    }

    /// Resolve a key in an arbitrary, possibly unsupported, language code.
    pub fn t_in(&self, key: &str, code: &str) -> String {
        self.resolver.resolve_code(&self.store, key, code)
    }

    /// Text of the contact notification `kind` (`success`, `error`, `languageChanged`).
    pub fn notification(&self, kind: &str, params: &Params) -> String {
        self.t_with(&format!("contact.notifications.{}", kind), params)
    }

    /// Set the text of the first element matching `selector` to the resolved key.
    ///
    /// # Returns
    /// `false` if nothing on the page matches.
    pub fn update_element(&mut self, selector: &Selector<'_>, key: &str, params: &Params) -> bool {
        let Some(node) = self.view.query(selector) else {
            let err = I18nError::MissingDomTarget(format!("{:?}", selector));
            debug!("{}; '{}' not written", err, key);
            return false;
        };
        let text = self.t_with(key, params);
        self.view.set_text(node, &text);
        true
    }

    /// The merged dictionary of the current language.
    pub fn translations(&self) -> &TranslationDictionary {
        self.store.get(self.state.current())
    }

    /// Deep-merge extra translations into a language and re-render if ready.
    ///
    /// # Returns
    /// `false` if `code` is not a supported language; nothing is merged then.
    pub fn add_translations(&mut self, code: &str, partial: TranslationDictionary) -> bool {
        let language = match Language::from_code(code) {
            Ok(language) => language,
            Err(e) => {
                self.metrics.record_unsupported_language();
                warn!("{}; translations not added", e);
                return false;
            }
        };

        self.store.merge(language, partial);
        self.resolver.invalidate();
        if self.ready {
            self.render();
        }
        true
    }

    pub fn subscribe(&mut self, listener: Listener) {
        self.state.subscribe(listener);
    }

    pub fn unsubscribe(&mut self, listener: &Listener) -> bool {
        self.state.unsubscribe(listener)
    }

    /// True once the first `load` has completed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.renderer.strategy()
    }

    pub fn store(&self) -> &TranslationStore {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<TranslationMetrics> {
        &self.metrics
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn into_view(self) -> V {
        self.view
    }
}

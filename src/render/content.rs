//! Per-key content rendering for elements tagged with `data-i18n*` attributes.

use crate::i18n::{I18nError, Params};
use crate::render::RenderContext;
use crate::view::{NodeId, Selector, ViewPort};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

/// Key written into text (or `placeholder` for form inputs).
pub const TRANSLATE_ATTRIBUTE: &str = "data-i18n";
/// JSON object of interpolation parameters for `data-i18n`.
pub const PARAMS_ATTRIBUTE: &str = "data-i18n-params";
pub const PLACEHOLDER_ATTRIBUTE: &str = "data-i18n-placeholder";
pub const ALT_ATTRIBUTE: &str = "data-i18n-alt";
pub const TITLE_ATTRIBUTE: &str = "data-i18n-title";

/// Marker attribute and the attribute it writes to.
const ATTRIBUTE_VARIANTS: [(&str, &str); 3] = [
    (PLACEHOLDER_ATTRIBUTE, "placeholder"),
    (ALT_ATTRIBUTE, "alt"),
    (TITLE_ATTRIBUTE, "title"),
];

/// Elements whose `data-i18n` text goes to `placeholder` instead of content.
const INPUT_TAGS: [&str; 2] = ["input", "textarea"];

#[derive(Debug, Default, Clone, Copy)]
pub struct ContentRenderer;

impl ContentRenderer {
    /// Write the pass language into every tagged element and the document's `lang`.
    ///
    /// Only tagged elements and the root `html` element are touched. Running it
    /// twice with no state change leaves the view unchanged.
    ///
    /// # Returns
    /// The number of element writes performed.
    pub fn render_all(&self, ctx: &RenderContext<'_>, view: &mut dyn ViewPort) -> usize {
        let mut written = 0;

        for node in view.query_all(&Selector::Attribute(TRANSLATE_ATTRIBUTE)) {
            let Some(key) = view.attribute(node, TRANSLATE_ATTRIBUTE) else {
                continue;
            };
            let params = element_params(view, node);
            let text = ctx.t_with(&key, &params);

            let tag = view.tag_name(node);
            if INPUT_TAGS.contains(&tag.as_str()) {
                view.set_attribute(node, "placeholder", &text);
            } else {
                view.set_text(node, &text);
            }
            written += 1;
        }

        for (marker, target) in ATTRIBUTE_VARIANTS {
            for node in view.query_all(&Selector::Attribute(marker)) {
                if let Some(key) = view.attribute(node, marker) {
                    view.set_attribute(node, target, &ctx.t(&key));
                    written += 1;
                }
            }
        }

        for html in view.query_all(&Selector::Tag("html")) {
            view.set_attribute(html, "lang", ctx.language().code());
        }

        written
    }
}

/// Parameters from `data-i18n-params`. Invalid JSON is logged and ignored.
fn element_params(view: &dyn ViewPort, node: NodeId) -> Params {
    let Some(raw) = view.attribute(node, PARAMS_ATTRIBUTE) else {
        return Params::new();
    };

    match serde_json::from_str::<BTreeMap<String, Value>>(&raw) {
        Ok(values) => values
            .into_iter()
            .map(|(name, value)| {
                let text = match value {
                    Value::String(text) => text,
                    other => other.to_string(),
                };
                (name, text)
            })
            .collect(),
        Err(e) => {
            warn!("{}", I18nError::InvalidParams(format!("{}: {}", raw, e)));
            Params::new()
        }
    }
}

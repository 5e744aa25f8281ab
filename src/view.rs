//! View port: the small DOM capability surface the renderers write through.
//!
//! Renderers never touch a concrete document. They query nodes with a
//! [`Selector`], read and write text and attributes, replace a region's
//! children with freshly built [`Markup`], and dispatch named events.
//! [`MemoryView`] is the in-process implementation used by the binaries and
//! the tests; it serializes back to HTML.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Handle to a node inside a view port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// Simple (non-compound) CSS-like selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    /// `#id`
    Id(&'a str),
    /// `.class`
    Class(&'a str),
    /// `tag`
    Tag(&'a str),
    /// `[name]`
    Attribute(&'a str),
    /// `[name="value"]`
    AttributeValue(&'a str, &'a str),
}

impl Selector<'_> {
    pub fn matches(&self, tag: &str, attributes: &BTreeMap<String, String>) -> bool {
        match *self {
            Selector::Id(id) => attributes.get("id").map(String::as_str) == Some(id),
            Selector::Class(class) => attributes
                .get("class")
                .map(|classes| classes.split_whitespace().any(|c| c == class))
                .unwrap_or(false),
            Selector::Tag(name) => tag.eq_ignore_ascii_case(name),
            Selector::Attribute(name) => attributes.contains_key(name),
            Selector::AttributeValue(name, value) => {
                attributes.get(name).map(String::as_str) == Some(value)
            }
        }
    }
}

/// DOM read/write capabilities needed by the renderers.
pub trait ViewPort {
    /// The document node; every query starts below it.
    fn root(&self) -> NodeId;

    /// Descendants of `scope` matching `selector`, in document order.
    fn query_all_within(&self, scope: NodeId, selector: &Selector<'_>) -> Vec<NodeId>;

    fn tag_name(&self, node: NodeId) -> String;

    /// Text content of the node and all of its descendants.
    fn text(&self, node: NodeId) -> String;

    /// Replace the node's content with a single text run.
    fn set_text(&mut self, node: NodeId, text: &str);

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    /// Clear the node's content and append freshly built children.
    fn replace_children(&mut self, node: NodeId, children: Vec<Markup>);

    /// Fire a document-level custom event.
    fn dispatch_event(&mut self, name: &str, detail: &Value);

    fn query_all(&self, selector: &Selector<'_>) -> Vec<NodeId> {
        self.query_all_within(self.root(), selector)
    }

    fn query(&self, selector: &Selector<'_>) -> Option<NodeId> {
        self.query_all(selector).into_iter().next()
    }

    fn query_within(&self, scope: NodeId, selector: &Selector<'_>) -> Option<NodeId> {
        self.query_all_within(scope, selector).into_iter().next()
    }
}

// ==================== Markup ====================

/// Element tree built by section renderers and used for page manifests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    pub tag: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Text emitted before the children
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Markup>,
}

impl Markup {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            ..Self::default()
        }
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn child(mut self, child: Markup) -> Self {
        self.children.push(child);
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Markup>) -> Self {
        self.children.extend(children);
        self
    }
}

// ==================== MemoryView ====================

const DOCUMENT_TAG: &str = "#document";

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attributes: BTreeMap<String, String>,
    text: String,
    children: Vec<NodeId>,
}

/// Event recorded by [`MemoryView::dispatch_event`].
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchedEvent {
    pub name: String,
    pub detail: Value,
}

/// Arena-backed document.
///
/// Subtrees dropped by `set_text` or `replace_children` return their slots to
/// a free list that later builds reuse, so re-rendering keeps the arena size
/// stable. A `NodeId` into a dropped subtree must not be used afterwards.
#[derive(Debug, Clone)]
pub struct MemoryView {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    events: Vec<DispatchedEvent>,
}

impl MemoryView {
    /// Document holding a bare `<html>` element.
    pub fn new() -> Self {
        Self::from_markup(Markup::new("html"))
    }

    /// Document whose single top-level element is `page`.
    pub fn from_markup(page: Markup) -> Self {
        let mut view = Self {
            nodes: vec![Node {
                tag: DOCUMENT_TAG.to_string(),
                attributes: BTreeMap::new(),
                text: String::new(),
                children: Vec::new(),
            }],
            free: Vec::new(),
            events: Vec::new(),
        };
        let root = view.root();
        let top = view.build(page);
        view.nodes[root.0].children.push(top);
        view
    }

    /// Events dispatched so far, oldest first.
    pub fn events(&self) -> &[DispatchedEvent] {
        &self.events
    }

    /// Serialize the whole document.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in &self.nodes[self.root().0].children {
            self.write_html(*child, &mut out);
        }
        out
    }

    /// Serialize one node and its subtree.
    pub fn outer_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Nodes currently attached to the document, the document node included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    fn build(&mut self, markup: Markup) -> NodeId {
        let node = Node {
            tag: markup.tag.to_ascii_lowercase(),
            attributes: markup.attributes,
            text: markup.text.unwrap_or_default(),
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(id) => {
                self.nodes[id.0] = node;
                id
            }
            None => {
                self.nodes.push(node);
                NodeId(self.nodes.len() - 1)
            }
        };

        let children: Vec<NodeId> = markup
            .children
            .into_iter()
            .map(|child| self.build(child))
            .collect();
        self.nodes[id.0].children = children;
        id
    }

    /// Detach every child of `node` and free their subtrees.
    fn release_children(&mut self, node: NodeId) {
        let mut pending = std::mem::take(&mut self.nodes[node.0].children);
        while let Some(id) = pending.pop() {
            let released = &mut self.nodes[id.0];
            pending.append(&mut released.children);
            released.attributes.clear();
            released.text.clear();
            self.free.push(id);
        }
    }

    fn collect_matches(&self, node: NodeId, selector: &Selector<'_>, out: &mut Vec<NodeId>) {
        for child in &self.nodes[node.0].children {
            let element = &self.nodes[child.0];
            if selector.matches(&element.tag, &element.attributes) {
                out.push(*child);
            }
            self.collect_matches(*child, selector, out);
        }
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let element = &self.nodes[node.0];
        out.push_str(&element.text);
        for child in &element.children {
            self.collect_text(*child, out);
        }
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let element = &self.nodes[node.0];
        out.push('<');
        out.push_str(&element.tag);
        for (name, value) in &element.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_html(value));
            out.push('"');
        }
        out.push('>');

        if VOID_ELEMENTS.contains(&element.tag.as_str()) {
            return;
        }

        out.push_str(&escape_html(&element.text));
        for child in &element.children {
            self.write_html(*child, out);
        }
        out.push_str("</");
        out.push_str(&element.tag);
        out.push('>');
    }
}

impl Default for MemoryView {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewPort for MemoryView {
    fn root(&self) -> NodeId {
        NodeId(0)
    }

    fn query_all_within(&self, scope: NodeId, selector: &Selector<'_>) -> Vec<NodeId> {
        let mut matches = Vec::new();
        self.collect_matches(scope, selector, &mut matches);
        matches
    }

    fn tag_name(&self, node: NodeId) -> String {
        self.nodes[node.0].tag.clone()
    }

    fn text(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.release_children(node);
        self.nodes[node.0].text = text.to_string();
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes[node.0].attributes.get(name).cloned()
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        self.nodes[node.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    fn replace_children(&mut self, node: NodeId, children: Vec<Markup>) {
        self.release_children(node);
        let built: Vec<NodeId> = children.into_iter().map(|child| self.build(child)).collect();
        let element = &mut self.nodes[node.0];
        element.text.clear();
        element.children = built;
    }

    fn dispatch_event(&mut self, name: &str, detail: &Value) {
        self.events.push(DispatchedEvent {
            name: name.to_string(),
            detail: detail.clone(),
        });
    }
}

/// Escape text for HTML content and double-quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            _ => result.push(c),
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn page() -> MemoryView {
        MemoryView::from_markup(
            Markup::new("html").child(
                Markup::new("body")
                    .child(
                        Markup::new("nav")
                            .class("navbar main")
                            .child(Markup::new("ul").class("nav-menu")),
                    )
                    .child(Markup::new("h1").attr("data-hero", "name").text("Nombre"))
                    .child(
                        Markup::new("div")
                            .class("contact-form")
                            .child(Markup::new("form").child(Markup::new("input").attr("type", "email"))),
                    ),
            ),
        )
    }

    // ==================== Selector Tests ====================

    #[test]
    fn test_selector_class_matches_any_token() {
        let mut attributes = BTreeMap::new();
        attributes.insert("class".to_string(), "btn btn-primary".to_string());

        assert!(Selector::Class("btn-primary").matches("a", &attributes));
        assert!(!Selector::Class("btn-prim").matches("a", &attributes));
    }

    #[test]
    fn test_selector_tag_is_case_insensitive() {
        assert!(Selector::Tag("INPUT").matches("input", &BTreeMap::new()));
    }

    // ==================== Query Tests ====================

    #[test]
    fn test_query_by_class_and_attribute_value() {
        let view = page();

        let menu = view.query(&Selector::Class("nav-menu")).unwrap();
        assert_eq!(view.tag_name(menu), "ul");

        let name = view.query(&Selector::AttributeValue("data-hero", "name")).unwrap();
        assert_eq!(view.text(name), "Nombre");
    }

    #[test]
    fn test_query_all_includes_html_root() {
        let view = page();
        assert_eq!(view.query_all(&Selector::Tag("html")).len(), 1);
    }

    #[test]
    fn test_query_within_scope() {
        let view = page();
        let container = view.query(&Selector::Class("contact-form")).unwrap();
        let form = view.query_within(container, &Selector::Tag("form"));
        assert!(form.is_some());

        let nav = view.query(&Selector::Class("navbar")).unwrap();
        assert!(view.query_within(nav, &Selector::Tag("form")).is_none());
    }

    #[test]
    fn test_query_missing_target() {
        assert!(page().query(&Selector::Id("nope")).is_none());
    }

    // ==================== Mutation Tests ====================

    #[test]
    fn test_set_text_replaces_children() {
        let mut view = page();
        let nav = view.query(&Selector::Class("navbar")).unwrap();
        view.set_text(nav, "plain");

        assert_eq!(view.text(nav), "plain");
        assert!(view.query(&Selector::Class("nav-menu")).is_none());
    }

    #[test]
    fn test_replace_children_does_not_accumulate() {
        let mut view = page();
        let menu = view.query(&Selector::Class("nav-menu")).unwrap();

        for _ in 0..3 {
            view.replace_children(
                menu,
                vec![Markup::new("li").text("a"), Markup::new("li").text("b")],
            );
        }

        assert_eq!(view.children(menu).len(), 2);
        assert_eq!(view.query_all(&Selector::Tag("li")).len(), 2);
    }

    #[test]
    fn test_replaced_subtrees_are_reclaimed() {
        let mut view = page();
        let menu = view.query(&Selector::Class("nav-menu")).unwrap();
        let items = || {
            vec![
                Markup::new("li").child(Markup::new("a").text("Inicio")),
                Markup::new("li").child(Markup::new("a").text("Proyectos")),
            ]
        };

        view.replace_children(menu, items());
        let settled = view.node_count();
        let arena = view.nodes.len();
        for _ in 0..50 {
            view.replace_children(menu, items());
        }

        assert_eq!(view.node_count(), settled);
        assert_eq!(view.nodes.len(), arena);
        assert_eq!(view.text(menu), "InicioProyectos");
    }

    #[test]
    fn test_set_text_frees_previous_children() {
        let mut view = page();
        let before = view.node_count();
        let form = view.query(&Selector::Tag("form")).unwrap();

        view.set_text(form, "Enviado");

        assert_eq!(view.node_count(), before - 1);
        assert_eq!(view.outer_html(form), "<form>Enviado</form>");
    }

    #[test]
    fn test_set_attribute_and_read_back() {
        let mut view = page();
        let input = view.query(&Selector::Tag("input")).unwrap();
        view.set_attribute(input, "placeholder", "Email");
        assert_eq!(view.attribute(input, "placeholder").as_deref(), Some("Email"));
    }

    #[test]
    fn test_dispatch_event_is_recorded() {
        let mut view = MemoryView::new();
        view.dispatch_event("languageChanged", &json!({ "language": "en" }));

        assert_eq!(
            view.events(),
            &[DispatchedEvent {
                name: "languageChanged".to_string(),
                detail: json!({ "language": "en" }),
            }]
        );
    }

    // ==================== Serialization Tests ====================

    #[test]
    fn test_to_html_escapes_and_handles_void_elements() {
        let view = MemoryView::from_markup(
            Markup::new("p")
                .attr("title", "\"quoted\"")
                .text("a < b & c")
                .child(Markup::new("img").attr("src", "x.png")),
        );

        assert_eq!(
            view.to_html(),
            r#"<p title="&quot;quoted&quot;">a &lt; b &amp; c<img src="x.png"></p>"#
        );
    }

    #[test]
    fn test_markup_deserializes_from_manifest_json() {
        let markup: Markup = serde_json::from_value(json!({
            "tag": "span",
            "attributes": { "data-i18n": "nav.inicio" },
            "text": "Inicio"
        }))
        .unwrap();

        assert_eq!(markup, Markup::new("span").attr("data-i18n", "nav.inicio").text("Inicio"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a href=\"x\">&</a>"), "&lt;a href=&quot;x&quot;&gt;&amp;&lt;/a&gt;");
        assert_eq!(escape_html("plain"), "plain");
    }
}

//! Nested translation dictionaries addressed by dot-path keys.
//!
//! A dictionary is a JSON object tree. Terminal values are either plain
//! strings or per-language maps (`{"es": "Inicio", "en": "Home"}`); arrays
//! hold structured records read by the section renderers.

use crate::i18n::Language;
use anyhow::{bail, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranslationDictionary {
    root: Map<String, Value>,
}

impl TranslationDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => bail!(
                "Translation data must be a JSON object, got {}",
                json_type_name(&other)
            ),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Walk `key` one dot-separated segment at a time.
    ///
    /// Returns `None` if any segment is missing or an intermediate value is
    /// not an object. Segments containing literal dots cannot be addressed.
    pub fn lookup(&self, key: &str) -> Option<&Value> {
        if key.is_empty() {
            return None;
        }

        let mut segments = key.split('.');
        let first = segments.next()?;
        let mut current = self.root.get(first)?;

        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }

        Some(current)
    }

    /// Deserialize the subtree at `key` into a typed record.
    ///
    /// # Returns
    /// * `None` if nothing is stored at `key`
    /// * `Some(Err)` if the subtree does not have the expected shape
    pub fn section<T: DeserializeOwned>(&self, key: &str) -> Option<Result<T, serde_json::Error>> {
        self.lookup(key)
            .map(|value| serde_json::from_value(value.clone()))
    }

    /// Deep-merge `partial` into this dictionary.
    ///
    /// Objects merge key by key; every other value (strings, numbers, arrays)
    /// replaces what was there. Arrays are never merged element-wise.
    pub fn merge(&mut self, partial: TranslationDictionary) {
        deep_merge(&mut self.root, partial.root);
    }

    /// Every dot-path that ends in a string or a per-language map, sorted.
    ///
    /// Arrays are structured records, not translatable keys, and are skipped.
    pub fn terminal_keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        collect_terminal_keys(&self.root, "", &mut keys);
        keys.sort();
        keys
    }
}

impl From<Map<String, Value>> for TranslationDictionary {
    fn from(root: Map<String, Value>) -> Self {
        Self { root }
    }
}

/// Whether an object is a per-language terminal: non-empty, every key a
/// supported language code and every value a string.
pub fn is_localized_map(map: &Map<String, Value>) -> bool {
    !map.is_empty()
        && map
            .iter()
            .all(|(code, value)| Language::from_code(code).is_ok() && value.is_string())
}

fn deep_merge(target: &mut Map<String, Value>, source: Map<String, Value>) {
    for (key, incoming) in source {
        match (target.get_mut(&key), incoming) {
            (Some(Value::Object(existing)), Value::Object(nested)) => {
                deep_merge(existing, nested);
            }
            (_, incoming) => {
                target.insert(key, incoming);
            }
        }
    }
}

fn collect_terminal_keys(map: &Map<String, Value>, prefix: &str, keys: &mut Vec<String>) {
    for (segment, value) in map {
        let path = if prefix.is_empty() {
            segment.clone()
        } else {
            format!("{}.{}", prefix, segment)
        };

        match value {
            Value::String(_) => keys.push(path),
            Value::Object(nested) if is_localized_map(nested) => keys.push(path),
            Value::Object(nested) => collect_terminal_keys(nested, &path, keys),
            _ => {}
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

//! Attribute values carried by scene graph nodes.
//!
//! Most attributes are plain text, but component-style attributes carry a
//! small table of named properties. The two shapes are kept distinct so
//! readers never have to guess whether a string is a serialized table.

use serde_json::Value;

/// Value of a single node attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    /// Plain text attribute, e.g. `color = "purple"`.
    Text(String),
    /// Structured attribute: named properties in insertion order. Property
    /// values are arbitrary JSON so numeric and nested settings survive
    /// round trips without stringly-typed loss.
    Map(Vec<(String, Value)>),
}

impl AttrValue {
    /// Builds a text value from anything string-like.
    pub fn text(value: impl Into<String>) -> Self {
        AttrValue::Text(value.into())
    }

    /// Builds a structured value from `(key, value)` pairs, preserving
    /// the order they are given in.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        AttrValue::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the text payload, or `None` for structured values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Map(_) => None,
        }
    }

    /// Returns the property table, or `None` for text values.
    pub fn as_map(&self) -> Option<&[(String, Value)]> {
        match self {
            AttrValue::Text(_) => None,
            AttrValue::Map(entries) => Some(entries),
        }
    }

    /// True for the empty text value. An empty string reads as "nothing
    /// here" to shell commands, while an empty property table is still a
    /// present attribute.
    pub fn is_blank(&self) -> bool {
        matches!(self, AttrValue::Text(s) if s.is_empty())
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

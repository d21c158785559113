//! Semantic node tree
//!
//! The output side of md2bn: elements named after the UI components that
//! mount them (`bn-paragraph`, `bn-banner`, ...), plus raw text leaves.
//! The shape follows hast, so downstream highlighters and serializers can
//! walk it without knowing about md2bn.

use crate::mdast::Position;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Attribute map of an element, ordered by name
pub type Properties = BTreeMap<String, PropertyValue>;

/// Build a property map from literal entries
pub fn properties<const N: usize>(entries: [(&str, PropertyValue); N]) -> Properties {
    entries
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

/// Whether `name` can be written as an HTML tag name
///
/// An ASCII letter followed by ASCII alphanumerics or `-`.
pub fn is_valid_tag_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Whether `name` can be written as an HTML attribute name
pub fn is_valid_attribute_name(name: &str) -> bool {
    !name.is_empty()
        && !name.chars().any(|c| {
            c.is_whitespace()
                || c.is_control()
                || matches!(c, '"' | '\'' | '>' | '<' | '/' | '=')
        })
}

/// Root of a semantic tree
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    pub children: Vec<Content>,
}

impl Root {
    pub fn new(children: Vec<Content>) -> Self {
        Self { children }
    }
}

/// A semantic node: an element or a text leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Content {
    Element(Element),
    Text(Text),
}

/// An element with a tag name, properties and children
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    pub tag_name: String,
    #[serde(default)]
    pub properties: Properties,
    #[serde(default)]
    pub children: Vec<Content>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// A raw text leaf
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Value of a single property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Number(i64),
    String(String),
    List(Vec<String>),
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Boolean(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Number(value)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        PropertyValue::Number(i64::from(value))
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        PropertyValue::List(value)
    }
}

impl PropertyValue {
    /// A single-entry class list
    pub fn class(name: &str) -> Self {
        PropertyValue::List(vec![name.to_string()])
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl Content {
    pub fn text(value: impl Into<String>) -> Self {
        Content::Text(Text {
            value: value.into(),
            position: None,
        })
    }

    pub fn element(tag_name: impl Into<String>, properties: Properties, children: Vec<Content>) -> Self {
        Content::Element(Element::new(tag_name, properties, children))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Content::Element(e) => Some(e),
            Content::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Content::Text(t) => Some(&t.value),
            Content::Element(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants
    pub fn to_plain_text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &Content, out: &mut String) {
    match node {
        Content::Text(t) => out.push_str(&t.value),
        Content::Element(e) => {
            for child in &e.children {
                collect_text(child, out);
            }
        }
    }
}

impl Element {
    pub fn new(tag_name: impl Into<String>, properties: Properties, children: Vec<Content>) -> Self {
        Self {
            tag_name: tag_name.into(),
            properties,
            children,
            position: None,
        }
    }

    pub fn with_position(mut self, position: Option<Position>) -> Self {
        self.position = position;
        self
    }

    /// Entries of the `className` property
    pub fn class_names(&self) -> &[String] {
        match self.properties.get("className") {
            Some(PropertyValue::List(names)) => names,
            _ => &[],
        }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.class_names().iter().any(|c| c == name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }
}

//! Handler registry
//!
//! Maps node kinds to handler functions. A registry is built once at
//! startup and shared read-only by every transform.

use crate::error::TransformResult;
use crate::handlers;
use crate::languages::Languages;
use crate::transform::State;
use md2bn_mdast::{Content, Node};
use std::collections::HashMap;
use std::fmt;

/// Transform one node, given its parent, into zero or more semantic nodes
pub type Handler = fn(&mut State<'_>, &Node, Option<&Node>) -> TransformResult<Vec<Content>>;

/// Known mdast node types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,
    Paragraph,
    Heading,
    List,
    ListItem,
    Break,
    ThematicBreak,
    Code,
    Link,
    Text,
    Emphasis,
    Strong,
    Delete,
    InlineCode,
    Blockquote,
    Image,
    /// Any type without a dedicated variant
    Other(String),
}

impl NodeKind {
    /// Resolve a node `type` string
    pub fn from_type(node_type: &str) -> Self {
        match node_type {
            "root" => NodeKind::Root,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "list" => NodeKind::List,
            "listItem" => NodeKind::ListItem,
            "break" => NodeKind::Break,
            "thematicBreak" => NodeKind::ThematicBreak,
            "code" => NodeKind::Code,
            "link" => NodeKind::Link,
            "text" => NodeKind::Text,
            "emphasis" => NodeKind::Emphasis,
            "strong" => NodeKind::Strong,
            "delete" => NodeKind::Delete,
            "inlineCode" => NodeKind::InlineCode,
            "blockquote" => NodeKind::Blockquote,
            "image" => NodeKind::Image,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// The mdast `type` string
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::List => "list",
            NodeKind::ListItem => "listItem",
            NodeKind::Break => "break",
            NodeKind::ThematicBreak => "thematicBreak",
            NodeKind::Code => "code",
            NodeKind::Link => "link",
            NodeKind::Text => "text",
            NodeKind::Emphasis => "emphasis",
            NodeKind::Strong => "strong",
            NodeKind::Delete => "delete",
            NodeKind::InlineCode => "inlineCode",
            NodeKind::Blockquote => "blockquote",
            NodeKind::Image => "image",
            NodeKind::Other(name) => name,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Call-scoped handler replacements
///
/// Consulted before the registry for the children of a single aggregation
/// call; never leaks into deeper calls unless passed on explicitly.
#[derive(Clone, Default)]
pub struct Overrides {
    handlers: HashMap<NodeKind, Handler>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, kind: NodeKind, handler: Handler) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    pub fn get(&self, kind: &NodeKind) -> Option<Handler> {
        self.handlers.get(kind).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl fmt::Debug for Overrides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

/// The handler set plus the configuration handlers read
#[derive(Clone)]
pub struct Registry {
    handlers: HashMap<NodeKind, Handler>,
    tight_item_overrides: Overrides,
    languages: Languages,
}

impl Registry {
    /// A registry with no handlers; everything goes to the default handler
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
            tight_item_overrides: Overrides::new(),
            languages: Languages::new(),
        }
    }

    /// The built-in handler set
    pub fn standard() -> Self {
        Self::empty()
            .with_handler(NodeKind::Root, handlers::root)
            .with_handler(NodeKind::Text, handlers::text)
            .with_handler(NodeKind::Paragraph, handlers::paragraph)
            .with_handler(NodeKind::Heading, handlers::heading)
            .with_handler(NodeKind::List, handlers::list)
            .with_handler(NodeKind::ListItem, handlers::list_item)
            .with_handler(NodeKind::Break, handlers::rule)
            .with_handler(NodeKind::ThematicBreak, handlers::rule)
            .with_handler(NodeKind::Code, handlers::code)
            .with_handler(NodeKind::Link, handlers::link)
            .with_handler(NodeKind::Emphasis, handlers::emphasis)
            .with_handler(NodeKind::Strong, handlers::strong)
            .with_handler(NodeKind::Delete, handlers::delete)
            .with_handler(NodeKind::InlineCode, handlers::inline_code)
            .with_handler(NodeKind::Blockquote, handlers::blockquote)
            .with_handler(NodeKind::Image, handlers::image)
            .with_tight_item_overrides(
                Overrides::new().with(NodeKind::Paragraph, handlers::tight_paragraph),
            )
            .with_languages(Languages::highlight_defaults())
    }

    /// Add or replace the handler for a node kind
    pub fn with_handler(mut self, kind: NodeKind, handler: Handler) -> Self {
        self.handlers.insert(kind, handler);
        self
    }

    /// Overrides applied to the children of tight list items
    pub fn with_tight_item_overrides(mut self, overrides: Overrides) -> Self {
        self.tight_item_overrides = overrides;
        self
    }

    pub fn with_languages(mut self, languages: Languages) -> Self {
        self.languages = languages;
        self
    }

    pub fn handler(&self, kind: &NodeKind) -> Option<Handler> {
        self.handlers.get(kind).copied()
    }

    pub fn tight_item_overrides(&self) -> &Overrides {
        &self.tight_item_overrides
    }

    pub fn languages(&self) -> &Languages {
        &self.languages
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&str> = self.handlers.keys().map(NodeKind::as_str).collect();
        kinds.sort_unstable();
        f.debug_struct("Registry")
            .field("handlers", &kinds)
            .field("tight_item_overrides", &self.tight_item_overrides)
            .field("languages", &self.languages)
            .finish()
    }
}

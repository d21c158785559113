//! mdast (Markdown Abstract Syntax Tree) input model
//!
//! A single generic node shape covering the mdast subset md2bn renders.
//! Unknown fields are ignored, so trees from any mdast producer deserialize.
//! Reference: https://github.com/syntax-tree/mdast

use crate::semantic::{Content, Properties};
use serde::{Deserialize, Deserializer, Serialize};

/// A generic mdast node
///
/// `node_type` is optional so that malformed input (a node without a `type`,
/// or a `null` entry in a `children` array) survives deserialization and can
/// be reported by the transformer instead of failing inside serde.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub node_type: Option<String>,
    #[serde(
        default,
        deserialize_with = "nullable_children",
        skip_serializing_if = "Option::is_none"
    )]
    pub children: Option<Vec<Node>>,
    /// Literal payload (text, code, inlineCode, html)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Heading level (1-6)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spread: Option<bool>,
    /// Task list state; `None` for a regular list item
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Semantic overrides requested by upstream plugins
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Data>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
}

/// Semantic-override metadata (`node.data` in mdast)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Data {
    /// Requested tag name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_name: Option<String>,
    /// Requested properties, merged over the handler's own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_properties: Option<Properties>,
    /// Requested children, replacing the transformed ones
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h_children: Option<Vec<Content>>,
}

impl Data {
    /// Whether any override is present
    pub fn is_empty(&self) -> bool {
        self.h_name.is_none() && self.h_properties.is_none() && self.h_children.is_none()
    }
}

/// Source location of a node (unist position)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

/// A single place in the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    /// 1-indexed line
    pub line: usize,
    /// 1-indexed column
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start.line, self.start.column)
    }
}

/// Deserialize `children`, mapping `null` entries to typeless nodes
fn nullable_children<'de, D>(deserializer: D) -> Result<Option<Vec<Node>>, D::Error>
where
    D: Deserializer<'de>,
{
    let children: Option<Vec<Option<Node>>> = Option::deserialize(deserializer)?;
    Ok(children.map(|nodes| nodes.into_iter().map(Option::unwrap_or_default).collect()))
}

// Convenience constructors
impl Node {
    /// A node of the given type with no fields set
    pub fn new(node_type: impl Into<String>) -> Self {
        Self {
            node_type: Some(node_type.into()),
            ..Default::default()
        }
    }

    /// A parent node of the given type
    pub fn parent(node_type: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            children: Some(children),
            ..Self::new(node_type)
        }
    }

    /// A literal node of the given type
    pub fn literal(node_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::new(node_type)
        }
    }

    pub fn root(children: Vec<Node>) -> Self {
        Self::parent("root", children)
    }

    pub fn text(s: impl Into<String>) -> Self {
        Self::literal("text", s)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::parent("paragraph", children)
    }

    pub fn heading(depth: u8, children: Vec<Node>) -> Self {
        Self {
            depth: Some(depth),
            ..Self::parent("heading", children)
        }
    }

    pub fn list(ordered: bool, children: Vec<Node>) -> Self {
        Self {
            ordered: Some(ordered),
            start: if ordered { Some(1) } else { None },
            ..Self::parent("list", children)
        }
    }

    pub fn ordered_list_from(start: u32, children: Vec<Node>) -> Self {
        Self {
            ordered: Some(true),
            start: Some(start),
            ..Self::parent("list", children)
        }
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Self::parent("listItem", children)
    }

    pub fn task_item(checked: bool, children: Vec<Node>) -> Self {
        Self {
            checked: Some(checked),
            ..Self::list_item(children)
        }
    }

    pub fn code(lang: Option<&str>, value: impl Into<String>) -> Self {
        Self {
            lang: lang.map(str::to_string),
            ..Self::literal("code", value)
        }
    }

    pub fn inline_code(value: impl Into<String>) -> Self {
        Self::literal("inlineCode", value)
    }

    pub fn emphasis(children: Vec<Node>) -> Self {
        Self::parent("emphasis", children)
    }

    pub fn strong(children: Vec<Node>) -> Self {
        Self::parent("strong", children)
    }

    pub fn blockquote(children: Vec<Node>) -> Self {
        Self::parent("blockquote", children)
    }

    pub fn link(url: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::parent("link", children)
        }
    }

    pub fn image(url: impl Into<String>, alt: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            alt: Some(alt.into()),
            ..Self::new("image")
        }
    }

    pub fn line_break() -> Self {
        Self::new("break")
    }

    pub fn thematic_break() -> Self {
        Self::new("thematicBreak")
    }

    /// Set the explicit `spread` flag
    pub fn with_spread(mut self, spread: bool) -> Self {
        self.spread = Some(spread);
        self
    }

    pub fn with_data(mut self, data: Data) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// The node's `type`, if present and non-empty
    pub fn node_type(&self) -> Option<&str> {
        self.node_type.as_deref().filter(|t| !t.is_empty())
    }

    /// The node's children; absent children read as empty
    pub fn children(&self) -> &[Node] {
        self.children.as_deref().unwrap_or_default()
    }

    /// Override metadata, if any override is actually set
    pub fn overrides(&self) -> Option<&Data> {
        self.data.as_ref().filter(|data| !data.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_constructors() {
        let text = Node::text("hello");
        assert_eq!(text.node_type(), Some("text"));
        assert_eq!(text.value.as_deref(), Some("hello"));
        assert!(text.children.is_none());

        let heading = Node::heading(2, vec![Node::text("Title")]);
        assert_eq!(heading.depth, Some(2));
        assert_eq!(heading.children().len(), 1);

        let item = Node::task_item(true, vec![Node::paragraph(vec![])]);
        assert_eq!(item.node_type(), Some("listItem"));
        assert_eq!(item.checked, Some(true));
        assert_eq!(item.spread, None);
    }

    #[test]
    fn test_list_constructors() {
        let unordered = Node::list(false, vec![]);
        assert_eq!(unordered.ordered, Some(false));
        assert_eq!(unordered.start, None);

        let ordered = Node::ordered_list_from(5, vec![]);
        assert_eq!(ordered.ordered, Some(true));
        assert_eq!(ordered.start, Some(5));
    }

    #[test]
    fn test_absent_children_read_as_empty() {
        let node = Node::new("thematicBreak");
        assert!(node.children().is_empty());
    }

    #[test]
    fn test_deserialize_remark_tree() {
        let json = r#"{
            "type": "root",
            "children": [
                {
                    "type": "heading",
                    "depth": 1,
                    "children": [{"type": "text", "value": "Intro"}],
                    "position": {
                        "start": {"line": 1, "column": 1, "offset": 0},
                        "end": {"line": 1, "column": 8, "offset": 7}
                    }
                },
                {
                    "type": "list",
                    "ordered": false,
                    "start": null,
                    "spread": false,
                    "children": [
                        {"type": "listItem", "spread": false, "checked": null, "children": []}
                    ]
                }
            ]
        }"#;

        let root: Node = serde_json::from_str(json).unwrap();
        assert_eq!(root.node_type(), Some("root"));

        let heading = &root.children()[0];
        assert_eq!(heading.depth, Some(1));
        let position = heading.position.unwrap();
        assert_eq!(position.start.line, 1);
        assert_eq!(position.end.offset, Some(7));
        assert_eq!(position.to_string(), "1:1");

        let list = &root.children()[1];
        assert_eq!(list.start, None);
        assert_eq!(list.spread, Some(false));
        assert_eq!(list.children()[0].checked, None);
    }

    #[test]
    fn test_null_child_becomes_typeless_node() {
        let json = r#"{"type": "paragraph", "children": [{"type": "text", "value": "a"}, null]}"#;
        let node: Node = serde_json::from_str(json).unwrap();

        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[1].node_type(), None);
    }

    #[test]
    fn test_missing_type_deserializes() {
        let node: Node = serde_json::from_str(r#"{"value": "orphan"}"#).unwrap();
        assert_eq!(node.node_type(), None);
        assert_eq!(node.value.as_deref(), Some("orphan"));
    }

    #[test]
    fn test_empty_type_reads_as_missing() {
        let node: Node = serde_json::from_str(r#"{"type": "", "value": "x"}"#).unwrap();
        assert_eq!(node.node_type(), None);
    }

    #[test]
    fn test_data_overrides() {
        let json = r#"{
            "type": "emphasis",
            "data": {"hName": "mark", "hProperties": {"className": ["hl"]}},
            "children": []
        }"#;
        let node: Node = serde_json::from_str(json).unwrap();

        let data = node.overrides().unwrap();
        assert_eq!(data.h_name.as_deref(), Some("mark"));
        assert!(data.h_properties.as_ref().unwrap().contains_key("className"));

        let empty = Node::new("text").with_data(Data::default());
        assert!(empty.overrides().is_none());
    }

    #[test]
    fn test_serde_roundtrip() {
        let root = Node::root(vec![
            Node::heading(1, vec![Node::text("Title")]),
            Node::paragraph(vec![
                Node::text("Hello "),
                Node::emphasis(vec![Node::text("world")]),
            ]),
        ]);

        let json = serde_json::to_string(&root).unwrap();
        let parsed: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(root, parsed);
    }
}

//! Node predicates

use crate::registry::NodeKind;
use md2bn_mdast::Node;

/// Check if the node should be rendered as a plain text leaf
///
/// True when the node requests no semantic override (`hName`,
/// `hProperties`, `hChildren`) and carries a `value`.
pub fn is_text_node(node: &Node) -> bool {
    node.overrides().is_none() && node.value.is_some()
}

/// Check if the node has the given kind
pub fn is_kind(node: &Node, kind: &NodeKind) -> bool {
    node.node_type() == Some(kind.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use md2bn_mdast::Data;

    #[test]
    fn test_literal_nodes_are_text() {
        assert!(is_text_node(&Node::text("hi")));
        assert!(is_text_node(&Node::inline_code("x")));
        assert!(is_text_node(&Node::literal("footnoteReference", "")));
    }

    #[test]
    fn test_parents_are_not_text() {
        assert!(!is_text_node(&Node::paragraph(vec![Node::text("hi")])));
        assert!(!is_text_node(&Node::line_break()));
    }

    #[test]
    fn test_overrides_disable_text() {
        let named = Node::text("hi").with_data(Data {
            h_name: Some("mark".to_string()),
            ..Default::default()
        });
        assert!(!is_text_node(&named));

        let children = Node::text("hi").with_data(Data {
            h_children: Some(vec![]),
            ..Default::default()
        });
        assert!(!is_text_node(&children));

        // Empty data is not an override
        assert!(is_text_node(&Node::text("hi").with_data(Data::default())));
    }

    #[test]
    fn test_is_kind() {
        assert!(is_kind(&Node::line_break(), &NodeKind::Break));
        assert!(!is_kind(&Node::thematic_break(), &NodeKind::Break));
        assert!(is_kind(
            &Node::new("footnote"),
            &NodeKind::Other("footnote".to_string())
        ));
        assert!(!is_kind(&Node::default(), &NodeKind::Break));
    }
}

//! List looseness resolution
//!
//! A loose list renders each item's blocks intact; a tight list collapses
//! item paragraphs so inline content sits directly in the item.

use md2bn_mdast::Node;

/// Whether a list renders loose
///
/// An explicit `spread: true` wins; otherwise the list is loose as soon as
/// one of its items is.
pub fn is_list_loose(list: &Node) -> bool {
    list.spread == Some(true) || list.children().iter().any(is_list_item_loose)
}

/// Whether a single list item renders loose
///
/// Uses the item's own `spread` flag when set, else whether it holds more
/// than one block.
pub fn is_list_item_loose(item: &Node) -> bool {
    item.spread.unwrap_or_else(|| item.children().len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn para(text: &str) -> Node {
        Node::paragraph(vec![Node::text(text)])
    }

    #[test]
    fn test_single_paragraph_items_are_tight() {
        let list = Node::list(
            false,
            vec![
                Node::list_item(vec![para("a")]),
                Node::list_item(vec![para("b")]),
            ],
        );
        assert!(!is_list_loose(&list));
    }

    #[test]
    fn test_multi_block_item_makes_list_loose() {
        let list = Node::list(false, vec![Node::list_item(vec![para("a"), para("b")])]);
        assert!(is_list_loose(&list));
    }

    #[test]
    fn test_explicit_list_spread() {
        let list = Node::list(false, vec![Node::list_item(vec![para("a")])]).with_spread(true);
        assert!(is_list_loose(&list));
    }

    #[test]
    fn test_list_spread_false_still_checks_items() {
        let list = Node::list(false, vec![Node::list_item(vec![para("a"), para("b")])])
            .with_spread(false);
        assert!(is_list_loose(&list));
    }

    #[test]
    fn test_item_spread_overrides_block_count() {
        let tight = Node::list_item(vec![para("a"), para("b")]).with_spread(false);
        assert!(!is_list_item_loose(&tight));

        let list = Node::list(false, vec![tight]);
        assert!(!is_list_loose(&list));

        let loose = Node::list_item(vec![para("a")]).with_spread(true);
        assert!(is_list_item_loose(&loose));
    }

    #[test]
    fn test_empty_list_and_item() {
        assert!(!is_list_loose(&Node::list(true, vec![])));
        assert!(!is_list_item_loose(&Node::list_item(vec![])));
    }
}

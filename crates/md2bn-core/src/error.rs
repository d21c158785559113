//! Transform errors

use md2bn_mdast::Position;
use thiserror::Error;

/// Hard failures that abort a document transform
///
/// No partial tree is returned alongside either variant; callers should
/// treat the document as unavailable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("Expected node with a `type`{}", describe_site(.parent, .position))]
    InvalidNode {
        /// Type of the enclosing node, if any
        parent: Option<String>,
        position: Option<Position>,
    },

    #[error("Document nesting exceeds the maximum depth of {limit}")]
    DocumentTooDeep { limit: usize },
}

pub type TransformResult<T> = Result<T, TransformError>;

fn describe_site(parent: &Option<String>, position: &Option<Position>) -> String {
    let mut site = String::new();
    if let Some(parent) = parent {
        site.push_str(&format!(" inside `{}`", parent));
    }
    if let Some(position) = position {
        site.push_str(&format!(" at {}", position));
    }
    site
}

#[cfg(test)]
mod tests {
    use super::*;
    use md2bn_mdast::Point;

    #[test]
    fn test_invalid_node_message() {
        let bare = TransformError::InvalidNode {
            parent: None,
            position: None,
        };
        assert_eq!(bare.to_string(), "Expected node with a `type`");

        let point = Point {
            line: 3,
            column: 5,
            offset: None,
        };
        let located = TransformError::InvalidNode {
            parent: Some("paragraph".to_string()),
            position: Some(Position {
                start: point,
                end: point,
            }),
        };
        assert_eq!(
            located.to_string(),
            "Expected node with a `type` inside `paragraph` at 3:5"
        );
    }

    #[test]
    fn test_too_deep_message() {
        let err = TransformError::DocumentTooDeep { limit: 8 };
        assert_eq!(
            err.to_string(),
            "Document nesting exceeds the maximum depth of 8"
        );
    }
}

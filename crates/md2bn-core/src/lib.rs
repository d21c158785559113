//! md2bn-core: Core library for rendering mdast documents into semantic node trees
//!
//! This crate provides:
//! - Node predicates and list looseness resolution
//! - The dispatch engine and children aggregator
//! - The handler set mapping each mdast node type to `bn-*` UI elements
//! - An explicit handler registry with a highlighter language table
//!
//! # Example
//!
//! ```
//! use md2bn_core::process;
//! use md2bn_mdast::Node;
//!
//! let doc = Node::root(vec![Node::heading(2, vec![Node::text("What is Go!")])]);
//! let root = process(&doc).unwrap();
//!
//! let heading = root.children[0].as_element().unwrap();
//! assert_eq!(heading.tag_name, "bn-subheading");
//! assert_eq!(heading.property("id").and_then(|v| v.as_str()), Some("what-is-go"));
//! ```

pub mod error;
pub mod handlers;
pub mod languages;
pub mod loose;
pub mod predicate;
pub mod registry;
pub mod slug;
pub mod transform;

pub use error::{TransformError, TransformResult};
pub use languages::Languages;
pub use loose::{is_list_item_loose, is_list_loose};
pub use predicate::{is_kind, is_text_node};
pub use registry::{Handler, NodeKind, Overrides, Registry};
pub use slug::slugify;
pub use transform::{Options, Report, State, Transformer, process};

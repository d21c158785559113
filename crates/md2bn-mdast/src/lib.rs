//! md2bn-mdast: data model for md2bn
//!
//! This crate provides:
//! - A generic mdast (Markdown Abstract Syntax Tree) node, as produced by an upstream parser
//! - The semantic node tree that md2bn renders documents into
//! - Serialization of the semantic tree to HTML markup
//!
//! ## Example
//!
//! ```rust
//! use md2bn_mdast::{Content, Root, WriterOptions, properties, to_html};
//!
//! let root = Root::new(vec![Content::element(
//!     "bn-banner",
//!     properties([("text", "Hello".into())]),
//!     vec![],
//! )]);
//!
//! let html = to_html(&root, &WriterOptions::default());
//! assert_eq!(html, r#"<bn-banner text="Hello"></bn-banner>"#);
//! ```

pub mod mdast;
pub mod semantic;
pub mod writer;

pub use mdast::{Data, Node, Point, Position};
pub use semantic::{
    Content, Element, Properties, PropertyValue, Root, Text, is_valid_attribute_name,
    is_valid_tag_name, properties,
};
pub use writer::{WriterOptions, to_html};

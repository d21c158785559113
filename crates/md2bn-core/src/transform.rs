//! mdast to semantic tree transformation
//!
//! The dispatch engine (`State::transform_node`) and the children aggregator
//! (`State::transform_children`). Handlers call back into both to recurse.

use crate::error::{TransformError, TransformResult};
use crate::predicate::{is_kind, is_text_node};
use crate::registry::{NodeKind, Overrides, Registry};
use md2bn_mdast::{
    Content, Element, Node, Properties, Root, Text, is_valid_attribute_name, is_valid_tag_name,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, trace};

/// Default ceiling on nested dispatch
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for the transformer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Maximum node nesting before the transform fails
    pub max_depth: usize,
    /// Rewrite known language aliases (`go`) to the highlighter's name (`golang`)
    pub normalize_languages: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            normalize_languages: false,
        }
    }
}

/// Soft conditions observed during a transform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Node types that fell through to the default handler, with counts
    pub unknown_types: BTreeMap<String, usize>,
    /// Code language tokens the highlighter table does not know, with counts
    pub unrecognized_languages: BTreeMap<String, usize>,
    /// `hName` values and `hProperties` keys dropped for not being valid HTML
    /// names, with counts
    pub rejected_overrides: BTreeMap<String, usize>,
}

impl Report {
    pub fn is_clean(&self) -> bool {
        self.unknown_types.is_empty()
            && self.unrecognized_languages.is_empty()
            && self.rejected_overrides.is_empty()
    }

    /// Fold another report's counts into this one
    pub fn merge(&mut self, other: Report) {
        for (name, count) in other.unknown_types {
            *self.unknown_types.entry(name).or_default() += count;
        }
        for (name, count) in other.unrecognized_languages {
            *self.unrecognized_languages.entry(name).or_default() += count;
        }
        for (name, count) in other.rejected_overrides {
            *self.rejected_overrides.entry(name).or_default() += count;
        }
    }
}

/// A configured transformer
///
/// Holds no per-document state, so one instance can serve concurrent
/// `process` calls.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    registry: Registry,
    options: Options,
}

impl Transformer {
    pub fn new(registry: Registry, options: Options) -> Self {
        Self { registry, options }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Transform a document into a semantic tree
    pub fn process(&self, document: &Node) -> TransformResult<Root> {
        self.process_with_report(document).map(|(root, _)| root)
    }

    /// Transform a document, also returning the soft conditions it hit
    ///
    /// The document node is dispatched like any other; whatever its handler
    /// returns becomes the children of the semantic root.
    pub fn process_with_report(&self, document: &Node) -> TransformResult<(Root, Report)> {
        let mut state = State::new(&self.registry, &self.options);
        let children = state.transform_node(document, None, None)?;
        Ok((Root::new(children), state.report))
    }
}

/// Transform a document with the standard registry and default options
pub fn process(document: &Node) -> TransformResult<Root> {
    Transformer::default().process(document)
}

/// Per-transform state handed to every handler
pub struct State<'a> {
    registry: &'a Registry,
    options: &'a Options,
    depth: usize,
    report: Report,
}

impl<'a> State<'a> {
    pub fn new(registry: &'a Registry, options: &'a Options) -> Self {
        Self {
            registry,
            options,
            depth: 0,
            report: Report::default(),
        }
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub fn options(&self) -> &'a Options {
        self.options
    }

    pub fn report(&self) -> &Report {
        &self.report
    }

    /// Transform a single node
    ///
    /// The handler is looked up in `overrides`, then the registry, falling
    /// back to the default handler for unregistered types.
    pub fn transform_node(
        &mut self,
        node: &Node,
        parent: Option<&Node>,
        overrides: Option<&Overrides>,
    ) -> TransformResult<Vec<Content>> {
        let Some(node_type) = node.node_type() else {
            return Err(TransformError::InvalidNode {
                parent: parent.and_then(Node::node_type).map(str::to_string),
                position: node.position,
            });
        };

        if self.depth >= self.options.max_depth {
            return Err(TransformError::DocumentTooDeep {
                limit: self.options.max_depth,
            });
        }

        let kind = NodeKind::from_type(node_type);
        let handler = overrides
            .and_then(|o| o.get(&kind))
            .or_else(|| self.registry.handler(&kind));
        trace!(node_type, depth = self.depth, "dispatch");

        self.depth += 1;
        let result = match handler {
            Some(handler) => handler(self, node, parent),
            None => {
                debug!(node_type, "no handler registered, using default");
                *self
                    .report
                    .unknown_types
                    .entry(node_type.to_string())
                    .or_default() += 1;
                self.transform_unknown(node)
            }
        };
        self.depth -= 1;
        result
    }

    /// Transform all children of `parent` into one flat sequence
    ///
    /// Text adjacent to an explicit `break` loses the whitespace facing the
    /// break, so no stray space survives at the start or end of a line.
    pub fn transform_children(
        &mut self,
        parent: &Node,
        overrides: Option<&Overrides>,
    ) -> TransformResult<Vec<Content>> {
        let nodes = parent.children();
        let mut values = Vec::with_capacity(nodes.len());

        for (index, node) in nodes.iter().enumerate() {
            let mut result = self.transform_node(node, Some(parent), overrides)?;

            if index > 0 && is_kind(&nodes[index - 1], &NodeKind::Break) {
                if let Some(head) = result.first_mut() {
                    trim_start(head);
                }
            }
            if nodes
                .get(index + 1)
                .is_some_and(|next| is_kind(next, &NodeKind::Break))
            {
                if let Some(tail) = result.last_mut() {
                    trim_end(tail);
                }
            }

            values.extend(result);
        }

        Ok(values)
    }

    /// Build an element for `node`, honoring its semantic overrides
    pub fn element(
        &mut self,
        node: &Node,
        tag_name: &str,
        properties: Properties,
        children: Vec<Content>,
    ) -> Element {
        self.augment(node, Element::new(tag_name, properties, children))
    }

    /// Attach `node`'s position and apply its `hName`, `hProperties` and
    /// `hChildren` overrides to an already built element
    ///
    /// A requested tag or property name that is not a valid HTML name is
    /// skipped and recorded in the report.
    pub fn augment(&mut self, node: &Node, mut element: Element) -> Element {
        element.position = node.position;
        if let Some(data) = node.overrides() {
            if let Some(name) = &data.h_name {
                if is_valid_tag_name(name) {
                    element.tag_name = name.clone();
                } else {
                    self.reject_override(name);
                }
            }
            if let Some(properties) = &data.h_properties {
                for (name, value) in properties {
                    if is_valid_attribute_name(name) {
                        element.properties.insert(name.clone(), value.clone());
                    } else {
                        self.reject_override(name);
                    }
                }
            }
            if let Some(children) = &data.h_children {
                element.children = children.clone();
            }
        }
        element
    }

    /// Record a code language token the highlighter does not know
    pub fn note_unrecognized_language(&mut self, token: &str) {
        debug!(token, "unrecognized code language");
        *self
            .report
            .unrecognized_languages
            .entry(token.to_string())
            .or_default() += 1;
    }

    fn reject_override(&mut self, name: &str) {
        debug!(name, "invalid HTML name in data override, skipping");
        *self
            .report
            .rejected_overrides
            .entry(name.to_string())
            .or_default() += 1;
    }

    /// Default handler: text leaf for literals, `div` wrapper otherwise
    fn transform_unknown(&mut self, node: &Node) -> TransformResult<Vec<Content>> {
        if is_text_node(node) {
            return Ok(vec![Content::Text(Text {
                value: node.value.clone().unwrap_or_default(),
                position: node.position,
            })]);
        }

        let children = self.transform_children(node, None)?;
        Ok(vec![Content::Element(self.element(
            node,
            "div",
            Properties::new(),
            children,
        ))])
    }
}

fn trim_start(node: &mut Content) {
    match node {
        Content::Text(t) => t.value = t.value.trim_start().to_string(),
        Content::Element(e) => {
            if let Some(Content::Text(t)) = e.children.first_mut() {
                t.value = t.value.trim_start().to_string();
            }
        }
    }
}

fn trim_end(node: &mut Content) {
    match node {
        Content::Text(t) => t.value = t.value.trim_end().to_string(),
        Content::Element(e) => {
            if let Some(Content::Text(t)) = e.children.last_mut() {
                t.value = t.value.trim_end().to_string();
            }
        }
    }
}

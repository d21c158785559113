//! Handlers mapping mdast node types to semantic elements
//!
//! Block nodes map onto the `bn-*` components of the presentation layer;
//! inline nodes map onto plain HTML elements.

use crate::error::TransformResult;
use crate::loose::{is_list_item_loose, is_list_loose};
use crate::predicate::is_kind;
use crate::registry::NodeKind;
use crate::slug::slugify;
use crate::transform::State;
use md2bn_mdast::{Content, Element, Node, Position, Properties, PropertyValue, Text, properties};

pub const PARAGRAPH_TAG: &str = "bn-paragraph";
pub const BANNER_TAG: &str = "bn-banner";
pub const SUBHEADING_TAG: &str = "bn-subheading";
pub const LIST_TAG: &str = "bn-list";
pub const RULE_TAG: &str = "bn-rule";
pub const CODEBLOCK_TAG: &str = "bn-codeblock";
pub const LINK_TAG: &str = "bn-link";

pub const GUTTER_CLASS: &str = "bn-gutter";
/// Marks a paragraph collapsed into a tight list item
pub const LIST_PARAGRAPH_CLASS: &str = "li-paragraph";
pub const TASK_LIST_ITEM_CLASS: &str = "task-list-item";
pub const CONTAINS_TASK_LIST_CLASS: &str = "contains-task-list";

type Output = TransformResult<Vec<Content>>;

/// Children of the root, flattened; a root carrying overrides becomes a
/// `div` so that `hName` and friends have an element to apply to
pub fn root(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let children = state.transform_children(node, None)?;
    if node.overrides().is_none() {
        return Ok(children);
    }
    Ok(vec![Content::Element(state.element(
        node,
        "div",
        Properties::new(),
        children,
    ))])
}

pub fn text(_state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    Ok(vec![Content::Text(Text {
        value: node.value.clone().unwrap_or_default(),
        position: node.position,
    })])
}

/// `bn-paragraph` > `p.bn-gutter` > children
pub fn paragraph(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let children = state.transform_children(node, None)?;
    let block = paragraph_block(children, node.position);
    Ok(vec![Content::Element(state.augment(node, block))])
}

/// Paragraph inside a tight list item: a bare `p.li-paragraph`
pub fn tight_paragraph(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let children = state.transform_children(node, None)?;
    Ok(vec![Content::Element(state.element(
        node,
        "p",
        properties([("className", PropertyValue::class(LIST_PARAGRAPH_CLASS))]),
        children,
    ))])
}

/// Depth 1 becomes the page banner; deeper levels become linkable subheadings
pub fn heading(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let text = node
        .children()
        .first()
        .and_then(|child| child.value.clone())
        .unwrap_or_default();

    let element = if node.depth == Some(1) {
        state.element(node, BANNER_TAG, properties([("text", text.into())]), vec![])
    } else {
        let id = slugify(&text);
        state.element(
            node,
            SUBHEADING_TAG,
            properties([("id", id.into()), ("text", text.into())]),
            vec![],
        )
    };
    Ok(vec![Content::Element(element)])
}

/// `bn-list` > `ol`/`ul` > items
pub fn list(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let items = state.transform_children(node, None)?;

    // Like GitHub, flag lists holding task items for custom styling
    let contains_task_list = items
        .iter()
        .filter_map(Content::as_element)
        .any(|item| item.has_class(TASK_LIST_ITEM_CLASS));

    let start = node
        .start
        .filter(|&start| start != 1)
        .map(|start| ("start".to_string(), PropertyValue::from(start)));
    let class = contains_task_list.then(|| {
        (
            "className".to_string(),
            PropertyValue::class(CONTAINS_TASK_LIST_CLASS),
        )
    });
    let list_properties: Properties = start.into_iter().chain(class).collect();

    let tag_name = if node.ordered == Some(true) { "ol" } else { "ul" };
    let list = Element::new(tag_name, list_properties, items).with_position(node.position);
    Ok(vec![Content::Element(state.element(
        node,
        LIST_TAG,
        Properties::new(),
        vec![Content::Element(list)],
    ))])
}

/// `li`, flattening paragraphs when the enclosing list is tight
pub fn list_item(state: &mut State<'_>, node: &Node, parent: Option<&Node>) -> Output {
    let loose = match parent {
        Some(list) if is_kind(list, &NodeKind::List) => is_list_loose(list),
        _ => is_list_item_loose(node),
    };

    let overrides = (!loose).then(|| state.registry().tight_item_overrides());
    let mut children = state.transform_children(node, overrides)?;

    let item_properties = match node.checked {
        Some(checked) => {
            let checkbox = checkbox(checked);
            if loose {
                children = prepend_in_paragraph(children, checkbox);
            } else {
                prepend_checkbox(&mut children, checkbox);
            }
            properties([("className", PropertyValue::class(TASK_LIST_ITEM_CLASS))])
        }
        None => Properties::new(),
    };

    Ok(vec![Content::Element(state.element(
        node,
        "li",
        item_properties,
        children,
    ))])
}

/// `break` and `thematicBreak` both render as a rule
pub fn rule(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    Ok(vec![Content::Element(state.element(
        node,
        RULE_TAG,
        Properties::new(),
        vec![],
    ))])
}

/// `bn-codeblock` > `pre` > `code.language-*` > text
pub fn code(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let value = format!("{}\n", node.value.as_deref().unwrap_or_default());

    let code_properties = match node.lang.as_deref().and_then(language_token) {
        Some(token) => {
            let name = language_name(state, token);
            properties([(
                "className",
                PropertyValue::class(&format!("language-{}", name)),
            )])
        }
        None => Properties::new(),
    };

    let code = Element::new("code", code_properties, vec![Content::text(value)])
        .with_position(node.position);
    let pre = Element::new("pre", Properties::new(), vec![Content::Element(code)])
        .with_position(node.position);

    let block_properties: Properties = node
        .lang
        .iter()
        .map(|lang| ("langName".to_string(), PropertyValue::from(lang.as_str())))
        .collect();

    Ok(vec![Content::Element(state.element(
        node,
        CODEBLOCK_TAG,
        block_properties,
        vec![Content::Element(pre)],
    ))])
}

/// Leading run of the `lang` field up to the first space or tab
pub fn language_token(lang: &str) -> Option<&str> {
    lang.split([' ', '\t']).next().filter(|token| !token.is_empty())
}

/// Class name for a language token, checked against the highlighter table
fn language_name(state: &mut State<'_>, token: &str) -> String {
    match state.registry().languages().canonical(token) {
        Some(name) if state.options().normalize_languages => name.to_string(),
        Some(_) => token.to_string(),
        None => {
            state.note_unrecognized_language(token);
            token.to_string()
        }
    }
}

/// `bn-link` carrying its target as `path`
pub fn link(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let children = state.transform_children(node, None)?;

    let path = node.url.clone().unwrap_or_default();
    let title = node
        .title
        .iter()
        .map(|title| ("title".to_string(), PropertyValue::from(title.as_str())));
    let link_properties: Properties =
        std::iter::once(("path".to_string(), PropertyValue::from(path)))
            .chain(title)
            .collect();

    Ok(vec![Content::Element(state.element(
        node,
        LINK_TAG,
        link_properties,
        children,
    ))])
}

pub fn emphasis(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    wrap(state, node, "em")
}

pub fn strong(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    wrap(state, node, "strong")
}

pub fn delete(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    wrap(state, node, "del")
}

pub fn blockquote(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    wrap(state, node, "blockquote")
}

pub fn inline_code(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let value = node.value.clone().unwrap_or_default();
    Ok(vec![Content::Element(state.element(
        node,
        "code",
        Properties::new(),
        vec![Content::text(value)],
    ))])
}

pub fn image(state: &mut State<'_>, node: &Node, _parent: Option<&Node>) -> Output {
    let src = node.url.clone().unwrap_or_default();
    let image_properties: Properties = [
        Some(("src", src)),
        node.alt.clone().map(|alt| ("alt", alt)),
        node.title.clone().map(|title| ("title", title)),
    ]
    .into_iter()
    .flatten()
    .map(|(name, value)| (name.to_string(), PropertyValue::from(value)))
    .collect();

    Ok(vec![Content::Element(state.element(
        node,
        "img",
        image_properties,
        vec![],
    ))])
}

fn wrap(state: &mut State<'_>, node: &Node, tag_name: &str) -> Output {
    let children = state.transform_children(node, None)?;
    Ok(vec![Content::Element(state.element(
        node,
        tag_name,
        Properties::new(),
        children,
    ))])
}

fn paragraph_block(children: Vec<Content>, position: Option<Position>) -> Element {
    let body = Element::new(
        "p",
        properties([("className", PropertyValue::class(GUTTER_CLASS))]),
        children,
    )
    .with_position(position);
    Element::new(PARAGRAPH_TAG, Properties::new(), vec![Content::Element(body)])
}

fn checkbox(checked: bool) -> Content {
    Content::element(
        "input",
        properties([
            ("checked", checked.into()),
            ("disabled", true.into()),
            ("type", "checkbox".into()),
        ]),
        vec![],
    )
}

fn prepend_checkbox(container: &mut Vec<Content>, checkbox: Content) {
    if !container.is_empty() {
        container.insert(0, Content::text(" "));
    }
    container.insert(0, checkbox);
}

/// Put the checkbox inside the item's leading paragraph, creating an empty
/// one when the item does not start with a paragraph
fn prepend_in_paragraph(mut children: Vec<Content>, checkbox: Content) -> Vec<Content> {
    let starts_with_paragraph = children
        .first()
        .and_then(Content::as_element)
        .is_some_and(|block| {
            block.tag_name == PARAGRAPH_TAG
                && matches!(block.children.first(), Some(Content::Element(_)))
        });
    if !starts_with_paragraph {
        children.insert(0, Content::Element(paragraph_block(Vec::new(), None)));
    }

    if let Some(Content::Element(block)) = children.first_mut() {
        if let Some(Content::Element(body)) = block.children.first_mut() {
            prepend_checkbox(&mut body.children, checkbox);
        }
    }
    children
}

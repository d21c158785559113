//! Semantic tree to HTML writer
//!
//! Serializes a semantic tree into markup that the presentation layer can
//! mount directly. Custom elements (`bn-*`) are always written with an
//! explicit closing tag; only HTML void elements are left unclosed.
//!
//! Tag and attribute names are not escapable, so names outside the HTML
//! grammar are never written: an element with an invalid tag name is
//! replaced by its children, and an invalid attribute is dropped.

use crate::semantic::{
    Content, Element, PropertyValue, Root, is_valid_attribute_name, is_valid_tag_name,
};

/// Options for the HTML writer
#[derive(Debug, Clone, Default)]
pub struct WriterOptions {
    /// Write void elements as `<input ... />` instead of `<input ...>`
    pub close_void_elements: bool,
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Convert a semantic tree to HTML
pub fn to_html(root: &Root, options: &WriterOptions) -> String {
    let mut writer = Writer::new(options);
    for node in &root.children {
        writer.write_content(node);
    }
    writer.output
}

/// HTML writer state
struct Writer<'a> {
    options: &'a WriterOptions,
    output: String,
}

impl<'a> Writer<'a> {
    fn new(options: &'a WriterOptions) -> Self {
        Self {
            options,
            output: String::new(),
        }
    }

    fn write_content(&mut self, node: &Content) {
        match node {
            Content::Text(t) => push_escaped_text(&mut self.output, &t.value),
            Content::Element(e) => self.write_element(e),
        }
    }

    fn write_element(&mut self, element: &Element) {
        if !is_valid_tag_name(&element.tag_name) {
            for child in &element.children {
                self.write_content(child);
            }
            return;
        }

        self.output.push('<');
        self.output.push_str(&element.tag_name);
        for (name, value) in &element.properties {
            self.write_attribute(name, value);
        }

        if VOID_ELEMENTS.contains(&element.tag_name.as_str()) {
            self.output
                .push_str(if self.options.close_void_elements { " />" } else { ">" });
            return;
        }

        self.output.push('>');
        for child in &element.children {
            self.write_content(child);
        }
        self.output.push_str("</");
        self.output.push_str(&element.tag_name);
        self.output.push('>');
    }

    fn write_attribute(&mut self, name: &str, value: &PropertyValue) {
        if !is_valid_attribute_name(name) {
            return;
        }

        let value = match value {
            PropertyValue::Boolean(false) => return,
            PropertyValue::Boolean(true) => None,
            PropertyValue::Number(n) => Some(n.to_string()),
            PropertyValue::String(s) => Some(s.clone()),
            PropertyValue::List(items) => Some(items.join(" ")),
        };

        self.output.push(' ');
        self.output.push_str(attribute_name(name));
        if let Some(value) = value {
            self.output.push_str("=\"");
            push_escaped_attr(&mut self.output, &value);
            self.output.push('"');
        }
    }
}

/// Map hast property names to their HTML attribute names
fn attribute_name(property: &str) -> &str {
    match property {
        "className" => "class",
        "htmlFor" => "for",
        other => other,
    }
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
}

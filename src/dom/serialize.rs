//! HTML serialization of document subtrees.

use super::document::{DocumentData, Namespace, NodeKind};
use crate::shared::is_void_tag;

/// Serializes the node at `index` including itself.
pub(super) fn outer_html(data: &DocumentData, index: usize) -> String {
    let mut out = String::new();
    write_node(data, index, &mut out);
    out
}

/// Serializes the children of the node at `index`.
pub(super) fn inner_html(data: &DocumentData, index: usize) -> String {
    let mut out = String::new();
    for &child in &data.nodes[index].children {
        write_node(data, child, &mut out);
    }
    out
}

fn write_node(data: &DocumentData, index: usize, out: &mut String) {
    let node = &data.nodes[index];
    match &node.kind {
        NodeKind::Document | NodeKind::Fragment => {
            for &child in &node.children {
                write_node(data, child, out);
            }
        }
        NodeKind::Text(text) => {
            let raw = node
                .parent
                .and_then(|p| data.nodes[p].element())
                .is_some_and(|e| e.namespace == Namespace::Html && matches!(e.tag.as_str(), "script" | "style"));
            if raw {
                out.push_str(text);
            } else {
                escape_into(text, false, out);
            }
        }
        NodeKind::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(&element.tag);
            if let Some(is) = &element.is {
                if !element.attributes.contains_key("is") {
                    out.push_str(" is=\"");
                    escape_into(is, true, out);
                    out.push('"');
                }
            }
            for (name, value) in &element.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            let void = element.namespace == Namespace::Html && is_void_tag(&element.tag);
            if void {
                out.push('>');
                return;
            }
            if element.namespace == Namespace::Svg && node.children.is_empty() {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for &child in &node.children {
                write_node(data, child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
}

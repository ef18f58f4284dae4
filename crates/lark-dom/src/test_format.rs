//! The html5lib tree-construction dump format.
//!
//! Each node is printed on its own line as `| ` followed by two spaces of
//! indentation per depth level:
//!
//! ```text
//! | <!DOCTYPE html>
//! | <html>
//! |   <head>
//! |   <body>
//! |     <svg svg>
//! |       xlink href="#a"
//! |     "text"
//! ```
//!
//! Attributes follow their element, one level deeper, sorted by their printed
//! name. Template contents are printed under a `content` line.

use std::fmt::Write;

use crate::{DomTree, NodeId, NodeType};

impl DomTree {
    /// Dump the children of `id` in html5lib test format.
    ///
    /// Pass [`NodeId::ROOT`] for a whole document, or the fragment node
    /// returned by fragment parsing.
    #[must_use]
    pub fn to_test_format(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut pending: Vec<(NodeId, usize)> =
            self.children(id).iter().rev().map(|&child| (child, 0)).collect();
        while let Some((node, depth)) = pending.pop() {
            self.write_node(node, depth, &mut out, &mut pending);
        }
        out
    }

    /// Write one node and queue its children on `pending`.
    fn write_node(
        &self,
        id: NodeId,
        depth: usize,
        out: &mut String,
        pending: &mut Vec<(NodeId, usize)>,
    ) {
        let Some(node) = self.get(id) else {
            return;
        };
        pending.extend(node.children.iter().rev().map(|&child| (child, depth + 1)));
        let indent = "  ".repeat(depth);

        match &node.node_type {
            NodeType::Document | NodeType::DocumentFragment => {}
            NodeType::DocumentType(doctype) => {
                if doctype.public_id.is_empty() && doctype.system_id.is_empty() {
                    let _ = writeln!(out, "| {indent}<!DOCTYPE {}>", doctype.name);
                } else {
                    let _ = writeln!(
                        out,
                        "| {indent}<!DOCTYPE {} \"{}\" \"{}\">",
                        doctype.name, doctype.public_id, doctype.system_id
                    );
                }
            }
            NodeType::Text(text) => {
                let _ = writeln!(out, "| {indent}\"{text}\"");
            }
            NodeType::Comment(data) => {
                let _ = writeln!(out, "| {indent}<!-- {data} -->");
            }
            NodeType::Element(data) => {
                match data.namespace.test_format_prefix() {
                    Some(prefix) => {
                        let _ = writeln!(out, "| {indent}<{prefix} {}>", data.tag_name);
                    }
                    None => {
                        let _ = writeln!(out, "| {indent}<{}>", data.tag_name);
                    }
                }

                let mut attrs: Vec<(String, &str)> = data
                    .attrs
                    .iter()
                    .map(|attr| {
                        let name = match attr.namespace.and_then(|ns| ns.test_format_prefix()) {
                            Some(prefix) => format!("{prefix} {}", attr.name),
                            None => attr.name.clone(),
                        };
                        (name, attr.value.as_str())
                    })
                    .collect();
                attrs.sort_by(|a, b| a.0.cmp(&b.0));
                for (name, value) in attrs {
                    let _ = writeln!(out, "| {indent}  {name}=\"{value}\"");
                }

                if let Some(contents) = data.template_contents {
                    let _ = writeln!(out, "| {indent}  content");
                    pending.extend(
                        self.children(contents)
                            .iter()
                            .rev()
                            .map(|&child| (child, depth + 2)),
                    );
                }
            }
        }
    }
}

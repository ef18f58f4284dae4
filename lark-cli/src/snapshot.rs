//! JSON snapshot of a parsed tree.

use std::collections::BTreeMap;

use lark_dom::{DomTree, NodeId, NodeType};
use lark_html::ParseIssue;
use serde::Serialize;

/// A node and its subtree.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JsonNode {
    /// The document node.
    Document { children: Vec<JsonNode> },
    /// A fragment: the result of fragment parsing or template contents.
    DocumentFragment { children: Vec<JsonNode> },
    /// `<!DOCTYPE>`
    #[serde(rename_all = "camelCase")]
    Doctype {
        name: String,
        public_id: String,
        system_id: String,
    },
    /// An element with its attributes.
    #[serde(rename_all = "camelCase")]
    Element {
        tag_name: String,
        namespace: String,
        attributes: BTreeMap<String, String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<Box<JsonNode>>,
        children: Vec<JsonNode>,
    },
    /// A text node.
    Text { content: String },
    /// A comment.
    Comment { content: String },
}

/// Everything the CLI reports for one parse.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// `no-quirks`, `quirks` or `limited-quirks`.
    pub quirks_mode: String,
    /// Parse errors as `code at offset`.
    pub errors: Vec<String>,
    /// The tree.
    pub tree: JsonNode,
}

impl Report {
    /// Snapshot the subtree at `root`.
    pub fn new(tree: &DomTree, root: NodeId, issues: &[ParseIssue]) -> Self {
        Self {
            quirks_mode: tree.quirks_mode().to_string(),
            errors: issues.iter().map(ToString::to_string).collect(),
            tree: node_to_json(tree, root),
        }
    }
}

fn node_to_json(tree: &DomTree, id: NodeId) -> JsonNode {
    let children = || -> Vec<JsonNode> {
        tree.children(id)
            .iter()
            .map(|&child| node_to_json(tree, child))
            .collect()
    };

    let Some(node) = tree.get(id) else {
        return JsonNode::DocumentFragment { children: Vec::new() };
    };
    match &node.node_type {
        NodeType::Document => JsonNode::Document { children: children() },
        NodeType::DocumentFragment => JsonNode::DocumentFragment { children: children() },
        NodeType::DocumentType(doctype) => JsonNode::Doctype {
            name: doctype.name.clone(),
            public_id: doctype.public_id.clone(),
            system_id: doctype.system_id.clone(),
        },
        NodeType::Element(data) => JsonNode::Element {
            tag_name: data.tag_name.clone(),
            namespace: data.namespace.url().to_string(),
            attributes: data
                .attrs
                .iter()
                .map(|attr| (attr.qualified_name(), attr.value.clone()))
                .collect(),
            content: data
                .template_contents
                .map(|contents| Box::new(node_to_json(tree, contents))),
            children: children(),
        },
        NodeType::Text(text) => JsonNode::Text {
            content: text.clone(),
        },
        NodeType::Comment(text) => JsonNode::Comment {
            content: text.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lark_html::parse_document;

    #[test]
    fn test_snapshot_shape() {
        let tree = parse_document("<!DOCTYPE html><p class=x>hi");
        let report = Report::new(&tree, tree.root(), &[]);
        let json = serde_json::to_value(&report).expect("serializable");

        assert_eq!(json["quirksMode"], "no-quirks");
        assert_eq!(json["tree"]["type"], "document");
        assert_eq!(json["tree"]["children"][0]["type"], "doctype");

        let body = &json["tree"]["children"][1]["children"][1];
        assert_eq!(body["tagName"], "body");
        let p = &body["children"][0];
        assert_eq!(p["attributes"]["class"], "x");
        assert_eq!(p["children"][0]["content"], "hi");
        assert!(p.get("content").is_none());
    }
}

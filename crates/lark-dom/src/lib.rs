//! Arena-backed DOM tree produced by the Lark HTML parser.
//!
//! This crate provides an arena-based DOM tree structure following the
//! [DOM Living Standard](https://dom.spec.whatwg.org/).
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for all relationships,
//! providing O(1) access and traversal without borrow checker issues. Nodes
//! detached by the parser stay allocated; they simply have no parent.

pub mod doctype;
pub mod namespace;
pub mod test_format;

pub use doctype::{DocumentTypeData, QuirksMode};
pub use namespace::Namespace;

/// A type-safe index into the DOM tree.
///
/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
/// "Each node has an associated node document..."
///
/// `NodeId` provides O(1) access to any node in the tree without borrowing issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root document node is always at index 0.
    pub const ROOT: Self = Self(0);
}

/// [§ 4.9.2 Interface Attr](https://dom.spec.whatwg.org/#interface-attr)
///
/// "Attr nodes are simply known as attributes. ... Attributes have a
/// namespace (null or a non-empty string), namespace prefix (null or a
/// non-empty string), local name (a non-empty string), value (a string)".
///
/// The tokenizer produces attributes with no prefix and no namespace; the
/// tree builder assigns both for `xlink:`, `xml:` and `xmlns` attributes on
/// foreign elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The local name (lowercased by the tokenizer, case-adjusted for SVG/MathML).
    pub name: String,
    /// The attribute value.
    pub value: String,
    /// The namespace prefix (`xlink`, `xml` or `xmlns`), if any.
    pub prefix: Option<&'static str>,
    /// The attribute namespace, if any.
    pub namespace: Option<Namespace>,
}

impl Attribute {
    /// Create an attribute in no namespace.
    #[must_use]
    pub fn new(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            prefix: None,
            namespace: None,
        }
    }

    /// `prefix:name` for namespaced attributes, otherwise the local name.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match self.prefix {
            Some(prefix) => format!("{prefix}:{}", self.name),
            None => self.name.clone(),
        }
    }

    /// Whether two attributes name the same (namespace, local name) pair.
    #[must_use]
    pub fn same_name(&self, other: &Self) -> bool {
        self.name == other.name && self.namespace == other.namespace
    }
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Node is an abstract interface that is used by all nodes in a tree."
///
/// This node stores indices for parent/child/sibling relationships,
/// enabling O(1) traversal in any direction.
#[derive(Debug, Clone)]
pub struct Node {
    /// "Each node has an associated node type"
    pub node_type: NodeType,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)
    /// "An object that participates in a tree has a parent, which is either
    /// null or an object."
    pub parent: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)
    /// "A node has an associated list of children"
    pub children: Vec<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-next-sibling)
    pub next_sibling: Option<NodeId>,

    /// [§ 4.4](https://dom.spec.whatwg.org/#concept-tree-previous-sibling)
    pub prev_sibling: Option<NodeId>,
}

/// [§ 4.4 Interface Node](https://dom.spec.whatwg.org/#interface-node)
///
/// "Each node has an associated node type"
#[derive(Debug, Clone)]
pub enum NodeType {
    /// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
    Document,
    /// [§ 4.7 Interface DocumentFragment](https://dom.spec.whatwg.org/#interface-documentfragment)
    ///
    /// Used for `<template>` contents and fragment parsing results.
    DocumentFragment,
    /// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
    DocumentType(DocumentTypeData),
    /// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
    /// "Element nodes are simply known as elements."
    Element(ElementData),
    /// [§ 4.10 Interface Text](https://dom.spec.whatwg.org/#interface-text)
    Text(String),
    /// [§ 4.14 Interface Comment](https://dom.spec.whatwg.org/#interface-comment)
    Comment(String),
}

/// Element-specific data.
///
/// Per [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element):
/// "Elements have an associated namespace, namespace prefix, local name, ..."
///
/// Attributes keep source order; the parser never produces two attributes
/// with the same name on one element.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// "An element's local name"
    pub tag_name: String,
    /// "An element's namespace"
    pub namespace: Namespace,
    /// "An element has an associated attribute list"
    pub attrs: Vec<Attribute>,
    /// [§ 4.12.3 The template element](https://html.spec.whatwg.org/multipage/scripting.html#template-contents)
    ///
    /// "Each template element has an associated DocumentFragment object that
    /// is its template contents."
    pub template_contents: Option<NodeId>,
}

impl ElementData {
    /// An element with no attributes.
    #[must_use]
    pub fn new(tag_name: &str, namespace: Namespace) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            namespace,
            attrs: Vec::new(),
            template_contents: None,
        }
    }

    /// Value of the un-namespaced attribute `name`, if present.
    #[must_use]
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|attr| attr.namespace.is_none() && attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whether this is an HTML element with the given local name.
    #[must_use]
    pub fn is_html(&self, tag_name: &str) -> bool {
        self.namespace == Namespace::Html && self.tag_name == tag_name
    }
}

/// Arena-based DOM tree with O(1) node access and traversal.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// The Document node is always at index 0 ([`NodeId::ROOT`]).
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<Node>,
    /// [§ 4.5](https://dom.spec.whatwg.org/#concept-document-mode)
    quirks_mode: QuirksMode,
}

impl DomTree {
    /// Create a new DOM tree with just the Document node.
    #[must_use]
    pub fn new() -> Self {
        let document = Node {
            node_type: NodeType::Document,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        };
        Self {
            nodes: vec![document],
            quirks_mode: QuirksMode::NoQuirks,
        }
    }

    /// Get the root document node ID.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Get a mutable reference to a node by its ID.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Number of allocated nodes, attached or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: the Document node is allocated on construction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The document's mode.
    #[must_use]
    pub const fn quirks_mode(&self) -> QuirksMode {
        self.quirks_mode
    }

    /// Set the document's mode.
    pub const fn set_quirks_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
    }

    /// Allocate a new node and return its ID.
    /// The node is not yet attached to the tree.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
            next_sibling: None,
            prev_sibling: None,
        });
        id
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    ///
    /// Appends `child` as the last child of `parent`. A child that already has
    /// a parent is removed from it first.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);

        let prev_last_child = self.nodes[parent.0].children.last().copied();
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);

        if let Some(prev_id) = prev_last_child {
            self.nodes[prev_id.0].next_sibling = Some(child);
            self.nodes[child.0].prev_sibling = Some(prev_id);
        }
    }

    /// [§ 4.2.2 Insert](https://dom.spec.whatwg.org/#concept-node-insert)
    ///
    /// Inserts `child` into `parent` immediately before `reference`. If
    /// `reference` is not a child of `parent`, `child` is appended instead.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);

        let Some(pos) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == reference)
        else {
            self.append_child(parent, child);
            return;
        };

        self.nodes[parent.0].children.insert(pos, child);
        let prev = self.nodes[reference.0].prev_sibling;

        let node = &mut self.nodes[child.0];
        node.parent = Some(parent);
        node.prev_sibling = prev;
        node.next_sibling = Some(reference);

        self.nodes[reference.0].prev_sibling = Some(child);
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = Some(child);
        }
    }

    /// [§ 4.2.3 Remove](https://dom.spec.whatwg.org/#concept-node-remove)
    ///
    /// Removes `child` from `parent`'s children. Does nothing if `child` is
    /// not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(pos) = self.nodes[parent.0]
            .children
            .iter()
            .position(|&id| id == child)
        else {
            return;
        };
        let _ = self.nodes[parent.0].children.remove(pos);

        let prev = self.nodes[child.0].prev_sibling;
        let next = self.nodes[child.0].next_sibling;
        if let Some(prev_id) = prev {
            self.nodes[prev_id.0].next_sibling = next;
        }
        if let Some(next_id) = next {
            self.nodes[next_id.0].prev_sibling = prev;
        }

        let node = &mut self.nodes[child.0];
        node.parent = None;
        node.prev_sibling = None;
        node.next_sibling = None;
    }

    /// Remove `node` from its parent, if it has one.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.remove_child(parent, node);
        }
    }

    /// Move all children of `from` to the end of `to`'s children, keeping
    /// their order.
    pub fn move_children(&mut self, from: NodeId, to: NodeId) {
        let children = std::mem::take(&mut self.nodes[from.0].children);
        for child in children {
            let node = &mut self.nodes[child.0];
            node.parent = None;
            node.prev_sibling = None;
            node.next_sibling = None;
            self.append_child(to, child);
        }
    }

    /// Insert character data into `parent`, before `before` or at the end.
    ///
    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    /// "If there is a Text node immediately before the adjusted insertion
    /// location, then append data to that Text node's data. Otherwise, create
    /// a new Text node ... and insert the newly created node at the adjusted
    /// insertion location."
    pub fn insert_text(&mut self, parent: NodeId, data: &str, before: Option<NodeId>) {
        let previous = match before {
            Some(reference) if self.parent(reference) == Some(parent) => {
                self.prev_sibling(reference)
            }
            _ => self.last_child(parent),
        };

        if let Some(prev_id) = previous
            && let NodeType::Text(text) = &mut self.nodes[prev_id.0].node_type
        {
            text.push_str(data);
            return;
        }

        let text = self.alloc(NodeType::Text(data.to_string()));
        match before {
            Some(reference) => self.insert_before(parent, text, reference),
            None => self.append_child(parent, text),
        }
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get all children of a node.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Get the last child of a node.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.children.last().copied())
    }

    /// Get the next sibling of a node.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling)
    }

    /// Get the previous sibling of a node.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling)
    }

    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    ///
    /// Check if `descendant` is a descendant of `ancestor`.
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.parent(descendant);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Get element data if this node is an element.
    #[must_use]
    pub fn as_element(&self, id: NodeId) -> Option<&ElementData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get mutable element data if this node is an element.
    pub fn as_element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.get_mut(id).and_then(|n| match &mut n.node_type {
            NodeType::Element(data) => Some(data),
            _ => None,
        })
    }

    /// Get text content if this node is a text node.
    #[must_use]
    pub fn as_text(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    /// Get the doctype data if this node is a document type node.
    #[must_use]
    pub fn as_doctype(&self, id: NodeId) -> Option<&DocumentTypeData> {
        self.get(id).and_then(|n| match &n.node_type {
            NodeType::DocumentType(data) => Some(data),
            _ => None,
        })
    }

    /// The `<template>` contents fragment of `id`, if it is a template.
    #[must_use]
    pub fn template_contents(&self, id: NodeId) -> Option<NodeId> {
        self.as_element(id).and_then(|e| e.template_contents)
    }

    /// [§ 3.1.1 The document element](https://html.spec.whatwg.org/multipage/dom.html#the-html-element-2)
    ///
    /// "The document element of a document is the element whose parent is that
    /// document, if it exists; otherwise null."
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_element(id).is_some())
            .copied()
    }

    /// The document's doctype node, if any.
    #[must_use]
    pub fn doctype(&self) -> Option<NodeId> {
        self.children(NodeId::ROOT)
            .iter()
            .find(|&&id| self.as_doctype(id).is_some())
            .copied()
    }

    /// [§ 3.1.3 The head element](https://html.spec.whatwg.org/multipage/dom.html#dom-document-head)
    ///
    /// "The head element of a document is the first head element that is a
    /// child of the html element, if there is one, or null otherwise."
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.first_html_child_of_root(&["head"])
    }

    /// [§ 3.1.3 The body element](https://html.spec.whatwg.org/multipage/dom.html#the-body-element-2)
    ///
    /// "The body element of a document is the first of the html element's children
    /// that is either a body element or a frameset element, or null if there is
    /// no such element."
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.first_html_child_of_root(&["body", "frameset"])
    }

    fn first_html_child_of_root(&self, names: &[&str]) -> Option<NodeId> {
        let html = self.document_element()?;
        self.children(html)
            .iter()
            .find(|&&id| {
                self.as_element(id)
                    .is_some_and(|e| names.iter().any(|name| e.is_html(name)))
            })
            .copied()
    }

    /// Concatenated data of all text descendants of `id`, in tree order.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut pending: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(child) = pending.pop() {
            match self.get(child).map(|n| &n.node_type) {
                Some(NodeType::Text(text)) => out.push_str(text),
                Some(NodeType::Element(_)) => {
                    pending.extend(self.children(child).iter().rev().copied());
                }
                _ => {}
            }
        }
        out
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

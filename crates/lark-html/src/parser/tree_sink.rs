//! The interface between tree construction and the tree being built.
//!
//! The tree builder never touches nodes directly: it holds copyable handles
//! and asks a [`TreeSink`] to create, move and inspect nodes. The
//! [`lark_dom::DomTree`] implementation lives in [`super::dom_sink`].

use std::fmt;

use lark_dom::{Namespace, QuirksMode};

use crate::tokenizer::Attribute;

/// Node construction and mutation as tree construction needs it.
///
/// Handles must stay valid for the lifetime of the sink, including for nodes
/// that have been detached.
pub trait TreeSink {
    /// A reference to a node.
    type Handle: Copy + Eq + fmt::Debug;

    /// The Document node.
    fn document(&self) -> Self::Handle;

    /// Create an empty, detached `DocumentFragment`.
    fn create_document_fragment(&mut self) -> Self::Handle;

    /// Create a detached element. Attribute names are already adjusted for
    /// the namespace.
    fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> Self::Handle;

    /// Create a detached comment.
    fn create_comment(&mut self, data: &str) -> Self::Handle;

    /// Create a detached text node.
    fn create_text(&mut self, data: &str) -> Self::Handle;

    /// Append `child` to `parent`, removing it from any previous parent.
    fn append_child(&mut self, parent: Self::Handle, child: Self::Handle);

    /// Insert `child` into `parent` before `reference`.
    fn insert_before(&mut self, parent: Self::Handle, child: Self::Handle, reference: Self::Handle);

    /// Insert text at the end of `parent` or before `before`, merging with a
    /// text node immediately preceding that position.
    fn insert_text(&mut self, parent: Self::Handle, text: &str, before: Option<Self::Handle>);

    /// Associate a template element with its contents fragment.
    fn set_template_content(&mut self, template: Self::Handle, content: Self::Handle);

    /// The contents fragment of a template element.
    fn template_content(&self, template: Self::Handle) -> Option<Self::Handle>;

    /// Append a DocumentType node to `document`.
    fn set_document_type(
        &mut self,
        document: Self::Handle,
        name: &str,
        public_id: &str,
        system_id: &str,
    );

    /// Record the document mode.
    fn set_quirks_mode(&mut self, mode: QuirksMode);

    /// Remove a node from its parent, if it has one.
    fn detach(&mut self, node: Self::Handle);

    /// Add each attribute the element does not already have.
    fn adopt_attributes(&mut self, element: Self::Handle, attributes: &[Attribute]);

    /// The local name of an element.
    fn tag_name(&self, element: Self::Handle) -> Option<&str>;

    /// The namespace of an element.
    fn namespace(&self, element: Self::Handle) -> Option<Namespace>;

    /// The parent of a node.
    fn parent(&self, node: Self::Handle) -> Option<Self::Handle>;

    /// Move every child of `from` to the end of `to`.
    fn reparent_children(&mut self, from: Self::Handle, to: Self::Handle);
}

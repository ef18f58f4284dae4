//! [`TreeSink`] for the arena [`DomTree`].

use lark_dom::{DocumentTypeData, DomTree, ElementData, Namespace, NodeId, NodeType, QuirksMode};

use super::tree_sink::TreeSink;
use crate::tokenizer::Attribute;

impl TreeSink for DomTree {
    type Handle = NodeId;

    fn document(&self) -> NodeId {
        self.root()
    }

    fn create_document_fragment(&mut self) -> NodeId {
        self.alloc(NodeType::DocumentFragment)
    }

    fn create_element(&mut self, name: &str, namespace: Namespace, attributes: &[Attribute]) -> NodeId {
        let mut data = ElementData::new(name, namespace);
        data.attrs = attributes.to_vec();
        self.alloc(NodeType::Element(data))
    }

    fn create_comment(&mut self, data: &str) -> NodeId {
        self.alloc(NodeType::Comment(data.to_string()))
    }

    fn create_text(&mut self, data: &str) -> NodeId {
        self.alloc(NodeType::Text(data.to_string()))
    }

    fn append_child(&mut self, parent: NodeId, child: NodeId) {
        Self::append_child(self, parent, child);
    }

    fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        Self::insert_before(self, parent, child, reference);
    }

    fn insert_text(&mut self, parent: NodeId, text: &str, before: Option<NodeId>) {
        Self::insert_text(self, parent, text, before);
    }

    fn set_template_content(&mut self, template: NodeId, content: NodeId) {
        if let Some(element) = self.as_element_mut(template) {
            element.template_contents = Some(content);
        }
    }

    fn template_content(&self, template: NodeId) -> Option<NodeId> {
        self.template_contents(template)
    }

    fn set_document_type(&mut self, document: NodeId, name: &str, public_id: &str, system_id: &str) {
        let doctype = self.alloc(NodeType::DocumentType(DocumentTypeData::new(
            name, public_id, system_id,
        )));
        Self::append_child(self, document, doctype);
    }

    fn set_quirks_mode(&mut self, mode: QuirksMode) {
        Self::set_quirks_mode(self, mode);
    }

    fn detach(&mut self, node: NodeId) {
        Self::detach(self, node);
    }

    fn adopt_attributes(&mut self, element: NodeId, attributes: &[Attribute]) {
        let Some(data) = self.as_element_mut(element) else {
            return;
        };
        for attr in attributes {
            if !data.attrs.iter().any(|existing| existing.same_name(attr)) {
                data.attrs.push(attr.clone());
            }
        }
    }

    fn tag_name(&self, element: NodeId) -> Option<&str> {
        self.as_element(element).map(|data| data.tag_name.as_str())
    }

    fn namespace(&self, element: NodeId) -> Option<Namespace> {
        self.as_element(element).map(|data| data.namespace)
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Self::parent(self, node)
    }

    fn reparent_children(&mut self, from: NodeId, to: NodeId) {
        self.move_children(from, to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adopt_attributes_keeps_existing_values() {
        let mut tree = DomTree::new();
        let html = TreeSink::create_element(
            &mut tree,
            "html",
            Namespace::Html,
            &[Attribute::new("lang", "en")],
        );
        tree.adopt_attributes(
            html,
            &[Attribute::new("lang", "fr"), Attribute::new("dir", "ltr")],
        );
        let data = tree.as_element(html).map(|d| d.attrs.clone()).unwrap_or_default();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].value, "en");
        assert_eq!(data[1].name, "dir");
    }

    #[test]
    fn test_document_type_is_appended_to_document() {
        let mut tree = DomTree::new();
        let document = TreeSink::document(&tree);
        tree.set_document_type(document, "html", "", "");
        assert_eq!(tree.to_test_format(document), "| <!DOCTYPE html>\n");
    }

    #[test]
    fn test_create_text_and_template_content() {
        let mut tree = DomTree::new();
        let template = TreeSink::create_element(&mut tree, "template", Namespace::Html, &[]);
        let contents = tree.create_document_fragment();
        tree.set_template_content(template, contents);
        let text = tree.create_text("x");
        TreeSink::append_child(&mut tree, contents, text);
        assert_eq!(TreeSink::template_content(&tree, template), Some(contents));
        assert_eq!(tree.as_text(text), Some("x"));
    }
}

//! Tests for DOM tree mutation methods: remove_child, insert_before,
//! move_children, insert_text, and the html5lib dump.

use lark_dom::{Attribute, DocumentTypeData, DomTree, ElementData, Namespace, NodeId, NodeType};

/// Helper to create an HTML element node and return its NodeId.
fn alloc_element(tree: &mut DomTree, tag: &str) -> NodeId {
    tree.alloc(NodeType::Element(ElementData::new(tag, Namespace::Html)))
}

// ========== remove_child ==========

#[test]
fn test_remove_child_single_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let child = alloc_element(&mut tree, "p");
    tree.append_child(parent, child);
    assert_eq!(tree.children(parent).len(), 1);

    tree.remove_child(parent, child);

    assert!(tree.children(parent).is_empty());
    assert_eq!(tree.parent(child), None);
    assert_eq!(tree.prev_sibling(child), None);
    assert_eq!(tree.next_sibling(child), None);
}

#[test]
fn test_remove_child_middle_of_three() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, b);
    tree.append_child(parent, c);

    tree.remove_child(parent, b);

    assert_eq!(tree.children(parent), &[a, c]);
    assert_eq!(tree.next_sibling(a), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(a));
}

#[test]
fn test_remove_child_not_a_child_is_noop() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    let stranger = alloc_element(&mut tree, "span");
    tree.append_child(NodeId::ROOT, parent);

    tree.remove_child(parent, stranger);
    assert!(tree.children(parent).is_empty());
}

// ========== append_child ==========

#[test]
fn test_append_child_reparents() {
    let mut tree = DomTree::new();
    let first = alloc_element(&mut tree, "div");
    let second = alloc_element(&mut tree, "div");
    let child = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, first);
    tree.append_child(NodeId::ROOT, second);
    tree.append_child(first, child);

    tree.append_child(second, child);

    assert!(tree.children(first).is_empty());
    assert_eq!(tree.children(second), &[child]);
    assert_eq!(tree.parent(child), Some(second));
}

// ========== insert_before ==========

#[test]
fn test_insert_before_first_child() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let existing = alloc_element(&mut tree, "span");
    tree.append_child(parent, existing);

    let new_child = alloc_element(&mut tree, "p");
    tree.insert_before(parent, new_child, existing);

    assert_eq!(tree.children(parent), &[new_child, existing]);
    assert_eq!(tree.parent(new_child), Some(parent));
    assert_eq!(tree.next_sibling(new_child), Some(existing));
    assert_eq!(tree.prev_sibling(new_child), None);
    assert_eq!(tree.prev_sibling(existing), Some(new_child));
}

#[test]
fn test_insert_before_middle() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);

    let a = alloc_element(&mut tree, "a");
    let b = alloc_element(&mut tree, "b");
    let c = alloc_element(&mut tree, "c");
    tree.append_child(parent, a);
    tree.append_child(parent, c);

    tree.insert_before(parent, b, c);

    assert_eq!(tree.children(parent), &[a, b, c]);
    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.prev_sibling(b), Some(a));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.prev_sibling(c), Some(b));
}

// ========== move_children ==========

#[test]
fn test_move_children_appends_to_existing() {
    let mut tree = DomTree::new();
    let from = alloc_element(&mut tree, "div");
    let to = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, from);
    tree.append_child(NodeId::ROOT, to);

    let existing = alloc_element(&mut tree, "span");
    tree.append_child(to, existing);
    let moved = alloc_element(&mut tree, "p");
    let moved_too = alloc_element(&mut tree, "p");
    tree.append_child(from, moved);
    tree.append_child(from, moved_too);

    tree.move_children(from, to);

    assert!(tree.children(from).is_empty());
    assert_eq!(tree.children(to), &[existing, moved, moved_too]);
    assert_eq!(tree.parent(moved), Some(to));
    assert_eq!(tree.next_sibling(existing), Some(moved));
    assert_eq!(tree.prev_sibling(moved_too), Some(moved));
}

// ========== insert_text ==========

#[test]
fn test_insert_text_merges_with_previous_text() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "p");
    tree.append_child(NodeId::ROOT, parent);

    tree.insert_text(parent, "a", None);
    tree.insert_text(parent, "b", None);

    assert_eq!(tree.children(parent).len(), 1);
    assert_eq!(tree.text_content(parent), "ab");
}

#[test]
fn test_insert_text_before_reference() {
    let mut tree = DomTree::new();
    let parent = alloc_element(&mut tree, "div");
    tree.append_child(NodeId::ROOT, parent);
    let table = alloc_element(&mut tree, "table");
    tree.append_child(parent, table);

    tree.insert_text(parent, "x", Some(table));
    tree.insert_text(parent, "y", Some(table));

    let children = tree.children(parent);
    assert_eq!(children.len(), 2);
    assert_eq!(tree.as_text(children[0]), Some("xy"));
    assert_eq!(children[1], table);
}

// ========== test format ==========

#[test]
fn test_dump_namespaces_and_sorted_attributes() {
    let mut tree = DomTree::new();
    let doctype = tree.alloc(NodeType::DocumentType(DocumentTypeData::new("html", "", "")));
    tree.append_child(NodeId::ROOT, doctype);

    let html = alloc_element(&mut tree, "html");
    tree.append_child(NodeId::ROOT, html);

    let mut svg = ElementData::new("svg", Namespace::Svg);
    svg.attrs.push(Attribute::new("viewBox", "0 0 1 1"));
    svg.attrs.push(Attribute {
        name: "href".to_string(),
        value: "#a".to_string(),
        prefix: Some("xlink"),
        namespace: Some(Namespace::XLink),
    });
    svg.attrs.push(Attribute::new("class", "c"));
    let svg = tree.alloc(NodeType::Element(svg));
    tree.append_child(html, svg);
    tree.insert_text(html, "t", None);
    let comment = tree.alloc(NodeType::Comment(" note ".to_string()));
    tree.append_child(html, comment);

    let expected = "\
| <!DOCTYPE html>
| <html>
|   <svg svg>
|     class=\"c\"
|     viewBox=\"0 0 1 1\"
|     xlink href=\"#a\"
|   \"t\"
|   <!--  note  -->
";
    assert_eq!(tree.to_test_format(NodeId::ROOT), expected);
}

#[test]
fn test_dump_template_contents() {
    let mut tree = DomTree::new();
    let template = alloc_element(&mut tree, "template");
    tree.append_child(NodeId::ROOT, template);
    let contents = tree.alloc(NodeType::DocumentFragment);
    if let Some(data) = tree.as_element_mut(template) {
        data.template_contents = Some(contents);
    }
    let div = alloc_element(&mut tree, "div");
    tree.append_child(contents, div);

    let expected = "\
| <template>
|   content
|     <div>
";
    assert_eq!(tree.to_test_format(NodeId::ROOT), expected);
}

#[test]
fn test_body_and_head_lookup() {
    let mut tree = DomTree::new();
    let html = alloc_element(&mut tree, "html");
    let head = alloc_element(&mut tree, "head");
    let body = alloc_element(&mut tree, "body");
    tree.append_child(NodeId::ROOT, html);
    tree.append_child(html, head);
    tree.append_child(html, body);

    assert_eq!(tree.document_element(), Some(html));
    assert_eq!(tree.head(), Some(head));
    assert_eq!(tree.body(), Some(body));
    assert!(tree.is_descendant_of(body, NodeId::ROOT));
}

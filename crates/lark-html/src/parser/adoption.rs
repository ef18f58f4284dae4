//! Mis-nested formatting: reconstruction, the adoption agency algorithm and
//! the "any other end tag" steps of "in body".

use lark_dom::Namespace;

use super::core::TreeBuilder;
use super::formatting::FormattingEntry;
use super::open_elements::StackEntry;
use super::tree_sink::TreeSink;
use crate::error::ParseErrorCode;

/// Where the new formatting element goes in the list once the outer loop
/// iteration is done.
#[derive(Debug, Clone, Copy)]
enum Bookmark<H> {
    /// In place of the old formatting element.
    Replace(H),
    /// Right after this element.
    InsertAfter(H),
}

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    pub(super) fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this
        //          algorithm."
        // STEP 2: "If the last (most recently added) entry in the list of
        //          active formatting elements is a marker, or if it is an
        //          element that is in the stack of open elements, then there
        //          is nothing to reconstruct; stop this algorithm."
        match self.formatting.last() {
            None | Some(FormattingEntry::Marker) => return,
            Some(FormattingEntry::Element { handle, .. }) if self.open.contains(*handle) => return,
            Some(FormattingEntry::Element { .. }) => {}
        }

        // STEP 3-6 (Rewind): "If there are no entries before entry in the
        //          list of active formatting elements, then jump to the step
        //          labeled create. Let entry be the entry one earlier than
        //          entry in the list of active formatting elements. If entry
        //          is neither a marker nor an element that is also in the
        //          stack of open elements, go to the step labeled rewind."
        let mut index = self.formatting.len() - 1;
        while index > 0 {
            let earlier = index - 1;
            match self.formatting.get(earlier) {
                Some(FormattingEntry::Marker) => break,
                Some(FormattingEntry::Element { handle, .. }) if self.open.contains(*handle) => {
                    break;
                }
                _ => index = earlier,
            }
        }

        // STEP 7-10 (Create): "Insert an HTML element for the token for which
        //          the element entry was created, to obtain new element.
        //          Replace the entry for entry in the list with an entry for
        //          new element. If the entry for new element in the list of
        //          active formatting elements is not the last entry in the
        //          list, return to the step labeled advance."
        for position in index..self.formatting.len() {
            let Some(FormattingEntry::Element { token, .. }) = self.formatting.get(position) else {
                continue;
            };
            let token = token.clone();
            let handle = self.insert_html_element(&token);
            self.formatting
                .replace(position, FormattingEntry::Element { handle, token });
        }
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Returns `true` when the caller must "act as described in the "any
    /// other end tag" entry" instead.
    pub(super) fn run_adoption_agency(&mut self, subject: &str) -> bool {
        // STEP 2: "If the current node is an HTML element whose tag name is
        //          subject, and the current node is not in the list of active
        //          formatting elements, then pop the current node off the
        //          stack of open elements and return."
        if let Some(current) = self.open.current()
            && current.is_html(subject)
            && !self.formatting.contains(current.handle)
        {
            let _ = self.open.pop();
            return false;
        }

        // STEP 3-4: "Let outer loop counter be 0. Outer loop: If outer loop
        //          counter is greater than or equal to 8, then return."
        for _ in 0..8 {
            // STEP 4.3: "Let formatting element be the last element in the
            //           list of active formatting elements that: is between
            //           the end of the list and the last marker in the list,
            //           if any, or the start of the list otherwise, and has
            //           the tag name subject. If there is no such element,
            //           then return and instead act as described in the "any
            //           other end tag" entry above."
            let Some((_, formatting_element)) = self.formatting.last_element_named(subject) else {
                return true;
            };

            // STEP 4.4: "If formatting element is not in the stack of open
            //           elements, then this is a parse error; remove the
            //           element from the list, and return."
            let Some(formatting_index) = self.open.position(formatting_element) else {
                self.error(ParseErrorCode::MisnestedTag);
                self.formatting.remove(formatting_element);
                return false;
            };

            // STEP 4.5: "If formatting element is in the stack of open
            //           elements, but the element is not in scope, then this
            //           is a parse error; return."
            if !self.open.has_handle_in_scope(formatting_element) {
                self.error(ParseErrorCode::MisnestedTag);
                return false;
            }

            // STEP 4.6: "If formatting element is not the current node, this
            //           is a parse error. (But do not return.)"
            if self
                .open
                .current()
                .is_some_and(|current| current.handle != formatting_element)
            {
                self.error(ParseErrorCode::MisnestedTag);
            }

            // STEP 4.7: "Let furthest block be the topmost node in the stack
            //           of open elements that is lower in the stack than
            //           formatting element, and is an element in the special
            //           category. There might not be one."
            let furthest_index = (formatting_index + 1..self.open.len())
                .find(|&i| self.open.get(i).is_some_and(StackEntry::is_special));

            // STEP 4.8: "If there is no furthest block, then the UA must first
            //           pop all the nodes from the bottom of the stack of open
            //           elements, from the current node up to and including
            //           formatting element, then remove formatting element
            //           from the list of active formatting elements, and
            //           finally return."
            let Some(furthest_index) = furthest_index else {
                self.open.truncate(formatting_index);
                self.formatting.remove(formatting_element);
                return false;
            };
            let Some(furthest_block) = self.open.get(furthest_index).map(|e| e.handle) else {
                return false;
            };

            // STEP 4.9: "Let common ancestor be the element immediately above
            //           formatting element in the stack of open elements."
            let Some(common_ancestor) = formatting_index
                .checked_sub(1)
                .and_then(|i| self.open.get(i))
                .map(|e| e.handle)
            else {
                return false;
            };

            // STEP 4.10: "Let a bookmark note the position of formatting
            //            element in the list of active formatting elements
            //            relative to the elements on either side of it in the
            //            list."
            let mut bookmark = Bookmark::Replace(formatting_element);

            // STEP 4.11: "Let node and last node be furthest block."
            let mut node_index = furthest_index;
            let mut last_node = furthest_block;

            // STEP 4.13: Inner loop.
            let mut inner_loop_counter = 0;
            loop {
                inner_loop_counter += 1;

                // STEP 4.13.2: "Let node be the element immediately above node
                //              in the stack of open elements, or if node is no
                //              longer in the stack of open elements (e.g.
                //              because it got removed by this algorithm), the
                //              element that was immediately above node in the
                //              stack of open elements before node was removed."
                let Some(above) = node_index.checked_sub(1) else {
                    break;
                };
                node_index = above;
                let Some(node) = self.open.get(node_index).map(|e| e.handle) else {
                    break;
                };

                // STEP 4.13.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 4.13.4: "If inner loop counter is greater than 3 and
                //              node is in the list of active formatting
                //              elements, then remove node from the list of
                //              active formatting elements."
                if inner_loop_counter > 3 {
                    self.formatting.remove(node);
                }

                // STEP 4.13.5: "If node is not in the list of active
                //              formatting elements, then remove node from the
                //              stack of open elements and continue."
                let Some(token) = self.formatting.token_for(node).cloned() else {
                    let _ = self.open.remove(node);
                    continue;
                };

                // STEP 4.13.6: "Create an element for the token for which the
                //              element node was created, in the HTML
                //              namespace, with common ancestor as the intended
                //              parent; replace the entry for node in the list
                //              of active formatting elements with an entry for
                //              the new element, replace the entry for node in
                //              the stack of open elements with an entry for
                //              the new element, and let node be the new
                //              element."
                let new_node = self.create_element_for_token(&token);
                let name = token.tag_name().unwrap_or_default().to_string();
                if let Some(position) = self.formatting.position(node) {
                    self.formatting.replace(
                        position,
                        FormattingEntry::Element {
                            handle: new_node,
                            token,
                        },
                    );
                }
                self.open.replace(node_index, html_entry(new_node, name));

                // STEP 4.13.7: "If last node is furthest block, then move the
                //              aforementioned bookmark to be immediately after
                //              the new node in the list of active formatting
                //              elements."
                if last_node == furthest_block {
                    bookmark = Bookmark::InsertAfter(new_node);
                }

                // STEP 4.13.8: "Append last node to node."
                self.sink.append_child(new_node, last_node);

                // STEP 4.13.9: "Set last node to node."
                last_node = new_node;
            }

            // STEP 4.14: "Insert whatever last node ended up being in the
            //            previous step at the appropriate place for inserting
            //            a node, but using common ancestor as the override
            //            target."
            let (parent, before) = self.appropriate_place(Some(common_ancestor));
            self.insert_at(parent, before, last_node);

            // STEP 4.15: "Create an element for the token for which
            //            formatting element was created, in the HTML
            //            namespace, with furthest block as the intended
            //            parent."
            let Some(token) = self.formatting.token_for(formatting_element).cloned() else {
                return false;
            };
            let new_element = self.create_element_for_token(&token);
            let name = token.tag_name().unwrap_or_default().to_string();

            // STEP 4.16: "Take all of the child nodes of furthest block and
            //            append them to the element created in the last step."
            self.sink.reparent_children(furthest_block, new_element);

            // STEP 4.17: "Append that new element to furthest block."
            self.sink.append_child(furthest_block, new_element);

            // STEP 4.18: "Remove formatting element from the list of active
            //            formatting elements, and insert the new element into
            //            the list of active formatting elements at the
            //            position of the aforementioned bookmark."
            let entry = FormattingEntry::Element {
                handle: new_element,
                token,
            };
            match bookmark {
                Bookmark::Replace(old) => {
                    if let Some(position) = self.formatting.position(old) {
                        self.formatting.replace(position, entry);
                    }
                }
                Bookmark::InsertAfter(previous) => {
                    self.formatting.remove(formatting_element);
                    let position = self
                        .formatting
                        .position(previous)
                        .map_or(self.formatting.len(), |i| i + 1);
                    self.formatting.insert(position, entry);
                }
            }

            // STEP 4.19: "Remove formatting element from the stack of open
            //            elements, and insert the new element into the stack
            //            of open elements immediately below the position of
            //            furthest block in that stack."
            let _ = self.open.remove(formatting_element);
            if let Some(position) = self.open.position(furthest_block) {
                self.open.insert(position + 1, html_entry(new_element, name));
            }
        }
        false
    }

    /// [§ 13.2.6.4.7 Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    pub(super) fn any_other_end_tag(&mut self, name: &str) {
        // "Initialize node to be the current node (the bottommost node of the
        // stack)."
        for index in (0..self.open.len()).rev() {
            let Some(node) = self.open.get(index) else {
                return;
            };

            // "Loop: If node is an HTML element with the same tag name as the
            // token, then: Generate implied end tags, except for HTML elements
            // with the same tag name as the token. If node is not the current
            // node, then this is a parse error. Pop all the nodes from the
            // current node up to node, including node, then stop these steps."
            if node.is_html(name) {
                self.generate_implied_end_tags(Some(name));
                if self.open.len() != index + 1 {
                    self.error(ParseErrorCode::UnclosedElements);
                }
                self.open.truncate(index);
                return;
            }

            // "Otherwise, if node is in the special category, then this is a
            // parse error; ignore the token, and return."
            if node.is_special() {
                self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                return;
            }
        }
    }
}

fn html_entry<H>(handle: H, name: String) -> StackEntry<H> {
    StackEntry {
        handle,
        name,
        namespace: Namespace::Html,
        html_integration_point: false,
    }
}

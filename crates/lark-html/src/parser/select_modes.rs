//! "in select" and "in select in table".

use super::core::{Step, TreeBuilder};
use super::open_elements::Scope;
use super::tree_sink::TreeSink;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

const TABLE_PARTS: &[&str] = &[
    "caption", "table", "tbody", "tfoot", "thead", "tr", "td", "th",
];

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    pub(super) fn handle_in_select_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::Character { data: '\0' } => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                Step::Done
            }
            Token::Character { data } => {
                self.insert_character(*data);
                Step::Done
            }
            Token::Comment { data } => {
                self.insert_comment(data, None);
                Step::Done
            }
            Token::Doctype { .. } => {
                self.error(ParseErrorCode::UnexpectedDoctype);
                Step::Done
            }

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.handle_in_body_mode(token),

                // "A start tag whose tag name is "option""
                // "If the current node is an option element, pop that node
                // from the stack of open elements. Insert an HTML element for
                // the token."
                "option" => {
                    self.pop_if_current("option");
                    let _ = self.insert_html_element(token);
                    Step::Done
                }

                // "A start tag whose tag name is "optgroup""
                "optgroup" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_html_element(token);
                    Step::Done
                }

                // "A start tag whose tag name is "hr""
                // "If the current node is an option element, pop that node
                // from the stack of open elements. If the current node is an
                // optgroup element, pop that node from the stack of open
                // elements. Insert an HTML element for the token. Immediately
                // pop the current node off the stack of open elements.
                // Acknowledge the token's self-closing flag, if it is set."
                "hr" => {
                    self.pop_if_current("option");
                    self.pop_if_current("optgroup");
                    let _ = self.insert_html_element(token);
                    let _ = self.open.pop();
                    self.acknowledge_self_closing();
                    Step::Done
                }

                // "A start tag whose tag name is "select""
                // "Parse error. If the stack of open elements does not have a
                // select element in select scope, ignore the token. (fragment
                // case) Otherwise: Pop elements from the stack of open elements
                // until a select element has been popped from the stack. Reset
                // the insertion mode appropriately."
                "select" => {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    let _ = self.close_select();
                    Step::Done
                }

                // "A start tag whose tag name is one of: "input", "keygen", "textarea""
                // As above, then "Reprocess the token."
                "input" | "keygen" | "textarea" => {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    if self.close_select() {
                        Step::Reprocess(self.mode)
                    } else {
                        Step::Done
                    }
                }

                // "A start tag whose tag name is one of: "script", "template""
                "script" | "template" => self.handle_in_head_mode(token),

                _ => {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    Step::Done
                }
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "optgroup""
                "optgroup" => {
                    // "First, if the current node is an option element, and
                    // the node immediately before it in the stack of open
                    // elements is an optgroup element, then pop the current
                    // node from the stack of open elements."
                    let len = self.open.len();
                    if self.open.current_is("option")
                        && len >= 2
                        && self
                            .open
                            .get(len - 2)
                            .is_some_and(|entry| entry.is_html("optgroup"))
                    {
                        let _ = self.open.pop();
                    }
                    // "If the current node is an optgroup element, then pop
                    // that node from the stack of open elements. Otherwise,
                    // this is a parse error; ignore the token."
                    if self.open.current_is("optgroup") {
                        let _ = self.open.pop();
                    } else {
                        self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    }
                    Step::Done
                }

                // "An end tag whose tag name is "option""
                "option" => {
                    if self.open.current_is("option") {
                        let _ = self.open.pop();
                    } else {
                        self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    }
                    Step::Done
                }

                // "An end tag whose tag name is "select""
                "select" => {
                    if !self.close_select() {
                        self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    }
                    Step::Done
                }

                "template" => self.handle_in_head_mode(token),

                _ => {
                    self.error(ParseErrorCode::UnexpectedEndTag);
                    Step::Done
                }
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.handle_in_body_mode(token),
        }
    }

    fn pop_if_current(&mut self, name: &str) {
        if self.open.current_is(name) {
            let _ = self.open.pop();
        }
    }

    /// Pop through the `select` element and reset the insertion mode. Does
    /// nothing and returns `false` when no select is in select scope.
    fn close_select(&mut self) -> bool {
        if !self.in_scope(Scope::Select, "select") {
            return false;
        }
        self.open.pop_until("select");
        self.reset_insertion_mode_appropriately();
        true
    }

    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    pub(super) fn handle_in_select_in_table_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A start tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            // "Parse error. Pop elements from the stack of open elements until
            // a select element has been popped from the stack. Reset the
            // insertion mode appropriately. Reprocess the token."
            Token::StartTag { name, .. } if TABLE_PARTS.contains(&name.as_str()) => {
                self.error(ParseErrorCode::UnexpectedStartTag);
                self.open.pop_until("select");
                self.reset_insertion_mode_appropriately();
                Step::Reprocess(self.mode)
            }

            // "An end tag whose tag name is one of: "caption", "table",
            // "tbody", "tfoot", "thead", "tr", "td", "th""
            Token::EndTag { name, .. } if TABLE_PARTS.contains(&name.as_str()) => {
                self.error(ParseErrorCode::UnexpectedEndTag);
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name
                // as that of the token, then ignore the token."
                if !self.in_scope(Scope::Table, name) {
                    return Step::Done;
                }
                self.open.pop_until("select");
                self.reset_insertion_mode_appropriately();
                Step::Reprocess(self.mode)
            }

            // "Anything else"
            // "Process the token using the rules for the "in select" insertion mode."
            _ => self.handle_in_select_mode(token),
        }
    }
}

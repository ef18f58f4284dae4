//! The table insertion modes: "in table" through "in cell".

use super::core::{InsertionMode, Step, TreeBuilder};
use super::open_elements::Scope;
use super::tree_sink::TreeSink;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

/// "Clear the stack back to a table context"
const TABLE_CONTEXT: &[&str] = &["table", "template", "html"];
/// "Clear the stack back to a table body context"
const TABLE_BODY_CONTEXT: &[&str] = &["tbody", "tfoot", "thead", "template", "html"];
/// "Clear the stack back to a table row context"
const TABLE_ROW_CONTEXT: &[&str] = &["tr", "template", "html"];

const TABLE_SECTIONS: &[&str] = &["tbody", "tfoot", "thead"];

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    pub(super) fn handle_in_table_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token, if the current node is table, tbody,
            // template, tfoot, thead, or tr element"
            // "Let the pending table character tokens be an empty list of
            // tokens. Set the original insertion mode to the current insertion
            // mode. Switch the insertion mode to "in table text" and reprocess
            // the token."
            Token::Character { .. }
                if self
                    .open
                    .current_is_one_of(&["table", "tbody", "template", "tfoot", "thead", "tr"]) =>
            {
                self.pending_table_text.clear();
                self.original_mode = self.mode;
                Step::Reprocess(InsertionMode::InTableText)
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
                // "A start tag whose tag name is "caption""
                // "Clear the stack back to a table context. Insert a marker at
                // the end of the list of active formatting elements. Insert an
                // HTML element for the token, then switch the insertion mode
                // to "in caption"."
                "caption" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    self.formatting.push_marker();
                    let _ = self.insert_html_element(token);
                    self.mode = InsertionMode::InCaption;
                    Step::Done
                }

                // "A start tag whose tag name is "colgroup""
                "colgroup" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.mode = InsertionMode::InColumnGroup;
                    Step::Done
                }

                // "A start tag whose tag name is "col""
                // "Clear the stack back to a table context. Insert an HTML
                // element for a "colgroup" start tag token with no attributes,
                // then switch the insertion mode to "in column group".
                // Reprocess the current token."
                "col" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_phantom("colgroup");
                    Step::Reprocess(InsertionMode::InColumnGroup)
                }

                // "A start tag whose tag name is one of: "tbody", "tfoot", "thead""
                "tbody" | "tfoot" | "thead" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.mode = InsertionMode::InTableBody;
                    Step::Done
                }

                // "A start tag whose tag name is one of: "td", "th", "tr""
                "td" | "th" | "tr" => {
                    self.clear_stack_back_to(TABLE_CONTEXT);
                    let _ = self.insert_phantom("tbody");
                    Step::Reprocess(InsertionMode::InTableBody)
                }

                // "A start tag whose tag name is "table""
                "table" => {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    // "If the stack of open elements does not have a table
                    // element in table scope, ignore the token."
                    if !self.in_scope(Scope::Table, "table") {
                        return Step::Done;
                    }
                    // "Otherwise: Pop elements from this stack until a table
                    // element has been popped from the stack. Reset the
                    // insertion mode appropriately. Reprocess the token."
                    self.open.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    Step::Reprocess(self.mode)
                }

                // "A start tag whose tag name is one of: "style", "script", "template""
                "style" | "script" | "template" => self.handle_in_head_mode(token),

                // "A start tag whose tag name is "input""
                "input"
                    if token
                        .attribute("type")
                        .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden")) =>
                {
                    // "Parse error. Insert an HTML element for the token. Pop
                    // that input element off the stack of open elements.
                    // Acknowledge the token's self-closing flag, if it is set."
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    let _ = self.insert_html_element(token);
                    let _ = self.open.pop();
                    self.acknowledge_self_closing();
                    Step::Done
                }

                // "A start tag whose tag name is "form""
                "form" => {
                    self.error(ParseErrorCode::MisnestedForm);
                    // "If there is a template element on the stack of open
                    // elements, or if the form element pointer is not null,
                    // ignore the token."
                    if self.open.contains_html("template") || self.form.is_some() {
                        return Step::Done;
                    }
                    // "Insert an HTML element for the token, and set the form
                    // element pointer to point to the element created. Pop
                    // that form element off the stack of open elements."
                    let form = self.insert_html_element(token);
                    self.form = Some(form);
                    let _ = self.open.pop();
                    Step::Done
                }

                _ => self.in_table_anything_else(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "table""
                "table" => {
                    if !self.in_scope(Scope::Table, "table") {
                        self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                        return Step::Done;
                    }
                    self.open.pop_until("table");
                    self.reset_insertion_mode_appropriately();
                    Step::Done
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "tbody", "td", "tfoot", "th",
                // "thead", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                | "th" | "thead" | "tr" => {
                    self.error(ParseErrorCode::UnexpectedEndTag);
                    Step::Done
                }

                "template" => self.handle_in_head_mode(token),

                _ => self.in_table_anything_else(token),
            },

            // "An end-of-file token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::EndOfFile => self.handle_in_body_mode(token),

            Token::Character { .. } => self.in_table_anything_else(token),
        }
    }

    /// "Parse error. Enable foster parenting, process the token using the
    /// rules for the "in body" insertion mode, and then disable foster
    /// parenting."
    fn in_table_anything_else(&mut self, token: &Token) -> Step {
        self.error(match token {
            Token::Character { .. } => ParseErrorCode::FosterParentedCharacter,
            Token::EndTag { .. } => ParseErrorCode::UnexpectedEndTag,
            _ => ParseErrorCode::UnexpectedStartTag,
        });
        self.foster_parenting = true;
        let step = self.handle_in_body_mode(token);
        self.foster_parenting = false;
        step
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pub(super) fn handle_in_table_text_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                Step::Done
            }

            // "Any other character token"
            // "Append the character token to the pending table character
            // tokens list."
            Token::Character { data } => {
                self.pending_table_text.push(*data);
                Step::Done
            }

            // "Anything else"
            _ => {
                let pending = std::mem::take(&mut self.pending_table_text);
                if pending.chars().any(|c| !Self::is_whitespace(c)) {
                    // "If any of the tokens in the pending table character
                    // tokens list are character tokens that are not ASCII
                    // whitespace, then this is a parse error: reprocess the
                    // character tokens in the pending table character tokens
                    // list using the rules given in the "anything else" entry
                    // in the "in table" insertion mode."
                    self.error(ParseErrorCode::FosterParentedCharacter);
                    self.foster_parenting = true;
                    for c in pending.chars() {
                        let _ = self.handle_in_body_mode(&Token::new_character(c));
                    }
                    self.foster_parenting = false;
                } else {
                    // "Otherwise, insert the characters given by the pending
                    // table character tokens list."
                    self.insert_characters(&pending);
                }
                // "Switch the insertion mode to the original insertion mode
                // and reprocess the token."
                Step::Reprocess(self.original_mode)
            }
        }
    }

    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    pub(super) fn handle_in_caption_mode(&mut self, token: &Token) -> Step {
        match token {
            // "An end tag whose tag name is "caption""
            Token::EndTag { name, .. } if name == "caption" => {
                let _ = self.close_caption();
                Step::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "An end tag whose tag name is "table""
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                self.close_caption_and_reprocess()
            }
            Token::EndTag { name, .. } if name == "table" => self.close_caption_and_reprocess(),

            // "An end tag whose tag name is one of: "body", "col", "colgroup",
            // "html", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot" | "th"
                        | "thead" | "tr"
                ) =>
            {
                self.error(ParseErrorCode::UnexpectedEndTag);
                Step::Done
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.handle_in_body_mode(token),
        }
    }

    /// "If the stack of open elements does not have a caption element in
    /// table scope, this is a parse error; ignore the token. (fragment case)
    /// Otherwise: Generate implied end tags. Now, if the current node is not
    /// a caption element, then this is a parse error. Pop elements from this
    /// stack until a caption element has been popped from the stack. Clear
    /// the list of active formatting elements up to the last marker. Switch
    /// the insertion mode to "in table"."
    fn close_caption(&mut self) -> bool {
        if !self.in_scope(Scope::Table, "caption") {
            self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
            return false;
        }
        self.generate_implied_end_tags(None);
        if !self.open.current_is("caption") {
            self.error(ParseErrorCode::UnclosedElements);
        }
        self.open.pop_until("caption");
        self.formatting.clear_to_last_marker();
        self.mode = InsertionMode::InTable;
        true
    }

    fn close_caption_and_reprocess(&mut self) -> Step {
        if self.close_caption() {
            Step::Reprocess(InsertionMode::InTable)
        } else {
            Step::Done
        }
    }

    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    pub(super) fn handle_in_column_group_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => {
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
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "col""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements. Acknowledge the
            // token's self-closing flag, if it is set."
            Token::StartTag { name, .. } if name == "col" => {
                let _ = self.insert_html_element(token);
                let _ = self.open.pop();
                self.acknowledge_self_closing();
                Step::Done
            }

            // "An end tag whose tag name is "colgroup""
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token. Otherwise, pop the current node
            // from the stack of open elements. Switch the insertion mode to
            // "in table"."
            Token::EndTag { name, .. } if name == "colgroup" => {
                if self.open.current_is("colgroup") {
                    let _ = self.open.pop();
                    self.mode = InsertionMode::InTable;
                } else {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                }
                Step::Done
            }

            // "An end tag whose tag name is "col""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if name == "col" => {
                self.error(ParseErrorCode::UnexpectedEndTag);
                Step::Done
            }

            Token::StartTag { name, .. } | Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token)
            }

            Token::EndOfFile => self.handle_in_body_mode(token),

            // "Anything else"
            // "If the current node is not a colgroup element, then this is a
            // parse error; ignore the token. Otherwise, pop the current node
            // from the stack of open elements. Switch the insertion mode to
            // "in table". Reprocess the token."
            _ => {
                if !self.open.current_is("colgroup") {
                    self.error(ParseErrorCode::UnexpectedCharacter);
                    return Step::Done;
                }
                let _ = self.open.pop();
                Step::Reprocess(InsertionMode::InTable)
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    pub(super) fn handle_in_table_body_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "tr""
                // "Clear the stack back to a table body context. Insert an
                // HTML element for the token, then switch the insertion mode
                // to "in row"."
                "tr" => {
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.mode = InsertionMode::InRow;
                    Step::Done
                }

                // "A start tag whose tag name is one of: "th", "td""
                // "Parse error. Clear the stack back to a table body context.
                // Insert an HTML element for a "tr" start tag token with no
                // attributes, then switch the insertion mode to "in row".
                // Reprocess the current token."
                "th" | "td" => {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.insert_phantom("tr");
                    Step::Reprocess(InsertionMode::InRow)
                }

                // "A start tag whose tag name is one of: "caption", "col",
                // "colgroup", "tbody", "tfoot", "thead""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.close_table_section_and_reprocess()
                }

                _ => self.handle_in_table_mode(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                "tbody" | "tfoot" | "thead" => {
                    // "If the stack of open elements does not have an element
                    // in table scope that is an HTML element with the same tag
                    // name as the token, this is a parse error; ignore the
                    // token."
                    if !self.in_scope(Scope::Table, name) {
                        self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                        return Step::Done;
                    }
                    // "Otherwise: Clear the stack back to a table body
                    // context. Pop the current node from the stack of open
                    // elements. Switch the insertion mode to "in table"."
                    self.clear_stack_back_to(TABLE_BODY_CONTEXT);
                    let _ = self.open.pop();
                    self.mode = InsertionMode::InTable;
                    Step::Done
                }

                // "An end tag whose tag name is "table""
                "table" => self.close_table_section_and_reprocess(),

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "td", "th", "tr""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr" => {
                    self.error(ParseErrorCode::UnexpectedEndTag);
                    Step::Done
                }

                _ => self.handle_in_table_mode(token),
            },

            // "Anything else"
            // "Process the token using the rules for the "in table" insertion mode."
            _ => self.handle_in_table_mode(token),
        }
    }

    /// "If the stack of open elements does not have a tbody, thead, or tfoot
    /// element in table scope, this is a parse error; ignore the token.
    /// Otherwise: Clear the stack back to a table body context. Pop the
    /// current node from the stack of open elements. Switch the insertion
    /// mode to "in table". Reprocess the token."
    fn close_table_section_and_reprocess(&mut self) -> Step {
        if !self.open.has_any_in_scope(Scope::Table, TABLE_SECTIONS) {
            self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
            return Step::Done;
        }
        self.clear_stack_back_to(TABLE_BODY_CONTEXT);
        let _ = self.open.pop();
        Step::Reprocess(InsertionMode::InTable)
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    pub(super) fn handle_in_row_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is one of: "th", "td""
                // "Clear the stack back to a table row context. Insert an HTML
                // element for the token, then switch the insertion mode to
                // "in cell". Insert a marker at the end of the list of active
                // formatting elements."
                "th" | "td" => {
                    self.clear_stack_back_to(TABLE_ROW_CONTEXT);
                    let _ = self.insert_html_element(token);
                    self.mode = InsertionMode::InCell;
                    self.formatting.push_marker();
                    Step::Done
                }

                // "A start tag whose tag name is one of: "caption", "col",
                // "colgroup", "tbody", "tfoot", "thead", "tr""
                "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr" => {
                    self.close_row_and_reprocess()
                }

                _ => self.handle_in_table_mode(token),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "tr""
                "tr" => {
                    let _ = self.close_row();
                    Step::Done
                }

                // "An end tag whose tag name is "table""
                "table" => self.close_row_and_reprocess(),

                // "An end tag whose tag name is one of: "tbody", "tfoot", "thead""
                "tbody" | "tfoot" | "thead" => {
                    // "If the stack of open elements does not have an element
                    // in table scope that is an HTML element with the same tag
                    // name as the token, this is a parse error; ignore the
                    // token."
                    if !self.in_scope(Scope::Table, name) {
                        self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                        return Step::Done;
                    }
                    // "If the stack of open elements does not have a tr
                    // element in table scope, ignore the token."
                    if !self.in_scope(Scope::Table, "tr") {
                        return Step::Done;
                    }
                    self.close_row_and_reprocess()
                }

                // "An end tag whose tag name is one of: "body", "caption",
                // "col", "colgroup", "html", "td", "th""
                // "Parse error. Ignore the token."
                "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" => {
                    self.error(ParseErrorCode::UnexpectedEndTag);
                    Step::Done
                }

                _ => self.handle_in_table_mode(token),
            },

            _ => self.handle_in_table_mode(token),
        }
    }

    /// "If the stack of open elements does not have a tr element in table
    /// scope, this is a parse error; ignore the token. Otherwise: Clear the
    /// stack back to a table row context. Pop the current node (which will
    /// be a tr element) from the stack of open elements. Switch the insertion
    /// mode to "in table body"."
    fn close_row(&mut self) -> bool {
        if !self.in_scope(Scope::Table, "tr") {
            self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
            return false;
        }
        self.clear_stack_back_to(TABLE_ROW_CONTEXT);
        let _ = self.open.pop();
        self.mode = InsertionMode::InTableBody;
        true
    }

    fn close_row_and_reprocess(&mut self) -> Step {
        if self.close_row() {
            Step::Reprocess(InsertionMode::InTableBody)
        } else {
            Step::Done
        }
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    pub(super) fn handle_in_cell_mode(&mut self, token: &Token) -> Step {
        match token {
            // "An end tag whose tag name is one of: "td", "th""
            Token::EndTag { name, .. } if name == "td" || name == "th" => {
                // "If the stack of open elements does not have an element in
                // table scope that is an HTML element with the same tag name
                // as that of the token, then this is a parse error; ignore the
                // token."
                if !self.in_scope(Scope::Table, name) {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    return Step::Done;
                }
                // "Otherwise: Generate implied end tags. Now, if the current
                // node is not an HTML element with the same tag name as the
                // token, then this is a parse error. Pop elements from the
                // stack of open elements until an HTML element with the same
                // tag name as the token has been popped from the stack. Clear
                // the list of active formatting elements up to the last
                // marker. Switch the insertion mode to "in row"."
                self.generate_implied_end_tags(None);
                if !self.open.current_is(name) {
                    self.error(ParseErrorCode::UnclosedElements);
                }
                self.open.pop_until(name);
                self.formatting.clear_to_last_marker();
                self.mode = InsertionMode::InRow;
                Step::Done
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "tbody", "td", "tfoot", "th", "thead", "tr""
            // "Assert: The stack of open elements has a td or th element in
            // table scope. Close the cell and reprocess the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead"
                        | "tr"
                ) =>
            {
                if !self.open.has_any_in_scope(Scope::Table, &["td", "th"]) {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    return Step::Done;
                }
                self.close_the_cell();
                Step::Reprocess(InsertionMode::InRow)
            }

            // "An end tag whose tag name is one of: "body", "caption", "col",
            // "colgroup", "html""
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") =>
            {
                self.error(ParseErrorCode::UnexpectedEndTag);
                Step::Done
            }

            // "An end tag whose tag name is one of: "table", "tbody", "tfoot",
            // "thead", "tr""
            // "If the stack of open elements does not have an element in table
            // scope that is an HTML element with the same tag name as that of
            // the token, then this is a parse error; ignore the token.
            // Otherwise, close the cell and reprocess the token."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") =>
            {
                if !self.in_scope(Scope::Table, name) {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    return Step::Done;
                }
                self.close_the_cell();
                Step::Reprocess(InsertionMode::InRow)
            }

            // "Anything else"
            // "Process the token using the rules for the "in body" insertion mode."
            _ => self.handle_in_body_mode(token),
        }
    }
}

//! [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)

use super::core::{InsertionMode, Step, TreeBuilder};
use super::tree_sink::TreeSink;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    pub(super) fn handle_in_template_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token; A comment token; A DOCTYPE token"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { .. } | Token::Comment { .. } | Token::Doctype { .. } => {
                self.handle_in_body_mode(token)
            }

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title""
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => self.handle_in_head_mode(token),

                // "A start tag whose tag name is one of: "caption", "colgroup",
                // "tbody", "tfoot", "thead""
                "caption" | "colgroup" | "tbody" | "tfoot" | "thead" => {
                    self.switch_template_mode(InsertionMode::InTable)
                }

                // "A start tag whose tag name is "col""
                "col" => self.switch_template_mode(InsertionMode::InColumnGroup),

                // "A start tag whose tag name is "tr""
                "tr" => self.switch_template_mode(InsertionMode::InTableBody),

                // "A start tag whose tag name is one of: "td", "th""
                "td" | "th" => self.switch_template_mode(InsertionMode::InRow),

                // "Any other start tag"
                _ => self.switch_template_mode(InsertionMode::InBody),
            },

            // "An end tag whose tag name is "template""
            Token::EndTag { name, .. } if name == "template" => self.handle_in_head_mode(token),

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {
                self.error(ParseErrorCode::UnexpectedEndTag);
                Step::Done
            }

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If there is no template element on the stack of open
                // elements, then stop parsing. (fragment case)"
                if !self.open.contains_html("template") {
                    return self.stop_parsing();
                }
                // "Otherwise, this is a parse error."
                self.error(ParseErrorCode::EofWithUnclosedElements);
                // "Pop elements from the stack of open elements until a
                // template element has been popped from the stack. Clear the
                // list of active formatting elements up to the last marker.
                // Pop the current template insertion mode off the stack of
                // template insertion modes. Reset the insertion mode
                // appropriately. Reprocess the token."
                self.open.pop_until("template");
                self.formatting.clear_to_last_marker();
                let _ = self.template_modes.pop();
                self.reset_insertion_mode_appropriately();
                Step::Reprocess(self.mode)
            }
        }
    }

    /// "Pop the current template insertion mode off the stack of template
    /// insertion modes. Push `mode` onto the stack of template insertion
    /// modes so that it is the new current template insertion mode. Switch
    /// the insertion mode to `mode`, and reprocess the token."
    fn switch_template_mode(&mut self, mode: InsertionMode) -> Step {
        let _ = self.template_modes.pop();
        self.template_modes.push(mode);
        Step::Reprocess(mode)
    }
}

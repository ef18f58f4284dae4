//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

use lark_dom::Namespace;

use super::core::{Step, TreeBuilder};
use super::foreign_content::{causes_exit_from_foreign_content, is_mathml_text_integration_point};
use super::tree_sink::TreeSink;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    pub(super) fn handle_foreign_content(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Insert a U+FFFD REPLACEMENT CHARACTER character."
            Token::Character { data: '\0' } => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                self.insert_character('\u{FFFD}');
                Step::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Insert the token's character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
                Step::Done
            }

            // "Any other character token"
            // "Insert the token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.insert_character(*data);
                self.frameset_ok = false;
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

            // "A start tag whose tag name is one of: "b", "big", ... "var";
            // A start tag whose tag name is "font", if the token has any
            // attributes named "color", "face", or "size"; An end tag whose
            // tag name is "br", "p""
            _ if causes_exit_from_foreign_content(token) => {
                // "Parse error."
                self.error(match token {
                    Token::EndTag { .. } => ParseErrorCode::UnexpectedEndTag,
                    _ => ParseErrorCode::UnexpectedStartTag,
                });
                // "While the current node is not a MathML text integration
                // point, an HTML integration point, or an element in the HTML
                // namespace, pop elements from the stack of open elements."
                while self.open.current().is_some_and(|current| {
                    current.namespace != Namespace::Html
                        && !current.html_integration_point
                        && !is_mathml_text_integration_point(&current.name, current.namespace)
                }) {
                    let _ = self.open.pop();
                }
                // "Reprocess the token according to the rules given in the
                // section corresponding to the current insertion mode in HTML
                // content."
                self.step(self.mode, token)
            }

            // "Any other start tag"
            Token::StartTag { .. } => {
                // "If the adjusted current node is an element in the MathML
                // namespace, adjust MathML attributes for the token. If the
                // adjusted current node is an element in the SVG namespace,
                // and the token's tag name is one of the ones in the first
                // column of the following table, change the tag name to the
                // name given in the corresponding cell in the second column.
                // If the adjusted current node is an element in the SVG
                // namespace, adjust SVG attributes for the token. Adjust
                // foreign attributes for the token. Insert a foreign element
                // for the token, with adjusted current node's namespace and
                // false."
                let namespace = self
                    .adjusted_current_node()
                    .map_or(Namespace::Html, |node| node.namespace);
                let _ = self.insert_foreign_element(token, namespace);

                // "If the token has its self-closing flag set, then run the
                // appropriate steps from the following list:" both branches
                // pop the current node and acknowledge the flag, since
                // scripts are never run.
                if token.is_self_closing() {
                    let _ = self.open.pop();
                    self.acknowledge_self_closing();
                }
                Step::Done
            }

            // "An end tag whose tag name is "script", if the current node is
            // an SVG script element"
            // "Pop the current node off the stack of open elements."
            Token::EndTag { name, .. }
                if name == "script"
                    && self
                        .open
                        .current()
                        .is_some_and(|current| current.namespace == Namespace::Svg && current.name == "script") =>
            {
                let _ = self.open.pop();
                Step::Done
            }

            // "Any other end tag"
            Token::EndTag { name, .. } => self.foreign_end_tag(name, token),

            // End-of-file always takes the HTML path in the dispatcher.
            Token::EndOfFile => self.step(self.mode, token),
        }
    }

    /// "Any other end tag" in foreign content.
    fn foreign_end_tag(&mut self, name: &str, token: &Token) -> Step {
        let Some(mut index) = self.open.len().checked_sub(1) else {
            return Step::Done;
        };

        // "Initialize node to be the current node (the bottommost node of the
        // stack). If node's tag name, converted to ASCII lowercase, is not
        // the same as the tag name of the token, then this is a parse error."
        if self
            .open
            .get(index)
            .is_some_and(|node| !node.name.eq_ignore_ascii_case(name))
        {
            self.error(ParseErrorCode::UnexpectedEndTag);
        }

        loop {
            // "Loop: If node is the topmost element in the stack of open
            // elements, then return. (fragment case)"
            if index == 0 {
                return Step::Done;
            }
            let Some(node) = self.open.get(index) else {
                return Step::Done;
            };

            // "If node's tag name, converted to ASCII lowercase, is the same as
            // the tag name of the token, pop elements from the stack of open
            // elements until node has been popped from the stack, and then
            // return."
            if node.name.eq_ignore_ascii_case(name) {
                self.open.truncate(index);
                return Step::Done;
            }

            // "Set node to the previous entry in the stack of open elements."
            index -= 1;

            // "If node is not an element in the HTML namespace, return to the
            // step labeled loop. Otherwise, process the token according to
            // the rules given in the section corresponding to the current
            // insertion mode in HTML content."
            if self
                .open
                .get(index)
                .is_some_and(|node| node.namespace == Namespace::Html)
            {
                return self.step(self.mode, token);
            }
        }
    }
}

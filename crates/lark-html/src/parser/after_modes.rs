//! The modes after the body or frameset has closed.

use super::core::{InsertionMode, Step, TreeBuilder};
use super::tree_sink::TreeSink;
use crate::error::ParseErrorCode;
use crate::tokenizer::Token;

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    pub(super) fn handle_after_body_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { data } if Self::is_whitespace(*data) => self.handle_in_body_mode(token),

            // "A comment token"
            // "Insert a comment as the last child of the first element in the
            // stack of open elements (the html element)."
            Token::Comment { data } => {
                let html = self.root_element();
                self.insert_comment(data, html);
                Step::Done
            }

            Token::Doctype { .. } => {
                self.error(ParseErrorCode::UnexpectedDoctype);
                Step::Done
            }

            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing
            // algorithm, this is a parse error; ignore the token. (fragment
            // case) Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name, .. } if name == "html" => {
                if self.context.is_some() {
                    self.error(ParseErrorCode::UnexpectedEndTag);
                } else {
                    self.mode = InsertionMode::AfterAfterBody;
                }
                Step::Done
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            // reprocess the token."
            _ => {
                self.error(ParseErrorCode::UnexpectedCharacter);
                Step::Reprocess(InsertionMode::InBody)
            }
        }
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    pub(super) fn handle_in_frameset_mode(&mut self, token: &Token) -> Step {
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

            Token::StartTag { name, .. } => match name.as_str() {
                "html" => self.handle_in_body_mode(token),

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token."
                "frameset" => {
                    let _ = self.insert_html_element(token);
                    Step::Done
                }

                // "A start tag whose tag name is "frame""
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements. Acknowledge the
                // token's self-closing flag, if it is set."
                "frame" => {
                    let _ = self.insert_html_element(token);
                    let _ = self.open.pop();
                    self.acknowledge_self_closing();
                    Step::Done
                }

                // "A start tag whose tag name is "noframes""
                // "Process the token using the rules for the "in head" insertion mode."
                "noframes" => self.handle_in_head_mode(token),

                _ => {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    Step::Done
                }
            },

            // "An end tag whose tag name is "frameset""
            Token::EndTag { name, .. } if name == "frameset" => {
                // "If the current node is the root html element, then this is
                // a parse error; ignore the token. (fragment case)"
                if self.open.len() <= 1 {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    return Step::Done;
                }
                // "Otherwise, pop the current node from the stack of open
                // elements. If the parser was not created as part of the HTML
                // fragment parsing algorithm (fragment case), and the current
                // node is no longer a frameset element, then switch the
                // insertion mode to "after frameset"."
                let _ = self.open.pop();
                if self.context.is_none() && !self.open.current_is("frameset") {
                    self.mode = InsertionMode::AfterFrameset;
                }
                Step::Done
            }

            // "An end-of-file token"
            // "If the current node is not the root html element, then this is
            // a parse error. Note: The current node can only be the root html
            // element in the fragment case. Stop parsing."
            Token::EndOfFile => {
                if self.open.len() > 1 {
                    self.error(ParseErrorCode::EofWithUnclosedElements);
                }
                self.stop_parsing()
            }

            // "Anything else"
            // "Parse error. Ignore the token."
            _ => {
                self.error(ParseErrorCode::UnexpectedCharacter);
                Step::Done
            }
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    pub(super) fn handle_after_frameset_mode(&mut self, token: &Token) -> Step {
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

            // "An end tag whose tag name is "html""
            // "Switch the insertion mode to "after after frameset"."
            Token::EndTag { name, .. } if name == "html" => {
                self.mode = InsertionMode::AfterAfterFrameset;
                Step::Done
            }

            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),
            Token::EndOfFile => self.stop_parsing(),

            _ => {
                self.error(ParseErrorCode::UnexpectedCharacter);
                Step::Done
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    pub(super) fn handle_after_after_body_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                let document = self.sink.document();
                self.insert_comment(data, Some(document));
                Step::Done
            }

            // "A DOCTYPE token; A character token that is one of U+0009
            // CHARACTER TABULATION, U+000A LINE FEED (LF), U+000C FORM FEED
            // (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE; A start tag
            // whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if Self::is_whitespace(*data) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            Token::EndOfFile => self.stop_parsing(),

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and
            // reprocess the token."
            _ => {
                self.error(ParseErrorCode::UnexpectedCharacter);
                Step::Reprocess(InsertionMode::InBody)
            }
        }
    }

    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    pub(super) fn handle_after_after_frameset_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::Comment { data } => {
                let document = self.sink.document();
                self.insert_comment(data, Some(document));
                Step::Done
            }
            Token::Doctype { .. } => self.handle_in_body_mode(token),
            Token::Character { data } if Self::is_whitespace(*data) => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndOfFile => self.stop_parsing(),

            // "A start tag whose tag name is "noframes""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),

            _ => {
                self.error(ParseErrorCode::UnexpectedCharacter);
                Step::Done
            }
        }
    }
}

//! The insertion modes before `<body>`: "initial" through "after head", plus
//! "text".

use lark_dom::{Namespace, QuirksMode};

use super::core::{InsertionMode, Step, TreeBuilder};
use super::open_elements::StackEntry;
use super::quirks::classify_doctype;
use super::tree_sink::TreeSink;
use crate::error::ParseErrorCode;
use crate::tokenizer::{Token, TokenizerState};

impl<S: TreeSink> TreeBuilder<S> {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    pub(super) fn handle_initial_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => Step::Done,

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                let document = self.sink.document();
                self.insert_comment(data, Some(document));
                Step::Done
            }

            // "A DOCTYPE token"
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                // "If the DOCTYPE token's name is not "html", or the token's
                // public identifier is not missing, or the token's system
                // identifier is neither missing nor "about:legacy-compat", then
                // there is a parse error."
                if name.as_deref() != Some("html")
                    || public_identifier.is_some()
                    || system_identifier
                        .as_deref()
                        .is_some_and(|id| id != "about:legacy-compat")
                {
                    self.error(ParseErrorCode::MissingDoctype);
                }

                // "Append a DocumentType node to the Document node, with its
                // name set to the name given in the DOCTYPE token, or the empty
                // string if the name was missing; its public ID set to the
                // public identifier given in the DOCTYPE token, or the empty
                // string if the public identifier was missing; and its system
                // ID set to the system identifier given in the DOCTYPE token,
                // or the empty string if the system identifier was missing."
                let document = self.sink.document();
                self.sink.set_document_type(
                    document,
                    name.as_deref().unwrap_or_default(),
                    public_identifier.as_deref().unwrap_or_default(),
                    system_identifier.as_deref().unwrap_or_default(),
                );

                let mode = classify_doctype(
                    name.as_deref(),
                    public_identifier.as_deref(),
                    system_identifier.as_deref(),
                    *force_quirks,
                );
                self.set_document_mode(mode);

                // "Then, switch the insertion mode to "before html"."
                self.mode = InsertionMode::BeforeHtml;
                Step::Done
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is
            // a parse error; if the parser cannot change the mode flag is
            // false, set the Document to quirks mode. In any case, switch the
            // insertion mode to "before html", then reprocess the token."
            _ => {
                self.error(ParseErrorCode::MissingDoctype);
                self.set_document_mode(QuirksMode::Quirks);
                Step::Reprocess(InsertionMode::BeforeHtml)
            }
        }
    }

    fn set_document_mode(&mut self, mode: QuirksMode) {
        self.quirks_mode = mode;
        self.sink.set_quirks_mode(mode);
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    pub(super) fn handle_before_html_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.error(ParseErrorCode::UnexpectedDoctype);
                Step::Done
            }

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                let document = self.sink.document();
                self.insert_comment(data, Some(document));
                Step::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => Step::Done,

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the
            // Document as the intended parent. Append it to the Document
            // object. Put this element in the stack of open elements."
            Token::StartTag { name, .. } if name == "html" => {
                self.insert_root_element(token);
                self.mode = InsertionMode::BeforeHead;
                Step::Done
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                // "Any other end tag"
                // "Parse error. Ignore the token."
                self.error(ParseErrorCode::UnexpectedEndTag);
                Step::Done
            }

            // "Anything else"
            // "Create an html element whose node document is the Document
            // object. Append it to the Document object. Put this element in
            // the stack of open elements. Switch the insertion mode to "before
            // head", then reprocess the token."
            _ => {
                self.insert_root_element(&Token::start_tag("html", Vec::new()));
                Step::Reprocess(InsertionMode::BeforeHead)
            }
        }
    }

    fn insert_root_element(&mut self, token: &Token) {
        let document = self.sink.document();
        let html = self.create_element_for_token(token);
        self.sink.append_child(document, html);
        self.open.push(StackEntry {
            handle: html,
            name: "html".to_string(),
            namespace: Namespace::Html,
            html_integration_point: false,
        });
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    pub(super) fn handle_before_head_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => Step::Done,

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data, None);
                Step::Done
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.error(ParseErrorCode::UnexpectedDoctype);
                Step::Done
            }

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token. Set the head element
            // pointer to the newly created head element. Switch the insertion
            // mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head = self.insert_html_element(token);
                self.head = Some(head);
                self.mode = InsertionMode::InHead;
                Step::Done
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { name, .. } if !matches!(name.as_str(), "head" | "body" | "html" | "br") => {
                self.error(ParseErrorCode::UnexpectedEndTag);
                Step::Done
            }

            // "Anything else"
            // "Insert an HTML element for a "head" start tag token with no
            // attributes. Set the head element pointer to the newly created
            // head element. Switch the insertion mode to "in head". Reprocess
            // the current token."
            _ => {
                let head = self.insert_phantom("head");
                self.head = Some(head);
                Step::Reprocess(InsertionMode::InHead)
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    pub(super) fn handle_in_head_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
                Step::Done
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data, None);
                Step::Done
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {
                self.error(ParseErrorCode::UnexpectedDoctype);
                Step::Done
            }

            Token::StartTag { name, .. } => match name.as_str() {
                // "A start tag whose tag name is "html""
                // "Process the token using the rules for the "in body" insertion mode."
                "html" => self.handle_in_body_mode(token),

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link""
                // "Insert an HTML element for the token. Immediately pop the
                // current node off the stack of open elements. Acknowledge the
                // token's self-closing flag, if it is set."
                //
                // "A start tag whose tag name is "meta"" does the same; the
                // encoding steps do not apply to string input.
                "base" | "basefont" | "bgsound" | "link" | "meta" => {
                    let _ = self.insert_html_element(token);
                    let _ = self.open.pop();
                    self.acknowledge_self_closing();
                    Step::Done
                }

                // "A start tag whose tag name is "title""
                // "Follow the generic RCDATA element parsing algorithm."
                "title" => self.parse_text_element(token, TokenizerState::Rcdata),

                // "A start tag whose tag name is "noscript", if the scripting
                // flag is enabled"
                // "A start tag whose tag name is one of: "noframes", "style""
                // "Follow the generic raw text element parsing algorithm."
                "noscript" if self.scripting => {
                    self.parse_text_element(token, TokenizerState::Rawtext)
                }
                "noframes" | "style" => self.parse_text_element(token, TokenizerState::Rawtext),

                // "A start tag whose tag name is "noscript", if the scripting
                // flag is disabled"
                // "Insert an HTML element for the token. Switch the insertion
                // mode to "in head noscript"."
                "noscript" => {
                    let _ = self.insert_html_element(token);
                    self.mode = InsertionMode::InHeadNoscript;
                    Step::Done
                }

                // "A start tag whose tag name is "script""
                // Insert the element at the appropriate place, "switch the
                // tokenizer to the script data state", remember the insertion
                // mode and switch to "text".
                "script" => self.parse_text_element(token, TokenizerState::ScriptData),

                // "A start tag whose tag name is "template""
                "template" => {
                    // "Insert an HTML element for the token."
                    let _ = self.insert_html_element(token);
                    // "Insert a marker at the end of the list of active
                    // formatting elements."
                    self.formatting.push_marker();
                    // "Set the frameset-ok flag to "not ok"."
                    self.frameset_ok = false;
                    // "Switch the insertion mode to "in template"."
                    self.mode = InsertionMode::InTemplate;
                    // "Push "in template" onto the stack of template insertion
                    // modes so that it is the new current template insertion
                    // mode."
                    self.template_modes.push(InsertionMode::InTemplate);
                    Step::Done
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    Step::Done
                }

                _ => self.in_head_anything_else(),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "head""
                // "Pop the current node (which will be the head element) off
                // the stack of open elements. Switch the insertion mode to
                // "after head"."
                "head" => {
                    let _ = self.open.pop();
                    self.mode = InsertionMode::AfterHead;
                    Step::Done
                }

                // "An end tag whose tag name is one of: "body", "html", "br""
                // "Act as described in the "anything else" entry below."
                "body" | "html" | "br" => self.in_head_anything_else(),

                // "An end tag whose tag name is "template""
                "template" => {
                    self.close_template_element();
                    Step::Done
                }

                // "Any other end tag"
                // "Parse error. Ignore the token."
                _ => {
                    self.error(ParseErrorCode::UnexpectedEndTag);
                    Step::Done
                }
            },

            _ => self.in_head_anything_else(),
        }
    }

    /// "Pop the current node (which will be the head element) off the stack
    /// of open elements. Switch the insertion mode to "after head".
    /// Reprocess the token."
    fn in_head_anything_else(&mut self) -> Step {
        let _ = self.open.pop();
        Step::Reprocess(InsertionMode::AfterHead)
    }

    /// The "in head" rules for `</template>`.
    pub(super) fn close_template_element(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // this is a parse error; ignore the token."
        if !self.open.contains_html("template") {
            self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
            return;
        }
        // "Generate all implied end tags thoroughly."
        self.generate_all_implied_end_tags_thoroughly();
        // "If the current node is not a template element, then this is a parse
        // error."
        if !self.open.current_is("template") {
            self.error(ParseErrorCode::UnclosedElements);
        }
        // "Pop elements from the stack of open elements until a template
        // element has been popped from the stack."
        self.open.pop_until("template");
        // "Clear the list of active formatting elements up to the last marker."
        self.formatting.clear_to_last_marker();
        // "Pop the current template insertion mode off the stack of template
        // insertion modes."
        let _ = self.template_modes.pop();
        // "Reset the insertion mode appropriately."
        self.reset_insertion_mode_appropriately();
    }

    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    pub(super) fn handle_in_head_noscript_mode(&mut self, token: &Token) -> Step {
        match token {
            Token::Doctype { .. } => {
                self.error(ParseErrorCode::UnexpectedDoctype);
                Step::Done
            }
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),

            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from
            // the stack of open elements; the new current node will be a head
            // element. Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.open.pop();
                self.mode = InsertionMode::InHead;
                Step::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE; A comment token; A start tag whose
            // tag name is one of: "basefont", "bgsound", "link", "meta",
            // "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Character { data } if Self::is_whitespace(*data) => self.handle_in_head_mode(token),
            Token::Comment { .. } => self.handle_in_head_mode(token),
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.handle_in_head_mode(token)
            }

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" || name == "noscript" => {
                self.error(ParseErrorCode::UnexpectedStartTag);
                Step::Done
            }
            Token::EndTag { name, .. } if name != "br" => {
                self.error(ParseErrorCode::UnexpectedEndTag);
                Step::Done
            }

            // "Anything else"
            // "Parse error. Pop the current node (which will be a noscript
            // element) from the stack of open elements; the new current node
            // will be a head element. Switch the insertion mode to "in head".
            // Reprocess the token."
            _ => {
                self.error(ParseErrorCode::UnexpectedCharacter);
                let _ = self.open.pop();
                Step::Reprocess(InsertionMode::InHead)
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    pub(super) fn handle_after_head_mode(&mut self, token: &Token) -> Step {
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

                // "A start tag whose tag name is "body""
                // "Insert an HTML element for the token. Set the frameset-ok
                // flag to "not ok". Switch the insertion mode to "in body"."
                "body" => {
                    let _ = self.insert_html_element(token);
                    self.frameset_ok = false;
                    self.mode = InsertionMode::InBody;
                    Step::Done
                }

                // "A start tag whose tag name is "frameset""
                // "Insert an HTML element for the token. Switch the insertion
                // mode to "in frameset"."
                "frameset" => {
                    let _ = self.insert_html_element(token);
                    self.mode = InsertionMode::InFrameset;
                    Step::Done
                }

                // "A start tag whose tag name is one of: "base", "basefont",
                // "bgsound", "link", "meta", "noframes", "script", "style",
                // "template", "title""
                "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script"
                | "style" | "template" | "title" => {
                    // "Parse error."
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    // "Push the node pointed to by the head element pointer
                    // onto the stack of open elements."
                    let Some(head) = self.head else {
                        return self.handle_in_head_mode(token);
                    };
                    self.open.push(StackEntry {
                        handle: head,
                        name: "head".to_string(),
                        namespace: Namespace::Html,
                        html_integration_point: false,
                    });
                    // "Process the token using the rules for the "in head"
                    // insertion mode."
                    let step = self.handle_in_head_mode(token);
                    // "Remove the node pointed to by the head element pointer
                    // from the stack of open elements. (It might not be the
                    // current node at this point.)"
                    let _ = self.open.remove(head);
                    step
                }

                // "A start tag whose tag name is "head""
                // "Parse error. Ignore the token."
                "head" => {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    Step::Done
                }

                _ => self.after_head_anything_else(),
            },

            Token::EndTag { name, .. } => match name.as_str() {
                // "An end tag whose tag name is "template""
                // "Process the token using the rules for the "in head" insertion mode."
                "template" => self.handle_in_head_mode(token),
                "body" | "html" | "br" => self.after_head_anything_else(),
                _ => {
                    self.error(ParseErrorCode::UnexpectedEndTag);
                    Step::Done
                }
            },

            _ => self.after_head_anything_else(),
        }
    }

    /// "Insert an HTML element for a "body" start tag token with no
    /// attributes. Switch the insertion mode to "in body". Reprocess the
    /// current token."
    fn after_head_anything_else(&mut self) -> Step {
        let _ = self.insert_phantom("body");
        Step::Reprocess(InsertionMode::InBody)
    }

    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    pub(super) fn handle_text_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token"
            // "Insert the token's character."
            Token::Character { data } => {
                self.insert_character(*data);
                Step::Done
            }

            // "An end-of-file token"
            // "Parse error. ... Pop the current node off the stack of open
            // elements. Switch the insertion mode to the original insertion
            // mode and reprocess the token."
            Token::EndOfFile => {
                self.error(ParseErrorCode::EofWithUnclosedElements);
                let _ = self.open.pop();
                Step::Reprocess(self.original_mode)
            }

            // "An end tag whose tag name is "script"" and "Any other end tag"
            // "Pop the current node off the stack of open elements. Switch the
            // insertion mode to the original insertion mode."
            //
            // Scripts are never executed, so both cases are the same.
            Token::EndTag { .. } => {
                let _ = self.open.pop();
                self.mode = self.original_mode;
                Step::Done
            }

            _ => Step::Done,
        }
    }
}

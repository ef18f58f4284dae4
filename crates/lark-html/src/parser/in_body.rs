//! [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)

use lark_dom::{Namespace, QuirksMode};

use super::core::{InsertionMode, Step, TreeBuilder};
use super::open_elements::Scope;
use super::tree_sink::TreeSink;
use crate::error::ParseErrorCode;
use crate::tokenizer::{Token, TokenizerState};

/// Elements that may still be open when the body ends without a parse error.
const BODY_END_ALLOWED: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc", "tbody", "td", "tfoot",
    "th", "thead", "tr", "body", "html",
];

const HEADINGS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

impl<S: TreeSink> TreeBuilder<S> {
    pub(super) fn handle_in_body_mode(&mut self, token: &Token) -> Step {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {
                self.error(ParseErrorCode::UnexpectedNullCharacter);
                Step::Done
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION,
            // U+000A LINE FEED (LF), U+000C FORM FEED (FF), U+000D CARRIAGE
            // RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any. Insert the
            // token's character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                Step::Done
            }

            // "Any other character token"
            // "Reconstruct the active formatting elements, if any. Insert the
            // token's character. Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                self.frameset_ok = false;
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

            Token::StartTag { name, .. } => self.in_body_start_tag(name, token),
            Token::EndTag { name, .. } => self.in_body_end_tag(name),

            // "An end-of-file token"
            Token::EndOfFile => {
                // "If the stack of template insertion modes is not empty, then
                // process the token using the rules for the "in template"
                // insertion mode."
                if !self.template_modes.is_empty() {
                    return self.handle_in_template_mode(token);
                }
                // "If there is a node in the stack of open elements that is
                // not either a dd element, a dt element, ... the body element,
                // or the html element, then this is a parse error."
                if self.has_unclosed_elements_except(BODY_END_ALLOWED) {
                    self.error(ParseErrorCode::EofWithUnclosedElements);
                }
                // "Stop parsing."
                self.stop_parsing()
            }
        }
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_start_tag(&mut self, name: &str, token: &Token) -> Step {
        match name {
            // "A start tag whose tag name is "html""
            "html" => {
                // "Parse error."
                self.error(ParseErrorCode::UnexpectedStartTag);
                // "If there is a template element on the stack of open
                // elements, then ignore the token. Otherwise, for each
                // attribute on the token, check to see if the attribute is
                // already present on the top element of the stack of open
                // elements. If it is not, add the attribute and its
                // corresponding value to that element."
                if !self.open.contains_html("template")
                    && let Some(html) = self.root_element()
                {
                    self.sink.adopt_attributes(html, token.attributes());
                }
            }

            // "A start tag whose tag name is one of: "base", "basefont",
            // "bgsound", "link", "meta", "noframes", "script", "style",
            // "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            "base" | "basefont" | "bgsound" | "link" | "meta" | "noframes" | "script" | "style"
            | "template" | "title" => return self.handle_in_head_mode(token),

            // "A start tag whose tag name is "body""
            "body" => {
                self.error(ParseErrorCode::UnexpectedStartTag);
                // "If the stack of open elements has only one node on it, if
                // the second element on the stack of open elements is not a
                // body element, or if there is a template element on the stack
                // of open elements, then ignore the token. (fragment case or
                // there is a template element on the stack)"
                let body = self.open.get(1).filter(|entry| entry.is_html("body"));
                if let Some(body) = body.map(|entry| entry.handle)
                    && !self.open.contains_html("template")
                {
                    // "Otherwise, set the frameset-ok flag to "not ok"; then,
                    // for each attribute on the token, check to see if the
                    // attribute is already present on the body element (the
                    // second element) on the stack of open elements, and if it
                    // is not, add the attribute and its corresponding value to
                    // that element."
                    self.frameset_ok = false;
                    self.sink.adopt_attributes(body, token.attributes());
                }
            }

            // "A start tag whose tag name is "frameset""
            "frameset" => {
                self.error(ParseErrorCode::UnexpectedStartTag);
                // "If the stack of open elements has only one node on it, or
                // if the second element on the stack of open elements is not a
                // body element, then ignore the token. (fragment case or there
                // is a template element on the stack)"
                // "If the frameset-ok flag is set to "not ok", ignore the token."
                let body = self.open.get(1).filter(|entry| entry.is_html("body"));
                let Some(body) = body.map(|entry| entry.handle) else {
                    return Step::Done;
                };
                if !self.frameset_ok {
                    return Step::Done;
                }
                // "Remove the second element on the stack of open elements
                // from its parent node, if it has one."
                self.detach_and_untrack(body);
                // "Pop all the nodes from the bottom of the stack of open
                // elements, from the current node up to, but not including,
                // the root html element."
                self.open.truncate(1);
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);
                // "Switch the insertion mode to "in frameset"."
                self.mode = InsertionMode::InFrameset;
            }

            // "A start tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "center", "details", "dialog", "dir",
            // "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "main", "menu", "nav", "ol", "p", "search",
            // "section", "summary", "ul""
            "address" | "article" | "aside" | "blockquote" | "center" | "details" | "dialog"
            | "dir" | "div" | "dl" | "fieldset" | "figcaption" | "figure" | "footer" | "header"
            | "hgroup" | "main" | "menu" | "nav" | "ol" | "p" | "search" | "section"
            | "summary" | "ul" => {
                // "If the stack of open elements has a p element in button
                // scope, then close a p element. Insert an HTML element for
                // the token."
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                self.close_p_if_in_button_scope();
                // "If the current node is an HTML element whose tag name is one
                // of "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; pop the current node off the stack of open elements."
                if self.open.current_is_one_of(HEADINGS) {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    let _ = self.open.pop();
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "pre", "listing""
            "pre" | "listing" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                // "If the next token is a U+000A LINE FEED (LF) character
                // token, then ignore that token and move on to the next one.
                // (Newlines at the start of pre blocks are ignored as an
                // authoring convenience.)"
                self.ignore_lf = true;
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "form""
            "form" => {
                let in_template = self.open.contains_html("template");
                // "If the form element pointer is not null, and there is no
                // template element on the stack of open elements, then this is
                // a parse error; ignore the token."
                if self.form.is_some() && !in_template {
                    self.error(ParseErrorCode::MisnestedForm);
                    return Step::Done;
                }
                self.close_p_if_in_button_scope();
                let form = self.insert_html_element(token);
                // "If there is no template element on the stack of open
                // elements, set the form element pointer to point to the
                // element created."
                if !in_template {
                    self.form = Some(form);
                }
            }

            // "A start tag whose tag name is "li""
            "li" => {
                self.frameset_ok = false;
                self.close_open_list_item(&["li"]);
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => {
                self.frameset_ok = false;
                self.close_open_list_item(&["dd", "dt"]);
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "plaintext""
            "plaintext" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                // "Switch the tokenizer to the PLAINTEXT state."
                self.tokenizer_state = Some(TokenizerState::Plaintext);
            }

            // "A start tag whose tag name is "button""
            "button" => {
                // "If the stack of open elements has a button element in
                // scope, then run these substeps: Parse error. Generate implied
                // end tags. Pop elements from the stack of open elements until
                // a button element has been popped from the stack."
                if self.in_scope(Scope::Default, "button") {
                    self.error(ParseErrorCode::UnexpectedStartTag);
                    self.generate_implied_end_tags(None);
                    self.open.pop_until("button");
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "a""
            "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker on
                // the list (or the start of the list if there is no marker on
                // the list), then this is a parse error; run the adoption
                // agency algorithm for the token, then remove that element
                // from the list of active formatting elements and the stack of
                // open elements if the adoption agency algorithm didn't
                // already remove it (it might not have if the element is not
                // in table scope)."
                if let Some((_, existing)) = self.formatting.last_element_named("a") {
                    self.error(ParseErrorCode::MisnestedTag);
                    let _ = self.run_adoption_agency("a");
                    self.formatting.remove(existing);
                    let _ = self.open.remove(existing);
                }
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "b", "big", "code", "em",
            // "font", "i", "s", "small", "strike", "strong", "tt", "u""
            "b" | "big" | "code" | "em" | "font" | "i" | "s" | "small" | "strike" | "strong"
            | "tt" | "u" => self.insert_formatting_element(token),

            // "A start tag whose tag name is "nobr""
            "nobr" => {
                self.reconstruct_active_formatting_elements();
                // "If the stack of open elements has a nobr element in scope,
                // then this is a parse error; run the adoption agency algorithm
                // for the token, then once again reconstruct the active
                // formatting elements, if any."
                if self.in_scope(Scope::Default, "nobr") {
                    self.error(ParseErrorCode::MisnestedTag);
                    let _ = self.run_adoption_agency("nobr");
                }
                self.insert_formatting_element(token);
            }

            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            "applet" | "marquee" | "object" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                // "Insert a marker at the end of the list of active formatting
                // elements. Set the frameset-ok flag to "not ok"."
                self.formatting.push_marker();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "table""
            "table" => {
                // "If the Document is not set to quirks mode, and the stack of
                // open elements has a p element in button scope, then close a
                // p element."
                if self.quirks_mode != QuirksMode::Quirks {
                    self.close_p_if_in_button_scope();
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "area", "br", "embed",
            // "img", "keygen", "wbr""
            "area" | "br" | "embed" | "img" | "keygen" | "wbr" => {
                self.insert_void_element(token);
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "input""
            "input" => {
                self.insert_void_element(token);
                // "If the token does not have an attribute with the name
                // "type", or if it does, but that attribute's value is not an
                // ASCII case-insensitive match for the string "hidden", then:
                // set the frameset-ok flag to "not ok"."
                if !token
                    .attribute("type")
                    .is_some_and(|kind| kind.eq_ignore_ascii_case("hidden"))
                {
                    self.frameset_ok = false;
                }
            }

            // "A start tag whose tag name is one of: "param", "source", "track""
            // "Insert an HTML element for the token. Immediately pop the
            // current node off the stack of open elements. Acknowledge the
            // token's self-closing flag, if it is set."
            "param" | "source" | "track" => {
                let _ = self.insert_html_element(token);
                let _ = self.open.pop();
                self.acknowledge_self_closing();
            }

            // "A start tag whose tag name is "hr""
            "hr" => {
                self.close_p_if_in_button_scope();
                let _ = self.insert_html_element(token);
                let _ = self.open.pop();
                self.acknowledge_self_closing();
                self.frameset_ok = false;
            }

            // "A start tag whose tag name is "image""
            // "Parse error. Change the token's tag name to "img" and reprocess
            // it. (Don't ask.)"
            "image" => {
                self.error(ParseErrorCode::UnexpectedStartTag);
                let img = Token::start_tag("img", token.attributes().to_vec());
                return self.handle_in_body_mode(&img);
            }

            // "A start tag whose tag name is "textarea""
            "textarea" => {
                let _ = self.insert_html_element(token);
                // "If the next token is a U+000A LINE FEED (LF) character
                // token, then ignore that token and move on to the next one."
                self.ignore_lf = true;
                self.tokenizer_state = Some(TokenizerState::Rcdata);
                self.original_mode = self.mode;
                self.frameset_ok = false;
                self.mode = InsertionMode::Text;
            }

            // "A start tag whose tag name is "xmp""
            "xmp" => {
                self.close_p_if_in_button_scope();
                self.reconstruct_active_formatting_elements();
                self.frameset_ok = false;
                return self.parse_text_element(token, TokenizerState::Rawtext);
            }

            // "A start tag whose tag name is "iframe""
            "iframe" => {
                self.frameset_ok = false;
                return self.parse_text_element(token, TokenizerState::Rawtext);
            }

            // "A start tag whose tag name is "noembed""
            // "A start tag whose tag name is "noscript", if the scripting flag
            // is enabled"
            // "Follow the generic raw text element parsing algorithm."
            "noembed" => return self.parse_text_element(token, TokenizerState::Rawtext),
            "noscript" if self.scripting => {
                return self.parse_text_element(token, TokenizerState::Rawtext);
            }

            // "A start tag whose tag name is "select""
            "select" => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                // "If the insertion mode is one of "in table", "in caption",
                // "in table body", "in row", or "in cell", then switch the
                // insertion mode to "in select in table". Otherwise, switch
                // the insertion mode to "in select"."
                self.mode = match self.mode {
                    InsertionMode::InTable
                    | InsertionMode::InCaption
                    | InsertionMode::InTableBody
                    | InsertionMode::InRow
                    | InsertionMode::InCell => InsertionMode::InSelectInTable,
                    _ => InsertionMode::InSelect,
                };
            }

            // "A start tag whose tag name is one of: "optgroup", "option""
            "optgroup" | "option" => {
                // "If the current node is an option element, then pop the
                // current node off the stack of open elements."
                if self.open.current_is("option") {
                    let _ = self.open.pop();
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rb", "rtc""
            "rb" | "rtc" => {
                // "If the stack of open elements has a ruby element in scope,
                // then generate implied end tags. If the current node is not
                // now a ruby element, this is a parse error."
                if self.in_scope(Scope::Default, "ruby") {
                    self.generate_implied_end_tags(None);
                    if !self.open.current_is("ruby") {
                        self.error(ParseErrorCode::UnexpectedStartTag);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is one of: "rp", "rt""
            "rp" | "rt" => {
                // "If the stack of open elements has a ruby element in scope,
                // then generate implied end tags, except for rtc elements. If
                // the current node is not now a rtc element or a ruby element,
                // this is a parse error."
                if self.in_scope(Scope::Default, "ruby") {
                    self.generate_implied_end_tags(Some("rtc"));
                    if !self.open.current_is_one_of(&["rtc", "ruby"]) {
                        self.error(ParseErrorCode::UnexpectedStartTag);
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // "A start tag whose tag name is "math""
            // "A start tag whose tag name is "svg""
            "math" | "svg" => {
                self.reconstruct_active_formatting_elements();
                let namespace = if name == "math" {
                    Namespace::MathMl
                } else {
                    Namespace::Svg
                };
                let _ = self.insert_foreign_element(token, namespace);
                // "If the token has its self-closing flag set, pop the current
                // node off the stack of open elements and acknowledge the
                // token's self-closing flag."
                if token.is_self_closing() {
                    let _ = self.open.pop();
                    self.acknowledge_self_closing();
                }
            }

            // "A start tag whose tag name is one of: "caption", "col",
            // "colgroup", "frame", "head", "tbody", "td", "tfoot", "th",
            // "thead", "tr""
            // "Parse error. Ignore the token."
            "caption" | "col" | "colgroup" | "frame" | "head" | "tbody" | "td" | "tfoot" | "th"
            | "thead" | "tr" => self.error(ParseErrorCode::UnexpectedStartTag),

            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any. Insert an
            // HTML element for the token."
            _ => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }
        }
        Step::Done
    }

    /// The loop shared by `<li>`, `<dd>` and `<dt>`: close the nearest open
    /// list item of the same kind unless a special element other than
    /// `address`, `div` or `p` comes first.
    fn close_open_list_item(&mut self, kinds: &[&str]) {
        for index in (0..self.open.len()).rev() {
            let Some(node) = self.open.get(index) else {
                break;
            };
            if node.is_html_one_of(kinds) {
                let name = node.name.clone();
                // "Generate implied end tags, except for li elements. If the
                // current node is not an li element, then this is a parse
                // error. Pop elements from the stack of open elements until an
                // li element has been popped from the stack."
                self.generate_implied_end_tags(Some(name.as_str()));
                if !self.open.current_is(&name) {
                    self.error(ParseErrorCode::UnclosedElements);
                }
                self.open.pop_until(&name);
                return;
            }
            // "If node is in the special category, but is not an address,
            // div, or p element, then jump to the step labeled done below."
            if node.is_special() && !node.is_html_one_of(&["address", "div", "p"]) {
                return;
            }
        }
    }

    /// `<b>`, `<a>` and friends: reconstruct, insert, then "push onto the
    /// list of active formatting elements that element".
    fn insert_formatting_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let element = self.insert_html_element(token);
        self.formatting.push(element, token.clone());
    }

    /// "Reconstruct the active formatting elements, if any. Insert an HTML
    /// element for the token. Immediately pop the current node off the stack
    /// of open elements. Acknowledge the token's self-closing flag, if it is
    /// set."
    fn insert_void_element(&mut self, token: &Token) {
        self.reconstruct_active_formatting_elements();
        let _ = self.insert_html_element(token);
        let _ = self.open.pop();
        self.acknowledge_self_closing();
    }

    #[allow(clippy::too_many_lines)]
    fn in_body_end_tag(&mut self, name: &str) -> Step {
        match name {
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            "template" => self.close_template_element(),

            // "An end tag whose tag name is "body""
            "body" => {
                // "If the stack of open elements does not have a body element
                // in scope, this is a parse error; ignore the token."
                if !self.in_scope(Scope::Default, "body") {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    return Step::Done;
                }
                if self.has_unclosed_elements_except(BODY_END_ALLOWED) {
                    self.error(ParseErrorCode::UnclosedElements);
                }
                // "Switch the insertion mode to "after body"."
                self.mode = InsertionMode::AfterBody;
            }

            // "An end tag whose tag name is "html""
            "html" => {
                if !self.in_scope(Scope::Default, "body") {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    return Step::Done;
                }
                if self.has_unclosed_elements_except(BODY_END_ALLOWED) {
                    self.error(ParseErrorCode::UnclosedElements);
                }
                // "Switch the insertion mode to "after body". Reprocess the token."
                return Step::Reprocess(InsertionMode::AfterBody);
            }

            // "An end tag whose tag name is one of: "address", "article",
            // "aside", "blockquote", "button", "center", "details", "dialog",
            // "dir", "div", "dl", "fieldset", "figcaption", "figure", "footer",
            // "header", "hgroup", "listing", "main", "menu", "nav", "ol",
            // "pre", "search", "section", "summary", "ul""
            "address" | "article" | "aside" | "blockquote" | "button" | "center" | "details"
            | "dialog" | "dir" | "div" | "dl" | "fieldset" | "figcaption" | "figure" | "footer"
            | "header" | "hgroup" | "listing" | "main" | "menu" | "nav" | "ol" | "pre"
            | "search" | "section" | "summary" | "ul" => {
                self.close_element_in_scope(Scope::Default, name, None);
            }

            // "An end tag whose tag name is "form""
            "form" => self.close_form_element(),

            // "An end tag whose tag name is "p""
            "p" => {
                // "If the stack of open elements does not have a p element in
                // button scope, then this is a parse error; insert an HTML
                // element for a "p" start tag token with no attributes."
                if !self.in_scope(Scope::Button, "p") {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    let _ = self.insert_phantom("p");
                }
                // "Close a p element."
                self.close_p_element();
            }

            // "An end tag whose tag name is "li""
            "li" => self.close_element_in_scope(Scope::ListItem, "li", Some("li")),

            // "An end tag whose tag name is one of: "dd", "dt""
            "dd" | "dt" => self.close_element_in_scope(Scope::Default, name, Some(name)),

            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                // "If the stack of open elements does not have an element in
                // scope that is an HTML element and whose tag name is one of
                // "h1", "h2", "h3", "h4", "h5", or "h6", then this is a parse
                // error; ignore the token."
                if !self.open.has_any_in_scope(Scope::Default, HEADINGS) {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    return Step::Done;
                }
                self.generate_implied_end_tags(None);
                if !self.open.current_is(name) {
                    self.error(ParseErrorCode::UnclosedElements);
                }
                // "Pop elements from the stack of open elements until an HTML
                // element whose tag name is one of "h1", "h2", "h3", "h4",
                // "h5", or "h6" has been popped from the stack."
                self.open.pop_until_one_of(HEADINGS);
            }

            // "An end tag whose tag name is one of: "a", "b", "big", "code",
            // "em", "font", "i", "nobr", "s", "small", "strike", "strong",
            // "tt", "u""
            // "Run the adoption agency algorithm for the token."
            "a" | "b" | "big" | "code" | "em" | "font" | "i" | "nobr" | "s" | "small"
            | "strike" | "strong" | "tt" | "u" => {
                if self.run_adoption_agency(name) {
                    self.any_other_end_tag(name);
                }
            }

            // "An end tag token whose tag name is one of: "applet", "marquee", "object""
            "applet" | "marquee" | "object" => {
                if !self.in_scope(Scope::Default, name) {
                    self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
                    return Step::Done;
                }
                self.generate_implied_end_tags(None);
                if !self.open.current_is(name) {
                    self.error(ParseErrorCode::UnclosedElements);
                }
                self.open.pop_until(name);
                // "Clear the list of active formatting elements up to the last marker."
                self.formatting.clear_to_last_marker();
            }

            // "An end tag whose tag name is "br""
            // "Parse error. Drop the attributes from the token, and act as
            // described in the next entry; i.e. act as if this was a "br"
            // start tag token with no attributes, rather than the end tag
            // token that it actually is."
            "br" => {
                self.error(ParseErrorCode::UnexpectedEndTag);
                self.insert_void_element(&Token::start_tag("br", Vec::new()));
                self.frameset_ok = false;
            }

            // "Any other end tag"
            _ => self.any_other_end_tag(name),
        }
        Step::Done
    }

    /// The common end tag shape: "If the stack of open elements does not have
    /// an element in scope that is an HTML element with the same tag name as
    /// that of the token, then this is a parse error; ignore the token.
    /// Otherwise: generate implied end tags. If the current node is not an
    /// HTML element with the same tag name as that of the token, then this is
    /// a parse error. Pop elements from the stack of open elements until an
    /// HTML element with the same tag name as the token has been popped from
    /// the stack."
    fn close_element_in_scope(&mut self, scope: Scope, name: &str, except: Option<&str>) {
        if !self.in_scope(scope, name) {
            self.error(ParseErrorCode::EndTagWithoutMatchingOpenElement);
            return;
        }
        self.generate_implied_end_tags(except);
        if !self.open.current_is(name) {
            self.error(ParseErrorCode::UnclosedElements);
        }
        self.open.pop_until(name);
    }

    /// The `</form>` rules.
    fn close_form_element(&mut self) {
        // "If there is no template element on the stack of open elements, then
        // run these substeps:"
        if !self.open.contains_html("template") {
            // "Let node be the element that the form element pointer is set
            // to, or null if it is not set to an element. Set the form element
            // pointer to null."
            let node = self.form.take();
            // "If node is null or if the stack of open elements does not have
            // node in scope, then this is a parse error; return and ignore the
            // token."
            let Some(node) = node.filter(|node| self.open.has_handle_in_scope(*node)) else {
                self.error(ParseErrorCode::MisnestedForm);
                return;
            };
            // "Generate implied end tags. If the current node is not node,
            // then this is a parse error. Remove node from the stack of open
            // elements."
            self.generate_implied_end_tags(None);
            if self.open.current().is_none_or(|current| current.handle != node) {
                self.error(ParseErrorCode::MisnestedForm);
            }
            let _ = self.open.remove(node);
        } else {
            // "If there is a template element on the stack of open elements,
            // then run these substeps instead:"
            self.close_element_in_scope(Scope::Default, "form", None);
        }
    }
}

//! Helper functions for the HTML tokenizer.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! This module contains utility functions used throughout the tokenizer:
//! - State transitions ("Switch to", "Reconsume in")
//! - Input/character handling ("Consume the next input character")
//! - Token emission ("Emit the current token")
//! - Attribute helpers for duplicate detection
//! - Parse error reporting

use lark_common::warning::warn_once;

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;
use crate::error::{ParseErrorCode, ParseIssue};

// =============================================================================
// State Transition Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Switch to the X state"
    ///
    /// The next character will be consumed on the next step.
    pub(super) const fn switch_to(&mut self, new_state: TokenizerState) {
        self.state = new_state;
    }

    /// "Reconsume in the X state"
    ///
    /// The same character will be processed again in the new state.
    pub(super) const fn reconsume_in(&mut self, new_state: TokenizerState) {
        self.reconsume = true;
        self.state = new_state;
    }

    /// "Reconsume in the return state"
    pub(super) const fn reconsume_in_return_state(&mut self) {
        self.reconsume_in(self.return_state);
    }
}

// =============================================================================
// Input/Character Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Consume the next input character"
    ///
    /// Returns None at the end of input.
    pub(super) fn consume(&mut self) -> Option<char> {
        let c = self.input[self.current_pos..].chars().next()?;
        self.current_pos += c.len_utf8();
        Some(c)
    }

    /// Peek at a codepoint at the given offset from the current position without
    /// consuming it.
    #[must_use]
    pub fn peek_codepoint(&self, offset: usize) -> Option<char> {
        self.input[self.current_pos..].chars().nth(offset)
    }

    /// "If the next few characters are..."
    #[must_use]
    pub fn next_few_characters_are(&self, target: &str) -> bool {
        self.input[self.current_pos..].starts_with(target)
    }

    /// "ASCII case-insensitive match for the word 'DOCTYPE'"
    ///
    /// `target` must be ASCII.
    #[must_use]
    pub fn next_few_characters_are_case_insensitive(&self, target: &str) -> bool {
        self.input
            .get(self.current_pos..self.current_pos + target.len())
            .is_some_and(|next| next.eq_ignore_ascii_case(target))
    }

    /// Consume an ASCII string the caller has already matched.
    pub(super) const fn consume_string(&mut self, target: &str) {
        self.current_pos += target.len();
    }

    /// [§ 4.6 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// The tokenizer's whitespace set: tab, LF, FF and space (CR is normalized
    /// away before tokenization).
    pub(super) const fn is_whitespace_char(input_char: char) -> bool {
        matches!(input_char, ' ' | '\t' | '\n' | '\x0C')
    }
}

// =============================================================================
// Token Emission Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "Emit the current token"
    ///
    /// Start tags update the last start tag name. End tags with attributes or
    /// a self-closing flag are parse errors. A pending duplicate attribute is
    /// dropped first.
    pub(super) fn emit_token(&mut self) {
        self.finish_attribute();
        let Some(token) = self.current_token.take() else {
            return;
        };
        match &token {
            Token::StartTag { name, .. } => {
                self.last_start_tag_name = Some(name.clone());
            }
            Token::EndTag { attributes, .. } if !attributes.is_empty() => {
                self.parse_error(ParseErrorCode::EndTagWithAttributes);
            }
            _ => {}
        }
        self.token_stream.push_back(token);
    }

    /// "Emit the current input character as a character token."
    pub(super) fn emit_character_token(&mut self, c: char) {
        self.token_stream.push_back(Token::new_character(c));
    }

    /// Emit one character token per character of `s`.
    pub(super) fn emit_characters(&mut self, s: &str) {
        self.token_stream.extend(s.chars().map(Token::new_character));
    }

    /// "Emit an end-of-file token."
    pub(super) fn emit_eof_token(&mut self) {
        self.token_stream.push_back(Token::EndOfFile);
        self.at_eof = true;
    }

    /// "Emit the current token. Emit an end-of-file token." (used by the
    /// comment and DOCTYPE EOF branches)
    pub(super) fn emit_token_then_eof(&mut self) {
        self.emit_token();
        self.emit_eof_token();
    }
}

// =============================================================================
// Raw Text Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any. If no start tag has been emitted from this tokenizer,
    /// then no end tag token is appropriate."
    pub(super) fn is_appropriate_end_tag_token(&self) -> bool {
        match (&self.last_start_tag_name, &self.current_token) {
            (Some(last_start_tag), Some(Token::EndTag { name, .. })) => name == last_start_tag,
            _ => false,
        }
    }

    /// The "anything else" branch shared by every raw text end tag name state:
    ///
    /// "Emit a U+003C LESS-THAN SIGN character token, a U+002F SOLIDUS character
    /// token, and a character token for each of the characters in the temporary
    /// buffer (in the order they were added to the buffer). Reconsume in the X
    /// state."
    pub(super) fn emit_end_tag_name_anything_else(&mut self, text_state: TokenizerState) {
        self.emit_character_token('<');
        self.emit_character_token('/');
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.emit_characters(&buffer);
        self.current_token = None;
        self.reconsume_in(text_state);
    }
}

// =============================================================================
// Attribute Helpers
// =============================================================================

impl HTMLTokenizer {
    /// "When the user agent leaves the attribute name state (and before
    /// emitting the tag token, if appropriate), the complete attribute's name
    /// must be compared to the other attributes on the same token; if there is
    /// already an attribute on the token with the exact same name, then this
    /// is a duplicate-attribute parse error and the new attribute must be
    /// removed from the token."
    ///
    /// The value states still append to the duplicate, so removal waits until
    /// the attribute is complete (see [`Self::finish_attribute`]).
    pub(super) fn check_duplicate_attribute(&mut self) {
        if self
            .current_token
            .as_ref()
            .is_some_and(Token::current_attribute_name_is_duplicate)
        {
            self.parse_error(ParseErrorCode::DuplicateAttribute);
            self.drop_current_attribute = true;
        }
    }

    /// Remove the attribute just completed if it was a duplicate.
    pub(super) fn finish_attribute(&mut self) {
        if self.drop_current_attribute {
            self.drop_current_attribute = false;
            if let Some(token) = self.current_token.as_mut() {
                token.remove_current_attribute();
            }
        }
    }

    /// "Start a new attribute in the current tag token."
    pub(super) fn start_new_attribute(&mut self) {
        self.finish_attribute();
        if let Some(token) = self.current_token.as_mut() {
            token.start_new_attribute();
        }
    }

    pub(super) fn append_to_attribute_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_current_attribute_name(c);
        }
    }

    pub(super) fn append_to_attribute_value(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_current_attribute_value(c);
        }
    }

    pub(super) fn append_to_tag_name(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_tag_name(c);
        }
    }

    pub(super) fn append_to_comment(&mut self, c: char) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_to_comment(c);
        }
    }

    pub(super) fn append_str_to_comment(&mut self, s: &str) {
        if let Some(token) = self.current_token.as_mut() {
            token.append_str_to_comment(s);
        }
    }
}

// =============================================================================
// Parse Error Reporting
// =============================================================================

impl HTMLTokenizer {
    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    ///
    /// Record a parse error at the current input position. Tokenization
    /// continues with the recovery the state prescribes.
    pub(super) fn parse_error(&mut self, code: ParseErrorCode) {
        let issue = ParseIssue::new(code, self.current_pos);
        if self.log_issues {
            let _ = warn_once("HTML Tokenizer", &issue.to_string());
        }
        self.issues.push(issue);
    }
}

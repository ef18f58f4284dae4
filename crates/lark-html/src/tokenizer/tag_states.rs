//! Tag and attribute states (§ 13.2.5.6 - § 13.2.5.8, § 13.2.5.32 - § 13.2.5.40).

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;
use crate::error::ParseErrorCode;

impl HTMLTokenizer {
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    pub(super) fn handle_tag_open_state(&mut self) {
        match self.current_input_character {
            // "U+0021 EXCLAMATION MARK (!) - Switch to the markup declaration open state."
            Some('!') => self.switch_to(TokenizerState::MarkupDeclarationOpen),
            // "U+002F SOLIDUS (/) - Switch to the end tag open state."
            Some('/') => self.switch_to(TokenizerState::EndTagOpen),
            // "ASCII alpha - Create a new start tag token, set its tag name to the
            // empty string. Reconsume in the tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003F QUESTION MARK (?) - This is an
            // unexpected-question-mark-instead-of-tag-name parse error. Create a
            // comment token whose data is the empty string. Reconsume in the bogus
            // comment state."
            Some('?') => {
                self.parse_error(ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName);
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
            // "EOF - This is an eof-before-tag-name parse error. Emit a U+003C
            // LESS-THAN SIGN character token and an end-of-file token."
            None => {
                self.parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse
            // error. Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
            // data state."
            Some(_) => {
                self.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::Data);
            }
        }
    }

    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    pub(super) fn handle_end_tag_open_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(TokenizerState::TagName);
            }
            // "U+003E GREATER-THAN SIGN (>) - This is a missing-end-tag-name parse
            // error. Switch to the data state."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingEndTagName);
                self.switch_to(TokenizerState::Data);
            }
            None => {
                self.parse_error(ParseErrorCode::EofBeforeTagName);
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.emit_eof_token();
            }
            // "Anything else - This is an invalid-first-character-of-tag-name parse
            // error. Create a comment token whose data is the empty string.
            // Reconsume in the bogus comment state."
            Some(_) => {
                self.parse_error(ParseErrorCode::InvalidFirstCharacterOfTagName);
                self.current_token = Some(Token::new_comment());
                self.reconsume_in(TokenizerState::BogusComment);
            }
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    pub(super) fn handle_tag_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_tag_name('\u{FFFD}');
            }
            None => self.eof_in_tag(),
            // "ASCII upper alpha - Append the lowercase version of the current
            // input character (add 0x0020 to the character's code point) to the
            // current tag token's tag name."
            Some(c) => self.append_to_tag_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    pub(super) fn handle_before_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/' | '>') | None => self.reconsume_in(TokenizerState::AfterAttributeName),
            // "U+003D EQUALS SIGN (=) - This is an
            // unexpected-equals-sign-before-attribute-name parse error. Start a new
            // attribute in the current tag token. Set that attribute's name to the
            // current input character, and its value to the empty string."
            Some('=') => {
                self.parse_error(ParseErrorCode::UnexpectedEqualsSignBeforeAttributeName);
                self.start_new_attribute();
                self.append_to_attribute_name('=');
                self.switch_to(TokenizerState::AttributeName);
            }
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    pub(super) fn handle_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('/' | '>') | None => {
                self.check_duplicate_attribute();
                self.reconsume_in(TokenizerState::AfterAttributeName);
            }
            Some('=') => {
                self.check_duplicate_attribute();
                self.switch_to(TokenizerState::BeforeAttributeValue);
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_attribute_name('\u{FFFD}');
            }
            // "This is an unexpected-character-in-attribute-name parse error. Treat
            // it as per the 'anything else' entry below."
            Some(c @ ('"' | '\'' | '<')) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInAttributeName);
                self.append_to_attribute_name(c);
            }
            Some(c) => self.append_to_attribute_name(c.to_ascii_lowercase()),
        }
    }

    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    pub(super) fn handle_after_attribute_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('=') => self.switch_to(TokenizerState::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.start_new_attribute();
                self.reconsume_in(TokenizerState::AttributeName);
            }
        }
    }

    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    pub(super) fn handle_before_attribute_value_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('"') => self.switch_to(TokenizerState::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(TokenizerState::AttributeValueSingleQuoted),
            // "This is a missing-attribute-value parse error. Switch to the data
            // state. Emit the current tag token."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingAttributeValue);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            _ => self.reconsume_in(TokenizerState::AttributeValueUnquoted),
        }
    }

    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    pub(super) fn handle_attribute_value_quoted_state(&mut self, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => self.switch_to(TokenizerState::AfterAttributeValueQuoted),
            // "U+0026 AMPERSAND (&) - Set the return state to the attribute value
            // (double-quoted) state. Switch to the character reference state."
            Some('&') => {
                self.return_state = self.state;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_attribute_value('\u{FFFD}');
            }
            None => self.eof_in_tag(),
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    pub(super) fn handle_attribute_value_unquoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('&') => {
                self.return_state = TokenizerState::AttributeValueUnquoted;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_attribute_value('\u{FFFD}');
            }
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterInUnquotedAttributeValue);
                self.append_to_attribute_value(c);
            }
            None => self.eof_in_tag(),
            Some(c) => self.append_to_attribute_value(c),
        }
    }

    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    pub(super) fn handle_after_attribute_value_quoted_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') => self.switch_to(TokenizerState::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    pub(super) fn handle_self_closing_start_tag_state(&mut self) {
        match self.current_input_character {
            // "U+003E GREATER-THAN SIGN (>) - Set the self-closing flag of the
            // current tag token. Switch to the data state. Emit the current tag
            // token."
            Some('>') => {
                if matches!(self.current_token, Some(Token::EndTag { .. })) {
                    self.parse_error(ParseErrorCode::EndTagWithTrailingSolidus);
                }
                if let Some(token) = self.current_token.as_mut() {
                    token.set_self_closing();
                }
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_tag(),
            Some(_) => {
                self.parse_error(ParseErrorCode::UnexpectedSolidusInTag);
                self.reconsume_in(TokenizerState::BeforeAttributeName);
            }
        }
    }

    /// "EOF - This is an eof-in-tag parse error. Emit an end-of-file token."
    ///
    /// The unfinished tag is dropped.
    fn eof_in_tag(&mut self) {
        self.parse_error(ParseErrorCode::EofInTag);
        self.current_token = None;
        self.emit_eof_token();
    }
}

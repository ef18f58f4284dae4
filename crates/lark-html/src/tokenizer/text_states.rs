//! Character data states: data, RCDATA, RAWTEXT, script data (with its
//! escaped and double-escaped variants), PLAINTEXT and CDATA sections.

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;
use crate::error::ParseErrorCode;

impl HTMLTokenizer {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    pub(super) fn handle_data_state(&mut self) {
        match self.current_input_character {
            // "U+0026 AMPERSAND (&) - Set the return state to the data state.
            // Switch to the character reference state."
            Some('&') => {
                self.return_state = TokenizerState::Data;
                self.switch_to(TokenizerState::CharacterReference);
            }
            // "U+003C LESS-THAN SIGN (<) - Switch to the tag open state."
            Some('<') => self.switch_to(TokenizerState::TagOpen),
            // "U+0000 NULL - This is an unexpected-null-character parse error.
            // Emit the current input character as a character token."
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.emit_character_token('\0');
            }
            // "EOF - Emit an end-of-file token."
            None => self.emit_eof_token(),
            // "Anything else - Emit the current input character as a character token."
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    pub(super) fn handle_rcdata_state(&mut self) {
        match self.current_input_character {
            Some('&') => {
                self.return_state = TokenizerState::Rcdata;
                self.switch_to(TokenizerState::CharacterReference);
            }
            Some('<') => self.switch_to(TokenizerState::RcdataLessThanSign),
            Some('\0') => self.emit_replacement_character(),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    pub(super) fn handle_rawtext_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::RawtextLessThanSign),
            Some('\0') => self.emit_replacement_character(),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    pub(super) fn handle_script_data_state(&mut self) {
        match self.current_input_character {
            Some('<') => self.switch_to(TokenizerState::ScriptDataLessThanSign),
            Some('\0') => self.emit_replacement_character(),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    ///
    /// There is no way out of this state.
    pub(super) fn handle_plaintext_state(&mut self) {
        match self.current_input_character {
            Some('\0') => self.emit_replacement_character(),
            None => self.emit_eof_token(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// "This is an unexpected-null-character parse error. Emit a U+FFFD
    /// REPLACEMENT CHARACTER character token."
    fn emit_replacement_character(&mut self) {
        self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
        self.emit_character_token('\u{FFFD}');
    }

    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    ///
    /// `text_state` is the RCDATA or RAWTEXT state this `<` came from.
    pub(super) fn handle_raw_less_than_sign_state(&mut self, text_state: TokenizerState) {
        if self.current_input_character == Some('/') {
            // "Set the temporary buffer to the empty string. Switch to the
            // RCDATA end tag open state."
            self.temporary_buffer.clear();
            self.switch_to(Self::end_tag_open_state_for(text_state));
        } else {
            // "Emit a U+003C LESS-THAN SIGN character token. Reconsume in the
            // RCDATA state."
            self.emit_character_token('<');
            self.reconsume_in(text_state);
        }
    }

    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    ///
    /// Shared by the RAWTEXT, script data and script data escaped variants,
    /// which differ only in the states they return to.
    pub(super) fn handle_raw_end_tag_open_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "ASCII alpha - Create a new end tag token, set its tag name to the
            // empty string. Reconsume in the RCDATA end tag name state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(Self::end_tag_name_state_for(text_state));
            }
            // "Anything else - Emit a U+003C LESS-THAN SIGN character token and a
            // U+002F SOLIDUS character token. Reconsume in the RCDATA state."
            _ => {
                self.emit_character_token('<');
                self.emit_character_token('/');
                self.reconsume_in(text_state);
            }
        }
    }

    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    ///
    /// Shared by the RAWTEXT, script data and script data escaped variants.
    pub(super) fn handle_raw_end_tag_name_state(&mut self, text_state: TokenizerState) {
        match self.current_input_character {
            // "If the current end tag token is an appropriate end tag token,
            // then switch to the before attribute name state. Otherwise, treat it
            // as per the 'anything else' entry below."
            Some(c) if Self::is_whitespace_char(c) && self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::BeforeAttributeName);
            }
            Some('/') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::SelfClosingStartTag);
            }
            Some('>') if self.is_appropriate_end_tag_token() => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            // "ASCII upper alpha - Append the lowercase version of the current
            // input character to the current tag token's tag name. Append the
            // current input character to the temporary buffer."
            Some(c) if c.is_ascii_alphabetic() => {
                self.append_to_tag_name(c.to_ascii_lowercase());
                self.temporary_buffer.push(c);
            }
            _ => self.emit_end_tag_name_anything_else(text_state),
        }
    }

    const fn end_tag_open_state_for(text_state: TokenizerState) -> TokenizerState {
        match text_state {
            TokenizerState::Rawtext => TokenizerState::RawtextEndTagOpen,
            TokenizerState::ScriptData => TokenizerState::ScriptDataEndTagOpen,
            TokenizerState::ScriptDataEscaped => TokenizerState::ScriptDataEscapedEndTagOpen,
            _ => TokenizerState::RcdataEndTagOpen,
        }
    }

    const fn end_tag_name_state_for(text_state: TokenizerState) -> TokenizerState {
        match text_state {
            TokenizerState::Rawtext => TokenizerState::RawtextEndTagName,
            TokenizerState::ScriptData => TokenizerState::ScriptDataEndTagName,
            TokenizerState::ScriptDataEscaped => TokenizerState::ScriptDataEscapedEndTagName,
            _ => TokenizerState::RcdataEndTagName,
        }
    }

    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    pub(super) fn handle_script_data_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEndTagOpen);
            }
            // "U+0021 EXCLAMATION MARK (!) - Switch to the script data escape
            // start state. Emit a U+003C LESS-THAN SIGN character token and a
            // U+0021 EXCLAMATION MARK character token."
            Some('!') => {
                self.switch_to(TokenizerState::ScriptDataEscapeStart);
                self.emit_character_token('<');
                self.emit_character_token('!');
            }
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptData);
            }
        }
    }

    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    pub(super) fn handle_script_data_escape_start_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::ScriptDataEscapeStartDash);
            self.emit_character_token('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    pub(super) fn handle_script_data_escape_start_dash_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
            self.emit_character_token('-');
        } else {
            self.reconsume_in(TokenizerState::ScriptData);
        }
    }

    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    pub(super) fn handle_script_data_escaped_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDash);
                self.emit_character_token('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('\0') => self.emit_replacement_character(),
            None => self.eof_in_script_comment_like_text(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    pub(super) fn handle_script_data_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            Some('\0') => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_replacement_character();
            }
            None => self.eof_in_script_comment_like_text(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    pub(super) fn handle_script_data_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_character_token('-'),
            Some('<') => self.switch_to(TokenizerState::ScriptDataEscapedLessThanSign),
            // "U+003E GREATER-THAN SIGN (>) - Switch to the script data state.
            // Emit a U+003E GREATER-THAN SIGN character token."
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            Some('\0') => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_replacement_character();
            }
            None => self.eof_in_script_comment_like_text(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_escaped_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('/') => {
                self.temporary_buffer.clear();
                self.switch_to(TokenizerState::ScriptDataEscapedEndTagOpen);
            }
            // "ASCII alpha - Set the temporary buffer to the empty string. Emit a
            // U+003C LESS-THAN SIGN character token. Reconsume in the script data
            // double escape start state."
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.clear();
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataDoubleEscapeStart);
            }
            _ => {
                self.emit_character_token('<');
                self.reconsume_in(TokenizerState::ScriptDataEscaped);
            }
        }
    }

    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    pub(super) fn handle_script_data_double_escape_start_state(&mut self) {
        self.handle_double_escape_boundary(
            TokenizerState::ScriptDataDoubleEscaped,
            TokenizerState::ScriptDataEscaped,
        );
    }

    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    pub(super) fn handle_script_data_double_escape_end_state(&mut self) {
        self.handle_double_escape_boundary(
            TokenizerState::ScriptDataEscaped,
            TokenizerState::ScriptDataDoubleEscaped,
        );
    }

    /// Both double-escape boundary states look for the word `script`:
    ///
    /// "U+0009 ..., U+0020 SPACE, U+002F SOLIDUS (/), U+003E GREATER-THAN SIGN
    /// (>) - If the temporary buffer is the string "script", then switch to the
    /// `on_script` state. Otherwise, switch to the `otherwise` state. Emit the
    /// current input character as a character token."
    fn handle_double_escape_boundary(
        &mut self,
        on_script: TokenizerState,
        otherwise: TokenizerState,
    ) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) || c == '/' || c == '>' => {
                if self.temporary_buffer == "script" {
                    self.switch_to(on_script);
                } else {
                    self.switch_to(otherwise);
                }
                self.emit_character_token(c);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.temporary_buffer.push(c.to_ascii_lowercase());
                self.emit_character_token(c);
            }
            _ => self.reconsume_in(otherwise),
        }
    }

    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    pub(super) fn handle_script_data_double_escaped_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('\0') => self.emit_replacement_character(),
            None => self.eof_in_script_comment_like_text(),
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedDashDash);
                self.emit_character_token('-');
            }
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('\0') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_replacement_character();
            }
            None => self.eof_in_script_comment_like_text(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    pub(super) fn handle_script_data_double_escaped_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.emit_character_token('-'),
            Some('<') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscapedLessThanSign);
                self.emit_character_token('<');
            }
            Some('>') => {
                self.switch_to(TokenizerState::ScriptData);
                self.emit_character_token('>');
            }
            Some('\0') => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_replacement_character();
            }
            None => self.eof_in_script_comment_like_text(),
            Some(c) => {
                self.switch_to(TokenizerState::ScriptDataDoubleEscaped);
                self.emit_character_token(c);
            }
        }
    }

    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    pub(super) fn handle_script_data_double_escaped_less_than_sign_state(&mut self) {
        if self.current_input_character == Some('/') {
            self.temporary_buffer.clear();
            self.switch_to(TokenizerState::ScriptDataDoubleEscapeEnd);
            self.emit_character_token('/');
        } else {
            self.reconsume_in(TokenizerState::ScriptDataDoubleEscaped);
        }
    }

    /// "EOF - This is an eof-in-script-html-comment-like-text parse error.
    /// Emit an end-of-file token."
    fn eof_in_script_comment_like_text(&mut self) {
        self.parse_error(ParseErrorCode::EofInScriptHtmlCommentLikeText);
        self.emit_eof_token();
    }

    /// [§ 13.2.5.69 CDATA section state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-state)
    ///
    /// NUL is emitted as-is here; the rules for foreign content replace it.
    pub(super) fn handle_cdata_section_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.switch_to(TokenizerState::CdataSectionBracket),
            None => {
                self.parse_error(ParseErrorCode::EofInCdata);
                self.emit_eof_token();
            }
            Some(c) => self.emit_character_token(c),
        }
    }

    /// [§ 13.2.5.70 CDATA section bracket state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-bracket-state)
    pub(super) fn handle_cdata_section_bracket_state(&mut self) {
        if self.current_input_character == Some(']') {
            self.switch_to(TokenizerState::CdataSectionEnd);
        } else {
            self.emit_character_token(']');
            self.reconsume_in(TokenizerState::CdataSection);
        }
    }

    /// [§ 13.2.5.71 CDATA section end state](https://html.spec.whatwg.org/multipage/parsing.html#cdata-section-end-state)
    pub(super) fn handle_cdata_section_end_state(&mut self) {
        match self.current_input_character {
            Some(']') => self.emit_character_token(']'),
            Some('>') => self.switch_to(TokenizerState::Data),
            _ => {
                self.emit_character_token(']');
                self.emit_character_token(']');
                self.reconsume_in(TokenizerState::CdataSection);
            }
        }
    }
}

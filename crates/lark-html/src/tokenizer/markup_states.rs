//! Markup declarations: comments, bogus comments and DOCTYPEs
//! (§ 13.2.5.41 - § 13.2.5.68).

use super::core::{HTMLTokenizer, TokenizerState};
use super::token::Token;
use crate::error::ParseErrorCode;

impl HTMLTokenizer {
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// Runs without consuming a character; it only looks ahead.
    pub(super) fn handle_markup_declaration_open_state(&mut self) {
        // "Two U+002D HYPHEN-MINUS characters (-) - Consume those two characters,
        // create a comment token whose data is the empty string, and switch to
        // the comment start state."
        if self.next_few_characters_are("--") {
            self.consume_string("--");
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::CommentStart);
        }
        // "ASCII case-insensitive match for the word "DOCTYPE" - Consume those
        // characters and switch to the DOCTYPE state."
        else if self.next_few_characters_are_case_insensitive("DOCTYPE") {
            self.consume_string("DOCTYPE");
            self.switch_to(TokenizerState::Doctype);
        }
        // "The string "[CDATA[" (the five uppercase letters "CDATA" with a U+005B
        // LEFT SQUARE BRACKET character before and after) - Consume those
        // characters. If there is an adjusted current node and it is not an
        // element in the HTML namespace, then switch to the CDATA section state.
        // Otherwise, this is a cdata-in-html-content parse error. Create a
        // comment token whose data is the "[CDATA[" string. Switch to the bogus
        // comment state."
        else if self.next_few_characters_are("[CDATA[") {
            self.consume_string("[CDATA[");
            if self.allow_cdata {
                self.switch_to(TokenizerState::CdataSection);
            } else {
                self.parse_error(ParseErrorCode::CdataInHtmlContent);
                let mut comment = Token::new_comment();
                comment.append_str_to_comment("[CDATA[");
                self.current_token = Some(comment);
                self.switch_to(TokenizerState::BogusComment);
            }
        }
        // "Anything else - This is an incorrectly-opened-comment parse error.
        // Create a comment token whose data is the empty string. Switch to the
        // bogus comment state (don't consume anything in the current state)."
        else {
            self.parse_error(ParseErrorCode::IncorrectlyOpenedComment);
            self.current_token = Some(Token::new_comment());
            self.switch_to(TokenizerState::BogusComment);
        }
    }

    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    pub(super) fn handle_bogus_comment_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.emit_token_then_eof(),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_comment('\u{FFFD}');
            }
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    pub(super) fn handle_comment_start_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentStartDash),
            // "This is an abrupt-closing-of-empty-comment parse error. Switch to
            // the data state. Emit the current comment token."
            Some('>') => self.abrupt_closing_of_empty_comment(),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    pub(super) fn handle_comment_start_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            Some('>') => self.abrupt_closing_of_empty_comment(),
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    fn abrupt_closing_of_empty_comment(&mut self) {
        self.parse_error(ParseErrorCode::AbruptClosingOfEmptyComment);
        self.switch_to(TokenizerState::Data);
        self.emit_token();
    }

    /// "EOF - This is an eof-in-comment parse error. Emit the current comment
    /// token. Emit an end-of-file token."
    fn eof_in_comment(&mut self) {
        self.parse_error(ParseErrorCode::EofInComment);
        self.emit_token_then_eof();
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    pub(super) fn handle_comment_state(&mut self) {
        match self.current_input_character {
            // "Append the current input character to the comment token's data.
            // Switch to the comment less-than sign state."
            Some('<') => {
                self.append_to_comment('<');
                self.switch_to(TokenizerState::CommentLessThanSign);
            }
            Some('-') => self.switch_to(TokenizerState::CommentEndDash),
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_comment('\u{FFFD}');
            }
            None => self.eof_in_comment(),
            Some(c) => self.append_to_comment(c),
        }
    }

    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    pub(super) fn handle_comment_less_than_sign_state(&mut self) {
        match self.current_input_character {
            Some('!') => {
                self.append_to_comment('!');
                self.switch_to(TokenizerState::CommentLessThanSignBang);
            }
            Some('<') => self.append_to_comment('<'),
            _ => self.reconsume_in(TokenizerState::Comment),
        }
    }

    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    pub(super) fn handle_comment_less_than_sign_bang_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDash);
        } else {
            self.reconsume_in(TokenizerState::Comment);
        }
    }

    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_state(&mut self) {
        if self.current_input_character == Some('-') {
            self.switch_to(TokenizerState::CommentLessThanSignBangDashDash);
        } else {
            self.reconsume_in(TokenizerState::CommentEndDash);
        }
    }

    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    pub(super) fn handle_comment_less_than_sign_bang_dash_dash_state(&mut self) {
        match self.current_input_character {
            Some('>') | None => self.reconsume_in(TokenizerState::CommentEnd),
            // "Anything else - This is a nested-comment parse error. Reconsume in
            // the comment end state."
            Some(_) => {
                self.parse_error(ParseErrorCode::NestedComment);
                self.reconsume_in(TokenizerState::CommentEnd);
            }
        }
    }

    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    pub(super) fn handle_comment_end_dash_state(&mut self) {
        match self.current_input_character {
            Some('-') => self.switch_to(TokenizerState::CommentEnd),
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_to_comment('-');
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    pub(super) fn handle_comment_end_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('!') => self.switch_to(TokenizerState::CommentEndBang),
            Some('-') => self.append_to_comment('-'),
            None => self.eof_in_comment(),
            // "Append two U+002D HYPHEN-MINUS characters (-) to the comment token's
            // data. Reconsume in the comment state."
            Some(_) => {
                self.append_str_to_comment("--");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    pub(super) fn handle_comment_end_bang_state(&mut self) {
        match self.current_input_character {
            Some('-') => {
                self.append_str_to_comment("--!");
                self.switch_to(TokenizerState::CommentEndDash);
            }
            // "This is an incorrectly-closed-comment parse error. Switch to the
            // data state. Emit the current comment token."
            Some('>') => {
                self.parse_error(ParseErrorCode::IncorrectlyClosedComment);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_comment(),
            Some(_) => {
                self.append_str_to_comment("--!");
                self.reconsume_in(TokenizerState::Comment);
            }
        }
    }

    // =========================================================================
    // DOCTYPE states
    // =========================================================================

    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    pub(super) fn handle_doctype_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BeforeDoctypeName);
            }
            Some('>') => self.reconsume_in(TokenizerState::BeforeDoctypeName),
            // "EOF - This is an eof-in-doctype parse error. Create a new DOCTYPE
            // token. Set its force-quirks flag to on. Emit the current token. Emit
            // an end-of-file token."
            None => {
                self.current_token = Some(Token::new_doctype());
                self.eof_in_doctype();
            }
            Some(_) => {
                self.parse_error(ParseErrorCode::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(TokenizerState::BeforeDoctypeName);
            }
        }
    }

    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    pub(super) fn handle_before_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.start_doctype_with_name('\u{FFFD}');
            }
            // "This is a missing-doctype-name parse error. Create a new DOCTYPE
            // token. Set its force-quirks flag to on. Switch to the data state.
            // Emit the current token."
            Some('>') => {
                self.parse_error(ParseErrorCode::MissingDoctypeName);
                let mut doctype = Token::new_doctype();
                doctype.set_force_quirks();
                self.current_token = Some(doctype);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => {
                self.current_token = Some(Token::new_doctype());
                self.eof_in_doctype();
            }
            Some(c) => self.start_doctype_with_name(c.to_ascii_lowercase()),
        }
    }

    fn start_doctype_with_name(&mut self, c: char) {
        let mut doctype = Token::new_doctype();
        doctype.append_to_doctype_name(c);
        self.current_token = Some(doctype);
        self.switch_to(TokenizerState::DoctypeName);
    }

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    pub(super) fn handle_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::AfterDoctypeName);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.with_doctype(|t| t.append_to_doctype_name('\u{FFFD}'));
            }
            None => self.eof_in_doctype(),
            Some(c) => self.with_doctype(|t| t.append_to_doctype_name(c.to_ascii_lowercase())),
        }
    }

    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    pub(super) fn handle_after_doctype_name_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            // "If the six characters starting from the current input character
            // are an ASCII case-insensitive match for the word "PUBLIC", then
            // consume those characters and switch to the after DOCTYPE public
            // keyword state."
            Some(c) if c.eq_ignore_ascii_case(&'p') && self.next_few_characters_are_case_insensitive("UBLIC") => {
                self.consume_string("UBLIC");
                self.switch_to(TokenizerState::AfterDoctypePublicKeyword);
            }
            Some(c) if c.eq_ignore_ascii_case(&'s') && self.next_few_characters_are_case_insensitive("YSTEM") => {
                self.consume_string("YSTEM");
                self.switch_to(TokenizerState::AfterDoctypeSystemKeyword);
            }
            // "Otherwise, this is an invalid-character-sequence-after-doctype-name
            // parse error. Set the current DOCTYPE token's force-quirks flag to on.
            // Reconsume in the bogus DOCTYPE state."
            Some(_) => {
                self.parse_error(ParseErrorCode::InvalidCharacterSequenceAfterDoctypeName);
                self.with_doctype(Token::set_force_quirks);
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    pub(super) fn handle_after_doctype_keyword_state(&mut self, public: bool) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(if public {
                    TokenizerState::BeforeDoctypePublicIdentifier
                } else {
                    TokenizerState::BeforeDoctypeSystemIdentifier
                });
            }
            // "This is a missing-whitespace-after-doctype-public-keyword parse
            // error. Set the current DOCTYPE token's public identifier to the
            // empty string (not missing), then switch to the DOCTYPE public
            // identifier (double-quoted) state."
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(if public {
                    ParseErrorCode::MissingWhitespaceAfterDoctypePublicKeyword
                } else {
                    ParseErrorCode::MissingWhitespaceAfterDoctypeSystemKeyword
                });
                self.begin_doctype_identifier(public, quote);
            }
            Some('>') => self.missing_doctype_identifier(public),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(public),
        }
    }

    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    pub(super) fn handle_before_doctype_identifier_state(&mut self, public: bool) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some(quote @ ('"' | '\'')) => self.begin_doctype_identifier(public, quote),
            Some('>') => self.missing_doctype_identifier(public),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(public),
        }
    }

    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    /// and its single-quoted and system identifier siblings.
    pub(super) fn handle_doctype_identifier_quoted_state(&mut self, public: bool, quote: char) {
        match self.current_input_character {
            Some(c) if c == quote => {
                self.switch_to(if public {
                    TokenizerState::AfterDoctypePublicIdentifier
                } else {
                    TokenizerState::AfterDoctypeSystemIdentifier
                });
            }
            Some('\0') => {
                self.parse_error(ParseErrorCode::UnexpectedNullCharacter);
                self.append_to_doctype_identifier(public, '\u{FFFD}');
            }
            // "This is an abrupt-doctype-public-identifier parse error. Set the
            // current DOCTYPE token's force-quirks flag to on. Switch to the data
            // state. Emit the current DOCTYPE token."
            Some('>') => {
                self.parse_error(if public {
                    ParseErrorCode::AbruptDoctypePublicIdentifier
                } else {
                    ParseErrorCode::AbruptDoctypeSystemIdentifier
                });
                self.with_doctype(Token::set_force_quirks);
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            Some(c) => self.append_to_doctype_identifier(public, c),
        }
    }

    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    pub(super) fn handle_after_doctype_public_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {
                self.switch_to(TokenizerState::BetweenDoctypePublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(quote @ ('"' | '\'')) => {
                self.parse_error(
                    ParseErrorCode::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.begin_doctype_identifier(false, quote);
            }
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(false),
        }
    }

    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    pub(super) fn handle_between_doctype_public_and_system_identifiers_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some(quote @ ('"' | '\'')) => self.begin_doctype_identifier(false, quote),
            None => self.eof_in_doctype(),
            Some(_) => self.missing_quote_before_doctype_identifier(false),
        }
    }

    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    pub(super) fn handle_after_doctype_system_identifier_state(&mut self) {
        match self.current_input_character {
            Some(c) if Self::is_whitespace_char(c) => {}
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            None => self.eof_in_doctype(),
            // "This is an unexpected-character-after-doctype-system-identifier
            // parse error. Reconsume in the bogus DOCTYPE state. (This does not
            // set the current DOCTYPE token's force-quirks flag to on.)"
            Some(_) => {
                self.parse_error(ParseErrorCode::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(TokenizerState::BogusDoctype);
            }
        }
    }

    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    pub(super) fn handle_bogus_doctype_state(&mut self) {
        match self.current_input_character {
            Some('>') => {
                self.switch_to(TokenizerState::Data);
                self.emit_token();
            }
            Some('\0') => self.parse_error(ParseErrorCode::UnexpectedNullCharacter),
            None => self.emit_token_then_eof(),
            Some(_) => {}
        }
    }

    fn with_doctype(&mut self, f: impl FnOnce(&mut Token)) {
        if let Some(token) = self.current_token.as_mut() {
            f(token);
        }
    }

    /// Set the identifier to the empty string and switch to its quoted state.
    fn begin_doctype_identifier(&mut self, public: bool, quote: char) {
        let next = match (public, quote) {
            (true, '"') => TokenizerState::DoctypePublicIdentifierDoubleQuoted,
            (true, _) => TokenizerState::DoctypePublicIdentifierSingleQuoted,
            (false, '"') => TokenizerState::DoctypeSystemIdentifierDoubleQuoted,
            (false, _) => TokenizerState::DoctypeSystemIdentifierSingleQuoted,
        };
        if public {
            self.with_doctype(Token::clear_public_identifier);
        } else {
            self.with_doctype(Token::clear_system_identifier);
        }
        self.switch_to(next);
    }

    fn append_to_doctype_identifier(&mut self, public: bool, c: char) {
        if public {
            self.with_doctype(|t| t.append_to_public_identifier(c));
        } else {
            self.with_doctype(|t| t.append_to_system_identifier(c));
        }
    }

    /// "This is a missing-doctype-public-identifier parse error. Set the current
    /// DOCTYPE token's force-quirks flag to on. Switch to the data state. Emit
    /// the current DOCTYPE token."
    fn missing_doctype_identifier(&mut self, public: bool) {
        self.parse_error(if public {
            ParseErrorCode::MissingDoctypePublicIdentifier
        } else {
            ParseErrorCode::MissingDoctypeSystemIdentifier
        });
        self.with_doctype(Token::set_force_quirks);
        self.switch_to(TokenizerState::Data);
        self.emit_token();
    }

    /// "This is a missing-quote-before-doctype-public-identifier parse error. Set
    /// the current DOCTYPE token's force-quirks flag to on. Reconsume in the
    /// bogus DOCTYPE state."
    fn missing_quote_before_doctype_identifier(&mut self, public: bool) {
        self.parse_error(if public {
            ParseErrorCode::MissingQuoteBeforeDoctypePublicIdentifier
        } else {
            ParseErrorCode::MissingQuoteBeforeDoctypeSystemIdentifier
        });
        self.with_doctype(Token::set_force_quirks);
        self.reconsume_in(TokenizerState::BogusDoctype);
    }

    /// "This is an eof-in-doctype parse error. Set the current DOCTYPE token's
    /// force-quirks flag to on. Emit the current DOCTYPE token. Emit an
    /// end-of-file token."
    fn eof_in_doctype(&mut self) {
        self.parse_error(ParseErrorCode::EofInDoctype);
        self.with_doctype(Token::set_force_quirks);
        self.emit_token_then_eof();
    }
}

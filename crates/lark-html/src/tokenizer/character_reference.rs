//! Character reference states (§ 13.2.5.72 - § 13.2.5.80).

use super::core::{HTMLTokenizer, TokenizerState};
use super::named_character_references::longest_match;
use crate::error::ParseErrorCode;

/// [§ 13.2.5.80](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
///
/// Numeric references to C1 controls that Windows-1252 assigns a printable
/// character. Indexed by `code - 0x80`; zero entries are left alone.
const C1_REPLACEMENTS: [u32; 32] = [
    0x20AC, 0, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, // 0x80
    0x02C6, 0x2030, 0x0160, 0x2039, 0x0152, 0, 0x017D, 0, // 0x88
    0, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022, 0x2013, 0x2014, // 0x90
    0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0, 0x017E, 0x0178, // 0x98
];

impl HTMLTokenizer {
    /// "If the return state is either the attribute value (double-quoted)
    /// state, the attribute value (single-quoted) state or the attribute value
    /// (unquoted) state, then the character reference was consumed as part of
    /// an attribute."
    pub(super) const fn is_consumed_as_part_of_attribute(&self) -> bool {
        matches!(
            self.return_state,
            TokenizerState::AttributeValueDoubleQuoted
                | TokenizerState::AttributeValueSingleQuoted
                | TokenizerState::AttributeValueUnquoted
        )
    }

    /// "Flush code points consumed as a character reference": append the
    /// temporary buffer to the current attribute's value, or emit it as
    /// character tokens.
    pub(super) fn flush_code_points_consumed_as_character_reference(&mut self) {
        let buffer = std::mem::take(&mut self.temporary_buffer);
        self.flush_str(&buffer);
    }

    fn flush_str(&mut self, s: &str) {
        if self.is_consumed_as_part_of_attribute() {
            if let Some(token) = self.current_token.as_mut() {
                token.append_str_to_current_attribute_value(s);
            }
        } else {
            self.emit_characters(s);
        }
    }

    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    pub(super) fn handle_character_reference_state(&mut self) {
        // "Set the temporary buffer to the empty string. Append a U+0026
        // AMPERSAND (&) character to the temporary buffer."
        self.temporary_buffer.clear();
        self.temporary_buffer.push('&');

        match self.current_input_character {
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(TokenizerState::NamedCharacterReference);
            }
            Some('#') => {
                self.temporary_buffer.push('#');
                self.switch_to(TokenizerState::NumericCharacterReference);
            }
            _ => {
                self.flush_code_points_consumed_as_character_reference();
                self.reconsume_in_return_state();
            }
        }
    }

    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    ///
    /// Entered by reconsuming the first alphanumeric, so the walk starts one
    /// character behind the input position.
    pub(super) fn handle_named_character_reference_state(&mut self) {
        let first_len = self.current_input_character.map_or(0, char::len_utf8);
        let start = self.current_pos - first_len;

        let Some((len, replacement)) = longest_match(&self.input[start..]) else {
            // "Otherwise - Flush code points consumed as a character reference.
            // Switch to the ambiguous ampersand state."
            //
            // Only the ampersand is flushed; the alphanumerics are emitted by
            // the ambiguous ampersand state one at a time.
            self.flush_code_points_consumed_as_character_reference();
            self.current_pos = start;
            self.switch_to(TokenizerState::AmbiguousAmpersand);
            return;
        };

        self.current_pos = start + len;
        let matched_semicolon = self.input[start..start + len].ends_with(';');
        self.temporary_buffer.push_str(&self.input[start..start + len]);

        // "If the character reference was consumed as part of an attribute, and
        // the last character matched is not a U+003B SEMICOLON character (;),
        // and the next input character is either a U+003D EQUALS SIGN character
        // (=) or an ASCII alphanumeric, then, for historical reasons, flush code
        // points consumed as a character reference and switch to the return
        // state."
        if self.is_consumed_as_part_of_attribute()
            && !matched_semicolon
            && self
                .peek_codepoint(0)
                .is_some_and(|c| c == '=' || c.is_ascii_alphanumeric())
        {
            self.flush_code_points_consumed_as_character_reference();
            self.switch_to(self.return_state);
            return;
        }

        if !matched_semicolon {
            self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
        }
        // "Set the temporary buffer to the empty string. Append one or two
        // characters corresponding to the character reference name to the
        // temporary buffer. Flush code points consumed as a character
        // reference. Switch to the return state."
        self.temporary_buffer = replacement;
        self.flush_code_points_consumed_as_character_reference();
        self.switch_to(self.return_state);
    }

    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    pub(super) fn handle_ambiguous_ampersand_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_alphanumeric() => {
                let mut buf = [0; 4];
                self.flush_str(c.encode_utf8(&mut buf));
            }
            Some(';') => {
                self.parse_error(ParseErrorCode::UnknownNamedCharacterReference);
                self.reconsume_in_return_state();
            }
            _ => self.reconsume_in_return_state(),
        }
    }

    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    pub(super) fn handle_numeric_character_reference_state(&mut self) {
        // "Set the character reference code to zero (0)."
        self.character_reference_code = 0;
        match self.current_input_character {
            Some(c @ ('x' | 'X')) => {
                self.temporary_buffer.push(c);
                self.switch_to(TokenizerState::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(TokenizerState::DecimalCharacterReferenceStart),
        }
    }

    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    pub(super) fn handle_hexadecimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(TokenizerState::HexadecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    pub(super) fn handle_decimal_character_reference_start_state(&mut self) {
        match self.current_input_character {
            Some(c) if c.is_ascii_digit() => {
                self.reconsume_in(TokenizerState::DecimalCharacterReference);
            }
            _ => self.absence_of_digits(),
        }
    }

    /// "This is an absence-of-digits-in-numeric-character-reference parse
    /// error. Flush code points consumed as a character reference. Reconsume
    /// in the return state."
    fn absence_of_digits(&mut self) {
        self.parse_error(ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference);
        self.flush_code_points_consumed_as_character_reference();
        self.reconsume_in_return_state();
    }

    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    pub(super) fn handle_hexadecimal_character_reference_state(&mut self) {
        self.accumulate_digit(16);
    }

    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    pub(super) fn handle_decimal_character_reference_state(&mut self) {
        self.accumulate_digit(10);
    }

    fn accumulate_digit(&mut self, radix: u32) {
        match self.current_input_character {
            Some(c) if c.is_digit(radix) => {
                let digit = c.to_digit(radix).unwrap_or(0);
                // Saturate just past the Unicode range; the end state only
                // needs to know the value is too large.
                self.character_reference_code = self
                    .character_reference_code
                    .saturating_mul(radix)
                    .saturating_add(digit)
                    .min(0x11_0000);
            }
            Some(';') => self.switch_to(TokenizerState::NumericCharacterReferenceEnd),
            _ => {
                self.parse_error(ParseErrorCode::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(TokenizerState::NumericCharacterReferenceEnd);
            }
        }
    }

    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    ///
    /// Runs without consuming. A pending reconsume carries over to the return
    /// state.
    pub(super) fn handle_numeric_character_reference_end_state(&mut self) {
        let mut code = self.character_reference_code;

        match code {
            0 => {
                self.parse_error(ParseErrorCode::NullCharacterReference);
                code = 0xFFFD;
            }
            0x11_0000.. => {
                self.parse_error(ParseErrorCode::CharacterReferenceOutsideUnicodeRange);
                code = 0xFFFD;
            }
            0xD800..=0xDFFF => {
                self.parse_error(ParseErrorCode::SurrogateCharacterReference);
                code = 0xFFFD;
            }
            _ if is_noncharacter(code) => {
                self.parse_error(ParseErrorCode::NoncharacterCharacterReference);
            }
            _ if code == 0x0D || (is_control(code) && !matches!(code, 0x09 | 0x0A | 0x0C | 0x20)) => {
                self.parse_error(ParseErrorCode::ControlCharacterReference);
                if (0x80..=0x9F).contains(&code) {
                    let replacement = C1_REPLACEMENTS[(code - 0x80) as usize];
                    if replacement != 0 {
                        code = replacement;
                    }
                }
            }
            _ => {}
        }

        // "Set the temporary buffer to the empty string. Append a code point
        // equal to the character reference code to the temporary buffer. Flush
        // code points consumed as a character reference. Switch to the return
        // state."
        self.temporary_buffer.clear();
        self.temporary_buffer
            .push(char::from_u32(code).unwrap_or('\u{FFFD}'));
        self.flush_code_points_consumed_as_character_reference();
        self.state = self.return_state;
    }
}

/// [noncharacter](https://infra.spec.whatwg.org/#noncharacter)
const fn is_noncharacter(code: u32) -> bool {
    matches!(code, 0xFDD0..=0xFDEF) || (code & 0xFFFE) == 0xFFFE
}

/// [control](https://infra.spec.whatwg.org/#control): a C0 control or a code
/// point in U+007F DELETE to U+009F.
const fn is_control(code: u32) -> bool {
    matches!(code, 0x00..=0x1F | 0x7F..=0x9F)
}

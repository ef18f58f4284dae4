use std::collections::VecDeque;

use strum_macros::Display;

use super::token::Token;
use crate::error::ParseIssue;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer state machine. Each state corresponds to a section in § 13.2.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum TokenizerState {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    Rcdata,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    Rawtext,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    Plaintext,
    /// § 13.2.5.6 Tag open state
    TagOpen,
    /// § 13.2.5.7 End tag open state
    EndTagOpen,
    /// § 13.2.5.8 Tag name state
    TagName,
    /// § 13.2.5.9 RCDATA less-than sign state
    RcdataLessThanSign,
    /// § 13.2.5.10 RCDATA end tag open state
    RcdataEndTagOpen,
    /// § 13.2.5.11 RCDATA end tag name state
    RcdataEndTagName,
    /// § 13.2.5.12 RAWTEXT less-than sign state
    RawtextLessThanSign,
    /// § 13.2.5.13 RAWTEXT end tag open state
    RawtextEndTagOpen,
    /// § 13.2.5.14 RAWTEXT end tag name state
    RawtextEndTagName,
    /// § 13.2.5.15 Script data less-than sign state
    ScriptDataLessThanSign,
    /// § 13.2.5.16 Script data end tag open state
    ScriptDataEndTagOpen,
    /// § 13.2.5.17 Script data end tag name state
    ScriptDataEndTagName,
    /// § 13.2.5.18 Script data escape start state
    ScriptDataEscapeStart,
    /// § 13.2.5.19 Script data escape start dash state
    ScriptDataEscapeStartDash,
    /// § 13.2.5.20 Script data escaped state
    ScriptDataEscaped,
    /// § 13.2.5.21 Script data escaped dash state
    ScriptDataEscapedDash,
    /// § 13.2.5.22 Script data escaped dash dash state
    ScriptDataEscapedDashDash,
    /// § 13.2.5.23 Script data escaped less-than sign state
    ScriptDataEscapedLessThanSign,
    /// § 13.2.5.24 Script data escaped end tag open state
    ScriptDataEscapedEndTagOpen,
    /// § 13.2.5.25 Script data escaped end tag name state
    ScriptDataEscapedEndTagName,
    /// § 13.2.5.26 Script data double escape start state
    ScriptDataDoubleEscapeStart,
    /// § 13.2.5.27 Script data double escaped state
    ScriptDataDoubleEscaped,
    /// § 13.2.5.28 Script data double escaped dash state
    ScriptDataDoubleEscapedDash,
    /// § 13.2.5.29 Script data double escaped dash dash state
    ScriptDataDoubleEscapedDashDash,
    /// § 13.2.5.30 Script data double escaped less-than sign state
    ScriptDataDoubleEscapedLessThanSign,
    /// § 13.2.5.31 Script data double escape end state
    ScriptDataDoubleEscapeEnd,
    /// § 13.2.5.32 Before attribute name state
    BeforeAttributeName,
    /// § 13.2.5.33 Attribute name state
    AttributeName,
    /// § 13.2.5.34 After attribute name state
    AfterAttributeName,
    /// § 13.2.5.35 Before attribute value state
    BeforeAttributeValue,
    /// § 13.2.5.36 Attribute value (double-quoted) state
    AttributeValueDoubleQuoted,
    /// § 13.2.5.37 Attribute value (single-quoted) state
    AttributeValueSingleQuoted,
    /// § 13.2.5.38 Attribute value (unquoted) state
    AttributeValueUnquoted,
    /// § 13.2.5.39 After attribute value (quoted) state
    AfterAttributeValueQuoted,
    /// § 13.2.5.40 Self-closing start tag state
    SelfClosingStartTag,
    /// § 13.2.5.41 Bogus comment state
    BogusComment,
    /// § 13.2.5.42 Markup declaration open state
    MarkupDeclarationOpen,
    /// § 13.2.5.43 Comment start state
    CommentStart,
    /// § 13.2.5.44 Comment start dash state
    CommentStartDash,
    /// § 13.2.5.45 Comment state
    Comment,
    /// § 13.2.5.46 Comment less-than sign state
    CommentLessThanSign,
    /// § 13.2.5.47 Comment less-than sign bang state
    CommentLessThanSignBang,
    /// § 13.2.5.48 Comment less-than sign bang dash state
    CommentLessThanSignBangDash,
    /// § 13.2.5.49 Comment less-than sign bang dash dash state
    CommentLessThanSignBangDashDash,
    /// § 13.2.5.50 Comment end dash state
    CommentEndDash,
    /// § 13.2.5.51 Comment end state
    CommentEnd,
    /// § 13.2.5.52 Comment end bang state
    CommentEndBang,
    /// § 13.2.5.53 DOCTYPE state
    Doctype,
    /// § 13.2.5.54 Before DOCTYPE name state
    BeforeDoctypeName,
    /// § 13.2.5.55 DOCTYPE name state
    DoctypeName,
    /// § 13.2.5.56 After DOCTYPE name state
    AfterDoctypeName,
    /// § 13.2.5.57 After DOCTYPE public keyword state
    AfterDoctypePublicKeyword,
    /// § 13.2.5.58 Before DOCTYPE public identifier state
    BeforeDoctypePublicIdentifier,
    /// § 13.2.5.59 DOCTYPE public identifier (double-quoted) state
    DoctypePublicIdentifierDoubleQuoted,
    /// § 13.2.5.60 DOCTYPE public identifier (single-quoted) state
    DoctypePublicIdentifierSingleQuoted,
    /// § 13.2.5.61 After DOCTYPE public identifier state
    AfterDoctypePublicIdentifier,
    /// § 13.2.5.62 Between DOCTYPE public and system identifiers state
    BetweenDoctypePublicAndSystemIdentifiers,
    /// § 13.2.5.63 After DOCTYPE system keyword state
    AfterDoctypeSystemKeyword,
    /// § 13.2.5.64 Before DOCTYPE system identifier state
    BeforeDoctypeSystemIdentifier,
    /// § 13.2.5.65 DOCTYPE system identifier (double-quoted) state
    DoctypeSystemIdentifierDoubleQuoted,
    /// § 13.2.5.66 DOCTYPE system identifier (single-quoted) state
    DoctypeSystemIdentifierSingleQuoted,
    /// § 13.2.5.67 After DOCTYPE system identifier state
    AfterDoctypeSystemIdentifier,
    /// § 13.2.5.68 Bogus DOCTYPE state
    BogusDoctype,
    /// § 13.2.5.69 CDATA section state
    CdataSection,
    /// § 13.2.5.70 CDATA section bracket state
    CdataSectionBracket,
    /// § 13.2.5.71 CDATA section end state
    CdataSectionEnd,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    CharacterReference,
    /// § 13.2.5.73 Named character reference state
    NamedCharacterReference,
    /// § 13.2.5.74 Ambiguous ampersand state
    AmbiguousAmpersand,
    /// § 13.2.5.75 Numeric character reference state
    NumericCharacterReference,
    /// § 13.2.5.76 Hexadecimal character reference start state
    HexadecimalCharacterReferenceStart,
    /// § 13.2.5.77 Decimal character reference start state
    DecimalCharacterReferenceStart,
    /// § 13.2.5.78 Hexadecimal character reference state
    HexadecimalCharacterReference,
    /// § 13.2.5.79 Decimal character reference state
    DecimalCharacterReference,
    /// § 13.2.5.80 Numeric character reference end state
    NumericCharacterReferenceEnd,
}

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "Implementations must act as if they used the following state machine to tokenize HTML."
///
/// The tokenizer is pull-based: [`HTMLTokenizer::next_token`] runs the state
/// machine only until at least one token is available. This lets the tree
/// builder switch the tokenizer state (for `<title>`, `<script>`, ...) between
/// tokens, as § 13.2.6 requires.
pub struct HTMLTokenizer {
    pub(super) state: TokenizerState,
    pub(super) return_state: TokenizerState,
    /// Input after newline normalization.
    pub(super) input: String,
    /// Byte offset of the next input character.
    pub(super) current_pos: usize,
    pub(super) current_input_character: Option<char>,
    pub(super) current_token: Option<Token>,
    /// Set once the end-of-file token has been queued.
    pub(super) at_eof: bool,
    pub(super) token_stream: VecDeque<Token>,
    // When true, the next step will not consume a new character.
    // "Reconsume in the X state" sets this flag.
    pub(super) reconsume: bool,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-end-tag-token)
    /// "An appropriate end tag token is an end tag token whose tag name matches
    /// the tag name of the last start tag to have been emitted from this
    /// tokenizer, if any."
    pub(super) last_start_tag_name: Option<String>,

    /// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#temporary-buffer)
    pub(super) temporary_buffer: String,

    /// [§ 13.2.5.75](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-code)
    pub(super) character_reference_code: u32,

    /// Set when the attribute being built repeats an earlier name; the
    /// attribute is dropped once it is complete.
    pub(super) drop_current_attribute: bool,

    /// Whether `<![CDATA[` opens a CDATA section, i.e. whether the adjusted
    /// current node is an element outside the HTML namespace.
    pub(super) allow_cdata: bool,

    pub(super) issues: Vec<ParseIssue>,
    pub(super) log_issues: bool,

    /// Set once the iterator has yielded the end-of-file token.
    eof_yielded: bool,
}

impl HTMLTokenizer {
    /// Create a new tokenizer for the given input.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    /// "Before the tokenization stage, the input stream must be preprocessed by
    /// normalizing newlines." CRLF pairs and lone CRs both become LF.
    ///
    /// "The initial state is the data state."
    #[must_use]
    pub fn new(input: &str) -> Self {
        let input = if input.contains('\r') {
            input.replace("\r\n", "\n").replace('\r', "\n")
        } else {
            input.to_string()
        };

        Self {
            state: TokenizerState::Data,
            return_state: TokenizerState::Data,
            input,
            current_pos: 0,
            current_input_character: None,
            current_token: None,
            at_eof: false,
            token_stream: VecDeque::new(),
            reconsume: false,
            last_start_tag_name: None,
            temporary_buffer: String::new(),
            character_reference_code: 0,
            drop_current_attribute: false,
            allow_cdata: false,
            issues: Vec::new(),
            log_issues: false,
            eof_yielded: false,
        }
    }

    /// Report parse errors through [`lark_common::warning::warn_once`] as
    /// they are found, in addition to collecting them.
    pub const fn set_log_issues(&mut self, log_issues: bool) {
        self.log_issues = log_issues;
    }

    /// The current state of the state machine.
    #[must_use]
    pub const fn state(&self) -> TokenizerState {
        self.state
    }

    /// Switch the state machine, as the tree builder does for raw text
    /// elements: "switch the tokenizer to the RCDATA state".
    pub const fn set_state(&mut self, state: TokenizerState) {
        self.state = state;
    }

    /// Set the name used for the "appropriate end tag token" check.
    pub fn set_last_start_tag_name(&mut self, name: Option<&str>) {
        self.last_start_tag_name = name.map(str::to_string);
    }

    /// [§ 13.2.5.42](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace, then switch to the CDATA section state."
    pub const fn set_allow_cdata(&mut self, allow: bool) {
        self.allow_cdata = allow;
    }

    /// Byte offset of the next unconsumed input character.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.current_pos
    }

    /// Take the parse errors found so far.
    pub fn take_issues(&mut self) -> Vec<ParseIssue> {
        std::mem::take(&mut self.issues)
    }

    /// Produce the next token.
    ///
    /// Once the input is exhausted this returns [`Token::EndOfFile`] on every
    /// call.
    pub fn next_token(&mut self) -> Token {
        loop {
            if let Some(token) = self.token_stream.pop_front() {
                return token;
            }
            if self.at_eof {
                return Token::EndOfFile;
            }
            self.step();
        }
    }

    /// Run one transition of the state machine.
    fn step(&mut self) {
        // These two states inspect the input without consuming a character.
        match self.state {
            TokenizerState::MarkupDeclarationOpen => {
                self.handle_markup_declaration_open_state();
                return;
            }
            TokenizerState::NumericCharacterReferenceEnd => {
                self.handle_numeric_character_reference_end_state();
                return;
            }
            _ => {}
        }

        // Each state begins by consuming the next input character,
        // unless we're reconsuming from a previous state transition.
        if self.reconsume {
            self.reconsume = false;
        } else {
            self.current_input_character = self.consume();
        }

        match self.state {
            TokenizerState::Data => self.handle_data_state(),
            TokenizerState::Rcdata => self.handle_rcdata_state(),
            TokenizerState::Rawtext => self.handle_rawtext_state(),
            TokenizerState::ScriptData => self.handle_script_data_state(),
            TokenizerState::Plaintext => self.handle_plaintext_state(),
            TokenizerState::TagOpen => self.handle_tag_open_state(),
            TokenizerState::EndTagOpen => self.handle_end_tag_open_state(),
            TokenizerState::TagName => self.handle_tag_name_state(),
            TokenizerState::RcdataLessThanSign => {
                self.handle_raw_less_than_sign_state(TokenizerState::Rcdata);
            }
            TokenizerState::RcdataEndTagOpen => {
                self.handle_raw_end_tag_open_state(TokenizerState::Rcdata);
            }
            TokenizerState::RcdataEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::Rcdata);
            }
            TokenizerState::RawtextLessThanSign => {
                self.handle_raw_less_than_sign_state(TokenizerState::Rawtext);
            }
            TokenizerState::RawtextEndTagOpen => {
                self.handle_raw_end_tag_open_state(TokenizerState::Rawtext);
            }
            TokenizerState::RawtextEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::Rawtext);
            }
            TokenizerState::ScriptDataLessThanSign => {
                self.handle_script_data_less_than_sign_state();
            }
            TokenizerState::ScriptDataEndTagOpen => {
                self.handle_raw_end_tag_open_state(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::ScriptData);
            }
            TokenizerState::ScriptDataEscapeStart => self.handle_script_data_escape_start_state(),
            TokenizerState::ScriptDataEscapeStartDash => {
                self.handle_script_data_escape_start_dash_state();
            }
            TokenizerState::ScriptDataEscaped => self.handle_script_data_escaped_state(),
            TokenizerState::ScriptDataEscapedDash => self.handle_script_data_escaped_dash_state(),
            TokenizerState::ScriptDataEscapedDashDash => {
                self.handle_script_data_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataEscapedLessThanSign => {
                self.handle_script_data_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataEscapedEndTagOpen => {
                self.handle_raw_end_tag_open_state(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataEscapedEndTagName => {
                self.handle_raw_end_tag_name_state(TokenizerState::ScriptDataEscaped);
            }
            TokenizerState::ScriptDataDoubleEscapeStart => {
                self.handle_script_data_double_escape_start_state();
            }
            TokenizerState::ScriptDataDoubleEscaped => {
                self.handle_script_data_double_escaped_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDash => {
                self.handle_script_data_double_escaped_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedDashDash => {
                self.handle_script_data_double_escaped_dash_dash_state();
            }
            TokenizerState::ScriptDataDoubleEscapedLessThanSign => {
                self.handle_script_data_double_escaped_less_than_sign_state();
            }
            TokenizerState::ScriptDataDoubleEscapeEnd => {
                self.handle_script_data_double_escape_end_state();
            }
            TokenizerState::BeforeAttributeName => self.handle_before_attribute_name_state(),
            TokenizerState::AttributeName => self.handle_attribute_name_state(),
            TokenizerState::AfterAttributeName => self.handle_after_attribute_name_state(),
            TokenizerState::BeforeAttributeValue => self.handle_before_attribute_value_state(),
            TokenizerState::AttributeValueDoubleQuoted => {
                self.handle_attribute_value_quoted_state('"');
            }
            TokenizerState::AttributeValueSingleQuoted => {
                self.handle_attribute_value_quoted_state('\'');
            }
            TokenizerState::AttributeValueUnquoted => self.handle_attribute_value_unquoted_state(),
            TokenizerState::AfterAttributeValueQuoted => {
                self.handle_after_attribute_value_quoted_state();
            }
            TokenizerState::SelfClosingStartTag => self.handle_self_closing_start_tag_state(),
            TokenizerState::BogusComment => self.handle_bogus_comment_state(),
            TokenizerState::CommentStart => self.handle_comment_start_state(),
            TokenizerState::CommentStartDash => self.handle_comment_start_dash_state(),
            TokenizerState::Comment => self.handle_comment_state(),
            TokenizerState::CommentLessThanSign => self.handle_comment_less_than_sign_state(),
            TokenizerState::CommentLessThanSignBang => {
                self.handle_comment_less_than_sign_bang_state();
            }
            TokenizerState::CommentLessThanSignBangDash => {
                self.handle_comment_less_than_sign_bang_dash_state();
            }
            TokenizerState::CommentLessThanSignBangDashDash => {
                self.handle_comment_less_than_sign_bang_dash_dash_state();
            }
            TokenizerState::CommentEndDash => self.handle_comment_end_dash_state(),
            TokenizerState::CommentEnd => self.handle_comment_end_state(),
            TokenizerState::CommentEndBang => self.handle_comment_end_bang_state(),
            TokenizerState::Doctype => self.handle_doctype_state(),
            TokenizerState::BeforeDoctypeName => self.handle_before_doctype_name_state(),
            TokenizerState::DoctypeName => self.handle_doctype_name_state(),
            TokenizerState::AfterDoctypeName => self.handle_after_doctype_name_state(),
            TokenizerState::AfterDoctypePublicKeyword => {
                self.handle_after_doctype_keyword_state(true);
            }
            TokenizerState::BeforeDoctypePublicIdentifier => {
                self.handle_before_doctype_identifier_state(true);
            }
            TokenizerState::DoctypePublicIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(true, '"');
            }
            TokenizerState::DoctypePublicIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(true, '\'');
            }
            TokenizerState::AfterDoctypePublicIdentifier => {
                self.handle_after_doctype_public_identifier_state();
            }
            TokenizerState::BetweenDoctypePublicAndSystemIdentifiers => {
                self.handle_between_doctype_public_and_system_identifiers_state();
            }
            TokenizerState::AfterDoctypeSystemKeyword => {
                self.handle_after_doctype_keyword_state(false);
            }
            TokenizerState::BeforeDoctypeSystemIdentifier => {
                self.handle_before_doctype_identifier_state(false);
            }
            TokenizerState::DoctypeSystemIdentifierDoubleQuoted => {
                self.handle_doctype_identifier_quoted_state(false, '"');
            }
            TokenizerState::DoctypeSystemIdentifierSingleQuoted => {
                self.handle_doctype_identifier_quoted_state(false, '\'');
            }
            TokenizerState::AfterDoctypeSystemIdentifier => {
                self.handle_after_doctype_system_identifier_state();
            }
            TokenizerState::BogusDoctype => self.handle_bogus_doctype_state(),
            TokenizerState::CdataSection => self.handle_cdata_section_state(),
            TokenizerState::CdataSectionBracket => self.handle_cdata_section_bracket_state(),
            TokenizerState::CdataSectionEnd => self.handle_cdata_section_end_state(),
            TokenizerState::CharacterReference => self.handle_character_reference_state(),
            TokenizerState::NamedCharacterReference => {
                self.handle_named_character_reference_state();
            }
            TokenizerState::AmbiguousAmpersand => self.handle_ambiguous_ampersand_state(),
            TokenizerState::NumericCharacterReference => {
                self.handle_numeric_character_reference_state();
            }
            TokenizerState::HexadecimalCharacterReferenceStart => {
                self.handle_hexadecimal_character_reference_start_state();
            }
            TokenizerState::DecimalCharacterReferenceStart => {
                self.handle_decimal_character_reference_start_state();
            }
            TokenizerState::HexadecimalCharacterReference => {
                self.handle_hexadecimal_character_reference_state();
            }
            TokenizerState::DecimalCharacterReference => {
                self.handle_decimal_character_reference_state();
            }
            // Handled above without consuming.
            TokenizerState::MarkupDeclarationOpen | TokenizerState::NumericCharacterReferenceEnd => {}
        }
    }
}

impl Iterator for HTMLTokenizer {
    type Item = Token;

    /// Yields every token including a single final [`Token::EndOfFile`].
    fn next(&mut self) -> Option<Token> {
        if self.eof_yielded {
            return None;
        }
        let token = self.next_token();
        if token.is_eof() {
            self.eof_yielded = true;
        }
        Some(token)
    }
}

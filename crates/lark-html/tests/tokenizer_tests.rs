//! Integration tests for the HTML tokenizer.

use lark_html::{HTMLTokenizer, ParseErrorCode, Token, TokenizerState};

/// Helper to tokenize a string and return the tokens
fn tokenize(input: &str) -> Vec<Token> {
    HTMLTokenizer::new(input).collect()
}

/// Helper to tokenize a string and return the tokens with the error codes
fn tokenize_with_errors(input: &str) -> (Vec<Token>, Vec<ParseErrorCode>) {
    let mut tokenizer = HTMLTokenizer::new(input);
    let tokens: Vec<Token> = tokenizer.by_ref().collect();
    let codes = tokenizer.take_issues().into_iter().map(|issue| issue.code).collect();
    (tokens, codes)
}

/// Helper to collect the character tokens into a string
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|token| match token {
            Token::Character { data } => Some(*data),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character { data: 'H' }));
    assert!(matches!(tokens[4], Token::Character { data: 'o' }));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_iterator_stops_after_eof() {
    let mut tokenizer = HTMLTokenizer::new("");
    assert_eq!(tokenizer.next(), Some(Token::EndOfFile));
    assert_eq!(tokenizer.next(), None);
    // The pull interface keeps answering EOF.
    assert_eq!(tokenizer.next_token(), Token::EndOfFile);
}

#[test]
fn test_newlines_are_normalized() {
    let tokens = tokenize("a\r\nb\rc");
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    assert_eq!(tokens.len(), 2); // DOCTYPE + EOF
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(public_identifier.is_none());
            assert!(system_identifier.is_none());
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_with_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE HTML PUBLIC "-//W3C//DTD HTML 4.01//EN" 'http://www.w3.org/TR/html4/strict.dtd'>"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_identifier,
            system_identifier,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_identifier.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_identifier.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
}

#[test]
fn test_doctype_without_name_forces_quirks() {
    let (tokens, errors) = tokenize_with_errors("<!DOCTYPE>");
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert!(name.is_none());
            assert!(force_quirks);
        }
        _ => panic!("Expected DOCTYPE token"),
    }
    assert_eq!(errors, vec![ParseErrorCode::MissingDoctypeName]);
}

#[test]
fn test_start_tag() {
    let tokens = tokenize("<div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert!(attributes.is_empty());
        }
        _ => panic!("Expected StartTag token"),
    }
}

#[test]
fn test_tag_and_attribute_names_are_lowercased() {
    let tokens = tokenize(r#"<DIV ID="Main" Class=a>"#);
    assert_eq!(tokens[0].tag_name(), Some("div"));
    assert_eq!(tokens[0].attribute("id"), Some("Main"));
    assert_eq!(tokens[0].attribute("class"), Some("a"));
}

#[test]
fn test_end_tag() {
    let tokens = tokenize("</div>");
    assert_eq!(tokens.len(), 2);
    match &tokens[0] {
        Token::EndTag { name, .. } => {
            assert_eq!(name, "div");
        }
        _ => panic!("Expected EndTag token"),
    }
}

#[test]
fn test_end_tag_with_attributes_is_an_error() {
    let (tokens, errors) = tokenize_with_errors(r#"</p class="x">"#);
    assert!(tokens[0].is_end_tag("p"));
    assert_eq!(errors, vec![ParseErrorCode::EndTagWithAttributes]);
}

#[test]
fn test_self_closing_tag() {
    let tokens = tokenize("<br/>");
    assert_eq!(tokens.len(), 2);
    assert!(tokens[0].is_start_tag("br"));
    assert!(tokens[0].is_self_closing());
}

#[test]
fn test_duplicate_attribute_keeps_first() {
    let (tokens, errors) = tokenize_with_errors(r#"<a href="one" HREF="two">"#);
    assert_eq!(tokens[0].attributes().len(), 1);
    assert_eq!(tokens[0].attribute("href"), Some("one"));
    assert_eq!(errors, vec![ParseErrorCode::DuplicateAttribute]);
}

#[test]
fn test_attribute_value_forms() {
    let tokens = tokenize(r#"<input a='single' b="double" c=bare d>"#);
    assert_eq!(tokens[0].attribute("a"), Some("single"));
    assert_eq!(tokens[0].attribute("b"), Some("double"));
    assert_eq!(tokens[0].attribute("c"), Some("bare"));
    assert_eq!(tokens[0].attribute("d"), Some(""));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: " hello ".to_string()
        }
    );
}

#[test]
fn test_abrupt_empty_comment() {
    let (tokens, errors) = tokenize_with_errors("<!-->");
    assert_eq!(tokens[0], Token::Comment { data: String::new() });
    assert_eq!(errors, vec![ParseErrorCode::AbruptClosingOfEmptyComment]);
}

#[test]
fn test_processing_instruction_becomes_bogus_comment() {
    let (tokens, errors) = tokenize_with_errors("<?xml version?>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "?xml version?".to_string()
        }
    );
    assert_eq!(
        errors,
        vec![ParseErrorCode::UnexpectedQuestionMarkInsteadOfTagName]
    );
}

#[test]
fn test_missing_end_tag_name_is_dropped() {
    let (tokens, errors) = tokenize_with_errors("</>x");
    assert_eq!(tokens, vec![Token::new_character('x'), Token::EndOfFile]);
    assert_eq!(errors, vec![ParseErrorCode::MissingEndTagName]);
}

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let (tokens, errors) = tokenize_with_errors("<div class");
    assert_eq!(tokens, vec![Token::EndOfFile]);
    assert_eq!(errors, vec![ParseErrorCode::EofInTag]);
}

#[test]
fn test_less_than_without_tag_name_is_text() {
    let (tokens, errors) = tokenize_with_errors("a < b");
    assert_eq!(text_of(&tokens), "a < b");
    assert_eq!(errors, vec![ParseErrorCode::InvalidFirstCharacterOfTagName]);
}

#[test]
fn test_named_character_references() {
    assert_eq!(text_of(&tokenize("&amp;&lt;&gt;")), "&<>");
    assert_eq!(text_of(&tokenize("&nbsp;")), "\u{A0}");
}

#[test]
fn test_named_reference_without_semicolon() {
    let (tokens, errors) = tokenize_with_errors("&notit;");
    assert_eq!(text_of(&tokens), "\u{AC}it;");
    assert_eq!(
        errors,
        vec![ParseErrorCode::MissingSemicolonAfterCharacterReference]
    );
}

#[test]
fn test_unknown_named_reference_is_kept() {
    let (tokens, errors) = tokenize_with_errors("&bogus;");
    assert_eq!(text_of(&tokens), "&bogus;");
    assert_eq!(errors, vec![ParseErrorCode::UnknownNamedCharacterReference]);
}

#[test]
fn test_named_reference_in_attribute_followed_by_alphanumeric() {
    // Legacy references in attribute values are left alone when the next
    // character is `=` or alphanumeric.
    let (tokens, errors) = tokenize_with_errors(r#"<a href="?a=1&copy=2">"#);
    assert_eq!(tokens[0].attribute("href"), Some("?a=1&copy=2"));
    assert!(errors.is_empty());

    let tokens = tokenize(r#"<a title="&copy;2024">"#);
    assert_eq!(tokens[0].attribute("title"), Some("\u{A9}2024"));
}

#[test]
fn test_numeric_character_references() {
    assert_eq!(text_of(&tokenize("&#65;&#x42;&#X43;")), "ABC");
}

#[test]
fn test_numeric_reference_replacements() {
    let (tokens, errors) = tokenize_with_errors("&#0;&#x80;&#x110000;");
    assert_eq!(text_of(&tokens), "\u{FFFD}\u{20AC}\u{FFFD}");
    assert_eq!(
        errors,
        vec![
            ParseErrorCode::NullCharacterReference,
            ParseErrorCode::ControlCharacterReference,
            ParseErrorCode::CharacterReferenceOutsideUnicodeRange,
        ]
    );
}

#[test]
fn test_numeric_reference_without_digits() {
    let (tokens, errors) = tokenize_with_errors("&#;");
    assert_eq!(text_of(&tokens), "&#;");
    assert_eq!(
        errors,
        vec![ParseErrorCode::AbsenceOfDigitsInNumericCharacterReference]
    );
}

#[test]
fn test_rcdata_only_ends_at_appropriate_end_tag() {
    let mut tokenizer = HTMLTokenizer::new("a</b>&amp;</title>");
    tokenizer.set_state(TokenizerState::Rcdata);
    tokenizer.set_last_start_tag_name(Some("title"));
    let tokens: Vec<Token> = tokenizer.collect();
    assert_eq!(text_of(&tokens), "a</b>&");
    assert!(tokens.iter().any(|token| token.is_end_tag("title")));
    assert!(!tokens.iter().any(|token| token.is_end_tag("b")));
}

#[test]
fn test_rawtext_ignores_character_references() {
    let mut tokenizer = HTMLTokenizer::new("&amp;<p></style>");
    tokenizer.set_state(TokenizerState::Rawtext);
    tokenizer.set_last_start_tag_name(Some("style"));
    let tokens: Vec<Token> = tokenizer.collect();
    assert_eq!(text_of(&tokens), "&amp;<p>");
    assert!(tokens[tokens.len() - 2].is_end_tag("style"));
}

#[test]
fn test_plaintext_never_ends() {
    let mut tokenizer = HTMLTokenizer::new("</plaintext><b>");
    tokenizer.set_state(TokenizerState::Plaintext);
    let tokens: Vec<Token> = tokenizer.collect();
    assert_eq!(text_of(&tokens), "</plaintext><b>");
}

#[test]
fn test_start_tag_sets_appropriate_end_tag() {
    let mut tokenizer = HTMLTokenizer::new("<textarea>x</textarea>");
    assert!(tokenizer.next_token().is_start_tag("textarea"));
    tokenizer.set_state(TokenizerState::Rcdata);
    assert_eq!(tokenizer.next_token(), Token::new_character('x'));
    assert!(tokenizer.next_token().is_end_tag("textarea"));
}

#[test]
fn test_script_data_escaped_comment() {
    let mut tokenizer = HTMLTokenizer::new("<!--<script></script>--></script>");
    tokenizer.set_state(TokenizerState::ScriptData);
    tokenizer.set_last_start_tag_name(Some("script"));
    let tokens: Vec<Token> = tokenizer.collect();
    assert_eq!(text_of(&tokens), "<!--<script></script>-->");
    assert_eq!(tokens.len(), "<!--<script></script>-->".len() + 2);
}

#[test]
fn test_cdata_outside_foreign_content_is_a_comment() {
    let (tokens, errors) = tokenize_with_errors("<![CDATA[x]]>");
    assert_eq!(
        tokens[0],
        Token::Comment {
            data: "[CDATA[x]]".to_string()
        }
    );
    assert_eq!(errors, vec![ParseErrorCode::CdataInHtmlContent]);
}

#[test]
fn test_cdata_in_foreign_content_is_text() {
    let mut tokenizer = HTMLTokenizer::new("<![CDATA[a<b]]>");
    tokenizer.set_allow_cdata(true);
    let tokens: Vec<Token> = tokenizer.collect();
    assert_eq!(text_of(&tokens), "a<b");
    assert_eq!(tokens.len(), 4);
}

#[test]
fn test_null_in_data_is_passed_through() {
    let (tokens, errors) = tokenize_with_errors("a\0b");
    assert_eq!(text_of(&tokens), "a\0b");
    assert_eq!(errors, vec![ParseErrorCode::UnexpectedNullCharacter]);
}

#[test]
fn test_issue_positions_are_increasing() {
    let mut tokenizer = HTMLTokenizer::new("<a x x></b y>");
    let _: Vec<Token> = tokenizer.by_ref().collect();
    let issues = tokenizer.take_issues();
    assert_eq!(issues.len(), 2);
    assert!(issues[0].position < issues[1].position);
}

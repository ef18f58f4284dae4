//! Parse errors and caller errors.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "This specification defines the parsing rules for HTML documents, whether
//! they are syntactically correct or not. Certain points in the parsing
//! algorithm are said to be parse errors. The error handling for parse errors
//! is well-defined."
//!
//! Parse errors never stop the parser: they are collected as [`ParseIssue`]s.
//! The only failure a caller sees is [`ParseError`].

use std::fmt;

use strum_macros::{Display, IntoStaticStr};
use thiserror::Error;

/// The kind of a parse error.
///
/// Tokenizer errors use the codes from the WHATWG error table; tree
/// construction errors (which the standard leaves unnamed) use descriptive
/// codes in the same style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorCode {
    // Tokenizer errors.
    /// `<!-->` or `<!--->`.
    AbruptClosingOfEmptyComment,
    /// `>` inside a DOCTYPE public identifier.
    AbruptDoctypePublicIdentifier,
    /// `>` inside a DOCTYPE system identifier.
    AbruptDoctypeSystemIdentifier,
    /// `&#` or `&#x` followed by no digits.
    AbsenceOfDigitsInNumericCharacterReference,
    /// `<![CDATA[` outside foreign content.
    CdataInHtmlContent,
    /// Numeric reference above U+10FFFF.
    CharacterReferenceOutsideUnicodeRange,
    /// Numeric reference to a control character.
    ControlCharacterReference,
    /// An attribute name repeated on one tag.
    DuplicateAttribute,
    /// An end tag carrying attributes.
    EndTagWithAttributes,
    /// `</a/>`.
    EndTagWithTrailingSolidus,
    /// Input ends right after `<` or `</`.
    EofBeforeTagName,
    /// Input ends inside a CDATA section.
    EofInCdata,
    /// Input ends inside a comment.
    EofInComment,
    /// Input ends inside a DOCTYPE.
    EofInDoctype,
    /// Input ends inside `<!--` within script data.
    EofInScriptHtmlCommentLikeText,
    /// Input ends inside a tag.
    EofInTag,
    /// A comment closed by `--!>`.
    IncorrectlyClosedComment,
    /// `<!` not followed by `--`, `DOCTYPE` or `[CDATA[`.
    IncorrectlyOpenedComment,
    /// Junk after the DOCTYPE name.
    InvalidCharacterSequenceAfterDoctypeName,
    /// `<` followed by something that cannot start a tag name.
    InvalidFirstCharacterOfTagName,
    /// `a=>`.
    MissingAttributeValue,
    /// `<!DOCTYPE>`.
    MissingDoctypeName,
    /// `PUBLIC` with no identifier.
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` with no identifier.
    MissingDoctypeSystemIdentifier,
    /// `</>`.
    MissingEndTagName,
    /// `PUBLIC` followed by an unquoted identifier.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// `SYSTEM` followed by an unquoted identifier.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// Named reference without a trailing `;`.
    MissingSemicolonAfterCharacterReference,
    /// `PUBLIC"`.
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `SYSTEM"`.
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `<!DOCTYPEhtml>`.
    MissingWhitespaceBeforeDoctypeName,
    /// `a="1"b="2"`.
    MissingWhitespaceBetweenAttributes,
    /// Public and system identifiers not separated by whitespace.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `<!--` inside a comment.
    NestedComment,
    /// Numeric reference to a noncharacter.
    NoncharacterCharacterReference,
    /// `<div/>` on a non-void HTML element.
    NonVoidHtmlElementStartTagWithTrailingSolidus,
    /// `&#0;`.
    NullCharacterReference,
    /// Numeric reference to a surrogate.
    SurrogateCharacterReference,
    /// Junk after the DOCTYPE system identifier.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `"`, `'` or `<` in an attribute name.
    UnexpectedCharacterInAttributeName,
    /// `"`, `'`, `<`, `=` or `` ` `` in an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `<a =b>`.
    UnexpectedEqualsSignBeforeAttributeName,
    /// U+0000 where it is not allowed.
    UnexpectedNullCharacter,
    /// `<?`.
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `/` inside a tag not directly before `>`.
    UnexpectedSolidusInTag,
    /// `&name;` that matches no known reference.
    UnknownNamedCharacterReference,

    // Tree construction errors.
    /// A document without a DOCTYPE, or with a non-conforming one.
    MissingDoctype,
    /// A DOCTYPE after the first element.
    UnexpectedDoctype,
    /// A start tag that is not allowed in the current insertion mode.
    UnexpectedStartTag,
    /// An end tag that is not allowed in the current insertion mode.
    UnexpectedEndTag,
    /// An end tag with no matching element in scope.
    EndTagWithoutMatchingOpenElement,
    /// Elements closed implicitly by an end tag for an ancestor.
    UnclosedElements,
    /// Formatting elements closed out of order (adoption agency).
    MisnestedTag,
    /// Non-whitespace text where only whitespace is allowed.
    UnexpectedCharacter,
    /// Text inside a table that had to be foster parented.
    FosterParentedCharacter,
    /// End of file with elements that require an end tag still open.
    EofWithUnclosedElements,
    /// A `</form>` or nested `<form>` that conflicts with the form pointer.
    MisnestedForm,
}

/// A parse error together with where it happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseIssue {
    /// What went wrong.
    pub code: ParseErrorCode,
    /// Byte offset into the newline-normalized input.
    pub position: usize,
}

impl ParseIssue {
    /// Create a new issue.
    #[must_use]
    pub const fn new(code: ParseErrorCode, position: usize) -> Self {
        Self { code, position }
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.code, self.position)
    }
}

/// Errors that fail a parse call outright.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The fragment context element cannot be used.
    #[error("invalid fragment context element {0:?}")]
    InvalidContext(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_use_whatwg_names() {
        assert_eq!(
            ParseErrorCode::EofBeforeTagName.to_string(),
            "eof-before-tag-name"
        );
        assert_eq!(
            ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus.to_string(),
            "non-void-html-element-start-tag-with-trailing-solidus"
        );
        assert_eq!(
            ParseIssue::new(ParseErrorCode::NestedComment, 7).to_string(),
            "nested-comment at 7"
        );
    }
}

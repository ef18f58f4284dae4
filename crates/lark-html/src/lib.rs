//! A WHATWG HTML parser.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization))
//!   - All 80 tokenizer states, including script data escapes and CDATA
//!   - Named and numeric character references
//!
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction))
//!   - All 23 insertion modes
//!   - Foster parenting, the adoption agency algorithm and formatting
//!     element reconstruction
//!   - SVG and MathML foreign content
//!   - DOCTYPE based quirks mode selection
//!   - Fragment parsing ([§ 13.2.9](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments))
//!
//! # Not Implemented
//!
//! - Script execution and `document.write`
//! - Byte stream decoding; input is already a `&str`
//!
//! # Example
//!
//! ```
//! use lark_html::parse_document;
//!
//! let tree = parse_document("<!DOCTYPE html><p>Hello");
//! let dump = tree.to_test_format(tree.root());
//! assert!(dump.contains("|     <p>\n|       \"Hello\""));
//! ```

/// Parse errors and caller errors.
pub mod error;
/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use error::{ParseError, ParseErrorCode, ParseIssue};
pub use parser::{
    FragmentContext, HTMLParser, InsertionMode, ParsedFragment, ParserOptions, TreeSink,
    parse_document, parse_fragment,
};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};

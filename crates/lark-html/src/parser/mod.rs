//! HTML tree construction.
//!
//! Implements [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
//! and [§ 13.2.9 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments).

mod adoption;
mod after_modes;
/// The tree builder state and the algorithms shared by the insertion modes.
pub mod core;
/// [`TreeSink`] for [`lark_dom::DomTree`].
pub mod dom_sink;
/// Tables and predicates for SVG and MathML content.
pub mod foreign_content;
/// The list of active formatting elements.
pub mod formatting;
mod head_modes;
/// The parser driver and the document/fragment entry points.
pub mod html_parser;
mod in_body;
mod in_foreign_content;
/// The stack of open elements.
pub mod open_elements;
/// DOCTYPE to document mode classification.
pub mod quirks;
mod select_modes;
mod table_modes;
mod template_mode;
/// The tree adapter trait.
pub mod tree_sink;

pub use core::{InsertionMode, TreeBuilder};
pub use html_parser::{
    FragmentContext, HTMLParser, ParsedFragment, ParserOptions, parse_document, parse_fragment,
};
pub use quirks::classify_doctype;
pub use tree_sink::TreeSink;

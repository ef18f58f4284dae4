//! HTML tokenizer module.
//!
//! Implements [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//! of the WHATWG HTML Living Standard.

/// Character reference states per § 13.2.5.72 - § 13.2.5.80.
pub mod character_reference;
/// The state machine and its driver.
pub mod core;
/// Helper methods for tokenizer state transitions.
pub mod helpers;
/// Comment, bogus comment and DOCTYPE states.
pub mod markup_states;
/// Named character reference lookup per § 13.5.
pub mod named_character_references;
/// Tag and attribute states.
pub mod tag_states;
/// Data, RCDATA, RAWTEXT, script data, PLAINTEXT and CDATA states.
pub mod text_states;
/// Token types produced by the tokenizer.
pub mod token;

pub use core::{HTMLTokenizer, TokenizerState};
pub use token::{Attribute, Token};

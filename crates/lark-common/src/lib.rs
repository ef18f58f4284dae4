//! Common utilities for the Lark HTML parser.
//!
//! This crate provides shared infrastructure used by the parser crates:
//! - **Warning System** - deduplicated, colored diagnostics on stderr

pub mod warning;

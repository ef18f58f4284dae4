//! Parser diagnostics with colored terminal output.
//!
//! Provides deduplication so a document with thousands of identical parse
//! errors only reports each distinct message once. Used by the tokenizer,
//! the tree builder and the CLI.

use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use owo_colors::OwoColorize;

/// Global set of warnings we've already printed (to deduplicate)
static WARNED: Mutex<Option<HashSet<String>>> = Mutex::new(None);

/// Report a diagnostic once per unique `(component, message)` pair.
///
/// Returns `true` if the message was printed, `false` if it had already been
/// reported since the last [`clear_warnings`].
///
/// # Example
/// ```ignore
/// warn_once("HTML Tokenizer", "eof-in-comment at 42");
/// ```
pub fn warn_once(component: &str, message: &str) -> bool {
    let key = format!("[{component}] {message}");
    let should_print = WARNED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get_or_insert_with(HashSet::new)
        .insert(key);

    if should_print {
        eprintln!("{}", format!("[Lark {component}] ⚠ {message}").yellow());
    }
    should_print
}

/// Clear all recorded warnings (call before parsing a new document)
pub fn clear_warnings() {
    let mut guard = WARNED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(set) = guard.as_mut() {
        set.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warn_once_deduplicates() {
        let component = "warning-unit-test";
        assert!(warn_once(component, "first"));
        assert!(!warn_once(component, "first"));
        assert!(warn_once(component, "second"));
    }
}

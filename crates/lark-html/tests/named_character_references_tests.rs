//! Integration tests for named character reference lookup.

use lark_html::tokenizer::named_character_references::{
    any_entity_has_prefix, longest_match, lookup_entity,
};

#[test]
fn test_lookup_common_entities() {
    assert_eq!(lookup_entity("amp;").as_deref(), Some("&"));
    assert_eq!(lookup_entity("lt;").as_deref(), Some("<"));
    assert_eq!(lookup_entity("gt;").as_deref(), Some(">"));
    assert_eq!(lookup_entity("quot;").as_deref(), Some("\""));
    assert_eq!(lookup_entity("nbsp;").as_deref(), Some("\u{00A0}"));
}

#[test]
fn test_lookup_legacy_entities() {
    // Legacy entities without semicolon
    assert_eq!(lookup_entity("amp").as_deref(), Some("&"));
    assert_eq!(lookup_entity("lt").as_deref(), Some("<"));
    assert_eq!(lookup_entity("copy").as_deref(), Some("\u{A9}"));
}

#[test]
fn test_lookup_unknown_entity() {
    assert_eq!(lookup_entity("notarealentity;"), None);
    assert_eq!(lookup_entity(""), None);
}

#[test]
fn test_prefix_matching() {
    assert!(any_entity_has_prefix("a")); // amp, apos, alpha, etc.
    assert!(any_entity_has_prefix("am")); // amp
    assert!(any_entity_has_prefix("amp")); // amp, amp;
    assert!(!any_entity_has_prefix("xyz")); // nothing
}

#[test]
fn test_longest_match_stops_at_semicolon() {
    assert_eq!(longest_match("amp;amp;"), Some((4, "&".to_string())));
    assert_eq!(longest_match("lt"), Some((2, "<".to_string())));
    assert_eq!(longest_match("xyz"), None);
}

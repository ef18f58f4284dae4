//! Named character reference lookup.
//!
//! [§ 13.5 Named character references](https://html.spec.whatwg.org/multipage/named-characters.html#named-character-references)
//!
//! The table itself comes from `markup5ever`, which generates it from the
//! WHATWG `entities.json`. Keys carry no leading `&`. Every proper prefix of
//! a reference name is also a key, mapped to `(0, 0)`, so a walk over the
//! input can stop as soon as a prefix is unknown.

use markup5ever::data::NAMED_ENTITIES;

/// Look up a complete reference name such as `"amp;"` or `"amp"`.
///
/// Returns the one or two characters the reference stands for.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<String> {
    match NAMED_ENTITIES.get(name) {
        None | Some(&(0, _)) => None,
        Some(&(first, second)) => {
            let mut replacement = String::new();
            replacement.push(char::from_u32(first)?);
            if second != 0 {
                replacement.push(char::from_u32(second)?);
            }
            Some(replacement)
        }
    }
}

/// Whether some reference name starts with `prefix`.
#[must_use]
pub fn any_entity_has_prefix(prefix: &str) -> bool {
    NAMED_ENTITIES.contains_key(prefix)
}

/// "Consume the maximum number of characters possible, where the consumed
/// characters are one of the identifiers in the first column of the named
/// character references table."
///
/// Returns the byte length of the longest reference name at the start of
/// `input` together with its replacement.
#[must_use]
pub fn longest_match(input: &str) -> Option<(usize, String)> {
    let mut best = None;
    for (offset, c) in input.char_indices() {
        let end = offset + c.len_utf8();
        let candidate = &input[..end];
        if !any_entity_has_prefix(candidate) {
            break;
        }
        if let Some(replacement) = lookup_entity(candidate) {
            best = Some((end, replacement));
        }
        if c == ';' {
            break;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_with_and_without_semicolon() {
        assert_eq!(lookup_entity("amp;").as_deref(), Some("&"));
        assert_eq!(lookup_entity("amp").as_deref(), Some("&"));
        assert_eq!(lookup_entity("nbsp;").as_deref(), Some("\u{A0}"));
        // Only the semicolon form exists for newer names.
        assert_eq!(lookup_entity("hellip"), None);
        assert_eq!(lookup_entity("xyz;"), None);
    }

    #[test]
    fn test_two_character_reference() {
        assert_eq!(lookup_entity("fjlig;").as_deref(), Some("fj"));
    }

    #[test]
    fn test_prefixes_are_not_matches() {
        assert!(any_entity_has_prefix("am"));
        assert_eq!(lookup_entity("am"), None);
        assert!(!any_entity_has_prefix("zzzz"));
    }

    #[test]
    fn test_longest_match_prefers_longer_names() {
        assert_eq!(longest_match("notin;x"), Some((6, "\u{2209}".to_string())));
        assert_eq!(longest_match("notit;"), Some((3, "\u{AC}".to_string())));
        assert_eq!(longest_match("ampx"), Some((3, "&".to_string())));
        assert_eq!(longest_match("bogus;"), None);
    }
}

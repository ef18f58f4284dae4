//! [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
//!
//! Choosing the document mode from the DOCTYPE token.

use lark_dom::QuirksMode;

/// Public identifiers that select quirks mode when matched exactly.
const QUIRKS_PUBLIC_IDS: &[&str] = &[
    "-//W3O//DTD W3 HTML Strict 3.0//EN//",
    "-/W3C/DTD HTML 4.0 Transitional/EN",
    "HTML",
];

/// Public identifier prefixes that select quirks mode.
const QUIRKS_PUBLIC_PREFIXES: &[&str] = &[
    "+//Silmaril//dtd html Pro v0r11 19970101//",
    "-//AS//DTD HTML 3.0 asWedit + extensions//",
    "-//AdvaSoft Ltd//DTD HTML 3.0 asWedit + extensions//",
    "-//IETF//DTD HTML 2.0 Level 1//",
    "-//IETF//DTD HTML 2.0 Level 2//",
    "-//IETF//DTD HTML 2.0 Strict Level 1//",
    "-//IETF//DTD HTML 2.0 Strict Level 2//",
    "-//IETF//DTD HTML 2.0 Strict//",
    "-//IETF//DTD HTML 2.0//",
    "-//IETF//DTD HTML 2.1E//",
    "-//IETF//DTD HTML 3.0//",
    "-//IETF//DTD HTML 3.2 Final//",
    "-//IETF//DTD HTML 3.2//",
    "-//IETF//DTD HTML 3//",
    "-//IETF//DTD HTML Level 0//",
    "-//IETF//DTD HTML Level 1//",
    "-//IETF//DTD HTML Level 2//",
    "-//IETF//DTD HTML Level 3//",
    "-//IETF//DTD HTML Strict Level 0//",
    "-//IETF//DTD HTML Strict Level 1//",
    "-//IETF//DTD HTML Strict Level 2//",
    "-//IETF//DTD HTML Strict Level 3//",
    "-//IETF//DTD HTML Strict//",
    "-//IETF//DTD HTML//",
    "-//Metrius//DTD Metrius Presentational//",
    "-//Microsoft//DTD Internet Explorer 2.0 HTML Strict//",
    "-//Microsoft//DTD Internet Explorer 2.0 HTML//",
    "-//Microsoft//DTD Internet Explorer 2.0 Tables//",
    "-//Microsoft//DTD Internet Explorer 3.0 HTML Strict//",
    "-//Microsoft//DTD Internet Explorer 3.0 HTML//",
    "-//Microsoft//DTD Internet Explorer 3.0 Tables//",
    "-//Netscape Comm. Corp.//DTD HTML//",
    "-//Netscape Comm. Corp.//DTD Strict HTML//",
    "-//O'Reilly and Associates//DTD HTML 2.0//",
    "-//O'Reilly and Associates//DTD HTML Extended 1.0//",
    "-//O'Reilly and Associates//DTD HTML Extended Relaxed 1.0//",
    "-//SQ//DTD HTML 2.0 HoTMetaL + extensions//",
    "-//SoftQuad Software//DTD HoTMetaL PRO 6.0::19990601::extensions to HTML 4.0//",
    "-//SoftQuad//DTD HoTMetaL PRO 4.0::19971010::extensions to HTML 4.0//",
    "-//Spyglass//DTD HTML 2.0 Extended//",
    "-//Sun Microsystems Corp.//DTD HotJava HTML//",
    "-//Sun Microsystems Corp.//DTD HotJava Strict HTML//",
    "-//W3C//DTD HTML 3 1995-03-24//",
    "-//W3C//DTD HTML 3.2 Draft//",
    "-//W3C//DTD HTML 3.2 Final//",
    "-//W3C//DTD HTML 3.2//",
    "-//W3C//DTD HTML 3.2S Draft//",
    "-//W3C//DTD HTML 4.0 Frameset//",
    "-//W3C//DTD HTML 4.0 Transitional//",
    "-//W3C//DTD HTML Experimental 19960712//",
    "-//W3C//DTD HTML Experimental 970421//",
    "-//W3C//DTD W3 HTML//",
    "-//W3O//DTD W3 HTML 3.0//",
    "-//WebTechs//DTD Mozilla HTML 2.0//",
    "-//WebTechs//DTD Mozilla HTML//",
];

const QUIRKS_SYSTEM_ID: &str = "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";

/// HTML 4.01 prefixes: quirks without a system identifier, limited quirks
/// with one.
const HTML401_PREFIXES: &[&str] = &[
    "-//W3C//DTD HTML 4.01 Frameset//",
    "-//W3C//DTD HTML 4.01 Transitional//",
];

const LIMITED_QUIRKS_PREFIXES: &[&str] = &[
    "-//W3C//DTD XHTML 1.0 Frameset//",
    "-//W3C//DTD XHTML 1.0 Transitional//",
];

fn starts_with_ignore_case(id: &str, prefix: &str) -> bool {
    id.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

fn has_prefix(id: Option<&str>, prefixes: &[&str]) -> bool {
    id.is_some_and(|id| prefixes.iter().any(|prefix| starts_with_ignore_case(id, prefix)))
}

/// Classify a DOCTYPE token.
///
/// Identifier comparisons are ASCII case-insensitive. `None` means the
/// identifier was missing, which differs from empty for the HTML 4.01
/// prefixes.
#[must_use]
pub fn classify_doctype(
    name: Option<&str>,
    public_id: Option<&str>,
    system_id: Option<&str>,
    force_quirks: bool,
) -> QuirksMode {
    let quirks = force_quirks
        || name != Some("html")
        || public_id.is_some_and(|id| {
            QUIRKS_PUBLIC_IDS
                .iter()
                .any(|quirky| id.eq_ignore_ascii_case(quirky))
        })
        || system_id.is_some_and(|id| id.eq_ignore_ascii_case(QUIRKS_SYSTEM_ID))
        || has_prefix(public_id, QUIRKS_PUBLIC_PREFIXES)
        || (system_id.is_none() && has_prefix(public_id, HTML401_PREFIXES));
    if quirks {
        return QuirksMode::Quirks;
    }

    if has_prefix(public_id, LIMITED_QUIRKS_PREFIXES)
        || (system_id.is_some() && has_prefix(public_id, HTML401_PREFIXES))
    {
        return QuirksMode::LimitedQuirks;
    }

    QuirksMode::NoQuirks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html5_doctype_is_no_quirks() {
        assert_eq!(
            classify_doctype(Some("html"), None, None, false),
            QuirksMode::NoQuirks
        );
        assert_eq!(
            classify_doctype(Some("html"), None, Some("about:legacy-compat"), false),
            QuirksMode::NoQuirks
        );
    }

    #[test]
    fn test_wrong_name_or_force_quirks() {
        assert_eq!(
            classify_doctype(Some("not-html"), None, None, false),
            QuirksMode::Quirks
        );
        assert_eq!(classify_doctype(None, None, None, false), QuirksMode::Quirks);
        assert_eq!(
            classify_doctype(Some("html"), None, None, true),
            QuirksMode::Quirks
        );
    }

    #[test]
    fn test_html401_depends_on_system_id() {
        let public = Some("-//W3C//DTD HTML 4.01 Frameset//EN");
        assert_eq!(
            classify_doctype(Some("html"), public, None, false),
            QuirksMode::Quirks
        );
        assert_eq!(
            classify_doctype(
                Some("html"),
                public,
                Some("http://www.w3.org/TR/html4/frameset.dtd"),
                false
            ),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_case_insensitive_matches() {
        assert_eq!(
            classify_doctype(
                Some("html"),
                None,
                Some("HTTP://WWW.IBM.COM/DATA/DTD/V11/IBMXHTML1-TRANSITIONAL.DTD"),
                false
            ),
            QuirksMode::Quirks
        );
        assert_eq!(
            classify_doctype(Some("html"), Some("-//w3c//dtd html 3.2//en"), None, false),
            QuirksMode::Quirks
        );
        assert_eq!(
            classify_doctype(
                Some("html"),
                Some("-//W3C//DTD XHTML 1.0 Transitional//EN"),
                None,
                false
            ),
            QuirksMode::LimitedQuirks
        );
    }

    #[test]
    fn test_strict_doctypes_are_standards() {
        assert_eq!(
            classify_doctype(
                Some("html"),
                Some("-//W3C//DTD HTML 4.01//EN"),
                Some("http://www.w3.org/TR/html4/strict.dtd"),
                false
            ),
            QuirksMode::NoQuirks
        );
    }
}

//! SVG and MathML support.
//!
//! [§ 13.2.6.3 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
//! [§ 13.2.6.5 The rules for parsing tokens in foreign content](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)

pub mod mathml;
pub mod svg;

use lark_dom::Namespace;

pub use mathml::adjust_mathml_attributes;
pub use svg::{adjust_svg_attributes, adjust_svg_tag_name};

use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.6.3 Adjust foreign attributes](https://html.spec.whatwg.org/multipage/parsing.html#adjust-foreign-attributes)
///
/// "If any of the attributes on the token match the strings given in the
/// first column of the following table, let the attribute be a namespaced
/// attribute, with the prefix being the string given in the corresponding
/// cell in the second column, the local name being the string given in the
/// corresponding cell in the third column, and the namespace being the
/// namespace given in the corresponding cell in the fourth column."
fn foreign_attribute(name: &str) -> Option<(Option<&'static str>, &'static str, Namespace)> {
    let adjusted = match name {
        "xlink:actuate" => (Some("xlink"), "actuate", Namespace::XLink),
        "xlink:arcrole" => (Some("xlink"), "arcrole", Namespace::XLink),
        "xlink:href" => (Some("xlink"), "href", Namespace::XLink),
        "xlink:role" => (Some("xlink"), "role", Namespace::XLink),
        "xlink:show" => (Some("xlink"), "show", Namespace::XLink),
        "xlink:title" => (Some("xlink"), "title", Namespace::XLink),
        "xlink:type" => (Some("xlink"), "type", Namespace::XLink),
        "xml:lang" => (Some("xml"), "lang", Namespace::Xml),
        "xml:space" => (Some("xml"), "space", Namespace::Xml),
        "xmlns" => (None, "xmlns", Namespace::Xmlns),
        "xmlns:xlink" => (Some("xmlns"), "xlink", Namespace::Xmlns),
        _ => return None,
    };
    Some(adjusted)
}

/// Give `xlink:`, `xml:` and `xmlns` attributes their prefix and namespace.
pub fn adjust_foreign_attributes(attributes: &mut [Attribute]) {
    for attr in attributes {
        if let Some((prefix, local_name, namespace)) = foreign_attribute(&attr.name) {
            attr.prefix = prefix;
            attr.name = local_name.to_string();
            attr.namespace = Some(namespace);
        }
    }
}

/// [§ 13.2.6.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inforeign)
///
/// Start tags that break out of foreign content: "A start tag whose tag name
/// is one of: "b", "big", "blockquote", "body", "br", ... "var"" and "A start
/// tag whose tag name is "font", if the token has any attributes named
/// "color", "face", or "size"".
#[must_use]
pub fn causes_exit_from_foreign_content(token: &Token) -> bool {
    let Token::StartTag { name, .. } = token else {
        return false;
    };
    match name.as_str() {
        "b" | "big" | "blockquote" | "body" | "br" | "center" | "code" | "dd" | "div" | "dl"
        | "dt" | "em" | "embed" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "head" | "hr"
        | "i" | "img" | "li" | "listing" | "menu" | "meta" | "nobr" | "ol" | "p" | "pre"
        | "ruby" | "s" | "small" | "span" | "strong" | "strike" | "sub" | "sup" | "table"
        | "tt" | "u" | "ul" | "var" => true,
        "font" => ["color", "face", "size"]
            .iter()
            .any(|attr| token.attribute(attr).is_some()),
        _ => false,
    }
}

/// [§ 13.2.6 MathML text integration point](https://html.spec.whatwg.org/multipage/parsing.html#mathml-text-integration-point)
///
/// "A node is a MathML text integration point if it is one of the following
/// elements: A MathML mi element, mo, mn, ms, mtext."
#[must_use]
pub fn is_mathml_text_integration_point(name: &str, namespace: Namespace) -> bool {
    namespace == Namespace::MathMl && matches!(name, "mi" | "mo" | "mn" | "ms" | "mtext")
}

/// [§ 13.2.6 HTML integration point](https://html.spec.whatwg.org/multipage/parsing.html#html-integration-point)
///
/// Computed when the element is created, since the `annotation-xml` case
/// depends on "the start tag token that was used to create the element".
#[must_use]
pub fn is_html_integration_point(name: &str, namespace: Namespace, attributes: &[Attribute]) -> bool {
    match namespace {
        // "A MathML annotation-xml element whose start tag token had an
        // attribute with the name "encoding" whose value was an ASCII
        // case-insensitive match for the string "text/html" or
        // "application/xhtml+xml"."
        Namespace::MathMl => {
            name == "annotation-xml"
                && attributes.iter().any(|attr| {
                    attr.name == "encoding"
                        && attr.namespace.is_none()
                        && (attr.value.eq_ignore_ascii_case("text/html")
                            || attr.value.eq_ignore_ascii_case("application/xhtml+xml"))
                })
        }
        // "An SVG foreignObject element, desc element, title element."
        Namespace::Svg => matches!(name, "foreignObject" | "desc" | "title"),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foreign_attributes_get_namespaces() {
        let mut attrs = vec![
            Attribute::new("xlink:href", "#a"),
            Attribute::new("xmlns", "http://www.w3.org/2000/svg"),
            Attribute::new("href", "b"),
        ];
        adjust_foreign_attributes(&mut attrs);
        assert_eq!(attrs[0].name, "href");
        assert_eq!(attrs[0].prefix, Some("xlink"));
        assert_eq!(attrs[0].namespace, Some(Namespace::XLink));
        assert_eq!(attrs[1].prefix, None);
        assert_eq!(attrs[1].namespace, Some(Namespace::Xmlns));
        assert_eq!(attrs[2].namespace, None);
    }

    #[test]
    fn test_font_exits_only_with_presentational_attributes() {
        let plain = Token::start_tag("font", vec![]);
        let colored = Token::start_tag("font", vec![Attribute::new("color", "red")]);
        assert!(!causes_exit_from_foreign_content(&plain));
        assert!(causes_exit_from_foreign_content(&colored));
        assert!(causes_exit_from_foreign_content(&Token::start_tag("div", vec![])));
        assert!(!causes_exit_from_foreign_content(&Token::start_tag("circle", vec![])));
    }

    #[test]
    fn test_annotation_xml_encoding() {
        let html = [Attribute::new("encoding", "Text/HTML")];
        let other = [Attribute::new("encoding", "application/mathml+xml")];
        assert!(is_html_integration_point("annotation-xml", Namespace::MathMl, &html));
        assert!(!is_html_integration_point("annotation-xml", Namespace::MathMl, &other));
        assert!(is_html_integration_point("foreignObject", Namespace::Svg, &[]));
        assert!(!is_html_integration_point("title", Namespace::Html, &[]));
    }
}

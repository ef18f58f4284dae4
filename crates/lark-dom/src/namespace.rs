//! [§ 2.1.3 Namespaces](https://infra.spec.whatwg.org/#namespaces)
//!
//! The six namespaces the HTML parser can assign to elements and attributes.

use std::fmt;

/// A namespace known to the HTML parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// "The HTML namespace is `http://www.w3.org/1999/xhtml`."
    Html,
    /// "The MathML namespace is `http://www.w3.org/1998/Math/MathML`."
    MathMl,
    /// "The SVG namespace is `http://www.w3.org/2000/svg`."
    Svg,
    /// "The XLink namespace is `http://www.w3.org/1999/xlink`."
    XLink,
    /// "The XML namespace is `http://www.w3.org/XML/1998/namespace`."
    Xml,
    /// "The XMLNS namespace is `http://www.w3.org/2000/xmlns/`."
    Xmlns,
}

impl Namespace {
    /// The namespace URL.
    #[must_use]
    pub const fn url(self) -> &'static str {
        match self {
            Self::Html => "http://www.w3.org/1999/xhtml",
            Self::MathMl => "http://www.w3.org/1998/Math/MathML",
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::XLink => "http://www.w3.org/1999/xlink",
            Self::Xml => "http://www.w3.org/XML/1998/namespace",
            Self::Xmlns => "http://www.w3.org/2000/xmlns/",
        }
    }

    /// Look a namespace up by its URL.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        [
            Self::Html,
            Self::MathMl,
            Self::Svg,
            Self::XLink,
            Self::Xml,
            Self::Xmlns,
        ]
        .into_iter()
        .find(|ns| ns.url() == url)
    }

    /// The short prefix the html5lib test format prints before foreign
    /// element names (`svg`, `math`), or `None` for HTML.
    #[must_use]
    pub const fn test_format_prefix(self) -> Option<&'static str> {
        match self {
            Self::Html => None,
            Self::MathMl => Some("math"),
            Self::Svg => Some("svg"),
            Self::XLink => Some("xlink"),
            Self::Xml => Some("xml"),
            Self::Xmlns => Some("xmlns"),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

//! Document type nodes and the document mode they select.

use std::fmt;

/// [§ 4.6 Interface DocumentType](https://dom.spec.whatwg.org/#interface-documenttype)
///
/// "Doctypes have an associated name, public ID, and system ID."
/// Missing identifiers are stored as the empty string, as the DOM does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentTypeData {
    /// The doctype name (`html` for standards documents).
    pub name: String,
    /// The public identifier, or empty.
    pub public_id: String,
    /// The system identifier, or empty.
    pub system_id: String,
}

impl DocumentTypeData {
    /// Create doctype data from its three parts.
    #[must_use]
    pub fn new(name: &str, public_id: &str, system_id: &str) -> Self {
        Self {
            name: name.to_string(),
            public_id: public_id.to_string(),
            system_id: system_id.to_string(),
        }
    }

    /// Render the doctype content without the surrounding angle brackets:
    /// `!DOCTYPE name PUBLIC "pub" SYSTEM "sys"`.
    ///
    /// Each keyword/identifier pair is omitted when the identifier is empty.
    /// Identifiers are wrapped in `"` unless they contain a `"`, in which
    /// case `'` is used.
    #[must_use]
    pub fn serialize_content(&self) -> String {
        let mut out = format!("!DOCTYPE {}", self.name);
        if !self.public_id.is_empty() {
            out.push_str(" PUBLIC ");
            out.push_str(&quote_identifier(&self.public_id));
        }
        if !self.system_id.is_empty() {
            out.push_str(" SYSTEM ");
            out.push_str(&quote_identifier(&self.system_id));
        }
        out
    }

    /// The full markup form, `<!DOCTYPE html>`.
    #[must_use]
    pub fn to_markup(&self) -> String {
        format!("<{}>", self.serialize_content())
    }
}

impl fmt::Display for DocumentTypeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_markup())
    }
}

fn quote_identifier(id: &str) -> String {
    let quote = if id.contains('"') { '\'' } else { '"' };
    format!("{quote}{id}{quote}")
}

/// [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#concept-document-mode)
///
/// "Each document has an associated ... mode ("no-quirks", "quirks", or
/// "limited-quirks")."
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum QuirksMode {
    /// Standards mode.
    #[default]
    NoQuirks,
    /// Full quirks mode.
    Quirks,
    /// Almost-standards mode.
    LimitedQuirks,
}

impl QuirksMode {
    /// The DOM keyword for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoQuirks => "no-quirks",
            Self::Quirks => "quirks",
            Self::LimitedQuirks => "limited-quirks",
        }
    }
}

impl fmt::Display for QuirksMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_name_only() {
        let doctype = DocumentTypeData::new("html", "", "");
        assert_eq!(doctype.to_string(), "<!DOCTYPE html>");
    }

    #[test]
    fn test_serialize_public_and_system() {
        let doctype = DocumentTypeData::new(
            "html",
            "-//W3C//DTD HTML 4.01//EN",
            "http://www.w3.org/TR/html4/strict.dtd",
        );
        assert_eq!(
            doctype.serialize_content(),
            "!DOCTYPE html PUBLIC \"-//W3C//DTD HTML 4.01//EN\" SYSTEM \"http://www.w3.org/TR/html4/strict.dtd\""
        );
    }

    #[test]
    fn test_serialize_switches_quote_style() {
        let doctype = DocumentTypeData::new("html", "", "a\"b");
        assert_eq!(doctype.to_markup(), "<!DOCTYPE html SYSTEM 'a\"b'>");
    }
}

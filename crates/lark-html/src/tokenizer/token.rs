use core::fmt;

pub use lark_dom::Attribute;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// "The output of the tokenization step is a series of zero or more of the following
/// tokens: DOCTYPE, start tag, end tag, comment, character, end-of-file."
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag. When a DOCTYPE token is created, its name,
    /// public identifier, and system identifier must be marked as missing
    /// (which is a distinct state from the empty string), and the force-quirks
    /// flag must be set to off (its other state is on)."
    Doctype {
        /// "a name"
        name: Option<String>,
        /// "a public identifier"
        public_identifier: Option<String>,
        /// "a system identifier"
        system_identifier: Option<String>,
        /// "a force-quirks flag"
        force_quirks: bool,
    },

    /// "Start and end tag tokens have a tag name, a self-closing flag, and a
    /// list of attributes, each of which has a name and a value."
    StartTag {
        /// "a tag name"
        name: String,
        /// "a self-closing flag"
        self_closing: bool,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// End tag token. Attributes and the self-closing flag are parse errors
    /// on end tags; attributes are kept so the error can be reported.
    EndTag {
        /// "a tag name"
        name: String,
        /// "a list of attributes"
        attributes: Vec<Attribute>,
    },

    /// "Comment and character tokens have data."
    Comment {
        /// "data"
        data: String,
    },

    /// "Comment and character tokens have data."
    Character {
        /// "data"
        data: char,
    },

    /// End-of-file token signals the end of input.
    EndOfFile,
}

impl Token {
    /// "When a DOCTYPE token is created, its name, public identifier, and system
    /// identifier must be marked as missing ..., and the force-quirks flag must
    /// be set to off."
    #[must_use]
    pub const fn new_doctype() -> Self {
        Self::Doctype {
            name: None,
            public_identifier: None,
            system_identifier: None,
            force_quirks: false,
        }
    }

    /// "When a start or end tag token is created, its self-closing flag must be
    /// unset (its other state is that it be set), and its attributes list must
    /// be empty."
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Self::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// Create a new, empty end tag token.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Self::EndTag {
            name: String::new(),
            attributes: Vec::new(),
        }
    }

    /// Create a new comment token with empty data.
    #[must_use]
    pub const fn new_comment() -> Self {
        Self::Comment {
            data: String::new(),
        }
    }

    /// Create a character token with the given character.
    #[must_use]
    pub const fn new_character(c: char) -> Self {
        Self::Character { data: c }
    }

    /// A start tag with the given name and attributes, as the tree builder
    /// synthesizes them ("insert an HTML element for a `tbody` start tag
    /// token with no attributes").
    #[must_use]
    pub fn start_tag(name: &str, attributes: Vec<Attribute>) -> Self {
        Self::StartTag {
            name: name.to_string(),
            self_closing: false,
            attributes,
        }
    }

    /// An end tag with the given name.
    #[must_use]
    pub fn end_tag(name: &str) -> Self {
        Self::EndTag {
            name: name.to_string(),
            attributes: Vec::new(),
        }
    }

    /// Returns true if this is an end-of-file token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EndOfFile)
    }

    /// The tag name of a start or end tag token.
    #[must_use]
    pub fn tag_name(&self) -> Option<&str> {
        match self {
            Self::StartTag { name, .. } | Self::EndTag { name, .. } => Some(name),
            _ => None,
        }
    }

    /// The attributes of a tag token; empty for other tokens.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Value of the attribute `name` on a tag token.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|attr| attr.name == name)
            .map(|attr| attr.value.as_str())
    }

    /// Whether this is a start tag named `name`.
    #[must_use]
    pub fn is_start_tag(&self, tag: &str) -> bool {
        matches!(self, Self::StartTag { name, .. } if name == tag)
    }

    /// Whether this is an end tag named `name`.
    #[must_use]
    pub fn is_end_tag(&self, tag: &str) -> bool {
        matches!(self, Self::EndTag { name, .. } if name == tag)
    }

    /// Whether this is a start tag with its self-closing flag set.
    #[must_use]
    pub const fn is_self_closing(&self) -> bool {
        matches!(
            self,
            Self::StartTag {
                self_closing: true,
                ..
            }
        )
    }

    // ===== Mutation helpers for the tokenizer =====
    //
    // These only touch the variant they name; called on any other variant they
    // do nothing.

    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    ///
    /// "Append the current input character to the current DOCTYPE token's name."
    pub fn append_to_doctype_name(&mut self, c: char) {
        if let Self::Doctype { name, .. } = self {
            name.get_or_insert_with(String::new).push(c);
        }
    }

    /// [§ 13.2.5.58 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    ///
    /// "Set the current DOCTYPE token's public identifier to the empty string
    /// (not missing)".
    pub fn clear_public_identifier(&mut self) {
        if let Self::Doctype {
            public_identifier, ..
        } = self
        {
            *public_identifier = Some(String::new());
        }
    }

    /// Append to the DOCTYPE token's public identifier.
    pub fn append_to_public_identifier(&mut self, c: char) {
        if let Self::Doctype {
            public_identifier, ..
        } = self
        {
            public_identifier.get_or_insert_with(String::new).push(c);
        }
    }

    /// "Set the current DOCTYPE token's system identifier to the empty string
    /// (not missing)".
    pub fn clear_system_identifier(&mut self) {
        if let Self::Doctype {
            system_identifier, ..
        } = self
        {
            *system_identifier = Some(String::new());
        }
    }

    /// Append to the DOCTYPE token's system identifier.
    pub fn append_to_system_identifier(&mut self, c: char) {
        if let Self::Doctype {
            system_identifier, ..
        } = self
        {
            system_identifier.get_or_insert_with(String::new).push(c);
        }
    }

    /// "Set the current DOCTYPE token's force-quirks flag to on."
    pub fn set_force_quirks(&mut self) {
        if let Self::Doctype { force_quirks, .. } = self {
            *force_quirks = true;
        }
    }

    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    ///
    /// "Append the current input character to the current tag token's tag name."
    pub fn append_to_tag_name(&mut self, c: char) {
        if let Self::StartTag { name, .. } | Self::EndTag { name, .. } = self {
            name.push(c);
        }
    }

    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    ///
    /// "Set the self-closing flag of the current tag token."
    pub fn set_self_closing(&mut self) {
        if let Self::StartTag { self_closing, .. } = self {
            *self_closing = true;
        }
    }

    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    ///
    /// "Append the current input character to the comment token's data."
    pub fn append_to_comment(&mut self, c: char) {
        if let Self::Comment { data } = self {
            data.push(c);
        }
    }

    /// Append a string to the comment token's data.
    pub fn append_str_to_comment(&mut self, s: &str) {
        if let Self::Comment { data } = self {
            data.push_str(s);
        }
    }

    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    ///
    /// "Start a new attribute in the current tag token. Set that attribute
    /// name and value to the empty string."
    pub fn start_new_attribute(&mut self) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self {
            attributes.push(Attribute::new("", ""));
        }
    }

    /// "Append the current input character to the current attribute's name."
    pub fn append_to_current_attribute_name(&mut self, c: char) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self
            && let Some(attr) = attributes.last_mut()
        {
            attr.name.push(c);
        }
    }

    /// "Append the current input character to the current attribute's value."
    pub fn append_to_current_attribute_value(&mut self, c: char) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self
            && let Some(attr) = attributes.last_mut()
        {
            attr.value.push(c);
        }
    }

    /// Append a string to the current attribute's value.
    pub fn append_str_to_current_attribute_value(&mut self, s: &str) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self
            && let Some(attr) = attributes.last_mut()
        {
            attr.value.push_str(s);
        }
    }

    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    ///
    /// "When the user agent leaves the attribute name state (and before
    /// emitting the tag token, if appropriate), the complete attribute's name
    /// must be compared to the other attributes on the same token; if there
    /// is already an attribute on the token with the exact same name, then
    /// this is a duplicate-attribute parse error and the new attribute must
    /// be removed from the token."
    #[must_use]
    pub fn current_attribute_name_is_duplicate(&self) -> bool {
        match self {
            Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } => {
                attributes.split_last().is_some_and(|(current, rest)| {
                    rest.iter().any(|attr| attr.name == current.name)
                })
            }
            _ => false,
        }
    }

    /// Remove the attribute currently being built.
    pub fn remove_current_attribute(&mut self) {
        if let Self::StartTag { attributes, .. } | Self::EndTag { attributes, .. } = self {
            let _ = attributes.pop();
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                write!(f, "DOCTYPE")?;
                if let Some(name) = name {
                    write!(f, " {name}")?;
                }
                if let Some(public) = public_identifier {
                    write!(f, " public={public:?}")?;
                }
                if let Some(system) = system_identifier {
                    write!(f, " system={system:?}")?;
                }
                if *force_quirks {
                    write!(f, " (force-quirks)")?;
                }
                Ok(())
            }
            Self::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "StartTag <{name}")?;
                for attr in attributes {
                    write!(f, " {}={:?}", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, " /")?;
                }
                write!(f, ">")
            }
            Self::EndTag { name, .. } => write!(f, "EndTag </{name}>"),
            Self::Comment { data } => write!(f, "Comment {data:?}"),
            Self::Character { data } => write!(f, "Character {data:?}"),
            Self::EndOfFile => write!(f, "EOF"),
        }
    }
}

//! The driver: feeds tokenizer output to the tree builder and applies the
//! tokenizer state switches the tree builder asks for between tokens.

use lark_dom::{DomTree, Namespace, NodeId};

use super::core::TreeBuilder;
use super::tree_sink::TreeSink;
use crate::error::{ParseError, ParseIssue};
use crate::tokenizer::{Attribute, HTMLTokenizer, TokenizerState};

/// Parser configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// [§ 13.2.4.5](https://html.spec.whatwg.org/multipage/parsing.html#scripting-flag)
    ///
    /// "The scripting flag is set to "enabled" if scripting was enabled for
    /// the Document with which the parser is associated when the parser was
    /// created, and "disabled" otherwise." Controls how `<noscript>` parses.
    pub scripting_enabled: bool,
    /// Report each parse error through `warn_once` as it is found.
    pub log_issues: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            scripting_enabled: true,
            log_issues: false,
        }
    }
}

/// The element a fragment is parsed "in the context of".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentContext {
    /// Local name of the context element.
    pub tag_name: String,
    /// Namespace of the context element.
    pub namespace: Namespace,
    /// Attributes of the context element. They only matter for
    /// `annotation-xml`, whose `encoding` decides if it is an HTML
    /// integration point.
    pub attributes: Vec<Attribute>,
}

impl FragmentContext {
    /// An HTML context element.
    #[must_use]
    pub fn html(tag_name: &str) -> Self {
        Self::new(tag_name, Namespace::Html)
    }

    /// A context element in any namespace.
    #[must_use]
    pub fn new(tag_name: &str, namespace: Namespace) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            namespace,
            attributes: Vec::new(),
        }
    }

    /// Set the context element's attributes.
    #[must_use]
    pub fn with_attributes(mut self, attributes: Vec<Attribute>) -> Self {
        self.attributes = attributes;
        self
    }

    fn validate(&self) -> Result<(), ParseError> {
        let unusable = self.tag_name.is_empty()
            || self
                .tag_name
                .chars()
                .any(|c| c.is_ascii_whitespace() || matches!(c, '/' | '>' | '\0'));
        if unusable {
            return Err(ParseError::InvalidContext(self.tag_name.clone()));
        }
        Ok(())
    }

    /// [§ 13.2.9](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Step 4: "Set the state of the HTML parser's tokenization stage as
    /// follows, switching on the context element".
    fn tokenizer_state(&self, scripting: bool) -> TokenizerState {
        if self.namespace != Namespace::Html {
            return TokenizerState::Data;
        }
        match self.tag_name.as_str() {
            "title" | "textarea" => TokenizerState::Rcdata,
            "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenizerState::Rawtext,
            "script" => TokenizerState::ScriptData,
            "noscript" if scripting => TokenizerState::Rawtext,
            "plaintext" => TokenizerState::Plaintext,
            _ => TokenizerState::Data,
        }
    }
}

/// The result of [`parse_fragment`].
#[derive(Debug)]
pub struct ParsedFragment {
    /// The tree the fragment was built in.
    pub tree: DomTree,
    /// A `DocumentFragment` node holding the parsed nodes.
    pub fragment: NodeId,
    /// Tokenizer and tree construction errors, in input order.
    pub issues: Vec<ParseIssue>,
}

/// [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parsing)
///
/// Owns a tokenizer and a tree builder and runs them to completion. Generic
/// over the tree the nodes are built in; [`DomTree`] by default.
pub struct HTMLParser<S: TreeSink = DomTree> {
    tokenizer: HTMLTokenizer,
    builder: TreeBuilder<S>,
    /// The synthetic `html` element of a fragment parse.
    fragment_root: Option<S::Handle>,
}

impl HTMLParser<DomTree> {
    /// A parser that builds a fresh [`DomTree`].
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self::with_sink(input, DomTree::new())
    }
}

impl<S: TreeSink> HTMLParser<S> {
    /// A parser that builds into `sink`.
    pub fn with_sink(input: &str, sink: S) -> Self {
        let options = ParserOptions::default();
        Self {
            tokenizer: HTMLTokenizer::new(input),
            builder: TreeBuilder::new(sink, options.scripting_enabled, options.log_issues),
            fragment_root: None,
        }
    }

    /// Apply `options`.
    #[must_use]
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.builder.scripting = options.scripting_enabled;
        self.builder.log_issues = options.log_issues;
        self.tokenizer.set_log_issues(options.log_issues);
        self
    }

    /// Prepare to parse the input as a fragment in `context`.
    ///
    /// # Errors
    ///
    /// [`ParseError::InvalidContext`] when the context tag name is empty or
    /// contains whitespace, `/`, `>` or NUL.
    pub fn into_fragment(mut self, context: &FragmentContext) -> Result<Self, ParseError> {
        context.validate()?;
        self.tokenizer
            .set_state(context.tokenizer_state(self.builder.scripting));
        let root = self.builder.prepare_fragment(
            &context.tag_name,
            context.namespace,
            &context.attributes,
        );
        self.fragment_root = Some(root);
        Ok(self)
    }

    /// Run to completion and return the sink.
    #[must_use]
    pub fn run(self) -> S {
        self.run_with_issues().0
    }

    /// Run to completion and return the sink with every parse error.
    #[must_use]
    pub fn run_with_issues(mut self) -> (S, Vec<ParseIssue>) {
        self.drive();
        let mut issues = self.tokenizer.take_issues();
        let (sink, tree_issues) = self.builder.into_parts();
        issues.extend(tree_issues);
        issues.sort_by_key(|issue| issue.position);
        (sink, issues)
    }

    /// Run a fragment parse to completion.
    ///
    /// "Return root's children, in tree order": they are moved into a new
    /// `DocumentFragment`, which is returned with the sink.
    #[must_use]
    pub fn run_fragment(mut self) -> (S, S::Handle, Vec<ParseIssue>) {
        self.drive();
        let root = self.fragment_root.or_else(|| self.builder.root_element());
        let mut issues = self.tokenizer.take_issues();
        let (mut sink, tree_issues) = self.builder.into_parts();
        issues.extend(tree_issues);
        issues.sort_by_key(|issue| issue.position);

        let fragment = sink.create_document_fragment();
        if let Some(root) = root {
            sink.reparent_children(root, fragment);
        }
        (sink, fragment, issues)
    }

    /// The token loop.
    fn drive(&mut self) {
        loop {
            // "If there is an adjusted current node and it is not an element
            // in the HTML namespace" the tokenizer may open CDATA sections.
            self.tokenizer.set_allow_cdata(self.builder.allow_cdata());
            self.builder.set_position(self.tokenizer.position());

            let token = self.tokenizer.next_token();
            let at_eof = token.is_eof();
            self.builder.process_token(token);

            if let Some(state) = self.builder.take_tokenizer_state() {
                self.tokenizer.set_state(state);
            }
            if at_eof || self.builder.is_stopped() {
                break;
            }
        }
    }
}

/// Parse a complete document into a new [`DomTree`].
#[must_use]
pub fn parse_document(html: &str) -> DomTree {
    HTMLParser::new(html).run()
}

/// [§ 13.2.9 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
///
/// # Errors
///
/// [`ParseError::InvalidContext`] when the context element cannot be used.
pub fn parse_fragment(html: &str, context: &FragmentContext) -> Result<ParsedFragment, ParseError> {
    let (tree, fragment, issues) = HTMLParser::new(html).into_fragment(context)?.run_fragment();
    Ok(ParsedFragment {
        tree,
        fragment,
        issues,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_validation() {
        assert!(FragmentContext::html("tbody").validate().is_ok());
        assert_eq!(
            FragmentContext::html("").validate(),
            Err(ParseError::InvalidContext(String::new()))
        );
        for bad in ["a b", "a/", "a>", "a\0"] {
            assert!(FragmentContext::html(bad).validate().is_err(), "{bad:?}");
        }
    }

    #[test]
    fn test_context_tokenizer_states() {
        assert_eq!(
            FragmentContext::html("textarea").tokenizer_state(true),
            TokenizerState::Rcdata
        );
        assert_eq!(
            FragmentContext::html("noscript").tokenizer_state(true),
            TokenizerState::Rawtext
        );
        assert_eq!(
            FragmentContext::html("noscript").tokenizer_state(false),
            TokenizerState::Data
        );
        assert_eq!(
            FragmentContext::new("title", Namespace::Svg).tokenizer_state(true),
            TokenizerState::Data
        );
    }
}

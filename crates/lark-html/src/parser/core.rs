use lark_common::warning::warn_once;
use lark_dom::{Namespace, QuirksMode};
use strum_macros::Display;

use super::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
    adjust_svg_tag_name, is_html_integration_point, is_mathml_text_integration_point,
};
use super::formatting::ActiveFormattingElements;
use super::open_elements::{OpenElements, Scope, StackEntry};
use super::tree_sink::TreeSink;
use crate::error::{ParseErrorCode, ParseIssue};
use crate::tokenizer::{Attribute, Token, TokenizerState};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// What a mode handler asks the token loop to do next.
///
/// "Reprocess the token" never recurses: the handler returns the mode to
/// reprocess in and [`TreeBuilder::process_token`] loops.
#[derive(Debug)]
pub(super) enum Step {
    /// The token has been consumed.
    Done,
    /// Switch to the mode and reprocess the same token.
    Reprocess(InsertionMode),
}

/// Tag names whose end tags are implied by "generate implied end tags".
const IMPLIED_END_TAGS: &[&str] = &[
    "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
];

/// "Generate all implied end tags thoroughly" adds the table parts.
const IMPLIED_END_TAGS_THOROUGH: &[&str] = &[
    "caption", "colgroup", "dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc",
    "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The tree construction stage. It owns the sink while parsing and hands it
/// back through [`TreeBuilder::into_parts`].
pub struct TreeBuilder<S: TreeSink> {
    pub(super) sink: S,

    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    pub(super) mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    pub(super) original_mode: InsertionMode,

    /// [§ 13.2.4.1](https://html.spec.whatwg.org/multipage/parsing.html#stack-of-template-insertion-modes)
    pub(super) template_modes: Vec<InsertionMode>,

    pub(super) open: OpenElements<S::Handle>,
    pub(super) formatting: ActiveFormattingElements<S::Handle>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    pub(super) head: Option<S::Handle>,
    pub(super) form: Option<S::Handle>,

    /// The fragment parsing context element, if any.
    pub(super) context: Option<StackEntry<S::Handle>>,

    /// [§ 13.2.4.5 Other parsing state flags](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    pub(super) frameset_ok: bool,
    pub(super) scripting: bool,

    /// [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#foster-parent)
    pub(super) foster_parenting: bool,

    /// Set after `<pre>`, `<listing>` and `<textarea>`: "If the next token is
    /// a U+000A LINE FEED (LF) character token, then ignore that token".
    pub(super) ignore_lf: bool,

    /// [§ 13.2.6.4.10](https://html.spec.whatwg.org/multipage/parsing.html#concept-pending-table-char-tokens)
    pub(super) pending_table_text: String,

    pub(super) self_closing_acknowledged: bool,
    pub(super) quirks_mode: QuirksMode,

    /// A tokenizer state switch for the driver to apply before the next token.
    pub(super) tokenizer_state: Option<TokenizerState>,

    pub(super) issues: Vec<ParseIssue>,
    pub(super) log_issues: bool,
    /// Input position of the token being processed, for issue reports.
    pub(super) position: usize,
    /// Set by "stop parsing".
    pub(super) stopped: bool,
}

impl<S: TreeSink> TreeBuilder<S> {
    /// Create a tree builder in the "initial" insertion mode.
    pub fn new(sink: S, scripting: bool, log_issues: bool) -> Self {
        Self {
            sink,
            mode: InsertionMode::Initial,
            original_mode: InsertionMode::Initial,
            template_modes: Vec::new(),
            open: OpenElements::new(),
            formatting: ActiveFormattingElements::new(),
            head: None,
            form: None,
            context: None,
            frameset_ok: true,
            scripting,
            foster_parenting: false,
            ignore_lf: false,
            pending_table_text: String::new(),
            self_closing_acknowledged: false,
            quirks_mode: QuirksMode::NoQuirks,
            tokenizer_state: None,
            issues: Vec::new(),
            log_issues,
            position: 0,
            stopped: false,
        }
    }

    /// The current insertion mode.
    pub const fn insertion_mode(&self) -> InsertionMode {
        self.mode
    }

    /// Whether "stop parsing" has run.
    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Record where the next token starts.
    pub const fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    /// A tokenizer state requested by the last token ("switch the tokenizer
    /// to the RCDATA state").
    pub const fn take_tokenizer_state(&mut self) -> Option<TokenizerState> {
        self.tokenizer_state.take()
    }

    /// [§ 13.2.5.42](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    ///
    /// "If there is an adjusted current node and it is not an element in the
    /// HTML namespace", CDATA sections are allowed.
    pub fn allow_cdata(&self) -> bool {
        self.adjusted_current_node()
            .is_some_and(|node| node.namespace != Namespace::Html)
    }

    /// Give back the sink and the tree construction issues.
    pub fn into_parts(self) -> (S, Vec<ParseIssue>) {
        (self.sink, self.issues)
    }

    /// Borrow the sink.
    pub const fn sink(&self) -> &S {
        &self.sink
    }

    /// The `html` element at the top of the stack.
    pub fn root_element(&self) -> Option<S::Handle> {
        self.open.get(0).map(|entry| entry.handle)
    }

    /// Process one token from the tokenizer.
    pub fn process_token(&mut self, token: Token) {
        if self.stopped {
            return;
        }
        if self.ignore_lf {
            self.ignore_lf = false;
            if matches!(token, Token::Character { data: '\n' }) {
                return;
            }
        }

        self.self_closing_acknowledged = false;
        let self_closing = token.is_self_closing();

        while let Step::Reprocess(mode) = self.dispatch(&token) {
            self.mode = mode;
        }

        // "When a start tag token is emitted with its self-closing flag set, if
        // the flag is not acknowledged when it is processed by the tree
        // construction stage, that is a parse error."
        if self_closing && !self.self_closing_acknowledged {
            self.error(ParseErrorCode::NonVoidHtmlElementStartTagWithTrailingSolidus);
        }
    }

    /// [§ 13.2.6 Tree construction dispatcher](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    fn dispatch(&mut self, token: &Token) -> Step {
        if self.stopped {
            return Step::Done;
        }
        if self.use_html_rules(token) {
            self.step(self.mode, token)
        } else {
            self.handle_foreign_content(token)
        }
    }

    /// "If the stack of open elements is empty; if the adjusted current node
    /// is an element in the HTML namespace; ... process the token according
    /// to the rules given in the section corresponding to the current
    /// insertion mode in HTML content."
    fn use_html_rules(&self, token: &Token) -> bool {
        let Some(node) = self.adjusted_current_node() else {
            return true;
        };
        if node.namespace == Namespace::Html {
            return true;
        }
        let text_integration_point = is_mathml_text_integration_point(&node.name, node.namespace);
        match token {
            Token::StartTag { name, .. } => {
                (text_integration_point && name != "mglyph" && name != "malignmark")
                    || (node.namespace == Namespace::MathMl
                        && node.name == "annotation-xml"
                        && name == "svg")
                    || node.html_integration_point
            }
            Token::Character { .. } => text_integration_point || node.html_integration_point,
            Token::EndOfFile => true,
            _ => false,
        }
    }

    /// Process `token` using the rules for `mode`.
    pub(super) fn step(&mut self, mode: InsertionMode, token: &Token) -> Step {
        match mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => self.handle_in_head_noscript_mode(token),
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),
            InsertionMode::InCaption => self.handle_in_caption_mode(token),
            InsertionMode::InColumnGroup => self.handle_in_column_group_mode(token),
            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),
            InsertionMode::InSelect => self.handle_in_select_mode(token),
            InsertionMode::InSelectInTable => self.handle_in_select_in_table_mode(token),
            InsertionMode::InTemplate => self.handle_in_template_mode(token),
            InsertionMode::AfterBody => self.handle_after_body_mode(token),
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),
            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),
            InsertionMode::AfterAfterFrameset => self.handle_after_after_frameset_mode(token),
        }
    }

    // =========================================================================
    // Fragment setup
    // =========================================================================

    /// [§ 13.2.9 Parsing HTML fragments](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
    ///
    /// Steps 7-11: create the context element, the `html` root, the template
    /// mode and the form pointer, then reset the insertion mode. Returns the
    /// `html` root whose children become the fragment.
    pub fn prepare_fragment(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> S::Handle {
        let context = self.sink.create_element(name, namespace, attributes);
        self.context = Some(StackEntry {
            handle: context,
            name: name.to_string(),
            namespace,
            html_integration_point: is_html_integration_point(name, namespace, attributes),
        });

        // "Let root be the result of creating an element given document,
        // "html", the HTML namespace ... Append root to document. Set up the
        // parser's stack of open elements so that it contains just the single
        // element root."
        let document = self.sink.document();
        let root = self.sink.create_element("html", Namespace::Html, &[]);
        self.sink.append_child(document, root);
        self.open.push(StackEntry {
            handle: root,
            name: "html".to_string(),
            namespace: Namespace::Html,
            html_integration_point: false,
        });

        // "If context is a template element, then push "in template" onto the
        // stack of template insertion modes."
        if namespace == Namespace::Html && name == "template" {
            self.template_modes.push(InsertionMode::InTemplate);
        }

        // "Reset the parser's insertion mode appropriately."
        self.reset_insertion_mode_appropriately();

        // "Set the HTML parser's form element pointer to the nearest node to
        // context that is a form element (going straight up the ancestor
        // chain, and including the element itself, if it is a form element)".
        // The context is detached, so only the element itself can qualify.
        if namespace == Namespace::Html && name == "form" {
            self.form = Some(context);
        }
        root
    }

    // =========================================================================
    // Parse errors
    // =========================================================================

    /// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
    pub(super) fn error(&mut self, code: ParseErrorCode) {
        let issue = ParseIssue::new(code, self.position);
        if self.log_issues {
            let _ = warn_once("HTML Parser", &issue.to_string());
        }
        self.issues.push(issue);
    }

    /// [§ 13.2.6 Acknowledge the token's self-closing flag](https://html.spec.whatwg.org/multipage/parsing.html#acknowledge-self-closing-flag)
    pub(super) const fn acknowledge_self_closing(&mut self) {
        self.self_closing_acknowledged = true;
    }

    // =========================================================================
    // Stack queries
    // =========================================================================

    /// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR, or
    /// U+0020 SPACE."
    pub(super) const fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#adjusted-current-node)
    ///
    /// "The adjusted current node is the context element if the parser was
    /// created as part of the HTML fragment parsing algorithm and the stack of
    /// open elements has only one element in it (fragment case); otherwise,
    /// the adjusted current node is the current node."
    pub(super) fn adjusted_current_node(&self) -> Option<&StackEntry<S::Handle>> {
        if self.open.len() == 1
            && let Some(context) = &self.context
        {
            return Some(context);
        }
        self.open.current()
    }

    /// Whether an HTML element named `name` is in `scope`.
    pub(super) fn in_scope(&self, scope: Scope, name: &str) -> bool {
        self.open.has_in_scope(scope, name)
    }

    // =========================================================================
    // Creating and inserting nodes
    // =========================================================================

    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// Returns `(parent, before)`: insert before `before` when it is set,
    /// otherwise append to `parent`.
    pub(super) fn appropriate_place(
        &self,
        override_target: Option<S::Handle>,
    ) -> (S::Handle, Option<S::Handle>) {
        // STEP 1: "If there was an override target specified, then let target
        //          be the override target. Otherwise, let target be the
        //          current node."
        let target = match override_target {
            Some(handle) => self.open.position(handle).and_then(|i| self.open.get(i)),
            None => self.open.current(),
        };
        let Some(target) = target else {
            return (override_target.unwrap_or_else(|| self.sink.document()), None);
        };

        // STEP 2: "If foster parenting is enabled and target is a table,
        //          tbody, tfoot, thead, or tr element"
        let (parent, before) = if self.foster_parenting
            && target.is_html_one_of(&["table", "tbody", "tfoot", "thead", "tr"])
        {
            self.foster_parent_location()
        } else {
            (target.handle, None)
        };

        // STEP 3: "If the adjusted insertion location is inside a template
        //          element, let it instead be inside the template element's
        //          template contents, after its last child (if any)."
        if before.is_none()
            && let Some(contents) = self.sink.template_content(parent)
        {
            return (contents, None);
        }
        (parent, before)
    }

    /// The foster parenting branch of the appropriate place algorithm.
    fn foster_parent_location(&self) -> (S::Handle, Option<S::Handle>) {
        // "Let last template be the last template element in the stack of
        // open elements, if any. Let last table be the last table element in
        // the stack of open elements, if any."
        let last_template = self.open.last_html_position("template");
        let last_table = self.open.last_html_position("table");

        // "If there is a last template and either there is no last table, or
        // there is one, but last template is lower (more recently added) than
        // last table in the stack of open elements, then: let adjusted
        // insertion location be inside last template's template contents"
        if let Some(template_index) = last_template
            && last_table.is_none_or(|table_index| template_index > table_index)
            && let Some(template) = self.open.get(template_index)
        {
            return (template.handle, None);
        }

        // "If there is no last table, then let adjusted insertion location be
        // inside the first element in the stack of open elements (the html
        // element), after its last child (if any)"
        let Some(table_index) = last_table else {
            let html = self.open.get(0).map_or_else(|| self.sink.document(), |e| e.handle);
            return (html, None);
        };
        let Some(table) = self.open.get(table_index).map(|e| e.handle) else {
            return (self.sink.document(), None);
        };

        // "If last table has a parent node, then let adjusted insertion
        // location be inside last table's parent node, immediately before last
        // table". Otherwise, inside the element above it on the stack.
        if let Some(parent) = self.sink.parent(table) {
            return (parent, Some(table));
        }
        let previous = table_index
            .checked_sub(1)
            .and_then(|i| self.open.get(i))
            .map_or(table, |entry| entry.handle);
        (previous, None)
    }

    /// Put `node` at an insertion location.
    pub(super) fn insert_at(&mut self, parent: S::Handle, before: Option<S::Handle>, node: S::Handle) {
        match before {
            Some(reference) => self.sink.insert_before(parent, node, reference),
            None => self.sink.append_child(parent, node),
        }
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    pub(super) fn insert_character(&mut self, c: char) {
        let mut buf = [0; 4];
        self.insert_characters(c.encode_utf8(&mut buf));
    }

    /// Insert a run of characters at the appropriate place.
    pub(super) fn insert_characters(&mut self, data: &str) {
        let (parent, before) = self.appropriate_place(None);
        // "If the adjusted insertion location's node is a Document node, then
        // return." The DOM will not let Document nodes have Text children.
        if parent == self.sink.document() {
            return;
        }
        self.sink.insert_text(parent, data, before);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// With `position`, the comment is appended there ("as the last child of
    /// the Document object").
    pub(super) fn insert_comment(&mut self, data: &str, position: Option<S::Handle>) {
        let comment = self.sink.create_comment(data);
        match position {
            Some(parent) => self.sink.append_child(parent, comment),
            None => {
                let (parent, before) = self.appropriate_place(None);
                self.insert_at(parent, before, comment);
            }
        }
    }

    /// [§ 13.2.6.1 Create an element for a token](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// Template elements get their contents fragment here.
    pub(super) fn create_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> S::Handle {
        let element = self.sink.create_element(name, namespace, attributes);
        if namespace == Namespace::Html && name == "template" {
            let contents = self.sink.create_document_fragment();
            self.sink.set_template_content(element, contents);
        }
        element
    }

    /// Create an HTML element for a start tag token.
    pub(super) fn create_element_for_token(&mut self, token: &Token) -> S::Handle {
        self.create_element(
            token.tag_name().unwrap_or_default(),
            Namespace::Html,
            token.attributes(),
        )
    }

    /// [§ 13.2.6.1 Insert a foreign element](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
    ///
    /// Attributes must already be adjusted.
    pub(super) fn insert_element(
        &mut self,
        name: &str,
        namespace: Namespace,
        attributes: &[Attribute],
    ) -> S::Handle {
        // "Let the adjusted insertion location be the appropriate place for
        // inserting a node."
        let (parent, before) = self.appropriate_place(None);
        // "Let element be the result of creating an element for the token in
        // the given namespace, with the intended parent being the element in
        // which the adjusted insertion location finds itself."
        let element = self.create_element(name, namespace, attributes);
        // "Insert element at the adjusted insertion location."
        self.insert_at(parent, before, element);
        // "Push element onto the stack of open elements so that it is the new
        // current node."
        self.open.push(StackEntry {
            handle: element,
            name: name.to_string(),
            namespace,
            html_integration_point: is_html_integration_point(name, namespace, attributes),
        });
        element
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    pub(super) fn insert_html_element(&mut self, token: &Token) -> S::Handle {
        self.insert_element(
            token.tag_name().unwrap_or_default(),
            Namespace::Html,
            token.attributes(),
        )
    }

    /// Insert an element with no attributes, for the start tags the algorithm
    /// makes up ("insert an HTML element for a "tbody" start tag token with
    /// no attributes").
    pub(super) fn insert_phantom(&mut self, name: &str) -> S::Handle {
        self.insert_element(name, Namespace::Html, &[])
    }

    /// Insert an SVG or MathML element for a start tag, applying the
    /// namespace's name and attribute adjustments.
    pub(super) fn insert_foreign_element(&mut self, token: &Token, namespace: Namespace) -> S::Handle {
        let mut attributes = token.attributes().to_vec();
        let mut name = token.tag_name().unwrap_or_default();
        match namespace {
            Namespace::MathMl => adjust_mathml_attributes(&mut attributes),
            Namespace::Svg => {
                adjust_svg_attributes(&mut attributes);
                if let Some(adjusted) = adjust_svg_tag_name(name) {
                    name = adjusted;
                }
            }
            _ => {}
        }
        adjust_foreign_attributes(&mut attributes);
        self.insert_element(name, namespace, &attributes)
    }

    /// [§ 13.2.6.2 Generic RCDATA / raw text element parsing](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm)
    ///
    /// "Insert an HTML element for the token. If the algorithm that was
    /// invoked is the generic raw text element parsing algorithm, switch the
    /// tokenizer to the RAWTEXT state; otherwise the algorithm invoked was the
    /// generic RCDATA element parsing algorithm, switch the tokenizer to the
    /// RCDATA state. Let the original insertion mode be the current insertion
    /// mode. Then, switch the insertion mode to "text"."
    pub(super) fn parse_text_element(&mut self, token: &Token, state: TokenizerState) -> Step {
        let _ = self.insert_html_element(token);
        self.tokenizer_state = Some(state);
        self.original_mode = self.mode;
        self.mode = InsertionMode::Text;
        Step::Done
    }

    /// Remove a node from its parent and forget it in the stack and list.
    pub(super) fn detach_and_untrack(&mut self, node: S::Handle) {
        self.sink.detach(node);
        let _ = self.open.remove(node);
        self.formatting.remove(node);
    }

    // =========================================================================
    // Closing elements
    // =========================================================================

    /// [§ 13.2.6.3 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "While the current node is a dd element, a dt element, an li element,
    /// an optgroup element, an option element, a p element, an rb element, an
    /// rp element, an rt element, or an rtc element, the UA must pop the
    /// current node off the stack of open elements." `except` names the
    /// element to leave alone.
    pub(super) fn generate_implied_end_tags(&mut self, except: Option<&str>) {
        self.pop_while_current_in(IMPLIED_END_TAGS, except);
    }

    /// "Generate all implied end tags thoroughly"
    pub(super) fn generate_all_implied_end_tags_thoroughly(&mut self) {
        self.pop_while_current_in(IMPLIED_END_TAGS_THOROUGH, None);
    }

    fn pop_while_current_in(&mut self, names: &[&str], except: Option<&str>) {
        while self.open.current().is_some_and(|current| {
            current.is_html_one_of(names) && !except.is_some_and(|name| current.is_html(name))
        }) {
            let _ = self.open.pop();
        }
    }

    /// [§ 13.2.6.4.7 Close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    pub(super) fn close_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        if !self.open.current_is("p") {
            self.error(ParseErrorCode::UnclosedElements);
        }
        self.open.pop_until("p");
    }

    /// "If the stack of open elements has a p element in button scope, then
    /// close a p element."
    pub(super) fn close_p_if_in_button_scope(&mut self) {
        if self.in_scope(Scope::Button, "p") {
            self.close_p_element();
        }
    }

    /// Pop until the current node is an HTML element named in `names`.
    pub(super) fn clear_stack_back_to(&mut self, names: &[&str]) {
        while self.open.len() > 1 && !self.open.current_is_one_of(names) {
            let _ = self.open.pop();
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    pub(super) fn reset_insertion_mode_appropriately(&mut self) {
        self.mode = self.appropriate_mode();
    }

    fn appropriate_mode(&self) -> InsertionMode {
        for index in (0..self.open.len()).rev() {
            // "Let last be false. Let node be the last node in the stack of
            // open elements. Loop: If node is the first node in the stack of
            // open elements, then set last to true, and, if the parser was
            // created as part of the HTML fragment parsing algorithm (fragment
            // case), set node to the context element passed to that algorithm."
            let last = index == 0;
            let node = match (&self.context, last) {
                (Some(context), true) => context,
                _ => match self.open.get(index) {
                    Some(entry) => entry,
                    None => continue,
                },
            };

            if node.namespace == Namespace::Html {
                match node.name.as_str() {
                    "select" => {
                        if !last {
                            for ancestor in (0..index).rev().filter_map(|i| self.open.get(i)) {
                                if ancestor.is_html("template") {
                                    break;
                                }
                                if ancestor.is_html("table") {
                                    return InsertionMode::InSelectInTable;
                                }
                            }
                        }
                        return InsertionMode::InSelect;
                    }
                    "td" | "th" if !last => return InsertionMode::InCell,
                    "tr" => return InsertionMode::InRow,
                    "tbody" | "thead" | "tfoot" => return InsertionMode::InTableBody,
                    "caption" => return InsertionMode::InCaption,
                    "colgroup" => return InsertionMode::InColumnGroup,
                    "table" => return InsertionMode::InTable,
                    "template" => {
                        return self
                            .template_modes
                            .last()
                            .copied()
                            .unwrap_or(InsertionMode::InTemplate);
                    }
                    "head" if !last => return InsertionMode::InHead,
                    "body" => return InsertionMode::InBody,
                    "frameset" => return InsertionMode::InFrameset,
                    "html" => {
                        return if self.head.is_none() {
                            InsertionMode::BeforeHead
                        } else {
                            InsertionMode::AfterHead
                        };
                    }
                    _ => {}
                }
            }
            if last {
                return InsertionMode::InBody;
            }
        }
        InsertionMode::InBody
    }

    /// [§ 13.2.6.4.15 Close the cell](https://html.spec.whatwg.org/multipage/parsing.html#close-the-cell)
    pub(super) fn close_the_cell(&mut self) {
        self.generate_implied_end_tags(None);
        if !self.open.current_is_one_of(&["td", "th"]) {
            self.error(ParseErrorCode::UnclosedElements);
        }
        self.open.pop_until_one_of(&["td", "th"]);
        self.formatting.clear_to_last_marker();
        self.mode = InsertionMode::InRow;
    }

    /// Whether an open element other than those in `allowed` is left at EOF.
    pub(super) fn has_unclosed_elements_except(&self, allowed: &[&str]) -> bool {
        self.open.iter().any(|entry| !entry.is_html_one_of(allowed))
    }

    /// "Stop parsing." The stack is left as is so the driver can still find
    /// the root element of a fragment.
    pub(super) fn stop_parsing(&mut self) -> Step {
        self.stopped = true;
        Step::Done
    }
}

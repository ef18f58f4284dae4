//! [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
//!
//! "Initially, the stack of open elements is empty. The stack grows downwards;
//! the topmost node on the stack is the first one added to the stack, and the
//! bottommost node of the stack is the most recently added node in the stack."
//!
//! Entries cache the element's name, namespace and integration-point status,
//! so scope checks never have to go back to the tree.

use lark_dom::Namespace;

/// One element on the stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackEntry<H> {
    /// The element in the tree.
    pub handle: H,
    /// Local name, after SVG case adjustment.
    pub name: String,
    /// Element namespace.
    pub namespace: Namespace,
    /// Whether the element is an HTML integration point.
    pub html_integration_point: bool,
}

impl<H> StackEntry<H> {
    /// Whether this is the HTML element `name`.
    #[must_use]
    pub fn is_html(&self, name: &str) -> bool {
        self.namespace == Namespace::Html && self.name == name
    }

    /// Whether this is an HTML element whose name is in `names`.
    #[must_use]
    pub fn is_html_one_of(&self, names: &[&str]) -> bool {
        self.namespace == Namespace::Html && names.contains(&self.name.as_str())
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// The element types that bound the default scope: "applet, caption,
    /// html, table, td, th, marquee, object, template, MathML mi, MathML mo,
    /// MathML mn, MathML ms, MathML mtext, MathML annotation-xml, SVG
    /// foreignObject, SVG desc, SVG title".
    #[must_use]
    pub fn is_scope_boundary(&self) -> bool {
        match self.namespace {
            Namespace::Html => matches!(
                self.name.as_str(),
                "applet" | "caption" | "html" | "table" | "td" | "th" | "marquee" | "object"
                    | "template"
            ),
            Namespace::MathMl => matches!(
                self.name.as_str(),
                "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
            ),
            Namespace::Svg => matches!(self.name.as_str(), "foreignObject" | "desc" | "title"),
            _ => false,
        }
    }

    /// [§ 13.2.4.3 Special](https://html.spec.whatwg.org/multipage/parsing.html#special)
    #[must_use]
    pub fn is_special(&self) -> bool {
        match self.namespace {
            Namespace::Html => is_special_html(&self.name),
            Namespace::MathMl => matches!(
                self.name.as_str(),
                "mi" | "mo" | "mn" | "ms" | "mtext" | "annotation-xml"
            ),
            Namespace::Svg => matches!(self.name.as_str(), "foreignObject" | "desc" | "title"),
            _ => false,
        }
    }
}

/// HTML elements in the "special" category.
#[must_use]
pub fn is_special_html(name: &str) -> bool {
    matches!(
        name,
        "address"
            | "applet"
            | "area"
            | "article"
            | "aside"
            | "base"
            | "basefont"
            | "bgsound"
            | "blockquote"
            | "body"
            | "br"
            | "button"
            | "caption"
            | "center"
            | "col"
            | "colgroup"
            | "dd"
            | "details"
            | "dir"
            | "div"
            | "dl"
            | "dt"
            | "embed"
            | "fieldset"
            | "figcaption"
            | "figure"
            | "footer"
            | "form"
            | "frame"
            | "frameset"
            | "h1"
            | "h2"
            | "h3"
            | "h4"
            | "h5"
            | "h6"
            | "head"
            | "header"
            | "hgroup"
            | "hr"
            | "html"
            | "iframe"
            | "img"
            | "input"
            | "keygen"
            | "li"
            | "link"
            | "listing"
            | "main"
            | "marquee"
            | "menu"
            | "meta"
            | "nav"
            | "noembed"
            | "noframes"
            | "noscript"
            | "object"
            | "ol"
            | "p"
            | "param"
            | "plaintext"
            | "pre"
            | "script"
            | "search"
            | "section"
            | "select"
            | "source"
            | "style"
            | "summary"
            | "table"
            | "tbody"
            | "td"
            | "template"
            | "textarea"
            | "tfoot"
            | "th"
            | "thead"
            | "title"
            | "tr"
            | "track"
            | "ul"
            | "wbr"
            | "xmp"
    )
}

/// The scope variants of "has an element in scope".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// "has an element in scope"
    Default,
    /// "has an element in list item scope": default plus HTML `ol`, `ul`.
    ListItem,
    /// "has an element in button scope": default plus HTML `button`.
    Button,
    /// "has an element in table scope": HTML `html`, `table`, `template`.
    Table,
    /// "has an element in select scope": everything except HTML `optgroup`
    /// and `option`.
    Select,
}

impl Scope {
    fn is_boundary<H>(self, entry: &StackEntry<H>) -> bool {
        match self {
            Self::Default => entry.is_scope_boundary(),
            Self::ListItem => entry.is_scope_boundary() || entry.is_html_one_of(&["ol", "ul"]),
            Self::Button => entry.is_scope_boundary() || entry.is_html("button"),
            Self::Table => entry.is_html_one_of(&["html", "table", "template"]),
            Self::Select => !entry.is_html_one_of(&["optgroup", "option"]),
        }
    }
}

/// The stack of open elements.
#[derive(Debug, Clone)]
pub struct OpenElements<H> {
    entries: Vec<StackEntry<H>>,
}

impl<H> Default for OpenElements<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Copy + Eq> OpenElements<H> {
    /// An empty stack.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an element.
    pub fn push(&mut self, entry: StackEntry<H>) {
        self.entries.push(entry);
    }

    /// Pop the current node.
    pub fn pop(&mut self) -> Option<StackEntry<H>> {
        self.entries.pop()
    }

    /// "The current node is the bottommost node in this stack of open
    /// elements."
    #[must_use]
    pub fn current(&self) -> Option<&StackEntry<H>> {
        self.entries.last()
    }

    /// Whether the current node is the HTML element `name`.
    #[must_use]
    pub fn current_is(&self, name: &str) -> bool {
        self.current().is_some_and(|entry| entry.is_html(name))
    }

    /// Whether the current node is an HTML element named in `names`.
    #[must_use]
    pub fn current_is_one_of(&self, names: &[&str]) -> bool {
        self.current().is_some_and(|entry| entry.is_html_one_of(names))
    }

    /// Number of open elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the stack is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`, counting from the top (the `html` element).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StackEntry<H>> {
        self.entries.get(index)
    }

    /// Entries from top to bottom.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &StackEntry<H>> {
        self.entries.iter()
    }

    /// Index of the entry for `handle`.
    #[must_use]
    pub fn position(&self, handle: H) -> Option<usize> {
        self.entries.iter().rposition(|entry| entry.handle == handle)
    }

    /// Whether `handle` is on the stack.
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.position(handle).is_some()
    }

    /// Whether an HTML element named `name` is anywhere on the stack.
    #[must_use]
    pub fn contains_html(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.is_html(name))
    }

    /// Index of the bottommost HTML element named `name`.
    #[must_use]
    pub fn last_html_position(&self, name: &str) -> Option<usize> {
        self.entries.iter().rposition(|entry| entry.is_html(name))
    }

    /// Remove the entry for `handle`, wherever it is.
    pub fn remove(&mut self, handle: H) -> Option<StackEntry<H>> {
        let index = self.position(handle)?;
        Some(self.entries.remove(index))
    }

    /// Insert an entry at `index`.
    pub fn insert(&mut self, index: usize, entry: StackEntry<H>) {
        self.entries.insert(index, entry);
    }

    /// Replace the entry at `index`.
    pub fn replace(&mut self, index: usize, entry: StackEntry<H>) {
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = entry;
        }
    }

    /// Drop every entry from `len` onwards.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// "Pop elements from the stack of open elements until an HTML element
    /// with the tag name `name` has been popped from the stack."
    pub fn pop_until(&mut self, name: &str) {
        while let Some(entry) = self.entries.pop() {
            if entry.is_html(name) {
                break;
            }
        }
    }

    /// Pop until an HTML element named in `names` has been popped.
    pub fn pop_until_one_of(&mut self, names: &[&str]) {
        while let Some(entry) = self.entries.pop() {
            if entry.is_html_one_of(names) {
                break;
            }
        }
    }

    /// Pop until the entry for `handle` has been popped.
    pub fn pop_until_handle(&mut self, handle: H) {
        while let Some(entry) = self.entries.pop() {
            if entry.handle == handle {
                break;
            }
        }
    }

    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope)
    ///
    /// Walks from the current node upwards. A node satisfying `target` is a
    /// match; a scope boundary before that is a failure.
    fn in_scope(&self, scope: Scope, target: impl Fn(&StackEntry<H>) -> bool) -> bool {
        for entry in self.entries.iter().rev() {
            if target(entry) {
                return true;
            }
            if scope.is_boundary(entry) {
                return false;
            }
        }
        false
    }

    /// Whether an HTML element named `name` is in `scope`.
    #[must_use]
    pub fn has_in_scope(&self, scope: Scope, name: &str) -> bool {
        self.in_scope(scope, |entry| entry.is_html(name))
    }

    /// Whether any HTML element named in `names` is in `scope`.
    #[must_use]
    pub fn has_any_in_scope(&self, scope: Scope, names: &[&str]) -> bool {
        self.in_scope(scope, |entry| entry.is_html_one_of(names))
    }

    /// Whether the specific element `handle` is in the default scope.
    #[must_use]
    pub fn has_handle_in_scope(&self, handle: H) -> bool {
        self.in_scope(Scope::Default, |entry| entry.handle == handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(handle: usize, name: &str, namespace: Namespace) -> StackEntry<usize> {
        StackEntry {
            handle,
            name: name.to_string(),
            namespace,
            html_integration_point: false,
        }
    }

    fn stack(names: &[&str]) -> OpenElements<usize> {
        let mut stack = OpenElements::new();
        for (i, name) in names.iter().enumerate() {
            stack.push(entry(i, name, Namespace::Html));
        }
        stack
    }

    #[test]
    fn test_default_scope_stops_at_table() {
        let stack = stack(&["html", "body", "p", "table", "tbody", "tr", "td", "span"]);
        assert!(stack.has_in_scope(Scope::Default, "span"));
        assert!(!stack.has_in_scope(Scope::Default, "p"));
        assert!(stack.has_in_scope(Scope::Table, "tbody"));
    }

    #[test]
    fn test_button_and_list_item_scope() {
        let stack = stack(&["html", "body", "p", "button", "span"]);
        assert!(stack.has_in_scope(Scope::Default, "p"));
        assert!(!stack.has_in_scope(Scope::Button, "p"));

        let list = stack_with_list();
        assert!(!list.has_in_scope(Scope::ListItem, "li"));
        assert!(list.has_in_scope(Scope::Default, "li"));
    }

    fn stack_with_list() -> OpenElements<usize> {
        stack(&["html", "body", "li", "ul", "b"])
    }

    #[test]
    fn test_select_scope_only_passes_options() {
        let stack = stack(&["html", "body", "select", "optgroup", "option"]);
        assert!(stack.has_in_scope(Scope::Select, "select"));
        let blocked = self::stack(&["html", "body", "select", "div"]);
        assert!(!blocked.has_in_scope(Scope::Select, "select"));
    }

    #[test]
    fn test_foreign_boundaries() {
        let mut stack = stack(&["html", "body", "p"]);
        stack.push(entry(3, "svg", Namespace::Svg));
        stack.push(entry(4, "foreignObject", Namespace::Svg));
        stack.push(entry(5, "span", Namespace::Html));
        assert!(!stack.has_in_scope(Scope::Default, "p"));

        let mut html_title = self::stack(&["html", "body", "p"]);
        html_title.push(entry(3, "title", Namespace::Html));
        assert!(html_title.has_in_scope(Scope::Default, "p"));
    }

    #[test]
    fn test_pop_until() {
        let mut stack = stack(&["html", "body", "div", "p", "b"]);
        stack.pop_until("p");
        assert!(stack.current_is("div"));
        stack.pop_until_handle(1);
        assert!(stack.current_is("html"));
    }
}

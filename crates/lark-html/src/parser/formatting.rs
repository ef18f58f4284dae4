//! [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
//!
//! "Initially, the list of active formatting elements is empty. It is used to
//! handle mis-nested formatting element tags."

use crate::tokenizer::{Attribute, Token};

/// An entry in the list: an element with the token that created it, or a
/// marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormattingEntry<H> {
    /// A formatting element. The token is kept so the element can be
    /// recreated by reconstruction or the adoption agency algorithm.
    Element {
        /// The element in the tree.
        handle: H,
        /// The start tag the element was created for.
        token: Token,
    },
    /// "A marker is an entry in the list of active formatting elements that
    /// is distinct from any element." Pushed for `applet`, `object`,
    /// `marquee`, `template`, `td`, `th` and `caption`.
    Marker,
}

impl<H: Copy> FormattingEntry<H> {
    /// The element handle, or `None` for a marker.
    #[must_use]
    pub const fn handle(&self) -> Option<H> {
        match self {
            Self::Element { handle, .. } => Some(*handle),
            Self::Marker => None,
        }
    }
}

/// The list of active formatting elements.
#[derive(Debug, Clone)]
pub struct ActiveFormattingElements<H> {
    entries: Vec<FormattingEntry<H>>,
}

impl<H> Default for ActiveFormattingElements<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H: Copy + Eq> ActiveFormattingElements<H> {
    /// An empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, markers included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&FormattingEntry<H>> {
        self.entries.get(index)
    }

    /// The most recently added entry.
    #[must_use]
    pub fn last(&self) -> Option<&FormattingEntry<H>> {
        self.entries.last()
    }

    /// Index of the entry for `handle`.
    #[must_use]
    pub fn position(&self, handle: H) -> Option<usize> {
        self.entries
            .iter()
            .rposition(|entry| entry.handle() == Some(handle))
    }

    /// Whether `handle` is in the list.
    #[must_use]
    pub fn contains(&self, handle: H) -> bool {
        self.position(handle).is_some()
    }

    /// [§ 13.2.4.3 Push onto the list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#push-onto-the-list-of-active-formatting-elements)
    ///
    /// "If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if
    /// there are no markers, that have the same tag name, namespace, and
    /// attributes as element, then remove the earliest such element from the
    /// list of active formatting elements."
    ///
    /// Every formatting element is in the HTML namespace, so the namespace
    /// check reduces to the tag name.
    pub fn push(&mut self, handle: H, token: Token) {
        let mut matches = 0;
        let mut earliest = None;
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => break,
                FormattingEntry::Element { token: existing, .. } => {
                    if existing.tag_name() == token.tag_name()
                        && same_attributes(existing.attributes(), token.attributes())
                    {
                        matches += 1;
                        earliest = Some(index);
                    }
                }
            }
        }
        if matches >= 3
            && let Some(index) = earliest
        {
            let _ = self.entries.remove(index);
        }

        self.entries.push(FormattingEntry::Element { handle, token });
    }

    /// Push a marker.
    pub fn push_marker(&mut self) {
        self.entries.push(FormattingEntry::Marker);
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    pub fn clear_to_last_marker(&mut self) {
        while let Some(entry) = self.entries.pop() {
            if matches!(entry, FormattingEntry::Marker) {
                break;
            }
        }
    }

    /// The last element named `name` between the end of the list and the
    /// last marker, with its index.
    #[must_use]
    pub fn last_element_named(&self, name: &str) -> Option<(usize, H)> {
        for (index, entry) in self.entries.iter().enumerate().rev() {
            match entry {
                FormattingEntry::Marker => return None,
                FormattingEntry::Element { handle, token } => {
                    if token.tag_name() == Some(name) {
                        return Some((index, *handle));
                    }
                }
            }
        }
        None
    }

    /// Remove the entry for `handle`.
    pub fn remove(&mut self, handle: H) {
        if let Some(index) = self.position(handle) {
            let _ = self.entries.remove(index);
        }
    }

    /// Insert an entry at `index`.
    pub fn insert(&mut self, index: usize, entry: FormattingEntry<H>) {
        self.entries.insert(index.min(self.entries.len()), entry);
    }

    /// Replace the entry at `index`.
    pub fn replace(&mut self, index: usize, entry: FormattingEntry<H>) {
        if let Some(slot) = self.entries.get_mut(index) {
            *slot = entry;
        }
    }

    /// The token for the element `handle`.
    #[must_use]
    pub fn token_for(&self, handle: H) -> Option<&Token> {
        self.entries.iter().rev().find_map(|entry| match entry {
            FormattingEntry::Element { handle: h, token } if *h == handle => Some(token),
            _ => None,
        })
    }
}

/// Attribute lists compared as sets of (namespace, name, value).
fn same_attributes(a: &[Attribute], b: &[Attribute]) -> bool {
    a.len() == b.len()
        && a.iter().all(|attr| {
            b.iter()
                .any(|other| attr.same_name(other) && attr.value == other.value)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(attrs: &[(&str, &str)]) -> Token {
        Token::start_tag(
            "b",
            attrs.iter().map(|(n, v)| Attribute::new(n, v)).collect(),
        )
    }

    #[test]
    fn test_noahs_ark_evicts_oldest_of_four() {
        let mut list = ActiveFormattingElements::new();
        for handle in 0..4 {
            list.push(handle, b(&[]));
        }
        assert_eq!(list.len(), 3);
        assert!(!list.contains(0));
        assert!(list.contains(3));
    }

    #[test]
    fn test_noahs_ark_ignores_attribute_order() {
        let mut list = ActiveFormattingElements::new();
        list.push(0, b(&[("x", "1"), ("y", "2")]));
        list.push(1, b(&[("y", "2"), ("x", "1")]));
        list.push(2, b(&[("x", "1"), ("y", "2")]));
        list.push(3, b(&[("x", "1"), ("y", "2")]));
        assert!(!list.contains(0));
        list.push(4, b(&[("x", "1")]));
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn test_markers_scope_the_search() {
        let mut list = ActiveFormattingElements::new();
        for handle in 0..3 {
            list.push(handle, b(&[]));
        }
        list.push_marker();
        list.push(3, b(&[]));
        assert_eq!(list.len(), 5);
        assert_eq!(list.last_element_named("b"), Some((4, 3)));

        list.clear_to_last_marker();
        assert_eq!(list.len(), 3);
        assert_eq!(list.last_element_named("b"), Some((2, 2)));
        assert_eq!(list.last_element_named("i"), None);
    }
}

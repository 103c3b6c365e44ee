//! Projection of a raw entry list into the index-annotated view used for rendering.
//!
//! Only entries that are selectable and not disabled take part in the index
//! space. Everything else passes through untouched, so separators and labels
//! can sit between items without shifting their indices.
//!
//! # Example
//!
//! ```rust
//! use roving::projector::{project, Entry};
//!
//! let entries = vec![
//!     Entry::new("Fruit").separator(),
//!     Entry::new("Apple"),
//!     Entry::new("Banana").disabled(true),
//!     Entry::new("Cherry"),
//! ];
//!
//! let ids: Vec<_> = project(&entries, "menu", Some(1), None)
//!     .filter_map(|e| e.as_selectable().map(|s| (s.id.clone(), s.focused)))
//!     .collect();
//!
//! assert_eq!(ids, vec![("menu--0".to_string(), false), ("menu--1".to_string(), true)]);
//! ```

use std::iter::FusedIterator;
use std::slice;

use crate::state::StatePatch;

/// An entry that may take part in roving selection.
///
/// Both methods have defaults that make every entry selectable, so a plain
/// item type only needs an empty impl.
pub trait Selectable {
    /// Whether this kind of entry can ever receive an index.
    fn is_selectable(&self) -> bool {
        true
    }

    /// Whether this entry is currently disabled.
    fn is_disabled(&self) -> bool {
        false
    }

    /// Whether this entry receives an index.
    fn takes_index(&self) -> bool {
        self.is_selectable() && !self.is_disabled()
    }
}

impl<T: Selectable + ?Sized> Selectable for &T {
    fn is_selectable(&self) -> bool {
        (**self).is_selectable()
    }

    fn is_disabled(&self) -> bool {
        (**self).is_disabled()
    }
}

/// A simple labelled entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Display label.
    pub label: String,
    selectable: bool,
    disabled: bool,
}

impl Entry {
    /// Creates a selectable, enabled entry.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            selectable: true,
            disabled: false,
        }
    }

    /// Marks the entry as a non-selectable separator or heading.
    #[must_use]
    pub fn separator(mut self) -> Self {
        self.selectable = false;
        self
    }

    /// Sets the disabled flag.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}

impl Selectable for Entry {
    fn is_selectable(&self) -> bool {
        self.selectable
    }

    fn is_disabled(&self) -> bool {
        self.disabled
    }
}

/// Derives the element id of the entry at `index` inside `container_id`.
#[must_use]
pub fn item_id(container_id: &str, index: usize) -> String {
    format!("{container_id}--{index}")
}

/// Counts the entries that receive an index.
pub fn count_selectables<E: Selectable>(entries: &[E]) -> usize {
    entries.iter().filter(|e| e.takes_index()).count()
}

/// A selectable entry together with its derived annotations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectableView<'a, E> {
    /// The untouched entry.
    pub entry: &'a E,
    /// Position in the raw list.
    pub raw_index: usize,
    /// Position in the selectable index space.
    pub index: usize,
    /// Derived element id, `<container>--<index>`.
    pub id: String,
    /// Whether the keyboard cursor is on this entry.
    pub focused: bool,
    /// Whether this entry is the committed choice.
    pub selected: bool,
}

impl<E> SelectableView<'_, E> {
    /// The state change a click on this entry commits.
    #[must_use]
    pub fn on_click(&self) -> StatePatch {
        StatePatch::new().select(Some(self.index)).focus(None)
    }
}

/// One item of a [`Projection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotatedEntry<'a, E> {
    /// A separator, label or disabled entry, passed through as-is.
    Inert {
        /// The untouched entry.
        entry: &'a E,
        /// Position in the raw list.
        raw_index: usize,
    },
    /// An entry in the index space.
    Selectable(SelectableView<'a, E>),
}

impl<'a, E> AnnotatedEntry<'a, E> {
    /// Returns the underlying entry.
    #[must_use]
    pub fn entry(&self) -> &'a E {
        match self {
            Self::Inert { entry, .. } => *entry,
            Self::Selectable(view) => view.entry,
        }
    }

    /// Returns the annotations if the entry is selectable.
    #[must_use]
    pub fn as_selectable(&self) -> Option<&SelectableView<'a, E>> {
        match self {
            Self::Inert { .. } => None,
            Self::Selectable(view) => Some(view),
        }
    }
}

/// Lazy walk over a raw entry list.
///
/// A projection is cheap to clone, and a clone taken before iterating walks
/// the list again from the start.
#[derive(Debug)]
pub struct Projection<'a, E> {
    entries: std::iter::Enumerate<slice::Iter<'a, E>>,
    container_id: &'a str,
    focused: Option<usize>,
    selected: Option<usize>,
    next_index: usize,
}

impl<E> Clone for Projection<'_, E> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            container_id: self.container_id,
            focused: self.focused,
            selected: self.selected,
            next_index: self.next_index,
        }
    }
}

/// Projects `entries` using the effective focused and selected indices.
pub fn project<'a, E: Selectable>(
    entries: &'a [E],
    container_id: &'a str,
    focused: Option<usize>,
    selected: Option<usize>,
) -> Projection<'a, E> {
    Projection {
        entries: entries.iter().enumerate(),
        container_id,
        focused,
        selected,
        next_index: 0,
    }
}

impl<'a, E: Selectable> Iterator for Projection<'a, E> {
    type Item = AnnotatedEntry<'a, E>;

    fn next(&mut self) -> Option<Self::Item> {
        let (raw_index, entry) = self.entries.next()?;
        if !entry.takes_index() {
            return Some(AnnotatedEntry::Inert { entry, raw_index });
        }

        let index = self.next_index;
        self.next_index += 1;
        Some(AnnotatedEntry::Selectable(SelectableView {
            entry,
            raw_index,
            index,
            id: item_id(self.container_id, index),
            focused: self.focused == Some(index),
            selected: self.selected == Some(index),
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl<E: Selectable> ExactSizeIterator for Projection<'_, E> {}

impl<E: Selectable> FusedIterator for Projection<'_, E> {}

//! Selection state, partial updates and the controlled/uncontrolled regime.

use std::fmt;
use std::str::FromStr;

use crate::error::SelectionError;

/// The two stateful fields of a selection model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// The keyboard navigation cursor.
    FocusedIndex,
    /// The committed choice.
    SelectedIndex,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FocusedIndex => f.write_str("focused_index"),
            Self::SelectedIndex => f.write_str("selected_index"),
        }
    }
}

/// Who owns a field's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Regime {
    /// An external owner supplies the value on every update.
    Controlled,
    /// The model owns and mutates the value itself.
    Uncontrolled,
}

impl fmt::Display for Regime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controlled => f.write_str("controlled"),
            Self::Uncontrolled => f.write_str("uncontrolled"),
        }
    }
}

/// Where a field's value comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Source {
    /// Omitted by the caller; the model keeps its own copy.
    #[default]
    Internal,
    /// Supplied by the caller. `External(None)` is an explicit "unset".
    External(Option<usize>),
}

impl Source {
    /// Returns the regime this source puts the field in.
    #[must_use]
    pub fn regime(&self) -> Regime {
        match self {
            Self::Internal => Regime::Uncontrolled,
            Self::External(_) => Regime::Controlled,
        }
    }
}

/// Externally supplied values, one [`Source`] per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ControlProps {
    /// Source of the focused index.
    pub focused_index: Source,
    /// Source of the selected index.
    pub selected_index: Source,
}

impl ControlProps {
    /// Creates props with both fields uncontrolled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Supplies the focused index externally.
    #[must_use]
    pub fn focused(mut self, index: Option<usize>) -> Self {
        self.focused_index = Source::External(index);
        self
    }

    /// Supplies the selected index externally.
    #[must_use]
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected_index = Source::External(index);
        self
    }

    pub(crate) fn source(&self, field: Field) -> Source {
        match field {
            Field::FocusedIndex => self.focused_index,
            Field::SelectedIndex => self.selected_index,
        }
    }
}

/// The full state of a selection model as seen from outside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectionState {
    /// The keyboard cursor, `None` when unset.
    pub focused_index: Option<usize>,
    /// The committed choice, `None` when unset.
    pub selected_index: Option<usize>,
}

impl SelectionState {
    /// Returns the value of one field.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<usize> {
        match field {
            Field::FocusedIndex => self.focused_index,
            Field::SelectedIndex => self.selected_index,
        }
    }
}

/// A partial state update. Fields left out keep their current value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatePatch {
    focused_index: Option<Option<usize>>,
    selected_index: Option<Option<usize>>,
}

impl StatePatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the focused index; `None` unsets it.
    #[must_use]
    pub fn focus(mut self, index: Option<usize>) -> Self {
        self.focused_index = Some(index);
        self
    }

    /// Sets the selected index; `None` unsets it.
    #[must_use]
    pub fn select(mut self, index: Option<usize>) -> Self {
        self.selected_index = Some(index);
        self
    }

    /// Returns true if the patch touches no field.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.focused_index.is_none() && self.selected_index.is_none()
    }

    /// Overlays the patch on `state`.
    #[must_use]
    pub fn apply_to(&self, state: SelectionState) -> SelectionState {
        SelectionState {
            focused_index: self.focused_index.unwrap_or(state.focused_index),
            selected_index: self.selected_index.unwrap_or(state.selected_index),
        }
    }
}

/// Text direction of the host layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dir {
    /// Left to right.
    #[default]
    Ltr,
    /// Right to left.
    Rtl,
}

impl FromStr for Dir {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            _ => Err(SelectionError::InvalidDirection(s.to_string())),
        }
    }
}

/// Orientation and text direction of a list, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Direction {
    /// Arrow up/down navigate when true, left/right otherwise.
    pub vertical: bool,
    /// Swaps increment and decrement on the active axis.
    pub rtl: bool,
}

impl Direction {
    /// A left/right navigated list.
    #[must_use]
    pub fn horizontal(dir: Dir) -> Self {
        Self {
            vertical: false,
            rtl: dir == Dir::Rtl,
        }
    }

    /// An up/down navigated list.
    #[must_use]
    pub fn vertical(dir: Dir) -> Self {
        Self {
            vertical: true,
            rtl: dir == Dir::Rtl,
        }
    }
}

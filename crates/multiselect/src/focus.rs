//! Focus targets the coordinator can command.
//!
//! The coordinator never touches a UI toolkit directly. It asks a
//! [`FocusDriver`] to move keyboard focus, and the host translates that into
//! whatever its platform needs.

use std::fmt;

/// A place keyboard focus can be moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusTarget {
    /// The control's outer container, used while a token is focused.
    Container,
    /// The free-text input.
    Input,
}

impl fmt::Display for FocusTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Container => f.write_str("container"),
            Self::Input => f.write_str("input"),
        }
    }
}

/// Moves platform keyboard focus on request.
///
/// Any `FnMut(FocusTarget)` closure is a driver.
pub trait FocusDriver {
    /// Gives keyboard focus to `target`.
    fn focus(&mut self, target: FocusTarget);
}

impl<F: FnMut(FocusTarget)> FocusDriver for F {
    fn focus(&mut self, target: FocusTarget) {
        self(target);
    }
}

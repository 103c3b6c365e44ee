//! Error types for the roving selection model.

use thiserror::Error;

use crate::state::{Field, Regime};

/// Errors reported by the selection model.
///
/// Most edge cases of the model (stale indices, unknown keys, repeated
/// commits) are resolved silently by policy. The variants here are caller
/// contract violations.
///
/// # Example
///
/// ```rust
/// use roving::projector::Entry;
/// use roving::{ControlProps, RovingSelection};
///
/// let mut model = RovingSelection::new(vec![Entry::new("a"), Entry::new("b")])
///     .selected_index(Some(1));
///
/// // Dropping an externally supplied field is a contract violation.
/// let err = model.set_props(ControlProps::default()).unwrap_err();
/// assert!(err.is_regime_violation());
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// A field switched between externally supplied and internally owned.
    ///
    /// Once a field is supplied from outside it must be supplied for the
    /// model's whole lifetime, and vice versa.
    #[error("{field} switched from {was} to {now}")]
    MixedControlRegime {
        /// The offending field.
        field: Field,
        /// The regime the field was created with.
        was: Regime,
        /// The regime requested by the update.
        now: Regime,
    },

    /// A direction string other than `ltr` or `rtl`.
    #[error("invalid direction: {0:?} (expected \"ltr\" or \"rtl\")")]
    InvalidDirection(String),
}

impl SelectionError {
    /// Returns true if this is a controlled/uncontrolled regime violation.
    #[must_use]
    pub fn is_regime_violation(&self) -> bool {
        matches!(self, Self::MixedControlRegime { .. })
    }
}

/// A specialized [`Result`] type for selection operations.
pub type Result<T> = std::result::Result<T, SelectionError>;

#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Multiselect
//!
//! Interaction state for a multi-select combobox: a row of committed tokens,
//! a free-text input, and a popup menu of candidates.
//!
//! The control is driven Elm-style. The host turns platform events into
//! [`Msg`] values, feeds them to [`MultiSelect::update`], applies the
//! returned [`Outcome`], and renders from the two [`roving`] models.
//!
//! Keyboard behavior:
//! - With text in the input, arrow keys and enter navigate and commit in the menu.
//! - With an empty input, left or home moves into the token row and
//!   backspace removes the last token.
//! - Inside the token row, right past the last token, end, or tab return to
//!   the input; delete or backspace removes the focused token.
//!
//! ## Example
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use multiselect::{Cmd, EventTarget, FocusTarget, Msg, MultiSelect};
//! use roving::Entry;
//!
//! let focused = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&focused);
//!
//! let mut select = MultiSelect::new()
//!     .tokens(vec![Entry::new("rust")])
//!     .menu_items(vec![Entry::new("go"), Entry::new("zig")])
//!     .focus_driver(move |target: FocusTarget| sink.borrow_mut().push(target));
//!
//! // A press on the container focuses the input one tick later.
//! let outcome = select.update(Msg::MouseDown { target: EventTarget::Container });
//! assert_eq!(outcome.cmd, Some(Cmd::Tick));
//! assert!(focused.borrow().is_empty());
//!
//! select.update(Msg::Tick);
//! assert_eq!(focused.borrow().as_slice(), &[FocusTarget::Input]);
//! ```

pub mod focus;
pub mod message;
pub mod multiselect;

pub use focus::{FocusDriver, FocusTarget};
pub use message::{Cmd, EventTarget, Msg, Outcome};
pub use multiselect::{Mode, MultiSelect, TokenEntry};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::focus::{FocusDriver, FocusTarget};
    pub use crate::message::{Cmd, EventTarget, Msg, Outcome};
    pub use crate::multiselect::{Mode, MultiSelect};
}

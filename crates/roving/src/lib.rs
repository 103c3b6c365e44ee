#![forbid(unsafe_code)]
// Allow pedantic lints for early-stage API ergonomics.
#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

//! # Roving
//!
//! Roving focus and selection for keyboard-navigable lists.
//!
//! A [`RovingSelection`] tracks two indices over the selectable entries of a
//! list: the keyboard cursor (`focused`) and the committed choice
//! (`selected`). Each can be owned by the model or supplied by the host, and
//! arrow keys are interpreted according to the list's [`Direction`].
//!
//! - **key** - Key identifiers, bindings and the key-to-action map
//! - **state** - Selection state, partial updates, control regimes, direction
//! - **projector** - Index-annotated view of a raw entry list
//! - **model** - The roving selection state machine
//!
//! ## Example
//!
//! ```rust
//! use roving::{Dir, Direction, Key, KeyEvent, RovingSelection};
//! use roving::projector::Entry;
//!
//! let tokens = vec![Entry::new("rust"), Entry::new("go"), Entry::new("zig")];
//! let mut row = RovingSelection::new(tokens)
//!     .id("tags")
//!     .direction(Direction::horizontal("rtl".parse::<Dir>().unwrap()));
//!
//! // Under RTL, the left arrow moves forward.
//! row.dispatch_key_event(&mut KeyEvent::new(Key::Left));
//! assert_eq!(row.focused(), Some(0));
//! assert_eq!(row.active_descendant(), "tags--0");
//! ```

pub mod error;
pub mod key;
pub mod model;
pub mod projector;
pub mod state;

pub use error::{Result, SelectionError};
pub use key::{Action, Binding, Key, KeyEvent, KeyMap};
pub use model::{Commit, RovingSelection, StateChangeFn};
pub use projector::{AnnotatedEntry, Entry, Projection, Selectable, SelectableView};
pub use state::{ControlProps, Dir, Direction, Field, Regime, SelectionState, Source, StatePatch};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::key::{Action, Key, KeyEvent, KeyMap};
    pub use crate::model::{Commit, RovingSelection};
    pub use crate::projector::{AnnotatedEntry, Selectable};
    pub use crate::state::{ControlProps, Dir, Direction, SelectionState, StatePatch};
}

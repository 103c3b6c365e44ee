//! Events the host feeds into the coordinator and what comes back.

use roving::KeyEvent;

/// Where a pointer or focus event happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventTarget {
    /// The container itself, not one of its children.
    Container,
    /// The text input.
    Input,
    /// The token at this raw position.
    Token(usize),
    /// The menu entry with this selection index.
    MenuItem(usize),
    /// Anything else inside the control.
    Other,
}

/// An input event for [`MultiSelect::update`](crate::MultiSelect::update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// A key was pressed while focus was inside the control.
    KeyDown(KeyEvent),
    /// A mouse button went down inside the control.
    MouseDown {
        /// The element under the pointer.
        target: EventTarget,
    },
    /// A click inside the control.
    Click {
        /// The element clicked.
        target: EventTarget,
    },
    /// The text input gained focus.
    InputFocus,
    /// The text input lost focus.
    InputBlur,
    /// Something inside the container lost focus.
    ContainerBlur {
        /// The element that lost focus.
        target: EventTarget,
    },
    /// Focus entered the control as a whole.
    FocusIn,
    /// Focus left the control as a whole.
    FocusOut,
    /// The user edited the text input.
    TextChanged(String),
    /// The host's event loop turned over after a [`Cmd::Tick`] request.
    Tick,
}

/// A follow-up the host must perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cmd {
    /// Deliver [`Msg::Tick`] on the next turn of the event loop.
    Tick,
}

/// Result of one [`MultiSelect::update`](crate::MultiSelect::update) call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Outcome {
    /// The event after handling; key events carry their suppression flag.
    pub event: Option<KeyEvent>,
    /// The platform default action should be suppressed.
    pub default_prevented: bool,
    /// The event should not propagate further.
    pub stop_propagation: bool,
    /// Follow-up work for the host.
    pub cmd: Option<Cmd>,
}

impl Outcome {
    pub(crate) fn key(event: KeyEvent) -> Self {
        Self {
            default_prevented: event.default_prevented(),
            event: Some(event),
            ..Self::default()
        }
    }

    pub(crate) fn suppressed() -> Self {
        Self {
            default_prevented: true,
            stop_propagation: true,
            ..Self::default()
        }
    }

    pub(crate) fn tick() -> Self {
        Self {
            cmd: Some(Cmd::Tick),
            ..Self::default()
        }
    }
}

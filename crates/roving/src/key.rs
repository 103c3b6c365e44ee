//! Key identifiers, key bindings and the key-to-action map.
//!
//! Keys are resolved to an [`Action`] before any direction handling happens.
//! The [`KeyMap`] holds one [`Binding`] per action, so a host can rebind keys
//! (for example to add vim-style `j`/`k`) without touching the selection logic.
//!
//! # Example
//!
//! ```rust
//! use roving::key::{Action, Key, KeyMap};
//!
//! let keymap = KeyMap::default();
//! assert_eq!(keymap.resolve(&Key::Enter), Some(Action::Commit));
//! assert_eq!(keymap.resolve(&Key::Left), Some(Action::DecrementPrimary));
//! assert_eq!(keymap.resolve(&Key::Char('q')), None);
//! ```

use std::fmt;

/// A keyboard key as seen by the selection logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter / Return.
    Enter,
    /// Space bar.
    Space,
    /// Tab.
    Tab,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Home.
    Home,
    /// End.
    End,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Escape.
    Escape,
    /// A printable character.
    Char(char),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Enter => "enter",
            Self::Space => "space",
            Self::Tab => "tab",
            Self::Backspace => "backspace",
            Self::Delete => "delete",
            Self::Home => "home",
            Self::End => "end",
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
            Self::Escape => "esc",
            Self::Char(c) => return write!(f, "{c}"),
        };
        f.write_str(s)
    }
}

/// A key press that can have its default platform handling suppressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key that was pressed.
    pub key: Key,
    default_prevented: bool,
}

impl KeyEvent {
    /// Creates a new key event.
    #[must_use]
    pub fn new(key: Key) -> Self {
        Self {
            key,
            default_prevented: false,
        }
    }

    /// Suppresses the platform's default action for this key.
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Returns whether the default action was suppressed.
    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl From<Key> for KeyEvent {
    fn from(key: Key) -> Self {
        Self::new(key)
    }
}

/// What a key means before any direction inversion is applied.
///
/// "Primary" is the inline (horizontal) axis, "secondary" the block
/// (vertical) axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Commit the focused entry as the selection.
    Commit,
    /// Move focus to the end boundary.
    MoveToEnd,
    /// Move focus to the first entry.
    MoveToStart,
    /// Next entry on the horizontal axis.
    IncrementPrimary,
    /// Previous entry on the horizontal axis.
    DecrementPrimary,
    /// Next entry on the vertical axis.
    IncrementSecondary,
    /// Previous entry on the vertical axis.
    DecrementSecondary,
    /// Remove the committed/focused entry.
    RemoveCommitted,
    /// Drop focus and hand it to the next target.
    ClearAndHandoff,
}

/// Help information for a keybinding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Help {
    /// The key(s) to display in help text (e.g., "←/→").
    pub key: String,
    /// Description of what the binding does.
    pub desc: String,
}

impl Help {
    /// Creates new help information.
    #[must_use]
    pub fn new(key: impl Into<String>, desc: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            desc: desc.into(),
        }
    }
}

/// A keybinding with associated help text.
///
/// A binding matches a [`Key`] through the key's display string, so
/// `Binding::new().keys(&["down", "j"])` matches both [`Key::Down`] and
/// `Key::Char('j')`.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    keys: Vec<String>,
    help: Help,
    disabled: bool,
}

impl Binding {
    /// Creates a new empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the keys for this binding.
    #[must_use]
    pub fn keys(mut self, keys: &[&str]) -> Self {
        self.keys = keys.iter().map(|&s| s.to_string()).collect();
        self
    }

    /// Sets the help text for this binding.
    #[must_use]
    pub fn help(mut self, key: impl Into<String>, desc: impl Into<String>) -> Self {
        self.help = Help::new(key, desc);
        self
    }

    /// Enables or disables the binding.
    #[must_use]
    pub fn set_enabled(mut self, enabled: bool) -> Self {
        self.disabled = !enabled;
        self
    }

    /// Returns the keys for this binding.
    #[must_use]
    pub fn get_keys(&self) -> &[String] {
        &self.keys
    }

    /// Returns the help information for this binding.
    #[must_use]
    pub fn get_help(&self) -> &Help {
        &self.help
    }

    /// A binding is enabled if it's not explicitly disabled and has at least one key.
    #[must_use]
    pub fn enabled(&self) -> bool {
        !self.disabled && !self.keys.is_empty()
    }

    /// Removes the keys and help from this binding.
    pub fn unbind(&mut self) {
        self.keys.clear();
        self.help = Help::default();
    }
}

/// Checks if the given key matches any of the given bindings.
///
/// Only enabled bindings are considered.
pub fn matches<K: fmt::Display>(key: K, bindings: &[&Binding]) -> bool {
    let key_str = key.to_string();
    bindings
        .iter()
        .filter(|b| b.enabled())
        .any(|b| b.keys.iter().any(|k| *k == key_str))
}

/// Bindings for every [`Action`].
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Commit the focused entry.
    pub commit: Binding,
    /// Jump to the end boundary.
    pub move_to_end: Binding,
    /// Jump to the first entry.
    pub move_to_start: Binding,
    /// Horizontal forward.
    pub increment_primary: Binding,
    /// Horizontal backward.
    pub decrement_primary: Binding,
    /// Vertical forward.
    pub increment_secondary: Binding,
    /// Vertical backward.
    pub decrement_secondary: Binding,
    /// Remove an entry.
    pub remove: Binding,
    /// Leave the list.
    pub handoff: Binding,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            commit: Binding::new()
                .keys(&["enter", "space"])
                .help("enter", "select"),
            move_to_end: Binding::new().keys(&["end"]).help("end", "go to end"),
            move_to_start: Binding::new()
                .keys(&["home"])
                .help("home", "go to start"),
            increment_primary: Binding::new().keys(&["right"]).help("→", "next"),
            decrement_primary: Binding::new().keys(&["left"]).help("←", "previous"),
            increment_secondary: Binding::new().keys(&["down"]).help("↓", "down"),
            decrement_secondary: Binding::new().keys(&["up"]).help("↑", "up"),
            remove: Binding::new()
                .keys(&["delete", "backspace"])
                .help("del", "remove"),
            handoff: Binding::new().keys(&["tab"]).help("tab", "leave"),
        }
    }
}

impl KeyMap {
    /// Resolves a key to the action it is bound to.
    ///
    /// Bindings are checked in a fixed order and the first match wins, so a
    /// key bound twice resolves to the earlier action.
    #[must_use]
    pub fn resolve(&self, key: &Key) -> Option<Action> {
        let table = [
            (&self.commit, Action::Commit),
            (&self.move_to_end, Action::MoveToEnd),
            (&self.move_to_start, Action::MoveToStart),
            (&self.increment_primary, Action::IncrementPrimary),
            (&self.decrement_primary, Action::DecrementPrimary),
            (&self.increment_secondary, Action::IncrementSecondary),
            (&self.decrement_secondary, Action::DecrementSecondary),
            (&self.remove, Action::RemoveCommitted),
            (&self.handoff, Action::ClearAndHandoff),
        ];
        let action = table
            .into_iter()
            .find(|(binding, _)| matches(key, &[*binding]))
            .map(|(_, action)| action);
        tracing::trace!(%key, ?action, "resolved key");
        action
    }

    /// Returns the bindings worth showing in a help view.
    #[must_use]
    pub fn short_help(&self) -> Vec<&Binding> {
        [
            &self.decrement_primary,
            &self.increment_primary,
            &self.decrement_secondary,
            &self.increment_secondary,
            &self.commit,
        ]
        .into_iter()
        .filter(|b| b.enabled())
        .collect()
    }
}

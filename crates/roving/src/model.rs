//! The roving selection model.
//!
//! [`RovingSelection`] tracks a keyboard cursor (`focused`) and a committed
//! choice (`selected`) over the selectable entries of a list. Each of the two
//! fields is either owned by the model or supplied from outside, and every
//! read goes through [`RovingSelection::get_effective`] so the navigation
//! logic never needs to know which regime is active.
//!
//! With an `on_state_change` callback registered, the model never mutates
//! itself: every would-be change is proposed through the callback and the
//! owner re-supplies the values it accepts with
//! [`RovingSelection::set_props`].
//!
//! # Example
//!
//! ```rust
//! use roving::{Key, KeyEvent, RovingSelection};
//! use roving::projector::Entry;
//!
//! let mut menu = RovingSelection::new(vec![Entry::new("X"), Entry::new("Y")]).vertical(true);
//!
//! let mut down = KeyEvent::new(Key::Down);
//! assert!(menu.dispatch_key_event(&mut down));
//! assert!(down.default_prevented());
//! assert_eq!(menu.focused(), Some(0));
//!
//! menu.dispatch_key_event(&mut KeyEvent::new(Key::Enter));
//! assert_eq!(menu.selected(), Some(0));
//! ```

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::{debug, error, trace};

use crate::error::{Result, SelectionError};
use crate::key::{Action, KeyEvent, KeyMap};
use crate::projector::{self, Projection, Selectable};
use crate::state::{ControlProps, Direction, Field, SelectionState, Source, StatePatch};

static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> String {
    format!("roving-{}", LAST_ID.fetch_add(1, Ordering::SeqCst))
}

/// Callback receiving proposed states in controlled mode.
pub type StateChangeFn = Box<dyn FnMut(SelectionState)>;

/// Outcome of [`RovingSelection::commit_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commit {
    /// Controlled mode: the merged state was handed to the callback.
    Proposed(SelectionState),
    /// Uncontrolled mode: internal state changed and the revision was bumped.
    Applied,
    /// Uncontrolled mode: the patch matched the current state.
    Unchanged,
}

/// Roving focus and selection over a list of entries.
pub struct RovingSelection<E> {
    id: String,
    entries: Vec<E>,
    state: SelectionState,
    props: ControlProps,
    direction: Direction,
    key_map: KeyMap,
    on_state_change: Option<StateChangeFn>,
    revision: u64,
    mouse_guard: bool,
    pending_tick: bool,
}

impl<E: fmt::Debug> fmt::Debug for RovingSelection<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RovingSelection")
            .field("id", &self.id)
            .field("entries", &self.entries)
            .field("state", &self.state)
            .field("props", &self.props)
            .field("direction", &self.direction)
            .field("controlled", &self.on_state_change.is_some())
            .field("revision", &self.revision)
            .finish()
    }
}

impl<E: Selectable> RovingSelection<E> {
    /// Creates an uncontrolled, horizontal, left-to-right model.
    #[must_use]
    pub fn new(entries: Vec<E>) -> Self {
        Self {
            id: next_id(),
            entries,
            state: SelectionState::default(),
            props: ControlProps::default(),
            direction: Direction::default(),
            key_map: KeyMap::default(),
            on_state_change: None,
            revision: 0,
            mouse_guard: false,
            pending_tick: false,
        }
    }

    /// Sets the container id used to derive entry ids.
    #[must_use]
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets orientation and text direction.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Navigates with up/down instead of left/right.
    #[must_use]
    pub fn vertical(mut self, vertical: bool) -> Self {
        self.direction.vertical = vertical;
        self
    }

    /// Swaps increment and decrement on the active axis.
    #[must_use]
    pub fn rtl(mut self, rtl: bool) -> Self {
        self.direction.rtl = rtl;
        self
    }

    /// Replaces the key bindings.
    #[must_use]
    pub fn key_map(mut self, key_map: KeyMap) -> Self {
        self.key_map = key_map;
        self
    }

    /// Supplies the focused index externally for the model's lifetime.
    #[must_use]
    pub fn focused_index(mut self, index: Option<usize>) -> Self {
        self.props.focused_index = Source::External(index);
        self
    }

    /// Supplies the selected index externally for the model's lifetime.
    #[must_use]
    pub fn selected_index(mut self, index: Option<usize>) -> Self {
        self.props.selected_index = Source::External(index);
        self
    }

    /// Registers the state-change callback, switching the model to controlled mode.
    #[must_use]
    pub fn on_state_change(mut self, f: impl FnMut(SelectionState) + 'static) -> Self {
        self.on_state_change = Some(Box::new(f));
        self
    }

    /// Returns the container id.
    pub fn container_id(&self) -> &str {
        &self.id
    }

    /// Returns the raw entries.
    pub fn entries(&self) -> &[E] {
        &self.entries
    }

    /// Returns the orientation and text direction.
    pub fn get_direction(&self) -> Direction {
        self.direction
    }

    /// Returns the current key bindings.
    pub fn get_key_map(&self) -> &KeyMap {
        &self.key_map
    }

    /// Returns the externally supplied values.
    pub fn props(&self) -> ControlProps {
        self.props
    }

    /// Counter bumped on every internal state change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Number of entries that receive an index, computed from the current list.
    pub fn num_selectables(&self) -> usize {
        projector::count_selectables(&self.entries)
    }

    /// Replaces the entry list.
    ///
    /// Internally owned indices that no longer fit the new list are dropped.
    pub fn set_entries(&mut self, entries: Vec<E>) {
        self.entries = entries;
        let count = self.num_selectables();
        let kept = SelectionState {
            focused_index: self.state.focused_index.filter(|&i| i <= count),
            selected_index: self.state.selected_index.filter(|&i| i < count),
        };
        if kept != self.state {
            debug!(
                container = %self.id,
                count,
                dropped_focus = ?self.state.focused_index,
                dropped_selection = ?self.state.selected_index,
                "dropping stale indices"
            );
            self.state = kept;
            self.revision += 1;
        }
    }

    /// Rebuilds the entry list from the current one, then applies the same
    /// stale-index rules as [`set_entries`](Self::set_entries).
    pub fn map_entries(&mut self, f: impl FnOnce(Vec<E>) -> Vec<E>) {
        let entries = std::mem::take(&mut self.entries);
        self.set_entries(f(entries));
    }

    /// Re-supplies the externally controlled values.
    ///
    /// # Errors
    ///
    /// Returns [`SelectionError::MixedControlRegime`] if a field moves between
    /// the controlled and uncontrolled regimes. The previous props are kept.
    pub fn set_props(&mut self, props: ControlProps) -> Result<()> {
        for field in [Field::FocusedIndex, Field::SelectedIndex] {
            let was = self.props.source(field).regime();
            let now = props.source(field).regime();
            if was != now {
                error!(container = %self.id, %field, %was, %now, "control regime changed");
                return Err(SelectionError::MixedControlRegime { field, was, now });
            }
        }
        self.props = props;
        Ok(())
    }

    /// Returns the value of `field`: the supplied one if controlled, the
    /// owned one otherwise. Indices past the current list read as unset.
    pub fn get_effective(&self, field: Field) -> Option<usize> {
        let raw = match self.props.source(field) {
            Source::External(value) => value,
            Source::Internal => self.state.get(field),
        };
        let count = self.num_selectables();
        // Focus may rest on the one-past-last boundary; a selection may not.
        raw.filter(|&i| match field {
            Field::FocusedIndex => i <= count,
            Field::SelectedIndex => i < count,
        })
    }

    /// Effective focused index.
    pub fn focused(&self) -> Option<usize> {
        self.get_effective(Field::FocusedIndex)
    }

    /// Effective selected index.
    pub fn selected(&self) -> Option<usize> {
        self.get_effective(Field::SelectedIndex)
    }

    /// Effective state of both fields.
    pub fn state(&self) -> SelectionState {
        SelectionState {
            focused_index: self.focused(),
            selected_index: self.selected(),
        }
    }

    /// Whether the keyboard cursor is on some index.
    pub fn has_focus(&self) -> bool {
        self.focused().is_some()
    }

    /// Whether a choice is committed.
    pub fn has_selection(&self) -> bool {
        self.selected().is_some()
    }

    /// Requests a state change.
    ///
    /// With a callback registered the merged state is proposed and nothing
    /// is stored. Without one the patch is merged into the owned state.
    pub fn commit_state(&mut self, patch: StatePatch) -> Commit {
        if self.on_state_change.is_some() {
            let proposed = patch.apply_to(self.state());
            trace!(
                container = %self.id,
                focused = ?proposed.focused_index,
                selected = ?proposed.selected_index,
                "proposing state"
            );
            if let Some(on_state_change) = self.on_state_change.as_mut() {
                on_state_change(proposed);
            }
            return Commit::Proposed(proposed);
        }

        let next = patch.apply_to(self.state);
        if next == self.state {
            return Commit::Unchanged;
        }
        trace!(
            container = %self.id,
            focused = ?next.focused_index,
            selected = ?next.selected_index,
            "applying state"
        );
        self.state = next;
        self.revision += 1;
        Commit::Applied
    }

    /// Moves the cursor forward, wrapping after the one-past-last boundary.
    pub fn increment_focus(&mut self) -> Commit {
        let count = self.num_selectables();
        let next = match self.focused().or_else(|| self.selected()) {
            Some(base) if base < count => base + 1,
            _ => 0,
        };
        self.commit_state(StatePatch::new().focus(Some(next)))
    }

    /// Moves the cursor backward, wrapping to the one-past-last boundary.
    pub fn decrement_focus(&mut self) -> Commit {
        let count = self.num_selectables();
        let base = self
            .focused()
            .or_else(|| self.selected())
            .unwrap_or(count);
        let next = if base > 0 { base - 1 } else { count };
        self.commit_state(StatePatch::new().focus(Some(next)))
    }

    /// Puts the cursor on the first entry.
    pub fn move_to_start(&mut self) -> Commit {
        self.commit_state(StatePatch::new().focus(Some(0)))
    }

    /// Puts the cursor on the one-past-last boundary.
    pub fn move_to_end(&mut self) -> Commit {
        let count = self.num_selectables();
        self.commit_state(StatePatch::new().focus(Some(count)))
    }

    /// Focuses the given index.
    pub fn focus_index(&mut self, index: usize) -> Commit {
        self.commit_state(StatePatch::new().focus(Some(index)))
    }

    /// Commits the cursor position as the selection.
    ///
    /// A cursor on the one-past-last boundary commits no selection.
    pub fn commit_focused_as_selected(&mut self) -> Commit {
        let count = self.num_selectables();
        let focused = self.focused().filter(|&i| i < count);
        self.commit_state(StatePatch::new().select(focused))
    }

    /// Drops the cursor.
    pub fn clear_focus(&mut self) -> Commit {
        self.commit_state(StatePatch::new().focus(None))
    }

    /// Applies a click on the entry with selection index `index`.
    ///
    /// An index past the selectable entries commits no selection.
    pub fn click(&mut self, index: usize) -> Commit {
        let count = self.num_selectables();
        let selected = Some(index).filter(|&i| i < count);
        self.commit_state(StatePatch::new().select(selected).focus(None))
    }

    /// Handles a key press. Returns true, and suppresses the event's default
    /// action, when the key moved or committed something.
    pub fn dispatch_key_event(&mut self, event: &mut KeyEvent) -> bool {
        let Some(action) = self.key_map.resolve(&event.key) else {
            return false;
        };

        let Direction { vertical, rtl } = self.direction;
        let handled = match action {
            Action::Commit => {
                self.commit_focused_as_selected();
                true
            }
            Action::MoveToEnd => {
                self.move_to_end();
                true
            }
            Action::MoveToStart => {
                self.move_to_start();
                true
            }
            Action::IncrementPrimary | Action::DecrementPrimary if !vertical => {
                self.step(action == Action::IncrementPrimary, rtl);
                true
            }
            Action::IncrementSecondary | Action::DecrementSecondary if vertical => {
                self.step(action == Action::IncrementSecondary, rtl);
                true
            }
            _ => false,
        };

        if handled {
            event.prevent_default();
        }
        trace!(container = %self.id, key = %event.key, ?action, handled, "key dispatched");
        handled
    }

    fn step(&mut self, forward: bool, rtl: bool) {
        if forward != rtl {
            self.increment_focus();
        } else {
            self.decrement_focus();
        }
    }

    /// Container gained focus.
    ///
    /// Ignored while a mouse-down is being processed; otherwise the cursor
    /// goes to the current selection, or the first entry.
    pub fn handle_focus(&mut self) {
        if self.mouse_guard {
            return;
        }
        let target = self.selected().unwrap_or(0);
        self.commit_state(StatePatch::new().focus(Some(target)));
    }

    /// Container lost focus.
    pub fn handle_blur(&mut self) {
        self.clear_focus();
    }

    /// Mouse pressed on the container.
    ///
    /// Raises the guard that stops the focus event from moving the cursor.
    /// The host must call [`tick`](Self::tick) on the next turn of its event
    /// loop to lower it.
    pub fn handle_mouse_down(&mut self) {
        self.mouse_guard = true;
        self.pending_tick = true;
    }

    /// Whether a deferred tick is waiting to run.
    pub fn tick_pending(&self) -> bool {
        self.pending_tick
    }

    /// Runs the deferred work scheduled by [`handle_mouse_down`](Self::handle_mouse_down).
    pub fn tick(&mut self) {
        if self.pending_tick {
            self.pending_tick = false;
            self.mouse_guard = false;
        }
    }

    /// Annotated view of the entries for rendering.
    pub fn project(&self) -> Projection<'_, E> {
        projector::project(&self.entries, &self.id, self.focused(), self.selected())
    }

    /// Id of the focused entry for `aria-activedescendant`, empty if none.
    pub fn active_descendant(&self) -> String {
        self.focused()
            .map(|i| projector::item_id(&self.id, i))
            .unwrap_or_default()
    }

    /// Looks up the entry with selection index `index` and its raw position.
    pub fn entry_at(&self, index: usize) -> Option<(usize, &E)> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.takes_index())
            .nth(index)
    }
}

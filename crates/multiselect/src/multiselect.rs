//! The multi-select coordinator.
//!
//! A [`MultiSelect`] owns two [`RovingSelection`] models, a horizontal one
//! over the committed tokens and a vertical one over the menu candidates, and
//! routes events between them and the free-text input. Neither model knows
//! about the other; every handoff rule lives here.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

use roving::{Action, Dir, Direction, Key, KeyEvent, KeyMap, RovingSelection, Selectable};
use tracing::debug;

use crate::focus::{FocusDriver, FocusTarget};
use crate::message::{EventTarget, Msg, Outcome};

// -----------------------------------------------------------------------------
// Token entries
// -----------------------------------------------------------------------------

/// A token as seen by the token row model.
///
/// Carries the control-wide disabled flag so a disabled control never lets
/// a token take focus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenEntry<T> {
    /// The host's token.
    pub item: T,
    control_disabled: bool,
}

impl<T: Selectable> Selectable for TokenEntry<T> {
    fn is_selectable(&self) -> bool {
        self.item.is_selectable()
    }

    fn is_disabled(&self) -> bool {
        self.control_disabled || self.item.is_disabled()
    }
}

fn wrap_tokens<T>(items: Vec<T>, disabled: bool) -> Vec<TokenEntry<T>> {
    items
        .into_iter()
        .map(|item| TokenEntry {
            item,
            control_disabled: disabled,
        })
        .collect()
}

static LAST_ID: AtomicUsize = AtomicUsize::new(0);

fn next_id() -> usize {
    LAST_ID.fetch_add(1, Ordering::SeqCst)
}

// -----------------------------------------------------------------------------
// Mode
// -----------------------------------------------------------------------------

/// Where keyboard interaction currently happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// A token in the row has the keyboard cursor.
    TokenFocused,
    /// The user is typing; keys go to the text input.
    #[default]
    TextEditing,
    /// The menu has the keyboard cursor.
    MenuNavigating,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TokenFocused => f.write_str("token-focused"),
            Self::TextEditing => f.write_str("text-editing"),
            Self::MenuNavigating => f.write_str("menu-navigating"),
        }
    }
}

// -----------------------------------------------------------------------------
// MultiSelect
// -----------------------------------------------------------------------------

type Callback = Box<dyn FnMut()>;
type RemoveFn<T> = Box<dyn FnMut(usize, &T)>;
type TextChangeFn = Box<dyn FnMut(&str)>;
type KeyDownFn = Box<dyn FnMut(&KeyEvent, Option<usize>)>;

/// Focus work scheduled for the next event-loop turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Deferred {
    focus_input: bool,
}

/// Multi-select combobox state.
///
/// # Example
///
/// ```rust
/// use multiselect::{FocusTarget, Mode, Msg, MultiSelect};
/// use roving::{Entry, Key, KeyEvent};
///
/// let mut select = MultiSelect::new()
///     .tokens(vec![Entry::new("A"), Entry::new("B")])
///     .menu_items(vec![Entry::new("X"), Entry::new("Y")]);
///
/// select.update(Msg::KeyDown(KeyEvent::new(Key::Left)));
/// assert_eq!(select.mode(), Mode::TokenFocused);
/// assert_eq!(select.tokens_model().focused(), Some(1));
/// assert_eq!(select.focus_owner(), Some(FocusTarget::Container));
/// ```
pub struct MultiSelect<T, M> {
    id: String,
    dir: Dir,
    disabled: bool,
    key_map: KeyMap,
    tokens: RovingSelection<TokenEntry<T>>,
    menu: RovingSelection<M>,
    text_value: String,
    open: bool,
    focused: bool,
    mouse_initiated: bool,
    deferred: Option<Deferred>,
    focus_owner: Option<FocusTarget>,
    focus_driver: Option<Box<dyn FocusDriver>>,
    on_text_change: Option<TextChangeFn>,
    on_remove: Option<RemoveFn<T>>,
    on_open: Option<Callback>,
    on_close: Option<Callback>,
    on_focus: Option<Callback>,
    on_blur: Option<Callback>,
    on_key_down: Option<KeyDownFn>,
}

impl<T: fmt::Debug, M: fmt::Debug> fmt::Debug for MultiSelect<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultiSelect")
            .field("id", &self.id)
            .field("dir", &self.dir)
            .field("disabled", &self.disabled)
            .field("tokens", &self.tokens)
            .field("menu", &self.menu)
            .field("text_value", &self.text_value)
            .field("open", &self.open)
            .field("focused", &self.focused)
            .field("focus_owner", &self.focus_owner)
            .finish()
    }
}

impl<T: Selectable, M: Selectable> Default for MultiSelect<T, M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Selectable, M: Selectable> MultiSelect<T, M> {
    /// Creates an empty, enabled, left-to-right control.
    pub fn new() -> Self {
        let tokens = RovingSelection::new(Vec::new()).direction(Direction::horizontal(Dir::Ltr));
        let menu = RovingSelection::new(Vec::new()).direction(Direction::vertical(Dir::Ltr));
        let control = Self {
            id: String::new(),
            dir: Dir::Ltr,
            disabled: false,
            key_map: KeyMap::default(),
            tokens,
            menu,
            text_value: String::new(),
            open: false,
            focused: false,
            mouse_initiated: false,
            deferred: None,
            focus_owner: None,
            focus_driver: None,
            on_text_change: None,
            on_remove: None,
            on_open: None,
            on_close: None,
            on_focus: None,
            on_blur: None,
            on_key_down: None,
        };
        control.id(format!("multiselect-{}", next_id()))
    }

    /// Sets the control id. The token row and menu derive their ids from it.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self.tokens = self.tokens.id(format!("{}-tokens", self.id));
        self.menu = self.menu.id(format!("{}-menu", self.id));
        self
    }

    /// Sets the text direction of both lists.
    pub fn dir(mut self, dir: Dir) -> Self {
        self.dir = dir;
        self.tokens = self.tokens.direction(Direction::horizontal(dir));
        self.menu = self.menu.direction(Direction::vertical(dir));
        self
    }

    /// Disables the control.
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.set_disabled(disabled);
        self
    }

    /// Replaces the key bindings of the control and both lists.
    pub fn key_map(mut self, key_map: KeyMap) -> Self {
        self.tokens = self.tokens.key_map(key_map.clone());
        self.menu = self.menu.key_map(key_map.clone());
        self.key_map = key_map;
        self
    }

    /// Sets the committed tokens.
    pub fn tokens(mut self, tokens: Vec<T>) -> Self {
        self.set_tokens(tokens);
        self
    }

    /// Sets the menu candidates.
    pub fn menu_items(mut self, items: Vec<M>) -> Self {
        self.menu.set_entries(items);
        self
    }

    /// Sets the current text of the input.
    pub fn text_value(mut self, text: impl Into<String>) -> Self {
        self.text_value = text.into();
        self
    }

    /// Further configures the menu model, e.g. to control it from outside.
    pub fn configure_menu(
        mut self,
        f: impl FnOnce(RovingSelection<M>) -> RovingSelection<M>,
    ) -> Self {
        self.menu = f(self.menu);
        self
    }

    /// Sets the driver that moves platform focus.
    pub fn focus_driver(mut self, driver: impl FocusDriver + 'static) -> Self {
        self.focus_driver = Some(Box::new(driver));
        self
    }

    /// Called with the new text whenever the user edits the input.
    pub fn on_text_change(mut self, f: impl FnMut(&str) + 'static) -> Self {
        self.on_text_change = Some(Box::new(f));
        self
    }

    /// Called with a token's raw position when the user removes it.
    pub fn on_remove(mut self, f: impl FnMut(usize, &T) + 'static) -> Self {
        self.on_remove = Some(Box::new(f));
        self
    }

    /// Called when the input gains focus and the popup is requested.
    pub fn on_open(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_open = Some(Box::new(f));
        self
    }

    /// Called when the input loses focus and the popup is dismissed.
    pub fn on_close(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_close = Some(Box::new(f));
        self
    }

    /// Called when focus enters the control.
    pub fn on_focus(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_focus = Some(Box::new(f));
        self
    }

    /// Called when focus leaves the control.
    pub fn on_blur(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_blur = Some(Box::new(f));
        self
    }

    /// Observes every key press after it has been routed, with the token
    /// index focused at that point.
    pub fn on_key_down(mut self, f: impl FnMut(&KeyEvent, Option<usize>) + 'static) -> Self {
        self.on_key_down = Some(Box::new(f));
        self
    }

    // -------------------------------------------------------------------------
    // Host updates
    // -------------------------------------------------------------------------

    /// Replaces the committed tokens.
    pub fn set_tokens(&mut self, tokens: Vec<T>) {
        self.tokens.set_entries(wrap_tokens(tokens, self.disabled));
    }

    /// Replaces the menu candidates.
    pub fn set_menu_items(&mut self, items: Vec<M>) {
        self.menu.set_entries(items);
    }

    /// Enables or disables the control. Tokens of a disabled control never
    /// take focus.
    pub fn set_disabled(&mut self, disabled: bool) {
        if self.disabled == disabled {
            return;
        }
        self.disabled = disabled;
        if disabled {
            self.tokens.clear_focus();
        }
        self.tokens.map_entries(|tokens| {
            tokens
                .into_iter()
                .map(|mut token| {
                    token.control_disabled = disabled;
                    token
                })
                .collect()
        });
    }

    /// Mirrors the externally owned input text.
    pub fn set_text_value(&mut self, text: impl Into<String>) {
        self.text_value = text.into();
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The control id.
    pub fn get_id(&self) -> &str {
        &self.id
    }

    /// The text direction.
    pub fn get_dir(&self) -> Dir {
        self.dir
    }

    /// Whether the control is disabled.
    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// The token row model.
    pub fn tokens_model(&self) -> &RovingSelection<TokenEntry<T>> {
        &self.tokens
    }

    /// The menu model.
    pub fn menu_model(&self) -> &RovingSelection<M> {
        &self.menu
    }

    /// Mutable access to the menu model, e.g. to re-supply controlled props.
    pub fn menu_model_mut(&mut self) -> &mut RovingSelection<M> {
        &mut self.menu
    }

    /// The input text last supplied by the host.
    pub fn get_text_value(&self) -> &str {
        &self.text_value
    }

    /// Whether focus is anywhere inside the control.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Whether the popup is shown. Never true with an empty menu.
    pub fn is_open(&self) -> bool {
        self.open && !self.menu.entries().is_empty()
    }

    /// Whether the input can be collapsed behind the tokens.
    pub fn input_hidden(&self) -> bool {
        !self.tokens.entries().is_empty() && !self.focused && self.text_value.is_empty()
    }

    /// The element the coordinator last gave focus to, as far as it knows.
    pub fn focus_owner(&self) -> Option<FocusTarget> {
        self.focus_owner
    }

    /// Whether a [`Msg::Tick`] is expected.
    pub fn tick_pending(&self) -> bool {
        self.deferred.is_some()
    }

    /// The current interaction mode.
    pub fn mode(&self) -> Mode {
        if self.tokens.has_focus() {
            Mode::TokenFocused
        } else if self.menu.has_focus() {
            Mode::MenuNavigating
        } else {
            Mode::TextEditing
        }
    }

    // -------------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------------

    /// Handles one event.
    pub fn update(&mut self, msg: Msg) -> Outcome {
        let before = self.mode();
        let trigger = msg_name(&msg);

        let outcome = match msg {
            Msg::KeyDown(event) => self.key_down(event),
            Msg::MouseDown { target } => self.mouse_down(target),
            Msg::Click { target } => self.click(target),
            Msg::InputFocus => {
                self.focus_owner = Some(FocusTarget::Input);
                self.set_open(true);
                self.tokens.clear_focus();
                Outcome::default()
            }
            Msg::InputBlur => {
                if self.focus_owner == Some(FocusTarget::Input) {
                    self.focus_owner = None;
                }
                self.set_open(false);
                self.menu.clear_focus();
                Outcome::default()
            }
            Msg::ContainerBlur { target } => self.container_blur(target),
            Msg::FocusIn => {
                self.focused = true;
                if let Some(on_focus) = self.on_focus.as_mut() {
                    on_focus();
                }
                Outcome::default()
            }
            Msg::FocusOut => {
                self.focused = false;
                if let Some(on_blur) = self.on_blur.as_mut() {
                    on_blur();
                }
                Outcome::default()
            }
            Msg::TextChanged(text) => {
                self.menu.clear_focus();
                if let Some(on_text_change) = self.on_text_change.as_mut() {
                    on_text_change(&text);
                }
                Outcome::default()
            }
            Msg::Tick => {
                self.run_deferred();
                Outcome::default()
            }
        };

        let after = self.mode();
        if before != after {
            debug!(control = %self.id, from = %before, to = %after, trigger, "mode changed");
        }
        outcome
    }

    fn key_down(&mut self, mut event: KeyEvent) -> Outcome {
        if self.disabled {
            return Outcome::key(event);
        }
        let action = self.key_map.resolve(&event.key);
        if self.tokens.has_focus() {
            self.token_key(&mut event, action);
        } else if self.text_value.is_empty() {
            self.empty_input_key(&mut event, action);
        } else {
            self.menu.dispatch_key_event(&mut event);
        }

        if let Some(on_key_down) = self.on_key_down.as_mut() {
            on_key_down(&event, self.tokens.focused());
        }
        Outcome::key(event)
    }

    fn token_key(&mut self, event: &mut KeyEvent, action: Option<Action>) {
        let count = self.tokens.num_selectables();
        let focused = self.tokens.focused();
        let first_focused = focused == Some(0);
        let last_focused = count > 0 && focused == Some(count - 1);

        match action {
            Some(Action::ClearAndHandoff) => {
                self.tokens.clear_focus();
            }
            Some(Action::MoveToEnd) => self.leave_tokens(event),
            Some(Action::IncrementPrimary) if last_focused => self.leave_tokens(event),
            Some(Action::RemoveCommitted) => {
                if let Some(index) = focused {
                    self.remove_token_at(index);
                }
                self.tokens.clear_focus();
                self.move_focus(FocusTarget::Input);
            }
            // No wrapping past the first token.
            Some(Action::DecrementPrimary) if first_focused => {}
            _ => {
                self.tokens.dispatch_key_event(event);
            }
        }
    }

    fn leave_tokens(&mut self, event: &mut KeyEvent) {
        self.tokens.clear_focus();
        self.move_focus(FocusTarget::Input);
        event.prevent_default();
    }

    fn empty_input_key(&mut self, event: &mut KeyEvent, action: Option<Action>) {
        let len = self.tokens.entries().len();
        if len == 0 {
            return;
        }
        let count = self.tokens.num_selectables();

        if event.key == Key::Backspace {
            self.remove_raw_token(len - 1);
            self.move_focus(FocusTarget::Input);
            return;
        }
        match action {
            Some(Action::DecrementPrimary) if count > 0 => {
                self.tokens.focus_index(count - 1);
                self.move_focus(FocusTarget::Container);
            }
            Some(Action::MoveToStart) if count > 0 => {
                self.tokens.focus_index(0);
                self.move_focus(FocusTarget::Container);
                event.prevent_default();
            }
            _ => {}
        }
    }

    fn remove_token_at(&mut self, index: usize) {
        if let Some((raw, _)) = self.tokens.entry_at(index) {
            self.remove_raw_token(raw);
        }
    }

    fn remove_raw_token(&mut self, raw: usize) {
        let Some(token) = self.tokens.entries().get(raw) else {
            return;
        };
        debug!(control = %self.id, raw, "removing token");
        if let Some(on_remove) = self.on_remove.as_mut() {
            on_remove(raw, &token.item);
        }
    }

    fn mouse_down(&mut self, target: EventTarget) -> Outcome {
        if self.disabled {
            return Outcome::suppressed();
        }
        let was_container = target == EventTarget::Container;
        if was_container {
            self.tokens.clear_focus();
        }
        self.mouse_initiated = true;
        // Presses before the next tick accumulate.
        let pending = self.deferred.is_some_and(|d| d.focus_input);
        self.deferred = Some(Deferred {
            focus_input: pending || was_container,
        });
        Outcome::tick()
    }

    fn click(&mut self, target: EventTarget) -> Outcome {
        if self.disabled {
            return Outcome::suppressed();
        }
        if let EventTarget::MenuItem(index) = target {
            self.menu.click(index);
        }
        Outcome::default()
    }

    fn container_blur(&mut self, target: EventTarget) -> Outcome {
        if self.mouse_initiated {
            return Outcome::suppressed();
        }
        if target == EventTarget::Container {
            self.tokens.clear_focus();
        }
        Outcome::default()
    }

    fn run_deferred(&mut self) {
        let Some(deferred) = self.deferred.take() else {
            return;
        };
        debug!(control = %self.id, focus_input = deferred.focus_input, "running deferred focus");
        if deferred.focus_input {
            self.move_focus(FocusTarget::Input);
        }
        self.mouse_initiated = false;
    }

    fn move_focus(&mut self, target: FocusTarget) {
        self.focus_owner = Some(target);
        if let Some(driver) = self.focus_driver.as_mut() {
            driver.focus(target);
        }
    }

    fn set_open(&mut self, open: bool) {
        if self.open == open {
            return;
        }
        self.open = open;
        debug!(control = %self.id, open, "popup toggled");
        let callback = if open {
            self.on_open.as_mut()
        } else {
            self.on_close.as_mut()
        };
        if let Some(callback) = callback {
            callback();
        }
    }
}

fn msg_name(msg: &Msg) -> &'static str {
    match msg {
        Msg::KeyDown(_) => "key-down",
        Msg::MouseDown { .. } => "mouse-down",
        Msg::Click { .. } => "click",
        Msg::InputFocus => "input-focus",
        Msg::InputBlur => "input-blur",
        Msg::ContainerBlur { .. } => "container-blur",
        Msg::FocusIn => "focus-in",
        Msg::FocusOut => "focus-out",
        Msg::TextChanged(_) => "text-changed",
        Msg::Tick => "tick",
    }
}

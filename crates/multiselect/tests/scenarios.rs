//! End-to-end keyboard, pointer and focus scenarios for the multi-select.

use std::cell::RefCell;
use std::rc::Rc;

use multiselect::{Cmd, EventTarget, FocusTarget, Mode, Msg, MultiSelect, Outcome};
use roving::{Dir, Entry, Key, KeyEvent, SelectionState};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::TRACE)
        .try_init();
}

fn entries(labels: &[&str]) -> Vec<Entry> {
    labels.iter().map(|l| Entry::new(*l)).collect()
}

struct Harness {
    select: MultiSelect<Entry, Entry>,
    focus_calls: Rc<RefCell<Vec<FocusTarget>>>,
    removed: Rc<RefCell<Vec<(usize, String)>>>,
    texts: Rc<RefCell<Vec<String>>>,
    popup: Rc<RefCell<Vec<&'static str>>>,
}

impl Harness {
    fn new(tokens: &[&str], menu: &[&str], text: &str) -> Self {
        Self::with(tokens, menu, text, |s| s)
    }

    fn with(
        tokens: &[&str],
        menu: &[&str],
        text: &str,
        configure: impl FnOnce(MultiSelect<Entry, Entry>) -> MultiSelect<Entry, Entry>,
    ) -> Self {
        init_tracing();
        let focus_calls = Rc::new(RefCell::new(Vec::new()));
        let removed = Rc::new(RefCell::new(Vec::new()));
        let texts = Rc::new(RefCell::new(Vec::new()));
        let popup = Rc::new(RefCell::new(Vec::new()));

        let (f, r, t, o, c) = (
            Rc::clone(&focus_calls),
            Rc::clone(&removed),
            Rc::clone(&texts),
            Rc::clone(&popup),
            Rc::clone(&popup),
        );
        let select = MultiSelect::new()
            .id("ms")
            .tokens(entries(tokens))
            .menu_items(entries(menu))
            .text_value(text)
            .focus_driver(move |target: FocusTarget| f.borrow_mut().push(target))
            .on_remove(move |raw, token: &Entry| r.borrow_mut().push((raw, token.label.clone())))
            .on_text_change(move |text| t.borrow_mut().push(text.to_string()))
            .on_open(move || o.borrow_mut().push("open"))
            .on_close(move || c.borrow_mut().push("close"));

        Self {
            select: configure(select),
            focus_calls,
            removed,
            texts,
            popup,
        }
    }

    fn press(&mut self, key: Key) -> Outcome {
        self.select.update(Msg::KeyDown(KeyEvent::new(key)))
    }

    fn token_focus(&self) -> Option<usize> {
        self.select.tokens_model().focused()
    }

    fn menu_focus(&self) -> Option<usize> {
        self.select.menu_model().focused()
    }
}

mod token_row {
    use super::*;

    #[test]
    fn test_left_left_backspace() {
        let mut h = Harness::new(&["A", "B"], &["X", "Y", "Z"], "");
        h.select.update(Msg::InputFocus);
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Input));

        h.press(Key::Left);
        assert_eq!(h.token_focus(), Some(1));
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Container));
        assert_eq!(h.select.mode(), Mode::TokenFocused);

        let out = h.press(Key::Left);
        assert_eq!(h.token_focus(), Some(0));
        assert!(out.default_prevented);

        h.press(Key::Backspace);
        assert_eq!(h.removed.borrow().as_slice(), &[(0, "A".to_string())]);
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Input));
        assert_eq!(h.token_focus(), None);
        assert_eq!(h.select.mode(), Mode::TextEditing);
        assert_eq!(
            h.focus_calls.borrow().as_slice(),
            &[FocusTarget::Container, FocusTarget::Input]
        );
    }

    #[test]
    fn test_left_does_not_wrap_past_first_token() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.press(Key::Left);
        h.press(Key::Left);
        let out = h.press(Key::Left);
        assert_eq!(h.token_focus(), Some(0));
        assert!(!out.default_prevented);
        assert_eq!(h.select.mode(), Mode::TokenFocused);
    }

    #[test]
    fn test_right_on_last_token_returns_to_input() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.press(Key::Left);
        let out = h.press(Key::Right);
        assert!(out.default_prevented);
        assert_eq!(h.token_focus(), None);
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Input));
    }

    #[test]
    fn test_right_inside_row_moves_forward() {
        let mut h = Harness::new(&["A", "B", "C"], &[], "");
        h.select.update(Msg::KeyDown(KeyEvent::new(Key::Home)));
        assert_eq!(h.token_focus(), Some(0));
        h.press(Key::Right);
        assert_eq!(h.token_focus(), Some(1));
        assert_eq!(h.select.mode(), Mode::TokenFocused);
    }

    #[test]
    fn test_end_returns_to_input() {
        let mut h = Harness::new(&["A", "B", "C"], &[], "");
        h.press(Key::Left);
        h.press(Key::Left);
        let out = h.press(Key::End);
        assert!(out.default_prevented);
        assert_eq!(h.select.mode(), Mode::TextEditing);
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Input));
    }

    #[test]
    fn test_tab_clears_token_focus_without_suppressing() {
        let mut h = Harness::new(&["A"], &[], "");
        h.press(Key::Left);
        let out = h.press(Key::Tab);
        assert!(!out.default_prevented);
        assert_eq!(h.token_focus(), None);
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Container));
    }

    #[test]
    fn test_delete_removes_focused_token() {
        let mut h = Harness::new(&["A", "B", "C"], &[], "");
        h.press(Key::Left);
        h.press(Key::Left);
        h.press(Key::Delete);
        assert_eq!(h.removed.borrow().as_slice(), &[(1, "B".to_string())]);
        assert_eq!(h.token_focus(), None);
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Input));
    }

    #[test]
    fn test_removal_reports_raw_position() {
        let tokens = vec![
            Entry::new("A").disabled(true),
            Entry::new("B"),
            Entry::new("C"),
        ];
        let removed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&removed);
        let mut select = MultiSelect::<Entry, Entry>::new()
            .tokens(tokens)
            .on_remove(move |raw, _: &Entry| sink.borrow_mut().push(raw));

        select.update(Msg::KeyDown(KeyEvent::new(Key::Home)));
        assert_eq!(select.tokens_model().focused(), Some(0));
        select.update(Msg::KeyDown(KeyEvent::new(Key::Delete)));
        assert_eq!(removed.borrow().as_slice(), &[1]);
    }

    #[test]
    fn test_token_ids_derive_from_control_id() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.press(Key::Left);
        assert_eq!(h.select.tokens_model().active_descendant(), "ms-tokens--1");
    }
}

mod empty_input {
    use super::*;

    #[test]
    fn test_home_focuses_first_token() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        let out = h.press(Key::Home);
        assert!(out.default_prevented);
        assert_eq!(h.token_focus(), Some(0));
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Container));
    }

    #[test]
    fn test_backspace_removes_last_token_and_keeps_input() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.select.update(Msg::InputFocus);
        h.press(Key::Backspace);
        assert_eq!(h.removed.borrow().as_slice(), &[(1, "B".to_string())]);
        assert_eq!(h.select.mode(), Mode::TextEditing);
        assert_eq!(h.select.focus_owner(), Some(FocusTarget::Input));
    }

    #[test]
    fn test_no_tokens_ignores_keys() {
        let mut h = Harness::new(&[], &["X"], "");
        for key in [Key::Left, Key::Home, Key::Backspace, Key::Down] {
            let out = h.press(key);
            assert!(!out.default_prevented);
        }
        assert!(h.removed.borrow().is_empty());
        assert_eq!(h.menu_focus(), None);
        assert!(h.focus_calls.borrow().is_empty());
    }

    #[test]
    fn test_down_does_not_reach_menu_without_text() {
        let mut h = Harness::new(&["A"], &["X", "Y"], "");
        h.press(Key::Down);
        assert_eq!(h.menu_focus(), None);
        assert_eq!(h.token_focus(), None);
    }
}

mod menu {
    use super::*;

    #[test]
    fn test_down_wraps_through_boundary() {
        let mut h = Harness::new(&[], &["X", "Y", "Z"], "x");
        let seen: Vec<_> = (0..5)
            .map(|_| {
                let out = h.press(Key::Down);
                assert!(out.default_prevented);
                h.menu_focus()
            })
            .collect();
        assert_eq!(seen, vec![Some(0), Some(1), Some(2), Some(3), Some(0)]);
        assert_eq!(h.select.mode(), Mode::MenuNavigating);
    }

    #[test]
    fn test_enter_commits_menu_entry() {
        let mut h = Harness::new(&[], &["X", "Y", "Z"], "y");
        h.press(Key::Down);
        h.press(Key::Down);
        h.press(Key::Enter);
        assert_eq!(h.select.menu_model().selected(), Some(1));
        assert_eq!(h.select.menu_model().active_descendant(), "ms-menu--1");
    }

    #[test]
    fn test_left_right_ignored_in_menu() {
        let mut h = Harness::new(&["A"], &["X", "Y"], "x");
        let out = h.press(Key::Left);
        assert!(!out.default_prevented);
        assert_eq!(h.token_focus(), None);
        assert_eq!(h.menu_focus(), None);
    }

    #[test]
    fn test_rtl_menu_inverts_up_down() {
        let mut h = Harness::with(&[], &["X", "Y", "Z"], "x", |s| s.dir(Dir::Rtl));
        h.press(Key::Up);
        assert_eq!(h.menu_focus(), Some(0));
        h.press(Key::Down);
        assert_eq!(h.menu_focus(), Some(3));
    }

    #[test]
    fn test_click_on_menu_item_commits() {
        let mut h = Harness::new(&[], &["X", "Y", "Z"], "x");
        h.press(Key::Down);
        h.select.update(Msg::Click {
            target: EventTarget::MenuItem(2),
        });
        assert_eq!(h.select.menu_model().selected(), Some(2));
        assert_eq!(h.menu_focus(), None);
    }

    #[test]
    fn test_text_change_clears_menu_focus_and_propagates() {
        let mut h = Harness::new(&[], &["X", "Y"], "x");
        h.press(Key::Down);
        h.select.update(Msg::TextChanged("xy".into()));
        assert_eq!(h.menu_focus(), None);
        assert_eq!(h.texts.borrow().as_slice(), &["xy".to_string()]);
        assert_eq!(h.select.get_text_value(), "x");

        h.select.set_text_value("xy");
        assert_eq!(h.select.get_text_value(), "xy");
    }

    #[test]
    fn test_controlled_menu_only_proposes() {
        let proposals = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&proposals);
        let mut h = Harness::with(&[], &["X", "Y"], "x", move |s| {
            s.configure_menu(|m| {
                m.focused_index(None)
                    .on_state_change(move |state| sink.borrow_mut().push(state))
            })
        });

        h.press(Key::Down);
        assert_eq!(h.menu_focus(), None);
        assert_eq!(
            proposals.borrow().as_slice(),
            &[SelectionState {
                focused_index: Some(0),
                selected_index: None
            }]
        );

        h.select
            .menu_model_mut()
            .set_props(roving::ControlProps::new().focused(Some(0)))
            .unwrap();
        assert_eq!(h.menu_focus(), Some(0));
    }
}

mod popup {
    use super::*;

    #[test]
    fn test_open_requires_menu_entries() {
        let mut h = Harness::new(&[], &[], "");
        h.select.update(Msg::InputFocus);
        assert!(!h.select.is_open());
        assert_eq!(h.popup.borrow().as_slice(), &["open"]);

        h.select.set_menu_items(entries(&["X"]));
        assert!(h.select.is_open());

        h.select.update(Msg::InputBlur);
        assert!(!h.select.is_open());
        assert_eq!(h.popup.borrow().as_slice(), &["open", "close"]);
    }

    #[test]
    fn test_input_focus_clears_token_focus() {
        let mut h = Harness::new(&["A", "B"], &["X"], "");
        h.press(Key::Left);
        h.select.update(Msg::InputFocus);
        assert_eq!(h.token_focus(), None);
        assert!(h.select.is_open());
    }

    #[test]
    fn test_input_blur_clears_menu_focus() {
        let mut h = Harness::new(&[], &["X", "Y"], "x");
        h.select.update(Msg::InputFocus);
        h.press(Key::Down);
        h.select.update(Msg::InputBlur);
        assert_eq!(h.menu_focus(), None);
        assert_eq!(h.select.focus_owner(), None);
    }
}

mod pointer {
    use super::*;

    #[test]
    fn test_container_mouse_down_defers_input_focus() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.press(Key::Left);

        let out = h.select.update(Msg::MouseDown {
            target: EventTarget::Container,
        });
        assert_eq!(out.cmd, Some(Cmd::Tick));
        assert_eq!(h.token_focus(), None);
        assert!(h.select.tick_pending());
        assert_eq!(h.focus_calls.borrow().as_slice(), &[FocusTarget::Container]);

        let blur = h.select.update(Msg::ContainerBlur {
            target: EventTarget::Container,
        });
        assert!(blur.default_prevented);
        assert!(blur.stop_propagation);

        h.select.update(Msg::Tick);
        assert!(!h.select.tick_pending());
        assert_eq!(
            h.focus_calls.borrow().as_slice(),
            &[FocusTarget::Container, FocusTarget::Input]
        );

        let blur = h.select.update(Msg::ContainerBlur {
            target: EventTarget::Container,
        });
        assert!(!blur.default_prevented);
    }

    #[test]
    fn test_mouse_downs_before_tick_accumulate() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.select.update(Msg::MouseDown {
            target: EventTarget::Container,
        });
        let out = h.select.update(Msg::MouseDown {
            target: EventTarget::Token(0),
        });
        assert_eq!(out.cmd, Some(Cmd::Tick));

        h.select.update(Msg::Tick);
        h.select.update(Msg::Tick);
        assert_eq!(h.focus_calls.borrow().as_slice(), &[FocusTarget::Input]);
        assert!(!h.select.tick_pending());
    }

    #[test]
    fn test_child_mouse_down_keeps_token_focus() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.press(Key::Left);
        h.select.update(Msg::MouseDown {
            target: EventTarget::Token(0),
        });
        assert_eq!(h.token_focus(), Some(1));
        h.select.update(Msg::Tick);
        assert_eq!(h.focus_calls.borrow().as_slice(), &[FocusTarget::Container]);
    }

    #[test]
    fn test_container_blur_clears_token_focus() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.press(Key::Left);
        h.select.update(Msg::ContainerBlur {
            target: EventTarget::Token(1),
        });
        assert_eq!(h.token_focus(), Some(1));
        h.select.update(Msg::ContainerBlur {
            target: EventTarget::Container,
        });
        assert_eq!(h.token_focus(), None);
    }

    #[test]
    fn test_tick_without_pending_work_is_noop() {
        let mut h = Harness::new(&["A"], &[], "");
        let out = h.select.update(Msg::Tick);
        assert_eq!(out, Outcome::default());
        assert!(h.focus_calls.borrow().is_empty());
    }
}

mod control {
    use super::*;

    #[test]
    fn test_disabled_control_swallows_input() {
        let mut h = Harness::with(&["A", "B"], &["X"], "", |s| s.disabled(true));
        assert_eq!(h.select.tokens_model().num_selectables(), 0);

        let out = h.press(Key::Left);
        assert!(!out.default_prevented);
        assert_eq!(h.token_focus(), None);

        let out = h.select.update(Msg::MouseDown {
            target: EventTarget::Container,
        });
        assert!(out.default_prevented);
        assert_eq!(out.cmd, None);

        let out = h.select.update(Msg::Click {
            target: EventTarget::MenuItem(0),
        });
        assert!(out.stop_propagation);
        assert_eq!(h.select.menu_model().selected(), None);

        h.select.set_disabled(false);
        assert_eq!(h.select.tokens_model().num_selectables(), 2);
        h.press(Key::Left);
        assert_eq!(h.token_focus(), Some(1));
    }

    #[test]
    fn test_disabling_drops_token_focus() {
        let mut h = Harness::new(&["A", "B"], &[], "");
        h.press(Key::Home);
        assert_eq!(h.select.mode(), Mode::TokenFocused);
        h.select.set_disabled(true);
        assert!(h.select.is_disabled());
        assert_eq!(h.token_focus(), None);
        assert_eq!(h.select.mode(), Mode::TextEditing);
    }

    #[test]
    fn test_input_hidden() {
        let mut h = Harness::new(&["A"], &[], "");
        assert!(h.select.input_hidden());
        h.select.update(Msg::FocusIn);
        assert!(h.select.is_focused());
        assert!(!h.select.input_hidden());
        h.select.update(Msg::FocusOut);
        h.select.set_text_value("a");
        assert!(!h.select.input_hidden());
        h.select.set_text_value("");
        h.select.set_tokens(Vec::new());
        assert!(!h.select.input_hidden());
    }

    #[test]
    fn test_key_down_observer_sees_routed_token_focus() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut h = Harness::with(&["A", "B"], &[], "", move |s| {
            s.on_key_down(move |event, token| sink.borrow_mut().push((event.key, token)))
        });
        h.press(Key::Left);
        h.press(Key::Left);
        assert_eq!(
            seen.borrow().as_slice(),
            &[(Key::Left, Some(1)), (Key::Left, Some(0))]
        );
    }

    #[test]
    fn test_focus_callbacks() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let (a, b) = (Rc::clone(&calls), Rc::clone(&calls));
        let mut select = MultiSelect::<Entry, Entry>::new()
            .on_focus(move || a.borrow_mut().push("focus"))
            .on_blur(move || b.borrow_mut().push("blur"));
        select.update(Msg::FocusIn);
        select.update(Msg::FocusOut);
        assert_eq!(calls.borrow().as_slice(), &["focus", "blur"]);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        let a = MultiSelect::<Entry, Entry>::new();
        let b = MultiSelect::<Entry, Entry>::new();
        assert_ne!(a.get_id(), b.get_id());
        assert!(a.get_id().starts_with("multiselect-"));
        assert_eq!(
            a.menu_model().container_id(),
            format!("{}-menu", a.get_id())
        );
    }
}

//! AppState interaction tests: keyboard flows, reflow adoption, throttling.

use super::*;
use crate::config::ResolvedConfig;

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn numbered_lines(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("line {}", i)).collect()
}

fn state_with_lines(count: usize) -> AppState {
    let mut state = AppState::new(&ResolvedConfig::default());
    state.set_viewport(82, 23); // pane: 80 wide, 20 rows
    state.apply_reflow(ReflowReply {
        generation: 1,
        lines: numbered_lines(count),
        degraded: false,
    });
    state
}

mod keys {
    use super::*;

    #[test]
    fn q_quits() {
        let mut state = state_with_lines(10);
        assert_eq!(state.handle_key(key(KeyCode::Char('q'))), KeyOutcome::Quit);
    }

    #[test]
    fn esc_quits_when_no_search_is_active() {
        let mut state = state_with_lines(10);
        assert_eq!(state.handle_key(key(KeyCode::Esc)), KeyOutcome::Quit);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut state = state_with_lines(10);
        state.handle_key(key(KeyCode::Char('/')));
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(state.handle_key(ctrl_c), KeyOutcome::Quit);
    }

    #[test]
    fn arrows_scroll_and_clear_follow() {
        let mut state = state_with_lines(100);
        assert!(state.scroll().follow());
        state.handle_key(key(KeyCode::Up));
        assert!(!state.scroll().follow());
        let offset = state.scroll().viewport().scroll_offset;
        state.handle_key(key(KeyCode::Down));
        assert_eq!(state.scroll().viewport().scroll_offset, offset + 1);
    }

    #[test]
    fn page_keys_move_by_container_height() {
        let mut state = state_with_lines(100);
        state.handle_key(key(KeyCode::Home));
        state.handle_key(key(KeyCode::PageDown));
        assert_eq!(state.scroll().viewport().scroll_offset, 20);
        state.handle_key(key(KeyCode::PageUp));
        assert_eq!(state.scroll().viewport().scroll_offset, 0);
    }

    #[test]
    fn f_reenables_follow() {
        let mut state = state_with_lines(100);
        state.handle_key(key(KeyCode::Up));
        assert!(!state.scroll().follow());
        state.handle_key(key(KeyCode::Char('f')));
        assert!(state.scroll().follow());
        assert_eq!(state.scroll().viewport().scroll_offset, 80);
    }
}

mod search_flow {
    use super::*;

    fn type_query(state: &mut AppState, query: &str) {
        state.handle_key(key(KeyCode::Char('/')));
        for c in query.chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn slash_opens_the_search_bar() {
        let mut state = state_with_lines(10);
        state.handle_key(key(KeyCode::Char('/')));
        assert_eq!(
            state.search_mode(),
            &SearchMode::Typing {
                query: String::new()
            }
        );
        assert!(state.search_bar_visible());
    }

    #[test]
    fn typed_characters_accumulate_and_backspace_deletes() {
        let mut state = state_with_lines(10);
        type_query(&mut state, "line 7");
        state.handle_key(key(KeyCode::Backspace));
        assert_eq!(
            state.search_mode(),
            &SearchMode::Typing {
                query: "line ".to_string()
            }
        );
    }

    #[test]
    fn enter_activates_and_centers_the_first_match() {
        let mut state = state_with_lines(100);
        type_query(&mut state, "line 50");
        state.handle_key(key(KeyCode::Enter));

        assert_eq!(state.search_mode(), &SearchMode::Active);
        assert_eq!(state.search().len(), 1);
        // Container is 20 rows; row 50 centered puts the offset near 41.
        assert_eq!(state.scroll().viewport().scroll_offset, 41);
    }

    #[test]
    fn centering_a_match_does_not_clear_follow() {
        let mut state = state_with_lines(100);
        assert!(state.scroll().follow());
        type_query(&mut state, "line 50");
        state.handle_key(key(KeyCode::Enter));
        assert!(state.scroll().follow());
    }

    #[test]
    fn n_cycles_matches_with_wraparound() {
        let mut state = state_with_lines(100);
        type_query(&mut state, "line 1"); // matches line 1, 10..19, 100s absent
        state.handle_key(key(KeyCode::Enter));
        let total = state.search().len();
        assert_eq!(total, 11);

        for _ in 0..total {
            state.handle_key(key(KeyCode::Char('n')));
        }
        assert_eq!(state.search().cursor_index(), 0, "n wraps around");

        state.handle_key(key(KeyCode::Char('N')));
        assert_eq!(state.search().cursor_index(), total - 1);
    }

    #[test]
    fn esc_in_typing_cancels_without_activating() {
        let mut state = state_with_lines(10);
        type_query(&mut state, "anything");
        state.handle_key(key(KeyCode::Esc));
        assert_eq!(state.search_mode(), &SearchMode::Inactive);
        assert!(state.search().is_empty());
    }

    #[test]
    fn esc_in_active_clears_the_search() {
        let mut state = state_with_lines(10);
        type_query(&mut state, "line");
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.handle_key(key(KeyCode::Esc)), KeyOutcome::Continue);
        assert_eq!(state.search_mode(), &SearchMode::Inactive);
        assert!(state.search().is_empty());
        assert_eq!(state.search().query(), "");
    }

    #[test]
    fn arm_search_activates_before_lines_arrive() {
        let mut state = AppState::new(&ResolvedConfig::default());
        state.arm_search("line 3".to_string());
        assert_eq!(state.search_mode(), &SearchMode::Active);
        assert!(state.search().is_empty());

        state.apply_reflow(ReflowReply {
            generation: 1,
            lines: numbered_lines(10),
            degraded: false,
        });
        assert_eq!(state.search().len(), 1);
    }
}

mod reflow_adoption {
    use super::*;

    #[test]
    fn apply_reflow_replaces_lines_and_degraded_flag() {
        let mut state = state_with_lines(5);
        state.apply_reflow(ReflowReply {
            generation: 2,
            lines: vec!["only".to_string()],
            degraded: true,
        });
        assert_eq!(state.lines(), &["only".to_string()]);
        assert!(state.degraded());
    }

    #[test]
    fn growth_autoscrolls_while_following() {
        let mut state = state_with_lines(100);
        assert!(state.scroll().follow());
        assert_eq!(state.scroll().viewport().scroll_offset, 80);

        state.apply_reflow(ReflowReply {
            generation: 2,
            lines: numbered_lines(200),
            degraded: false,
        });
        assert_eq!(state.scroll().viewport().scroll_offset, 180);
    }

    #[test]
    fn active_search_is_rebuilt_on_new_lines() {
        let mut state = state_with_lines(10);
        state.handle_key(key(KeyCode::Char('/')));
        for c in "line 9".chars() {
            state.handle_key(key(KeyCode::Char(c)));
        }
        state.handle_key(key(KeyCode::Enter));
        assert_eq!(state.search().len(), 1);

        state.apply_reflow(ReflowReply {
            generation: 2,
            lines: numbered_lines(100),
            degraded: false,
        });
        // "line 9" now also prefixes 90..99.
        assert_eq!(state.search().len(), 11);
        assert_eq!(state.search().cursor_index(), 0, "rebuild resets cursor");
    }
}

mod reflow_scheduling {
    use super::*;

    #[test]
    fn first_snapshot_is_submitted_immediately() {
        let mut state = AppState::new(&ResolvedConfig::default());
        state.set_viewport(82, 23);
        assert!(state.reflow_due(Instant::now()).is_some());
    }

    #[test]
    fn unchanged_inputs_do_not_resubmit() {
        let mut state = AppState::new(&ResolvedConfig::default());
        state.set_viewport(82, 23);
        let now = Instant::now();
        assert!(state.reflow_due(now).is_some());
        assert!(state.reflow_due(now).is_none());
    }

    #[test]
    fn width_changes_are_throttled() {
        let mut state = AppState::new(&ResolvedConfig::default());
        state.set_viewport(82, 23);
        let t0 = Instant::now();
        assert!(state.reflow_due(t0).is_some());

        // First width change goes through and arms the throttle.
        state.set_viewport(100, 23);
        let first = state.reflow_due(t0).expect("first width change submits");
        assert_eq!(first.1, 98);

        // A second width change inside the throttle window is held back.
        state.set_viewport(120, 23);
        assert!(state.reflow_due(t0 + Duration::from_millis(100)).is_none());
        // ...and released once the window has passed.
        let released = state
            .reflow_due(t0 + Duration::from_secs(2))
            .expect("throttle expired");
        assert_eq!(released.1, 118);
    }

    #[test]
    fn text_growth_bypasses_the_width_throttle() {
        let mut state = AppState::new(&ResolvedConfig::default());
        state.set_viewport(82, 23);
        let t0 = Instant::now();
        assert!(state.reflow_due(t0).is_some());

        state.set_viewport(100, 23);
        assert!(state.reflow_due(t0).is_some());

        // New text arrives: submit immediately, throttle or not.
        use crate::source::{LogFragment, LogsReply};
        let request = state
            .coordinator_mut()
            .start(crate::model::RunId::new("r1").unwrap(), false, t0);
        state.coordinator_mut().on_reply(
            LogsReply {
                epoch: request.epoch,
                run: request.run.clone(),
                outcome: Ok(LogFragment {
                    log: "fresh output\n".to_string(),
                    last_seen: Some(crate::model::Cursor::new("c1")),
                }),
                received_at: chrono::Utc::now(),
            },
            false,
        );
        let submitted = state.reflow_due(t0 + Duration::from_millis(10));
        let (text, _) = submitted.expect("length change submits immediately");
        assert_eq!(&*text, "fresh output\n");
    }

    #[test]
    fn viewport_reserves_borders_for_wrap_width() {
        let mut state = AppState::new(&ResolvedConfig::default());
        state.set_viewport(82, 23);
        let (_, width) = state.reflow_due(Instant::now()).expect("initial submit");
        assert_eq!(width, 80);
    }
}

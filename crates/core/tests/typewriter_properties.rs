//! Property tests for the typewriter rotation and the scroll derivation,
//! driven through the public stage and scroll APIs.

use std::time::Duration;

use folio_core::config::TypewriterConfig;
use folio_core::scroll::on_scroll_sample;
use folio_core::typewriter::Typewriter;
use folio_core::Stage;
use folio_protocol::Phase;
use proptest::prelude::*;

/// Ticks needed to type, pause, delete and advance past one phrase.
fn cycle_ticks(len: usize) -> usize {
    len + 1 + 1 + len + 1
}

fn phrases() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-zé🚀 ]{0,6}", 1..5)
}

proptest! {
    #[test]
    fn looping_rotation_is_round_robin(list in phrases(), cycles in 0usize..12) {
        let mut tw = Typewriter::new(TypewriterConfig::new(list.iter().map(String::as_str)));
        for k in 0..cycles {
            let len = list[k % list.len()].chars().count();
            for _ in 0..cycle_ticks(len) {
                tw.tick();
            }
        }
        let state = tw.state();
        prop_assert_eq!(state.phrase_index, cycles % list.len());
        prop_assert_eq!(state.char_index, 0);
        prop_assert_eq!(state.phase, Phase::Typing);
    }

    #[test]
    fn displayed_text_is_always_a_prefix(list in phrases(), loop_phrases: bool, ticks in 0usize..120) {
        let config = TypewriterConfig::new(list.iter().map(String::as_str)).with_loop(loop_phrases);
        let mut tw = Typewriter::new(config);
        for _ in 0..ticks {
            tw.tick();
            let phrase = &list[tw.state().phrase_index];
            prop_assert!(phrase.starts_with(tw.displayed_text()));
            prop_assert!(tw.displayed_text().chars().count() <= phrase.chars().count());
            prop_assert_eq!(tw.displayed_text().chars().count(), tw.state().char_index);
        }
    }

    #[test]
    fn non_looping_rotation_settles(list in phrases()) {
        let config = TypewriterConfig::new(list.iter().map(String::as_str)).with_loop(false);
        let mut tw = Typewriter::new(config);
        let budget: usize = list.iter().map(|p| cycle_ticks(p.chars().count())).sum();
        for _ in 0..budget {
            tw.tick();
        }
        prop_assert!(tw.is_finished());
        prop_assert_eq!(tw.displayed_text(), list[list.len() - 1].as_str());

        let settled = tw.state();
        for _ in 0..10 {
            prop_assert!(!tw.tick());
        }
        prop_assert_eq!(tw.state(), settled);
        prop_assert_eq!(tw.next_delay(), None);
    }

    #[test]
    fn progress_stays_in_range(offset in 0.0f64..1e9, height in -1e6f64..1e6) {
        let derived = on_scroll_sample(offset, height, 300.0);
        prop_assert!((0.0..=100.0).contains(&derived.progress_percent));
        if height <= 0.0 {
            prop_assert_eq!(derived.progress_percent, 0.0);
        }
    }

    #[test]
    fn threshold_boundary(threshold in 0u32..100_000) {
        let t = f64::from(threshold);
        prop_assert!(!on_scroll_sample(t, 1e6, t).is_past_threshold);
        prop_assert!(on_scroll_sample(t + 1.0, 1e6, t).is_past_threshold);
    }

    #[test]
    fn unmounted_instance_never_changes(list in phrases(), before_ms in 0u64..5_000) {
        let mut stage = Stage::new();
        let id = stage.mount(TypewriterConfig::new(list.iter().map(String::as_str)));
        let other = stage.mount(TypewriterConfig::new(["steady"]));
        stage.advance_by(Duration::from_millis(before_ms));

        prop_assert!(stage.unmount(id));
        let other_before = stage.state(other);
        stage.unmount(other);
        prop_assert_eq!(stage.next_deadline(), None);
        prop_assert_eq!(stage.advance_by(Duration::from_secs(60)), 0);
        prop_assert!(stage.state(id).is_none());
        prop_assert!(other_before.is_some());
    }
}

#[test]
fn hi_bye_scenario_through_the_stage() {
    let mut stage = Stage::new();
    let id = stage.mount(
        TypewriterConfig::new(["Hi", "Bye"])
            .with_intervals(10, 5, 100)
            .with_loop(true),
    );

    // Type "Hi" (2 ticks), enter and hold the pause, delete (2 ticks), advance.
    stage.advance_to(Duration::from_millis(10 + 10 + 10 + 100 + 5 + 5 + 5));
    let state = stage.state(id);
    assert_eq!(state.map(|s| (s.phrase_index, s.char_index, s.phase)), Some((1, 0, Phase::Typing)));

    stage.advance_to(Duration::from_millis(145 + 30));
    assert_eq!(stage.frame(id).map(|f| f.text), Some("Bye".to_owned()));
}

#[test]
fn scroll_scenarios() {
    assert!(on_scroll_sample(301.0, 1000.0, 300.0).is_past_threshold);
    assert!(!on_scroll_sample(300.0, 1000.0, 300.0).is_past_threshold);
    assert_eq!(on_scroll_sample(500.0, 1000.0, 300.0).progress_percent, 50.0);
    assert_eq!(on_scroll_sample(750.0, 0.0, 300.0).progress_percent, 0.0);
}

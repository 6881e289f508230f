//! Looping type / pause / delete animation over a list of phrases.
//!
//! [`Typewriter`] is a plain state machine: it knows how long to wait before
//! its next tick ([`Typewriter::next_delay`]) and how to apply one tick
//! ([`Typewriter::tick`]), but owns no timer. Hosts arm timers through
//! [`crate::stage::Stage`] or drive ticks by hand in tests.

mod cursor;
mod phrase;

use std::time::Duration;

use folio_protocol::{Phase, TypewriterFrame};
use serde::Serialize;

use crate::config::TypewriterConfig;

pub use cursor::CursorBlink;
pub use phrase::Phrase;

/// Position of a typewriter within its rotation.
///
/// The displayed text is not stored; it is always the first `char_index`
/// characters of `phrases[phrase_index]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TypewriterState {
    pub phrase_index: usize,
    pub char_index: usize,
    pub phase: Phase,
}

#[derive(Debug, Clone)]
pub struct Typewriter {
    config: TypewriterConfig,
    state: TypewriterState,
}

impl Typewriter {
    pub fn new(config: TypewriterConfig) -> Self {
        Self {
            config: config.sanitized(),
            state: TypewriterState::default(),
        }
    }

    pub fn config(&self) -> &TypewriterConfig {
        &self.config
    }

    pub fn state(&self) -> TypewriterState {
        self.state
    }

    pub fn current_phrase(&self) -> Option<&Phrase> {
        self.config.phrases.get(self.state.phrase_index)
    }

    pub fn displayed_text(&self) -> &str {
        self.current_phrase()
            .map_or("", |phrase| phrase.prefix(self.state.char_index))
    }

    fn is_last_phrase(&self) -> bool {
        self.state.phrase_index + 1 >= self.config.phrases.len()
    }

    fn phrase_len(&self) -> usize {
        self.current_phrase().map_or(0, Phrase::char_len)
    }

    /// The final phrase of a non-looping rotation is fully typed; nothing
    /// will change from here on.
    pub fn is_finished(&self) -> bool {
        !self.config.loop_phrases
            && self.state.phase == Phase::Typing
            && self.is_last_phrase()
            && self.state.char_index >= self.phrase_len()
    }

    /// How long to wait before the next tick, chosen by the current phase.
    /// `None` once finished, or when there is nothing to type.
    pub fn next_delay(&self) -> Option<Duration> {
        if self.config.phrases.is_empty() || self.is_finished() {
            return None;
        }
        Some(match self.state.phase {
            Phase::Typing => self.config.typing_interval(),
            Phase::Pausing => self.config.pause(),
            Phase::Deleting => self.config.deleting_interval(),
        })
    }

    /// Apply one transition. Returns whether the state changed.
    pub fn tick(&mut self) -> bool {
        if self.next_delay().is_none() {
            return false;
        }

        let len = self.phrase_len();
        let count = self.config.phrases.len();
        let state = &mut self.state;
        match state.phase {
            Phase::Typing if state.char_index < len => state.char_index += 1,
            // Finished rotations were filtered out above, so a fully typed
            // phrase here always has somewhere to go.
            Phase::Typing => state.phase = Phase::Pausing,
            Phase::Pausing => state.phase = Phase::Deleting,
            Phase::Deleting if state.char_index > 0 => state.char_index -= 1,
            Phase::Deleting => {
                state.phrase_index = if self.config.loop_phrases {
                    (state.phrase_index + 1) % count
                } else {
                    (state.phrase_index + 1).min(count - 1)
                };
                state.phase = Phase::Typing;
            }
        }

        if self.is_finished() {
            tracing::debug!(
                phrase = self.state.phrase_index,
                "typewriter finished its rotation"
            );
        }
        true
    }

    /// Swap in a new configuration and start over from the first phrase.
    pub fn reconfigure(&mut self, config: TypewriterConfig) {
        self.config = config.sanitized();
        self.reset();
    }

    pub fn reset(&mut self) {
        self.state = TypewriterState::default();
    }

    /// Snapshot for the render boundary.
    pub fn frame(&self, cursor: &CursorBlink) -> TypewriterFrame {
        TypewriterFrame {
            text: self.displayed_text().to_owned(),
            cursor_visible: cursor.is_visible(),
            cursor: cursor.glyph(),
            phase: self.state.phase,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(phrases: &[&str], loop_phrases: bool) -> Typewriter {
        Typewriter::new(
            TypewriterConfig::new(phrases.iter().copied())
                .with_intervals(10, 5, 100)
                .with_loop(loop_phrases),
        )
    }

    fn tick_n(tw: &mut Typewriter, n: usize) {
        for _ in 0..n {
            tw.tick();
        }
    }

    #[test]
    fn initial_state() {
        let tw = engine(&["Hi"], true);
        assert_eq!(tw.state(), TypewriterState::default());
        assert_eq!(tw.displayed_text(), "");
        assert_eq!(tw.next_delay(), Some(Duration::from_millis(10)));
    }

    #[test]
    fn hi_bye_reaches_second_phrase() {
        let mut tw = engine(&["Hi", "Bye"], true);

        tick_n(&mut tw, 2);
        assert_eq!(tw.displayed_text(), "Hi");
        assert_eq!(tw.state().phase, Phase::Typing);

        // Fully typed: the next tick starts the pause.
        tw.tick();
        assert_eq!(tw.state().phase, Phase::Pausing);
        assert_eq!(tw.next_delay(), Some(Duration::from_millis(100)));

        tw.tick();
        assert_eq!(tw.state().phase, Phase::Deleting);
        assert_eq!(tw.next_delay(), Some(Duration::from_millis(5)));

        tick_n(&mut tw, 2);
        assert_eq!(tw.displayed_text(), "");

        tw.tick();
        assert_eq!(
            tw.state(),
            TypewriterState {
                phrase_index: 1,
                char_index: 0,
                phase: Phase::Typing,
            }
        );
    }

    #[test]
    fn single_phrase_no_loop_types_once_and_halts() {
        let mut tw = engine(&["X"], false);
        assert!(tw.tick());
        assert_eq!(tw.displayed_text(), "X");
        assert_eq!(tw.state().phase, Phase::Typing);
        assert!(tw.is_finished());
        assert_eq!(tw.next_delay(), None);

        let before = tw.state();
        for _ in 0..10 {
            assert!(!tw.tick());
        }
        assert_eq!(tw.state(), before);
    }

    #[test]
    fn no_loop_advances_through_earlier_phrases() {
        let mut tw = engine(&["ab", "c"], false);
        // type 2, pause, delete-start, delete 2, advance
        tick_n(&mut tw, 2 + 1 + 1 + 2 + 1);
        assert_eq!(tw.state().phrase_index, 1);
        tw.tick();
        assert_eq!(tw.displayed_text(), "c");
        assert!(tw.is_finished());
    }

    #[test]
    fn single_phrase_loop_cycles_on_itself() {
        let mut tw = engine(&["ok"], true);
        tick_n(&mut tw, 2 + 1 + 1 + 2 + 1);
        assert_eq!(tw.state(), TypewriterState::default());
        assert!(!tw.is_finished());
    }

    #[test]
    fn empty_phrase_goes_straight_to_pause() {
        let mut tw = engine(&["", "x"], true);
        tw.tick();
        assert_eq!(tw.state().phase, Phase::Pausing);
        assert_eq!(tw.displayed_text(), "");
    }

    #[test]
    fn empty_phrase_list_is_idle() {
        let mut tw = engine(&[], true);
        assert_eq!(tw.next_delay(), None);
        assert!(!tw.tick());
        assert_eq!(tw.displayed_text(), "");
    }

    #[test]
    fn reconfigure_resets_position() {
        let mut tw = engine(&["Hello"], true);
        tick_n(&mut tw, 3);
        tw.reconfigure(TypewriterConfig::new(["World"]));
        assert_eq!(tw.state(), TypewriterState::default());
        assert_eq!(tw.current_phrase().map(Phrase::as_str), Some("World"));
    }

    #[test]
    fn zero_intervals_are_clamped() {
        let tw = Typewriter::new(TypewriterConfig::new(["a"]).with_intervals(0, 0, 0));
        assert_eq!(tw.next_delay(), Some(Duration::from_millis(1)));
    }

    #[test]
    fn frame_reflects_cursor() {
        let mut tw = engine(&["Hey"], true);
        tick_n(&mut tw, 2);
        let cursor = CursorBlink::from_config(tw.config());
        let frame = tw.frame(&cursor);
        assert_eq!(frame.text, "He");
        assert_eq!(frame.render(), "He|");
    }
}

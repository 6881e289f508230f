use std::time::Duration;

use crate::config::TypewriterConfig;

/// Blinking cursor, toggled on its own interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBlink {
    glyph: Option<char>,
    visible: bool,
    interval: Duration,
}

impl CursorBlink {
    pub fn from_config(config: &TypewriterConfig) -> Self {
        Self {
            glyph: config.show_cursor.then_some(config.cursor_char),
            visible: config.show_cursor,
            interval: config.cursor_blink(),
        }
    }

    pub fn glyph(&self) -> Option<char> {
        self.glyph
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Blink period, or `None` for a hidden cursor that never needs a timer.
    pub fn interval(&self) -> Option<Duration> {
        self.glyph.map(|_| self.interval)
    }

    pub fn toggle(&mut self) {
        if self.glyph.is_some() {
            self.visible = !self.visible;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_visible_and_toggles() {
        let mut cursor = CursorBlink::from_config(&TypewriterConfig::default());
        assert!(cursor.is_visible());
        assert_eq!(cursor.interval(), Some(Duration::from_millis(800)));
        cursor.toggle();
        assert!(!cursor.is_visible());
        cursor.toggle();
        assert!(cursor.is_visible());
    }

    #[test]
    fn hidden_cursor_never_blinks() {
        let mut cursor = CursorBlink::from_config(&TypewriterConfig::default().with_cursor(false));
        assert_eq!(cursor.glyph(), None);
        assert_eq!(cursor.interval(), None);
        cursor.toggle();
        assert!(!cursor.is_visible());
    }
}

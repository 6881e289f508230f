use serde::{Deserialize, Serialize};

/// Which half of the type/delete cycle a typewriter is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Phase {
    /// Appending characters, or holding the finished phrase when terminal.
    #[default]
    Typing,
    /// Holding the fully typed phrase before deleting it.
    Pausing,
    /// Removing characters from the end.
    Deleting,
}

/// Everything a renderer needs to draw one typewriter line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypewriterFrame {
    /// Currently displayed prefix of the active phrase.
    pub text: String,
    /// Whether the cursor glyph is in the "on" half of its blink.
    pub cursor_visible: bool,
    /// Cursor glyph, `None` when the cursor is disabled.
    pub cursor: Option<char>,
    pub phase: Phase,
}

impl TypewriterFrame {
    /// The text with the cursor appended when it is visible.
    pub fn render(&self) -> String {
        match self.cursor {
            Some(glyph) if self.cursor_visible => format!("{}{glyph}", self.text),
            _ => self.text.clone(),
        }
    }
}

/// Result of a single scroll sample against one threshold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollDerived {
    pub is_past_threshold: bool,
    /// Share of the scrollable distance consumed, always within `0..=100`.
    pub progress_percent: f64,
}

/// Scroll-driven layout decisions for a whole page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScrollView {
    pub back_to_top_visible: bool,
    pub nav_scrolled: bool,
    pub progress_percent: f64,
}

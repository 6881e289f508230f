use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};
use crate::typewriter::Phrase;

/// Floor applied to every timer interval so a zero never busy-loops.
pub const MIN_INTERVAL_MS: u64 = 1;

/// Every field is optional in JSON. Engines clamp zero intervals through
/// [`TypewriterConfig::sanitized`]; [`TypewriterConfig::validate`] rejects them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub phrases: Vec<Phrase>,
    pub typing_interval_ms: u64,
    pub deleting_interval_ms: u64,
    pub pause_ms: u64,
    #[serde(rename = "loop")]
    pub loop_phrases: bool,
    pub show_cursor: bool,
    pub cursor_char: char,
    pub cursor_blink_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            phrases: Vec::new(),
            typing_interval_ms: 100,
            deleting_interval_ms: 50,
            pause_ms: 2000,
            loop_phrases: true,
            show_cursor: true,
            cursor_char: '|',
            cursor_blink_ms: 800,
        }
    }
}

impl TypewriterConfig {
    pub fn new<I, P>(phrases: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<Phrase>,
    {
        Self {
            phrases: phrases.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_intervals(mut self, typing_ms: u64, deleting_ms: u64, pause_ms: u64) -> Self {
        self.typing_interval_ms = typing_ms;
        self.deleting_interval_ms = deleting_ms;
        self.pause_ms = pause_ms;
        self
    }

    pub fn with_loop(mut self, loop_phrases: bool) -> Self {
        self.loop_phrases = loop_phrases;
        self
    }

    pub fn with_cursor(mut self, show: bool) -> Self {
        self.show_cursor = show;
        self
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Copy with every interval raised to at least [`MIN_INTERVAL_MS`].
    pub fn sanitized(mut self) -> Self {
        for interval in [
            &mut self.typing_interval_ms,
            &mut self.deleting_interval_ms,
            &mut self.pause_ms,
            &mut self.cursor_blink_ms,
        ] {
            *interval = (*interval).max(MIN_INTERVAL_MS);
        }
        self
    }

    /// Strict check for hosts that want a configuration error instead of
    /// silent clamping.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.phrases.is_empty() {
            return Err(ConfigError::NoPhrases);
        }
        let intervals = [
            ("typing_interval_ms", self.typing_interval_ms),
            ("deleting_interval_ms", self.deleting_interval_ms),
            ("pause_ms", self.pause_ms),
            ("cursor_blink_ms", self.cursor_blink_ms),
        ];
        for (field, value) in intervals {
            if value == 0 {
                return Err(ConfigError::NonPositiveInterval { field, value });
            }
        }
        Ok(())
    }

    pub fn typing_interval(&self) -> Duration {
        Duration::from_millis(self.typing_interval_ms)
    }

    pub fn deleting_interval(&self) -> Duration {
        Duration::from_millis(self.deleting_interval_ms)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }

    pub fn cursor_blink(&self) -> Duration {
        Duration::from_millis(self.cursor_blink_ms)
    }
}

/// Scroll offsets (px) that switch page chrome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub back_to_top_threshold_px: f64,
    pub nav_threshold_px: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            back_to_top_threshold_px: 300.0,
            nav_threshold_px: 50.0,
        }
    }
}

/// Staggered entrance timing for lists of cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub base_delay_ms: u64,
    pub stagger_ms: u64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 0,
            stagger_ms: 100,
        }
    }
}

/// One animated statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub label: String,
    pub value: u64,
    pub duration_ms: u64,
    pub prefix: String,
    pub suffix: String,
    /// Abbreviate large values as `97.2K` / `1.2M`.
    pub compact: bool,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            value: 0,
            duration_ms: 2000,
            prefix: String::new(),
            suffix: String::new(),
            compact: true,
        }
    }
}

/// A block of static page content.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    pub title: String,
    pub lines: Vec<String>,
}

/// Everything a host needs to lay out one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub typewriter: TypewriterConfig,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    pub counters: Vec<CounterConfig>,
    pub sections: Vec<SectionConfig>,
    pub log_level: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            typewriter: TypewriterConfig::new([
                "Systems programmer",
                "Open source maintainer",
                "Builder of small, sharp tools",
            ]),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
            counters: vec![
                CounterConfig {
                    label: "Projects".into(),
                    value: 5,
                    ..CounterConfig::default()
                },
                CounterConfig {
                    label: "Lines of code".into(),
                    value: 97_241,
                    ..CounterConfig::default()
                },
                CounterConfig {
                    label: "Commits".into(),
                    value: 899,
                    ..CounterConfig::default()
                },
                CounterConfig {
                    label: "Stars".into(),
                    value: 1302,
                    ..CounterConfig::default()
                },
            ],
            sections: Vec::new(),
            log_level: "info".into(),
        }
    }
}

impl SiteConfig {
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

use std::time::Duration;

use crate::config::CounterConfig;

pub const FRAME: Duration = Duration::from_millis(16);

/// Count-up for one statistic. Each 16 ms frame adds `value / (duration / 16)`
/// and the display is the floor of the running total, clamped to the target.
#[derive(Debug, Clone, PartialEq)]
pub struct StatCounter {
    config: CounterConfig,
    current: f64,
    started: bool,
    done: bool,
}

impl StatCounter {
    pub fn new(config: CounterConfig) -> Self {
        Self {
            config,
            current: 0.0,
            started: false,
            done: false,
        }
    }

    pub fn config(&self) -> &CounterConfig {
        &self.config
    }

    /// Begin counting. A counter only ever runs once; later calls are
    /// ignored even after it finishes.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        true
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    fn increment(&self) -> f64 {
        let frames = self.config.duration_ms as f64 / FRAME.as_millis() as f64;
        if frames <= 0.0 {
            // Zero duration: jump straight to the target.
            return self.config.value as f64;
        }
        self.config.value as f64 / frames
    }

    /// Advance by one frame. No-op before `start` and after completion.
    pub fn step(&mut self) {
        if !self.started || self.done {
            return;
        }
        self.current += self.increment();
        if self.current >= self.config.value as f64 {
            self.current = self.config.value as f64;
            self.done = true;
        }
    }

    /// Step up to `frames` times, stopping early once done.
    pub fn advance_frames(&mut self, frames: u64) {
        for _ in 0..frames {
            if self.done {
                break;
            }
            self.step();
        }
    }

    pub fn value(&self) -> u64 {
        if self.done {
            self.config.value
        } else {
            self.current.floor() as u64
        }
    }

    /// Value shown `elapsed` after start, without touching this counter.
    pub fn sample_at(&self, elapsed: Duration) -> u64 {
        let mut probe = Self::new(self.config.clone());
        probe.start();
        probe.advance_frames((elapsed.as_millis() / FRAME.as_millis()) as u64);
        probe.value()
    }

    /// Value with prefix, suffix and optional compact formatting applied.
    pub fn display(&self) -> String {
        let number = if self.config.compact {
            format_compact(self.value())
        } else {
            group_thousands(self.value())
        };
        format!("{}{number}{}", self.config.prefix, self.config.suffix)
    }
}

/// `1.2M`, `97.2K`, or the plain number with thousands separators.
pub fn format_compact(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1000 {
        format!("{:.1}K", n as f64 / 1000.0)
    } else {
        group_thousands(n)
    }
}

pub fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

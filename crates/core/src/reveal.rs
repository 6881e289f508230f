use std::collections::BTreeSet;
use std::time::Duration;

use crate::config::RevealConfig;

/// Staggered entrance delays: item `i` starts `base + stagger * i` after its
/// list becomes visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealSchedule {
    base: Duration,
    stagger: Duration,
}

impl RevealSchedule {
    pub fn new(config: RevealConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_delay_ms),
            stagger: Duration::from_millis(config.stagger_ms),
        }
    }

    pub fn delay_for(&self, index: usize) -> Duration {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        self.base.saturating_add(self.stagger.saturating_mul(index))
    }

    /// Whether item `index` has started its entrance `elapsed` after the list
    /// was revealed.
    pub fn is_started(&self, index: usize, elapsed: Duration) -> bool {
        elapsed >= self.delay_for(index)
    }
}

/// Reveal-once bookkeeping: an item that has entered the viewport stays
/// revealed even after it scrolls back out.
#[derive(Debug, Clone, Default)]
pub struct RevealTracker {
    revealed: BTreeSet<usize>,
}

impl RevealTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report visibility for one item. Returns `true` only on the first
    /// report that finds it in view.
    pub fn observe(&mut self, index: usize, in_view: bool) -> bool {
        in_view && self.revealed.insert(index)
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.revealed.contains(&index)
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    pub fn reset(&mut self) {
        self.revealed.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delays_stagger_by_index() {
        let schedule = RevealSchedule::new(RevealConfig {
            base_delay_ms: 200,
            stagger_ms: 100,
        });
        assert_eq!(schedule.delay_for(0), Duration::from_millis(200));
        assert_eq!(schedule.delay_for(3), Duration::from_millis(500));
        assert!(!schedule.is_started(3, Duration::from_millis(499)));
        assert!(schedule.is_started(3, Duration::from_millis(500)));
    }

    #[test]
    fn reveal_happens_once() {
        let mut tracker = RevealTracker::new();
        assert!(!tracker.observe(2, false));
        assert!(tracker.observe(2, true));
        assert!(!tracker.observe(2, true));
        assert!(!tracker.observe(2, false));
        assert!(tracker.is_revealed(2));
        assert_eq!(tracker.revealed_count(), 1);
    }
}

use std::time::Duration;

use folio_core::config::SiteConfig;
use folio_core::counter::{FRAME, StatCounter};
use folio_core::reveal::{RevealSchedule, RevealTracker};

/// One terminal row of the scrollable page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyLine {
    Blank,
    Counters,
    Title { section: usize, text: String },
    Text { section: usize, text: String },
}

impl BodyLine {
    fn section(&self) -> Option<usize> {
        match self {
            BodyLine::Title { section, .. } | BodyLine::Text { section, .. } => Some(*section),
            BodyLine::Blank | BodyLine::Counters => None,
        }
    }
}

/// Body content plus the entrance animations that play as it scrolls in.
#[derive(Debug)]
pub struct Page {
    lines: Vec<BodyLine>,
    counters: Vec<StatCounter>,
    counters_started_at: Option<Duration>,
    counter_frames: u64,
    schedule: RevealSchedule,
    tracker: RevealTracker,
    section_starts: Vec<Option<Duration>>,
}

impl Page {
    pub fn new(site: &SiteConfig) -> Self {
        let mut lines = vec![BodyLine::Counters, BodyLine::Blank];
        for (section, block) in site.sections.iter().enumerate() {
            lines.push(BodyLine::Title {
                section,
                text: block.title.clone(),
            });
            lines.extend(block.lines.iter().map(|text| BodyLine::Text {
                section,
                text: text.clone(),
            }));
            lines.push(BodyLine::Blank);
        }

        Self {
            lines,
            counters: site.counters.iter().cloned().map(StatCounter::new).collect(),
            counters_started_at: None,
            counter_frames: 0,
            schedule: RevealSchedule::new(site.reveal),
            tracker: RevealTracker::new(),
            section_starts: vec![None; site.sections.len()],
        }
    }

    pub fn lines(&self) -> &[BodyLine] {
        &self.lines
    }

    pub fn counters(&self) -> &[StatCounter] {
        &self.counters
    }

    /// Rows the body can scroll given `viewport_rows` of space.
    pub fn max_offset(&self, viewport_rows: usize) -> usize {
        self.lines.len().saturating_sub(viewport_rows)
    }

    /// Record what is on screen at `now`: reveals newly visible sections in
    /// staggered order, starts the counters once their row shows, and steps
    /// running counters up to `now`.
    pub fn observe(&mut self, visible: std::ops::Range<usize>, now: Duration) {
        let mut newly = 0;
        let mut counters_visible = false;
        let end = visible.end.min(self.lines.len());
        let start = visible.start.min(end);
        for line in &self.lines[start..end] {
            if *line == BodyLine::Counters {
                counters_visible = true;
            }
            let Some(section) = line.section() else {
                continue;
            };
            if self.tracker.observe(section, true) {
                self.section_starts[section] = Some(now + self.schedule.delay_for(newly));
                newly += 1;
            }
        }

        if counters_visible && self.counters_started_at.is_none() {
            self.counters_started_at = Some(now);
            for counter in &mut self.counters {
                counter.start();
            }
        }
        if let Some(started) = self.counters_started_at {
            let due = (now.saturating_sub(started).as_millis() / FRAME.as_millis()) as u64;
            let pending = due.saturating_sub(self.counter_frames);
            for counter in &mut self.counters {
                counter.advance_frames(pending);
            }
            self.counter_frames = self.counter_frames.max(due);
        }
    }

    /// Whether a section's body has finished waiting for its entrance slot.
    pub fn is_section_shown(&self, section: usize, now: Duration) -> bool {
        self.section_starts
            .get(section)
            .copied()
            .flatten()
            .is_some_and(|start| now >= start)
    }
}

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Frames are averaged over windows at least this long.
pub const FPS_WINDOW: Duration = Duration::from_secs(1);

pub const SLOW_PAGE_LOAD_MS: f64 = 3000.0;
pub const SLOW_FIRST_CONTENTFUL_PAINT_MS: f64 = 1800.0;
pub const HIGH_LAYOUT_SHIFT: f64 = 0.1;

/// Frame-rate meter fed once per rendered frame. The published rate only
/// changes when a window of at least [`FPS_WINDOW`] closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FpsMeter {
    frames: u32,
    window_start: Duration,
    fps: u32,
}

impl FpsMeter {
    pub fn new(now: Duration) -> Self {
        Self {
            frames: 0,
            window_start: now,
            fps: 0,
        }
    }

    /// Count one frame at `now`. Returns the new rate when this frame closes
    /// a window.
    pub fn frame(&mut self, now: Duration) -> Option<u32> {
        self.frames = self.frames.saturating_add(1);
        let elapsed = now.saturating_sub(self.window_start);
        if elapsed < FPS_WINDOW {
            return None;
        }
        let rate = f64::from(self.frames) * 1000.0 / (elapsed.as_secs_f64() * 1000.0);
        self.fps = rate.round() as u32;
        self.frames = 0;
        self.window_start = now;
        tracing::trace!(fps = self.fps, "frame rate");
        Some(self.fps)
    }

    /// Last published rate, zero before the first window closes.
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// Load and paint timings as reported by the host. Missing readings never
/// trigger a recommendation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceSnapshot {
    #[serde(rename = "pageLoadTime")]
    pub page_load_time_ms: Option<f64>,
    #[serde(rename = "firstContentfulPaint")]
    pub first_contentful_paint_ms: Option<f64>,
    pub cls: Option<f64>,
    #[serde(rename = "errorCount")]
    pub error_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    PageLoadTime,
    FirstContentfulPaint,
    Cls,
    Errors,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub severity: Severity,
    pub message: String,
    pub metric: Metric,
    pub value: f64,
}

/// Advice for every reading past its threshold, in a fixed order: page load,
/// first contentful paint, layout shift, script errors.
pub fn recommendations(snapshot: &PerformanceSnapshot) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if let Some(value) = snapshot.page_load_time_ms
        && value > SLOW_PAGE_LOAD_MS
    {
        out.push(Recommendation {
            severity: Severity::Warning,
            message: "Page load time is over 3 seconds. Consider optimizing resources.".into(),
            metric: Metric::PageLoadTime,
            value,
        });
    }

    if let Some(value) = snapshot.first_contentful_paint_ms
        && value > SLOW_FIRST_CONTENTFUL_PAINT_MS
    {
        out.push(Recommendation {
            severity: Severity::Warning,
            message: "First Contentful Paint is slow. Optimize critical rendering path.".into(),
            metric: Metric::FirstContentfulPaint,
            value,
        });
    }

    if let Some(value) = snapshot.cls
        && value > HIGH_LAYOUT_SHIFT
    {
        out.push(Recommendation {
            severity: Severity::Error,
            message: "Cumulative Layout Shift is high. Ensure proper sizing for images and elements."
                .into(),
            metric: Metric::Cls,
            value,
        });
    }

    if snapshot.error_count > 0 {
        out.push(Recommendation {
            severity: Severity::Error,
            message: format!(
                "{} JavaScript errors detected. Check console for details.",
                snapshot.error_count
            ),
            metric: Metric::Errors,
            value: snapshot.error_count as f64,
        });
    }

    out
}

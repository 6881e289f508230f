use folio_protocol::{ScrollDerived, ScrollView};

use crate::config::ScrollConfig;

/// One reading of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollSample {
    pub offset_px: f64,
    pub scrollable_height_px: f64,
}

impl ScrollSample {
    pub fn new(offset_px: f64, scrollable_height_px: f64) -> Self {
        Self {
            offset_px,
            scrollable_height_px,
        }
    }

    /// Build a sample from raw document and viewport heights.
    pub fn from_document(offset_px: f64, document_height_px: f64, viewport_height_px: f64) -> Self {
        Self::new(
            offset_px,
            scrollable_height(document_height_px, viewport_height_px),
        )
    }
}

/// Distance the page can scroll: `max(0, document - viewport)`.
pub fn scrollable_height(document_height_px: f64, viewport_height_px: f64) -> f64 {
    let height = document_height_px - viewport_height_px;
    if height.is_nan() { 0.0 } else { height.max(0.0) }
}

fn clamp_offset(offset_px: f64) -> f64 {
    if offset_px.is_nan() {
        0.0
    } else {
        offset_px.max(0.0)
    }
}

pub fn progress_percent(offset_px: f64, scrollable_height_px: f64) -> f64 {
    if scrollable_height_px.is_nan() || scrollable_height_px <= 0.0 {
        return 0.0;
    }
    let percent = clamp_offset(offset_px) / scrollable_height_px * 100.0;
    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// Derive threshold visibility and progress from one sample. Never fails:
/// negative or NaN offsets count as 0.
pub fn on_scroll_sample(offset_px: f64, scrollable_height_px: f64, threshold: f64) -> ScrollDerived {
    let offset = clamp_offset(offset_px);
    ScrollDerived {
        is_past_threshold: offset > threshold,
        progress_percent: progress_percent(offset, scrollable_height_px),
    }
}

/// Page-level view: back-to-top, nav style and progress from one sample.
pub fn derive_view(sample: ScrollSample, config: &ScrollConfig) -> ScrollView {
    let back_to_top = on_scroll_sample(
        sample.offset_px,
        sample.scrollable_height_px,
        config.back_to_top_threshold_px,
    );
    ScrollView {
        back_to_top_visible: back_to_top.is_past_threshold,
        nav_scrolled: clamp_offset(sample.offset_px) > config.nav_threshold_px,
        progress_percent: back_to_top.progress_percent,
    }
}

/// Returned by [`ScrollObserver::subscribe`]; hand it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&ScrollView)>;

/// Recomputes the page's [`ScrollView`] on every scroll notification and
/// forwards it to subscribers. Only the most recent view is kept.
pub struct ScrollObserver {
    config: ScrollConfig,
    latest: Option<ScrollView>,
    listeners: Vec<(Subscription, Listener)>,
    next_id: u64,
}

impl ScrollObserver {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            latest: None,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn latest(&self) -> Option<ScrollView> {
        self.latest
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&ScrollView) + 'static) -> Subscription {
        let subscription = Subscription(self.next_id);
        self.next_id += 1;
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn on_scroll(&mut self, sample: ScrollSample) -> ScrollView {
        let view = derive_view(sample, &self.config);
        self.latest = Some(view);
        for (_, listener) in &mut self.listeners {
            listener(&view);
        }
        view
    }
}

impl std::fmt::Debug for ScrollObserver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollObserver")
            .field("config", &self.config)
            .field("latest", &self.latest)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    #[test]
    fn threshold_is_strict() {
        assert!(on_scroll_sample(301.0, 1000.0, 300.0).is_past_threshold);
        assert!(!on_scroll_sample(300.0, 1000.0, 300.0).is_past_threshold);
    }

    #[test]
    fn halfway_is_fifty_percent() {
        assert_eq!(on_scroll_sample(500.0, 1000.0, 300.0).progress_percent, 50.0);
    }

    #[test]
    fn short_page_has_no_progress() {
        for offset in [0.0, 10.0, 5000.0] {
            assert_eq!(on_scroll_sample(offset, 0.0, 300.0).progress_percent, 0.0);
            assert_eq!(on_scroll_sample(offset, -20.0, 300.0).progress_percent, 0.0);
        }
    }

    #[test]
    fn bad_offsets_clamp_to_zero() {
        let nan = on_scroll_sample(f64::NAN, 1000.0, 0.0);
        assert!(!nan.is_past_threshold);
        assert_eq!(nan.progress_percent, 0.0);

        let negative = on_scroll_sample(-40.0, 1000.0, -100.0);
        assert!(negative.is_past_threshold);
        assert_eq!(negative.progress_percent, 0.0);
    }

    #[test]
    fn overscroll_caps_at_hundred() {
        assert_eq!(on_scroll_sample(1500.0, 1000.0, 300.0).progress_percent, 100.0);
    }

    #[test]
    fn scrollable_height_never_negative() {
        assert_eq!(scrollable_height(2000.0, 800.0), 1200.0);
        assert_eq!(scrollable_height(600.0, 800.0), 0.0);
        assert_eq!(scrollable_height(f64::NAN, 800.0), 0.0);
    }

    #[test]
    fn view_uses_both_thresholds() {
        let config = ScrollConfig::default();
        let top = derive_view(ScrollSample::from_document(0.0, 3000.0, 1000.0), &config);
        assert_eq!(top, ScrollView::default());

        let nav_only = derive_view(ScrollSample::new(51.0, 2000.0), &config);
        assert!(nav_only.nav_scrolled);
        assert!(!nav_only.back_to_top_visible);

        let deep = derive_view(ScrollSample::new(1000.0, 2000.0), &config);
        assert!(deep.nav_scrolled && deep.back_to_top_visible);
        assert_eq!(deep.progress_percent, 50.0);
    }

    #[test]
    fn subscribers_receive_views_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observer = ScrollObserver::new(ScrollConfig::default());

        let sink = Rc::clone(&seen);
        let sub = observer.subscribe(move |view| sink.borrow_mut().push(view.back_to_top_visible));

        observer.on_scroll(ScrollSample::new(100.0, 1000.0));
        observer.on_scroll(ScrollSample::new(400.0, 1000.0));
        assert!(observer.unsubscribe(sub));
        assert!(!observer.unsubscribe(sub));
        observer.on_scroll(ScrollSample::new(0.0, 1000.0));

        assert_eq!(*seen.borrow(), vec![false, true]);
        assert_eq!(observer.listener_count(), 0);
        assert_eq!(observer.latest().map(|v| v.back_to_top_visible), Some(false));
    }
}

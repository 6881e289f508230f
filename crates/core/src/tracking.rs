use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::storage::KeyValueStore;

pub const PAGE_VIEWS_KEY: &str = "pageViews";
pub const TIME_ON_PAGE_KEY: &str = "timeOnPage";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct PageViews {
    #[serde(
        rename = "lastVisit",
        default,
        deserialize_with = "lenient_millis",
        skip_serializing_if = "Option::is_none"
    )]
    last_visit_ms: Option<u64>,
    #[serde(flatten)]
    counts: BTreeMap<String, u64>,
}

/// Older front ends stored `lastVisit` as ISO text. Anything that is not a
/// millisecond count reads as unknown instead of failing the whole record.
fn lenient_millis<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}

/// Per-path view counts and time on page, read back from the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageStats {
    pub page_views: BTreeMap<String, u64>,
    pub time_on_page: BTreeMap<String, u64>,
    pub total_views: u64,
    pub total_time_ms: u64,
    pub last_visit_ms: Option<u64>,
}

#[derive(Debug)]
pub struct PageTracker<S> {
    store: S,
}

impl<S: KeyValueStore> PageTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let Some(raw) = self.store.get(key) else {
            return T::default();
        };
        serde_json::from_str(&raw).unwrap_or_else(|err| {
            tracing::warn!(key, %err, "discarding corrupt page stats");
            T::default()
        })
    }

    fn write<T: Serialize>(&mut self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(json) => self.store.set(key, &json),
            Err(err) => tracing::warn!(key, %err, "failed to encode page stats"),
        }
    }

    /// Count a visit to `path`. Returns the path's new total.
    pub fn track_view(&mut self, path: &str, now_ms: u64) -> u64 {
        let mut views: PageViews = self.read(PAGE_VIEWS_KEY);
        let count = views.counts.entry(path.to_owned()).or_default();
        *count = count.saturating_add(1);
        let count = *count;
        views.last_visit_ms = Some(now_ms);
        self.write(PAGE_VIEWS_KEY, &views);
        tracing::debug!(path, count, "page view");
        count
    }

    /// Add `spent_ms` to the time recorded for `path`.
    pub fn record_time(&mut self, path: &str, spent_ms: u64) -> u64 {
        let mut times: BTreeMap<String, u64> = self.read(TIME_ON_PAGE_KEY);
        let total = times.entry(path.to_owned()).or_default();
        *total = total.saturating_add(spent_ms);
        let total = *total;
        self.write(TIME_ON_PAGE_KEY, &times);
        tracing::debug!(path, spent_ms, total, "time on page");
        total
    }

    pub fn stats(&self) -> PageStats {
        let views: PageViews = self.read(PAGE_VIEWS_KEY);
        let time_on_page: BTreeMap<String, u64> = self.read(TIME_ON_PAGE_KEY);
        PageStats {
            total_views: views.counts.values().fold(0, |a, &b| a.saturating_add(b)),
            total_time_ms: time_on_page.values().fold(0, |a, &b| a.saturating_add(b)),
            last_visit_ms: views.last_visit_ms,
            page_views: views.counts,
            time_on_page,
        }
    }

    pub fn clear(&mut self) {
        self.store.remove(PAGE_VIEWS_KEY);
        self.store.remove(TIME_ON_PAGE_KEY);
    }

    pub fn into_inner(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn counts_views_per_path() {
        let mut tracker = PageTracker::new(MemoryStore::new());
        assert_eq!(tracker.track_view("/", 1_000), 1);
        assert_eq!(tracker.track_view("/", 2_000), 2);
        assert_eq!(tracker.track_view("/projects", 3_000), 1);

        let stats = tracker.stats();
        assert_eq!(stats.page_views.get("/"), Some(&2));
        assert_eq!(stats.total_views, 3);
        assert_eq!(stats.last_visit_ms, Some(3_000));
    }

    #[test]
    fn accumulates_time_on_page() {
        let mut tracker = PageTracker::new(MemoryStore::new());
        tracker.record_time("/about", 1500);
        assert_eq!(tracker.record_time("/about", 500), 2000);
        tracker.record_time("/stats", 10);
        assert_eq!(tracker.stats().total_time_ms, 2010);
    }

    #[test]
    fn stored_shape_matches_browser_layout() {
        let mut tracker = PageTracker::new(MemoryStore::new());
        tracker.track_view("/", 42);
        let store = tracker.into_inner();
        let raw = store.get(PAGE_VIEWS_KEY).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["/"], 1);
        assert_eq!(value["lastVisit"], 42);
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let mut store = MemoryStore::new();
        store.set(PAGE_VIEWS_KEY, "{{{");
        let mut tracker = PageTracker::new(store);
        assert_eq!(tracker.stats(), PageStats::default());
        assert_eq!(tracker.track_view("/", 1), 1);
    }

    #[test]
    fn clear_removes_everything() {
        let mut tracker = PageTracker::new(MemoryStore::new());
        tracker.track_view("/", 1);
        tracker.record_time("/", 1);
        tracker.clear();
        assert_eq!(tracker.stats(), PageStats::default());
        assert!(tracker.into_inner().is_empty());
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut tracker = PageTracker::new(MemoryStore::new());
        tracker.record_time("/a", u64::MAX);
        assert_eq!(tracker.record_time("/b", 1), 1);
        assert_eq!(tracker.record_time("/a", 5), u64::MAX);

        let mut store = tracker.into_inner();
        store.set(PAGE_VIEWS_KEY, &format!(r#"{{"/":{},"/x":3}}"#, u64::MAX));
        let mut tracker = PageTracker::new(store);
        assert_eq!(tracker.track_view("/", 1), u64::MAX);

        let stats = tracker.stats();
        assert_eq!(stats.total_time_ms, u64::MAX);
        assert_eq!(stats.total_views, u64::MAX);
    }

    #[test]
    fn iso_last_visit_keeps_existing_counts() {
        let mut store = MemoryStore::new();
        store.set(
            PAGE_VIEWS_KEY,
            r#"{"/":7,"/about":2,"lastVisit":"2024-05-01T10:00:00.000Z"}"#,
        );
        let mut tracker = PageTracker::new(store);

        let stats = tracker.stats();
        assert_eq!(stats.total_views, 9);
        assert_eq!(stats.last_visit_ms, None);

        assert_eq!(tracker.track_view("/", 5), 8);
        let stats = tracker.stats();
        assert_eq!(stats.page_views.get("/about"), Some(&2));
        assert_eq!(stats.total_views, 10);
        assert_eq!(stats.last_visit_ms, Some(5));
    }
}

use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::Duration;

use folio_core::config::ScrollConfig;
use folio_core::perf::{self, FpsMeter, PerformanceSnapshot};
use folio_core::scroll::{self, ScrollSample};
use folio_core::storage::KeyValueStore;
use folio_core::theme::ThemeStore;
use folio_core::tracking::PageTracker;
use folio_core::{InstanceId, Stage, TypewriterConfig};
use wasm_bindgen::prelude::*;

static STAGE: LazyLock<Mutex<Stage>> = LazyLock::new(|| Mutex::new(Stage::new()));
static FPS: Mutex<Option<FpsMeter>> = Mutex::new(None);

fn stage() -> Result<MutexGuard<'static, Stage>, JsError> {
    STAGE
        .lock()
        .map_err(|_| JsError::new("animation stage is poisoned"))
}

fn millis(ms: f64) -> Duration {
    Duration::try_from_secs_f64(ms / 1000.0).unwrap_or_default()
}

fn to_json<T: serde::Serialize>(value: &T) -> Result<String, JsError> {
    serde_json::to_string(value).map_err(|e| JsError::new(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
}

/// Mount a typewriter from a JSON config. Returns its instance id.
#[wasm_bindgen]
pub fn mount_typewriter(config_json: &str) -> Result<InstanceId, JsError> {
    let config =
        TypewriterConfig::from_json(config_json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(stage()?.mount(config))
}

/// Tear down a typewriter; no tick for it fires afterwards.
#[wasm_bindgen]
pub fn unmount_typewriter(id: InstanceId) -> Result<bool, JsError> {
    Ok(stage()?.unmount(id))
}

#[wasm_bindgen]
pub fn reconfigure_typewriter(id: InstanceId, config_json: &str) -> Result<bool, JsError> {
    let config =
        TypewriterConfig::from_json(config_json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(stage()?.reconfigure(id, config))
}

/// Run every tick due by `now_ms` (a `performance.now()` reading). Returns
/// the number of state changes, so callers can skip re-rendering on zero.
#[wasm_bindgen]
pub fn advance(now_ms: f64) -> Result<usize, JsError> {
    Ok(stage()?.advance_to(millis(now_ms)))
}

/// Milliseconds until the next scheduled tick, or `undefined` when idle.
#[wasm_bindgen]
pub fn next_deadline_ms() -> Result<Option<f64>, JsError> {
    Ok(stage()?
        .next_deadline()
        .map(|deadline| deadline.as_secs_f64() * 1000.0))
}

/// Current frame of a typewriter as JSON.
#[wasm_bindgen]
pub fn typewriter_frame(id: InstanceId) -> Result<String, JsError> {
    let frame = stage()?
        .frame(id)
        .ok_or_else(|| JsError::new("unknown typewriter id"))?;
    to_json(&frame)
}

/// Back-to-top, nav style and progress for one scroll event, as JSON.
#[wasm_bindgen]
pub fn scroll_view(
    offset_px: f64,
    document_height_px: f64,
    viewport_height_px: f64,
    back_to_top_threshold_px: f64,
    nav_threshold_px: f64,
) -> Result<String, JsError> {
    let config = ScrollConfig {
        back_to_top_threshold_px,
        nav_threshold_px,
    };
    let sample = ScrollSample::from_document(offset_px, document_height_px, viewport_height_px);
    to_json(&scroll::derive_view(sample, &config))
}

#[wasm_bindgen]
pub fn scroll_progress(
    offset_px: f64,
    scrollable_height_px: f64,
    threshold_px: f64,
) -> Result<String, JsError> {
    to_json(&scroll::on_scroll_sample(
        offset_px,
        scrollable_height_px,
        threshold_px,
    ))
}

/// `window.localStorage`, or nothing when storage is unavailable (private
/// browsing, sandboxed iframes). Writes are best effort.
struct LocalStorage(Option<web_sys::Storage>);

impl LocalStorage {
    fn open() -> Self {
        Self(
            web_sys::window()
                .and_then(|window| window.local_storage().ok())
                .flatten(),
        )
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.0
            && let Err(err) = storage.set_item(key, value)
        {
            storage_warning("write", key, &err);
        }
    }

    fn remove(&mut self, key: &str) {
        if let Some(storage) = &self.0
            && let Err(err) = storage.remove_item(key)
        {
            storage_warning("remove", key, &err);
        }
    }
}

// Quota exceeded and similar failures are reported but never abort the caller.
fn storage_warning(op: &str, key: &str, err: &JsValue) {
    web_sys::console::warn_2(&storage_warning_text(op, key).into(), err);
}

fn storage_warning_text(op: &str, key: &str) -> String {
    format!("localStorage {op} of `{key}` failed:")
}

/// `"light"` or `"dark"`: the saved choice, else the system preference.
#[wasm_bindgen]
pub fn current_theme(prefers_dark: bool) -> String {
    ThemeStore::load(LocalStorage::open(), Some(prefers_dark))
        .mode()
        .to_string()
}

#[wasm_bindgen]
pub fn toggle_theme(prefers_dark: bool) -> String {
    ThemeStore::load(LocalStorage::open(), Some(prefers_dark))
        .toggle()
        .to_string()
}

#[wasm_bindgen]
pub fn track_page_view(path: &str, now_ms: f64) -> u64 {
    PageTracker::new(LocalStorage::open()).track_view(path, now_ms.max(0.0) as u64)
}

#[wasm_bindgen]
pub fn record_time_on_page(path: &str, spent_ms: f64) -> u64 {
    PageTracker::new(LocalStorage::open()).record_time(path, spent_ms.max(0.0) as u64)
}

#[wasm_bindgen]
pub fn page_stats() -> Result<String, JsError> {
    to_json(&PageTracker::new(LocalStorage::open()).stats())
}

#[wasm_bindgen]
pub fn clear_page_stats() {
    PageTracker::new(LocalStorage::open()).clear();
}

/// Count one animation frame at `now_ms`. Returns the latest frame rate.
#[wasm_bindgen]
pub fn fps_frame(now_ms: f64) -> Result<u32, JsError> {
    let mut meter = FPS
        .lock()
        .map_err(|_| JsError::new("frame meter is poisoned"))?;
    let now = millis(now_ms);
    let meter = meter.get_or_insert_with(|| FpsMeter::new(now));
    meter.frame(now);
    Ok(meter.fps())
}

/// Advice for a JSON performance snapshot (`pageLoadTime`,
/// `firstContentfulPaint`, `cls`, `errorCount`), as a JSON array.
#[wasm_bindgen]
pub fn performance_recommendations(snapshot_json: &str) -> Result<String, JsError> {
    let snapshot: PerformanceSnapshot =
        serde_json::from_str(snapshot_json).map_err(|e| JsError::new(&e.to_string()))?;
    to_json(&perf::recommendations(&snapshot))
}

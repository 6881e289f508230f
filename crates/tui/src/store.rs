use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result};
use folio_core::storage::KeyValueStore;

/// Key-value store backed by a single JSON object on disk, standing in for
/// the browser's `localStorage`. Every write flushes the whole file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    pub fn open(path: PathBuf) -> Result<Self> {
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)
                .with_context(|| format!("corrupt state file {}", path.display()))?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err).with_context(|| format!("reading {}", path.display()));
            }
        };
        Ok(Self { path, entries })
    }

    fn flush(&self) {
        let result = serde_json::to_string_pretty(&self.entries)
            .map_err(anyhow::Error::from)
            .and_then(|json| std::fs::write(&self.path, json).map_err(anyhow::Error::from));
        if let Err(err) = result {
            tracing::warn!(path = %self.path.display(), %err, "failed to persist state");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_owned(), value.to_owned());
        self.flush();
    }

    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.flush();
        }
    }
}

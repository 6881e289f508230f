use folio_protocol::ThemeMode;

use crate::storage::KeyValueStore;

pub const THEME_KEY: &str = "theme";

/// Current site theme, persisted on every change.
#[derive(Debug)]
pub struct ThemeStore<S> {
    store: S,
    mode: ThemeMode,
}

impl<S: KeyValueStore> ThemeStore<S> {
    /// Saved choice first, then the host's system preference, then light.
    pub fn load(store: S, prefers_dark: Option<bool>) -> Self {
        let saved = store.get(THEME_KEY).and_then(|raw| match raw.parse() {
            Ok(mode) => Some(mode),
            Err(err) => {
                tracing::warn!(%err, "ignoring stored theme");
                None
            }
        });
        let mode = saved.unwrap_or(match prefers_dark {
            Some(true) => ThemeMode::Dark,
            _ => ThemeMode::Light,
        });
        Self { store, mode }
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn set(&mut self, mode: ThemeMode) {
        self.mode = mode;
        self.store.set(THEME_KEY, mode.as_str());
        tracing::debug!(%mode, "theme changed");
    }

    pub fn toggle(&mut self) -> ThemeMode {
        self.set(self.mode.toggled());
        self.mode
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
    fn defaults_to_light() {
        let theme = ThemeStore::load(MemoryStore::new(), None);
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn system_preference_applies_without_saved_choice() {
        let theme = ThemeStore::load(MemoryStore::new(), Some(true));
        assert_eq!(theme.mode(), ThemeMode::Dark);
    }

    #[test]
    fn saved_choice_wins() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "light");
        let theme = ThemeStore::load(store, Some(true));
        assert_eq!(theme.mode(), ThemeMode::Light);
    }

    #[test]
    fn garbage_saved_value_falls_back() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "purple");
        let theme = ThemeStore::load(store, Some(true));
        assert_eq!(theme.mode(), ThemeMode::Dark);
    }

    #[test]
    fn toggle_persists() {
        let mut theme = ThemeStore::load(MemoryStore::new(), None);
        assert_eq!(theme.toggle(), ThemeMode::Dark);
        let store = theme.into_inner();
        assert_eq!(store.get(THEME_KEY).as_deref(), Some("dark"));

        let reloaded = ThemeStore::load(store, None);
        assert_eq!(reloaded.mode(), ThemeMode::Dark);
    }
}

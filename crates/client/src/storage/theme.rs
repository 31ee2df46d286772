use std::{fmt, str::FromStr, sync::Arc};

use super::{KeyValueStore, THEME_STORAGE_KEY};
use crate::error::StorageError;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// UI theme preference. Anything other than a stored `light`/`dark` reads as
/// the default.
#[derive(Clone)]
pub struct ThemeStorage {
    store: Arc<dyn KeyValueStore>,
}

impl ThemeStorage {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Theme {
        self.store
            .get(THEME_STORAGE_KEY)
            .ok()
            .flatten()
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default()
    }

    pub fn set(&self, theme: Theme) -> Result<(), StorageError> {
        self.store.set(THEME_STORAGE_KEY, theme.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_to_dark() {
        let store = Arc::new(MemoryStore::new());
        assert_eq!(ThemeStorage::new(store.clone()).get(), Theme::Dark);

        store.set(THEME_STORAGE_KEY, "sepia").unwrap();
        assert_eq!(ThemeStorage::new(store).get(), Theme::Dark);
    }

    #[test]
    fn stores_the_bare_name() {
        let store = Arc::new(MemoryStore::new());
        let themes = ThemeStorage::new(store.clone());
        themes.set(Theme::Light).unwrap();

        assert_eq!(store.get(THEME_STORAGE_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(themes.get(), Theme::Light);
    }
}

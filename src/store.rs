//! Local key-value storage.
//!
//! Holds the little state the site keeps between visits: the theme
//! preference, the last notification check and the notification snapshot.
//! Values are strings, like browser local storage.
//!
//! [`FileStore`] keeps everything in one JSON object on disk. Each write
//! re-reads the file, applies the change and rewrites it whole. There is no
//! locking across processes, so two writers racing on the same file lose
//! one of the writes (last write wins).

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use thiserror::Error;

pub const THEME_KEY: &str = "theme";
pub const LAST_CHECK_KEY: &str = "lastNotificationCheck";
pub const NOTIFICATIONS_KEY: &str = "notifications";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("failed to access store {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("store {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode value for {key}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// String key-value storage shared by everything that persists state.
pub trait LocalStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// JSON-file store.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Encode {
            key: "*".to_string(),
            source,
        })?;
        fs::write(&self.path, json).map_err(io_err)
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StoreError> {
        // A poisoned lock only means another writer panicked; the file on
        // disk is still whole.
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut entries = self.read_all()?;
        apply(&mut entries);
        self.write_all(&entries)
    }
}

impl LocalStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, key: &str, value: &str) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl LocalStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(key);
        Ok(())
    }
}

/// Site color scheme chosen by the visitor. Dark unless light was saved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemePreference {
    Light,
    #[default]
    Dark,
}

impl ThemePreference {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    /// Class added to `<body>` for this theme.
    pub fn body_class(self) -> Option<&'static str> {
        match self {
            ThemePreference::Light => Some("light-theme"),
            ThemePreference::Dark => None,
        }
    }

    /// Icon and label of the toggle button, which offers the other theme.
    pub fn toggle_icon(self) -> &'static str {
        match self {
            ThemePreference::Light => "fas fa-moon theme-toggle-icon",
            ThemePreference::Dark => "fas fa-sun theme-toggle-icon",
        }
    }

    pub fn toggle_label(self) -> &'static str {
        match self {
            ThemePreference::Light => "Dark",
            ThemePreference::Dark => "Light",
        }
    }

    /// Saved preference; anything other than `light` reads as dark.
    pub fn load(store: &dyn LocalStore) -> Result<Self, StoreError> {
        Ok(match store.get(THEME_KEY)?.as_deref() {
            Some("light") => ThemePreference::Light,
            _ => ThemePreference::Dark,
        })
    }

    pub fn save(self, store: &dyn LocalStore) -> Result<(), StoreError> {
        store.set(THEME_KEY, self.as_str())
    }

    /// Flip the saved preference and return the new one.
    pub fn toggle(store: &dyn LocalStore) -> Result<Self, StoreError> {
        let next = Self::load(store)?.toggled();
        next.save(store)?;
        Ok(next)
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown theme: {0} (expected light or dark)")]
pub struct UnknownTheme(pub String);

impl FromStr for ThemePreference {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(UnknownTheme(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_store_round_trips_and_creates_parent() {
        let tmp = TempDir::new().unwrap();
        let store = FileStore::new(tmp.path().join(".club-site/storage.json"));
        assert_eq!(store.get(THEME_KEY).unwrap(), None);

        store.set(THEME_KEY, "light").unwrap();
        store.set(LAST_CHECK_KEY, "2025-06-01T00:00:00Z").unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));

        store.remove(THEME_KEY).unwrap();
        assert_eq!(store.get(THEME_KEY).unwrap(), None);
        assert!(store.get(LAST_CHECK_KEY).unwrap().is_some());
    }

    #[test]
    fn file_store_sees_writes_from_another_handle() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");
        let a = FileStore::new(&path);
        let b = FileStore::new(&path);

        a.set("k", "from-a").unwrap();
        b.set("k", "from-b").unwrap();
        // Last write wins.
        assert_eq!(a.get("k").unwrap().as_deref(), Some("from-b"));
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");
        fs::write(&path, "[not, an, object").unwrap();
        let store = FileStore::new(&path);
        assert!(matches!(store.get("k"), Err(StoreError::Corrupt { .. })));
    }

    #[test]
    fn empty_file_reads_as_empty_store() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("storage.json");
        fs::write(&path, "").unwrap();
        assert_eq!(FileStore::new(&path).get("k").unwrap(), None);
    }

    #[test]
    fn theme_defaults_to_dark() {
        let store = MemoryStore::new();
        assert_eq!(ThemePreference::load(&store).unwrap(), ThemePreference::Dark);

        let store = MemoryStore::new().with(THEME_KEY, "sepia");
        assert_eq!(ThemePreference::load(&store).unwrap(), ThemePreference::Dark);
    }

    #[test]
    fn theme_toggle_persists() {
        let store = MemoryStore::new();
        assert_eq!(ThemePreference::toggle(&store).unwrap(), ThemePreference::Light);
        assert_eq!(store.get(THEME_KEY).unwrap().as_deref(), Some("light"));
        assert_eq!(ThemePreference::toggle(&store).unwrap(), ThemePreference::Dark);
    }

    #[test]
    fn theme_names_parse_and_reject_others() {
        assert_eq!("light".parse::<ThemePreference>(), Ok(ThemePreference::Light));
        let err = "sepia".parse::<ThemePreference>().unwrap_err();
        assert_eq!(err, UnknownTheme("sepia".into()));
        assert_eq!(err.to_string(), "unknown theme: sepia (expected light or dark)");
    }

    #[test]
    fn light_theme_adds_body_class() {
        assert_eq!(ThemePreference::Light.body_class(), Some("light-theme"));
        assert_eq!(ThemePreference::Dark.body_class(), None);
        assert_eq!(ThemePreference::Dark.toggle_label(), "Light");
    }
}

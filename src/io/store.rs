use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::io::lock::{FileLock, LockError};
use crate::model::list::TaskList;
use crate::model::preferences::ThemePreference;

/// Store key holding the full task list
pub const TASKS_KEY: &str = "todos";
/// Store key holding the light/dark preference
pub const THEME_KEY: &str = "theme";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("store file {path} is not a JSON object: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("stored value for {key} has the wrong shape: {source}")]
    Decode {
        key: String,
        source: serde_json::Error,
    },
    #[error("could not encode value for {key}: {source}")]
    Encode {
        key: String,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Lock(#[from] LockError),
}

/// Opaque key-value persistence. Values are generic JSON.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Store kept in memory; counts writes so callers can check what was saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: IndexMap<String, Value>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful `set` calls
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.writes += 1;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// JSON file store
// ---------------------------------------------------------------------------

/// All keys live in one JSON object on disk. Writes take the file lock, merge
/// into the current contents, and replace the file atomically.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable store file is moved before it is overwritten
    pub fn backup_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".corrupt");
        self.path.with_file_name(name)
    }

    fn read_all(&self) -> Result<IndexMap<String, Value>, StoreError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexMap::new()),
            Err(e) => {
                return Err(StoreError::ReadError {
                    path: self.path.clone(),
                    source: e,
                });
            }
        };
        if text.trim().is_empty() {
            return Ok(IndexMap::new());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            source: e,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.read_all()?.shift_remove(key))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        let write_err = |source| StoreError::WriteError {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent()
            && !dir.as_os_str().is_empty()
        {
            fs::create_dir_all(dir).map_err(write_err)?;
        }

        let _lock = FileLock::acquire_default(&self.path)?;
        // A file that no longer parses can't be merged into; set it aside and
        // start a fresh object so saves keep working.
        let mut entries = match self.read_all() {
            Ok(entries) => entries,
            Err(StoreError::Corrupt { source, .. }) => {
                let backup = self.backup_path();
                tracing::warn!(error = %source, backup = %backup.display(), "store file unreadable, replacing it");
                if let Err(e) = fs::rename(&self.path, &backup) {
                    tracing::warn!(error = %e, "could not keep a copy of the unreadable store");
                }
                IndexMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value);
        let mut content = serde_json::to_string_pretty(&entries).map_err(|e| StoreError::Encode {
            key: key.to_string(),
            source: e,
        })?;
        content.push('\n');
        atomic_write(&self.path, content.as_bytes()).map_err(write_err)
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Typed access
// ---------------------------------------------------------------------------

/// Load the task list, surfacing failures. `Ok(None)` means nothing saved yet.
pub fn try_load_tasks(store: &impl KeyValueStore) -> Result<Option<TaskList>, StoreError> {
    match store.get(TASKS_KEY)? {
        Some(value) => serde_json::from_value::<TaskList>(value)
            .map(Some)
            .map_err(|e| StoreError::Decode {
                key: TASKS_KEY.to_string(),
                source: e,
            }),
        None => Ok(None),
    }
}

/// Load the task list. Any failure (unreadable file, bad JSON, wrong shape)
/// is logged and yields an empty list.
pub fn load_tasks(store: &impl KeyValueStore) -> TaskList {
    match try_load_tasks(store) {
        Ok(list) => list.unwrap_or_else(TaskList::new),
        Err(e) => {
            tracing::warn!(error = %e, "could not load task list, starting empty");
            TaskList::new()
        }
    }
}

/// Save the full task list under [`TASKS_KEY`].
pub fn save_tasks(store: &mut impl KeyValueStore, list: &TaskList) -> Result<(), StoreError> {
    let value = serde_json::to_value(list).map_err(|e| StoreError::Encode {
        key: TASKS_KEY.to_string(),
        source: e,
    })?;
    store.set(TASKS_KEY, value)
}

/// Load the theme preference, defaulting to light on absence or error.
pub fn load_theme(store: &impl KeyValueStore) -> ThemePreference {
    match store.get(THEME_KEY) {
        Ok(Some(Value::String(s))) => ThemePreference::from_name(&s).unwrap_or_else(|| {
            tracing::warn!(value = %s, "unknown theme preference, using light");
            ThemePreference::default()
        }),
        Ok(Some(other)) => {
            tracing::warn!(value = %other, "theme preference is not a string, using light");
            ThemePreference::default()
        }
        Ok(None) => ThemePreference::default(),
        Err(e) => {
            tracing::warn!(error = %e, "could not load theme preference");
            ThemePreference::default()
        }
    }
}

pub fn save_theme(store: &mut impl KeyValueStore, theme: ThemePreference) -> Result<(), StoreError> {
    store.set(THEME_KEY, Value::String(theme.as_str().to_string()))
}

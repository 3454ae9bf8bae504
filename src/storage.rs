//! Storage layer for habits
//!
//! The whole habit collection is persisted as one JSON array under a single
//! fixed key. [`FileStore`] maps the key to a file in the data directory:
//!
//! ```text
//! <data dir>/
//!   habits.toml                   # Optional configuration
//!   habit-tracker-data.json       # The habit collection
//!   habit-tracker-data.json.lock  # Writer lock
//! ```
//!
//! [`MemoryStore`] keeps the serialized collection in memory and is used by
//! tests and embedders that do not want a file.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

use crate::config::StorageConfig;
use crate::error::{Error, Result};
use crate::habit::Habit;
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Key the habit collection is stored under
pub const DEFAULT_KEY: &str = "habit-tracker-data";

/// Durable home of the habit collection.
pub trait HabitStore {
    /// Read the whole collection. `Ok(None)` means nothing was stored yet.
    fn load(&self) -> Result<Option<Vec<Habit>>>;

    /// Replace the stored collection with `habits`.
    fn save(&mut self, habits: &[Habit]) -> Result<()>;
}

/// Platform data directory for habits (e.g. `~/.local/share/habits`).
pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("", "", "habits")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            Error::OperationFailed(
                "could not determine a data directory; pass --data-dir".to_string(),
            )
        })
}

/// Stores the collection as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    key: String,
    lock_timeout_ms: u64,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            key: DEFAULT_KEY.to_string(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn from_config(dir: impl Into<PathBuf>, config: &StorageConfig) -> Self {
        Self {
            dir: dir.into(),
            key: config.key.trim().to_string(),
            lock_timeout_ms: config.lock_timeout_ms,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Path to the JSON file holding the collection
    pub fn data_file(&self) -> PathBuf {
        self.dir.join(format!("{}.json", self.key))
    }
}

impl HabitStore for FileStore {
    fn load(&self) -> Result<Option<Vec<Habit>>> {
        let path = self.data_file();
        if !path.exists() {
            return Ok(None);
        }

        let content = lock::read_locked_str(&path, self.lock_timeout_ms)?;
        let habits: Vec<Habit> = serde_json::from_str(&content)?;
        Ok(Some(habits))
    }

    fn save(&mut self, habits: &[Habit]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(habits)?;
        lock::write_atomic_locked(self.data_file(), json.as_bytes(), self.lock_timeout_ms)
    }
}

/// Keeps the serialized collection in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    raw: Option<String>,
    fail_saves: bool,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already serialized collection
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            ..Self::default()
        }
    }

    /// The serialized collection as last saved
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Make every following save fail (or succeed again)
    pub fn set_fail_saves(&mut self, fail: bool) {
        self.fail_saves = fail;
    }

    /// Number of successful saves
    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl HabitStore for MemoryStore {
    fn load(&self) -> Result<Option<Vec<Habit>>> {
        match &self.raw {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, habits: &[Habit]) -> Result<()> {
        if self.fail_saves {
            return Err(Error::OperationFailed("memory store rejected save".to_string()));
        }
        self.raw = Some(serde_json::to_string(habits)?);
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day::Day;
    use crate::habit::{Completion, NewHabit};
    use tempfile::TempDir;

    fn sample() -> Vec<Habit> {
        let mut read = NewHabit::new("Read", "#10b981").into_habit();
        read.apply(Completion::Complete, Day::parse("2024-05-10").unwrap());
        let walk = NewHabit::new("Walk", "#3b82f6").into_habit();
        vec![read, walk]
    }

    #[test]
    fn file_store_paths() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        assert_eq!(store.key(), "habit-tracker-data");
        assert_eq!(
            store.data_file(),
            temp.path().join("habit-tracker-data.json")
        );

        let config = StorageConfig {
            key: "work".to_string(),
            lock_timeout_ms: 100,
        };
        let store = FileStore::from_config(temp.path(), &config);
        assert_eq!(store.data_file(), temp.path().join("work.json"));
    }

    #[test]
    fn file_store_missing_file_loads_none() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path().join("not-yet"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn file_store_save_then_load() {
        let temp = TempDir::new().unwrap();
        let mut store = FileStore::new(temp.path().join("nested"));
        let habits = sample();

        store.save(&habits).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded, habits);

        let raw = fs::read_to_string(store.data_file()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value.is_array());
        assert_eq!(value[0]["name"], "Read");
        assert_eq!(value[0]["completedDates"][0], "2024-05-10");
    }

    #[test]
    fn file_store_corrupt_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let store = FileStore::new(temp.path());
        fs::write(store.data_file(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(Error::Json(_))));
    }

    #[test]
    fn memory_store_round_trips_and_counts() {
        let mut store = MemoryStore::new();
        assert!(store.load().unwrap().is_none());

        store.save(&sample()).unwrap();
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().unwrap().len(), 2);

        store.set_fail_saves(true);
        assert!(store.save(&[]).is_err());
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().unwrap().unwrap().len(), 2);
    }
}

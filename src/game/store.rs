//! Durable key/value records backing the stats manager.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::error::{Result, StoreError};

/// The independent records the progress store keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Record {
    Stats,
    ModeStats,
    Sessions,
    Character,
}

impl Record {
    pub fn key(&self) -> &'static str {
        match self {
            Record::Stats => "stats",
            Record::ModeStats => "mode_stats",
            Record::Sessions => "sessions",
            Record::Character => "character",
        }
    }
}

pub trait StorageBackend {
    /// Returns `Ok(None)` when the record has never been written.
    fn read(&self, key: &'static str) -> Result<Option<String>>;

    /// Replaces the record; a reader never sees a partially written value.
    fn write(&mut self, key: &'static str, contents: &str) -> Result<()>;

    fn remove(&mut self, key: &'static str) -> Result<()>;
}

/// One JSON file per record inside a data directory.
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    dir: PathBuf,
}

impl DirectoryBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl StorageBackend for DirectoryBackend {
    fn read(&self, key: &'static str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::io_error(&path, err)),
        }
    }

    fn write(&mut self, key: &'static str, contents: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .map_err(|err| Self::io_error(&self.dir, err))?;
        let path = self.path(key);

        // The staging file is deleted on drop if any step below fails.
        let mut staging = NamedTempFile::new_in(&self.dir)
            .map_err(|err| Self::io_error(&self.dir, err))?;
        staging
            .write_all(contents.as_bytes())
            .map_err(|err| Self::io_error(staging.path(), err))?;
        staging
            .persist(&path)
            .map_err(|err| Self::io_error(&path, err.error))?;
        Ok(())
    }

    fn remove(&mut self, key: &'static str) -> Result<()> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(Self::io_error(&path, err)),
        }
    }
}

/// In-process records, used by tests and when no data directory is available.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: HashMap<&'static str, String>,
    read_only: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose writes always fail, for exercising degraded persistence.
    pub fn read_only() -> Self {
        Self {
            read_only: true,
            ..Self::default()
        }
    }

    pub fn with_record(mut self, key: &'static str, contents: &str) -> Self {
        self.records.insert(key, contents.to_string());
        self
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &'static str) -> Result<Option<String>> {
        Ok(self.records.get(key).cloned())
    }

    fn write(&mut self, key: &'static str, contents: &str) -> Result<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly(key));
        }
        self.records.insert(key, contents.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &'static str) -> Result<()> {
        if self.read_only {
            return Err(StoreError::ReadOnly(key));
        }
        self.records.remove(key);
        Ok(())
    }
}

/// Typed JSON access to the records of a [`StorageBackend`].
pub struct ProgressStore {
    backend: Box<dyn StorageBackend>,
}

impl std::fmt::Debug for ProgressStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressStore").finish_non_exhaustive()
    }
}

impl ProgressStore {
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Reads a record, falling back to its default when it is missing,
    /// unreadable or malformed.
    pub fn load<T: DeserializeOwned + Default>(&self, record: Record) -> T {
        let contents = match self.backend.read(record.key()) {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                debug!(target: "store", "No saved {} record, using defaults", record.key());
                return T::default();
            }
            Err(err) => {
                warn!(target: "store", "Error reading {} record: {}", record.key(), err);
                return T::default();
            }
        };

        serde_json::from_str(&contents).unwrap_or_else(|err| {
            warn!(target: "store", "Malformed {} record, using defaults: {}", record.key(), err);
            T::default()
        })
    }

    pub fn save<T: Serialize>(&mut self, record: Record, value: &T) -> Result<()> {
        let contents =
            serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
                record: record.key(),
                source,
            })?;
        self.backend.write(record.key(), &contents)
    }

    pub fn remove(&mut self, record: Record) -> Result<()> {
        self.backend.remove(record.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Mode, ModeStatsTable, Stats};

    #[test]
    fn test_missing_and_malformed_records_read_as_default() {
        let backend = MemoryBackend::new().with_record("stats", "{not json");
        let store = ProgressStore::new(backend);
        assert_eq!(store.load::<Stats>(Record::Stats), Stats::default());
        assert_eq!(
            store.load::<ModeStatsTable>(Record::ModeStats),
            ModeStatsTable::default()
        );
    }

    #[test]
    fn test_directory_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = ProgressStore::new(DirectoryBackend::new(dir.path().join("nested")));

        let mut table = ModeStatsTable::default();
        table.record(Mode::Groups, true, true);
        store.save(Record::ModeStats, &table).unwrap();

        let reopened = ProgressStore::new(DirectoryBackend::new(dir.path().join("nested")));
        assert_eq!(reopened.load::<ModeStatsTable>(Record::ModeStats), table);
        let files: Vec<_> = fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, vec!["mode_stats.json"]);
    }

    #[test]
    fn test_failed_write_leaves_no_staging_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the record file belongs makes the final rename fail.
        fs::create_dir(dir.path().join("stats.json")).unwrap();
        let mut backend = DirectoryBackend::new(dir.path());

        let err = backend.write("stats", "{}").unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        let files: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(files, vec!["stats.json"]);
    }

    #[test]
    fn test_remove_missing_record_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let mut backend = DirectoryBackend::new(dir.path());
        assert!(backend.remove("sessions").is_ok());
        assert_eq!(backend.read("sessions").unwrap(), None);
    }

    #[test]
    fn test_read_only_backend_rejects_writes() {
        let mut store = ProgressStore::new(MemoryBackend::read_only());
        let err = store.save(Record::Stats, &Stats::default()).unwrap_err();
        assert!(matches!(err, StoreError::ReadOnly("stats")));
    }
}

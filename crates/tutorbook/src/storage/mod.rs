//! Local store adapter for tutorbook.
//!
//! The whole record book is one JSON document kept in a named slot of a
//! `SQLite` key-value table. [`Storage::load`] and [`Storage::save`] never
//! fail towards the caller: a missing or unreadable document loads as the
//! empty default state, and a failed write is logged while the previously
//! stored document stays in place.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, error, info, warn};

use crate::config::DEFAULT_SLOT_KEY;
use crate::error::{Error, Result};
use crate::model::AppState;

/// Persistent key-value slot holding the record book.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
    /// Slot the record book is kept under.
    slot_key: String,
}

impl Storage {
    /// Open or create a storage database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self {
            path,
            conn,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        })
    }

    /// Create an in-memory storage instance for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
            slot_key: DEFAULT_SLOT_KEY.to_string(),
        })
    }

    /// Use a different slot for [`load`](Self::load) and [`save`](Self::save).
    #[must_use]
    pub fn with_slot_key(mut self, key: impl Into<String>) -> Self {
        self.slot_key = key.into();
        self
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the slot the record book is kept under.
    #[must_use]
    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Read the raw value of a slot.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn read_slot(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    /// Replace the raw value of a slot in a single statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails; the previous value
    /// is then left unchanged.
    pub fn write_slot(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            r"
            INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key, value, Utc::now().to_rfc3339()],
        )?;
        debug!(key, bytes = value.len(), "Slot written");
        Ok(())
    }

    /// Load the stored record book, or `None` when nothing was saved yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the slot cannot be read or its content is not a
    /// valid record book.
    pub fn try_load(&self) -> Result<Option<AppState>> {
        match self.read_slot(&self.slot_key)? {
            Some(raw) => Ok(Some(AppState::from_json(&raw)?)),
            None => Ok(None),
        }
    }

    /// Load the stored record book.
    ///
    /// Falls back to the empty default state when nothing is stored or the
    /// stored document cannot be read; the failure is logged.
    #[must_use]
    pub fn load(&self) -> AppState {
        match self.try_load() {
            Ok(Some(state)) => {
                debug!(
                    students = state.students.len(),
                    records = state.record_count(),
                    "Record book loaded"
                );
                state
            }
            Ok(None) => {
                info!(slot = %self.slot_key, "No saved record book, starting empty");
                AppState::default()
            }
            Err(e) => {
                error!(slot = %self.slot_key, error = %e, "Failed to load record book");
                AppState::default()
            }
        }
    }

    /// Serialize and store the record book.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn try_save(&self, state: &AppState) -> Result<()> {
        let raw = state.to_json()?;
        self.write_slot(&self.slot_key, &raw)
    }

    /// Serialize and store the record book, logging any failure.
    ///
    /// On failure the previously stored document is left as it was.
    pub fn save(&self, state: &AppState) {
        if let Err(e) = self.try_save(state) {
            error!(slot = %self.slot_key, error = %e, "Failed to save record book, change not saved");
        }
    }

    /// Get database statistics.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn stats(&self) -> Result<StorageStats> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT length(value), updated_at FROM slots WHERE key = ?1",
                [&self.slot_key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let (slot_bytes, last_saved) = match row {
            Some((len, updated_at)) => {
                let last_saved = DateTime::parse_from_rfc3339(&updated_at)
                    .map(|dt| dt.with_timezone(&Utc))
                    .map_err(|e| warn!(value = %updated_at, error = %e, "Unreadable slot timestamp"))
                    .ok();
                (u64::try_from(len).unwrap_or(0), last_saved)
            }
            None => (0, None),
        };

        let db_size_bytes = if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        };

        Ok(StorageStats {
            slot_bytes,
            last_saved,
            db_size_bytes,
        })
    }
}

/// Statistics about the storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageStats {
    /// Size of the stored document in bytes.
    pub slot_bytes: u64,
    /// When the document was last written.
    pub last_saved: Option<DateTime<Utc>>,
    /// Size of the database file in bytes.
    pub db_size_bytes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{StudentDraft, DEFAULT_ACADEMY_NAME};
    use crate::mutate;

    fn create_test_storage() -> Storage {
        crate::logging::init_test_logging();
        Storage::open_in_memory().expect("failed to create test storage")
    }

    fn sample_state() -> AppState {
        let (state, _) = mutate::add_student(&AppState::default(), StudentDraft::named("王小明"));
        state
    }

    #[test]
    fn test_load_empty_returns_default() {
        let storage = create_test_storage();
        assert_eq!(storage.load(), AppState::default());
        assert!(storage.try_load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let storage = create_test_storage();
        let state = sample_state();

        storage.save(&state);
        assert_eq!(storage.load(), state);
    }

    #[test]
    fn test_save_overwrites() {
        let storage = create_test_storage();
        storage.save(&sample_state());
        storage.save(&AppState::default());
        assert!(storage.load().students.is_empty());
    }

    #[test]
    fn test_load_corrupt_returns_default() {
        let storage = create_test_storage();
        storage
            .write_slot(DEFAULT_SLOT_KEY, "{not json")
            .unwrap();

        assert!(storage.try_load().is_err());
        assert_eq!(storage.load(), AppState::default());
    }

    #[test]
    fn test_load_fills_missing_settings() {
        let storage = create_test_storage();
        storage
            .write_slot(DEFAULT_SLOT_KEY, r#"{"students": []}"#)
            .unwrap();

        let state = storage.load();
        assert_eq!(state.settings.academy_name, DEFAULT_ACADEMY_NAME);
    }

    #[test]
    fn test_load_keeps_students_around_null_fields() {
        let storage = create_test_storage();
        storage
            .write_slot(
                DEFAULT_SLOT_KEY,
                r#"{"students": [
                    {"id": "a", "name": "A", "records": [{"id": "r1", "date": "2024-03-01"}]},
                    {"id": "b", "name": "B", "records": null}
                ], "settings": null}"#,
            )
            .unwrap();

        let state = storage.load();
        assert_eq!(state.students.len(), 2);
        assert_eq!(state.record_count(), 1);

        storage.save(&state);
        let raw = storage.read_slot(DEFAULT_SLOT_KEY).unwrap().unwrap();
        assert!(raw.contains(r#""r1""#));
    }

    #[test]
    fn test_failed_save_keeps_previous_value() {
        let storage = create_test_storage();
        let original = sample_state();
        storage.save(&original);

        storage
            .conn
            .execute_batch(
                "CREATE TRIGGER block_writes BEFORE INSERT ON slots
                 BEGIN SELECT RAISE(ABORT, 'writes blocked'); END;",
            )
            .unwrap();

        assert!(storage.try_save(&AppState::default()).is_err());
        storage.save(&AppState::default());
        assert_eq!(storage.load(), original);
    }

    #[test]
    fn test_slot_key_isolation() {
        let storage = create_test_storage().with_slot_key("other");
        storage.save(&sample_state());

        assert_eq!(storage.slot_key(), "other");
        assert!(storage.read_slot(DEFAULT_SLOT_KEY).unwrap().is_none());
        assert!(storage.read_slot("other").unwrap().is_some());
    }

    #[test]
    fn test_stats_empty() {
        let storage = create_test_storage();
        let stats = storage.stats().unwrap();
        assert_eq!(stats.slot_bytes, 0);
        assert!(stats.last_saved.is_none());
        assert_eq!(stats.db_size_bytes, 0);
    }

    #[test]
    fn test_stats_after_save() {
        let storage = create_test_storage();
        storage.save(&sample_state());
        let stats = storage.stats().unwrap();
        assert!(stats.slot_bytes > 0);
        assert!(stats.last_saved.is_some());
    }

    #[test]
    fn test_path() {
        let storage = create_test_storage();
        assert_eq!(storage.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_open_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/deeper/book.db");

        let storage = Storage::open(&nested).unwrap();
        storage.save(&sample_state());
        assert!(nested.exists());
        assert!(storage.stats().unwrap().db_size_bytes > 0);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.db");
        let state = sample_state();

        {
            let storage = Storage::open(&path).unwrap();
            storage.save(&state);
        }

        let reopened = Storage::open(&path).unwrap();
        assert_eq!(reopened.load(), state);
    }
}

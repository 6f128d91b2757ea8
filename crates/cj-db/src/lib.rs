//! Storage layer for the circadian energy journal.
//!
//! Persists journal state in a single `SQLite` file using `rusqlite`.
//!
//! # Schema
//!
//! State lives in one key-value table. Each key holds a JSON document for one
//! independent domain:
//!
//! | key           | value                                 |
//! |---------------|---------------------------------------|
//! | `entries`     | array of log entries (wire format)    |
//! | `tags`        | ordered array of tags                 |
//! | `preferences` | theme and dark mode                   |
//! | `insight`     | last generated insight and its date   |
//!
//! `updated_at` is stored as TEXT in ISO 8601 format (e.g. `2024-01-15T10:30:00Z`).
//!
//! # Corrupt data
//!
//! A value that no longer parses, or that is not stored as text at all, is
//! logged and treated as missing, so the journal always starts. The bad value stays in place until the next save
//! of that key overwrites it.
//!
//! # Thread Safety
//!
//! [`Database`] wraps a `rusqlite::Connection`, which is `Send` but not `Sync`.
//! The journal has a single writer, so no locking is done here.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use cj_core::{Insight, LogEntry, Preferences, Tag, TagRegistry};
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Database errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// A value could not be encoded for storage.
    #[error("failed to encode {key}: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Storage keys, one per persisted domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Entries,
    Tags,
    Preferences,
    Insight,
}

impl Key {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Entries => "entries",
            Self::Tags => "tags",
            Self::Preferences => "preferences",
            Self::Insight => "insight",
        }
    }
}

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens a database at the given path, creating it if necessary.
    ///
    /// The schema is initialized on first open.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Opens an in-memory database. Used by tests.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    fn init(&self) -> Result<(), DbError> {
        self.conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS kv (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(())
    }

    /// Returns the raw stored text for a key.
    ///
    /// A value of any other `SQLite` type is logged and reported as missing.
    pub fn get_raw(&self, key: Key) -> Result<Option<String>, DbError> {
        let value: Option<Value> = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        match value {
            None => Ok(None),
            Some(Value::Text(text)) => Ok(Some(text)),
            Some(other) => {
                tracing::warn!(
                    key = key.as_str(),
                    kind = %other.data_type(),
                    "stored value is not text, falling back to default"
                );
                Ok(None)
            }
        }
    }

    /// Stores raw text under a key, replacing any previous value.
    pub fn put_raw(&self, key: Key, value: &str) -> Result<(), DbError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
        self.conn.execute(
            "
            INSERT INTO kv (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            ",
            params![key.as_str(), value, now],
        )?;
        Ok(())
    }

    /// Removes a key. Returns true if it existed.
    pub fn delete(&self, key: Key) -> Result<bool, DbError> {
        let removed = self
            .conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key.as_str()])?;
        Ok(removed > 0)
    }

    /// Last write time of a key, as stored.
    pub fn updated_at(&self, key: Key) -> Result<Option<String>, DbError> {
        let value = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn load<T: DeserializeOwned>(&self, key: Key) -> Result<Option<T>, DbError> {
        let Some(raw) = self.get_raw(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(
                    key = key.as_str(),
                    error = %e,
                    "corrupted stored value, falling back to default"
                );
                Ok(None)
            }
        }
    }

    fn save<T: Serialize + ?Sized>(&self, key: Key, value: &T) -> Result<(), DbError> {
        let raw = serde_json::to_string(value).map_err(|source| DbError::Encode {
            key: key.as_str(),
            source,
        })?;
        self.put_raw(key, &raw)
    }

    /// Loads all entries, or none if missing or unreadable.
    pub fn load_entries(&self) -> Result<Vec<LogEntry>, DbError> {
        Ok(self.load(Key::Entries)?.unwrap_or_default())
    }

    pub fn save_entries(&self, entries: &[LogEntry]) -> Result<(), DbError> {
        self.save(Key::Entries, entries)
    }

    /// Loads the tag registry, or the default tag set if missing or unreadable.
    pub fn load_tags(&self) -> Result<TagRegistry, DbError> {
        Ok(self
            .load::<Vec<Tag>>(Key::Tags)?
            .map_or_else(TagRegistry::defaults, TagRegistry::new))
    }

    pub fn save_tags(&self, tags: &TagRegistry) -> Result<(), DbError> {
        self.save(Key::Tags, tags.tags())
    }

    pub fn load_preferences(&self) -> Result<Preferences, DbError> {
        Ok(self.load(Key::Preferences)?.unwrap_or_default())
    }

    pub fn save_preferences(&self, preferences: &Preferences) -> Result<(), DbError> {
        self.save(Key::Preferences, preferences)
    }

    pub fn load_insight(&self) -> Result<Option<Insight>, DbError> {
        self.load(Key::Insight)
    }

    pub fn save_insight(&self, insight: &Insight) -> Result<(), DbError> {
        self.save(Key::Insight, insight)
    }

    /// Drops the cached insight. Returns true if one was stored.
    pub fn clear_insight(&self) -> Result<bool, DbError> {
        self.delete(Key::Insight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use cj_core::{EnergyLevel, EntryStore, Slot, SlotFields, TagId};

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample_store() -> EntryStore {
        let mut store = EntryStore::new();
        store.upsert(
            &Utc,
            date("2024-01-15"),
            Slot::new(9, 30).unwrap(),
            SlotFields::energy(EnergyLevel::new(4).unwrap(), vec![TagId::new("caffeine").unwrap()]),
        );
        store.expand_sleep(
            &Utc,
            date("2024-01-15"),
            "23:00".parse().unwrap(),
            "01:00".parse().unwrap(),
        );
        store
    }

    #[test]
    fn open_in_memory_database() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn schema_matches_data_model() {
        let db = Database::open_in_memory().expect("open in-memory db");
        let mut stmt = db.conn.prepare("PRAGMA table_info(kv)").unwrap();
        let columns: Vec<String> = stmt
            .query_map([], |row| row.get::<_, String>(1))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(columns, vec!["key", "value", "updated_at"]);
    }

    #[test]
    fn fresh_database_yields_defaults() {
        let db = Database::open_in_memory().unwrap();
        assert!(db.load_entries().unwrap().is_empty());
        assert_eq!(db.load_tags().unwrap(), TagRegistry::defaults());
        assert_eq!(db.load_preferences().unwrap(), Preferences::default());
        assert!(db.load_insight().unwrap().is_none());
    }

    #[test]
    fn entries_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let store = sample_store();
        db.save_entries(store.entries()).unwrap();

        let loaded = db.load_entries().unwrap();
        assert_eq!(loaded, store.entries());
        assert!(db.updated_at(Key::Entries).unwrap().is_some());
    }

    #[test]
    fn entries_use_wire_names() {
        let db = Database::open_in_memory().unwrap();
        db.save_entries(sample_store().entries()).unwrap();
        let raw = db.get_raw(Key::Entries).unwrap().unwrap();
        assert!(raw.contains("\"dateStr\":\"2024-01-15\""));
        assert!(raw.contains("\"energyLevel\":4"));
        assert!(raw.contains("\"isSleep\":true"));
    }

    #[test]
    fn corrupt_entries_fall_back_to_empty() {
        let db = Database::open_in_memory().unwrap();
        db.put_raw(Key::Entries, "{not json").unwrap();
        assert!(db.load_entries().unwrap().is_empty());
    }

    #[test]
    fn non_text_value_falls_back_to_default() {
        let db = Database::open_in_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO kv (key, value, updated_at) VALUES ('entries', x'00ff', '2024-01-15T10:30:00Z')",
                [],
            )
            .unwrap();
        db.put_raw(Key::Preferences, r#"{"theme":"zen"}"#).unwrap();

        assert_eq!(db.get_raw(Key::Entries).unwrap(), None);
        assert!(db.load_entries().unwrap().is_empty());
        assert_eq!(db.load_preferences().unwrap().theme().id, "zen");

        db.save_entries(&[]).unwrap();
        assert_eq!(db.get_raw(Key::Entries).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn corrupt_tags_fall_back_to_defaults() {
        let db = Database::open_in_memory().unwrap();
        db.put_raw(Key::Tags, "[{\"id\":1}]").unwrap();
        assert_eq!(db.load_tags().unwrap(), TagRegistry::defaults());
    }

    #[test]
    fn stored_empty_tag_list_stays_empty() {
        let db = Database::open_in_memory().unwrap();
        db.save_tags(&TagRegistry::default()).unwrap();
        assert!(db.load_tags().unwrap().is_empty());
    }

    #[test]
    fn tag_order_is_persisted() {
        let db = Database::open_in_memory().unwrap();
        let mut tags = TagRegistry::defaults();
        tags.add("Nap", Some("#000000")).unwrap();
        tags.reorder(3, 0);
        db.save_tags(&tags).unwrap();

        let loaded = db.load_tags().unwrap();
        assert_eq!(loaded.tags()[0].label, "Nap");
        assert_eq!(loaded, tags);
    }

    #[test]
    fn preferences_round_trip() {
        let db = Database::open_in_memory().unwrap();
        let mut prefs = Preferences::default();
        prefs.set_theme("void");
        prefs.dark_mode = false;
        db.save_preferences(&prefs).unwrap();
        assert_eq!(db.load_preferences().unwrap(), prefs);
    }

    #[test]
    fn insight_save_and_clear() {
        let db = Database::open_in_memory().unwrap();
        let insight = Insight {
            date: date("2024-01-15"),
            text: "Peak at 10:00.".into(),
        };
        db.save_insight(&insight).unwrap();
        assert_eq!(db.load_insight().unwrap(), Some(insight));
        assert!(db.clear_insight().unwrap());
        assert!(!db.clear_insight().unwrap());
        assert!(db.load_insight().unwrap().is_none());
    }

    #[test]
    fn keys_are_independent() {
        let db = Database::open_in_memory().unwrap();
        db.put_raw(Key::Entries, "garbage").unwrap();
        let mut prefs = Preferences::default();
        prefs.dark_mode = false;
        db.save_preferences(&prefs).unwrap();

        assert!(db.load_entries().unwrap().is_empty());
        assert!(!db.load_preferences().unwrap().dark_mode);
    }

    #[test]
    fn file_database_persists_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.db");
        {
            let db = Database::open(&path).unwrap();
            db.save_entries(sample_store().entries()).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.load_entries().unwrap().len(), 5);
    }
}

//! Meeting history repository.
//!
//! # Responsibility
//! - Persist the meeting history as one JSON document under a fixed key
//!   in `app_storage`.
//! - Keep SQL and serde details behind the [`HistoryRepository`] trait so
//!   services stay storage-agnostic.
//!
//! # Invariants
//! - Writes replace the whole document in a single upsert; there is no
//!   partial-write state to recover from.
//! - Read paths surface undecodable or invalid documents as
//!   [`RepoError::Corrupt`] instead of guessing.

use std::error::Error;
use std::fmt::{Display, Formatter};

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DbError;
use crate::model::meeting::MeetingHistoryEntry;

/// Fixed key the history document lives under.
pub const HISTORY_STORAGE_KEY: &str = "meetingHistory";

pub type RepoResult<T> = Result<T, RepoError>;

#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// A stored document exists but cannot be decoded into valid entries.
    Corrupt(String),
    /// The in-memory collection failed to encode. Kept explicit rather
    /// than panicking, though serializing these records cannot normally
    /// fail.
    Encode(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoError::Db(err) => write!(f, "database error: {err}"),
            RepoError::Corrupt(details) => {
                write!(f, "stored history document is corrupt: {details}")
            }
            RepoError::Encode(details) => {
                write!(f, "history document failed to encode: {details}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            RepoError::Db(err) => Some(err),
            RepoError::Corrupt(_) | RepoError::Encode(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(err: DbError) -> Self {
        RepoError::Db(err)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(err: rusqlite::Error) -> Self {
        RepoError::Db(DbError::Sqlite(err))
    }
}

/// Storage contract for the meeting history collection.
pub trait HistoryRepository {
    /// Loads every stored entry. A missing document is an empty
    /// collection, not an error.
    ///
    /// # Errors
    /// - [`RepoError::Corrupt`] when the document is present but does not
    ///   decode into structurally valid entries.
    /// - [`RepoError::Db`] for storage-level failures.
    fn load_entries(&self) -> RepoResult<Vec<MeetingHistoryEntry>>;

    /// Replaces the whole persisted document with `entries`.
    fn save_entries(&self, entries: &[MeetingHistoryEntry]) -> RepoResult<()>;
}

/// SQLite-backed implementation over a migrated connection it owns.
pub struct SqliteHistoryRepository {
    conn: Connection,
}

impl SqliteHistoryRepository {
    /// Takes ownership of a connection prepared by `db::open_db` or
    /// `db::open_db_in_memory`.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl HistoryRepository for SqliteHistoryRepository {
    fn load_entries(&self) -> RepoResult<Vec<MeetingHistoryEntry>> {
        let document: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_storage WHERE key = ?1;",
                [HISTORY_STORAGE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        let Some(document) = document else {
            return Ok(Vec::new());
        };
        let entries: Vec<MeetingHistoryEntry> = serde_json::from_str(&document)
            .map_err(|err| RepoError::Corrupt(format!("not a valid history document: {err}")))?;
        for entry in &entries {
            entry.validate().map_err(|err| {
                RepoError::Corrupt(format!("entry {} is invalid: {err}", entry.id))
            })?;
        }
        Ok(entries)
    }

    fn save_entries(&self, entries: &[MeetingHistoryEntry]) -> RepoResult<()> {
        let document = serde_json::to_string(entries)
            .map_err(|err| RepoError::Encode(err.to_string()))?;
        self.conn.execute(
            "INSERT INTO app_storage (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                 value = excluded.value,
                 updated_at = excluded.updated_at;",
            params![HISTORY_STORAGE_KEY, document],
        )?;
        Ok(())
    }
}

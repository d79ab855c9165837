//! Persistent note store contracts.
//!
//! # Responsibility
//! - Define the durable key-value contract the repository persists through.
//! - Isolate SQLite details from repository state management.
//!
//! # Invariants
//! - Records are keyed by `Note::id`; the store never assigns ids.
//! - `patch` on a missing id fails with `StoreError::NotFound`.
//! - Every successful write is durable when the call returns.

use crate::db::DbError;
use crate::model::note::{Note, NoteId, NotePatch};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod sqlite;

pub use sqlite::SqliteNoteStore;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-layer error for note persistence.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    NotFound(NoteId),
    /// Persisted row could not be decoded into a valid note.
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "note not found in store: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "store connection missing required table `{table}`")
            }
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable note storage with full-scan reads only.
pub trait NoteStore {
    /// Returns every stored note, `updated_at DESC, id ASC`.
    fn get_all(&self) -> StoreResult<Vec<Note>>;
    /// Inserts or fully overwrites the record at `note.id`.
    fn put(&self, note: &Note) -> StoreResult<()>;
    /// Merges `patch` into the stored record and stamps `updated_at`.
    fn patch(&self, id: NoteId, patch: &NotePatch, updated_at: DateTime<Utc>)
        -> StoreResult<Note>;
    /// Removes a record. Returns whether it existed.
    fn delete(&self, id: NoteId) -> StoreResult<bool>;
    /// Reads the persisted current-note selection.
    fn load_current_id(&self) -> StoreResult<Option<NoteId>>;
    /// Persists (or clears) the current-note selection.
    fn save_current_id(&self, id: Option<NoteId>) -> StoreResult<()>;
}

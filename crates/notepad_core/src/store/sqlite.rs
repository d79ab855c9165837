//! SQLite-backed note store.
//!
//! # Responsibility
//! - Persist note records in the `notes` table (tags as a JSON array).
//! - Persist the current-note selection in `app_state`.
//!
//! # Invariants
//! - Reads reject invalid persisted state instead of masking it.
//! - `patch` runs read-merge-write inside one immediate transaction.

use crate::db::{open_db, open_db_in_memory};
use crate::model::note::{format_timestamp, Note, NoteId, NotePatch};
use crate::store::{NoteStore, StoreError, StoreResult};
use chrono::{DateTime, Utc};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    content,
    tags,
    folder,
    created_at,
    updated_at
FROM notes";

const CURRENT_NOTE_KEY: &str = "current_note_id";

/// Note store over an owned, migrated SQLite connection.
pub struct SqliteNoteStore {
    conn: Connection,
}

impl SqliteNoteStore {
    /// Wraps a migrated connection after checking the required tables exist.
    pub fn try_new(conn: Connection) -> StoreResult<Self> {
        for table in ["notes", "app_state"] {
            if !table_exists(&conn, table)? {
                return Err(StoreError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        Self::try_new(open_db(path)?)
    }

    /// Opens a fresh in-memory store.
    pub fn in_memory() -> StoreResult<Self> {
        Self::try_new(open_db_in_memory()?)
    }

    /// Borrow of the underlying connection, for diagnostics and tests.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Reads one note by id. Absent ids yield `Ok(None)`.
    pub fn get_note(&self, id: NoteId) -> StoreResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_note_row(row)?)),
            None => Ok(None),
        }
    }
}

impl NoteStore for SqliteNoteStore {
    fn get_all(&self) -> StoreResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} ORDER BY updated_at DESC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        debug!("event=store_get_all module=store status=ok count={}", notes.len());
        Ok(notes)
    }

    fn put(&self, note: &Note) -> StoreResult<()> {
        let tags = encode_tags(&note.tags)?;
        self.conn.execute(
            "INSERT INTO notes (id, title, content, tags, folder, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                content = excluded.content,
                tags = excluded.tags,
                folder = excluded.folder,
                created_at = excluded.created_at,
                updated_at = excluded.updated_at;",
            params![
                note.id.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                tags,
                note.folder.as_deref(),
                format_timestamp(&note.created_at),
                format_timestamp(&note.updated_at),
            ],
        )?;
        Ok(())
    }

    fn patch(
        &self,
        id: NoteId,
        patch: &NotePatch,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Note> {
        let tx = rusqlite::Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)?;
        let mut note = {
            let mut stmt = tx.prepare(&format!("{NOTE_SELECT_SQL} WHERE id = ?1;"))?;
            let mut rows = stmt.query([id.to_string()])?;
            match rows.next()? {
                Some(row) => parse_note_row(row)?,
                None => return Err(StoreError::NotFound(id)),
            }
        };

        note.apply_patch(patch, updated_at);
        tx.execute(
            "UPDATE notes
             SET title = ?2, content = ?3, tags = ?4, folder = ?5, updated_at = ?6
             WHERE id = ?1;",
            params![
                id.to_string(),
                note.title.as_str(),
                note.content.as_str(),
                encode_tags(&note.tags)?,
                note.folder.as_deref(),
                format_timestamp(&note.updated_at),
            ],
        )?;
        tx.commit()?;
        Ok(note)
    }

    fn delete(&self, id: NoteId) -> StoreResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM notes WHERE id = ?1;", [id.to_string()])?;
        Ok(changed > 0)
    }

    fn load_current_id(&self) -> StoreResult<Option<NoteId>> {
        let value: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM app_state WHERE key = ?1;",
                [CURRENT_NOTE_KEY],
                |row| row.get(0),
            )
            .optional()?;
        value.map(|text| parse_uuid(&text)).transpose()
    }

    fn save_current_id(&self, id: Option<NoteId>) -> StoreResult<()> {
        match id {
            Some(id) => {
                self.conn.execute(
                    "INSERT INTO app_state (key, value) VALUES (?1, ?2)
                     ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
                    params![CURRENT_NOTE_KEY, id.to_string()],
                )?;
            }
            None => {
                self.conn
                    .execute("DELETE FROM app_state WHERE key = ?1;", [CURRENT_NOTE_KEY])?;
            }
        }
        Ok(())
    }
}

fn parse_note_row(row: &Row<'_>) -> StoreResult<Note> {
    let id_text: String = row.get("id")?;
    let tags_text: String = row.get("tags")?;
    let created_text: String = row.get("created_at")?;
    let updated_text: String = row.get("updated_at")?;

    let tags: Vec<String> = serde_json::from_str(&tags_text).map_err(|err| {
        StoreError::InvalidData(format!("invalid tags value for note `{id_text}`: {err}"))
    })?;

    Ok(Note {
        id: parse_uuid(&id_text)?,
        title: row.get("title")?,
        content: row.get("content")?,
        tags,
        folder: row.get("folder")?,
        created_at: parse_timestamp(&created_text, "created_at")?,
        updated_at: parse_timestamp(&updated_text, "updated_at")?,
    })
}

fn encode_tags(tags: &[String]) -> StoreResult<String> {
    serde_json::to_string(tags)
        .map_err(|err| StoreError::InvalidData(format!("failed to encode tags: {err}")))
}

fn parse_uuid(value: &str) -> StoreResult<NoteId> {
    Uuid::parse_str(value)
        .map_err(|_| StoreError::InvalidData(format!("invalid uuid value `{value}`")))
}

fn parse_timestamp(value: &str, column: &str) -> StoreResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| {
            StoreError::InvalidData(format!("invalid {column} value `{value}`: {err}"))
        })
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

#[cfg(test)]
mod tests {
    use super::SqliteNoteStore;
    use crate::model::note::{Note, NotePatch};
    use crate::store::{NoteStore, StoreError};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn get_all_orders_by_updated_at_desc() {
        let store = SqliteNoteStore::in_memory().unwrap();
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut older = Note::new(base);
        older.title = "older".to_string();
        let mut newer = Note::new(base);
        newer.title = "newer".to_string();
        newer.updated_at = base + Duration::minutes(1);

        store.put(&older).unwrap();
        store.put(&newer).unwrap();

        let titles: Vec<String> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|note| note.title)
            .collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[test]
    fn patch_missing_id_is_not_found() {
        let store = SqliteNoteStore::in_memory().unwrap();
        let ghost = Note::new(Utc::now());
        let err = store
            .patch(ghost.id, &NotePatch::title("x"), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound(id) if id == ghost.id));
    }

    #[test]
    fn corrupted_tags_column_is_rejected() {
        let store = SqliteNoteStore::in_memory().unwrap();
        let note = Note::new(Utc::now());
        store.put(&note).unwrap();
        store
            .connection()
            .execute("UPDATE notes SET tags = 'not json';", [])
            .unwrap();

        let err = store.get_all().unwrap_err();
        assert!(matches!(err, StoreError::InvalidData(_)));
    }
}

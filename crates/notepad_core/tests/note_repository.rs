use chrono::{DateTime, Utc};
use notepad_core::store::StoreResult;
use notepad_core::{
    builtin_templates, LoadState, Note, NoteFilter, NoteId, NotePatch, NoteRepository,
    NoteStore, RepoError, SqliteNoteStore, StoreError, DEFAULT_NOTE_TITLE,
};
use std::cell::Cell;
use std::collections::HashSet;

fn loaded_repo() -> NoteRepository<SqliteNoteStore> {
    let store = SqliteNoteStore::in_memory().unwrap();
    let mut repo = NoteRepository::new(store);
    repo.load().unwrap();
    repo
}

#[test]
fn first_launch_creates_empty_note_and_selects_it() {
    let mut repo = loaded_repo();
    assert!(!repo.is_loading());
    assert!(repo.is_empty());
    assert!(repo.current_note().is_none());

    let note = repo.create_note().unwrap();

    assert_eq!(repo.len(), 1);
    assert_eq!(repo.current_id(), Some(note.id));
    assert_eq!(note.title, DEFAULT_NOTE_TITLE);
    assert!(note.content.is_empty());
    assert!(note.tags.is_empty());
    assert_eq!(note.created_at, note.updated_at);
}

#[test]
fn created_notes_have_distinct_ids_and_are_prepended() {
    let mut repo = loaded_repo();
    let ids: Vec<NoteId> = (0..20).map(|_| repo.create_note().unwrap().id).collect();

    let unique: HashSet<NoteId> = ids.iter().copied().collect();
    assert_eq!(unique.len(), ids.len());
    assert_eq!(repo.notes()[0].id, *ids.last().unwrap());
    assert_eq!(repo.current_id(), ids.last().copied());
}

#[test]
fn update_title_keeps_content_and_advances_updated_at() {
    let mut repo = loaded_repo();
    let note = repo.create_note().unwrap();
    repo.update_note(note.id, NotePatch::content("<p>keep me</p>"))
        .unwrap();

    let before = repo.get(note.id).unwrap().updated_at;
    let updated = repo.update_note(note.id, NotePatch::title("Plan")).unwrap();

    assert_eq!(updated.title, "Plan");
    assert_eq!(updated.content, "<p>keep me</p>");
    assert!(updated.updated_at > before);
    assert_eq!(updated.created_at, note.created_at);
    assert_eq!(repo.store().get_note(note.id).unwrap(), Some(updated));
}

#[test]
fn update_unknown_id_is_not_found() {
    let mut repo = loaded_repo();
    let ghost = Note::new(Utc::now());
    let err = repo.update_note(ghost.id, NotePatch::title("x")).unwrap_err();
    assert!(matches!(err, RepoError::NotFound(id) if id == ghost.id));
}

#[test]
fn deleting_current_note_selects_first_remaining() {
    let mut repo = loaded_repo();
    let a = repo.create_note().unwrap();
    let b = repo.create_note().unwrap();
    let c = repo.create_note().unwrap();
    repo.select_note(b.id);

    repo.delete_note(b.id).unwrap();

    assert_eq!(repo.len(), 2);
    assert_eq!(repo.current_id(), Some(c.id));
    assert!(repo.get(a.id).is_some());
    assert_eq!(repo.store().get_all().unwrap().len(), 2);
}

#[test]
fn deleting_last_note_clears_selection() {
    let mut repo = loaded_repo();
    let only = repo.create_note().unwrap();
    repo.delete_note(only.id).unwrap();

    assert!(repo.is_empty());
    assert_eq!(repo.current_id(), None);
    assert_eq!(repo.store().load_current_id().unwrap(), None);
}

#[test]
fn deleting_unknown_id_is_noop() {
    let mut repo = loaded_repo();
    let kept = repo.create_note().unwrap();
    let ghost = Note::new(Utc::now());

    repo.delete_note(ghost.id).unwrap();

    assert_eq!(repo.len(), 1);
    assert_eq!(repo.current_id(), Some(kept.id));
}

#[test]
fn selecting_unknown_id_yields_no_current_note() {
    let mut repo = loaded_repo();
    repo.create_note().unwrap();
    let ghost = Note::new(Utc::now());

    repo.select_note(ghost.id);

    assert_eq!(repo.current_id(), Some(ghost.id));
    assert!(repo.current_note().is_none());
}

#[test]
fn reload_restores_content_and_selection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notepad.db");
    let content = "<h1>Trip</h1><ul><li>passport</li></ul><p>gate <em>B12</em></p>";

    let (first_id, second_id) = {
        let mut repo = NoteRepository::new(SqliteNoteStore::open(&path).unwrap());
        repo.load().unwrap();
        let first = repo.create_note().unwrap();
        let second = repo.create_note().unwrap();
        repo.update_note(first.id, NotePatch::content(content)).unwrap();
        repo.select_note(first.id);
        (first.id, second.id)
    };

    let mut repo = NoteRepository::new(SqliteNoteStore::open(&path).unwrap());
    assert_eq!(repo.state(), LoadState::Uninitialized);
    repo.load().unwrap();

    assert_eq!(repo.len(), 2);
    assert_eq!(repo.current_id(), Some(first_id));
    assert_eq!(repo.current_note().unwrap().content, content);
    assert!(repo.get(second_id).is_some());
}

#[test]
fn reload_without_saved_selection_picks_most_recent_note() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notepad.db");

    let edited = {
        let mut repo = NoteRepository::new(SqliteNoteStore::open(&path).unwrap());
        repo.load().unwrap();
        let older = repo.create_note().unwrap();
        repo.create_note().unwrap();
        repo.update_note(older.id, NotePatch::title("edited last"))
            .unwrap();
        repo.store().save_current_id(None).unwrap();
        older.id
    };

    let mut repo = NoteRepository::new(SqliteNoteStore::open(&path).unwrap());
    repo.load().unwrap();
    assert_eq!(repo.current_id(), Some(edited));
}

#[test]
fn tag_filter_matches_exact_tag() {
    let mut repo = loaded_repo();
    let work = repo.create_note().unwrap();
    let personal = repo.create_note().unwrap();
    let both = repo.create_note().unwrap();
    repo.update_note(work.id, NotePatch::tags(vec!["work".into()]))
        .unwrap();
    repo.update_note(personal.id, NotePatch::tags(vec!["personal".into()]))
        .unwrap();
    repo.update_note(both.id, NotePatch::tags(vec!["work".into(), "personal".into()]))
        .unwrap();

    let ids: Vec<NoteId> = repo
        .filter(&NoteFilter::by_tag("work"))
        .into_iter()
        .map(|note| note.id)
        .collect();
    assert_eq!(ids, vec![both.id, work.id]);

    let mut tags = repo.all_tags();
    tags.sort();
    assert_eq!(tags, vec!["personal", "work"]);
}

#[test]
fn apply_template_and_reset_round_trip() {
    let mut repo = loaded_repo();
    let note = repo.create_note().unwrap();
    let meeting = builtin_templates()
        .into_iter()
        .find(|template| template.id == "meeting-notes")
        .unwrap();

    let templated = repo.apply_template(note.id, &meeting).unwrap();
    assert_eq!(templated.title, meeting.title);
    assert!(templated.content.contains("<h2>Agenda</h2>"));
    assert_eq!(templated.tags, vec!["meeting", "business", "notes"]);

    let reset = repo.reset_note(note.id).unwrap();
    assert_eq!(reset.title, DEFAULT_NOTE_TITLE);
    assert!(reset.content.is_empty());
    assert!(reset.tags.is_empty());
    assert!(reset.updated_at > templated.updated_at);
}

/// Store double whose writes can be switched off.
struct FlakyStore {
    inner: SqliteNoteStore,
    fail_writes: Cell<bool>,
}

impl FlakyStore {
    fn new() -> Self {
        Self {
            inner: SqliteNoteStore::in_memory().unwrap(),
            fail_writes: Cell::new(false),
        }
    }

    fn check(&self) -> StoreResult<()> {
        if self.fail_writes.get() {
            Err(StoreError::InvalidData("disk unavailable".to_string()))
        } else {
            Ok(())
        }
    }
}

impl NoteStore for FlakyStore {
    fn get_all(&self) -> StoreResult<Vec<Note>> {
        self.inner.get_all()
    }

    fn put(&self, note: &Note) -> StoreResult<()> {
        self.check()?;
        self.inner.put(note)
    }

    fn patch(&self, id: NoteId, patch: &NotePatch, updated_at: DateTime<Utc>) -> StoreResult<Note> {
        self.check()?;
        self.inner.patch(id, patch, updated_at)
    }

    fn delete(&self, id: NoteId) -> StoreResult<bool> {
        self.check()?;
        self.inner.delete(id)
    }

    fn load_current_id(&self) -> StoreResult<Option<NoteId>> {
        self.inner.load_current_id()
    }

    fn save_current_id(&self, id: Option<NoteId>) -> StoreResult<()> {
        self.check()?;
        self.inner.save_current_id(id)
    }
}

#[test]
fn failed_write_keeps_memory_change_until_sync() {
    let mut repo = NoteRepository::new(FlakyStore::new());
    repo.load().unwrap();
    let note = repo.create_note().unwrap();

    repo.store().fail_writes.set(true);
    let err = repo
        .update_note(note.id, NotePatch::title("offline edit"))
        .unwrap_err();
    assert!(matches!(err, RepoError::Persistence(_)));
    assert_eq!(repo.get(note.id).unwrap().title, "offline edit");
    assert_eq!(repo.unsynced_ids(), vec![note.id]);

    assert!(repo.sync_pending().is_err());

    repo.store().fail_writes.set(false);
    assert_eq!(repo.sync_pending().unwrap(), 1);
    assert!(repo.unsynced_ids().is_empty());
    assert_eq!(
        repo.store().inner.get_note(note.id).unwrap().unwrap().title,
        "offline edit"
    );
}

#[test]
fn failed_delete_is_retried_by_sync() {
    let mut repo = NoteRepository::new(FlakyStore::new());
    repo.load().unwrap();
    let kept = repo.create_note().unwrap();
    let doomed = repo.create_note().unwrap();

    repo.store().fail_writes.set(true);
    let err = repo.delete_note(doomed.id).unwrap_err();
    assert!(matches!(err, RepoError::Persistence(_)));
    assert_eq!(repo.len(), 1);
    assert_eq!(repo.pending_delete_ids(), vec![doomed.id]);
    assert!(repo.sync_pending().is_err());
    assert_eq!(repo.pending_delete_ids(), vec![doomed.id]);

    repo.store().fail_writes.set(false);
    assert_eq!(repo.sync_pending().unwrap(), 1);
    assert!(repo.pending_delete_ids().is_empty());
    assert_eq!(repo.store().get_all().unwrap().len(), repo.len());

    repo.load().unwrap();
    assert_eq!(repo.len(), 1);
    assert!(repo.get(doomed.id).is_none());
    assert!(repo.get(kept.id).is_some());
}

#[test]
fn failed_create_still_selects_new_note() {
    let mut repo = NoteRepository::new(FlakyStore::new());
    repo.load().unwrap();
    repo.store().fail_writes.set(true);

    let err = repo.create_note().unwrap_err();
    assert!(matches!(err, RepoError::Persistence(_)));
    assert_eq!(repo.len(), 1);
    assert!(repo.current_note().is_some());
    assert_eq!(repo.unsynced_ids().len(), 1);
}

#[test]
fn update_reinserts_note_missing_from_store() {
    let mut repo = loaded_repo();
    let note = repo.create_note().unwrap();
    repo.store().delete(note.id).unwrap();

    let updated = repo.update_note(note.id, NotePatch::title("back")).unwrap();

    assert_eq!(repo.store().get_note(note.id).unwrap(), Some(updated));
}

//! Note repository: in-memory note set, selection and store reconciliation.
//!
//! # Responsibility
//! - Load the note set once and serve reads from memory.
//! - Apply create/update/delete/select and persist each change.
//! - Track the current note and pick a fallback when it is deleted.
//!
//! # Invariants
//! - Ids are generated here (UUID v4) and never collide with a loaded id.
//! - New notes are prepended, so memory order is most-recent-first.
//! - `updated_at` strictly increases on every mutation of a note.
//! - A failed store write keeps the in-memory change (last-write-wins) and is
//!   returned as `RepoError::Persistence`.
//! - A failed store delete is retried by `sync_pending` until the store
//!   drops the record.
//! - Timestamps carry microsecond precision, the resolution the store keeps.

use crate::model::note::{Note, NoteId, NotePatch, DEFAULT_NOTE_TITLE};
use crate::repo::clock::{Clock, SystemClock};
use crate::repo::{RepoError, RepoResult};
use crate::search::filter::{collect_folders, collect_tags, filter_notes, NoteFilter};
use crate::store::{NoteStore, StoreError};
use crate::template::{render_template, Template};
use chrono::{DateTime, Duration, SubsecRound, Utc};
use log::{debug, info, warn};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Initialization lifecycle of the note set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Uninitialized,
    Loading,
    Ready,
}

/// Single source of truth for "which notes exist" and "which one is open".
pub struct NoteRepository<S: NoteStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    notes: Vec<Note>,
    current_id: Option<NoteId>,
    state: LoadState,
    unsynced: BTreeSet<NoteId>,
    pending_deletes: BTreeSet<NoteId>,
}

impl<S: NoteStore> NoteRepository<S, SystemClock> {
    /// Creates an unloaded repository using wall-clock time.
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: NoteStore, C: Clock> NoteRepository<S, C> {
    /// Creates an unloaded repository with a custom time source.
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            notes: Vec::new(),
            current_id: None,
            state: LoadState::Uninitialized,
            unsynced: BTreeSet::new(),
            pending_deletes: BTreeSet::new(),
        }
    }

    /// Loads every note from the store and chooses the current note.
    ///
    /// The persisted selection is restored when it still exists; otherwise
    /// the first note in store order is selected, or none when empty.
    ///
    /// # Errors
    /// - `Persistence` when the store cannot be read. State returns to
    ///   `Uninitialized` and memory is left untouched.
    pub fn load(&mut self) -> RepoResult<()> {
        let previous_state = self.state;
        self.state = LoadState::Loading;

        let notes = match self.store.get_all() {
            Ok(notes) => notes,
            Err(err) => {
                self.state = if previous_state == LoadState::Ready {
                    LoadState::Ready
                } else {
                    LoadState::Uninitialized
                };
                warn!("event=notes_load module=repo status=error error={err}");
                return Err(err.into());
            }
        };

        let saved_id = match self.store.load_current_id() {
            Ok(saved) => saved,
            Err(err) => {
                warn!("event=selection_load module=repo status=error error={err}");
                None
            }
        };

        self.current_id = saved_id
            .filter(|id| notes.iter().any(|note| note.id == *id))
            .or_else(|| notes.first().map(|note| note.id));
        self.notes = notes;
        self.unsynced.clear();
        self.pending_deletes.clear();
        self.state = LoadState::Ready;

        info!(
            "event=notes_load module=repo status=ok count={} has_current={}",
            self.notes.len(),
            self.current_id.is_some()
        );
        Ok(())
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Returns `true` until the initial load has completed.
    pub fn is_loading(&self) -> bool {
        self.state != LoadState::Ready
    }

    /// Notes in memory order (most recently created first).
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    /// Selected id, which may point at a note that no longer exists.
    pub fn current_id(&self) -> Option<NoteId> {
        self.current_id
    }

    /// The selected note, or `None` when nothing (or a missing id) is selected.
    pub fn current_note(&self) -> Option<&Note> {
        self.current_id.and_then(|id| self.get(id))
    }

    /// Ids whose latest in-memory state has not reached the store.
    pub fn unsynced_ids(&self) -> Vec<NoteId> {
        self.unsynced.iter().copied().collect()
    }

    /// Ids removed from memory whose store delete has not succeeded yet.
    pub fn pending_delete_ids(&self) -> Vec<NoteId> {
        self.pending_deletes.iter().copied().collect()
    }

    /// Borrow of the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates an empty note, prepends it and makes it current.
    ///
    /// # Errors
    /// - `NotReady` before `load()`.
    /// - `Persistence` when the store write fails; the note still exists in
    ///   memory and is current.
    pub fn create_note(&mut self) -> RepoResult<Note> {
        self.ensure_ready()?;

        let mut note = Note::new(self.now());
        while self.get(note.id).is_some() {
            note.id = Uuid::new_v4();
        }
        self.pending_deletes.remove(&note.id);

        self.notes.insert(0, note.clone());
        self.current_id = Some(note.id);
        info!("event=note_create module=repo status=ok note_id={}", note.id);

        let persisted = self.persist_note(&note);
        self.persist_selection();
        persisted.map(|()| note)
    }

    /// Merges `patch` into a note and refreshes its `updated_at`.
    ///
    /// # Errors
    /// - `NotFound` when `id` is not in memory.
    /// - `Persistence` when the store write fails; memory keeps the change.
    pub fn update_note(&mut self, id: NoteId, patch: NotePatch) -> RepoResult<Note> {
        self.ensure_ready()?;

        let index = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .ok_or(RepoError::NotFound(id))?;
        let stamp = self.next_stamp(self.notes[index].updated_at);
        self.notes[index].apply_patch(&patch, stamp);
        let updated = self.notes[index].clone();
        debug!(
            "event=note_update module=repo status=start note_id={id} fields={}",
            patch.field_names()
        );

        if self.unsynced.contains(&id) {
            self.persist_note(&updated)?;
            return Ok(updated);
        }

        match self.store.patch(id, &patch, stamp) {
            Ok(_) => {
                info!("event=note_update module=repo status=ok note_id={id}");
                Ok(updated)
            }
            Err(StoreError::NotFound(_)) => {
                warn!("event=note_update module=repo status=reinsert note_id={id}");
                self.persist_note(&updated)?;
                Ok(updated)
            }
            Err(err) => {
                self.unsynced.insert(id);
                warn!("event=note_update module=repo status=error note_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Removes a note. Unknown ids are a no-op.
    ///
    /// When the deleted note was current, the first remaining note becomes
    /// current (or none when the set is empty).
    ///
    /// # Errors
    /// - `Persistence` when the store delete fails; the note stays removed
    ///   from memory.
    pub fn delete_note(&mut self, id: NoteId) -> RepoResult<()> {
        self.ensure_ready()?;

        let Some(index) = self.notes.iter().position(|note| note.id == id) else {
            debug!("event=note_delete module=repo status=noop note_id={id}");
            return Ok(());
        };

        self.notes.remove(index);
        self.unsynced.remove(&id);
        if self.current_id == Some(id) {
            self.current_id = self.notes.first().map(|note| note.id);
            self.persist_selection();
        }

        match self.store.delete(id) {
            Ok(existed) => {
                self.pending_deletes.remove(&id);
                info!("event=note_delete module=repo status=ok note_id={id} existed={existed}");
                Ok(())
            }
            Err(err) => {
                self.pending_deletes.insert(id);
                warn!("event=note_delete module=repo status=error note_id={id} error={err}");
                Err(err.into())
            }
        }
    }

    /// Sets the current note id without validating it.
    ///
    /// Selecting an unknown id makes `current_note()` return `None`.
    pub fn select_note(&mut self, id: NoteId) {
        self.current_id = Some(id);
        self.persist_selection();
    }

    /// Replaces title, content and tags with a rendered template.
    pub fn apply_template(&mut self, id: NoteId, template: &Template) -> RepoResult<Note> {
        let rendered = render_template(template);
        let patch = NotePatch {
            title: Some(rendered.title),
            content: Some(rendered.content),
            tags: Some(rendered.tags),
            folder: None,
        };
        self.update_note(id, patch)
    }

    /// Clears a note back to the default title with no content or tags.
    pub fn reset_note(&mut self, id: NoteId) -> RepoResult<Note> {
        let patch = NotePatch {
            title: Some(DEFAULT_NOTE_TITLE.to_string()),
            content: Some(String::new()),
            tags: Some(Vec::new()),
            folder: None,
        };
        self.update_note(id, patch)
    }

    /// Notes matching every criterion of `filter`, in memory order.
    pub fn filter(&self, filter: &NoteFilter) -> Vec<&Note> {
        filter_notes(&self.notes, filter)
    }

    /// Unique tags across all notes, first-seen order.
    pub fn all_tags(&self) -> Vec<String> {
        collect_tags(&self.notes)
    }

    /// Unique folders across all notes, first-seen order.
    pub fn all_folders(&self) -> Vec<String> {
        collect_folders(&self.notes)
    }

    /// Retries full writes for every unsynced note, then store deletes that
    /// previously failed.
    ///
    /// Returns the number of records reconciled. Stops at the first failure.
    pub fn sync_pending(&mut self) -> RepoResult<usize> {
        self.ensure_ready()?;

        let pending = self.unsynced_ids();
        let mut written = 0;
        for id in pending {
            let Some(note) = self.get(id).cloned() else {
                self.unsynced.remove(&id);
                continue;
            };
            self.persist_note(&note)?;
            written += 1;
        }
        for id in self.pending_delete_ids() {
            if let Err(err) = self.store.delete(id) {
                warn!("event=notes_sync module=repo status=error note_id={id} error={err}");
                return Err(err.into());
            }
            self.pending_deletes.remove(&id);
            written += 1;
        }
        if written > 0 {
            info!("event=notes_sync module=repo status=ok written={written}");
        }
        Ok(written)
    }

    fn ensure_ready(&self) -> RepoResult<()> {
        if self.state == LoadState::Ready {
            Ok(())
        } else {
            Err(RepoError::NotReady)
        }
    }

    /// Clock time truncated to microseconds.
    fn now(&self) -> DateTime<Utc> {
        self.clock.now().trunc_subsecs(6)
    }

    /// Current time, bumped past `previous` when the clock has not advanced.
    fn next_stamp(&self, previous: DateTime<Utc>) -> DateTime<Utc> {
        let now = self.now();
        let previous = previous.trunc_subsecs(6);
        if now > previous {
            now
        } else {
            previous + Duration::microseconds(1)
        }
    }

    fn persist_note(&mut self, note: &Note) -> RepoResult<()> {
        match self.store.put(note) {
            Ok(()) => {
                self.unsynced.remove(&note.id);
                Ok(())
            }
            Err(err) => {
                self.unsynced.insert(note.id);
                warn!(
                    "event=note_persist module=repo status=error note_id={} error={err}",
                    note.id
                );
                Err(err.into())
            }
        }
    }

    fn persist_selection(&self) {
        if let Err(err) = self.store.save_current_id(self.current_id) {
            warn!("event=selection_save module=repo status=error error={err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{LoadState, NoteRepository};
    use crate::model::note::NotePatch;
    use crate::repo::{Clock, RepoError};
    use crate::store::{NoteStore, SqliteNoteStore};
    use chrono::{DateTime, TimeZone, Timelike, Utc};

    struct FrozenClock(DateTime<Utc>);

    impl Clock for FrozenClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn mutations_before_load_are_rejected() {
        let store = SqliteNoteStore::in_memory().unwrap();
        let mut repo = NoteRepository::new(store);
        assert_eq!(repo.state(), LoadState::Uninitialized);
        assert!(repo.is_loading());
        assert!(matches!(repo.create_note(), Err(RepoError::NotReady)));
    }

    #[test]
    fn frozen_clock_still_yields_strictly_increasing_updated_at() {
        let frozen = Utc.with_ymd_and_hms(2024, 3, 3, 12, 0, 0).unwrap();
        let store = SqliteNoteStore::in_memory().unwrap();
        let mut repo = NoteRepository::with_clock(store, FrozenClock(frozen));
        repo.load().unwrap();

        let note = repo.create_note().unwrap();
        let first = repo.update_note(note.id, NotePatch::title("a")).unwrap();
        let second = repo.update_note(note.id, NotePatch::title("b")).unwrap();

        assert!(first.updated_at > note.updated_at);
        assert!(second.updated_at > first.updated_at);
        assert_eq!(second.created_at, frozen);
    }

    #[test]
    fn nanosecond_clock_matches_reloaded_store() {
        let precise = Utc
            .with_ymd_and_hms(2024, 3, 3, 12, 0, 0)
            .unwrap()
            .with_nanosecond(123_456_789)
            .unwrap();
        let store = SqliteNoteStore::in_memory().unwrap();
        let mut repo = NoteRepository::with_clock(store, FrozenClock(precise));
        repo.load().unwrap();

        let note = repo.create_note().unwrap();
        let updated = repo.update_note(note.id, NotePatch::title("a")).unwrap();

        assert_eq!(note.created_at.nanosecond(), 123_456_000);
        assert_eq!(updated.updated_at.nanosecond(), 123_457_000);
        assert_eq!(repo.store().get_all().unwrap(), vec![updated]);
    }
}

//! In-memory note repository over a persistent store.
//!
//! # Responsibility
//! - Own the note set and the current-note selection for the UI layer.
//! - Route every mutation through a `NoteStore` and report divergence.
//!
//! # Invariants
//! - Mutations require the `Ready` load state.
//! - Memory is updated before the store write and is never rolled back.
//! - Ids whose latest write failed stay in the unsynced set until a later
//!   write for them succeeds.

use crate::model::note::NoteId;
use crate::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod clock;
pub mod note_repo;

pub use clock::{Clock, SystemClock};
pub use note_repo::{LoadState, NoteRepository};

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository-level error returned to UI callers.
#[derive(Debug)]
pub enum RepoError {
    /// A mutation was attempted before `load()` completed.
    NotReady,
    /// The id is not part of the in-memory note set.
    NotFound(NoteId),
    /// Memory was updated but the store write failed.
    Persistence(StoreError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotReady => write!(f, "note repository is not loaded yet"),
            Self::NotFound(id) => write!(f, "note not found: {id}"),
            Self::Persistence(err) => write!(f, "failed to persist note change: {err}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for RepoError {
    fn from(value: StoreError) -> Self {
        Self::Persistence(value)
    }
}

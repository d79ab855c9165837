//! Domain model for notes.
//!
//! # Responsibility
//! - Define the canonical note record used by store, repository and exports.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId` assigned by the repository.
//! - Deletion is a hard delete; there are no tombstones.

pub mod note;

//! Core domain logic for the notepad.
//!
//! Owns the note model, durable storage, the in-memory repository that the
//! editor surfaces talk to, and the export/template utilities.

pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod search;
pub mod stats;
pub mod store;
pub mod template;

pub use export::{
    export_filename, export_html, export_pdf, export_plaintext, markup_to_plaintext,
    ExportError, ExportFormat,
};
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use model::note::{Note, NoteId, NotePatch, DEFAULT_NOTE_TITLE};
pub use repo::{Clock, LoadState, NoteRepository, RepoError, RepoResult, SystemClock};
pub use search::filter::{collect_folders, collect_tags, filter_notes, preview_text, NoteFilter};
pub use stats::DocumentStats;
pub use store::{NoteStore, SqliteNoteStore, StoreError, StoreResult};
pub use template::{builtin_templates, render_template, Template, TemplateError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

//! Note domain model.
//!
//! # Responsibility
//! - Define the single persisted record shared by store, repository and UI.
//! - Provide partial-update (`NotePatch`) merge semantics.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `updated_at >= created_at`.
//! - `tags` never contains blank or duplicate values.
//! - `folder` is `None` rather than a blank string.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a note.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type NoteId = Uuid;

/// Title given to freshly created and reset notes.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled Note";

/// Canonical note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Assigned once by the repository at creation time.
    pub id: NoteId,
    pub title: String,
    /// Serialized editor markup. Opaque to core.
    pub content: String,
    /// Displayed in array order, matched as a set.
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Creates an empty note with a generated stable ID.
    ///
    /// # Invariants
    /// - `created_at == updated_at == now`.
    /// - Title is [`DEFAULT_NOTE_TITLE`], content and tags are empty.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_id(Uuid::new_v4(), now)
    }

    /// Creates an empty note with a caller-provided ID.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: NoteId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            title: DEFAULT_NOTE_TITLE.to_string(),
            content: String::new(),
            tags: Vec::new(),
            folder: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Merges all fields set in `patch` and stamps `updated_at`.
    ///
    /// Tags and folder pass through normalization.
    pub fn apply_patch(&mut self, patch: &NotePatch, updated_at: DateTime<Utc>) {
        if let Some(title) = patch.title.as_ref() {
            self.title = title.clone();
        }
        if let Some(content) = patch.content.as_ref() {
            self.content = content.clone();
        }
        if let Some(tags) = patch.tags.as_ref() {
            self.tags = normalize_tags(tags);
        }
        if let Some(folder) = patch.folder.as_ref() {
            self.folder = folder.as_deref().and_then(normalize_folder);
        }
        self.updated_at = updated_at;
    }

    /// Returns whether `tag` is one of this note's tags (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|value| value == tag)
    }
}

/// Partial note update.
///
/// `None` leaves a field untouched. For `folder`, `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub folder: Option<Option<String>>,
}

impl NotePatch {
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn content(value: impl Into<String>) -> Self {
        Self {
            content: Some(value.into()),
            ..Self::default()
        }
    }

    pub fn tags(values: Vec<String>) -> Self {
        Self {
            tags: Some(values),
            ..Self::default()
        }
    }

    pub fn folder(value: Option<String>) -> Self {
        Self {
            folder: Some(value),
            ..Self::default()
        }
    }

    /// Returns `true` when no field is set.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none() && self.folder.is_none()
    }

    /// Short comma-separated field list for log lines.
    pub fn field_names(&self) -> String {
        let mut names = Vec::new();
        if self.title.is_some() {
            names.push("title");
        }
        if self.content.is_some() {
            names.push("content");
        }
        if self.tags.is_some() {
            names.push("tags");
        }
        if self.folder.is_some() {
            names.push("folder");
        }
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(",")
        }
    }
}

/// Trims tags, drops blanks and removes duplicates keeping first occurrence.
pub fn normalize_tags(tags: &[String]) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let trimmed = tag.trim();
        if trimmed.is_empty() || unique.iter().any(|seen| seen == trimmed) {
            continue;
        }
        unique.push(trimmed.to_string());
    }
    unique
}

/// Trims a folder name; blank names mean "no folder".
pub fn normalize_folder(folder: &str) -> Option<String> {
    let trimmed = folder.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Formats a timestamp the way it is persisted and exported.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, normalize_tags, Note, NotePatch, DEFAULT_NOTE_TITLE};
    use chrono::{Duration, TimeZone, Utc};

    #[test]
    fn new_note_starts_empty_with_default_title() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let note = Note::new(now);
        assert_eq!(note.title, DEFAULT_NOTE_TITLE);
        assert!(note.content.is_empty());
        assert!(note.tags.is_empty());
        assert_eq!(note.folder, None);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn apply_patch_merges_only_set_fields() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let mut note = Note::new(now);
        note.content = "<p>keep</p>".to_string();

        let later = now + Duration::seconds(5);
        note.apply_patch(&NotePatch::title("Plan"), later);
        assert_eq!(note.title, "Plan");
        assert_eq!(note.content, "<p>keep</p>");
        assert_eq!(note.updated_at, later);
        assert_eq!(note.created_at, now);
    }

    #[test]
    fn folder_patch_distinguishes_clear_from_leave() {
        let now = Utc::now();
        let mut note = Note::new(now);
        note.apply_patch(&NotePatch::folder(Some(" Work ".to_string())), now);
        assert_eq!(note.folder.as_deref(), Some("Work"));

        note.apply_patch(&NotePatch::title("x"), now);
        assert_eq!(note.folder.as_deref(), Some("Work"));

        note.apply_patch(&NotePatch::folder(None), now);
        assert_eq!(note.folder, None);
    }

    #[test]
    fn normalize_tags_keeps_first_occurrence_order() {
        let tags = vec![
            " work ".to_string(),
            "ideas".to_string(),
            "".to_string(),
            "work".to_string(),
            "Work".to_string(),
        ];
        assert_eq!(normalize_tags(&tags), vec!["work", "ideas", "Work"]);
    }

    #[test]
    fn serializes_with_camel_case_iso_timestamps() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        let note = Note::new(now);
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["createdAt"], "2024-05-01T08:00:00Z");
        assert!(value.get("folder").is_none());
        assert_eq!(format_timestamp(&now), "2024-05-01T08:00:00.000000Z");
    }
}

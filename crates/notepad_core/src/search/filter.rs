//! Search, tag and folder filters over notes.
//!
//! # Invariants
//! - Every set criterion must match; an empty filter matches everything.
//! - Output preserves input order.
//! - Tag and folder matching is exact; text search is case-insensitive.

use crate::export::markup_to_plaintext;
use crate::model::note::Note;

/// Placeholder shown for notes whose content has no visible text.
pub const EMPTY_PREVIEW: &str = "No content";

/// Filter criteria for the note list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Case-insensitive substring of title or content.
    pub query: Option<String>,
    pub tag: Option<String>,
    pub folder: Option<String>,
}

impl NoteFilter {
    pub fn by_tag(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    pub fn by_folder(folder: impl Into<String>) -> Self {
        Self {
            folder: Some(folder.into()),
            ..Self::default()
        }
    }

    pub fn by_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Self::default()
        }
    }

    /// Returns whether `note` satisfies every set criterion.
    pub fn matches(&self, note: &Note) -> bool {
        let matches_query = match self.query.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let needle = query.to_lowercase();
                note.title.to_lowercase().contains(&needle)
                    || note.content.to_lowercase().contains(&needle)
            }
        };
        let matches_tag = self.tag.as_deref().map_or(true, |tag| note.has_tag(tag));
        let matches_folder = self
            .folder
            .as_deref()
            .map_or(true, |folder| note.folder.as_deref() == Some(folder));

        matches_query && matches_tag && matches_folder
    }
}

/// Notes matching `filter`, in input order.
pub fn filter_notes<'a>(notes: &'a [Note], filter: &NoteFilter) -> Vec<&'a Note> {
    notes.iter().filter(|note| filter.matches(note)).collect()
}

/// Unique tags in first-seen order.
pub fn collect_tags(notes: &[Note]) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in notes.iter().flat_map(|note| note.tags.iter()) {
        if !tags.contains(tag) {
            tags.push(tag.clone());
        }
    }
    tags
}

/// Unique folders in first-seen order.
pub fn collect_folders(notes: &[Note]) -> Vec<String> {
    let mut folders: Vec<String> = Vec::new();
    for folder in notes.iter().filter_map(|note| note.folder.as_ref()) {
        if !folders.contains(folder) {
            folders.push(folder.clone());
        }
    }
    folders
}

/// Plain-text snippet of note markup for list display.
pub fn preview_text(content: &str, max_chars: usize) -> String {
    let text = markup_to_plaintext(content);
    if text.is_empty() {
        return EMPTY_PREVIEW.to_string();
    }
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::{collect_folders, collect_tags, filter_notes, preview_text, NoteFilter};
    use crate::model::note::Note;
    use chrono::Utc;

    fn note(title: &str, content: &str, tags: &[&str], folder: Option<&str>) -> Note {
        let mut note = Note::new(Utc::now());
        note.title = title.to_string();
        note.content = content.to_string();
        note.tags = tags.iter().map(|tag| tag.to_string()).collect();
        note.folder = folder.map(str::to_string);
        note
    }

    #[test]
    fn query_matches_title_or_content_case_insensitively() {
        let notes = vec![
            note("Groceries", "<p>milk</p>", &[], None),
            note("Ideas", "<p>Buy MILK later</p>", &[], None),
            note("Other", "", &[], None),
        ];
        let hits = filter_notes(&notes, &NoteFilter::by_query("milk"));
        assert_eq!(hits.len(), 2);
        let hits = filter_notes(&notes, &NoteFilter::by_query("grocer"));
        assert_eq!(hits[0].title, "Groceries");
    }

    #[test]
    fn criteria_combine_with_and() {
        let notes = vec![
            note("a", "", &["work"], Some("Projects")),
            note("b", "", &["work"], None),
            note("c", "", &["home"], Some("Projects")),
        ];
        let filter = NoteFilter {
            tag: Some("work".to_string()),
            folder: Some("Projects".to_string()),
            ..NoteFilter::default()
        };
        let hits = filter_notes(&notes, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "a");
        assert_eq!(filter_notes(&notes, &NoteFilter::default()).len(), 3);
    }

    #[test]
    fn collects_unique_tags_and_folders_in_first_seen_order() {
        let notes = vec![
            note("a", "", &["work", "urgent"], Some("Inbox")),
            note("b", "", &["home", "work"], Some("Archive")),
            note("c", "", &[], Some("Inbox")),
        ];
        assert_eq!(collect_tags(&notes), vec!["work", "urgent", "home"]);
        assert_eq!(collect_folders(&notes), vec!["Inbox", "Archive"]);
    }

    #[test]
    fn preview_strips_markup_and_falls_back_when_empty() {
        assert_eq!(preview_text("<h1>Hello</h1><p>world</p>", 8), "Hello wo");
        assert_eq!(preview_text("<p></p>", 20), "No content");
    }
}

//! Note export: plain text, standalone HTML and PDF.
//!
//! # Responsibility
//! - Turn a note's title and opaque markup into downloadable artifacts.
//! - Derive stable download filenames from note titles.
//!
//! # Invariants
//! - Exports are pure: no repository or store access.
//! - Markup is treated as an HTML fragment and never validated.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod html;
mod pdf;
mod text;

pub use html::{escape_html, export_html};
pub use pdf::export_pdf;
pub use text::{export_plaintext, markup_to_plaintext, markup_to_text_blocks};

pub type ExportResult<T> = Result<T, ExportError>;

/// Export failure.
#[derive(Debug)]
pub enum ExportError {
    /// PDF renderer rejected the document.
    Pdf(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pdf(message) => write!(f, "failed to render pdf: {message}"),
        }
    }
}

impl Error for ExportError {}

/// Supported export artifact kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Text,
    Html,
    Pdf,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Html => "html",
            Self::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Text => "text/plain",
            Self::Html => "text/html",
            Self::Pdf => "application/pdf",
        }
    }
}

/// Download filename for a note title.
///
/// Every character outside `[A-Za-z0-9]` becomes `_`, then the name is
/// lowercased and the format extension appended.
pub fn export_filename(title: &str, format: ExportFormat) -> String {
    let stem: String = title
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() {
                ch.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}.{}", format.extension())
}

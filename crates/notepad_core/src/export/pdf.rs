//! PDF export on A4 pages using builtin Helvetica fonts.

use super::text::markup_to_text_blocks;
use super::{ExportError, ExportResult};
use printpdf::{BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference};

const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 20.0;
const TITLE_SIZE_PT: f32 = 18.0;
const BODY_SIZE_PT: f32 = 11.0;
const BODY_LINE_MM: f32 = 5.5;
const TITLE_LINE_MM: f32 = 10.0;
/// Approximate Helvetica 11pt characters per 170mm line.
const WRAP_COLUMNS: usize = 90;
const LAYER_NAME: &str = "content";

/// Renders the title and the note body text into PDF bytes.
///
/// Paragraphs follow block boundaries of the markup and are word-wrapped.
pub fn export_pdf(title: &str, markup: &str) -> ExportResult<Vec<u8>> {
    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(PAGE_WIDTH_MM),
        Mm(PAGE_HEIGHT_MM),
        LAYER_NAME,
    );
    let title_font = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(pdf_error)?;
    let body_font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(pdf_error)?;

    let mut cursor = PageCursor {
        layer: doc.get_page(page).get_layer(layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM,
    };

    for line in wrap_text(title, WRAP_COLUMNS / 2) {
        cursor.write(&doc, &line, TITLE_SIZE_PT, TITLE_LINE_MM, &title_font);
    }
    cursor.y -= TITLE_LINE_MM / 2.0;

    let body = markup_to_text_blocks(markup);
    for paragraph in body.split("\n\n") {
        for line in wrap_text(paragraph, WRAP_COLUMNS) {
            cursor.write(&doc, &line, BODY_SIZE_PT, BODY_LINE_MM, &body_font);
        }
        cursor.y -= BODY_LINE_MM;
    }

    doc.save_to_bytes().map_err(pdf_error)
}

struct PageCursor {
    layer: PdfLayerReference,
    y: f32,
}

impl PageCursor {
    fn write(
        &mut self,
        doc: &PdfDocumentReference,
        line: &str,
        size_pt: f32,
        line_mm: f32,
        font: &IndirectFontRef,
    ) {
        if self.y - line_mm < MARGIN_MM {
            let (page, layer) = doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);
            self.layer = doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
        }
        self.y -= line_mm;
        self.layer
            .use_text(line, size_pt, Mm(MARGIN_MM), Mm(self.y), font);
    }
}

/// Greedy word wrap; words longer than `columns` are split.
fn wrap_text(text: &str, columns: usize) -> Vec<String> {
    let columns = columns.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while word.len() > columns {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            let rest = word.split_off(columns);
            lines.push(word.into_iter().collect());
            word = rest;
        }
        let needed = current.chars().count() + usize::from(!current.is_empty()) + word.len();
        if !current.is_empty() && needed > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.extend(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn pdf_error(err: impl std::fmt::Debug) -> ExportError {
    ExportError::Pdf(format!("{err:?}"))
}

#[cfg(test)]
mod tests {
    use super::{export_pdf, wrap_text};

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap_text("alpha beta gamma delta", 11);
        assert_eq!(lines, vec!["alpha beta", "gamma delta"]);
    }

    #[test]
    fn wrap_splits_overlong_words() {
        let lines = wrap_text("abcdefghij xy", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij", "xy"]);
    }

    #[test]
    fn pdf_export_produces_pdf_bytes_across_pages() {
        let paragraph = "<p>".to_string() + &"lorem ipsum ".repeat(40) + "</p>";
        let markup = paragraph.repeat(30);
        let bytes = export_pdf("Long note", &markup).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}

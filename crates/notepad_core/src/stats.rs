//! Document statistics for note markup.

use crate::export::markup_to_text_blocks;

/// Average reading speed used for the reading-time estimate.
const WORDS_PER_MINUTE: usize = 200;

/// Counts derived from the visible text of a note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DocumentStats {
    pub words: usize,
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub paragraphs: usize,
    pub reading_minutes: usize,
}

impl DocumentStats {
    pub fn from_markup(markup: &str) -> Self {
        let text = markup_to_text_blocks(markup);
        let words = text.split_whitespace().count();
        let paragraphs = if text.trim().is_empty() {
            0
        } else {
            text.split("\n\n").count()
        };

        Self {
            words,
            characters: text.chars().filter(|ch| *ch != '\n').count(),
            characters_no_spaces: text.chars().filter(|ch| !ch.is_whitespace()).count(),
            paragraphs,
            reading_minutes: words.div_ceil(WORDS_PER_MINUTE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::DocumentStats;

    #[test]
    fn empty_markup_has_zero_counts() {
        assert_eq!(DocumentStats::from_markup("<p></p>"), DocumentStats::default());
    }

    #[test]
    fn counts_words_paragraphs_and_reading_time() {
        let stats = DocumentStats::from_markup("<p>one two</p><p>three</p>");
        assert_eq!(stats.words, 3);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(stats.characters, "one two".len() + "three".len());
        assert_eq!(stats.characters_no_spaces, 11);
        assert_eq!(stats.reading_minutes, 1);

        let long = format!("<p>{}</p>", "word ".repeat(401));
        assert_eq!(DocumentStats::from_markup(&long).reading_minutes, 3);
    }
}

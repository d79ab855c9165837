//! Markup to plain text conversion.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Node};

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "figcaption",
    "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p",
    "pre", "section", "table", "tr", "ul",
];

/// Visible text of an HTML fragment with whitespace collapsed to single
/// spaces.
pub fn markup_to_plaintext(markup: &str) -> String {
    collapse_whitespace(&raw_text(markup))
}

/// Visible text split into paragraphs at block-element boundaries.
///
/// Paragraphs are whitespace-collapsed and joined by a blank line.
pub fn markup_to_text_blocks(markup: &str) -> String {
    raw_text(markup)
        .split("\n\n")
        .map(collapse_whitespace)
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Plain-text export: title, `=` underline, blank line, body text.
pub fn export_plaintext(title: &str, markup: &str) -> String {
    format!(
        "{title}\n{}\n\n{}",
        "=".repeat(title.chars().count()),
        markup_to_plaintext(markup)
    )
}

fn raw_text(markup: &str) -> String {
    let fragment = Html::parse_fragment(markup);
    let mut out = String::with_capacity(markup.len());
    for node in fragment.tree.root().descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .parent()
                    .and_then(|parent| parent.value().as_element())
                    .is_some_and(|element| matches!(element.name(), "script" | "style"));
                if !hidden {
                    out.push_str(text);
                }
            }
            Node::Element(element) if element.name() == "br" => out.push('\n'),
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => {
                out.push_str("\n\n");
            }
            _ => {}
        }
    }
    out
}

fn collapse_whitespace(value: &str) -> String {
    WHITESPACE_RE.replace_all(value, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::{export_plaintext, markup_to_plaintext, markup_to_text_blocks};

    #[test]
    fn plaintext_strips_tags_and_collapses_whitespace() {
        let markup = "<h1>Title</h1><p>Some   <strong>bold</strong>\n text</p><ul><li>one</li><li>two</li></ul>";
        assert_eq!(markup_to_plaintext(markup), "Title Some bold text one two");
    }

    #[test]
    fn plaintext_decodes_entities_and_skips_style() {
        let markup = "<style>p { color: red; }</style><p>a &amp; b</p>";
        assert_eq!(markup_to_plaintext(markup), "a & b");
    }

    #[test]
    fn text_blocks_keep_paragraph_boundaries() {
        let markup = "<p>first para</p><p>second<br>line</p>";
        assert_eq!(markup_to_text_blocks(markup), "first para\n\nsecond line");
    }

    #[test]
    fn plaintext_export_underlines_title() {
        let exported = export_plaintext("Groceries", "<p>milk</p>");
        assert_eq!(exported, "Groceries\n=========\n\nmilk");
    }
}

//! Prompt text sent to the completion model.

/// Trailing characters of the editor text used for autocomplete.
pub const AUTOCOMPLETE_CONTEXT_CHARS: usize = 200;
/// Leading characters of the note used for title generation.
pub const TITLE_CONTENT_CHARS: usize = 1000;

pub const AUTOCOMPLETE_MAX_TOKENS: u32 = 200;
pub const HELP_MAX_TOKENS: u32 = 1000;
pub const TITLE_MAX_TOKENS: u32 = 50;

pub fn autocomplete_prompt(context: &str) -> String {
    let tail = last_chars(context, AUTOCOMPLETE_CONTEXT_CHARS);
    format!(
        "Based on the following text context, provide 3 helpful writing suggestions or continuations. \
Each suggestion should be a complete sentence or phrase that naturally follows the context. \
Return only the suggestions as a JSON array of strings.

Context: \"{tail}\"

Provide suggestions that are:
1. Contextually relevant
2. Helpful for continuing the writing
3. Natural and flowing

Return format: [\"suggestion 1\", \"suggestion 2\", \"suggestion 3\"]"
    )
}

pub fn summarize_prompt(content: &str) -> String {
    format!(
        "Please provide a concise summary of the following text. Keep it clear and to the point:\n\n{content}"
    )
}

pub fn improve_prompt(content: &str) -> String {
    format!(
        "Please improve the following text by making it clearer, more engaging, and better structured. \
Maintain the original meaning and tone:\n\n{content}"
    )
}

/// The user's own prompt, with the note appended as optional context.
pub fn custom_prompt(prompt: &str, content: Option<&str>) -> String {
    match content.filter(|value| !value.is_empty()) {
        Some(content) => format!("{prompt}\n\nContext (if relevant): {content}"),
        None => prompt.to_string(),
    }
}

pub fn title_prompt(content: &str) -> String {
    let head: String = content.chars().take(TITLE_CONTENT_CHARS).collect();
    format!(
        "Generate a concise, descriptive title for the following text content. \
The title should be no more than 8 words and capture the main topic or theme. \
Only return the title, nothing else:\n\n{head}"
    )
}

fn last_chars(value: &str, count: usize) -> &str {
    let total = value.chars().count();
    if total <= count {
        return value;
    }
    match value.char_indices().nth(total - count) {
        Some((offset, _)) => &value[offset..],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::{autocomplete_prompt, custom_prompt, last_chars, title_prompt};

    #[test]
    fn last_chars_respects_char_boundaries() {
        assert_eq!(last_chars("héllo", 3), "llo");
        assert_eq!(last_chars("ab", 10), "ab");
        assert_eq!(last_chars("日本語テキスト", 2), "スト");
    }

    #[test]
    fn autocomplete_prompt_uses_only_the_tail() {
        let context = format!("{}END", "x".repeat(500));
        let prompt = autocomplete_prompt(&context);
        assert!(prompt.contains(&format!("\"{}END\"", "x".repeat(197))));
        assert!(!prompt.contains(&"x".repeat(198)));
    }

    #[test]
    fn custom_prompt_appends_context_only_when_present() {
        assert_eq!(custom_prompt("Translate", None), "Translate");
        assert_eq!(custom_prompt("Translate", Some("")), "Translate");
        assert_eq!(
            custom_prompt("Translate", Some("hola")),
            "Translate\n\nContext (if relevant): hola"
        );
    }

    #[test]
    fn title_prompt_truncates_content() {
        let prompt = title_prompt(&"a".repeat(1500));
        assert!(prompt.ends_with(&"a".repeat(1000)));
        assert!(!prompt.contains(&"a".repeat(1001)));
    }
}

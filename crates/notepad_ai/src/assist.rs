//! Assist operations over a completion backend.
//!
//! # Invariants
//! - Input validation happens before any upstream call.
//! - Autocomplete never fails after validation: unusable model output and
//!   upstream failures both degrade to [`FALLBACK_SUGGESTIONS`].
//! - Help and title failures propagate to the caller.

use crate::backend::CompletionBackend;
use crate::error::{AiError, AiResult};
use crate::prompts;
use log::{info, warn};
use serde::Deserialize;
use std::str::FromStr;

/// Suggestions offered when the model output cannot be used.
pub const FALLBACK_SUGGESTIONS: [&str; 3] = [
    "Continue writing your thoughts here...",
    "Let me elaborate on this point.",
    "Here's what I think about this topic.",
];

const MAX_SUGGESTIONS: usize = 3;

/// Where autocomplete suggestions came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    Parsed(Vec<String>),
    Fallback(Vec<String>),
}

impl SuggestionOutcome {
    fn fallback() -> Self {
        Self::Fallback(FALLBACK_SUGGESTIONS.iter().map(|s| s.to_string()).collect())
    }

    pub fn suggestions(&self) -> &[String] {
        match self {
            Self::Parsed(values) | Self::Fallback(values) => values,
        }
    }

    pub fn into_suggestions(self) -> Vec<String> {
        match self {
            Self::Parsed(values) | Self::Fallback(values) => values,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpAction {
    Summarize,
    Improve,
    Custom,
}

impl HelpAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summarize => "summarize",
            Self::Improve => "improve",
            Self::Custom => "custom",
        }
    }
}

impl FromStr for HelpAction {
    type Err = AiError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "summarize" => Ok(Self::Summarize),
            "improve" => Ok(Self::Improve),
            "custom" => Ok(Self::Custom),
            _ => Err(AiError::validation("Invalid action")),
        }
    }
}

/// Help request as sent by the editor.
///
/// `action` stays a string so unknown actions surface as validation errors.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelpRequest {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub custom_prompt: Option<String>,
}

impl HelpRequest {
    pub fn summarize(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            action: HelpAction::Summarize.as_str().to_string(),
            custom_prompt: None,
        }
    }

    pub fn improve(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            action: HelpAction::Improve.as_str().to_string(),
            custom_prompt: None,
        }
    }

    pub fn custom(prompt: impl Into<String>, content: Option<String>) -> Self {
        Self {
            content,
            action: HelpAction::Custom.as_str().to_string(),
            custom_prompt: Some(prompt.into()),
        }
    }

    /// Validates the request and builds the model prompt.
    pub fn to_prompt(&self) -> AiResult<(HelpAction, String)> {
        let action: HelpAction = self.action.parse()?;
        let content = non_empty(self.content.as_deref());
        let prompt = match action {
            HelpAction::Summarize => prompts::summarize_prompt(
                content.ok_or_else(|| AiError::validation("Content is required for summarization"))?,
            ),
            HelpAction::Improve => prompts::improve_prompt(
                content.ok_or_else(|| AiError::validation("Content is required for improvement"))?,
            ),
            HelpAction::Custom => {
                let custom = non_empty(self.custom_prompt.as_deref())
                    .ok_or_else(|| AiError::validation("Custom prompt is required"))?;
                prompts::custom_prompt(custom, content)
            }
        };
        Ok((action, prompt))
    }
}

/// Stateless assist client; cheap to share behind an `Arc`.
pub struct AssistClient<B> {
    backend: B,
}

impl<B: CompletionBackend> AssistClient<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Up to three continuations for the text before the cursor.
    ///
    /// # Errors
    /// - `Validation` when `context` is empty.
    pub async fn autocomplete(&self, context: &str) -> AiResult<SuggestionOutcome> {
        if context.is_empty() {
            return Err(AiError::validation("Context is required"));
        }

        let prompt = prompts::autocomplete_prompt(context);
        let outcome = match self
            .backend
            .complete(&prompt, prompts::AUTOCOMPLETE_MAX_TOKENS)
            .await
        {
            Ok(text) => match parse_suggestions(&text) {
                Some(values) => SuggestionOutcome::Parsed(values),
                None => SuggestionOutcome::fallback(),
            },
            Err(err) => {
                warn!("event=ai_autocomplete module=ai status=degraded error={err}");
                SuggestionOutcome::fallback()
            }
        };

        info!(
            "event=ai_autocomplete module=ai status=ok fallback={} count={}",
            outcome.is_fallback(),
            outcome.suggestions().len()
        );
        Ok(outcome)
    }

    /// Summarize, improve or answer a custom prompt.
    pub async fn help(&self, request: &HelpRequest) -> AiResult<String> {
        let (action, prompt) = request.to_prompt()?;
        let text = self
            .backend
            .complete(&prompt, prompts::HELP_MAX_TOKENS)
            .await?;
        info!(
            "event=ai_help module=ai status=ok action={} result_chars={}",
            action.as_str(),
            text.chars().count()
        );
        Ok(text)
    }

    /// Short title for a note body, trimmed of surrounding whitespace.
    pub async fn generate_title(&self, content: &str) -> AiResult<String> {
        if content.is_empty() {
            return Err(AiError::validation("Content is required"));
        }
        let prompt = prompts::title_prompt(content);
        let text = self
            .backend
            .complete(&prompt, prompts::TITLE_MAX_TOKENS)
            .await?;
        let title = text.trim().to_string();
        info!(
            "event=ai_title module=ai status=ok title_chars={}",
            title.chars().count()
        );
        Ok(title)
    }
}

/// Parses model output as a JSON array and keeps up to three strings.
///
/// Returns `None` when the output is not an array or holds no strings.
pub fn parse_suggestions(text: &str) -> Option<Vec<String>> {
    let values: Vec<serde_json::Value> = serde_json::from_str(text.trim()).ok()?;
    let suggestions: Vec<String> = values
        .into_iter()
        .filter_map(|value| match value {
            serde_json::Value::String(text) => Some(text),
            _ => None,
        })
        .take(MAX_SUGGESTIONS)
        .collect();
    if suggestions.is_empty() {
        None
    } else {
        Some(suggestions)
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.is_empty())
}

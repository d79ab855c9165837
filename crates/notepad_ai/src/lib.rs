//! AI assist for the notepad.
//!
//! Wraps a hosted chat-completion model behind three operations used by the
//! editor: inline autocomplete suggestions, free-form help (summarize,
//! improve, custom prompt) and title generation.

pub mod assist;
pub mod backend;
pub mod config;
pub mod error;
pub mod prompts;

pub use assist::{AssistClient, HelpAction, HelpRequest, SuggestionOutcome, FALLBACK_SUGGESTIONS};
pub use backend::{CompletionBackend, OpenAiBackend};
pub use config::AiConfig;
pub use error::{AiError, AiResult};

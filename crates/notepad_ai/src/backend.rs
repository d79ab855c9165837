//! Completion backends.
//!
//! `OpenAiBackend` talks to any OpenAI-compatible `/chat/completions`
//! endpoint. Requests are single-shot: no retries, no streaming.

use crate::config::AiConfig;
use crate::error::{AiError, AiResult};
use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, Client, Response};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Turns a single user prompt into model text.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> AiResult<String>;
}

#[async_trait]
impl<T: CompletionBackend + ?Sized> CompletionBackend for Arc<T> {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> AiResult<String> {
        (**self).complete(prompt, max_tokens).await
    }
}

/// OpenAI-compatible chat completion backend.
pub struct OpenAiBackend {
    client: Client,
    config: AiConfig,
}

impl OpenAiBackend {
    pub fn new(config: AiConfig) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| AiError::Config(format!("failed to create HTTP client: {err}")))?;
        Ok(Self { client, config })
    }

    pub fn from_env() -> AiResult<Self> {
        Self::new(AiConfig::from_env()?)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    async fn error_from_response(response: Response) -> AiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ChatErrorResponse>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => body,
        };
        AiError::Upstream { status, message }
    }
}

#[async_trait]
impl CompletionBackend for OpenAiBackend {
    async fn complete(&self, prompt: &str, max_tokens: u32) -> AiResult<String> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens,
        };
        debug!(
            "event=ai_request module=ai status=start model={} max_tokens={} prompt_chars={}",
            self.config.model,
            max_tokens,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(self.completions_url())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.config.api_key))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::error_from_response(response).await;
            warn!("event=ai_request module=ai status=error error={err}");
            return Err(err);
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body)
            .map_err(|err| AiError::InvalidResponse(format!("malformed completion body: {err}")))?;
        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| AiError::InvalidResponse("completion had no content".to_string()))?;

        debug!(
            "event=ai_request module=ai status=ok response_chars={}",
            text.chars().count()
        );
        Ok(text)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatErrorResponse {
    error: ChatErrorBody,
}

#[derive(Debug, Deserialize)]
struct ChatErrorBody {
    message: String,
}

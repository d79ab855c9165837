//! AI assist endpoints.

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use notepad_ai::HelpRequest;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
pub struct AutocompleteRequest {
    #[serde(default)]
    pub context: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AutocompleteResponse {
    pub suggestions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HelpResponse {
    pub result: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct TitleRequest {
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TitleResponse {
    pub title: String,
}

/// `POST /api/ai-autocomplete`
pub async fn autocomplete(
    State(state): State<AppState>,
    body: Result<Json<AutocompleteRequest>, JsonRejection>,
) -> ServerResult<Json<AutocompleteResponse>> {
    let Json(request) = body?;
    let outcome = state
        .assist
        .autocomplete(&request.context)
        .await
        .map_err(ServerError::ai("Failed to generate suggestions"))?;
    Ok(Json(AutocompleteResponse {
        suggestions: outcome.into_suggestions(),
    }))
}

/// `POST /api/ai-help`
pub async fn help(
    State(state): State<AppState>,
    body: Result<Json<HelpRequest>, JsonRejection>,
) -> ServerResult<Json<HelpResponse>> {
    let Json(request) = body?;
    let result = state
        .assist
        .help(&request)
        .await
        .map_err(ServerError::ai("Failed to process AI request"))?;
    Ok(Json(HelpResponse { result }))
}

/// `POST /api/generate-title`
pub async fn generate_title(
    State(state): State<AppState>,
    body: Result<Json<TitleRequest>, JsonRejection>,
) -> ServerResult<Json<TitleResponse>> {
    let Json(request) = body?;
    let title = state
        .assist
        .generate_title(&request.content)
        .await
        .map_err(ServerError::ai("Failed to generate title"))?;
    Ok(Json(TitleResponse { title }))
}

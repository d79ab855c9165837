//! Handler errors and their JSON responses.
//!
//! Every error body is `{"error": "<message>"}`. Upstream details are logged,
//! never returned.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::warn;
use notepad_ai::AiError;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServerResult<T> = Result<T, ServerError>;

#[derive(Debug)]
pub enum ServerError {
    BadRequest(String),
    /// AI call failed; `failure` is the public message for non-validation errors.
    Ai {
        failure: &'static str,
        source: AiError,
    },
}

impl ServerError {
    pub fn ai(failure: &'static str) -> impl FnOnce(AiError) -> Self {
        move |source| Self::Ai { failure, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Ai { source, .. } if source.is_validation() => StatusCode::BAD_REQUEST,
            Self::Ai { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            Self::BadRequest(message) => message.clone(),
            Self::Ai { source, .. } if source.is_validation() => source.to_string(),
            Self::Ai { failure, .. } => (*failure).to_string(),
        }
    }
}

impl Display for ServerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message) => write!(f, "bad request: {message}"),
            Self::Ai { failure, source } => write!(f, "{failure}: {source}"),
        }
    }
}

impl Error for ServerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ai { source, .. } => Some(source),
            Self::BadRequest(_) => None,
        }
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(format!("Invalid request body: {}", value.body_text()))
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("event=request_failed module=server status=error error={self}");
        }
        let body = ErrorBody {
            error: self.public_message(),
        };
        (status, Json(body)).into_response()
    }
}

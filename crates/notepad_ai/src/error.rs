//! AI assist error type.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type AiResult<T> = Result<T, AiError>;

#[derive(Debug)]
pub enum AiError {
    /// Caller input was rejected before any upstream call.
    Validation(String),
    /// Missing or invalid client configuration.
    Config(String),
    Http(reqwest::Error),
    /// Upstream answered with a non-success status.
    Upstream { status: u16, message: String },
    /// Upstream answered 2xx with a body we cannot use.
    InvalidResponse(String),
}

impl AiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// `true` when the error stems from caller input rather than upstream.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(message) => write!(f, "{message}"),
            Self::Config(message) => write!(f, "ai configuration error: {message}"),
            Self::Http(err) => write!(f, "ai request failed: {err}"),
            Self::Upstream { status, message } => {
                write!(f, "ai upstream returned {status}: {message}")
            }
            Self::InvalidResponse(message) => write!(f, "invalid ai response: {message}"),
        }
    }
}

impl Error for AiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Http(err) => Some(err),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(value: reqwest::Error) -> Self {
        Self::Http(value)
    }
}

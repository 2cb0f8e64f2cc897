use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Validation,
    UnknownMode,
    ExhaustedDomain,
}

/// Presentation-facing summary of a failure that stopped a reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReadingError {
    #[error("{field}: {message}")]
    Validation { field: String, message: String },
    #[error("unknown reading mode '{0}'")]
    UnknownMode(String),
    #[error("cannot draw {requested} distinct cards from a deck of {available}")]
    ExhaustedDomain { requested: usize, available: usize },
}

impl ReadingError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::Validation,
            Self::UnknownMode(_) => ErrorCode::UnknownMode,
            Self::ExhaustedDomain { .. } => ErrorCode::ExhaustedDomain,
        }
    }
}

impl From<ReadingError> for ApiError {
    fn from(value: ReadingError) -> Self {
        Self {
            code: value.code(),
            message: value.to_string(),
        }
    }
}

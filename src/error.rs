use std::fmt;

use rusqlite;
use serde_json::Value as JsonValue;
use thiserror::Error;
use tracing::{error, warn};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredictionErrorCode {
    MissingApiKey,
    Forbidden,
    HttpTimeout,
    RateLimited,
    InvalidResponse,
    InvalidRequest,
    ProviderUnavailable,
    Unknown,
}

impl PredictionErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            PredictionErrorCode::MissingApiKey => "MISSING_API_KEY",
            PredictionErrorCode::Forbidden => "FORBIDDEN",
            PredictionErrorCode::HttpTimeout => "HTTP_TIMEOUT",
            PredictionErrorCode::RateLimited => "RATE_LIMITED",
            PredictionErrorCode::InvalidResponse => "INVALID_RESPONSE",
            PredictionErrorCode::InvalidRequest => "INVALID_REQUEST",
            PredictionErrorCode::ProviderUnavailable => "PROVIDER_UNAVAILABLE",
            PredictionErrorCode::Unknown => "UNKNOWN_PREDICTION_ERROR",
        }
    }
}

impl fmt::Display for PredictionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage error: {message}")]
    Storage { message: String },

    #[error("record not found")]
    NotFound,

    #[error("validation failed: {message}")]
    Validation {
        message: String,
        details: Option<JsonValue>,
    },

    #[error("{message}")]
    Prediction {
        code: PredictionErrorCode,
        message: String,
        correlation_id: Option<String>,
        details: Option<JsonValue>,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, "validation error");
        AppError::Validation {
            message,
            details: None,
        }
    }

    pub fn validation_with_details(message: impl Into<String>, details: JsonValue) -> Self {
        let message = message.into();
        warn!(target: "app::validation", %message, details = %details, "validation error with details");
        AppError::Validation {
            message,
            details: Some(details),
        }
    }

    pub fn prediction(code: PredictionErrorCode, message: impl Into<String>) -> Self {
        Self::prediction_with_details(code, message, None, None)
    }

    pub fn prediction_with_details(
        code: PredictionErrorCode,
        message: impl Into<String>,
        correlation_id: Option<&str>,
        details: Option<JsonValue>,
    ) -> Self {
        let message = message.into();
        let correlation = correlation_id.map(|value| value.to_string());
        match (&correlation, &details) {
            (Some(id), Some(payload)) => {
                warn!(
                    target: "app::prediction::error",
                    code = %code,
                    correlation_id = %id,
                    details = %payload,
                    %message
                );
            }
            (Some(id), None) => {
                warn!(
                    target: "app::prediction::error",
                    code = %code,
                    correlation_id = %id,
                    %message
                );
            }
            (None, Some(payload)) => {
                warn!(target: "app::prediction::error", code = %code, details = %payload, %message);
            }
            (None, None) => {
                warn!(target: "app::prediction::error", code = %code, %message);
            }
        }

        AppError::Prediction {
            code,
            message,
            correlation_id: correlation,
            details,
        }
    }

    pub fn prediction_code(&self) -> Option<PredictionErrorCode> {
        match self {
            AppError::Prediction { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn prediction_correlation_id(&self) -> Option<&str> {
        match self {
            AppError::Prediction { correlation_id, .. } => correlation_id.as_deref(),
            _ => None,
        }
    }

    pub fn prediction_details(&self) -> Option<&JsonValue> {
        match self {
            AppError::Prediction { details, .. } => details.as_ref(),
            _ => None,
        }
    }

    pub fn not_found() -> Self {
        warn!(target: "app::storage", "record not found");
        AppError::NotFound
    }

    pub fn storage(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::storage", %message, "storage error");
        AppError::Storage { message }
    }

    pub fn other(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(target: "app::other", %message, "other error");
        AppError::Other(message)
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(error: rusqlite::Error) -> Self {
        use rusqlite::Error::QueryReturnedNoRows;

        match &error {
            QueryReturnedNoRows => AppError::not_found(),
            _ => {
                error!(target: "app::storage", error = ?error, "sqlite error");
                AppError::storage(error.to_string())
            }
        }
    }
}

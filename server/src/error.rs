use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tts_core::TtsError;

/// API Error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    /// Engine failure; the message is passed to the client unchanged.
    #[error("{0}")]
    Synthesis(String),

    #[error("{0}")]
    Encoding(String),

    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("Not found")]
    NotFound,
}

impl From<TtsError> for ApiError {
    fn from(e: TtsError) -> Self {
        match e {
            TtsError::EmptyText => ApiError::InvalidInput(e.to_string()),
            TtsError::Encoding(_) | TtsError::Io(_) => ApiError::Encoding(e.to_string()),
            TtsError::Synthesis(msg) => ApiError::Synthesis(msg),
            TtsError::ModelLoad { .. } => ApiError::Synthesis(e.to_string()),
        }
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Synthesis(_) | ApiError::Encoding(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

// Error bodies are the bare message. The service only listens on loopback, so
// engine messages are not redacted.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Synthesis(_) => tracing::error!(error = ?self, "TTS error: {}", self),
            ApiError::Encoding(_) => tracing::error!(error = ?self, "WAV encoding error: {}", self),
            ApiError::InternalError(_) => tracing::error!(error = ?self, "Internal error: {}", self),
            ApiError::InvalidInput(_) => tracing::debug!("Rejected request: {}", self),
            ApiError::NotFound => {}
        }

        (status, self.to_string()).into_response()
    }
}

//! Error types for voice loading, synthesis and WAV packaging.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TtsError {
    /// The voice model or its config could not be loaded.
    #[error("failed to load voice model {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// Callers must not ask for an empty utterance.
    #[error("cannot synthesize empty text")]
    EmptyText,

    /// The engine failed while producing audio. Carries the engine's message as-is.
    #[error("{0}")]
    Synthesis(String),

    /// The PCM payload could not be packaged into a WAV container.
    #[error("WAV encoding error: {0}")]
    Encoding(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TtsError {
    pub(crate) fn model_load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        TtsError::ModelLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<hound::Error> for TtsError {
    fn from(e: hound::Error) -> Self {
        match e {
            hound::Error::IoError(io) => TtsError::Io(io),
            other => TtsError::Encoding(other.to_string()),
        }
    }
}

pub type TtsResult<T> = Result<T, TtsError>;

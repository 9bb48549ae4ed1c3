//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{QuestionError, QuizId};
use storage::repository::StorageError;

use crate::surface::MediaSlot;

/// Errors emitted by quiz data providers.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    #[error("quiz request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("quiz response could not be decoded: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("quiz {0} is not available")]
    UnknownQuiz(QuizId),
    #[error("quiz {0} has no submitted result")]
    NoResult(QuizId),
    #[error(transparent)]
    InvalidQuestion(#[from] QuestionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("quiz fetch ended before delivering a result")]
    Cancelled,
}

impl ProviderError {
    /// Short message for the transient on-screen notification.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ProviderError::HttpStatus(status) => match status.as_u16() {
                401 | 403 => "Your session has expired. Please sign in again.".into(),
                404 => "This quiz is no longer available.".into(),
                500..=599 => "The quiz server is unavailable. Try again later.".into(),
                code => format!("The quiz could not be loaded (error {code})."),
            },
            ProviderError::Http(err) if err.is_timeout() => "The connection timed out.".into(),
            ProviderError::Http(err) if err.is_connect() => "No internet connection.".into(),
            ProviderError::Http(_) => "The quiz could not be loaded.".into(),
            ProviderError::UnknownQuiz(_) => "This quiz is no longer available.".into(),
            ProviderError::NoResult(_) => "The quiz result is not ready yet.".into(),
            ProviderError::Decode(_)
            | ProviderError::InvalidQuestion(_) => "The quiz could not be read.".into(),
            ProviderError::Storage(_) => "The saved quiz could not be read.".into(),
            ProviderError::Cancelled => "Loading the quiz was interrupted.".into(),
        }
    }
}

/// Errors raised by a media playback surface.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlaybackError {
    #[error("could not load {uri}: {reason}")]
    Load { uri: String, reason: String },
    #[error("{0} has no media loaded")]
    NotLoaded(MediaSlot),
    #[error("playback failed on {slot}: {reason}")]
    Playback { slot: MediaSlot, reason: String },
    #[error("could not release {slot}: {reason}")]
    Release { slot: MediaSlot, reason: String },
}

/// Errors reading quiz configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{0} is not set")]
    Missing(&'static str),
    #[error("invalid quiz id: {0}")]
    InvalidQuizId(String),
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("invalid request timeout: {0}")]
    InvalidTimeout(String),
}

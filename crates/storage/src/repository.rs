use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{QuizDetail, QuizId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// A quiz as last fetched from the data provider.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDetailRecord {
    pub detail: QuizDetail,
    pub fetched_at: DateTime<Utc>,
}

impl QuizDetailRecord {
    #[must_use]
    pub fn new(detail: QuizDetail, fetched_at: DateTime<Utc>) -> Self {
        Self { detail, fetched_at }
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.detail.quiz_id
    }
}

/// Local cache of fetched quizzes, keyed by quiz id.
#[async_trait]
pub trait QuizDetailRepository: Send + Sync {
    /// Insert or replace the cached copy of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the record cannot be stored.
    async fn save_detail(&self, record: &QuizDetailRecord) -> Result<(), StorageError>;

    /// Fetch the cached copy of a quiz, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` for connection or decoding failures.
    async fn get_detail(&self, quiz_id: QuizId) -> Result<Option<QuizDetailRecord>, StorageError>;

    /// Drop the cached copy of a quiz. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the delete fails.
    async fn delete_detail(&self, quiz_id: QuizId) -> Result<bool, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    details: Arc<Mutex<HashMap<QuizId, QuizDetailRecord>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuizDetailRepository for InMemoryRepository {
    async fn save_detail(&self, record: &QuizDetailRecord) -> Result<(), StorageError> {
        let mut guard = self
            .details
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(record.quiz_id(), record.clone());
        Ok(())
    }

    async fn get_detail(&self, quiz_id: QuizId) -> Result<Option<QuizDetailRecord>, StorageError> {
        let guard = self
            .details
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&quiz_id).cloned())
    }

    async fn delete_detail(&self, quiz_id: QuizId) -> Result<bool, StorageError> {
        let mut guard = self
            .details
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.remove(&quiz_id).is_some())
    }
}

/// Bundle of repositories handed to the services layer.
#[derive(Clone)]
pub struct Storage {
    pub quiz_details: Arc<dyn QuizDetailRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        Self {
            quiz_details: Arc::new(repo),
        }
    }
}

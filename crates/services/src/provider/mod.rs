//! Quiz data providers: where questions and the reveal policy come from.

use std::fmt;

use async_trait::async_trait;
use quiz_core::model::{AnswerRecord, QuizDetail, QuizId, QuizResult};

use crate::error::ProviderError;

mod cached;
mod fetch;
mod http;
mod memory;
pub mod wire;

pub use cached::CachingQuizProvider;
pub use fetch::{QuizFetch, fetch_once};
pub use http::HttpQuizProvider;
pub use memory::InMemoryQuizProvider;

/// Key of one quiz fetch: who is asking, with which token, for which quiz.
#[derive(Clone, PartialEq, Eq)]
pub struct QuizRequest {
    user_uuid: String,
    api_token: String,
    quiz_id: QuizId,
}

impl QuizRequest {
    #[must_use]
    pub fn new(user_uuid: impl Into<String>, api_token: impl Into<String>, quiz_id: QuizId) -> Self {
        Self {
            user_uuid: user_uuid.into(),
            api_token: api_token.into(),
            quiz_id,
        }
    }

    #[must_use]
    pub fn user_uuid(&self) -> &str {
        &self.user_uuid
    }

    #[must_use]
    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    #[must_use]
    pub fn quiz_id(&self) -> QuizId {
        self.quiz_id
    }
}

impl fmt::Debug for QuizRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizRequest")
            .field("user_uuid", &self.user_uuid)
            .field("api_token", &"<redacted>")
            .field("quiz_id", &self.quiz_id)
            .finish()
    }
}

/// Supplies quizzes, accepts finished answer sheets and scores them.
#[async_trait]
pub trait QuizDataProvider: Send + Sync {
    /// Fetch the ordered questions and reveal policy of a quiz.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the quiz cannot be fetched or decoded.
    async fn fetch_quiz(&self, request: &QuizRequest) -> Result<QuizDetail, ProviderError>;

    /// Send the user's answers for scoring.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when the submission is rejected or fails.
    async fn submit_result(
        &self,
        request: &QuizRequest,
        answers: &[AnswerRecord],
    ) -> Result<(), ProviderError>;

    /// Fetch the scored result of the last submission, with every correct answer.
    ///
    /// # Errors
    ///
    /// Returns `ProviderError` when no result is available or it cannot be decoded.
    async fn fetch_result(&self, request: &QuizRequest) -> Result<QuizResult, ProviderError>;
}

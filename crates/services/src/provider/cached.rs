use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::Clock;
use quiz_core::model::{AnswerRecord, QuizDetail, QuizResult};
use storage::repository::{QuizDetailRecord, QuizDetailRepository};

use super::{QuizDataProvider, QuizRequest};
use crate::error::ProviderError;

/// Remote provider backed by a local copy of every quiz it fetched.
///
/// A failed fetch falls back to the stored copy once; there is no retry.
#[derive(Clone)]
pub struct CachingQuizProvider {
    clock: Clock,
    remote: Arc<dyn QuizDataProvider>,
    cache: Arc<dyn QuizDetailRepository>,
}

impl CachingQuizProvider {
    #[must_use]
    pub fn new(
        clock: Clock,
        remote: Arc<dyn QuizDataProvider>,
        cache: Arc<dyn QuizDetailRepository>,
    ) -> Self {
        Self {
            clock,
            remote,
            cache,
        }
    }
}

#[async_trait]
impl QuizDataProvider for CachingQuizProvider {
    async fn fetch_quiz(&self, request: &QuizRequest) -> Result<QuizDetail, ProviderError> {
        match self.remote.fetch_quiz(request).await {
            Ok(detail) => {
                let record = QuizDetailRecord::new(detail.clone(), self.clock.now());
                if let Err(err) = self.cache.save_detail(&record).await {
                    log::warn!("could not cache quiz {}: {err}", detail.quiz_id);
                }
                Ok(detail)
            }
            Err(remote_err) => match self.cache.get_detail(request.quiz_id()).await {
                Ok(Some(record)) => {
                    log::warn!(
                        "serving quiz {} cached {}m ago after fetch failure: {remote_err}",
                        record.quiz_id(),
                        self.clock.age_of(record.fetched_at).num_minutes()
                    );
                    Ok(record.detail)
                }
                Ok(None) => Err(remote_err),
                Err(cache_err) => {
                    log::warn!("quiz cache lookup failed: {cache_err}");
                    Err(remote_err)
                }
            },
        }
    }

    async fn submit_result(
        &self,
        request: &QuizRequest,
        answers: &[AnswerRecord],
    ) -> Result<(), ProviderError> {
        self.remote.submit_result(request, answers).await
    }

    async fn fetch_result(&self, request: &QuizRequest) -> Result<QuizResult, ProviderError> {
        self.remote.fetch_result(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::InMemoryQuizProvider;
    use quiz_core::model::{QuizId, RevealPolicy};
    use quiz_core::time::{fixed_clock, fixed_now};
    use storage::repository::InMemoryRepository;

    fn request(id: u64) -> QuizRequest {
        QuizRequest::new("user", "token", QuizId::new(id))
    }

    #[tokio::test]
    async fn successful_fetch_is_cached() {
        let detail = QuizDetail::new(QuizId::new(1), RevealPolicy::Immediate, Vec::new());
        let remote = InMemoryQuizProvider::new().with_detail(detail.clone());
        let cache = InMemoryRepository::new();
        let provider =
            CachingQuizProvider::new(fixed_clock(), Arc::new(remote), Arc::new(cache.clone()));

        assert_eq!(provider.fetch_quiz(&request(1)).await.unwrap(), detail);
        let cached = cache.get_detail(QuizId::new(1)).await.unwrap().unwrap();
        assert_eq!(cached.detail, detail);
        assert_eq!(cached.fetched_at, fixed_now());
    }

    #[tokio::test]
    async fn failed_fetch_serves_cached_copy() {
        let cache = InMemoryRepository::new();
        let detail = QuizDetail::new(QuizId::new(2), RevealPolicy::Deferred, Vec::new());
        cache
            .save_detail(&QuizDetailRecord::new(detail.clone(), fixed_now()))
            .await
            .unwrap();
        let provider = CachingQuizProvider::new(
            fixed_clock(),
            Arc::new(InMemoryQuizProvider::new()),
            Arc::new(cache),
        );

        assert_eq!(provider.fetch_quiz(&request(2)).await.unwrap(), detail);
    }

    #[tokio::test]
    async fn failed_fetch_without_cache_returns_remote_error() {
        let provider = CachingQuizProvider::new(
            fixed_clock(),
            Arc::new(InMemoryQuizProvider::new()),
            Arc::new(InMemoryRepository::new()),
        );
        let err = provider.fetch_quiz(&request(3)).await.unwrap_err();
        assert!(matches!(err, ProviderError::UnknownQuiz(id) if id == QuizId::new(3)));
    }

    #[tokio::test]
    async fn results_come_from_the_remote() {
        let detail = QuizDetail::new(QuizId::new(5), RevealPolicy::Deferred, Vec::new());
        let remote = InMemoryQuizProvider::new().with_detail(detail);
        let provider = CachingQuizProvider::new(
            fixed_clock(),
            Arc::new(remote.clone()),
            Arc::new(InMemoryRepository::new()),
        );

        assert!(matches!(
            provider.fetch_result(&request(5)).await,
            Err(ProviderError::NoResult(_))
        ));
        provider.submit_result(&request(5), &[]).await.unwrap();
        let result = provider.fetch_result(&request(5)).await.unwrap();
        assert!(result.questions.is_empty());
        assert_eq!(remote.submissions().len(), 1);
    }
}

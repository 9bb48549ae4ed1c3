use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::{
    AnswerRecord, AnswerSource, QuestionResult, QuizDetail, QuizId, QuizResult,
};
use storage::repository::StorageError;

use super::{QuizDataProvider, QuizRequest};
use crate::error::ProviderError;

/// Serves quizzes from memory and keeps every submitted answer sheet.
///
/// Results are scored locally from the latest sheet, the way the server would.
#[derive(Clone, Default)]
pub struct InMemoryQuizProvider {
    details: Arc<Mutex<HashMap<QuizId, QuizDetail>>>,
    submissions: Arc<Mutex<Vec<(QuizId, Vec<AnswerRecord>)>>>,
}

impl InMemoryQuizProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_detail(self, detail: QuizDetail) -> Self {
        self.insert(detail);
        self
    }

    pub fn insert(&self, detail: QuizDetail) {
        let mut guard = match self.details.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.insert(detail.quiz_id, detail);
    }

    #[must_use]
    pub fn submissions(&self) -> Vec<(QuizId, Vec<AnswerRecord>)> {
        match self.submissions.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl QuizDataProvider for InMemoryQuizProvider {
    async fn fetch_quiz(&self, request: &QuizRequest) -> Result<QuizDetail, ProviderError> {
        let guard = self
            .details
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .get(&request.quiz_id())
            .cloned()
            .ok_or(ProviderError::UnknownQuiz(request.quiz_id()))
    }

    async fn submit_result(
        &self,
        request: &QuizRequest,
        answers: &[AnswerRecord],
    ) -> Result<(), ProviderError> {
        let mut guard = self
            .submissions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.push((request.quiz_id(), answers.to_vec()));
        Ok(())
    }

    async fn fetch_result(&self, request: &QuizRequest) -> Result<QuizResult, ProviderError> {
        let quiz_id = request.quiz_id();
        let sheet = self
            .submissions()
            .into_iter()
            .rev()
            .find(|(id, _)| *id == quiz_id)
            .map(|(_, answers)| answers)
            .ok_or(ProviderError::NoResult(quiz_id))?;
        let detail = self.fetch_quiz(request).await?;

        let questions = detail
            .questions
            .iter()
            .map(|q| QuestionResult {
                question_id: q.id(),
                correct_answer_id: q.correct_answer().id(),
                user_answer_id: sheet
                    .iter()
                    .find(|r| r.question_id == q.id() && r.source == AnswerSource::User)
                    .map(|r| r.answer_id),
            })
            .collect();
        Ok(QuizResult::from_questions(questions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{Answer, AnswerId, Content, QuestionDraft, QuestionId, RevealPolicy};

    fn detail() -> QuizDetail {
        let questions = (1..=3)
            .map(|id| {
                QuestionDraft {
                    id: QuestionId::new(id),
                    title: format!("Q{id}"),
                    content: Content::text(format!("Q{id}")).unwrap(),
                    duration_secs: 10,
                    answers: vec![
                        Answer::new(AnswerId::new(1), "A", false, Content::blank()),
                        Answer::new(AnswerId::new(2), "B", true, Content::blank()),
                    ],
                }
                .validate()
                .unwrap()
            })
            .collect();
        QuizDetail::new(QuizId::new(4), RevealPolicy::Deferred, questions)
    }

    fn record(q: u64, a: u64, source: AnswerSource) -> AnswerRecord {
        AnswerRecord {
            question_id: QuestionId::new(q),
            answer_id: AnswerId::new(a),
            is_correct: a == 2,
            source,
        }
    }

    #[tokio::test]
    async fn result_scores_latest_sheet_and_ignores_timeouts() {
        let provider = InMemoryQuizProvider::new().with_detail(detail());
        let request = QuizRequest::new("u", "t", QuizId::new(4));
        provider
            .submit_result(&request, &[record(1, 1, AnswerSource::User)])
            .await
            .unwrap();
        provider
            .submit_result(
                &request,
                &[
                    record(1, 2, AnswerSource::User),
                    record(2, 2, AnswerSource::Timeout),
                    record(3, 1, AnswerSource::User),
                ],
            )
            .await
            .unwrap();

        let result = provider.fetch_result(&request).await.unwrap();
        assert_eq!((result.correct, result.wrong, result.unanswered), (1, 1, 1));
        assert_eq!(result.questions[1].user_answer_id, None);
        assert_eq!(result.questions[1].correct_answer_id, AnswerId::new(2));
    }

    #[tokio::test]
    async fn result_before_submission_is_an_error() {
        let provider = InMemoryQuizProvider::new().with_detail(detail());
        let request = QuizRequest::new("u", "t", QuizId::new(4));
        let err = provider.fetch_result(&request).await.unwrap_err();
        assert!(matches!(err, ProviderError::NoResult(id) if id == QuizId::new(4)));
    }
}

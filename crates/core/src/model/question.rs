use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use thiserror::Error;

use crate::model::{Answer, AnswerId, Content, QuestionId};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question {id} has no answers")]
    NoAnswers { id: QuestionId },

    #[error("question {id} has no correct answer")]
    NoCorrectAnswer { id: QuestionId },

    #[error("question {id} has {count} correct answers, expected exactly one")]
    MultipleCorrectAnswers { id: QuestionId, count: usize },

    #[error("question {id} repeats answer id {answer}")]
    DuplicateAnswerId { id: QuestionId, answer: AnswerId },
}

//
// ─── DRAFT (unvalidated input) ─────────────────────────────────────────────────
//

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub id: QuestionId,
    pub title: String,
    pub content: Content,
    pub duration_secs: u32,
    pub answers: Vec<Answer>,
}

impl QuestionDraft {
    /// Validate the draft into an immutable `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` unless the answers are non-empty, have unique ids,
    /// and contain exactly one correct answer.
    pub fn validate(self) -> Result<Question, QuestionError> {
        let id = self.id;
        if self.answers.is_empty() {
            return Err(QuestionError::NoAnswers { id });
        }

        let mut seen = HashSet::with_capacity(self.answers.len());
        for answer in &self.answers {
            if !seen.insert(answer.id()) {
                return Err(QuestionError::DuplicateAnswerId {
                    id,
                    answer: answer.id(),
                });
            }
        }

        let correct: Vec<usize> = self
            .answers
            .iter()
            .enumerate()
            .filter(|(_, a)| a.is_correct())
            .map(|(idx, _)| idx)
            .collect();
        let correct_index = match correct.as_slice() {
            [] => return Err(QuestionError::NoCorrectAnswer { id }),
            [idx] => *idx,
            many => {
                return Err(QuestionError::MultipleCorrectAnswers {
                    id,
                    count: many.len(),
                });
            }
        };

        Ok(Question {
            id,
            title: self.title,
            content: self.content,
            duration_secs: self.duration_secs,
            answers: self.answers,
            correct_index,
        })
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A validated question. Exactly one of its answers is correct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionDraft", into = "QuestionDraft")]
pub struct Question {
    id: QuestionId,
    title: String,
    content: Content,
    duration_secs: u32,
    answers: Vec<Answer>,
    correct_index: usize,
}

impl Question {
    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    #[must_use]
    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    /// Countdown length for this question.
    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::from_secs(u64::from(self.duration_secs))
    }

    #[must_use]
    pub fn answers(&self) -> &[Answer] {
        &self.answers
    }

    #[must_use]
    pub fn answer(&self, id: AnswerId) -> Option<&Answer> {
        self.answers.iter().find(|a| a.id() == id)
    }

    #[must_use]
    pub fn correct_answer(&self) -> &Answer {
        &self.answers[self.correct_index]
    }
}

impl TryFrom<QuestionDraft> for Question {
    type Error = QuestionError;

    fn try_from(draft: QuestionDraft) -> Result<Self, Self::Error> {
        draft.validate()
    }
}

impl From<Question> for QuestionDraft {
    fn from(q: Question) -> Self {
        Self {
            id: q.id,
            title: q.title,
            content: q.content,
            duration_secs: q.duration_secs,
            answers: q.answers,
        }
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn answer(id: u64, correct: bool) -> Answer {
        Answer::new(
            AnswerId::new(id),
            format!("A{id}"),
            correct,
            Content::text(format!("because {id}")).unwrap(),
        )
    }

    fn draft(answers: Vec<Answer>) -> QuestionDraft {
        QuestionDraft {
            id: QuestionId::new(1),
            title: "Capital of France?".into(),
            content: Content::text("Capital of France?").unwrap(),
            duration_secs: 10,
            answers,
        }
    }

    #[test]
    fn valid_question_finds_correct_answer() {
        let q = draft(vec![answer(1, false), answer(2, true)]).validate().unwrap();
        assert_eq!(q.correct_answer().id(), AnswerId::new(2));
        assert_eq!(q.duration(), Duration::from_secs(10));
        assert!(q.answer(AnswerId::new(1)).is_some());
        assert!(q.answer(AnswerId::new(7)).is_none());
    }

    #[test]
    fn empty_answers_fail() {
        let err = draft(Vec::new()).validate().unwrap_err();
        assert!(matches!(err, QuestionError::NoAnswers { .. }));
    }

    #[test]
    fn missing_correct_answer_fails() {
        let err = draft(vec![answer(1, false)]).validate().unwrap_err();
        assert!(matches!(err, QuestionError::NoCorrectAnswer { .. }));
    }

    #[test]
    fn two_correct_answers_fail() {
        let err = draft(vec![answer(1, true), answer(2, true)])
            .validate()
            .unwrap_err();
        assert!(matches!(
            err,
            QuestionError::MultipleCorrectAnswers { count: 2, .. }
        ));
    }

    #[test]
    fn duplicate_answer_ids_fail() {
        let err = draft(vec![answer(1, true), answer(1, false)])
            .validate()
            .unwrap_err();
        assert!(matches!(err, QuestionError::DuplicateAnswerId { .. }));
    }

    #[test]
    fn deserializing_revalidates() {
        let q = draft(vec![answer(1, true)]).validate().unwrap();
        let mut json = serde_json::to_value(&q).unwrap();
        json["answers"][0]["is_correct"] = serde_json::Value::Bool(false);
        assert!(serde_json::from_value::<Question>(json).is_err());
    }
}

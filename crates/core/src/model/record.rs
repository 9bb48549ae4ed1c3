use serde::{Deserialize, Serialize};

use crate::model::{AnswerId, QuestionId};

/// How a question got resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    User,
    /// The countdown ran out and the correct answer was revealed on the user's behalf.
    Timeout,
}

/// The resolution of a single question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    pub answer_id: AnswerId,
    pub is_correct: bool,
    pub source: AnswerSource,
}

/// Aggregate outcome of a quiz run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizSummary {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
    pub timed_out: usize,
    pub skipped: usize,
}

impl QuizSummary {
    /// Tally `records` against the number of questions the quiz started with.
    ///
    /// Timed-out questions count as resolved but never as correct.
    #[must_use]
    pub fn from_records(total: usize, records: &[AnswerRecord]) -> Self {
        let answered = records
            .iter()
            .filter(|r| r.source == AnswerSource::User)
            .count();
        let timed_out = records.len() - answered;
        let correct = records
            .iter()
            .filter(|r| r.source == AnswerSource::User && r.is_correct)
            .count();
        Self {
            total,
            answered,
            correct,
            timed_out,
            skipped: total.saturating_sub(records.len()),
        }
    }
}

/// How the server scored one question of a submitted quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub correct_answer_id: AnswerId,
    /// `None` when the question timed out or was never reached.
    pub user_answer_id: Option<AnswerId>,
}

impl QuestionResult {
    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.user_answer_id == Some(self.correct_answer_id)
    }
}

/// Scored result of a submitted quiz, used for the collective reveal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuizResult {
    pub correct: usize,
    pub wrong: usize,
    pub unanswered: usize,
    pub questions: Vec<QuestionResult>,
}

impl QuizResult {
    #[must_use]
    pub fn from_questions(questions: Vec<QuestionResult>) -> Self {
        let unanswered = questions
            .iter()
            .filter(|q| q.user_answer_id.is_none())
            .count();
        let correct = questions.iter().filter(|q| q.is_correct()).count();
        Self {
            correct,
            wrong: questions.len() - correct - unanswered,
            unanswered,
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(q: u64, correct: bool, source: AnswerSource) -> AnswerRecord {
        AnswerRecord {
            question_id: QuestionId::new(q),
            answer_id: AnswerId::new(q * 10),
            is_correct: correct,
            source,
        }
    }

    #[test]
    fn summary_counts_each_resolution_kind() {
        let records = [
            record(1, true, AnswerSource::User),
            record(2, false, AnswerSource::User),
            record(3, true, AnswerSource::Timeout),
        ];
        let summary = QuizSummary::from_records(4, &records);
        assert_eq!(
            summary,
            QuizSummary {
                total: 4,
                answered: 2,
                correct: 1,
                timed_out: 1,
                skipped: 1,
            }
        );
    }

    #[test]
    fn empty_quiz_has_empty_summary() {
        assert_eq!(QuizSummary::from_records(0, &[]), QuizSummary::default());
    }

    #[test]
    fn result_counts_follow_question_outcomes() {
        let outcome = |q: u64, user: Option<u64>| QuestionResult {
            question_id: QuestionId::new(q),
            correct_answer_id: AnswerId::new(q * 10),
            user_answer_id: user.map(AnswerId::new),
        };
        let result = QuizResult::from_questions(vec![
            outcome(1, Some(10)),
            outcome(2, Some(21)),
            outcome(3, None),
        ]);
        assert_eq!((result.correct, result.wrong, result.unanswered), (1, 1, 1));
        assert!(result.questions[0].is_correct());
        assert!(!result.questions[2].is_correct());
    }
}

use serde::{Deserialize, Serialize};

use crate::model::{Question, QuizId};

/// When correctness feedback is shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPolicy {
    /// Reveal after every answer ("step by step").
    Immediate,
    /// Reveal collectively once the quiz is over.
    #[default]
    Deferred,
}

impl RevealPolicy {
    /// Interprets the server's display setting.
    ///
    /// Only the step-by-step value selects `Immediate`; everything else defers.
    #[must_use]
    pub fn from_wire(value: &str) -> Self {
        let normalized: String = value
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();
        if normalized == "step_by_step" {
            RevealPolicy::Immediate
        } else {
            RevealPolicy::Deferred
        }
    }
}

/// Everything the data provider returns for one quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizDetail {
    pub quiz_id: QuizId,
    pub policy: RevealPolicy,
    pub questions: Vec<Question>,
}

impl QuizDetail {
    #[must_use]
    pub fn new(quiz_id: QuizId, policy: RevealPolicy, questions: Vec<Question>) -> Self {
        Self {
            quiz_id,
            policy,
            questions,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_by_step_variants_are_immediate() {
        assert_eq!(RevealPolicy::from_wire("step_by_step"), RevealPolicy::Immediate);
        assert_eq!(RevealPolicy::from_wire("STEP-BY-STEP"), RevealPolicy::Immediate);
        assert_eq!(RevealPolicy::from_wire(" step by step "), RevealPolicy::Immediate);
    }

    #[test]
    fn anything_else_defers() {
        assert_eq!(RevealPolicy::from_wire("end_of_quiz"), RevealPolicy::Deferred);
        assert_eq!(RevealPolicy::from_wire(""), RevealPolicy::Deferred);
    }
}

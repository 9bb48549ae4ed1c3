//! JSON shapes exchanged with the quiz server.

use serde::{Deserialize, Serialize};

use quiz_core::model::{
    Answer, AnswerId, AnswerRecord, AnswerSource, Content, QuestionDraft, QuestionId,
    QuestionResult, QuizDetail, QuizId, QuizResult, RevealPolicy,
};

use crate::error::ProviderError;

#[derive(Debug, Deserialize)]
pub(crate) struct QuizDetailResponse {
    #[serde(default)]
    details: DetailsDto,
    #[serde(default)]
    questions: Vec<QuestionDto>,
}

#[derive(Debug, Default, Deserialize)]
struct DetailsDto {
    #[serde(default)]
    how_display_correct_answer: String,
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    period_time: u32,
    #[serde(default)]
    quiz_description: DescriptionDto,
    #[serde(default)]
    answers: Vec<AnswerDto>,
}

#[derive(Debug, Default, Deserialize)]
struct DescriptionDto {
    #[serde(default)]
    format: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url_content: String,
}

#[derive(Debug, Deserialize)]
struct AnswerDto {
    id: u64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    is_correct: i64,
    #[serde(default)]
    description: DescriptionDto,
}

#[derive(Debug, Serialize)]
struct UserAnswerDto {
    question_id: u64,
    answer_id: u64,
}

#[derive(Debug, Deserialize)]
struct QuizResultResponse {
    #[serde(default)]
    questions: Vec<QuestionResultDto>,
}

#[derive(Debug, Deserialize)]
struct QuestionResultDto {
    question_id: u64,
    correct_answer_id: u64,
    #[serde(default)]
    user_answer_id: Option<u64>,
}

impl QuizDetailResponse {
    pub(crate) fn into_detail(self, quiz_id: QuizId) -> Result<QuizDetail, ProviderError> {
        let policy = RevealPolicy::from_wire(&self.details.how_display_correct_answer);
        let questions = self
            .questions
            .into_iter()
            .map(|dto| dto.into_draft().validate())
            .collect::<Result<Vec<_>, _>>()?;
        Ok(QuizDetail::new(quiz_id, policy, questions))
    }
}

/// Content the client cannot use is shown blank instead of dropping the quiz.
fn content_or_blank(desc: &DescriptionDto, text: &str, question: u64, role: &str) -> Content {
    match Content::from_parts(&desc.format, text, &desc.url_content) {
        Ok(content) => content,
        Err(err) => {
            log::warn!("question {question}: {role} shown blank: {err}");
            Content::blank()
        }
    }
}

impl QuestionDto {
    fn into_draft(self) -> QuestionDraft {
        let question = self.id;
        // Text questions display their title.
        let content = content_or_blank(&self.quiz_description, &self.title, question, "description");

        let answers = self
            .answers
            .into_iter()
            .map(|a| {
                let role = format!("answer {}", a.id);
                let reveal =
                    content_or_blank(&a.description, &a.description.content, question, &role);
                Answer::new(AnswerId::new(a.id), a.title, a.is_correct == 1, reveal)
            })
            .collect();

        QuestionDraft {
            id: QuestionId::new(question),
            title: self.title,
            content,
            duration_secs: self.period_time,
            answers,
        }
    }
}

/// Decode a quiz detail body, validating every question.
///
/// # Errors
///
/// Returns `ProviderError::Decode` for malformed JSON and
/// `ProviderError::InvalidQuestion` when a question's answers are unusable.
pub fn parse_quiz_detail(quiz_id: QuizId, body: &str) -> Result<QuizDetail, ProviderError> {
    let response: QuizDetailResponse = serde_json::from_str(body)?;
    response.into_detail(quiz_id)
}

/// Encode answers for the `user_answers` form field.
///
/// Timed-out questions are left out, so the server scores them as unanswered.
///
/// # Errors
///
/// Returns `ProviderError::Decode` if serialization fails.
pub fn encode_user_answers(answers: &[AnswerRecord]) -> Result<String, ProviderError> {
    let dtos: Vec<UserAnswerDto> = answers
        .iter()
        .filter(|r| r.source == AnswerSource::User)
        .map(|r| UserAnswerDto {
            question_id: r.question_id.value(),
            answer_id: r.answer_id.value(),
        })
        .collect();
    Ok(serde_json::to_string(&dtos)?)
}

/// Decode the scored result of a submitted quiz.
///
/// # Errors
///
/// Returns `ProviderError::Decode` for malformed JSON.
pub fn parse_quiz_result(body: &str) -> Result<QuizResult, ProviderError> {
    let response: QuizResultResponse = serde_json::from_str(body)?;
    let questions = response
        .questions
        .into_iter()
        .map(|q| QuestionResult {
            question_id: QuestionId::new(q.question_id),
            correct_answer_id: AnswerId::new(q.correct_answer_id),
            user_answer_id: q.user_answer_id.map(AnswerId::new),
        })
        .collect();
    Ok(QuizResult::from_questions(questions))
}

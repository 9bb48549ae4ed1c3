mod answer;
pub mod content;
mod ids;
mod question;
mod quiz;
mod record;

pub use content::{Content, ContentError, Format, MediaError, MediaUri};
pub use ids::{AnswerId, ParseIdError, QuestionId, QuizId};

pub use answer::Answer;
pub use question::{Question, QuestionDraft, QuestionError};
pub use quiz::{QuizDetail, RevealPolicy};
pub use record::{AnswerRecord, AnswerSource, QuestionResult, QuizResult, QuizSummary};

use quiz_core::model::{Question, QuizId, RevealPolicy};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn quiz_id_to_i64(id: QuizId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("quiz_id overflow".into()))
}

pub(crate) fn quiz_id_from_i64(v: i64) -> Result<QuizId, StorageError> {
    u64::try_from(v)
        .map(QuizId::new)
        .map_err(|_| StorageError::Serialization("quiz_id sign overflow".into()))
}

pub(crate) fn policy_to_str(policy: RevealPolicy) -> &'static str {
    match policy {
        RevealPolicy::Immediate => "immediate",
        RevealPolicy::Deferred => "deferred",
    }
}

pub(crate) fn parse_policy(s: &str) -> Result<RevealPolicy, StorageError> {
    match s {
        "immediate" => Ok(RevealPolicy::Immediate),
        "deferred" => Ok(RevealPolicy::Deferred),
        other => Err(StorageError::Serialization(format!(
            "unknown reveal_policy: {other}"
        ))),
    }
}

/// Questions are stored as one JSON array; decoding re-validates every question.
pub(crate) fn encode_questions(questions: &[Question]) -> Result<String, StorageError> {
    serde_json::to_string(questions).map_err(ser)
}

pub(crate) fn decode_questions(payload: &str) -> Result<Vec<Question>, StorageError> {
    serde_json::from_str(payload).map_err(ser)
}

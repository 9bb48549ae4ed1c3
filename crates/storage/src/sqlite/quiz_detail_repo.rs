use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{QuizDetail, QuizId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{
    decode_questions, encode_questions, parse_policy, policy_to_str, quiz_id_from_i64,
    quiz_id_to_i64, ser,
};
use crate::repository::{QuizDetailRecord, QuizDetailRepository, StorageError};

#[async_trait]
impl QuizDetailRepository for SqliteRepository {
    async fn save_detail(&self, record: &QuizDetailRecord) -> Result<(), StorageError> {
        let detail = &record.detail;
        let question_count = i64::try_from(detail.questions.len())
            .map_err(|_| StorageError::Serialization("question_count overflow".into()))?;

        sqlx::query(
            r"
            INSERT INTO quiz_details (quiz_id, reveal_policy, question_count, payload, fetched_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(quiz_id) DO UPDATE SET
                reveal_policy = excluded.reveal_policy,
                question_count = excluded.question_count,
                payload = excluded.payload,
                fetched_at = excluded.fetched_at
            ",
        )
        .bind(quiz_id_to_i64(detail.quiz_id)?)
        .bind(policy_to_str(detail.policy))
        .bind(question_count)
        .bind(encode_questions(&detail.questions)?)
        .bind(record.fetched_at)
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn get_detail(&self, quiz_id: QuizId) -> Result<Option<QuizDetailRecord>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT quiz_id, reveal_policy, question_count, payload, fetched_at
            FROM quiz_details WHERE quiz_id = ?1
            ",
        )
        .bind(quiz_id_to_i64(quiz_id)?)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let quiz_id = quiz_id_from_i64(row.try_get("quiz_id").map_err(ser)?)?;
        let policy = parse_policy(&row.try_get::<String, _>("reveal_policy").map_err(ser)?)?;
        let questions = decode_questions(&row.try_get::<String, _>("payload").map_err(ser)?)?;
        let question_count: i64 = row.try_get("question_count").map_err(ser)?;
        if usize::try_from(question_count).ok() != Some(questions.len()) {
            return Err(StorageError::Serialization(format!(
                "question_count {question_count} does not match payload ({})",
                questions.len()
            )));
        }
        let fetched_at: DateTime<Utc> = row.try_get("fetched_at").map_err(ser)?;

        Ok(Some(QuizDetailRecord::new(
            QuizDetail::new(quiz_id, policy, questions),
            fetched_at,
        )))
    }

    async fn delete_detail(&self, quiz_id: QuizId) -> Result<bool, StorageError> {
        let res = sqlx::query("DELETE FROM quiz_details WHERE quiz_id = ?1")
            .bind(quiz_id_to_i64(quiz_id)?)
            .execute(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(res.rows_affected() > 0)
    }
}

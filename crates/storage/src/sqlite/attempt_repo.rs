use practice_core::model::{AttemptRecord, SessionId};

use super::SqliteRepository;
use super::mapping::{conn, id_i64, map_attempt_row};
use crate::repository::{AttemptLog, AttemptRow, StorageError};

impl SqliteRepository {
    /// Attempts recorded under `session_id`, in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails or a row cannot be mapped.
    pub async fn attempts_in_session(
        &self,
        session_id: SessionId,
    ) -> Result<Vec<AttemptRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    session_id, user_id, skill_id, template_id, difficulty_level,
                    question_text, correct_answer, student_answer, is_correct,
                    solution_text, time_spent_seconds
                FROM attempts
                WHERE session_id = ?1
                ORDER BY id ASC
            ",
        )
        .bind(id_i64("session_id", session_id.value())?)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_attempt_row).collect()
    }
}

#[async_trait::async_trait]
impl AttemptLog for SqliteRepository {
    async fn record_attempt(
        &self,
        session_id: Option<SessionId>,
        attempt: &AttemptRecord,
    ) -> Result<(), StorageError> {
        let session_id = session_id
            .map(|id| id_i64("session_id", id.value()))
            .transpose()?;

        sqlx::query(
            r"
                INSERT INTO attempts (
                    session_id, user_id, skill_id, template_id, difficulty_level,
                    question_text, correct_answer, student_answer, is_correct,
                    solution_text, time_spent_seconds
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ",
        )
        .bind(session_id)
        .bind(id_i64("user_id", attempt.user_id().value())?)
        .bind(id_i64("skill_id", attempt.skill_id().value())?)
        .bind(attempt.template_id().map(|t| t.as_str()))
        .bind(attempt.difficulty().as_str())
        .bind(attempt.question_text())
        .bind(attempt.correct_answer())
        .bind(attempt.student_answer())
        .bind(i64::from(attempt.is_correct()))
        .bind(attempt.solution_text())
        .bind(i64::from(attempt.time_spent_seconds()))
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => StorageError::NotFound,
            other => conn(other),
        })?;

        Ok(())
    }
}

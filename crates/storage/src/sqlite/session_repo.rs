use chrono::Utc;
use practice_core::model::{SessionId, SkillId, UserId};
use sqlx::Row;

use super::SqliteRepository;
use super::mapping::{conn, id_i64, ser, session_id_from_i64, skill_id_from_i64, user_id_from_i64};
use crate::repository::{SessionRegistry, SessionRow, StorageError};

impl SqliteRepository {
    /// Fetch one session row.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if missing, or other storage errors.
    pub async fn session(&self, session_id: SessionId) -> Result<SessionRow, StorageError> {
        let row = sqlx::query(
            r"
                SELECT id, user_id, skill_id, started_at, finished_at
                FROM practice_sessions
                WHERE id = ?1
            ",
        )
        .bind(id_i64("session_id", session_id.value())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?
        .ok_or(StorageError::NotFound)?;

        Ok(SessionRow {
            id: session_id_from_i64(row.try_get("id").map_err(ser)?)?,
            user_id: user_id_from_i64(row.try_get("user_id").map_err(ser)?)?,
            skill_id: skill_id_from_i64(row.try_get("skill_id").map_err(ser)?)?,
            started_at: row.try_get("started_at").map_err(ser)?,
            finished_at: row.try_get("finished_at").map_err(ser)?,
        })
    }
}

#[async_trait::async_trait]
impl SessionRegistry for SqliteRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> Result<SessionId, StorageError> {
        let res = sqlx::query(
            r"
                INSERT INTO practice_sessions (user_id, skill_id, started_at)
                VALUES (?1, ?2, ?3)
            ",
        )
        .bind(id_i64("user_id", user_id.value())?)
        .bind(id_i64("skill_id", skill_id.value())?)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        session_id_from_i64(res.last_insert_rowid())
    }

    async fn finish_session(&self, session_id: SessionId) -> Result<(), StorageError> {
        let id = id_i64("session_id", session_id.value())?;
        let res = sqlx::query(
            r"
                UPDATE practice_sessions
                SET finished_at = ?1
                WHERE id = ?2 AND finished_at IS NULL
            ",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        if res.rows_affected() == 1 {
            return Ok(());
        }
        // distinguish a missing session from a repeated finish
        match self.session(session_id).await {
            Ok(_) => Err(StorageError::Conflict),
            Err(err) => Err(err),
        }
    }
}

use practice_core::model::{REPORT_TYPE, Report, SkillId};

use super::SqliteRepository;
use super::mapping::{conn, id_i64, map_report_row};
use crate::repository::{ReportRow, ReportStore, StorageError};

impl SqliteRepository {
    /// Most recent reports for a skill, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the query fails or a row cannot be mapped.
    pub async fn recent_reports(
        &self,
        skill_id: SkillId,
        limit: u32,
    ) -> Result<Vec<ReportRow>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT
                    user_id, skill_id, title, score, total_questions,
                    correct_answers, timestamp, time_taken_seconds
                FROM reports
                WHERE skill_id = ?1
                ORDER BY timestamp DESC, id DESC
                LIMIT ?2
            ",
        )
        .bind(id_i64("skill_id", skill_id.value())?)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter().map(map_report_row).collect()
    }
}

#[async_trait::async_trait]
impl ReportStore for SqliteRepository {
    async fn create_report(&self, report: &Report) -> Result<(), StorageError> {
        let user_id = report
            .user_id()
            .map(|id| id_i64("user_id", id.value()))
            .transpose()?;
        let time_taken = i64::try_from(report.time_taken_seconds())
            .map_err(|_| StorageError::Serialization("time_taken_seconds overflow".into()))?;

        sqlx::query(
            r"
                INSERT INTO reports (
                    user_id, skill_id, title, type, score, total_questions,
                    correct_answers, timestamp, time_taken_seconds
                )
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ",
        )
        .bind(user_id)
        .bind(id_i64("skill_id", report.skill_id().value())?)
        .bind(report.title())
        .bind(REPORT_TYPE)
        .bind(report.score())
        .bind(i64::from(report.total_questions()))
        .bind(i64::from(report.correct_answers()))
        .bind(report.timestamp())
        .bind(time_taken)
        .execute(&self.pool)
        .await
        .map_err(conn)?;

        Ok(())
    }
}

use practice_core::model::{SessionId, SkillId, UserId};
use sqlx::Row;

use crate::repository::{AttemptRow, ReportRow, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn id_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u32_from_i64(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("invalid {field}: {v}")))
}

pub(crate) fn session_id_from_i64(v: i64) -> Result<SessionId, StorageError> {
    Ok(SessionId::new(i64_to_u64("session_id", v)?))
}

pub(crate) fn user_id_from_i64(v: i64) -> Result<UserId, StorageError> {
    Ok(UserId::new(i64_to_u64("user_id", v)?))
}

pub(crate) fn skill_id_from_i64(v: i64) -> Result<SkillId, StorageError> {
    Ok(SkillId::new(i64_to_u64("skill_id", v)?))
}

pub(crate) fn map_attempt_row(row: &sqlx::sqlite::SqliteRow) -> Result<AttemptRow, StorageError> {
    Ok(AttemptRow {
        session_id: row
            .try_get::<Option<i64>, _>("session_id")
            .map_err(ser)?
            .map(session_id_from_i64)
            .transpose()?,
        user_id: user_id_from_i64(row.try_get("user_id").map_err(ser)?)?,
        skill_id: skill_id_from_i64(row.try_get("skill_id").map_err(ser)?)?,
        template_id: row.try_get("template_id").map_err(ser)?,
        difficulty_level: row.try_get("difficulty_level").map_err(ser)?,
        question_text: row.try_get("question_text").map_err(ser)?,
        correct_answer: row.try_get("correct_answer").map_err(ser)?,
        student_answer: row.try_get("student_answer").map_err(ser)?,
        is_correct: row.try_get::<i64, _>("is_correct").map_err(ser)? != 0,
        solution_text: row.try_get("solution_text").map_err(ser)?,
        time_spent_seconds: u32_from_i64(
            "time_spent_seconds",
            row.try_get("time_spent_seconds").map_err(ser)?,
        )?,
    })
}

pub(crate) fn map_report_row(row: &sqlx::sqlite::SqliteRow) -> Result<ReportRow, StorageError> {
    Ok(ReportRow {
        user_id: row
            .try_get::<Option<i64>, _>("user_id")
            .map_err(ser)?
            .map(user_id_from_i64)
            .transpose()?,
        skill_id: skill_id_from_i64(row.try_get("skill_id").map_err(ser)?)?,
        title: row.try_get("title").map_err(ser)?,
        score: row.try_get("score").map_err(ser)?,
        total_questions: u32_from_i64(
            "total_questions",
            row.try_get("total_questions").map_err(ser)?,
        )?,
        correct_answers: u32_from_i64(
            "correct_answers",
            row.try_get("correct_answers").map_err(ser)?,
        )?,
        timestamp: row.try_get("timestamp").map_err(ser)?,
        time_taken_seconds: i64_to_u64(
            "time_taken_seconds",
            row.try_get("time_taken_seconds").map_err(ser)?,
        )?,
    })
}

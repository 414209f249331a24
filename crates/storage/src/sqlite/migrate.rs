use chrono::Utc;
use sqlx::SqlitePool;

use super::SqliteInitError;

const SCHEMA_V1: &[&str] = &[
    r"
        CREATE TABLE IF NOT EXISTS practice_sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            skill_id INTEGER NOT NULL,
            started_at TEXT NOT NULL,
            finished_at TEXT
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS attempts (
            id INTEGER PRIMARY KEY,
            session_id INTEGER,
            user_id INTEGER NOT NULL,
            skill_id INTEGER NOT NULL,
            template_id TEXT,
            difficulty_level TEXT NOT NULL CHECK (difficulty_level IN ('Easy', 'Medium', 'Hard')),
            question_text TEXT NOT NULL,
            correct_answer TEXT NOT NULL,
            student_answer TEXT NOT NULL,
            is_correct INTEGER NOT NULL CHECK (is_correct IN (0, 1)),
            solution_text TEXT NOT NULL,
            time_spent_seconds INTEGER NOT NULL CHECK (time_spent_seconds >= 0),
            FOREIGN KEY (session_id) REFERENCES practice_sessions(id) ON DELETE SET NULL
        );
    ",
    r"
        CREATE TABLE IF NOT EXISTS reports (
            id INTEGER PRIMARY KEY,
            user_id INTEGER,
            skill_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            type TEXT NOT NULL,
            score REAL NOT NULL CHECK (score >= 0 AND score <= 100),
            total_questions INTEGER NOT NULL CHECK (total_questions > 0),
            correct_answers INTEGER NOT NULL CHECK (correct_answers >= 0),
            timestamp TEXT NOT NULL,
            time_taken_seconds INTEGER NOT NULL CHECK (time_taken_seconds >= 0)
        );
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_attempts_session
            ON attempts (session_id, id);
    ",
    r"
        CREATE INDEX IF NOT EXISTS idx_reports_skill_timestamp
            ON reports (skill_id, timestamp);
    ",
];

/// Applies the practice log schema once, tracked in `schema_migrations`.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), SqliteInitError> {
    async fn is_applied(pool: &SqlitePool, version: i64) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM schema_migrations WHERE version = ?1")
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.is_some())
    }

    sqlx::query(
        r"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL
            );
            ",
    )
    .execute(pool)
    .await?;

    if is_applied(pool, 1).await? {
        return Ok(());
    }

    let mut tx = pool.begin().await?;
    for &statement in SCHEMA_V1 {
        sqlx::query(statement).execute(&mut *tx).await?;
    }
    sqlx::query(
        r"
            INSERT INTO schema_migrations (version, applied_at)
            VALUES (?1, ?2)
            ON CONFLICT(version) DO NOTHING
        ",
    )
    .bind(1_i64)
    .bind(Utc::now())
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    Ok(())
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use practice_core::model::{AttemptRecord, Report, SessionId, SkillId, UserId};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The backend answered but refused the request.
    #[error("rejected by backend ({status}): {message}")]
    Rejected { status: u16, message: String },
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Opens and closes practice sessions on the backend.
#[async_trait]
pub trait SessionRegistry: Send + Sync {
    /// Open a session for `user_id` practicing `skill_id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot allocate a session.
    async fn create_session(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> Result<SessionId, StorageError>;

    /// Mark a session finished.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` for an unknown session and
    /// `StorageError::Conflict` if it was already finished.
    async fn finish_session(&self, session_id: SessionId) -> Result<(), StorageError>;
}

/// Append-only log of submitted and skipped answers.
#[async_trait]
pub trait AttemptLog: Send + Sync {
    /// Store one attempt. `session_id` is `None` when the session could not be
    /// opened; the attempt is still recorded.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the attempt cannot be stored.
    async fn record_attempt(
        &self,
        session_id: Option<SessionId>,
        attempt: &AttemptRecord,
    ) -> Result<(), StorageError>;
}

#[async_trait]
pub trait ReportStore: Send + Sync {
    /// Store a finished session's report.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the report cannot be stored.
    async fn create_report(&self, report: &Report) -> Result<(), StorageError>;
}

//
// ─── PERSISTED SHAPES ──────────────────────────────────────────────────────────
//

/// A session as the storage layer sees it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRow {
    pub id: SessionId,
    pub user_id: UserId,
    pub skill_id: SkillId,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl SessionRow {
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

/// An attempt together with the session it was delivered under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredAttempt {
    pub session_id: Option<SessionId>,
    pub record: AttemptRecord,
}

/// Flattened attempt as read back from a database.
///
/// Template ids are static in the domain, so the persisted form keeps the
/// plain string instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRow {
    pub session_id: Option<SessionId>,
    pub user_id: UserId,
    pub skill_id: SkillId,
    pub template_id: Option<String>,
    pub difficulty_level: String,
    pub question_text: String,
    pub correct_answer: String,
    pub student_answer: String,
    pub is_correct: bool,
    pub solution_text: String,
    pub time_spent_seconds: u32,
}

/// Flattened report as read back from a database.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    pub user_id: Option<UserId>,
    pub skill_id: SkillId,
    pub title: String,
    pub score: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub timestamp: DateTime<Utc>,
    pub time_taken_seconds: u64,
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

#[derive(Default)]
struct MemoryState {
    next_session: u64,
    sessions: BTreeMap<SessionId, SessionRow>,
    attempts: Vec<StoredAttempt>,
    reports: Vec<Report>,
}

/// Simple in-memory repository implementation for testing and offline runs.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<MemoryState>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, StorageError> {
        self.state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))
    }

    /// Snapshot of every session opened so far, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the state lock is poisoned.
    pub fn sessions(&self) -> Result<Vec<SessionRow>, StorageError> {
        Ok(self.lock()?.sessions.values().cloned().collect())
    }

    /// Snapshot of stored attempts in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the state lock is poisoned.
    pub fn attempts(&self) -> Result<Vec<StoredAttempt>, StorageError> {
        Ok(self.lock()?.attempts.clone())
    }

    /// Snapshot of stored reports in arrival order.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the state lock is poisoned.
    pub fn reports(&self) -> Result<Vec<Report>, StorageError> {
        Ok(self.lock()?.reports.clone())
    }
}

#[async_trait]
impl SessionRegistry for InMemoryRepository {
    async fn create_session(
        &self,
        user_id: UserId,
        skill_id: SkillId,
    ) -> Result<SessionId, StorageError> {
        let mut guard = self.lock()?;
        guard.next_session += 1;
        let id = SessionId::new(guard.next_session);
        guard.sessions.insert(
            id,
            SessionRow {
                id,
                user_id,
                skill_id,
                started_at: Utc::now(),
                finished_at: None,
            },
        );
        Ok(id)
    }

    async fn finish_session(&self, session_id: SessionId) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        let row = guard
            .sessions
            .get_mut(&session_id)
            .ok_or(StorageError::NotFound)?;
        if row.is_finished() {
            return Err(StorageError::Conflict);
        }
        row.finished_at = Some(Utc::now());
        Ok(())
    }
}

#[async_trait]
impl AttemptLog for InMemoryRepository {
    async fn record_attempt(
        &self,
        session_id: Option<SessionId>,
        attempt: &AttemptRecord,
    ) -> Result<(), StorageError> {
        let mut guard = self.lock()?;
        if let Some(id) = session_id {
            if !guard.sessions.contains_key(&id) {
                return Err(StorageError::NotFound);
            }
        }
        guard.attempts.push(StoredAttempt {
            session_id,
            record: attempt.clone(),
        });
        Ok(())
    }
}

#[async_trait]
impl ReportStore for InMemoryRepository {
    async fn create_report(&self, report: &Report) -> Result<(), StorageError> {
        self.lock()?.reports.push(report.clone());
        Ok(())
    }
}

//
// ─── AGGREGATE ─────────────────────────────────────────────────────────────────
//

/// Aggregates the persistence contracts behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionRegistry>,
    pub attempts: Arc<dyn AttemptLog>,
    pub reports: Arc<dyn ReportStore>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_backend(InMemoryRepository::new())
    }

    /// Use one value for all three contracts.
    #[must_use]
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: SessionRegistry + AttemptLog + ReportStore + 'static,
    {
        let backend = Arc::new(backend);
        let sessions: Arc<dyn SessionRegistry> = backend.clone();
        let attempts: Arc<dyn AttemptLog> = backend.clone();
        let reports: Arc<dyn ReportStore> = backend;
        Self {
            sessions,
            attempts,
            reports,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use practice_core::model::{Difficulty, QuestionInstance, TemplateId};
    use practice_core::templates::Params;
    use practice_core::time::fixed_now;

    fn question() -> QuestionInstance {
        QuestionInstance::new(
            TemplateId::new("test.sum"),
            Difficulty::Easy,
            Params::new([2, 3, 0, 0]),
            "What is $2 + 3$?",
            "5",
            vec!["5".into(), "6".into(), "1".into(), "4".into()],
            "$2 + 3 = 5$",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn sessions_get_increasing_ids_and_finish_once() {
        let repo = InMemoryRepository::new();
        let a = repo
            .create_session(UserId::new(1), SkillId::new(1054))
            .await
            .unwrap();
        let b = repo
            .create_session(UserId::new(1), SkillId::new(1054))
            .await
            .unwrap();
        assert!(b > a);

        repo.finish_session(a).await.unwrap();
        assert!(matches!(
            repo.finish_session(a).await,
            Err(StorageError::Conflict)
        ));
        assert!(matches!(
            repo.finish_session(SessionId::new(99)).await,
            Err(StorageError::NotFound)
        ));

        let rows = repo.sessions().unwrap();
        assert!(rows[0].is_finished());
        assert!(!rows[1].is_finished());
    }

    #[tokio::test]
    async fn attempts_without_session_are_kept() {
        let repo = InMemoryRepository::new();
        let record = AttemptRecord::answered(UserId::new(1), SkillId::new(9), &question(), "6", 4);
        repo.record_attempt(None, &record).await.unwrap();

        let stored = repo.attempts().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].session_id, None);
        assert!(!stored[0].record.is_correct());
    }

    #[tokio::test]
    async fn attempts_for_unknown_session_are_rejected() {
        let repo = InMemoryRepository::new();
        let record = AttemptRecord::skipped(UserId::new(1), SkillId::new(9), &question(), 0);
        assert!(matches!(
            repo.record_attempt(Some(SessionId::new(5)), &record).await,
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn storage_shares_one_backend() {
        let repo = InMemoryRepository::new();
        let storage = Storage::from_backend(repo.clone());
        let report = Report::from_counts(
            Some(UserId::new(1)),
            SkillId::new(9),
            "Addition",
            10,
            7,
            fixed_now(),
            60,
        )
        .unwrap();
        storage.reports.create_report(&report).await.unwrap();
        assert_eq!(repo.reports().unwrap(), vec![report]);
    }
}

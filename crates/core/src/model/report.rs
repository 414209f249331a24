use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{SkillId, UserId};

/// Report `type` understood by the backend for both practice and tests.
pub const REPORT_TYPE: &str = "practice";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ReportError {
    #[error("a session must contain at least one question")]
    EmptySession,

    #[error("correct answers ({correct}) exceed total questions ({total})")]
    CountMismatch { correct: u32, total: u32 },
}

/// Summary of a finished session. Built once; never modified afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    user_id: Option<UserId>,
    skill_id: SkillId,
    skill_name: String,
    total_questions: u32,
    correct_answers: u32,
    score: f64,
    timestamp: DateTime<Utc>,
    time_taken_seconds: u64,
}

impl Report {
    /// Build a report from final counts.
    ///
    /// `total_questions` is the configured session length, not the number of
    /// attempts made, so unanswered questions lower the score.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::EmptySession` when `total_questions` is zero and
    /// `ReportError::CountMismatch` when more answers are correct than asked.
    pub fn from_counts(
        user_id: Option<UserId>,
        skill_id: SkillId,
        skill_name: impl Into<String>,
        total_questions: u32,
        correct_answers: u32,
        timestamp: DateTime<Utc>,
        time_taken_seconds: u64,
    ) -> Result<Self, ReportError> {
        if total_questions == 0 {
            return Err(ReportError::EmptySession);
        }
        if correct_answers > total_questions {
            return Err(ReportError::CountMismatch {
                correct: correct_answers,
                total: total_questions,
            });
        }
        let score = f64::from(correct_answers) * 100.0 / f64::from(total_questions);

        Ok(Self {
            user_id,
            skill_id,
            skill_name: skill_name.into(),
            total_questions,
            correct_answers,
            score,
            timestamp,
            time_taken_seconds,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.user_id
    }

    #[must_use]
    pub fn skill_id(&self) -> SkillId {
        self.skill_id
    }

    #[must_use]
    pub fn skill_name(&self) -> &str {
        &self.skill_name
    }

    /// Report title; the backend lists reports by skill name.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.skill_name
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    /// Percentage in `0.0..=100.0`.
    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    #[must_use]
    pub fn time_taken_seconds(&self) -> u64 {
        self.time_taken_seconds
    }
}

//! Shared error types for the services crate.

use thiserror::Error;

use practice_core::model::{ReportError, SkillId};
use practice_core::templates::GenerationError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `SessionController`.
///
/// None of these come from persistence: backend failures are logged inside
/// the dispatch layer and never reach the state machine.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session already started")]
    AlreadyStarted,
    #[error("session already finished")]
    Finished,
    #[error("review screen is open; choose a question to revisit first")]
    InReview,
    #[error("no review is pending")]
    NotInReview,
    #[error("no option selected")]
    NothingSelected,
    #[error("question already answered")]
    AlreadyAnswered,
    #[error("answer the current question before moving on")]
    NotAnswered,
    #[error("{0:?} is not one of the options")]
    UnknownOption(String),
    #[error("skipping is only available in assessments")]
    SkipUnsupported,
    #[error("question {index} is outside a session of {total}")]
    IndexOutOfRange { index: usize, total: usize },
    #[error("skill {0} has no question templates")]
    NoTemplates(SkillId),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("{var} is not a valid URL: {source}")]
    InvalidUrl {
        var: &'static str,
        #[source]
        source: url::ParseError,
    },
    #[error("{var} must be an http or https URL, got {scheme}")]
    UnsupportedScheme { var: &'static str, scheme: String },
    #[error("{var} is not a valid number: {value:?}")]
    InvalidNumber { var: &'static str, value: String },
    #[error("{var} must be greater than zero")]
    Zero { var: &'static str },
}

/// Errors emitted while wiring persistence for a run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}

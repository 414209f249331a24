#![forbid(unsafe_code)]

//! Session orchestration for generated math practice.
//!
//! `SessionController` drives one run; `persistence` delivers its sessions,
//! attempts and reports in the background; `PracticeServices` wires both to
//! the configured backend.

pub mod config;
pub mod error;
pub mod persistence;
pub mod practice_services;
pub mod sessions;

pub use practice_core::Clock;

pub use config::{BackendChoice, Identity, PracticeConfig};
pub use error::{ConfigError, PracticeServicesError, SessionError};
pub use persistence::{AttemptRecorder, Dispatcher, HttpBackend, ReportAggregator};
pub use practice_services::PracticeServices;
pub use sessions::{
    Advance, AnswerState, SessionController, SessionPhase, SessionProgress, Submission,
};

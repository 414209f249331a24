#![forbid(unsafe_code)]

//! Persistence contracts for practice sessions, attempts and reports, with
//! in-memory and `SQLite` implementations.

pub mod repository;
pub mod sqlite;

pub use repository::{
    AttemptLog, InMemoryRepository, ReportStore, SessionRegistry, Storage, StorageError,
};

#![forbid(unsafe_code)]

//! Domain layer for generated math practice.
//!
//! - `model`: identifiers, question instances, attempts and reports
//! - `templates`: declarative question templates and the generation engine
//! - `catalog`: the skills a learner can practice, each backed by templates
//! - `time`: clock abstraction and the active-time accounting used per question

pub mod catalog;
pub mod model;
pub mod templates;
pub mod time;

pub use catalog::{SessionMode, Skill};
pub use time::{ActiveTimer, Clock};

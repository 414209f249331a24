mod attempt;
mod difficulty;
mod ids;
mod question;
mod report;

pub use attempt::{AttemptRecord, SKIPPED_ANSWER};
pub use difficulty::Difficulty;
pub use ids::{ParseIdError, SessionId, SkillId, TemplateId, UserId};
pub use question::{InstanceError, OPTION_COUNT, QuestionInstance};
pub use report::{REPORT_TYPE, Report, ReportError};

//! Fire-and-forget delivery of sessions, attempts and reports.
//!
//! Nothing in here reports failure back to the caller: every backend error is
//! logged by the [`Dispatcher`] and dropped.

mod dispatch;
mod link;
mod recorder;
mod remote;
mod report;

pub use dispatch::Dispatcher;
pub use link::{LinkResolver, LinkState, SessionLink};
pub use recorder::AttemptRecorder;
pub use remote::{HttpBackend, decode_envelope};
pub use report::{ReportAggregator, SessionOutcome};

mod controller;
mod plan;
mod progress;
mod state;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use controller::{SessionController, Submission};
pub use plan::GenerationPlan;
pub use progress::SessionProgress;
pub use state::{Advance, AnswerState, SessionPhase};

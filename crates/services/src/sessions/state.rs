use std::fmt;

/// Lifecycle of one practice run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionPhase {
    NotStarted,
    Active,
    /// Assessment reached its end with questions left unanswered.
    ReviewPending,
    /// Scored, report not yet built.
    Finished,
    Reported,
}

impl SessionPhase {
    #[must_use]
    pub fn is_over(self) -> bool {
        matches!(self, SessionPhase::Finished | SessionPhase::Reported)
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SessionPhase::NotStarted => "not started",
            SessionPhase::Active => "active",
            SessionPhase::ReviewPending => "review pending",
            SessionPhase::Finished => "finished",
            SessionPhase::Reported => "reported",
        };
        f.write_str(label)
    }
}

/// Where the learner stands on a single question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerState {
    Unanswered,
    Selected(String),
    Submitted { choice: String, correct: bool },
    Skipped,
}

impl AnswerState {
    #[must_use]
    pub fn is_submitted(&self) -> bool {
        matches!(self, AnswerState::Submitted { .. })
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        matches!(self, AnswerState::Submitted { correct: true, .. })
    }
}

/// Where the controller moved after a boundary event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Moved(usize),
    /// The review screen is showing; see `SessionController::review_queue`.
    Review,
    Finished,
}

use super::state::SessionPhase;

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub current: usize,
    pub answered: usize,
    pub skipped: usize,
    pub correct: usize,
    pub phase: SessionPhase,
}

impl SessionProgress {
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.answered + self.skipped)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase.is_over()
    }
}

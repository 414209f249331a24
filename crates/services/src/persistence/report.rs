use std::sync::Arc;

use chrono::{DateTime, Utc};
use practice_core::model::{Report, ReportError, SkillId, UserId};
use practice_core::time::whole_seconds;
use storage::repository::{ReportStore, SessionRegistry, Storage};
use tracing::debug;

use super::dispatch::Dispatcher;
use super::link::SessionLink;

/// Final counts of a run, as handed over by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub user_id: Option<UserId>,
    pub skill_id: SkillId,
    pub skill_name: &'static str,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

/// Builds the end-of-session report and ships it with the finish notice.
#[derive(Clone)]
pub struct ReportAggregator {
    sessions: Arc<dyn SessionRegistry>,
    reports: Arc<dyn ReportStore>,
}

impl ReportAggregator {
    #[must_use]
    pub fn new(storage: &Storage) -> Self {
        Self {
            sessions: Arc::clone(&storage.sessions),
            reports: Arc::clone(&storage.reports),
        }
    }

    /// Score the run. Time taken is the wall-clock span of the session.
    ///
    /// # Errors
    ///
    /// Returns `ReportError` when the counts are inconsistent.
    pub fn build(outcome: &SessionOutcome) -> Result<Report, ReportError> {
        Report::from_counts(
            outcome.user_id,
            outcome.skill_id,
            outcome.skill_name,
            outcome.total_questions,
            outcome.correct_answers,
            outcome.finished_at,
            whole_seconds(outcome.started_at, outcome.finished_at),
        )
    }

    pub fn submit(&self, dispatcher: &mut Dispatcher, report: Report) {
        let reports = Arc::clone(&self.reports);
        dispatcher.dispatch("create_report", async move { reports.create_report(&report).await });
    }

    /// Close the backend session once its id is known. Nothing is sent if the
    /// session never opened.
    pub fn finish(&self, dispatcher: &mut Dispatcher, link: &SessionLink) {
        let sessions = Arc::clone(&self.sessions);
        let link = link.clone();
        dispatcher.dispatch("finish_session", async move {
            match link.resolve().await {
                Some(id) => sessions.finish_session(id).await,
                None => {
                    debug!("no backend session to finish");
                    Ok(())
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use practice_core::time::fixed_now;

    use super::*;

    #[test]
    fn build_uses_wall_clock_span() {
        let outcome = SessionOutcome {
            user_id: Some(UserId::new(1)),
            skill_id: SkillId::new(1054),
            skill_name: "Place Values of Decimals",
            total_questions: 10,
            correct_answers: 7,
            started_at: fixed_now(),
            finished_at: fixed_now() + Duration::seconds(95),
        };
        let report = ReportAggregator::build(&outcome).unwrap();
        assert!((report.score() - 70.0).abs() < f64::EPSILON);
        assert_eq!(report.time_taken_seconds(), 95);
        assert_eq!(report.timestamp(), outcome.finished_at);
    }
}

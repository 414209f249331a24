use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use practice_core::model::{AttemptRecord, QuestionInstance, Report, UserId};
use practice_core::templates::generate;
use practice_core::{ActiveTimer, Clock, SessionMode, Skill};
use rand::SeedableRng;
use rand::rngs::StdRng;
use storage::repository::Storage;
use tracing::{debug, info};
use uuid::Uuid;

use super::plan::GenerationPlan;
use super::progress::SessionProgress;
use super::state::{Advance, AnswerState, SessionPhase};
use crate::error::SessionError;
use crate::persistence::{
    AttemptRecorder, Dispatcher, LinkState, ReportAggregator, SessionLink, SessionOutcome,
};

/// Result of submitting the selected option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub index: usize,
    pub correct: bool,
    pub correct_answer: String,
    pub solution: String,
    /// Set when the submit also moved the learner: assessments advance at
    /// once and review answers return to the review screen.
    pub advance: Option<Advance>,
}

#[derive(Debug)]
struct Slot {
    question: QuestionInstance,
    state: AnswerState,
    /// A skip record was already dispatched for this question.
    skip_recorded: bool,
}

/// State machine for one practice run.
///
/// Owns the generated questions, the per-question timer and the navigation
/// state. Persistence is handed to the recorder and aggregator, which run in
/// the background; no method here waits on the backend.
pub struct SessionController {
    run_id: Uuid,
    skill: &'static Skill,
    user_id: Option<UserId>,
    question_count: usize,
    clock: Clock,
    rng: StdRng,
    plan: Option<GenerationPlan>,
    slots: BTreeMap<usize, Slot>,
    current: usize,
    phase: SessionPhase,
    timer: ActiveTimer,
    started_at: Option<DateTime<Utc>>,
    /// A review question is open; answering it returns to the review screen.
    reviewing: bool,
    link: SessionLink,
    recorder: AttemptRecorder,
    aggregator: ReportAggregator,
    dispatcher: Dispatcher,
    report: Option<Report>,
}

impl SessionController {
    /// A controller for `skill` delivering to `storage`.
    ///
    /// Binds to the ambient tokio runtime, if any, for background delivery.
    #[must_use]
    pub fn new(skill: &'static Skill, storage: &Storage) -> Self {
        let clock = Clock::system();
        Self {
            run_id: Uuid::new_v4(),
            skill,
            user_id: None,
            question_count: skill.question_count.max(1),
            clock,
            rng: StdRng::from_os_rng(),
            plan: None,
            slots: BTreeMap::new(),
            current: 0,
            phase: SessionPhase::NotStarted,
            timer: ActiveTimer::start(clock.now()),
            started_at: None,
            reviewing: false,
            link: SessionLink::unavailable(),
            recorder: AttemptRecorder::new(storage),
            aggregator: ReportAggregator::new(storage),
            dispatcher: Dispatcher::new(),
            report: None,
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Without a user the run works normally but nothing is persisted.
    #[must_use]
    pub fn with_user(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    /// Override the skill's session length. Zero is raised to one.
    #[must_use]
    pub fn with_question_count(mut self, count: usize) -> Self {
        self.question_count = count.max(1);
        self
    }

    pub fn clock_mut(&mut self) -> &mut Clock {
        &mut self.clock
    }

    //
    // ─── LIFECYCLE ─────────────────────────────────────────────────────────────
    //

    /// Build the generation plan, open the backend session and show the
    /// first question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AlreadyStarted` on a second call, or a
    /// generation error if the first question cannot be produced.
    pub fn start(&mut self) -> Result<&QuestionInstance, SessionError> {
        if self.phase != SessionPhase::NotStarted {
            return Err(SessionError::AlreadyStarted);
        }
        self.plan = Some(GenerationPlan::build(
            self.skill,
            self.question_count,
            &mut self.rng,
        )?);
        self.ensure_slot(0)?;

        let now = self.clock.now();
        self.started_at = Some(now);
        self.timer = ActiveTimer::start(now);
        self.current = 0;
        self.link = match self.user_id {
            Some(user_id) => self
                .recorder
                .open_session(&mut self.dispatcher, user_id, self.skill.id),
            None => {
                debug!(run_id = %self.run_id, "no learner identity; run will not be persisted");
                SessionLink::unavailable()
            }
        };
        self.phase = SessionPhase::Active;

        info!(
            run_id = %self.run_id,
            skill_id = %self.skill.id,
            mode = %self.skill.mode,
            questions = self.question_count,
            "practice session started"
        );
        self.current_question()
    }

    /// Score the run, dispatch the report and the finish notice, and freeze
    /// the session.
    ///
    /// Questions never submitted count as skipped. Only the first call does
    /// anything; later calls return `SessionError::Finished`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`, `Finished` on a
    /// repeated call.
    pub fn finalize(&mut self) -> Result<&Report, SessionError> {
        match self.phase {
            SessionPhase::NotStarted => return Err(SessionError::NotStarted),
            SessionPhase::Finished | SessionPhase::Reported => return Err(SessionError::Finished),
            SessionPhase::Active | SessionPhase::ReviewPending => {}
        }
        self.phase = SessionPhase::Finished;
        self.reviewing = false;

        let now = self.clock.now();
        for slot in self.slots.values_mut() {
            if !matches!(slot.state, AnswerState::Submitted { .. } | AnswerState::Skipped) {
                slot.state = AnswerState::Skipped;
            }
        }
        let correct = self.slots.values().filter(|s| s.state.is_correct()).count();

        let outcome = SessionOutcome {
            user_id: self.user_id,
            skill_id: self.skill.id,
            skill_name: self.skill.name,
            total_questions: u32::try_from(self.question_count).unwrap_or(u32::MAX),
            correct_answers: u32::try_from(correct).unwrap_or(u32::MAX),
            started_at: self.started_at.unwrap_or(now),
            finished_at: now,
        };
        let report = ReportAggregator::build(&outcome)?;

        if self.user_id.is_some() {
            self.aggregator.submit(&mut self.dispatcher, report.clone());
            self.aggregator.finish(&mut self.dispatcher, &self.link);
        }

        info!(
            run_id = %self.run_id,
            correct,
            total = self.question_count,
            score = report.score(),
            "practice session finalized"
        );
        self.phase = SessionPhase::Reported;
        Ok(self.report.insert(report))
    }

    /// Wait for every background delivery dispatched so far.
    pub async fn settle(&mut self) {
        self.dispatcher.settle().await;
    }

    //
    // ─── ANSWERING ─────────────────────────────────────────────────────────────
    //

    /// Choose `option` for the current question. Replaces an earlier choice.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::UnknownOption` if `option` is not offered and
    /// `AlreadyAnswered` once the question is submitted.
    pub fn select_option(&mut self, option: &str) -> Result<(), SessionError> {
        self.ensure_answerable()?;
        let reanswer_skips = self.skill.mode.allows_skip();
        let slot = self.current_slot_mut()?;
        if !slot.question.has_option(option) {
            return Err(SessionError::UnknownOption(option.to_owned()));
        }
        match slot.state {
            AnswerState::Submitted { .. } => Err(SessionError::AlreadyAnswered),
            AnswerState::Skipped if !reanswer_skips => Err(SessionError::AlreadyAnswered),
            _ => {
                slot.state = AnswerState::Selected(option.to_owned());
                Ok(())
            }
        }
    }

    /// Whether `submit` would be accepted right now.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.ensure_answerable().is_ok()
            && matches!(
                self.slots.get(&self.current).map(|s| &s.state),
                Some(AnswerState::Selected(_))
            )
    }

    /// Evaluate the selected option and record the attempt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NothingSelected` without touching any state if
    /// no option is selected, and `AlreadyAnswered` for a second submit.
    pub fn submit(&mut self) -> Result<Submission, SessionError> {
        self.ensure_answerable()?;
        let index = self.current;
        let now = self.clock.now();
        let slot = self
            .slots
            .get_mut(&index)
            .ok_or(SessionError::NotStarted)?;
        let choice = match &slot.state {
            AnswerState::Selected(choice) => choice.clone(),
            AnswerState::Submitted { .. } => return Err(SessionError::AlreadyAnswered),
            AnswerState::Unanswered | AnswerState::Skipped => {
                return Err(SessionError::NothingSelected);
            }
        };

        let correct = slot.question.is_correct(&choice);
        let seconds = self.timer.lap(now);
        let record = self.user_id.map(|user_id| {
            AttemptRecord::answered(user_id, self.skill.id, &slot.question, &choice, seconds)
        });
        let correct_answer = slot.question.correct_answer().to_owned();
        let solution = slot.question.solution().to_owned();
        slot.state = AnswerState::Submitted { choice, correct };

        if let Some(record) = record {
            self.recorder.persist(&mut self.dispatcher, &self.link, record);
        }
        info!(run_id = %self.run_id, index, correct, seconds, "answer submitted");

        let advance = if self.reviewing {
            Some(self.return_to_review())
        } else if self.skill.mode == SessionMode::Assessment {
            Some(self.move_forward()?)
        } else {
            None
        };

        Ok(Submission {
            index,
            correct,
            correct_answer,
            solution,
            advance,
        })
    }

    /// Skip the current question (assessments only) and move on.
    ///
    /// Only the first skip of a question is recorded; skipping it again from
    /// the review screen just moves on.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::SkipUnsupported` in practice mode and
    /// `AlreadyAnswered` for a submitted question.
    pub fn skip(&mut self) -> Result<Advance, SessionError> {
        if !self.skill.mode.allows_skip() {
            return Err(SessionError::SkipUnsupported);
        }
        self.ensure_answerable()?;
        let index = self.current;
        let now = self.clock.now();
        let slot = self
            .slots
            .get_mut(&index)
            .ok_or(SessionError::NotStarted)?;
        if slot.state.is_submitted() {
            return Err(SessionError::AlreadyAnswered);
        }

        slot.state = AnswerState::Skipped;
        let seconds = self.timer.lap(now);
        if slot.skip_recorded {
            debug!(run_id = %self.run_id, index, "question skipped again, not recorded");
        } else {
            slot.skip_recorded = true;
            let record = self.user_id.map(|user_id| {
                AttemptRecord::skipped(user_id, self.skill.id, &slot.question, seconds)
            });
            if let Some(record) = record {
                self.recorder.persist(&mut self.dispatcher, &self.link, record);
            }
            info!(run_id = %self.run_id, index, seconds, "question skipped");
        }

        if self.reviewing {
            Ok(self.return_to_review())
        } else {
            self.move_forward()
        }
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to the next question, or past the end.
    ///
    /// In practice mode the current question must be submitted first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotAnswered` for an unsubmitted practice
    /// question.
    pub fn next(&mut self) -> Result<Advance, SessionError> {
        self.ensure_answerable()?;
        let state = &self.current_slot()?.state;
        if !self.skill.mode.allows_skip() && !state.is_submitted() {
            return Err(SessionError::NotAnswered);
        }
        self.timer.lap(self.clock.now());
        self.move_forward()
    }

    /// Move back one question; stays put on the first.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` when no question is showing.
    pub fn previous(&mut self) -> Result<usize, SessionError> {
        self.ensure_answerable()?;
        self.timer.lap(self.clock.now());
        self.current = self.current.saturating_sub(1);
        Ok(self.current)
    }

    /// Indices not yet submitted. Skipped questions stay in the queue so
    /// they can be answered from the review screen.
    #[must_use]
    pub fn review_queue(&self) -> Vec<usize> {
        (0..self.question_count)
            .filter(|i| !self.slots.get(i).is_some_and(|s| s.state.is_submitted()))
            .collect()
    }

    /// Jump from the review screen to question `index`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInReview` outside the review screen and
    /// `IndexOutOfRange` for an index past the end.
    pub fn open_review(&mut self, index: usize) -> Result<&QuestionInstance, SessionError> {
        self.ensure_review()?;
        if index >= self.question_count {
            return Err(SessionError::IndexOutOfRange {
                index,
                total: self.question_count,
            });
        }
        self.ensure_slot(index)?;
        self.timer.lap(self.clock.now());
        self.current = index;
        self.phase = SessionPhase::Active;
        self.reviewing = true;
        debug!(run_id = %self.run_id, index, "review question opened");
        self.current_question()
    }

    /// Leave the review screen for the last question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInReview` outside the review screen.
    pub fn go_back(&mut self) -> Result<usize, SessionError> {
        self.ensure_review()?;
        self.timer.lap(self.clock.now());
        self.current = self.question_count - 1;
        self.phase = SessionPhase::Active;
        self.reviewing = false;
        Ok(self.current)
    }

    /// Finish from the review screen, leaving queued questions skipped.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotInReview` outside the review screen.
    pub fn submit_anyway(&mut self) -> Result<&Report, SessionError> {
        self.ensure_review()?;
        self.finalize()
    }

    //
    // ─── VISIBILITY ────────────────────────────────────────────────────────────
    //

    /// The page went to the background; time stops accruing.
    pub fn visibility_hidden(&mut self) {
        self.timer.hide(self.clock.now());
    }

    pub fn visibility_visible(&mut self) {
        self.timer.show(self.clock.now());
    }

    //
    // ─── QUERIES ───────────────────────────────────────────────────────────────
    //

    /// The question at the current index. Repeated calls return the same
    /// instance; nothing is regenerated on revisit.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotStarted` before `start`.
    pub fn current_question(&self) -> Result<&QuestionInstance, SessionError> {
        self.current_slot().map(|s| &s.question)
    }

    #[must_use]
    pub fn question_at(&self, index: usize) -> Option<&QuestionInstance> {
        self.slots.get(&index).map(|s| &s.question)
    }

    #[must_use]
    pub fn answer_state(&self, index: usize) -> Option<&AnswerState> {
        self.slots.get(&index).map(|s| &s.state)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_reviewing(&self) -> bool {
        self.reviewing
    }

    #[must_use]
    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn skill(&self) -> &'static Skill {
        self.skill
    }

    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    /// State of the backend session link.
    #[must_use]
    pub fn link_state(&self) -> LinkState {
        self.link.state()
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        let mut progress = SessionProgress {
            total: self.question_count,
            current: self.current,
            answered: 0,
            skipped: 0,
            correct: 0,
            phase: self.phase,
        };
        for slot in self.slots.values() {
            match slot.state {
                AnswerState::Submitted { correct, .. } => {
                    progress.answered += 1;
                    progress.correct += usize::from(correct);
                }
                AnswerState::Skipped => progress.skipped += 1,
                AnswerState::Unanswered | AnswerState::Selected(_) => {}
            }
        }
        progress
    }

    //
    // ─── INTERNALS ─────────────────────────────────────────────────────────────
    //

    fn ensure_answerable(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Active => Ok(()),
            SessionPhase::NotStarted => Err(SessionError::NotStarted),
            SessionPhase::ReviewPending => Err(SessionError::InReview),
            SessionPhase::Finished | SessionPhase::Reported => Err(SessionError::Finished),
        }
    }

    fn ensure_review(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::ReviewPending => Ok(()),
            SessionPhase::NotStarted => Err(SessionError::NotStarted),
            SessionPhase::Active => Err(SessionError::NotInReview),
            SessionPhase::Finished | SessionPhase::Reported => Err(SessionError::Finished),
        }
    }

    fn current_slot(&self) -> Result<&Slot, SessionError> {
        self.slots.get(&self.current).ok_or(SessionError::NotStarted)
    }

    fn current_slot_mut(&mut self) -> Result<&mut Slot, SessionError> {
        self.slots
            .get_mut(&self.current)
            .ok_or(SessionError::NotStarted)
    }

    /// Generate the question for `index` on first visit only.
    fn ensure_slot(&mut self, index: usize) -> Result<(), SessionError> {
        if self.slots.contains_key(&index) {
            return Ok(());
        }
        let template = self
            .plan
            .as_ref()
            .and_then(|plan| plan.template_for(index))
            .ok_or(SessionError::IndexOutOfRange {
                index,
                total: self.question_count,
            })?;
        let question = generate(template, &mut self.rng)?;
        debug!(run_id = %self.run_id, index, template = %template.id, "question generated");
        self.slots.insert(
            index,
            Slot {
                question,
                state: AnswerState::Unanswered,
                skip_recorded: false,
            },
        );
        Ok(())
    }

    /// Step forward without touching the timer; the caller has lapped it.
    fn move_forward(&mut self) -> Result<Advance, SessionError> {
        let next = self.current + 1;
        if next < self.question_count {
            self.ensure_slot(next)?;
            self.current = next;
            return Ok(Advance::Moved(next));
        }

        let queue = self.review_queue();
        if self.skill.mode.has_review() && !queue.is_empty() {
            self.phase = SessionPhase::ReviewPending;
            self.reviewing = false;
            info!(run_id = %self.run_id, queued = ?queue, "review pending");
            return Ok(Advance::Review);
        }
        self.finalize()?;
        Ok(Advance::Finished)
    }

    fn return_to_review(&mut self) -> Advance {
        self.phase = SessionPhase::ReviewPending;
        self.reviewing = false;
        debug!(run_id = %self.run_id, queued = ?self.review_queue(), "back to review");
        Advance::Review
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use practice_core::catalog;
    use practice_core::model::SkillId;
    use practice_core::time::fixed_clock;

    use super::*;

    fn controller(skill: u64) -> SessionController {
        let skill = catalog::find(SkillId::new(skill)).unwrap();
        SessionController::new(skill, &Storage::in_memory())
            .with_seed(11)
            .with_clock(fixed_clock())
            .with_question_count(4)
    }

    fn wrong_option(q: &QuestionInstance) -> String {
        q.options()
            .iter()
            .find(|o| !q.is_correct(o))
            .cloned()
            .unwrap()
    }

    #[test]
    fn actions_before_start_are_rejected() {
        let mut c = controller(1054);
        assert!(matches!(c.current_question(), Err(SessionError::NotStarted)));
        assert!(matches!(c.submit(), Err(SessionError::NotStarted)));
        assert!(matches!(c.finalize(), Err(SessionError::NotStarted)));
        assert!(!c.can_submit());
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut c = controller(1054);
        c.start().unwrap();
        assert_eq!(c.phase(), SessionPhase::Active);
        assert!(matches!(c.start(), Err(SessionError::AlreadyStarted)));
    }

    #[test]
    fn submit_without_selection_changes_nothing() {
        let mut c = controller(1054);
        c.start().unwrap();
        assert!(matches!(c.submit(), Err(SessionError::NothingSelected)));
        assert_eq!(c.answer_state(0), Some(&AnswerState::Unanswered));
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut c = controller(1054);
        c.start().unwrap();
        assert!(matches!(
            c.select_option("not an option"),
            Err(SessionError::UnknownOption(_))
        ));
    }

    #[test]
    fn practice_requires_answer_before_next() {
        let mut c = controller(1054);
        c.start().unwrap();
        assert!(matches!(c.next(), Err(SessionError::NotAnswered)));
        assert!(matches!(c.skip(), Err(SessionError::SkipUnsupported)));

        let answer = c.current_question().unwrap().correct_answer().to_owned();
        c.select_option(&answer).unwrap();
        assert!(c.can_submit());
        let submission = c.submit().unwrap();
        assert!(submission.correct);
        assert_eq!(submission.advance, None);
        assert!(matches!(c.submit(), Err(SessionError::AlreadyAnswered)));
        assert!(matches!(c.select_option(&answer), Err(SessionError::AlreadyAnswered)));
        assert_eq!(c.next().unwrap(), Advance::Moved(1));
    }

    #[test]
    fn selection_can_change_before_submit() {
        let mut c = controller(1054);
        let q = c.start().unwrap().clone();
        let wrong = wrong_option(&q);
        c.select_option(&wrong).unwrap();
        c.select_option(q.correct_answer()).unwrap();
        assert!(c.submit().unwrap().correct);
    }

    #[test]
    fn revisiting_restores_question_and_state() {
        let mut c = controller(1054);
        let first = c.start().unwrap().clone();
        let wrong = wrong_option(&first);
        c.select_option(&wrong).unwrap();
        c.submit().unwrap();
        c.next().unwrap();
        assert_eq!(c.previous().unwrap(), 0);
        assert_eq!(c.current_question().unwrap(), &first);
        assert_eq!(
            c.answer_state(0),
            Some(&AnswerState::Submitted {
                choice: wrong,
                correct: false
            })
        );
        assert_eq!(c.previous().unwrap(), 0);
    }

    #[test]
    fn last_next_finalizes_practice() {
        let mut c = controller(1054);
        c.start().unwrap();
        for i in 0..4 {
            let answer = c.current_question().unwrap().correct_answer().to_owned();
            c.select_option(&answer).unwrap();
            c.submit().unwrap();
            let advance = c.next().unwrap();
            if i < 3 {
                assert_eq!(advance, Advance::Moved(i + 1));
            } else {
                assert_eq!(advance, Advance::Finished);
            }
        }
        assert_eq!(c.phase(), SessionPhase::Reported);
        let report = c.report().unwrap();
        assert_eq!(report.correct_answers(), 4);
        assert!(matches!(c.finalize(), Err(SessionError::Finished)));
        assert!(matches!(c.next(), Err(SessionError::Finished)));
        assert!(c.progress().is_complete());
    }

    #[test]
    fn early_finalize_counts_unvisited_as_wrong() {
        let mut c = controller(1054).with_question_count(5);
        c.start().unwrap();
        let answer = c.current_question().unwrap().correct_answer().to_owned();
        c.select_option(&answer).unwrap();
        c.submit().unwrap();
        let report = c.finalize().unwrap();
        assert_eq!(report.total_questions(), 5);
        assert_eq!(report.correct_answers(), 1);
        assert!((report.score() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn report_time_is_wall_clock() {
        let mut c = controller(1054);
        c.start().unwrap();
        c.visibility_hidden();
        c.clock_mut().advance(Duration::seconds(125));
        c.visibility_visible();
        assert_eq!(c.finalize().unwrap().time_taken_seconds(), 125);
    }

    #[test]
    fn assessment_auto_advances_and_reviews() {
        let mut c = controller(1100);
        c.start().unwrap();
        assert_eq!(c.skip().unwrap(), Advance::Moved(1));
        for _ in 1..3 {
            let answer = c.current_question().unwrap().correct_answer().to_owned();
            c.select_option(&answer).unwrap();
            c.submit().unwrap();
        }
        let answer = c.current_question().unwrap().correct_answer().to_owned();
        c.select_option(&answer).unwrap();
        assert_eq!(c.submit().unwrap().advance, Some(Advance::Review));
        assert_eq!(c.phase(), SessionPhase::ReviewPending);
        assert_eq!(c.review_queue(), vec![0]);
        assert!(matches!(c.next(), Err(SessionError::InReview)));

        assert_eq!(c.go_back().unwrap(), 3);
        assert_eq!(c.phase(), SessionPhase::Active);
        assert_eq!(c.next().unwrap(), Advance::Review);
    }

    #[test]
    fn review_actions_outside_review_are_rejected() {
        let mut c = controller(1100);
        c.start().unwrap();
        assert!(matches!(c.open_review(0), Err(SessionError::NotInReview)));
        assert!(matches!(c.go_back(), Err(SessionError::NotInReview)));
        assert!(matches!(c.submit_anyway(), Err(SessionError::NotInReview)));
    }

    #[test]
    fn review_index_is_checked() {
        let mut c = controller(1100);
        c.start().unwrap();
        for _ in 0..4 {
            c.skip().unwrap();
        }
        assert_eq!(c.review_queue(), vec![0, 1, 2, 3]);
        assert!(matches!(
            c.open_review(4),
            Err(SessionError::IndexOutOfRange { index: 4, total: 4 })
        ));
    }

    #[test]
    fn progress_counts_outcomes() {
        let mut c = controller(1100);
        let q = c.start().unwrap().clone();
        c.select_option(q.correct_answer()).unwrap();
        c.submit().unwrap();
        let q = c.current_question().unwrap().clone();
        c.select_option(&wrong_option(&q)).unwrap();
        c.submit().unwrap();
        c.skip().unwrap();

        let progress = c.progress();
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.correct, 1);
        assert_eq!(progress.skipped, 1);
        assert_eq!(progress.current, 3);
        assert_eq!(progress.remaining(), 1);
    }

    #[test]
    fn no_runtime_still_runs() {
        let skill = catalog::find(SkillId::new(1054)).unwrap();
        let mut c = SessionController::new(skill, &Storage::in_memory())
            .with_user(Some(UserId::new(1)))
            .with_question_count(1);
        c.start().unwrap();
        let answer = c.current_question().unwrap().correct_answer().to_owned();
        c.select_option(&answer).unwrap();
        c.submit().unwrap();
        assert_eq!(c.next().unwrap(), Advance::Finished);
        assert_eq!(c.link_state(), LinkState::Unavailable);
    }
}

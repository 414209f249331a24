use crate::model::{Difficulty, QuestionInstance, SkillId, TemplateId, UserId};

/// Student answer recorded for a skipped question.
pub const SKIPPED_ANSWER: &str = "Skipped";

/// One submitted or skipped answer, as sent to the backend.
///
/// The backend session id is not part of the record: it is resolved when the
/// record is delivered, because session creation may still be in flight when
/// the learner answers the first question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptRecord {
    user_id: UserId,
    skill_id: SkillId,
    template_id: Option<TemplateId>,
    difficulty: Difficulty,
    question_text: String,
    correct_answer: String,
    student_answer: String,
    is_correct: bool,
    solution_text: String,
    time_spent_seconds: u32,
}

impl AttemptRecord {
    /// Record for an evaluated answer.
    #[must_use]
    pub fn answered(
        user_id: UserId,
        skill_id: SkillId,
        question: &QuestionInstance,
        student_answer: &str,
        time_spent_seconds: u32,
    ) -> Self {
        Self {
            user_id,
            skill_id,
            template_id: Some(question.template_id()),
            difficulty: question.difficulty(),
            question_text: question.prompt().to_owned(),
            correct_answer: question.correct_answer().to_owned(),
            student_answer: student_answer.to_owned(),
            is_correct: question.is_correct(student_answer),
            solution_text: question.solution().to_owned(),
            time_spent_seconds,
        }
    }

    /// Record for a skipped question; never counted as correct.
    #[must_use]
    pub fn skipped(
        user_id: UserId,
        skill_id: SkillId,
        question: &QuestionInstance,
        time_spent_seconds: u32,
    ) -> Self {
        Self {
            student_answer: SKIPPED_ANSWER.to_owned(),
            is_correct: false,
            ..Self::answered(user_id, skill_id, question, SKIPPED_ANSWER, time_spent_seconds)
        }
    }

    #[must_use]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[must_use]
    pub fn skill_id(&self) -> SkillId {
        self.skill_id
    }

    #[must_use]
    pub fn template_id(&self) -> Option<TemplateId> {
        self.template_id
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn question_text(&self) -> &str {
        &self.question_text
    }

    #[must_use]
    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    /// The chosen option, or [`SKIPPED_ANSWER`].
    #[must_use]
    pub fn student_answer(&self) -> &str {
        &self.student_answer
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn solution_text(&self) -> &str {
        &self.solution_text
    }

    /// Active time on the question, in whole seconds.
    #[must_use]
    pub fn time_spent_seconds(&self) -> u32 {
        self.time_spent_seconds
    }
}

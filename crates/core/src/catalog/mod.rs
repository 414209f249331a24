//! Skills a learner can practice, each backed by one or more templates.

mod algebra;
mod measurement;
mod number;

use std::fmt;

use crate::model::SkillId;
use crate::templates::QuestionTemplate;

pub use algebra::{
    BOTH_SIDES_EQUATION, COMMON_FACTORS, LINEAR_EQUATION, MONOMIAL_DIVISION,
    NEGATIVE_MONOMIAL_DIVISION, ONE_STEP_EQUATION, POLYNOMIAL_DIVISION, THREE_TERM_FACTOR,
};
pub use measurement::{RECTANGLE_AREA, RECTANGLE_MISSING_SIDE, SMALL_RECTANGLE_AREA};
pub use number::{
    ADDITION_BRIDGING_TEN, AP_NEXT_TERM, AP_NTH_TERM, AP_RISING_NTH_TERM, DIGIT_VALUE,
    FRACTION_ADDITION, HCF, HCF_OF_THREE, LCD_FRACTION_ADDITION, LIKE_FRACTION_ADDITION,
    PLACE_VALUE, SINGLE_DIGIT_ADDITION, SMALL_HCF, THOUSANDTHS_PLACE, THREE_ADDENDS,
};

/// Session length used when neither the skill nor the caller overrides it.
pub const DEFAULT_QUESTION_COUNT: usize = 10;

/// How a session for a skill behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionMode {
    /// Immediate feedback; every question must be answered to move on.
    Practice,
    /// Chapter tests: skipping allowed, unanswered questions reviewed at the end.
    Assessment,
}

impl SessionMode {
    #[must_use]
    pub fn allows_skip(self) -> bool {
        matches!(self, SessionMode::Assessment)
    }

    #[must_use]
    pub fn has_review(self) -> bool {
        matches!(self, SessionMode::Assessment)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SessionMode::Practice => "practice",
            SessionMode::Assessment => "assessment",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct Skill {
    pub id: SkillId,
    pub name: &'static str,
    pub mode: SessionMode,
    pub question_count: usize,
    pub templates: &'static [&'static QuestionTemplate],
}

static SKILLS: &[Skill] = &[
    Skill {
        id: SkillId::new(302),
        name: "Addition of Single-Digit Numbers",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[&SINGLE_DIGIT_ADDITION, &ADDITION_BRIDGING_TEN, &THREE_ADDENDS],
    },
    Skill {
        id: SkillId::new(1054),
        name: "Place Values of Decimals",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[&PLACE_VALUE, &DIGIT_VALUE, &THOUSANDTHS_PLACE],
    },
    Skill {
        id: SkillId::new(1169),
        name: "Factorisation Using Common Factors",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[&COMMON_FACTORS, &THREE_TERM_FACTOR],
    },
    Skill {
        id: SkillId::new(1173),
        name: "Division of Algebraic Expressions",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[
            &MONOMIAL_DIVISION,
            &NEGATIVE_MONOMIAL_DIVISION,
            &POLYNOMIAL_DIVISION,
        ],
    },
    Skill {
        id: SkillId::new(1301),
        name: "Common Multiples and Common Factors",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[&SMALL_HCF, &HCF, &HCF_OF_THREE],
    },
    Skill {
        id: SkillId::new(1401),
        name: "Adding Fractions",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[
            &LIKE_FRACTION_ADDITION,
            &FRACTION_ADDITION,
            &LCD_FRACTION_ADDITION,
        ],
    },
    Skill {
        id: SkillId::new(1501),
        name: "Arithmetic Progressions",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[&AP_NEXT_TERM, &AP_RISING_NTH_TERM, &AP_NTH_TERM],
    },
    Skill {
        id: SkillId::new(1601),
        name: "Linear Equations in One Variable",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[&ONE_STEP_EQUATION, &LINEAR_EQUATION, &BOTH_SIDES_EQUATION],
    },
    Skill {
        id: SkillId::new(1701),
        name: "Area of Rectangles",
        mode: SessionMode::Practice,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[
            &SMALL_RECTANGLE_AREA,
            &RECTANGLE_AREA,
            &RECTANGLE_MISSING_SIDE,
        ],
    },
    Skill {
        id: SkillId::new(1100),
        name: "Chapter Test - Algebra",
        mode: SessionMode::Assessment,
        question_count: DEFAULT_QUESTION_COUNT,
        templates: &[
            &MONOMIAL_DIVISION,
            &COMMON_FACTORS,
            &LINEAR_EQUATION,
            &THREE_TERM_FACTOR,
        ],
    },
];

/// Every skill in display order.
#[must_use]
pub fn skills() -> &'static [Skill] {
    SKILLS
}

#[must_use]
pub fn find(id: SkillId) -> Option<&'static Skill> {
    SKILLS.iter().find(|s| s.id == id)
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::model::OPTION_COUNT;
    use crate::templates::{generate, instantiate};

    fn all_templates() -> Vec<&'static QuestionTemplate> {
        let mut seen = HashSet::new();
        skills()
            .iter()
            .flat_map(|s| s.templates.iter().copied())
            .filter(|t| seen.insert(t.id))
            .collect()
    }

    #[test]
    fn skill_ids_are_unique() {
        let ids: HashSet<_> = skills().iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), skills().len());
    }

    #[test]
    fn every_skill_has_templates() {
        for skill in skills() {
            assert!(!skill.templates.is_empty(), "{} has no templates", skill.name);
            assert!(skill.question_count > 0);
        }
    }

    #[test]
    fn find_by_id() {
        assert_eq!(find(SkillId::new(1054)).map(|s| s.name), Some("Place Values of Decimals"));
        assert_eq!(find(SkillId::new(1100)).map(|s| s.mode), Some(SessionMode::Assessment));
        assert!(find(SkillId::new(9)).is_none());
    }

    #[test]
    fn fallbacks_are_admitted_and_render() {
        let mut rng = StdRng::seed_from_u64(0);
        for template in all_templates() {
            assert!(template.admits(&template.fallback), "{} fallback rejected", template.id);
            instantiate(template, template.fallback, &mut rng)
                .unwrap_or_else(|e| panic!("{} fallback invalid: {e}", template.id));
        }
    }

    #[test]
    fn generated_options_are_unique_with_one_correct() {
        let mut rng = StdRng::seed_from_u64(1234);
        for template in all_templates() {
            for _ in 0..250 {
                let q = generate(template, &mut rng).unwrap();
                assert!(template.admits(q.params()), "{} produced {:?}", template.id, q.params());
                assert_eq!(q.options().len(), OPTION_COUNT);
                let unique: HashSet<_> = q.options().iter().collect();
                assert_eq!(unique.len(), OPTION_COUNT, "{}: {:?}", template.id, q.options());
                let correct = q.options().iter().filter(|o| q.is_correct(o)).count();
                assert_eq!(correct, 1, "{}: {:?}", template.id, q.options());
                assert_eq!(q.difficulty(), template.difficulty);
            }
        }
    }

    #[test]
    fn template_ids_are_unique() {
        let mut topics = HashMap::new();
        for template in skills().iter().flat_map(|s| s.templates.iter()) {
            let topic = topics.entry(template.id).or_insert(template.topic);
            assert_eq!(*topic, template.topic, "{} reused", template.id);
        }
    }

    #[test]
    fn practice_skills_cover_every_tier() {
        // factorisation has no easy template and starts at medium
        let practice = skills()
            .iter()
            .filter(|s| s.mode == SessionMode::Practice && s.id != SkillId::new(1169));
        for skill in practice {
            let tiers: HashSet<_> = skill.templates.iter().map(|t| t.difficulty).collect();
            assert_eq!(tiers.len(), 3, "{} lacks a tier", skill.name);
        }
    }
}

use std::collections::BTreeMap;

use practice_core::Skill;
use practice_core::model::Difficulty;
use practice_core::templates::QuestionTemplate;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::SessionError;

/// Which template produces each question of a run.
///
/// Built once at start from the session's own rng. Each difficulty tier is
/// shuffled and then cycled, so consecutive questions of one tier vary.
#[derive(Debug, Clone)]
pub struct GenerationPlan {
    slots: Vec<&'static QuestionTemplate>,
}

impl GenerationPlan {
    /// # Errors
    ///
    /// Returns `SessionError::NoTemplates` when the skill has no templates.
    pub fn build<R: Rng + ?Sized>(
        skill: &'static Skill,
        total: usize,
        rng: &mut R,
    ) -> Result<Self, SessionError> {
        let mut tiers: BTreeMap<Difficulty, Vec<&'static QuestionTemplate>> = BTreeMap::new();
        for &template in skill.templates {
            tiers.entry(template.difficulty).or_default().push(template);
        }
        for pool in tiers.values_mut() {
            pool.shuffle(rng);
        }

        let mut cursors: BTreeMap<Difficulty, usize> = BTreeMap::new();
        let mut slots = Vec::with_capacity(total);
        for index in 0..total {
            let wanted = Difficulty::for_index(index, total);
            let (tier, pool) = Difficulty::ALL
                .iter()
                .filter_map(|d| tiers.get_key_value(d))
                .min_by_key(|(d, _)| d.distance(wanted))
                .ok_or(SessionError::NoTemplates(skill.id))?;
            let cursor = cursors.entry(*tier).or_insert(0);
            slots.push(pool[*cursor % pool.len()]);
            *cursor += 1;
        }

        Ok(Self { slots })
    }

    #[must_use]
    pub fn template_for(&self, index: usize) -> Option<&'static QuestionTemplate> {
        self.slots.get(index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use practice_core::catalog;
    use practice_core::model::SkillId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn skill(id: u64) -> &'static Skill {
        catalog::find(SkillId::new(id)).unwrap()
    }

    #[test]
    fn chapter_test_follows_difficulty_curve() {
        let mut rng = StdRng::seed_from_u64(3);
        let plan = GenerationPlan::build(skill(1100), 10, &mut rng).unwrap();
        assert_eq!(plan.len(), 10);
        for index in 0..10 {
            let template = plan.template_for(index).unwrap();
            assert_eq!(template.difficulty, Difficulty::for_index(index, 10), "index {index}");
        }
        // two medium templates alternate
        let a = plan.template_for(3).unwrap().id;
        let b = plan.template_for(4).unwrap().id;
        let c = plan.template_for(5).unwrap().id;
        assert_ne!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn missing_tier_uses_nearest() {
        // common factors (medium) and three-term factoring (hard): no easy tier
        let mut rng = StdRng::seed_from_u64(0);
        let plan = GenerationPlan::build(skill(1169), 10, &mut rng).unwrap();
        for index in 0..3 {
            assert_eq!(plan.template_for(index).unwrap().difficulty, Difficulty::Medium);
        }
        assert_eq!(plan.template_for(9).unwrap().difficulty, Difficulty::Hard);
    }

    #[test]
    fn topic_skill_climbs_through_its_tiers() {
        let mut rng = StdRng::seed_from_u64(0);
        let plan = GenerationPlan::build(skill(1054), 10, &mut rng).unwrap();
        let ids: Vec<_> = (0..10).map(|i| plan.template_for(i).unwrap().id).collect();
        assert!(ids[..3].iter().all(|id| *id == catalog::PLACE_VALUE.id));
        assert!(ids[3..6].iter().all(|id| *id == catalog::DIGIT_VALUE.id));
        assert!(ids[6..].iter().all(|id| *id == catalog::THOUSANDTHS_PLACE.id));
        assert!(plan.template_for(10).is_none());
    }

    #[test]
    fn every_topic_skill_follows_difficulty_curve() {
        let mut rng = StdRng::seed_from_u64(11);
        for id in [302, 1054, 1173, 1301, 1401, 1501, 1601, 1701] {
            let plan = GenerationPlan::build(skill(id), 10, &mut rng).unwrap();
            for index in 0..10 {
                assert_eq!(
                    plan.template_for(index).unwrap().difficulty,
                    Difficulty::for_index(index, 10),
                    "skill {id} index {index}"
                );
            }
        }
    }

    #[test]
    fn skill_without_templates_is_rejected() {
        static EMPTY: Skill = Skill {
            id: SkillId::new(1),
            name: "Empty",
            mode: practice_core::SessionMode::Practice,
            question_count: 10,
            templates: &[],
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            GenerationPlan::build(&EMPTY, 10, &mut rng),
            Err(SessionError::NoTemplates(_))
        ));
    }
}

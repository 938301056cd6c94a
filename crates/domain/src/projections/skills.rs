use serde::Serialize;
use std::collections::BTreeMap;

use super::Projection;
use crate::events::{Event, EventLog, SkillProficiencySet};
use crate::game_systems::ProficiencyLevel;
use crate::reduction::{LatestWins, Reduction};
use crate::value_objects::Skill;

/// Latest proficiency level per skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillProficiencies(BTreeMap<Skill, ProficiencyLevel>);

impl SkillProficiencies {
    /// Recorded level, `None` when the skill has no events.
    pub fn level(&self, skill: Skill) -> ProficiencyLevel {
        self.0.get(&skill).copied().unwrap_or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Skill, &ProficiencyLevel)> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Projection<SkillProficiencySet> for SkillProficiencies {
    fn project(log: &EventLog<SkillProficiencySet>) -> Self {
        let latest = LatestWins::new(
            |e: &Event<SkillProficiencySet>| e.payload.skill,
            |e: &Event<SkillProficiencySet>| e.payload.proficiency,
        );
        Self(latest.reduce(log))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::{ev, log};

    #[test]
    fn latest_level_per_skill() {
        let skills = SkillProficiencies::project(&log(vec![
            ev(1, SkillProficiencySet {
                skill: Skill::Stealth,
                proficiency: ProficiencyLevel::Proficient,
            }),
            ev(2, SkillProficiencySet {
                skill: Skill::Stealth,
                proficiency: ProficiencyLevel::Expert,
            }),
        ]));
        assert_eq!(skills.level(Skill::Stealth), ProficiencyLevel::Expert);
        assert_eq!(skills.level(Skill::Arcana), ProficiencyLevel::None);
    }
}

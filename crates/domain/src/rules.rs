//! Derived rule computations over reduced character state.
//!
//! [`RulesEngine`] reads formulas and class tables only through the
//! [`GameSystem`] traits, keyed by class id and level. Given the same
//! reduced state and ruleset it always returns the same values.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::compendium::{ItemKind, ReferenceData};
use crate::game_systems::{
    CalculationEngine, CasterType, GameSystem, LevelHitDie, ProficiencyLevel, SpellcastingSystem,
};
use crate::projections::{AbilityScores, ClassLevels, ClassProgress, Inventory, SkillProficiencies};
use crate::value_objects::{Ability, DieSize, Skill};
use crate::ClassId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilitySummary {
    pub ability: Ability,
    pub score: i32,
    pub modifier: i32,
    pub proficient: bool,
    pub saving_throw: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSummary {
    pub skill: Skill,
    pub ability: Ability,
    pub proficiency: ProficiencyLevel,
    pub bonus: i32,
}

/// Spellcasting numbers for one casting class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CastingStats {
    pub caster_type: CasterType,
    pub ability: Ability,
    pub ability_modifier: i32,
    pub attack_bonus: i32,
    pub save_dc: i32,
    /// Slot count per spell tier at the current class level.
    pub slots: BTreeMap<u8, u8>,
    /// Highest tier with at least one slot; `None` when cantrip-only.
    pub max_castable_level: Option<u8>,
}

/// Slots available to the character as a whole.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSlotSummary {
    /// Shared slots from every non-pact casting class.
    pub shared: BTreeMap<u8, u8>,
    /// Pact magic slots, kept apart from the shared pool.
    pub pact: BTreeMap<u8, u8>,
}

pub struct RulesEngine<'a> {
    system: &'a dyn GameSystem,
}

impl<'a> RulesEngine<'a> {
    pub fn new(system: &'a dyn GameSystem) -> Self {
        Self { system }
    }

    fn calc(&self) -> &dyn CalculationEngine {
        self.system.calculation_engine()
    }

    pub fn spellcasting(&self) -> Option<&dyn SpellcastingSystem> {
        self.system.spellcasting_system()
    }

    pub fn proficiency_bonus(&self, levels: &ClassLevels) -> i32 {
        self.calc().proficiency_bonus(levels.total_level())
    }

    pub fn ability_modifier(&self, scores: &AbilityScores, ability: Ability) -> i32 {
        self.calc().ability_modifier(scores.score_or_default(ability))
    }

    /// Summaries for every ability with a recorded score.
    pub fn abilities(&self, scores: &AbilityScores, proficiency_bonus: i32) -> Vec<AbilitySummary> {
        scores
            .iter()
            .map(|(&ability, state)| {
                let modifier = self.calc().ability_modifier(state.score.value());
                AbilitySummary {
                    ability,
                    score: state.score.value(),
                    modifier,
                    proficient: state.proficient,
                    saving_throw: self.calc().saving_throw_modifier(
                        modifier,
                        proficiency_bonus,
                        state.proficient,
                    ),
                }
            })
            .collect()
    }

    pub fn skill_bonus(
        &self,
        scores: &AbilityScores,
        skill: Skill,
        proficiency: ProficiencyLevel,
        proficiency_bonus: i32,
    ) -> i32 {
        let modifier = self.ability_modifier(scores, skill.ability());
        self.calc()
            .skill_modifier(modifier, proficiency_bonus, proficiency)
    }

    /// Every skill of the ruleset in sheet order.
    pub fn skills(
        &self,
        scores: &AbilityScores,
        proficiencies: &SkillProficiencies,
        proficiency_bonus: i32,
    ) -> Vec<SkillSummary> {
        self.system
            .skills()
            .iter()
            .map(|&skill| {
                let proficiency = proficiencies.level(skill);
                SkillSummary {
                    skill,
                    ability: skill.ability(),
                    proficiency,
                    bonus: self.skill_bonus(scores, skill, proficiency, proficiency_bonus),
                }
            })
            .collect()
    }

    pub fn initiative(&self, scores: &AbilityScores) -> i32 {
        self.ability_modifier(scores, Ability::Dexterity)
    }

    pub fn passive_perception(
        &self,
        scores: &AbilityScores,
        proficiencies: &SkillProficiencies,
        proficiency_bonus: i32,
    ) -> i32 {
        let perception = self.skill_bonus(
            scores,
            Skill::Perception,
            proficiencies.level(Skill::Perception),
            proficiency_bonus,
        );
        self.calc().passive_perception(perception)
    }

    /// Armor class from worn armor and a wielded shield.
    ///
    /// Items missing from the reference dataset contribute nothing. With
    /// several candidates the highest base AC and shield bonus are used.
    pub fn armor_class(
        &self,
        scores: &AbilityScores,
        inventory: &Inventory,
        reference: &dyn ReferenceData,
    ) -> i32 {
        let mut armor: Option<(i32, bool, Option<i32>)> = None;
        let mut shield: Option<i32> = None;

        for (item_id, possession) in inventory.iter() {
            let Some(definition) = reference.item(item_id) else {
                continue;
            };
            match &definition.kind {
                ItemKind::Armor {
                    base_ac,
                    max_dex_bonus,
                    allows_dex,
                } if possession.worn => {
                    if armor.map_or(true, |(best, _, _)| *base_ac > best) {
                        armor = Some((*base_ac, *allows_dex, *max_dex_bonus));
                    }
                }
                ItemKind::Shield { bonus } if possession.wielded => {
                    shield = Some(shield.map_or(*bonus, |best| best.max(*bonus)));
                }
                _ => {}
            }
        }

        let dex = self.ability_modifier(scores, Ability::Dexterity);
        match armor {
            Some((base_ac, allows_dex, max_dex)) => {
                self.calc()
                    .calculate_ac(dex, Some(base_ac), shield, allows_dex, max_dex)
            }
            None => self.calc().calculate_ac(dex, None, shield, true, None),
        }
    }

    /// Hit die and recorded roll for every character level.
    ///
    /// The starting class's first level comes first; other classes follow
    /// in class order.
    pub fn level_hit_dice(&self, levels: &ClassLevels) -> Vec<LevelHitDie> {
        let mut ordered: Vec<(&ClassId, &ClassProgress)> = levels.iter().collect();
        if let Some(start) = levels.starting_class() {
            ordered.sort_by_key(|(class, _)| *class != start);
        }

        ordered
            .into_iter()
            .flat_map(|(class, progress)| {
                let die = self.calc().hit_die(class.as_str());
                (1..=progress.level).map(move |level| LevelHitDie {
                    die,
                    roll: progress.rolls.get(&level).copied(),
                })
            })
            .collect()
    }

    pub fn max_hit_points(&self, levels: &ClassLevels, scores: &AbilityScores) -> i32 {
        let constitution = self.ability_modifier(scores, Ability::Constitution);
        self.calc()
            .calculate_max_hp(&self.level_hit_dice(levels), constitution)
    }

    /// Granted hit dice: one die of the class's size per class level.
    pub fn granted_hit_dice(&self, levels: &ClassLevels) -> BTreeMap<DieSize, u32> {
        let mut dice: BTreeMap<DieSize, u32> = BTreeMap::new();
        for (class, progress) in levels.iter() {
            *dice.entry(self.calc().hit_die(class.as_str())).or_default() +=
                u32::from(progress.level);
        }
        dice
    }

    /// Whether a class currently grants spellcasting.
    ///
    /// Subclass-gated classes only cast with the required subclass.
    pub fn casts_spells(&self, class: &ClassId, progress: &ClassProgress) -> bool {
        let Some(casting) = self.spellcasting() else {
            return false;
        };
        if casting.caster_type(class.as_str()).is_none()
            || casting.spellcasting_ability(class.as_str()).is_none()
        {
            return false;
        }
        match casting.required_subclass(class.as_str()) {
            Some(required) => progress.has_subclass(required),
            None => true,
        }
    }

    pub fn casting_stats(
        &self,
        class: &ClassId,
        progress: &ClassProgress,
        scores: &AbilityScores,
        proficiency_bonus: i32,
    ) -> Option<CastingStats> {
        if !self.casts_spells(class, progress) {
            return None;
        }
        let casting = self.spellcasting()?;
        let caster_type = casting.caster_type(class.as_str())?;
        let ability = casting.spellcasting_ability(class.as_str())?;
        let ability_modifier = self.ability_modifier(scores, ability);
        let slots = casting.spell_slots(class.as_str(), progress.level);
        let max_castable_level = slots
            .iter()
            .filter(|(_, count)| **count > 0)
            .map(|(tier, _)| *tier)
            .max();

        Some(CastingStats {
            caster_type,
            ability,
            ability_modifier,
            attack_bonus: self
                .calc()
                .spell_attack_bonus(proficiency_bonus, ability_modifier),
            save_dc: self
                .calc()
                .spell_save_dc(proficiency_bonus, ability_modifier),
            slots,
            max_castable_level,
        })
    }

    /// Shared and pact slots for the whole character.
    ///
    /// A single non-pact casting class uses its own table; several are
    /// combined through their effective caster levels.
    pub fn spell_slots(&self, levels: &ClassLevels) -> SpellSlotSummary {
        let Some(casting) = self.spellcasting() else {
            return SpellSlotSummary::default();
        };

        let mut summary = SpellSlotSummary::default();
        let mut shared_classes = Vec::new();
        for (class, progress) in levels.iter() {
            if !self.casts_spells(class, progress) {
                continue;
            }
            match casting.caster_type(class.as_str()) {
                Some(CasterType::Pact) => {
                    for (tier, count) in casting.spell_slots(class.as_str(), progress.level) {
                        *summary.pact.entry(tier).or_default() += count;
                    }
                }
                Some(caster_type) => shared_classes.push((class, progress, caster_type)),
                None => {}
            }
        }

        summary.shared = match shared_classes.as_slice() {
            [] => BTreeMap::new(),
            [(class, progress, _)] => casting.spell_slots(class.as_str(), progress.level),
            several => {
                let caster_level: u32 = several
                    .iter()
                    .map(|(_, progress, caster_type)| {
                        u32::from(caster_type.effective_caster_levels(progress.level))
                    })
                    .sum();
                casting.multiclass_spell_slots(caster_level.min(u32::from(u8::MAX)) as u8)
            }
        };
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compendium::{Compendium, CompendiumData, ItemDefinition};
    use crate::events::test_support::{ev, log};
    use crate::events::{
        AbilityScoreSet, ClassLevelGained, ItemPossessionRecorded, SkillProficiencySet,
    };
    use crate::game_systems::Dnd5eSystem;
    use crate::projections::Projection;
    use crate::value_objects::AbilityScore;
    use crate::ItemId;

    fn scores(entries: &[(Ability, i64, bool)]) -> AbilityScores {
        AbilityScores::project(&log(entries
            .iter()
            .enumerate()
            .map(|(i, &(ability, score, proficient))| {
                ev(i as u128 + 1, AbilityScoreSet {
                    ability,
                    score: AbilityScore::new(score).unwrap(),
                    proficient,
                })
            })
            .collect()))
    }

    fn levels(entries: &[(&str, u8, Option<&str>, Option<u8>)]) -> ClassLevels {
        ClassLevels::project(&log(entries
            .iter()
            .enumerate()
            .map(|(i, &(class, level, subclass, roll))| {
                ev(i as u128 + 1, ClassLevelGained {
                    class: ClassId::new(class).unwrap(),
                    level,
                    subclass: subclass.map(str::to_string),
                    hit_die_roll: roll,
                })
            })
            .collect()))
    }

    #[test]
    fn ability_summaries_include_saves() {
        let system = Dnd5eSystem::new();
        let rules = RulesEngine::new(&system);
        let scores = scores(&[(Ability::Wisdom, 16, true), (Ability::Strength, 8, false)]);
        let summaries = rules.abilities(&scores, 3);
        let wisdom = summaries.iter().find(|s| s.ability == Ability::Wisdom).unwrap();
        assert_eq!(wisdom.modifier, 3);
        assert_eq!(wisdom.saving_throw, 6);
        let strength = summaries.iter().find(|s| s.ability == Ability::Strength).unwrap();
        assert_eq!(strength.saving_throw, -1);
        assert_eq!(summaries.len(), 2);
    }

    #[test]
    fn skills_cover_the_whole_ruleset() {
        let system = Dnd5eSystem::new();
        let rules = RulesEngine::new(&system);
        let scores = scores(&[(Ability::Dexterity, 16, false)]);
        let proficiencies = SkillProficiencies::project(&log(vec![ev(1, SkillProficiencySet {
            skill: Skill::Stealth,
            proficiency: ProficiencyLevel::Expert,
        })]));
        let skills = rules.skills(&scores, &proficiencies, 2);
        assert_eq!(skills.len(), 18);
        let stealth = skills.iter().find(|s| s.skill == Skill::Stealth).unwrap();
        assert_eq!(stealth.bonus, 3 + 4);
        let acrobatics = skills.iter().find(|s| s.skill == Skill::Acrobatics).unwrap();
        assert_eq!(acrobatics.proficiency, ProficiencyLevel::None);
        assert_eq!(acrobatics.bonus, 3);
        // Missing WIS counts as 10
        assert_eq!(rules.passive_perception(&scores, &proficiencies, 2), 10);
    }

    #[test]
    fn proficiency_bonus_uses_total_level() {
        let system = Dnd5eSystem::new();
        let rules = RulesEngine::new(&system);
        assert_eq!(rules.proficiency_bonus(&ClassLevels::default()), 2);
        let multiclass = levels(&[("fighter", 3, None, None), ("wizard", 2, None, None)]);
        assert_eq!(rules.proficiency_bonus(&multiclass), 3);
    }

    #[test]
    fn max_hp_starts_from_first_class() {
        let system = Dnd5eSystem::new();
        let rules = RulesEngine::new(&system);
        let scores = scores(&[(Ability::Constitution, 14, false)]);
        // Wizard 1 first: 6 + 2, then fighter level 1 average 6 + 2
        let levels = levels(&[("wizard", 1, None, None), ("fighter", 1, None, None)]);
        assert_eq!(rules.max_hit_points(&levels, &scores), 16);
        let dice = rules.granted_hit_dice(&levels);
        assert_eq!(dice.get(&DieSize::D6), Some(&1));
        assert_eq!(dice.get(&DieSize::D10), Some(&1));
    }

    #[test]
    fn armor_class_from_held_items() {
        let system = Dnd5eSystem::new();
        let rules = RulesEngine::new(&system);
        let compendium = Compendium::new(CompendiumData {
            items: vec![
                ItemDefinition {
                    id: ItemId::new("half-plate").unwrap(),
                    name: "Half Plate".into(),
                    kind: ItemKind::Armor {
                        base_ac: 15,
                        max_dex_bonus: Some(2),
                        allows_dex: true,
                    },
                    max_charges: None,
                },
                ItemDefinition {
                    id: ItemId::new("shield").unwrap(),
                    name: "Shield".into(),
                    kind: ItemKind::Shield { bonus: 2 },
                    max_charges: None,
                },
            ],
            ..CompendiumData::default()
        });
        let hold = |id: &str, worn, wielded| ItemPossessionRecorded {
            item_id: ItemId::new(id).unwrap(),
            worn,
            wielded,
            dropped_at: None,
        };
        let scores = scores(&[(Ability::Dexterity, 16, false)]);

        let unarmored = Inventory::project(&log(vec![ev(1, hold("half-plate", false, false))]));
        assert_eq!(rules.armor_class(&scores, &unarmored, &compendium), 13);

        let armored = Inventory::project(&log(vec![
            ev(1, hold("half-plate", true, false)),
            ev(2, hold("shield", false, true)),
            ev(3, hold("mystery-cloak", true, false)),
        ]));
        assert_eq!(rules.armor_class(&scores, &armored, &compendium), 15 + 2 + 2);
    }

    #[test]
    fn casting_stats_per_class() {
        let system = Dnd5eSystem::new();
        let rules = RulesEngine::new(&system);
        let scores = scores(&[(Ability::Wisdom, 16, false)]);
        let levels = levels(&[("cleric", 5, None, None)]);
        let (class, progress) = levels.iter().next().unwrap();
        let stats = rules.casting_stats(class, progress, &scores, 3).unwrap();
        assert_eq!(stats.save_dc, 14);
        assert_eq!(stats.attack_bonus, 6);
        assert_eq!(stats.max_castable_level, Some(3));
    }

    #[test]
    fn subclass_gating_and_non_casters() {
        let system = Dnd5eSystem::new();
        let rules = RulesEngine::new(&system);
        let levels = levels(&[
            ("fighter", 3, Some("Champion"), None),
            ("rogue", 3, Some("Arcane Trickster"), None),
            ("barbarian", 2, None, None),
        ]);
        let casting: Vec<_> = levels
            .iter()
            .filter(|(class, progress)| rules.casts_spells(class, progress))
            .map(|(class, _)| class.as_str())
            .collect();
        assert_eq!(casting, vec!["rogue"]);
    }

    #[test]
    fn single_half_caster_uses_own_table_and_multiclass_combines() {
        let system = Dnd5eSystem::new();
        let rules = RulesEngine::new(&system);

        let paladin = levels(&[("paladin", 5, None, None)]);
        assert_eq!(rules.spell_slots(&paladin).shared, system.spell_slots("paladin", 5));

        // Wizard 3 + paladin 4: caster level 3 + 2 = 5
        let multiclass = levels(&[
            ("wizard", 3, None, None),
            ("paladin", 4, None, None),
            ("warlock", 2, None, None),
        ]);
        let summary = rules.spell_slots(&multiclass);
        assert_eq!(summary.shared, system.multiclass_spell_slots(5));
        assert_eq!(summary.pact.get(&1), Some(&2));
    }
}

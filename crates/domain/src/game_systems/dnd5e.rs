//! D&D 5th Edition game system implementation.
//!
//! Implements all calculation rules and spellcasting tables for D&D 5e.
//! Class ids are the lower-case class names ("wizard", "fighter", ...).

use super::traits::{
    CalculationEngine, CasterType, GameSystem, LevelHitDie, ProficiencyLevel, SpellcastingSystem,
};
use crate::value_objects::{Ability, DieSize, Skill};
use std::collections::BTreeMap;

/// D&D 5th Edition game system.
pub struct Dnd5eSystem;

impl Default for Dnd5eSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Dnd5eSystem {
    /// Create a new D&D 5e system instance.
    pub fn new() -> Self {
        Self
    }
}

impl GameSystem for Dnd5eSystem {
    fn system_id(&self) -> &str {
        "dnd5e"
    }

    fn display_name(&self) -> &str {
        "D&D 5th Edition"
    }

    fn calculation_engine(&self) -> &dyn CalculationEngine {
        self
    }

    fn spellcasting_system(&self) -> Option<&dyn SpellcastingSystem> {
        Some(self)
    }

    fn skills(&self) -> &[Skill] {
        &Skill::ALL
    }
}

impl CalculationEngine for Dnd5eSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        // Rust's / rounds toward zero, D&D floors
        (score - 10).div_euclid(2)
    }

    fn proficiency_bonus(&self, level: u8) -> i32 {
        let level = i32::from(level.max(1));
        ((level - 1) / 4) + 2
    }

    fn spell_save_dc(&self, proficiency_bonus: i32, casting_modifier: i32) -> i32 {
        8 + casting_modifier + proficiency_bonus
    }

    fn spell_attack_bonus(&self, proficiency_bonus: i32, casting_modifier: i32) -> i32 {
        casting_modifier + proficiency_bonus
    }

    fn calculate_ac(
        &self,
        dex_modifier: i32,
        armor_ac: Option<i32>,
        shield_bonus: Option<i32>,
        allows_dex: bool,
        max_dex_bonus: Option<i32>,
    ) -> i32 {
        let base_ac = match armor_ac {
            Some(ac) => {
                // Armor provides a base AC
                if allows_dex {
                    let dex_bonus = match max_dex_bonus {
                        Some(max) => dex_modifier.min(max),
                        None => dex_modifier,
                    };
                    ac + dex_bonus
                } else {
                    ac
                }
            }
            None => 10 + dex_modifier, // Unarmored: 10 + DEX (always applies)
        };

        base_ac + shield_bonus.unwrap_or(0)
    }

    fn skill_modifier(
        &self,
        ability_modifier: i32,
        proficiency_bonus: i32,
        proficiency_level: ProficiencyLevel,
    ) -> i32 {
        let prof_bonus = match proficiency_level {
            ProficiencyLevel::None => 0,
            ProficiencyLevel::Half => proficiency_bonus / 2,
            ProficiencyLevel::Proficient => proficiency_bonus,
            ProficiencyLevel::Expert => proficiency_bonus * 2,
        };

        ability_modifier + prof_bonus
    }

    fn saving_throw_modifier(
        &self,
        ability_modifier: i32,
        proficiency_bonus: i32,
        proficient: bool,
    ) -> i32 {
        if proficient {
            ability_modifier + proficiency_bonus
        } else {
            ability_modifier
        }
    }

    fn passive_perception(&self, perception_modifier: i32) -> i32 {
        10 + perception_modifier
    }

    fn hit_die(&self, class: &str) -> DieSize {
        match class.to_lowercase().as_str() {
            "barbarian" => DieSize::D12,
            "fighter" | "paladin" | "ranger" => DieSize::D10,
            "bard" | "cleric" | "druid" | "monk" | "rogue" | "warlock" => DieSize::D8,
            "sorcerer" | "wizard" => DieSize::D6,
            _ => DieSize::D8, // Default to d8
        }
    }

    fn calculate_max_hp(&self, levels: &[LevelHitDie], constitution_modifier: i32) -> i32 {
        let Some((first, rest)) = levels.split_first() else {
            return 0;
        };

        // First level: max hit die + CON mod
        // Subsequent levels: recorded roll (capped at the die) or average, + CON mod
        let first_level_hp = i32::from(first.die.sides()) + constitution_modifier;
        let subsequent_hp: i32 = rest
            .iter()
            .map(|level| {
                let roll = level
                    .roll
                    .map(|roll| i32::from(roll.min(level.die.sides())))
                    .unwrap_or_else(|| level.die.average_roll());
                roll + constitution_modifier
            })
            .sum();

        (first_level_hp + subsequent_hp).max(1)
    }
}

impl SpellcastingSystem for Dnd5eSystem {
    fn caster_type(&self, class: &str) -> Option<CasterType> {
        match class.to_lowercase().as_str() {
            "wizard" | "cleric" | "druid" | "sorcerer" | "bard" => Some(CasterType::Full),
            "paladin" | "ranger" => Some(CasterType::Half),
            "warlock" => Some(CasterType::Pact),
            // Only through their subclass, see `required_subclass`
            "fighter" | "rogue" => Some(CasterType::Third),
            _ => None,
        }
    }

    fn required_subclass(&self, class: &str) -> Option<&str> {
        match class.to_lowercase().as_str() {
            "fighter" => Some("eldritch knight"),
            "rogue" => Some("arcane trickster"),
            _ => None,
        }
    }

    fn spellcasting_ability(&self, class: &str) -> Option<Ability> {
        match class.to_lowercase().as_str() {
            "wizard" | "fighter" | "rogue" => Some(Ability::Intelligence),
            "cleric" | "druid" | "ranger" => Some(Ability::Wisdom),
            "sorcerer" | "bard" | "paladin" | "warlock" => Some(Ability::Charisma),
            _ => None,
        }
    }

    fn uses_spell_preparation(&self, class: &str) -> bool {
        matches!(
            class.to_lowercase().as_str(),
            "wizard" | "cleric" | "druid" | "paladin"
        )
    }

    fn uses_spellbook(&self, class: &str) -> bool {
        class.eq_ignore_ascii_case("wizard")
    }

    fn max_prepared_spells(&self, class: &str, level: u8, stat_mod: i32) -> u8 {
        let level = i32::from(level);
        match class.to_lowercase().as_str() {
            "wizard" | "cleric" | "druid" => (level + stat_mod).max(1) as u8,
            "paladin" => ((level / 2) + stat_mod).max(1) as u8,
            _ => 0,
        }
    }

    fn spell_slots(&self, class: &str, level: u8) -> BTreeMap<u8, u8> {
        match self.caster_type(class) {
            Some(CasterType::Full) => full_caster_slots(level),
            Some(CasterType::Half) => half_caster_slots(level),
            Some(CasterType::Third) => third_caster_slots(level),
            Some(CasterType::Pact) => warlock_slots(level),
            None => BTreeMap::new(),
        }
    }

    fn multiclass_spell_slots(&self, caster_level: u8) -> BTreeMap<u8, u8> {
        full_caster_slots(caster_level)
    }

    fn cantrips_known(&self, class: &str, level: u8) -> u8 {
        match class.to_lowercase().as_str() {
            "wizard" | "cleric" | "druid" => match level {
                1..=3 => 3,
                4..=9 => 4,
                _ => 5,
            },
            "sorcerer" => match level {
                1..=3 => 4,
                4..=9 => 5,
                _ => 6,
            },
            "bard" | "warlock" => match level {
                1..=3 => 2,
                4..=9 => 3,
                _ => 4,
            },
            "fighter" | "rogue" => match level {
                0..=2 => 0,
                3..=9 => 2,
                _ => 3,
            },
            _ => 0,
        }
    }

    fn spells_known(&self, class: &str, level: u8) -> Option<u8> {
        // Only some classes track spells known
        let table = match class.to_lowercase().as_str() {
            "sorcerer" => SORCERER_SPELLS_KNOWN,
            "bard" => BARD_SPELLS_KNOWN,
            "ranger" => RANGER_SPELLS_KNOWN,
            "warlock" => WARLOCK_SPELLS_KNOWN,
            "fighter" => ELDRITCH_KNIGHT_SPELLS_KNOWN,
            "rogue" => ARCANE_TRICKSTER_SPELLS_KNOWN,
            _ => return None, // Prepared casters don't have a limit
        };
        let index = usize::from(level.min(20));
        table.get(index).copied()
    }
}

// Spell slot progression tables

fn tier_counts(table: &[(u8, &[u8])], level: u8) -> BTreeMap<u8, u8> {
    table
        .iter()
        .find(|(l, _)| *l == level)
        .map(|(_, s)| {
            s.iter()
                .enumerate()
                .map(|(i, &count)| ((i + 1) as u8, count))
                .collect()
        })
        .unwrap_or_default()
}

fn full_caster_slots(level: u8) -> BTreeMap<u8, u8> {
    const SLOTS: &[(u8, &[u8])] = &[
        (1, &[2]),
        (2, &[3]),
        (3, &[4, 2]),
        (4, &[4, 3]),
        (5, &[4, 3, 2]),
        (6, &[4, 3, 3]),
        (7, &[4, 3, 3, 1]),
        (8, &[4, 3, 3, 2]),
        (9, &[4, 3, 3, 3, 1]),
        (10, &[4, 3, 3, 3, 2]),
        (11, &[4, 3, 3, 3, 2, 1]),
        (12, &[4, 3, 3, 3, 2, 1]),
        (13, &[4, 3, 3, 3, 2, 1, 1]),
        (14, &[4, 3, 3, 3, 2, 1, 1]),
        (15, &[4, 3, 3, 3, 2, 1, 1, 1]),
        (16, &[4, 3, 3, 3, 2, 1, 1, 1]),
        (17, &[4, 3, 3, 3, 2, 1, 1, 1, 1]),
        (18, &[4, 3, 3, 3, 3, 1, 1, 1, 1]),
        (19, &[4, 3, 3, 3, 3, 2, 1, 1, 1]),
        (20, &[4, 3, 3, 3, 3, 2, 2, 1, 1]),
    ];
    tier_counts(SLOTS, level.min(20))
}

fn half_caster_slots(level: u8) -> BTreeMap<u8, u8> {
    // Half casters get slots at half rate (starting at level 2)
    const SLOTS: &[(u8, &[u8])] = &[
        (2, &[2]),
        (3, &[3]),
        (4, &[3]),
        (5, &[4, 2]),
        (6, &[4, 2]),
        (7, &[4, 3]),
        (8, &[4, 3]),
        (9, &[4, 3, 2]),
        (10, &[4, 3, 2]),
        (11, &[4, 3, 3]),
        (12, &[4, 3, 3]),
        (13, &[4, 3, 3, 1]),
        (14, &[4, 3, 3, 1]),
        (15, &[4, 3, 3, 2]),
        (16, &[4, 3, 3, 2]),
        (17, &[4, 3, 3, 3, 1]),
        (18, &[4, 3, 3, 3, 1]),
        (19, &[4, 3, 3, 3, 2]),
        (20, &[4, 3, 3, 3, 2]),
    ];
    tier_counts(SLOTS, level.min(20))
}

fn third_caster_slots(level: u8) -> BTreeMap<u8, u8> {
    // Third casters (Eldritch Knight, Arcane Trickster)
    const SLOTS: &[(u8, &[u8])] = &[
        (3, &[2]),
        (4, &[3]),
        (5, &[3]),
        (6, &[3]),
        (7, &[4, 2]),
        (8, &[4, 2]),
        (9, &[4, 2]),
        (10, &[4, 3]),
        (11, &[4, 3]),
        (12, &[4, 3]),
        (13, &[4, 3, 2]),
        (14, &[4, 3, 2]),
        (15, &[4, 3, 2]),
        (16, &[4, 3, 3]),
        (17, &[4, 3, 3]),
        (18, &[4, 3, 3]),
        (19, &[4, 3, 3, 1]),
        (20, &[4, 3, 3, 1]),
    ];
    tier_counts(SLOTS, level.min(20))
}

fn warlock_slots(level: u8) -> BTreeMap<u8, u8> {
    // Warlock pact magic - fewer slots but higher level
    let (count, slot_level) = match level {
        1 => (1, 1),
        2 => (2, 1),
        3..=4 => (2, 2),
        5..=6 => (2, 3),
        7..=8 => (2, 4),
        9..=10 => (2, 5),
        11..=16 => (3, 5),
        17.. => (4, 5),
        0 => (0, 0),
    };

    let mut slots = BTreeMap::new();
    if count > 0 {
        slots.insert(slot_level, count);
    }
    slots
}

// Spells known tables (0-indexed, level 1 = index 1)
const SORCERER_SPELLS_KNOWN: &[u8] = &[
    0, // level 0 (unused)
    2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 12, 13, 13, 14, 14, 15, 15, 15, 15,
];

const BARD_SPELLS_KNOWN: &[u8] = &[
    0, // level 0
    4, 5, 6, 7, 8, 9, 10, 11, 12, 14, 15, 15, 16, 18, 19, 19, 20, 22, 22, 22,
];

const RANGER_SPELLS_KNOWN: &[u8] = &[
    0, // level 0
    0, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11,
];

const WARLOCK_SPELLS_KNOWN: &[u8] = &[
    0, // level 0
    2, 3, 4, 5, 6, 7, 8, 9, 10, 10, 11, 11, 12, 12, 13, 13, 14, 14, 15, 15,
];

const ELDRITCH_KNIGHT_SPELLS_KNOWN: &[u8] = &[
    0, // level 0
    0, 0, 3, 4, 4, 4, 5, 6, 6, 7, 8, 8, 9, 10, 10, 11, 11, 11, 12, 13,
];

const ARCANE_TRICKSTER_SPELLS_KNOWN: &[u8] = &[
    0, // level 0
    0, 0, 3, 4, 4, 4, 5, 6, 6, 7, 8, 8, 9, 10, 10, 11, 11, 11, 12, 13,
];

//! Game system traits for ruleset-specific mechanics.
//!
//! The rules engine only ever asks these traits, keyed by class id and
//! level. Rule variations between rulesets live entirely in the
//! implementations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::{Ability, DieSize, Skill};

/// Core trait all game systems must implement.
pub trait GameSystem: Send + Sync {
    /// Unique identifier for this game system (e.g., "dnd5e").
    fn system_id(&self) -> &str;

    /// Human-readable display name (e.g., "D&D 5th Edition").
    fn display_name(&self) -> &str;

    /// Get the calculation engine for this system.
    fn calculation_engine(&self) -> &dyn CalculationEngine;

    /// Optional: Get the spellcasting system if this system has spellcasting.
    fn spellcasting_system(&self) -> Option<&dyn SpellcastingSystem> {
        None
    }

    /// Skills used by this system, in sheet order.
    fn skills(&self) -> &[Skill];
}

/// Calculation rules that vary per game system.
pub trait CalculationEngine: Send + Sync {
    /// Calculate ability modifier from score.
    ///
    /// For D&D-like systems: floor((score - 10) / 2)
    fn ability_modifier(&self, score: i32) -> i32;

    /// Calculate proficiency bonus from total character level.
    ///
    /// For D&D 5e: ((level - 1) / 4) + 2
    fn proficiency_bonus(&self, level: u8) -> i32;

    /// Calculate spell save DC.
    ///
    /// For D&D 5e: 8 + proficiency + casting ability modifier
    fn spell_save_dc(&self, proficiency_bonus: i32, casting_modifier: i32) -> i32;

    /// Calculate spell attack bonus.
    ///
    /// For D&D 5e: proficiency + casting ability modifier
    fn spell_attack_bonus(&self, proficiency_bonus: i32, casting_modifier: i32) -> i32;

    /// Calculate Armor Class from the dexterity modifier and equipment.
    fn calculate_ac(
        &self,
        dex_modifier: i32,
        armor_ac: Option<i32>,
        shield_bonus: Option<i32>,
        allows_dex: bool,
        max_dex_bonus: Option<i32>,
    ) -> i32;

    /// Calculate skill check modifier.
    fn skill_modifier(
        &self,
        ability_modifier: i32,
        proficiency_bonus: i32,
        proficiency_level: ProficiencyLevel,
    ) -> i32;

    /// Calculate saving throw modifier.
    fn saving_throw_modifier(
        &self,
        ability_modifier: i32,
        proficiency_bonus: i32,
        proficient: bool,
    ) -> i32;

    /// Calculate passive perception from the Perception skill modifier.
    fn passive_perception(&self, perception_modifier: i32) -> i32;

    /// Get the hit die size for a class.
    fn hit_die(&self, class: &str) -> DieSize;

    /// Calculate max HP from per-level hit die results.
    ///
    /// `levels` lists every character level in the order gained; the first
    /// entry is the character's first level.
    fn calculate_max_hp(&self, levels: &[LevelHitDie], constitution_modifier: i32) -> i32;
}

/// The hit die and recorded roll for one gained character level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelHitDie {
    pub die: DieSize,
    pub roll: Option<u8>,
}

/// Proficiency level for skills.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProficiencyLevel {
    /// Not proficient
    #[default]
    None,
    /// Half proficiency (Jack of All Trades, etc.)
    Half,
    /// Standard proficiency
    Proficient,
    /// Expertise (double proficiency)
    Expert,
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Half => write!(f, "half"),
            Self::Proficient => write!(f, "proficient"),
            Self::Expert => write!(f, "expert"),
        }
    }
}

impl FromStr for ProficiencyLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "half" => Ok(Self::Half),
            "proficient" => Ok(Self::Proficient),
            "expert" | "expertise" => Ok(Self::Expert),
            _ => Err(DomainError::parse(format!("Unknown proficiency level: {}", s))),
        }
    }
}

/// For systems with spellcasting.
pub trait SpellcastingSystem: Send + Sync {
    /// Get the caster type for a class (if it has spellcasting).
    fn caster_type(&self, class: &str) -> Option<CasterType>;

    /// Subclass a class needs before it gains spellcasting, if any.
    fn required_subclass(&self, class: &str) -> Option<&str>;

    /// Get the spellcasting ability for a class.
    fn spellcasting_ability(&self, class: &str) -> Option<Ability>;

    /// Whether this class uses spell preparation.
    fn uses_spell_preparation(&self, class: &str) -> bool;

    /// Whether this class records spells in a spellbook.
    fn uses_spellbook(&self, class: &str) -> bool;

    /// Calculate maximum prepared spells for a class.
    fn max_prepared_spells(&self, class: &str, level: u8, stat_mod: i32) -> u8;

    /// Get spell slots (tier -> count) for a class at a given level.
    fn spell_slots(&self, class: &str, level: u8) -> BTreeMap<u8, u8>;

    /// Shared slots for a combined multiclass caster level.
    fn multiclass_spell_slots(&self, caster_level: u8) -> BTreeMap<u8, u8>;

    /// Get cantrips known for a class at a given level.
    fn cantrips_known(&self, class: &str, level: u8) -> u8;

    /// Get spells known for a class at a given level (for known-spell casters).
    fn spells_known(&self, class: &str, level: u8) -> Option<u8>;
}

/// Type of spellcaster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CasterType {
    /// Full caster (Wizard, Cleric, Druid, Sorcerer, Bard)
    Full,
    /// Half caster (Paladin, Ranger)
    Half,
    /// Third caster (Eldritch Knight, Arcane Trickster)
    Third,
    /// Pact magic (Warlock)
    Pact,
}

impl CasterType {
    /// Get the caster level for multiclassing calculations.
    pub fn effective_caster_levels(&self, class_level: u8) -> u8 {
        match self {
            CasterType::Full => class_level,
            CasterType::Half => class_level / 2,
            CasterType::Third => class_level / 3,
            CasterType::Pact => 0, // Warlock doesn't contribute to multiclass slots
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_caster_levels() {
        assert_eq!(CasterType::Full.effective_caster_levels(5), 5);
        assert_eq!(CasterType::Half.effective_caster_levels(5), 2);
        assert_eq!(CasterType::Third.effective_caster_levels(8), 2);
        assert_eq!(CasterType::Pact.effective_caster_levels(10), 0);
    }

    #[test]
    fn proficiency_level_parsing() {
        assert_eq!("Expertise".parse::<ProficiencyLevel>().unwrap(), ProficiencyLevel::Expert);
        assert_eq!("half".parse::<ProficiencyLevel>().unwrap(), ProficiencyLevel::Half);
        assert!("master".parse::<ProficiencyLevel>().is_err());
    }
}

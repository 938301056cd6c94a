//! Character event payloads, one per attribute domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::game_systems::ProficiencyLevel;
use crate::value_objects::{Ability, AbilityScore, CoinPurse, DieSize, Skill};
use crate::{ClassId, ItemId, SpellId};

/// An ability score was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityScoreSet {
    pub ability: Ability,
    pub score: AbilityScore,
    /// Saving throw proficiency for this ability.
    pub proficient: bool,
}

/// A skill's proficiency level was set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillProficiencySet {
    pub skill: Skill,
    pub proficiency: ProficiencyLevel,
}

/// Coins gained or spent. Every field is a delta.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinsChanged {
    #[serde(flatten)]
    pub delta: CoinPurse,
}

/// Damage (negative) or healing (positive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPointsChanged {
    pub delta: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitDieAction {
    Use,
    Restore,
}

impl fmt::Display for HitDieAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Use => write!(f, "use"),
            Self::Restore => write!(f, "restore"),
        }
    }
}

impl FromStr for HitDieAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "use" => Ok(Self::Use),
            "restore" => Ok(Self::Restore),
            _ => Err(DomainError::parse(format!("Unknown hit die action: {}", s))),
        }
    }
}

/// A hit die was spent or regained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDieChanged {
    pub die: DieSize,
    pub action: HitDieAction,
}

/// The possession state of an item was recorded.
///
/// An item is held while the latest record has no `dropped_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPossessionRecorded {
    pub item_id: ItemId,
    pub worn: bool,
    pub wielded: bool,
    pub dropped_at: Option<DateTime<Utc>>,
}

/// Charges spent (negative) or recovered (positive) on an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemChargesChanged {
    pub item_id: ItemId,
    pub delta: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellbookAction {
    Learn,
    Forget,
}

impl FromStr for SpellbookAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learn" => Ok(Self::Learn),
            "forget" => Ok(Self::Forget),
            _ => Err(DomainError::parse(format!("Unknown spellbook action: {}", s))),
        }
    }
}

/// A spell was copied into or removed from the spellbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellbookChanged {
    pub spell_id: SpellId,
    pub action: SpellbookAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreparationAction {
    Prepare,
    Unprepare,
}

impl FromStr for PreparationAction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "prepare" => Ok(Self::Prepare),
            "unprepare" => Ok(Self::Unprepare),
            _ => Err(DomainError::parse(format!("Unknown preparation action: {}", s))),
        }
    }
}

/// A spell was prepared or unprepared for one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellPreparationChanged {
    pub class: ClassId,
    pub spell_id: SpellId,
    pub action: PreparationAction,
    /// Granted by a feature; stays prepared and takes no slot.
    pub always_prepared: bool,
}

/// A level was gained in a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassLevelGained {
    pub class: ClassId,
    pub level: u8,
    pub subclass: Option<String>,
    /// The hit die result rolled for this level, when one was rolled.
    pub hit_die_roll: Option<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    PersonalityTrait,
    Ideal,
    Bond,
    Flaw,
}

impl FromStr for TraitKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(' ', "_").as_str() {
            "personality_trait" | "personality" => Ok(Self::PersonalityTrait),
            "ideal" => Ok(Self::Ideal),
            "bond" => Ok(Self::Bond),
            "flaw" => Ok(Self::Flaw),
            _ => Err(DomainError::parse(format!("Unknown trait kind: {}", s))),
        }
    }
}

/// A personality trait, ideal, bond or flaw was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitRecorded {
    pub kind: TraitKind,
    pub text: String,
}

/// A free-form journal note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteWritten {
    pub title: Option<String>,
    pub body: String,
}

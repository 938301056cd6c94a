//! The six ability scores and their validated values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Inclusive bounds for a recorded ability score.
const MIN_ABILITY_SCORE: i64 = 1;
const MAX_ABILITY_SCORE: i64 = 30;

/// One of the six core abilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

impl Ability {
    pub const ALL: [Ability; 6] = [
        Ability::Strength,
        Ability::Dexterity,
        Ability::Constitution,
        Ability::Intelligence,
        Ability::Wisdom,
        Ability::Charisma,
    ];

    /// Three-letter abbreviation ("STR", "DEX", ...).
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::Strength => "STR",
            Self::Dexterity => "DEX",
            Self::Constitution => "CON",
            Self::Intelligence => "INT",
            Self::Wisdom => "WIS",
            Self::Charisma => "CHA",
        }
    }
}

impl fmt::Display for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for Ability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "str" | "strength" => Ok(Self::Strength),
            "dex" | "dexterity" => Ok(Self::Dexterity),
            "con" | "constitution" => Ok(Self::Constitution),
            "int" | "intelligence" => Ok(Self::Intelligence),
            "wis" | "wisdom" => Ok(Self::Wisdom),
            "cha" | "charisma" => Ok(Self::Charisma),
            _ => Err(DomainError::parse(format!("Unknown ability: {}", s))),
        }
    }
}

/// A validated ability score (1–30).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct AbilityScore(u8);

impl AbilityScore {
    /// Create a validated ability score.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` when the score is outside 1–30.
    pub fn new(score: i64) -> Result<Self, DomainError> {
        if !(MIN_ABILITY_SCORE..=MAX_ABILITY_SCORE).contains(&score) {
            return Err(DomainError::validation(format!(
                "Ability score must be between {} and {}, got {}",
                MIN_ABILITY_SCORE, MAX_ABILITY_SCORE, score
            )));
        }
        Ok(Self(score as u8))
    }

    pub fn value(&self) -> i32 {
        i32::from(self.0)
    }
}

impl TryFrom<i64> for AbilityScore {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AbilityScore> for i64 {
    fn from(score: AbilityScore) -> i64 {
        i64::from(score.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_names_and_abbreviations() {
        assert_eq!("STR".parse::<Ability>().unwrap(), Ability::Strength);
        assert_eq!("wisdom".parse::<Ability>().unwrap(), Ability::Wisdom);
        assert_eq!(" Cha ".parse::<Ability>().unwrap(), Ability::Charisma);
        assert!("luck".parse::<Ability>().is_err());
    }

    #[test]
    fn score_bounds() {
        assert!(AbilityScore::new(0).is_err());
        assert!(AbilityScore::new(31).is_err());
        assert_eq!(AbilityScore::new(1).unwrap().value(), 1);
        assert_eq!(AbilityScore::new(30).unwrap().value(), 30);
    }
}

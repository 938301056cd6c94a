//! Hit die sizes.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// A polyhedral die size usable as a hit die (d6, d8, d10, d12).
///
/// d4 is accepted as well since some rulesets grant it to familiars and
/// similar companions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct DieSize(u8);

impl DieSize {
    pub const D4: DieSize = DieSize(4);
    pub const D6: DieSize = DieSize(6);
    pub const D8: DieSize = DieSize(8);
    pub const D10: DieSize = DieSize(10);
    pub const D12: DieSize = DieSize(12);

    pub fn new(sides: i64) -> Result<Self, DomainError> {
        match sides {
            4 | 6 | 8 | 10 | 12 => Ok(Self(sides as u8)),
            _ => Err(DomainError::validation(format!(
                "Hit die must be one of d4, d6, d8, d10, d12, got d{}",
                sides
            ))),
        }
    }

    pub fn sides(&self) -> u8 {
        self.0
    }

    /// Fixed per-level value (half the die, rounded up).
    pub fn average_roll(&self) -> i32 {
        i32::from(self.0) / 2 + 1
    }
}

impl fmt::Display for DieSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

impl TryFrom<i64> for DieSize {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DieSize> for i64 {
    fn from(die: DieSize) -> i64 {
        i64::from(die.0)
    }
}

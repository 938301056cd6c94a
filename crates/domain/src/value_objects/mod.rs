//! Value objects shared by events, projections and rules.

mod ability;
mod coins;
mod dice;
mod skill;

pub use ability::{Ability, AbilityScore};
pub use coins::CoinPurse;
pub use dice::DieSize;
pub use skill::Skill;

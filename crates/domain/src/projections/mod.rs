//! Per-domain projections.
//!
//! Each projection configures one of the strategies in [`crate::reduction`]
//! for a single event domain and wraps the result in a typed current-state
//! value. Projections are independent of each other; combining them is the
//! snapshot composer's job.

mod abilities;
mod class_levels;
mod coins;
mod hit_dice;
mod hit_points;
mod inventory;
mod notes;
mod skills;
mod spells;
mod traits;

pub use abilities::{AbilityScores, AbilityState};
pub use class_levels::{ClassLevels, ClassProgress};
pub use hit_dice::{HitDiceCount, HitDicePool};
pub use hit_points::HitPointOffset;
pub use inventory::{Inventory, ItemCharges, Possession};
pub use notes::{Note, Notes};
pub use skills::SkillProficiencies;
pub use spells::{PreparedSpell, PreparedSpells, Spellbook};
pub use traits::Traits;

use crate::events::EventLog;

/// Current state of one domain, derived from that domain's log.
pub trait Projection<T>: Sized {
    fn project(log: &EventLog<T>) -> Self;
}

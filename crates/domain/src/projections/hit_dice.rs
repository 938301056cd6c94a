use serde::Serialize;
use std::collections::BTreeMap;

use crate::events::{EventLog, HitDieAction, HitDieChanged};
use crate::value_objects::DieSize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitDiceCount {
    pub available: u32,
    pub total: u32,
}

/// Available and granted hit dice per die size.
///
/// Each `use` removes one die of its size and each `restore` returns one.
/// Availability stays within `0..=granted`; events for a size the character
/// was never granted have no effect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HitDicePool(BTreeMap<DieSize, HitDiceCount>);

impl HitDicePool {
    pub fn project(granted: &BTreeMap<DieSize, u32>, log: &EventLog<HitDieChanged>) -> Self {
        let mut pool: BTreeMap<DieSize, HitDiceCount> = granted
            .iter()
            .filter(|(_, total)| **total > 0)
            .map(|(&die, &total)| {
                let count = HitDiceCount {
                    available: total,
                    total,
                };
                (die, count)
            })
            .collect();

        // Clamp after every event so each prefix is a valid pool on its own.
        for event in log {
            let Some(count) = pool.get_mut(&event.payload.die) else {
                continue;
            };
            count.available = match event.payload.action {
                HitDieAction::Use => count.available.saturating_sub(1),
                HitDieAction::Restore => (count.available + 1).min(count.total),
            };
        }
        Self(pool)
    }

    pub fn get(&self, die: DieSize) -> HitDiceCount {
        self.0.get(&die).copied().unwrap_or_default()
    }

    /// Every available die as a multiset, smallest first.
    pub fn available_dice(&self) -> Vec<DieSize> {
        self.0
            .iter()
            .flat_map(|(&die, count)| std::iter::repeat(die).take(count.available as usize))
            .collect()
    }

    pub fn total_dice(&self) -> Vec<DieSize> {
        self.0
            .iter()
            .flat_map(|(&die, count)| std::iter::repeat(die).take(count.total as usize))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DieSize, &HitDiceCount)> {
        self.0.iter()
    }
}

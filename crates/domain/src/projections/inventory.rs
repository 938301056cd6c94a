use serde::Serialize;
use std::collections::BTreeMap;

use super::Projection;
use crate::events::{Event, EventLog, ItemChargesChanged, ItemPossessionRecorded};
use crate::reduction::{LatestWins, Reduction, SignedSum};
use crate::ItemId;

/// Equip state of a held item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Possession {
    pub worn: bool,
    pub wielded: bool,
}

impl Possession {
    pub fn is_equipped(&self) -> bool {
        self.worn || self.wielded
    }
}

/// Items whose latest possession record has not been dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Inventory(BTreeMap<ItemId, Possession>);

impl Inventory {
    pub fn get(&self, item: &ItemId) -> Option<&Possession> {
        self.0.get(item)
    }

    pub fn contains(&self, item: &ItemId) -> bool {
        self.0.contains_key(item)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &Possession)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Projection<ItemPossessionRecorded> for Inventory {
    fn project(log: &EventLog<ItemPossessionRecorded>) -> Self {
        let latest = LatestWins::new(
            |e: &Event<ItemPossessionRecorded>| e.payload.item_id.clone(),
            |e: &Event<ItemPossessionRecorded>| match e.payload.dropped_at {
                Some(_) => None,
                None => Some(Possession {
                    worn: e.payload.worn,
                    wielded: e.payload.wielded,
                }),
            },
        );
        Self(
            latest
                .reduce(log)
                .into_iter()
                .filter_map(|(item, possession)| possession.map(|p| (item, p)))
                .collect(),
        )
    }
}

/// Remaining charges per item, never below zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ItemCharges(BTreeMap<ItemId, u32>);

impl ItemCharges {
    pub fn get(&self, item: &ItemId) -> Option<u32> {
        self.0.get(item).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &u32)> {
        self.0.iter()
    }
}

impl Projection<ItemChargesChanged> for ItemCharges {
    fn project(log: &EventLog<ItemChargesChanged>) -> Self {
        let sums = SignedSum::new(
            |e: &Event<ItemChargesChanged>| e.payload.item_id.clone(),
            |e: &Event<ItemChargesChanged>| i64::from(e.payload.delta),
        )
        .reduce(log);
        Self(
            sums.into_iter()
                .map(|(item, total)| (item, total.clamp(0, i64::from(u32::MAX)) as u32))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::test_support::{at, ev, log};

    fn item(id: &str) -> ItemId {
        ItemId::new(id).unwrap()
    }

    fn held(id: &str, worn: bool, wielded: bool) -> ItemPossessionRecorded {
        ItemPossessionRecorded {
            item_id: item(id),
            worn,
            wielded,
            dropped_at: None,
        }
    }

    fn dropped(id: &str) -> ItemPossessionRecorded {
        ItemPossessionRecorded {
            dropped_at: Some(at(99)),
            ..held(id, false, false)
        }
    }

    #[test]
    fn dropped_items_leave_inventory() {
        let inventory = Inventory::project(&log(vec![
            ev(1, held("longsword", false, true)),
            ev(2, held("rope", false, false)),
            ev(3, dropped("rope")),
        ]));
        assert!(inventory.contains(&item("longsword")));
        assert!(!inventory.contains(&item("rope")));
        assert_eq!(inventory.len(), 1);
    }

    #[test]
    fn picked_up_again_after_drop() {
        let inventory = Inventory::project(&log(vec![
            ev(1, dropped("shield")),
            ev(2, held("shield", false, true)),
        ]));
        let shield = inventory.get(&item("shield")).unwrap();
        assert!(shield.wielded);
        assert!(shield.is_equipped());
    }

    #[test]
    fn charges_sum_per_item_and_floor_at_zero() {
        let charge = |id: &str, delta| ItemChargesChanged {
            item_id: item(id),
            delta,
        };
        let charges = ItemCharges::project(&log(vec![
            ev(1, charge("wand", 7)),
            ev(2, charge("wand", -2)),
            ev(3, charge("staff", -3)),
        ]));
        assert_eq!(charges.get(&item("wand")), Some(5));
        assert_eq!(charges.get(&item("staff")), Some(0));
        assert_eq!(charges.get(&item("ring")), None);
    }
}

//! Spellbook and prepared-spell accounting per casting class.
//!
//! For every class that currently grants spellcasting this produces a
//! fixed-length cantrip slot array, a fixed-length leveled slot array and,
//! for spellbook classes, the full spellbook. Cantrips and leveled spells
//! are filled independently with the same algorithm:
//!
//! 1. always-prepared spells first, outside capacity
//! 2. chosen spells in membership order, up to capacity
//! 3. empty slots for the remaining capacity
//!
//! Chosen spells beyond capacity are left out of the slot array and listed
//! in `overflow`, so the array length is always capacity plus the number
//! of always-prepared spells.

use serde::Serialize;

use crate::compendium::{ReferenceData, Resolved};
use crate::projections::{
    AbilityScores, ClassLevels, ClassProgress, PreparedSpell, PreparedSpells, Spellbook,
};
use crate::rules::{CastingStats, RulesEngine};
use crate::{ClassId, SpellId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellSlot {
    /// `None` for an unfilled slot.
    pub spell: Option<Resolved<SpellId>>,
    pub always_prepared: bool,
}

impl SpellSlot {
    pub fn empty() -> Self {
        Self {
            spell: None,
            always_prepared: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.spell.is_none()
    }
}

/// Filled slots for one spell tier group of one class.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotAllocation {
    pub capacity: usize,
    pub slots: Vec<SpellSlot>,
    /// Chosen spells that did not fit within capacity.
    pub overflow: Vec<Resolved<SpellId>>,
}

impl SlotAllocation {
    pub fn is_over_capacity(&self) -> bool {
        !self.overflow.is_empty()
    }

    pub fn filled(&self) -> impl Iterator<Item = &Resolved<SpellId>> {
        self.slots.iter().filter_map(|slot| slot.spell.as_ref())
    }
}

/// Lay out slots: always-prepared first, then chosen up to capacity, then
/// empty slots.
pub fn fill_slots(
    always_prepared: Vec<Resolved<SpellId>>,
    chosen: Vec<Resolved<SpellId>>,
    capacity: usize,
) -> SlotAllocation {
    let mut slots: Vec<SpellSlot> = always_prepared
        .into_iter()
        .map(|spell| SpellSlot {
            spell: Some(spell),
            always_prepared: true,
        })
        .collect();

    let mut chosen = chosen.into_iter();
    slots.extend(chosen.by_ref().take(capacity).map(|spell| SpellSlot {
        spell: Some(spell),
        always_prepared: false,
    }));
    let overflow: Vec<_> = chosen.collect();

    let filled_chosen = slots.iter().filter(|slot| !slot.always_prepared).count();
    slots.extend((filled_chosen..capacity).map(|_| SpellSlot::empty()));

    SlotAllocation {
        capacity,
        slots,
        overflow,
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassSpellcasting {
    pub class: ClassId,
    pub level: u8,
    #[serde(flatten)]
    pub stats: CastingStats,
    pub cantrips: SlotAllocation,
    pub prepared: SlotAllocation,
    /// Present only for classes that keep a spellbook.
    pub spellbook: Option<Vec<Resolved<SpellId>>>,
}

/// Inputs the spellcasting projection reads.
pub struct SpellcastingInput<'a> {
    pub classes: &'a ClassLevels,
    pub abilities: &'a AbilityScores,
    pub prepared: &'a PreparedSpells,
    pub spellbook: &'a Spellbook,
    pub proficiency_bonus: i32,
}

/// Spellcasting for every class that currently casts, in class order.
///
/// Classes without spellcasting, or without the subclass their
/// spellcasting requires, are absent from the result.
pub fn project_spellcasting(
    rules: &RulesEngine<'_>,
    reference: &dyn ReferenceData,
    input: &SpellcastingInput<'_>,
) -> Vec<ClassSpellcasting> {
    input
        .classes
        .iter()
        .filter_map(|(class, progress)| class_spellcasting(rules, reference, input, class, progress))
        .collect()
}

fn class_spellcasting(
    rules: &RulesEngine<'_>,
    reference: &dyn ReferenceData,
    input: &SpellcastingInput<'_>,
    class: &ClassId,
    progress: &ClassProgress,
) -> Option<ClassSpellcasting> {
    let stats = rules.casting_stats(class, progress, input.abilities, input.proficiency_bonus)?;
    let casting = rules.spellcasting()?;
    let class_key = class.as_str();

    let cantrip_capacity = usize::from(casting.cantrips_known(class_key, progress.level));
    let leveled_capacity = if stats.max_castable_level.is_none() {
        0
    } else if casting.uses_spell_preparation(class_key) {
        usize::from(casting.max_prepared_spells(
            class_key,
            progress.level,
            stats.ability_modifier,
        ))
    } else {
        usize::from(casting.spells_known(class_key, progress.level).unwrap_or(0))
    };

    let mut cantrips = TierGroup::default();
    let mut leveled = TierGroup::default();
    for PreparedSpell {
        spell_id,
        always_prepared,
    } in input.prepared.for_class(class)
    {
        // Spells missing from the dataset count as leveled
        let is_cantrip = reference
            .spell(&spell_id)
            .is_some_and(|definition| definition.is_cantrip());
        let group = if is_cantrip { &mut cantrips } else { &mut leveled };
        group.push(reference.resolve_spell(&spell_id), always_prepared);
    }

    let spellbook = casting.uses_spellbook(class_key).then(|| {
        input
            .spellbook
            .spells()
            .map(|spell| reference.resolve_spell(spell))
            .collect()
    });

    Some(ClassSpellcasting {
        class: class.clone(),
        level: progress.level,
        stats,
        cantrips: cantrips.fill(cantrip_capacity),
        prepared: leveled.fill(leveled_capacity),
        spellbook,
    })
}

#[derive(Default)]
struct TierGroup {
    always_prepared: Vec<Resolved<SpellId>>,
    chosen: Vec<Resolved<SpellId>>,
}

impl TierGroup {
    fn push(&mut self, spell: Resolved<SpellId>, always_prepared: bool) {
        if always_prepared {
            self.always_prepared.push(spell);
        } else {
            self.chosen.push(spell);
        }
    }

    fn fill(self, capacity: usize) -> SlotAllocation {
        fill_slots(self.always_prepared, self.chosen, capacity)
    }
}

//! Composed, read-only view of a character at one point in time.
//!
//! [`SnapshotComposer`] runs every projection, the spellcasting projection
//! and the rules engine over one character's event logs. Composition is
//! pure: it never reorders or revalidates events, and unknown reference ids
//! become fallback entries listed in [`CharacterSnapshot::unresolved`]
//! instead of errors.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::character::CharacterProfile;
use crate::compendium::{ReferenceData, Resolved};
use crate::events::{
    AbilityScoreSet, ClassLevelGained, CoinsChanged, EventLog, HitDieChanged, HitPointsChanged,
    ItemChargesChanged, ItemPossessionRecorded, NoteWritten, SkillProficiencySet,
    SpellPreparationChanged, SpellbookChanged, TraitRecorded,
};
use crate::game_systems::GameSystem;
use crate::projections::{
    AbilityScores, ClassLevels, HitDicePool, HitPointOffset, Inventory, ItemCharges, Notes,
    PreparedSpells, Projection, SkillProficiencies, Spellbook, Traits,
};
use crate::rules::{AbilitySummary, RulesEngine, SkillSummary, SpellSlotSummary};
use crate::spellcasting::{project_spellcasting, ClassSpellcasting, SpellcastingInput};
use crate::value_objects::CoinPurse;
use crate::{BackgroundId, CharacterId, ItemId, SpeciesId};

/// Every event log of one character.
///
/// Doubles as the history view: each log serializes as its chronological
/// event list, unmodified.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterEvents {
    pub abilities: EventLog<AbilityScoreSet>,
    pub skills: EventLog<SkillProficiencySet>,
    pub coins: EventLog<CoinsChanged>,
    pub hit_points: EventLog<HitPointsChanged>,
    pub hit_dice: EventLog<HitDieChanged>,
    pub item_possession: EventLog<ItemPossessionRecorded>,
    pub item_charges: EventLog<ItemChargesChanged>,
    pub spellbook: EventLog<SpellbookChanged>,
    pub prepared_spells: EventLog<SpellPreparationChanged>,
    pub class_levels: EventLog<ClassLevelGained>,
    pub traits: EventLog<TraitRecorded>,
    pub notes: EventLog<NoteWritten>,
}

impl CharacterEvents {
    /// The logs as they stood at `at`.
    pub fn as_of(&self, at: DateTime<Utc>) -> Self {
        Self {
            abilities: self.abilities.as_of(at),
            skills: self.skills.as_of(at),
            coins: self.coins.as_of(at),
            hit_points: self.hit_points.as_of(at),
            hit_dice: self.hit_dice.as_of(at),
            item_possession: self.item_possession.as_of(at),
            item_charges: self.item_charges.as_of(at),
            spellbook: self.spellbook.as_of(at),
            prepared_spells: self.prepared_spells.as_of(at),
            class_levels: self.class_levels.as_of(at),
            traits: self.traits.as_of(at),
            notes: self.notes.as_of(at),
        }
    }

    pub fn total_events(&self) -> usize {
        self.abilities.len()
            + self.skills.len()
            + self.coins.len()
            + self.hit_points.len()
            + self.hit_dice.len()
            + self.item_possession.len()
            + self.item_charges.len()
            + self.spellbook.len()
            + self.prepared_spells.len()
            + self.class_levels.len()
            + self.traits.len()
            + self.notes.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: CharacterId,
    pub name: String,
    pub species: Option<Resolved<SpeciesId>>,
    pub background: Option<Resolved<BackgroundId>>,
    /// Walking speed from the species, when known.
    pub speed: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPointsView {
    pub current: i32,
    pub max: i32,
    /// Net damage and healing relative to `max`.
    pub offset: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryEntry {
    pub item: Resolved<ItemId>,
    pub worn: bool,
    pub wielded: bool,
    pub charges: Option<u32>,
    pub max_charges: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Spell,
    Item,
    Species,
    Background,
}

/// A reference id that the dataset could not resolve.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnresolvedReference {
    pub kind: ReferenceKind,
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterSnapshot {
    profile: ProfileView,
    total_level: u8,
    proficiency_bonus: i32,
    classes: ClassLevels,
    abilities: Vec<AbilitySummary>,
    skills: Vec<SkillSummary>,
    hit_points: HitPointsView,
    hit_dice: HitDicePool,
    coins: CoinPurse,
    inventory: Vec<InventoryEntry>,
    armor_class: i32,
    initiative: i32,
    passive_perception: i32,
    spellcasting: Vec<ClassSpellcasting>,
    spell_slots: SpellSlotSummary,
    traits: Traits,
    notes: Notes,
    unresolved: Vec<UnresolvedReference>,
    history: CharacterEvents,
}

impl CharacterSnapshot {
    pub fn profile(&self) -> &ProfileView {
        &self.profile
    }

    pub fn total_level(&self) -> u8 {
        self.total_level
    }

    pub fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    pub fn classes(&self) -> &ClassLevels {
        &self.classes
    }

    pub fn abilities(&self) -> &[AbilitySummary] {
        &self.abilities
    }

    pub fn skills(&self) -> &[SkillSummary] {
        &self.skills
    }

    pub fn hit_points(&self) -> HitPointsView {
        self.hit_points
    }

    pub fn hit_dice(&self) -> &HitDicePool {
        &self.hit_dice
    }

    pub fn coins(&self) -> CoinPurse {
        self.coins
    }

    pub fn inventory(&self) -> &[InventoryEntry] {
        &self.inventory
    }

    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    pub fn initiative(&self) -> i32 {
        self.initiative
    }

    pub fn passive_perception(&self) -> i32 {
        self.passive_perception
    }

    pub fn spellcasting(&self) -> &[ClassSpellcasting] {
        &self.spellcasting
    }

    pub fn spellcasting_for(&self, class: &str) -> Option<&ClassSpellcasting> {
        self.spellcasting
            .iter()
            .find(|entry| entry.class.as_str().eq_ignore_ascii_case(class))
    }

    pub fn spell_slots(&self) -> &SpellSlotSummary {
        &self.spell_slots
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    /// Reference ids the dataset did not know, sorted and deduplicated.
    pub fn unresolved(&self) -> &[UnresolvedReference] {
        &self.unresolved
    }

    pub fn history(&self) -> &CharacterEvents {
        &self.history
    }
}

/// Builds snapshots from a ruleset and a reference dataset.
pub struct SnapshotComposer<'a> {
    system: &'a dyn GameSystem,
    reference: &'a dyn ReferenceData,
}

impl<'a> SnapshotComposer<'a> {
    pub fn new(system: &'a dyn GameSystem, reference: &'a dyn ReferenceData) -> Self {
        Self { system, reference }
    }

    pub fn compose(&self, profile: &CharacterProfile, events: CharacterEvents) -> CharacterSnapshot {
        let rules = RulesEngine::new(self.system);
        let reference = self.reference;

        let ability_scores = AbilityScores::project(&events.abilities);
        let skill_levels = SkillProficiencies::project(&events.skills);
        let classes = ClassLevels::project(&events.class_levels);
        let held = Inventory::project(&events.item_possession);
        let charges = ItemCharges::project(&events.item_charges);
        let prepared = PreparedSpells::project(&events.prepared_spells);
        let spellbook = Spellbook::project(&events.spellbook);

        let proficiency_bonus = rules.proficiency_bonus(&classes);
        let max_hit_points = rules.max_hit_points(&classes, &ability_scores);
        let offset = HitPointOffset::project(&events.hit_points);
        let hit_dice = HitDicePool::project(&rules.granted_hit_dice(&classes), &events.hit_dice);

        let inventory: Vec<InventoryEntry> = held
            .iter()
            .map(|(item_id, possession)| InventoryEntry {
                item: reference.resolve_item(item_id),
                worn: possession.worn,
                wielded: possession.wielded,
                charges: charges.get(item_id),
                max_charges: reference.item(item_id).and_then(|item| item.max_charges),
            })
            .collect();

        let spellcasting = project_spellcasting(
            &rules,
            reference,
            &SpellcastingInput {
                classes: &classes,
                abilities: &ability_scores,
                prepared: &prepared,
                spellbook: &spellbook,
                proficiency_bonus,
            },
        );

        let species = profile.species_id().map(|id| reference.resolve_species(id));
        let speed = profile
            .species_id()
            .and_then(|id| reference.species(id))
            .map(|species| species.speed);
        let profile_view = ProfileView {
            id: profile.id(),
            name: profile.name().to_string(),
            species,
            background: profile
                .background_id()
                .map(|id| reference.resolve_background(id)),
            speed,
        };

        let unresolved = collect_unresolved(&profile_view, &inventory, &spellcasting);

        CharacterSnapshot {
            total_level: classes.total_level(),
            proficiency_bonus,
            abilities: rules.abilities(&ability_scores, proficiency_bonus),
            skills: rules.skills(&ability_scores, &skill_levels, proficiency_bonus),
            hit_points: HitPointsView {
                current: offset.current(max_hit_points),
                max: max_hit_points,
                offset: offset.value(),
            },
            hit_dice,
            coins: CoinPurse::project(&events.coins),
            armor_class: rules.armor_class(&ability_scores, &held, reference),
            initiative: rules.initiative(&ability_scores),
            passive_perception: rules.passive_perception(
                &ability_scores,
                &skill_levels,
                proficiency_bonus,
            ),
            spell_slots: rules.spell_slots(&classes),
            traits: Traits::project(&events.traits),
            notes: Notes::project(&events.notes),
            profile: profile_view,
            classes,
            inventory,
            spellcasting,
            unresolved,
            history: events,
        }
    }

    /// Snapshot of the character as it stood at `at`.
    pub fn compose_as_of(
        &self,
        profile: &CharacterProfile,
        events: &CharacterEvents,
        at: DateTime<Utc>,
    ) -> CharacterSnapshot {
        self.compose(profile, events.as_of(at))
    }
}

fn collect_unresolved(
    profile: &ProfileView,
    inventory: &[InventoryEntry],
    spellcasting: &[ClassSpellcasting],
) -> Vec<UnresolvedReference> {
    fn unknown<Id: ToString>(kind: ReferenceKind, resolved: &Resolved<Id>) -> Option<UnresolvedReference> {
        (!resolved.known).then(|| UnresolvedReference {
            kind,
            id: resolved.id.to_string(),
        })
    }

    let mut unresolved: Vec<UnresolvedReference> = Vec::new();
    unresolved.extend(
        profile
            .species
            .as_ref()
            .and_then(|s| unknown(ReferenceKind::Species, s)),
    );
    unresolved.extend(
        profile
            .background
            .as_ref()
            .and_then(|b| unknown(ReferenceKind::Background, b)),
    );
    unresolved.extend(
        inventory
            .iter()
            .filter_map(|entry| unknown(ReferenceKind::Item, &entry.item)),
    );
    for class in spellcasting {
        let spells = class
            .cantrips
            .filled()
            .chain(class.cantrips.overflow.iter())
            .chain(class.prepared.filled())
            .chain(class.prepared.overflow.iter())
            .chain(class.spellbook.iter().flatten());
        unresolved.extend(spells.filter_map(|spell| unknown(ReferenceKind::Spell, spell)));
    }

    unresolved.sort();
    unresolved.dedup();
    unresolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compendium::{
        Compendium, CompendiumData, ItemDefinition, ItemKind, SpeciesDefinition, SpellDefinition,
    };
    use crate::events::test_support::{at, ev, log};
    use crate::events::{HitDieAction, PreparationAction, SpellbookAction};
    use crate::game_systems::{Dnd5eSystem, ProficiencyLevel};
    use crate::value_objects::{Ability, AbilityScore, DieSize, Skill};
    use crate::{ClassId, SpellId};

    fn compendium() -> Compendium {
        Compendium::new(CompendiumData {
            spells: vec![
                SpellDefinition {
                    id: SpellId::new("sacred-flame").unwrap(),
                    name: "Sacred Flame".into(),
                    level: 0,
                    school: None,
                },
                SpellDefinition {
                    id: SpellId::new("bless").unwrap(),
                    name: "Bless".into(),
                    level: 1,
                    school: None,
                },
            ],
            items: vec![ItemDefinition {
                id: ItemId::new("chain-mail").unwrap(),
                name: "Chain Mail".into(),
                kind: ItemKind::Armor {
                    base_ac: 16,
                    max_dex_bonus: None,
                    allows_dex: false,
                },
                max_charges: None,
            }],
            species: vec![SpeciesDefinition {
                id: SpeciesId::new("dwarf").unwrap(),
                name: "Dwarf".into(),
                speed: 25,
            }],
            ..CompendiumData::default()
        })
    }

    fn profile() -> CharacterProfile {
        CharacterProfile::new(CharacterId::new(), "Brenna")
            .unwrap()
            .with_species(SpeciesId::new("dwarf").unwrap())
            .with_background(BackgroundId::new("acolyte").unwrap())
    }

    fn cleric_events() -> CharacterEvents {
        let score = |ability: Ability, score: i64| AbilityScoreSet {
            ability,
            score: AbilityScore::new(score).unwrap(),
            proficient: ability == Ability::Wisdom,
        };
        let cleric = |level: u8, roll: Option<u8>| ClassLevelGained {
            class: ClassId::new("cleric").unwrap(),
            level,
            subclass: Some("life".into()),
            hit_die_roll: roll,
        };
        let prep = |spell: &str, always_prepared: bool| SpellPreparationChanged {
            class: ClassId::new("cleric").unwrap(),
            spell_id: SpellId::new(spell).unwrap(),
            action: PreparationAction::Prepare,
            always_prepared,
        };

        CharacterEvents {
            abilities: log(vec![
                ev(1, score(Ability::Wisdom, 16)),
                ev(2, score(Ability::Constitution, 14)),
            ]),
            skills: log(vec![ev(3, SkillProficiencySet {
                skill: Skill::Insight,
                proficiency: ProficiencyLevel::Proficient,
            })]),
            coins: log(vec![
                ev(4, CoinsChanged {
                    delta: CoinPurse::gold(100),
                }),
                ev(5, CoinsChanged {
                    delta: CoinPurse {
                        gp: -30,
                        sp: 10,
                        ..CoinPurse::default()
                    },
                }),
            ]),
            hit_points: log(vec![
                ev(6, HitPointsChanged { delta: -15 }),
                ev(7, HitPointsChanged { delta: 5 }),
            ]),
            hit_dice: log(vec![ev(8, HitDieChanged {
                die: DieSize::D8,
                action: HitDieAction::Use,
            })]),
            item_possession: log(vec![
                ev(9, ItemPossessionRecorded {
                    item_id: ItemId::new("chain-mail").unwrap(),
                    worn: true,
                    wielded: false,
                    dropped_at: None,
                }),
                ev(10, ItemPossessionRecorded {
                    item_id: ItemId::new("holy-symbol").unwrap(),
                    worn: false,
                    wielded: true,
                    dropped_at: None,
                }),
            ]),
            spellbook: log(vec![ev(11, SpellbookChanged {
                spell_id: SpellId::new("bless").unwrap(),
                action: SpellbookAction::Learn,
            })]),
            prepared_spells: log(vec![
                ev(12, prep("sacred-flame", false)),
                ev(13, prep("bless", true)),
                ev(14, prep("banished-spell", false)),
            ]),
            class_levels: log(vec![
                ev(15, cleric(1, None)),
                ev(16, cleric(2, Some(5))),
                ev(17, cleric(3, Some(8))),
            ]),
            ..CharacterEvents::default()
        }
    }

    #[test]
    fn composes_a_full_cleric() {
        let system = Dnd5eSystem::new();
        let compendium = compendium();
        let composer = SnapshotComposer::new(&system, &compendium);
        let snapshot = composer.compose(&profile(), cleric_events());

        assert_eq!(snapshot.total_level(), 3);
        assert_eq!(snapshot.proficiency_bonus(), 2);

        // 8 + 2, then 5 + 2 and 8 + 2
        assert_eq!(snapshot.hit_points().max, 27);
        assert_eq!(snapshot.hit_points().current, 17);

        assert_eq!(snapshot.hit_dice().available_dice(), vec![DieSize::D8; 2]);
        assert_eq!(snapshot.coins().gp, 70);
        assert_eq!(snapshot.coins().sp, 10);
        assert_eq!(snapshot.armor_class(), 16);
        assert_eq!(snapshot.inventory().len(), 2);
        assert_eq!(snapshot.skills().len(), 18);
        assert_eq!(snapshot.abilities().len(), 2);

        let cleric = snapshot.spellcasting_for("cleric").unwrap();
        assert_eq!(cleric.stats.save_dc, 8 + 2 + 3);
        assert_eq!(cleric.stats.max_castable_level, Some(2));
        assert_eq!(cleric.cantrips.slots.len(), 3);
        // Level 3 + WIS 3 = 6 chosen slots plus always-prepared Bless
        assert_eq!(cleric.prepared.slots.len(), 7);
        assert!(cleric.spellbook.is_none());

        assert_eq!(snapshot.profile().speed, Some(25));
        assert_eq!(
            snapshot.unresolved(),
            &[
                UnresolvedReference {
                    kind: ReferenceKind::Spell,
                    id: "banished-spell".into()
                },
                UnresolvedReference {
                    kind: ReferenceKind::Item,
                    id: "holy-symbol".into()
                },
                UnresolvedReference {
                    kind: ReferenceKind::Background,
                    id: "acolyte".into()
                },
            ]
        );
    }

    #[test]
    fn empty_history_composes_zero_values() {
        let system = Dnd5eSystem::new();
        let compendium = Compendium::default();
        let composer = SnapshotComposer::new(&system, &compendium);
        let profile = CharacterProfile::new(CharacterId::new(), "Nobody").unwrap();
        let snapshot = composer.compose(&profile, CharacterEvents::default());

        assert!(snapshot.abilities().is_empty());
        assert!(snapshot.coins().is_empty());
        assert!(snapshot.spellcasting().is_empty());
        assert!(snapshot.inventory().is_empty());
        assert_eq!(snapshot.hit_points().max, 0);
        assert_eq!(snapshot.armor_class(), 10);
        assert!(snapshot.unresolved().is_empty());
    }

    #[test]
    fn composing_twice_is_identical() {
        let system = Dnd5eSystem::new();
        let compendium = compendium();
        let composer = SnapshotComposer::new(&system, &compendium);
        let first = composer.compose(&profile(), cleric_events());
        let second = composer.compose(&profile(), cleric_events());
        assert_eq!(first, second);
    }

    #[test]
    fn historical_snapshot_only_sees_earlier_events() {
        let system = Dnd5eSystem::new();
        let compendium = compendium();
        let composer = SnapshotComposer::new(&system, &compendium);
        let events = cleric_events();

        // Minute 6 is the first damage event; minute 7 heals.
        let snapshot = composer.compose_as_of(&profile(), &events, at(6));
        assert_eq!(snapshot.hit_points().offset, -15);
        assert!(snapshot.classes().is_empty());
        assert_eq!(snapshot.history().total_events(), 6);
    }

    #[test]
    fn history_serializes_events_verbatim() {
        let system = Dnd5eSystem::new();
        let compendium = compendium();
        let composer = SnapshotComposer::new(&system, &compendium);
        let snapshot = composer.compose(&profile(), cleric_events());
        let json = serde_json::to_value(&snapshot).unwrap();
        let coins = json["history"]["coins"].as_array().unwrap();
        assert_eq!(coins.len(), 2);
        assert_eq!(coins[1]["gp"], -30);
        assert_eq!(json["hitPoints"]["current"], 17);
    }
}

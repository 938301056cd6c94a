//! Read-only reference dataset: spells, items, species and backgrounds.
//!
//! Lookups return `Option`. Events may name content that has since been
//! removed from the dataset, so callers decide what an unknown id means.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::{BackgroundId, ItemId, SpeciesId, SpellId};

/// Lookup capability over the static game content.
pub trait ReferenceData: Send + Sync {
    fn spell(&self, id: &SpellId) -> Option<&SpellDefinition>;

    fn item(&self, id: &ItemId) -> Option<&ItemDefinition>;

    fn species(&self, id: &SpeciesId) -> Option<&SpeciesDefinition>;

    fn background(&self, id: &BackgroundId) -> Option<&BackgroundDefinition>;

    fn resolve_spell(&self, id: &SpellId) -> Resolved<SpellId> {
        Resolved::lookup(id, self.spell(id).map(|s| s.name.as_str()))
    }

    fn resolve_item(&self, id: &ItemId) -> Resolved<ItemId> {
        Resolved::lookup(id, self.item(id).map(|i| i.name.as_str()))
    }

    fn resolve_species(&self, id: &SpeciesId) -> Resolved<SpeciesId> {
        Resolved::lookup(id, self.species(id).map(|s| s.name.as_str()))
    }

    fn resolve_background(&self, id: &BackgroundId) -> Resolved<BackgroundId> {
        Resolved::lookup(id, self.background(id).map(|b| b.name.as_str()))
    }
}

/// A reference id paired with its display name.
///
/// Ids missing from the dataset keep the raw id as their name and are
/// marked `known: false`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved<Id> {
    pub id: Id,
    pub name: String,
    pub known: bool,
}

impl<Id: Clone + fmt::Display> Resolved<Id> {
    fn lookup(id: &Id, name: Option<&str>) -> Self {
        match name {
            Some(name) => Self {
                id: id.clone(),
                name: name.to_string(),
                known: true,
            },
            None => Self::unknown(id.clone()),
        }
    }

    pub fn unknown(id: Id) -> Self {
        Self {
            name: id.to_string(),
            id,
            known: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDefinition {
    pub id: SpellId,
    pub name: String,
    /// Spell tier; 0 is a cantrip.
    pub level: u8,
    #[serde(default)]
    pub school: Option<String>,
}

impl SpellDefinition {
    pub fn is_cantrip(&self) -> bool {
        self.level == 0
    }
}

/// How an item affects derived statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemKind {
    #[serde(rename_all = "camelCase")]
    Armor {
        base_ac: i32,
        #[serde(default)]
        max_dex_bonus: Option<i32>,
        #[serde(default = "default_allows_dex")]
        allows_dex: bool,
    },
    Shield {
        bonus: i32,
    },
    Weapon,
    #[default]
    Gear,
}

fn default_allows_dex() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemDefinition {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub kind: ItemKind,
    #[serde(default)]
    pub max_charges: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesDefinition {
    pub id: SpeciesId,
    pub name: String,
    /// Walking speed in feet.
    #[serde(default = "default_speed")]
    pub speed: u32,
}

fn default_speed() -> u32 {
    30
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundDefinition {
    pub id: BackgroundId,
    pub name: String,
    #[serde(default)]
    pub feature: Option<String>,
}

/// Serialized form of a compendium file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompendiumData {
    pub spells: Vec<SpellDefinition>,
    pub items: Vec<ItemDefinition>,
    pub species: Vec<SpeciesDefinition>,
    pub backgrounds: Vec<BackgroundDefinition>,
}

/// In-memory reference dataset indexed by id.
///
/// Later entries with a duplicate id replace earlier ones.
#[derive(Debug, Clone, Default)]
pub struct Compendium {
    spells: BTreeMap<SpellId, SpellDefinition>,
    items: BTreeMap<ItemId, ItemDefinition>,
    species: BTreeMap<SpeciesId, SpeciesDefinition>,
    backgrounds: BTreeMap<BackgroundId, BackgroundDefinition>,
}

impl Compendium {
    pub fn new(data: CompendiumData) -> Self {
        Self {
            spells: data.spells.into_iter().map(|s| (s.id.clone(), s)).collect(),
            items: data.items.into_iter().map(|i| (i.id.clone(), i)).collect(),
            species: data.species.into_iter().map(|s| (s.id.clone(), s)).collect(),
            backgrounds: data
                .backgrounds
                .into_iter()
                .map(|b| (b.id.clone(), b))
                .collect(),
        }
    }

    pub fn spell_count(&self) -> usize {
        self.spells.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

impl From<CompendiumData> for Compendium {
    fn from(data: CompendiumData) -> Self {
        Self::new(data)
    }
}

impl ReferenceData for Compendium {
    fn spell(&self, id: &SpellId) -> Option<&SpellDefinition> {
        self.spells.get(id)
    }

    fn item(&self, id: &ItemId) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    fn species(&self, id: &SpeciesId) -> Option<&SpeciesDefinition> {
        self.species.get(id)
    }

    fn background(&self, id: &BackgroundId) -> Option<&BackgroundDefinition> {
        self.backgrounds.get(id)
    }
}

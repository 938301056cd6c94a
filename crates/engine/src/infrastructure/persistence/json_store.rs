//! File-backed event store.
//!
//! The whole store is one JSON document holding character profiles and one
//! table of rows per event domain. Rows are validated on every fetch, so a
//! hand-edited file with a bad row fails loudly instead of skewing totals.

use std::path::Path;

use async_trait::async_trait;
use hearthsheet_domain::events::{
    AbilityScoreSet, ClassLevelGained, CoinsChanged, HitDieChanged, HitPointsChanged,
    ItemChargesChanged, ItemPossessionRecorded, NoteWritten, SkillProficiencySet,
    SpellPreparationChanged, SpellbookChanged, TraitRecorded,
};
use hearthsheet_domain::{CharacterId, CharacterProfile, Event};
use serde::{Deserialize, Serialize};

use super::stored_types::{
    StoredAbilityRow, StoredChargeRow, StoredClassLevelRow, StoredCoinRow, StoredEvent,
    StoredHitDieRow, StoredHitPointRow, StoredNoteRow, StoredPayload, StoredPossessionRow,
    StoredPreparedSpellRow, StoredProfile, StoredSkillRow, StoredSpellbookRow, StoredTraitRow,
};
use crate::infrastructure::ports::{CharacterEventRepo, RepoError};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredEventTables {
    pub abilities: Vec<StoredEvent<StoredAbilityRow>>,
    pub skills: Vec<StoredEvent<StoredSkillRow>>,
    pub coins: Vec<StoredEvent<StoredCoinRow>>,
    pub hit_points: Vec<StoredEvent<StoredHitPointRow>>,
    pub hit_dice: Vec<StoredEvent<StoredHitDieRow>>,
    pub item_possession: Vec<StoredEvent<StoredPossessionRow>>,
    pub item_charges: Vec<StoredEvent<StoredChargeRow>>,
    pub spellbook: Vec<StoredEvent<StoredSpellbookRow>>,
    pub prepared_spells: Vec<StoredEvent<StoredPreparedSpellRow>>,
    pub class_levels: Vec<StoredEvent<StoredClassLevelRow>>,
    pub traits: Vec<StoredEvent<StoredTraitRow>>,
    pub notes: Vec<StoredEvent<StoredNoteRow>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredDocument {
    pub characters: Vec<StoredProfile>,
    pub events: StoredEventTables,
}

/// Read-only event store loaded from a JSON document.
#[derive(Debug, Clone, Default)]
pub struct JsonEventStore {
    document: StoredDocument,
}

impl JsonEventStore {
    pub fn new(document: StoredDocument) -> Self {
        Self { document }
    }

    pub fn from_json(json: &str) -> Result<Self, RepoError> {
        let document = serde_json::from_str(json).map_err(RepoError::serialization)?;
        Ok(Self::new(document))
    }

    /// Read and parse the store file.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RepoError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| RepoError::database("load_store", format!("{}: {}", path.display(), e)))?;
        let store = Self::from_json(&raw)?;
        tracing::debug!(
            path = %path.display(),
            characters = store.document.characters.len(),
            "Loaded event store"
        );
        Ok(store)
    }

    pub fn character_count(&self) -> usize {
        self.document.characters.len()
    }
}

/// Validate every row belonging to the character, failing on the first bad one.
fn fetch<R>(rows: &[StoredEvent<R>], id: CharacterId) -> Result<Vec<Event<R::Payload>>, RepoError>
where
    R: StoredPayload + Clone,
{
    rows.iter()
        .filter(|row| row.belongs_to(id))
        .cloned()
        .map(StoredEvent::into_event)
        .collect()
}

#[async_trait]
impl CharacterEventRepo for JsonEventStore {
    async fn get_profile(&self, id: CharacterId) -> Result<Option<CharacterProfile>, RepoError> {
        self.document
            .characters
            .iter()
            .find(|profile| profile.id == id.to_uuid())
            .cloned()
            .map(StoredProfile::into_profile)
            .transpose()
    }

    async fn ability_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<AbilityScoreSet>>, RepoError> {
        fetch(&self.document.events.abilities, id)
    }

    async fn skill_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<SkillProficiencySet>>, RepoError> {
        fetch(&self.document.events.skills, id)
    }

    async fn coin_events(&self, id: CharacterId) -> Result<Vec<Event<CoinsChanged>>, RepoError> {
        fetch(&self.document.events.coins, id)
    }

    async fn hit_point_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<HitPointsChanged>>, RepoError> {
        fetch(&self.document.events.hit_points, id)
    }

    async fn hit_die_events(&self, id: CharacterId) -> Result<Vec<Event<HitDieChanged>>, RepoError> {
        fetch(&self.document.events.hit_dice, id)
    }

    async fn item_possession_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<ItemPossessionRecorded>>, RepoError> {
        fetch(&self.document.events.item_possession, id)
    }

    async fn item_charge_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<ItemChargesChanged>>, RepoError> {
        fetch(&self.document.events.item_charges, id)
    }

    async fn spellbook_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<SpellbookChanged>>, RepoError> {
        fetch(&self.document.events.spellbook, id)
    }

    async fn prepared_spell_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<SpellPreparationChanged>>, RepoError> {
        fetch(&self.document.events.prepared_spells, id)
    }

    async fn class_level_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<ClassLevelGained>>, RepoError> {
        fetch(&self.document.events.class_levels, id)
    }

    async fn trait_events(&self, id: CharacterId) -> Result<Vec<Event<TraitRecorded>>, RepoError> {
        fetch(&self.document.events.traits, id)
    }

    async fn note_events(&self, id: CharacterId) -> Result<Vec<Event<NoteWritten>>, RepoError> {
        fetch(&self.document.events.notes, id)
    }
}

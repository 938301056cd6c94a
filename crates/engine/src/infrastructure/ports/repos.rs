//! Repository port traits for event access.

use async_trait::async_trait;
use hearthsheet_domain::events::{
    AbilityScoreSet, ClassLevelGained, CoinsChanged, HitDieChanged, HitPointsChanged,
    ItemChargesChanged, ItemPossessionRecorded, NoteWritten, SkillProficiencySet,
    SpellPreparationChanged, SpellbookChanged, TraitRecorded,
};
use hearthsheet_domain::{CharacterId, CharacterProfile, Event};

use super::error::RepoError;

// =============================================================================
// Character Event Storage
// =============================================================================

/// Read access to one character's profile and per-domain event logs.
///
/// Every fetch returns validated, typed events in storage order. A row that
/// fails validation fails the whole fetch with `RepoError::MalformedEvent`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterEventRepo: Send + Sync {
    async fn get_profile(&self, id: CharacterId) -> Result<Option<CharacterProfile>, RepoError>;

    async fn ability_events(&self, id: CharacterId)
        -> Result<Vec<Event<AbilityScoreSet>>, RepoError>;
    async fn skill_events(&self, id: CharacterId)
        -> Result<Vec<Event<SkillProficiencySet>>, RepoError>;
    async fn coin_events(&self, id: CharacterId) -> Result<Vec<Event<CoinsChanged>>, RepoError>;
    async fn hit_point_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<HitPointsChanged>>, RepoError>;
    async fn hit_die_events(&self, id: CharacterId) -> Result<Vec<Event<HitDieChanged>>, RepoError>;
    async fn item_possession_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<ItemPossessionRecorded>>, RepoError>;
    async fn item_charge_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<ItemChargesChanged>>, RepoError>;
    async fn spellbook_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<SpellbookChanged>>, RepoError>;
    async fn prepared_spell_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<SpellPreparationChanged>>, RepoError>;
    async fn class_level_events(
        &self,
        id: CharacterId,
    ) -> Result<Vec<Event<ClassLevelGained>>, RepoError>;
    async fn trait_events(&self, id: CharacterId) -> Result<Vec<Event<TraitRecorded>>, RepoError>;
    async fn note_events(&self, id: CharacterId) -> Result<Vec<Event<NoteWritten>>, RepoError>;
}

//! Character snapshot use case.
//!
//! Fetches every event log of one character concurrently and composes the
//! read-only snapshot. Nothing is cached; each call recomputes from history.

mod error;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hearthsheet_domain::{
    CharacterEvents, CharacterId, CharacterSnapshot, EventLog, GameSystem, ReferenceData,
    SnapshotComposer,
};

use crate::infrastructure::ports::CharacterEventRepo;

pub use error::SnapshotError;

pub struct ComposeCharacterSnapshot {
    repo: Arc<dyn CharacterEventRepo>,
    system: Arc<dyn GameSystem>,
    reference: Arc<dyn ReferenceData>,
}

impl ComposeCharacterSnapshot {
    pub fn new(
        repo: Arc<dyn CharacterEventRepo>,
        system: Arc<dyn GameSystem>,
        reference: Arc<dyn ReferenceData>,
    ) -> Self {
        Self {
            repo,
            system,
            reference,
        }
    }

    /// Compose the character's current snapshot.
    pub async fn execute(&self, id: CharacterId) -> Result<CharacterSnapshot, SnapshotError> {
        self.compose(id, None).await
    }

    /// Compose the snapshot as it stood at `at`, ignoring later events.
    pub async fn execute_as_of(
        &self,
        id: CharacterId,
        at: DateTime<Utc>,
    ) -> Result<CharacterSnapshot, SnapshotError> {
        self.compose(id, Some(at)).await
    }

    async fn compose(
        &self,
        id: CharacterId,
        at: Option<DateTime<Utc>>,
    ) -> Result<CharacterSnapshot, SnapshotError> {
        let repo = &self.repo;
        let (
            profile,
            abilities,
            skills,
            coins,
            hit_points,
            hit_dice,
            item_possession,
            item_charges,
            spellbook,
            prepared_spells,
            class_levels,
            traits,
            notes,
        ) = tokio::try_join!(
            repo.get_profile(id),
            repo.ability_events(id),
            repo.skill_events(id),
            repo.coin_events(id),
            repo.hit_point_events(id),
            repo.hit_die_events(id),
            repo.item_possession_events(id),
            repo.item_charge_events(id),
            repo.spellbook_events(id),
            repo.prepared_spell_events(id),
            repo.class_level_events(id),
            repo.trait_events(id),
            repo.note_events(id),
        )?;

        let profile = profile.ok_or(SnapshotError::CharacterNotFound(id))?;

        let events = CharacterEvents {
            abilities: EventLog::new(abilities),
            skills: EventLog::new(skills),
            coins: EventLog::new(coins),
            hit_points: EventLog::new(hit_points),
            hit_dice: EventLog::new(hit_dice),
            item_possession: EventLog::new(item_possession),
            item_charges: EventLog::new(item_charges),
            spellbook: EventLog::new(spellbook),
            prepared_spells: EventLog::new(prepared_spells),
            class_levels: EventLog::new(class_levels),
            traits: EventLog::new(traits),
            notes: EventLog::new(notes),
        };

        let composer = SnapshotComposer::new(self.system.as_ref(), self.reference.as_ref());
        let snapshot = match at {
            Some(at) => composer.compose(&profile, events.as_of(at)),
            None => composer.compose(&profile, events),
        };

        for reference in snapshot.unresolved() {
            tracing::warn!(
                character_id = %id,
                kind = ?reference.kind,
                reference_id = %reference.id,
                "Reference not found in compendium, using fallback"
            );
        }
        tracing::debug!(
            character_id = %id,
            total_level = snapshot.total_level(),
            events = snapshot.history().total_events(),
            "Composed character snapshot"
        );

        Ok(snapshot)
    }
}

//! Character identity.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::{BackgroundId, CharacterId, SpeciesId};

/// The stable, non-event part of a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterProfile {
    id: CharacterId,
    name: String,
    #[serde(default)]
    species_id: Option<SpeciesId>,
    #[serde(default)]
    background_id: Option<BackgroundId>,
}

impl CharacterProfile {
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a blank name.
    pub fn new(id: CharacterId, name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Character name cannot be empty"));
        }
        Ok(Self {
            id,
            name: trimmed.to_string(),
            species_id: None,
            background_id: None,
        })
    }

    pub fn with_species(mut self, species_id: SpeciesId) -> Self {
        self.species_id = Some(species_id);
        self
    }

    pub fn with_background(mut self, background_id: BackgroundId) -> Self {
        self.background_id = Some(background_id);
        self
    }

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn species_id(&self) -> Option<&SpeciesId> {
        self.species_id.as_ref()
    }

    pub fn background_id(&self) -> Option<&BackgroundId> {
        self.background_id.as_ref()
    }
}

extern crate self as hearthsheet_domain;

pub mod character;
pub mod compendium;
pub mod error;
pub mod events;
pub mod game_systems;
pub mod ids;
pub mod projections;
pub mod reduction;
pub mod rules;
pub mod snapshot;
pub mod spellcasting;
pub mod value_objects;

pub use character::CharacterProfile;
pub use compendium::{
    BackgroundDefinition, Compendium, CompendiumData, ItemDefinition, ItemKind, ReferenceData,
    Resolved, SpeciesDefinition, SpellDefinition,
};
pub use error::DomainError;
pub use events::{Event, EventLog, EventMeta};
pub use game_systems::{
    CalculationEngine, CasterType, Dnd5eSystem, GameSystem, GameSystemRegistry, ProficiencyLevel,
    SpellcastingSystem,
};
pub use ids::{BackgroundId, CharacterId, ClassId, EventId, ItemId, SpeciesId, SpellId};
pub use reduction::{LatestWins, MembershipCount, MembershipSet, Reduction, ScalarSum, SignedSum};
pub use snapshot::{
    CharacterEvents, CharacterSnapshot, ReferenceKind, SnapshotComposer, UnresolvedReference,
};
pub use value_objects::{Ability, AbilityScore, CoinPurse, DieSize, Skill};

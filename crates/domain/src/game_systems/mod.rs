//! Game system implementations.
//!
//! The rules engine reads class tables and formulas only through the traits
//! in `traits.rs`. Each ruleset implements them once.
//!
//! # Supported Systems
//!
//! - D&D 5th Edition (`dnd5e`)

mod dnd5e;
mod traits;

pub use dnd5e::Dnd5eSystem;

pub use traits::{
    CalculationEngine, CasterType, GameSystem, LevelHitDie, ProficiencyLevel, SpellcastingSystem,
};

use std::sync::Arc;

/// Registry of available game systems.
pub struct GameSystemRegistry {
    systems: Vec<Arc<dyn GameSystem>>,
}

impl Default for GameSystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSystemRegistry {
    /// Create a new registry with all built-in game systems.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(Dnd5eSystem::new()));
        registry
    }

    /// Create an empty registry without built-in systems.
    pub fn empty() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Register a game system.
    pub fn register(&mut self, system: Arc<dyn GameSystem>) {
        self.systems.push(system);
    }

    /// Get a game system by its ID.
    pub fn get(&self, system_id: &str) -> Option<Arc<dyn GameSystem>> {
        self.systems
            .iter()
            .find(|s| s.system_id() == system_id)
            .cloned()
    }

    /// List all registered system IDs.
    pub fn list_systems(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.system_id()).collect()
    }
}

//! Application state and composition.

use std::sync::Arc;

use hearthsheet_domain::{GameSystem, ReferenceData};

use crate::infrastructure::ports::CharacterEventRepo;
use crate::use_cases::ComposeCharacterSnapshot;

/// Main application state.
///
/// Holds the use cases built on the injected ports. The ruleset and
/// reference dataset are constructed once by the caller and shared.
pub struct App {
    pub use_cases: UseCases,
}

pub struct UseCases {
    pub character_snapshot: Arc<ComposeCharacterSnapshot>,
}

impl App {
    pub fn new(
        character_events: Arc<dyn CharacterEventRepo>,
        system: Arc<dyn GameSystem>,
        reference: Arc<dyn ReferenceData>,
    ) -> Self {
        let character_snapshot = Arc::new(ComposeCharacterSnapshot::new(
            character_events,
            system,
            reference,
        ));

        Self {
            use_cases: UseCases { character_snapshot },
        }
    }
}

//! Storage adapters.

mod compendium_file;
mod json_store;
mod stored_types;

pub use compendium_file::load_compendium;
pub use json_store::{JsonEventStore, StoredDocument, StoredEventTables};
pub use stored_types::{StoredEvent, StoredMeta, StoredPayload, StoredProfile};

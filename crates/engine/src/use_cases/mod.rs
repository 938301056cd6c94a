//! Use cases - read-side orchestration over the event store.

pub mod character_snapshot;

pub use character_snapshot::{ComposeCharacterSnapshot, SnapshotError};

//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete
//! types. The event store port could be backed by a JSON file, a SQL table
//! per domain, or anything else that can list a character's events.

mod error;
mod repos;

pub use error::RepoError;
pub use repos::*;

//! Character snapshot errors.

use crate::infrastructure::ports::RepoError;
use hearthsheet_domain::{CharacterId, DomainError};

/// Errors that can occur while composing a character snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

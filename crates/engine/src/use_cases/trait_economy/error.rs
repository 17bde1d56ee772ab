//! Trait economy operation errors.

use crate::infrastructure::ports::RepoError;
use nocturne_domain::{CharacterId, DomainError, PriorityError};

/// Errors that can occur during an edit session.
///
/// Rule violations are not errors; they come back as rejected decisions.
#[derive(Debug, thiserror::Error)]
pub enum TraitEconomyError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("Priority error: {0}")]
    Priority(#[from] PriorityError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

//! Repository port traits for database access.

use async_trait::async_trait;
use nocturne_domain::{CharacterId, CharacterRecord};

use super::error::RepoError;

// =============================================================================
// Character Storage
// =============================================================================

/// Whole-document storage for character records.
///
/// `save` is an upsert of the full snapshot, ledgers included.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRecordRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterRecord>, RepoError>;
    async fn save(&self, record: &CharacterRecord) -> Result<(), RepoError>;
    async fn delete(&self, id: CharacterId) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<CharacterRecord>, RepoError>;
}

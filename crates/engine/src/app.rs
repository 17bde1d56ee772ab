//! Application state and composition.

use std::sync::Arc;

use nocturne_domain::ArchetypeRegistry;

use crate::infrastructure::{
    character_store::SqliteCharacterStore,
    clock::SystemClock,
    config::EngineConfig,
    notifier::TracingNotifier,
    ports::{CharacterRecordRepo, ClockPort, NotificationPort, RepoError},
    resilient_store::RetryingCharacterStore,
};
use crate::use_cases;

/// Main application state.
pub struct App {
    pub registry: Arc<ArchetypeRegistry>,
    pub store: Arc<dyn CharacterRecordRepo>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub trait_economy: use_cases::TraitEconomyUseCases,
}

impl App {
    pub fn new(
        store: Arc<dyn CharacterRecordRepo>,
        notifier: Arc<dyn NotificationPort>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        let registry = Arc::new(ArchetypeRegistry::new());
        let use_cases = UseCases {
            trait_economy: use_cases::TraitEconomyUseCases::new(
                registry.clone(),
                store.clone(),
                notifier,
                clock,
            ),
        };

        Self {
            registry,
            store,
            use_cases,
        }
    }

    /// Wire the production adapters: SQLite store (optionally retried),
    /// tracing notifier and the system clock.
    pub async fn from_config(config: &EngineConfig) -> Result<Self, RepoError> {
        let clock: Arc<dyn ClockPort> = Arc::new(SystemClock::new());

        tracing::info!(path = %config.db_path, "Opening character store");
        let sqlite: Arc<dyn CharacterRecordRepo> =
            Arc::new(SqliteCharacterStore::new(&config.db_path, clock.clone()).await?);

        let store: Arc<dyn CharacterRecordRepo> = if config.persist_retries > 0 {
            let retry_config = config.retry_config();
            tracing::info!(
                "Character store configured with retry: max_retries={}, base_delay_ms={}",
                retry_config.max_retries,
                retry_config.base_delay_ms
            );
            Arc::new(RetryingCharacterStore::new(sqlite, retry_config))
        } else {
            sqlite
        };

        Ok(Self::new(store, Arc::new(TracingNotifier::new()), clock))
    }
}

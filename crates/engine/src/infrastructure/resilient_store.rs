//! Retrying character store wrapper with exponential backoff.
//!
//! Wraps any `CharacterRecordRepo` so transient database failures (a locked
//! SQLite file, a dropped connection) get another chance before the session
//! reports the save as failed.

use async_trait::async_trait;
use nocturne_domain::{CharacterId, CharacterRecord};
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::ports::{CharacterRecordRepo, RepoError};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (0 = no retries, just the initial attempt)
    pub max_retries: u32,
    /// Base delay in milliseconds before first retry
    pub base_delay_ms: u64,
    /// Maximum delay in milliseconds (caps exponential growth)
    pub max_delay_ms: u64,
    /// Jitter factor (0.0-1.0) for randomizing delays
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 250,
            max_delay_ms: 5000,
            jitter_factor: 0.2,
        }
    }
}

/// Wrapper that adds retry logic to any character store
pub struct RetryingCharacterStore {
    inner: Arc<dyn CharacterRecordRepo>,
    config: RetryConfig,
}

impl RetryingCharacterStore {
    pub fn new(inner: Arc<dyn CharacterRecordRepo>, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Delay before retry `attempt` (1-based): base * 2^(attempt-1), capped, ± jitter.
    fn calculate_delay(&self, attempt: u32) -> u64 {
        let base = self.config.base_delay_ms;
        let exponential = base.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)));
        let capped = exponential.min(self.config.max_delay_ms);

        let jitter_range = (capped as f64 * self.config.jitter_factor) as i64;
        if jitter_range > 0 {
            let jitter = rand::thread_rng().gen_range(-jitter_range..=jitter_range);
            (capped as i64 + jitter).max(0) as u64
        } else {
            capped
        }
    }

    async fn execute_with_retry<T, F, Fut>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, RepoError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, RepoError>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        tracing::info!(
                            attempt = attempt + 1,
                            operation = operation_name,
                            "Store operation succeeded after retry"
                        );
                    }
                    return Ok(value);
                }
                Err(e) if e.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = self.calculate_delay(attempt);
                    tracing::warn!(
                        attempt,
                        max_retries = self.config.max_retries,
                        delay_ms = delay,
                        error = %e,
                        operation = operation_name,
                        "Store operation failed, retrying..."
                    );
                    tokio::time::sleep(Duration::from_millis(delay)).await;
                }
                Err(e) => {
                    if e.is_transient() && self.config.max_retries > 0 {
                        tracing::error!(
                            attempts = attempt + 1,
                            error = %e,
                            operation = operation_name,
                            "Store operation failed after all retry attempts"
                        );
                    }
                    return Err(e);
                }
            }
        }
    }
}

#[async_trait]
impl CharacterRecordRepo for RetryingCharacterStore {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterRecord>, RepoError> {
        self.execute_with_retry("get", || self.inner.get(id)).await
    }

    async fn save(&self, record: &CharacterRecord) -> Result<(), RepoError> {
        self.execute_with_retry("save", || self.inner.save(record))
            .await
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        self.execute_with_retry("delete", || self.inner.delete(id))
            .await
    }

    async fn list(&self) -> Result<Vec<CharacterRecord>, RepoError> {
        self.execute_with_retry("list", || self.inner.list()).await
    }
}

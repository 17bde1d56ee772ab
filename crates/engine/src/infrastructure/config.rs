//! Environment configuration.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `NOCTURNE_DB_PATH` | `characters.db` |
//! | `NOCTURNE_PERSIST_RETRIES` | `0` |
//! | `NOCTURNE_RETRY_BASE_DELAY_MS` | `250` |

use std::str::FromStr;

use crate::infrastructure::resilient_store::RetryConfig;

pub const DB_PATH_VAR: &str = "NOCTURNE_DB_PATH";
pub const PERSIST_RETRIES_VAR: &str = "NOCTURNE_PERSIST_RETRIES";
pub const RETRY_BASE_DELAY_VAR: &str = "NOCTURNE_RETRY_BASE_DELAY_MS";

const DEFAULT_DB_PATH: &str = "characters.db";
const DEFAULT_PERSIST_RETRIES: u32 = 0;
const DEFAULT_RETRY_BASE_DELAY_MS: u64 = 250;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub db_path: String,
    /// Extra save attempts after a transient failure. 0 disables the retry wrapper.
    pub persist_retries: u32,
    pub retry_base_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            db_path: DEFAULT_DB_PATH.to_string(),
            persist_retries: DEFAULT_PERSIST_RETRIES,
            retry_base_delay_ms: DEFAULT_RETRY_BASE_DELAY_MS,
        }
    }
}

impl EngineConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`. Unparseable numbers fall back to
    /// their defaults with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = lookup(DB_PATH_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_DB_PATH.to_string());

        Self {
            db_path,
            persist_retries: parse_or_default(&lookup, PERSIST_RETRIES_VAR, DEFAULT_PERSIST_RETRIES),
            retry_base_delay_ms: parse_or_default(
                &lookup,
                RETRY_BASE_DELAY_VAR,
                DEFAULT_RETRY_BASE_DELAY_MS,
            ),
        }
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.persist_retries,
            base_delay_ms: self.retry_base_delay_ms,
            ..RetryConfig::default()
        }
    }
}

fn parse_or_default<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr + Copy + std::fmt::Display,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(
                variable = key,
                value = %raw,
                default = %default,
                "Invalid number in environment, using default"
            );
            default
        }),
    }
}

/// Load `.env.local` then `.env` from the workspace root. Missing files are fine.
pub fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn empty_environment_uses_defaults() {
        let config = EngineConfig::from_lookup(lookup(&[]));
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.db_path, "characters.db");
    }

    #[test]
    fn values_are_read_from_environment() {
        let config = EngineConfig::from_lookup(lookup(&[
            (DB_PATH_VAR, "/tmp/sheets.db"),
            (PERSIST_RETRIES_VAR, "3"),
            (RETRY_BASE_DELAY_VAR, " 40 "),
        ]));
        assert_eq!(config.db_path, "/tmp/sheets.db");
        assert_eq!(config.persist_retries, 3);
        assert_eq!(config.retry_base_delay_ms, 40);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let config = EngineConfig::from_lookup(lookup(&[
            (PERSIST_RETRIES_VAR, "-1"),
            (RETRY_BASE_DELAY_VAR, "soon"),
        ]));
        assert_eq!(config.persist_retries, 0);
        assert_eq!(config.retry_base_delay_ms, 250);
    }

    #[test]
    fn retry_config_carries_overrides() {
        let config = EngineConfig {
            persist_retries: 2,
            retry_base_delay_ms: 10,
            ..EngineConfig::default()
        };
        let retry = config.retry_config();
        assert_eq!(retry.max_retries, 2);
        assert_eq!(retry.base_delay_ms, 10);
    }
}

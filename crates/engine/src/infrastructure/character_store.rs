//! SQLite-backed character document storage.
//!
//! Each record is stored as one JSON document keyed by its id. The name and
//! archetype columns are denormalized for listing only; the document is the
//! source of truth.

use async_trait::async_trait;
use nocturne_domain::{CharacterId, CharacterRecord};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::{Row, SqlitePool};
use std::sync::Arc;

use crate::infrastructure::ports::{CharacterRecordRepo, ClockPort, RepoError};

const ENTITY: &str = "CharacterRecord";

/// SQLite implementation of [`CharacterRecordRepo`].
pub struct SqliteCharacterStore {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteCharacterStore {
    pub async fn new(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        Self::with_pool(pool, clock).await
    }

    /// Private in-memory database. A single connection keeps every query on
    /// the same database.
    pub async fn in_memory(clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        Self::with_pool(pool, clock).await
    }

    async fn with_pool(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS character_records (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                archetype TEXT NOT NULL,
                record_json TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .map_err(|e| RepoError::database("migrate", e))?;

        Ok(Self { pool, clock })
    }

    fn decode(json: &str) -> Result<CharacterRecord, RepoError> {
        serde_json::from_str(json).map_err(RepoError::serialization)
    }
}

#[async_trait]
impl CharacterRecordRepo for SqliteCharacterStore {
    async fn get(&self, id: CharacterId) -> Result<Option<CharacterRecord>, RepoError> {
        let row = sqlx::query("SELECT record_json FROM character_records WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("get", e))?;

        match row {
            Some(row) => {
                let json: String = row.get("record_json");
                Ok(Some(Self::decode(&json)?))
            }
            None => Ok(None),
        }
    }

    async fn save(&self, record: &CharacterRecord) -> Result<(), RepoError> {
        let json = serde_json::to_string(record).map_err(RepoError::serialization)?;
        let now = self.clock.now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO character_records (id, name, archetype, record_json, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                archetype = excluded.archetype,
                record_json = excluded.record_json,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(record.id.to_string())
        .bind(&record.name)
        .bind(record.archetype.kind().as_str())
        .bind(json)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("save", e))?;

        Ok(())
    }

    async fn delete(&self, id: CharacterId) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM character_records WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("delete", e))?;

        if result.rows_affected() == 0 {
            return Err(RepoError::not_found(ENTITY, id));
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<CharacterRecord>, RepoError> {
        let rows = sqlx::query("SELECT record_json FROM character_records ORDER BY name, id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("list", e))?;

        rows.iter()
            .map(|row| {
                let json: String = row.get("record_json");
                Self::decode(&json)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use chrono::Utc;
    use nocturne_domain::{
        Archetype, ArchetypeTemplate, GhoulTemplate, GhoulType, LedgerEntry, MortalTemplate,
        PaidMode, TraitCategory, TraitChange,
    };

    fn clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(Utc::now()))
    }

    fn mortal(name: &str) -> CharacterRecord {
        MortalTemplate::new()
            .new_record(name, Archetype::Mortal)
            .unwrap()
    }

    #[tokio::test]
    async fn save_then_get_returns_the_same_document() {
        let store = SqliteCharacterStore::in_memory(clock()).await.unwrap();
        let mut record = GhoulTemplate::new()
            .new_record(
                "Renfield",
                Archetype::Ghoul {
                    ghoul_type: GhoulType::Independent,
                },
            )
            .unwrap();
        let change = TraitChange::new(TraitCategory::Attributes, "Stamina", 2);
        record
            .append_entry(LedgerEntry::new(PaidMode::Freebie, &change, 1, 5, Utc::now()))
            .unwrap();
        record.set_trait(change.category, &change.key, change.new_value);

        store.save(&record).await.unwrap();
        let loaded = store.get(record.id).await.unwrap();
        assert_eq!(loaded, Some(record));
    }

    #[tokio::test]
    async fn save_overwrites_previous_snapshot() {
        let store = SqliteCharacterStore::in_memory(clock()).await.unwrap();
        let mut record = mortal("Anna");
        store.save(&record).await.unwrap();

        record.grant_experience(12).unwrap();
        store.save(&record).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].experience.total, 12);
    }

    #[tokio::test]
    async fn list_is_ordered_by_name() {
        let store = SqliteCharacterStore::in_memory(clock()).await.unwrap();
        store.save(&mortal("Viktor")).await.unwrap();
        store.save(&mortal("Anna")).await.unwrap();

        let names: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Anna", "Viktor"]);
    }

    #[tokio::test]
    async fn delete_missing_record_is_not_found() {
        let store = SqliteCharacterStore::in_memory(clock()).await.unwrap();
        let record = mortal("Anna");
        store.save(&record).await.unwrap();

        store.delete(record.id).await.unwrap();
        assert_eq!(store.get(record.id).await.unwrap(), None);
        let err = store.delete(record.id).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn file_database_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("characters.db");
        let path = path.to_string_lossy().to_string();
        let record = mortal("Anna");

        {
            let store = SqliteCharacterStore::new(&path, clock()).await.unwrap();
            store.save(&record).await.unwrap();
        }

        let store = SqliteCharacterStore::new(&path, clock()).await.unwrap();
        assert_eq!(store.get(record.id).await.unwrap(), Some(record));
    }
}

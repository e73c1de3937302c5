//! Key-value persistence for UI state.
//!
//! [`KeyValueStore`] is the port the session store writes through. [`SqliteStore`] keeps
//! the pairs in the `ui_state` table; [`MemoryStore`] keeps them in a map and is used when
//! nothing needs to survive a restart.

use crate::{
    entities::{UiState, ui_state},
    errors::Result,
};
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{DatabaseConnection, Set, prelude::*};
use std::{collections::HashMap, sync::Mutex};

/// A string-keyed, string-valued store.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removes `key`. Removing a missing key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}

/// [`KeyValueStore`] backed by the `ui_state` table.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db: DatabaseConnection,
}

impl SqliteStore {
    /// Wraps an open connection whose tables already exist.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find(&self, key: &str) -> Result<Option<ui_state::Model>> {
        Ok(UiState::find()
            .filter(ui_state::Column::Key.eq(key))
            .one(&self.db)
            .await?)
    }
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.find(key).await?.map(|row| row.value))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now().naive_utc();

        if let Some(row) = self.find(key).await? {
            let mut active_model: ui_state::ActiveModel = row.into();
            active_model.value = Set(value.to_string());
            active_model.updated_at = Set(now);
            active_model.update(&self.db).await?;
        } else {
            let new_row = ui_state::ActiveModel {
                key: Set(key.to_string()),
                value: Set(value.to_string()),
                updated_at: Set(now),
                ..Default::default()
            };
            new_row.insert(&self.db).await?;
        }

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        UiState::delete_many()
            .filter(ui_state::Column::Key.eq(key))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}

/// In-process [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-filled with the given pairs.
    #[must_use]
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds consistent strings.
        self.entries
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_sqlite_store_upserts_and_removes() -> Result<()> {
        let store = SqliteStore::new(setup_test_db().await?);

        assert_eq!(store.get("token").await?, None);

        store.set("token", "abc").await?;
        assert_eq!(store.get("token").await?.as_deref(), Some("abc"));

        store.set("token", "def").await?;
        assert_eq!(store.get("token").await?.as_deref(), Some("def"));
        assert_eq!(UiState::find().count(&store.db).await?, 1);

        store.remove("token").await?;
        assert_eq!(store.get("token").await?, None);

        // Removing again is a no-op
        store.remove("token").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() -> Result<()> {
        let store = MemoryStore::with_entries([("selectedSeason", "{}")]);
        assert_eq!(store.get("selectedSeason").await?.as_deref(), Some("{}"));
        store.remove("selectedSeason").await?;
        assert_eq!(store.get("selectedSeason").await?, None);
        Ok(())
    }
}

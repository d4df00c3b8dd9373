//! # Local Storage Repository
//!
//! A string key/value store with the same surface as a browser's
//! `localStorage`, plus typed JSON helpers.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ local_storage                                                │
//! │                                                              │
//! │  key              │ value                    │ updated_at    │
//! │  ─────────────────┼──────────────────────────┼────────────── │
//! │  cartItems        │ [{"_id":"p1",...}]       │ 2026-...      │
//! │  shippingAddress  │ {"fullName":"Amina",...} │ 2026-...      │
//! │  paymentMethod    │ PayPal                   │ 2026-...      │
//! │  userInfo         │ {"_id":"u1",...}         │ 2026-...      │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{StorageError, StorageResult};

/// Repository for the `local_storage` table.
#[derive(Debug, Clone)]
pub struct LocalStorageRepository {
    pool: SqlitePool,
}

impl LocalStorageRepository {
    pub fn new(pool: SqlitePool) -> Self {
        LocalStorageRepository { pool }
    }

    /// Reads the raw value stored under `key`.
    pub async fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value =
            sqlx::query_scalar::<_, String>("SELECT value FROM local_storage WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value)
    }

    /// Writes `value` under `key`, replacing any previous value.
    pub async fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        debug!(key = %key, bytes = value.len(), "Writing local storage item");

        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes `key`. Returns whether anything was removed.
    pub async fn remove_item(&self, key: &str) -> StorageResult<bool> {
        let result = sqlx::query("DELETE FROM local_storage WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        debug!(key = %key, removed = result.rows_affected(), "Removed local storage item");
        Ok(result.rows_affected() > 0)
    }

    /// Lists stored keys in alphabetical order.
    pub async fn keys(&self) -> StorageResult<Vec<String>> {
        let keys = sqlx::query_scalar::<_, String>("SELECT key FROM local_storage ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(keys)
    }

    /// Removes every key. Returns the number of rows removed.
    pub async fn clear(&self) -> StorageResult<u64> {
        let result = sqlx::query("DELETE FROM local_storage")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Reads and decodes a JSON value.
    ///
    /// A value that does not decode as `T` is reported as
    /// [`StorageError::Corrupt`].
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> StorageResult<Option<T>> {
        match self.get_item(key).await? {
            Some(raw) => serde_json::from_str(&raw)
                .map(Some)
                .map_err(|source| StorageError::Corrupt {
                    key: key.to_string(),
                    source,
                }),
            None => Ok(None),
        }
    }

    /// Encodes `value` as JSON and stores it.
    pub async fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> StorageResult<()> {
        let raw = serde_json::to_string(value)?;
        self.set_item(key, &raw).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn repo() -> LocalStorageRepository {
        Database::new(DbConfig::in_memory())
            .await
            .unwrap()
            .local_storage()
    }

    #[tokio::test]
    async fn test_set_get_remove() {
        let repo = repo().await;

        assert_eq!(repo.get_item("paymentMethod").await.unwrap(), None);

        repo.set_item("paymentMethod", "PayPal").await.unwrap();
        assert_eq!(
            repo.get_item("paymentMethod").await.unwrap().as_deref(),
            Some("PayPal")
        );

        repo.set_item("paymentMethod", "Cash").await.unwrap();
        assert_eq!(
            repo.get_item("paymentMethod").await.unwrap().as_deref(),
            Some("Cash")
        );

        assert!(repo.remove_item("paymentMethod").await.unwrap());
        assert!(!repo.remove_item("paymentMethod").await.unwrap());
    }

    #[tokio::test]
    async fn test_keys_and_clear() {
        let repo = repo().await;
        repo.set_item("userInfo", "{}").await.unwrap();
        repo.set_item("cartItems", "[]").await.unwrap();

        assert_eq!(repo.keys().await.unwrap(), vec!["cartItems", "userInfo"]);

        assert_eq!(repo.clear().await.unwrap(), 2);
        assert!(repo.keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_helpers() {
        let repo = repo().await;
        repo.set_json("numbers", &[1, 2, 3]).await.unwrap();

        let numbers: Option<Vec<u32>> = repo.get_json("numbers").await.unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        repo.set_item("broken", "{not json").await.unwrap();
        let err = repo.get_json::<Vec<u32>>("broken").await.unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "broken"));
    }
}

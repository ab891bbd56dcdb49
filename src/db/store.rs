//! Key-value store adapter.
//!
//! Every collection lives under a fixed key as one JSON document. Reads of an
//! unseeded key write the default before returning it.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use sqlx::{Row, SqlitePool};

use crate::errors::AppError;

/// Fixed storage keys, one per logical collection.
pub mod keys {
    pub const POSTS: &str = "schola_posts";
    pub const PERFORMANCE: &str = "schola_performance";
    pub const SETTINGS: &str = "schola_settings";
    pub const ADMIN_CREDS: &str = "schola_admin_creds";
    pub const TESTIMONIALS: &str = "schola_testimonials";
}

/// JSON document store over SQLite.
#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
    max_value_bytes: usize,
}

impl Store {
    pub fn new(pool: SqlitePool, max_value_bytes: usize) -> Self {
        Self {
            pool,
            max_value_bytes,
        }
    }

    /// Read the value under `key`, seeding it with `default` on first access.
    ///
    /// The seed insert is conditional, so concurrent first reads agree on one value.
    pub async fn get<T, F>(&self, key: &str, default: F) -> Result<T, AppError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        if let Some(raw) = self.fetch(key).await? {
            return decode(key, &raw);
        }

        let raw = self.encode(key, &default())?;
        let result = sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?) ON CONFLICT(key) DO NOTHING",
        )
        .bind(key)
        .bind(&raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            tracing::info!(key, "Seeded default value");
        }

        let raw = self
            .fetch(key)
            .await?
            .ok_or_else(|| AppError::StorageUnavailable(format!("Value for {} vanished", key)))?;
        decode(key, &raw)
    }

    /// Replace the value under `key`.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = self.encode(key, value)?;

        sqlx::query(
            r#"INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
               ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(&raw)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        tracing::debug!(key, bytes = raw.len(), "Stored value");
        Ok(())
    }

    /// Whether `key` has been written yet.
    pub async fn contains(&self, key: &str) -> Result<bool, AppError> {
        let row = sqlx::query("SELECT 1 AS present FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn fetch(&self, key: &str) -> Result<Option<String>, AppError> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|row| row.get("value")))
    }

    fn encode<T: Serialize>(&self, key: &str, value: &T) -> Result<String, AppError> {
        let raw = serde_json::to_string(value).map_err(|e| {
            AppError::Internal(format!("Failed to serialize value for {}: {}", key, e))
        })?;

        if raw.len() > self.max_value_bytes {
            tracing::warn!(
                key,
                bytes = raw.len(),
                limit = self.max_value_bytes,
                "Refusing oversized write"
            );
            return Err(AppError::StorageQuotaExceeded(format!(
                "Storage quota exceeded for {}: {} bytes (limit {})",
                key,
                raw.len(),
                self.max_value_bytes
            )));
        }
        Ok(raw)
    }
}

fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, AppError> {
    serde_json::from_str(raw).map_err(|e| {
        tracing::error!(key, "Corrupt stored value: {}", e);
        AppError::Internal(format!("Corrupt value under {}: {}", key, e))
    })
}

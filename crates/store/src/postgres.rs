//! Postgres-backed store over the `kv_entries` and `kv_counters` tables

use sqlx::PgPool;

use crate::{KeyValueStore, StoreError};

#[derive(Clone)]
pub struct PgKeyValueStore {
    pool: PgPool,
}

impl PgKeyValueStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = sqlx::query_scalar::<_, String>(
            r#"
            SELECT value
            FROM kv_entries
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<Option<String>, StoreError> {
        // ON CONFLICT DO NOTHING makes the insert the single arbiter between
        // concurrent writers; RETURNING yields a row only for the winner.
        let inserted = sqlx::query_scalar::<_, String>(
            r#"
            INSERT INTO kv_entries (key, value)
            VALUES ($1, $2)
            ON CONFLICT (key) DO NOTHING
            RETURNING value
            "#,
        )
        .bind(key)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        if inserted.is_some() {
            return Ok(None);
        }

        let existing = self.get(key).await?;
        tracing::debug!(key, "Keyed entry already present");
        Ok(Some(existing.unwrap_or_default()))
    }

    async fn incr(&self, name: &str) -> Result<i64, StoreError> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO kv_counters (name, value, updated_at)
            VALUES ($1, 1, NOW())
            ON CONFLICT (name)
            DO UPDATE SET value = kv_counters.value + 1, updated_at = NOW()
            RETURNING value
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await?;

        Ok(value)
    }

    async fn counter(&self, name: &str) -> Result<Option<i64>, StoreError> {
        let value = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT value
            FROM kv_counters
            WHERE name = $1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(value)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}

//! Letterbox keyed store
//!
//! All state that crosses requests lives behind [`KeyValueStore`]:
//! - write-once entries (`reply:{letter_id}` → answer)
//! - monotonic counters (`val_letters_created`, ...)
//!
//! Two backends are provided: Postgres for deployments and an in-memory map
//! for tests and local development.

use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryStore;
pub use postgres::PgKeyValueStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Backend(e.to_string())
    }
}

/// Keyed store contract shared by the reply ledger and the usage counters
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read a write-once entry
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Write `value` under `key` unless the key already holds a value.
    ///
    /// Returns `Ok(None)` when this call wrote the value, or `Ok(Some(existing))`
    /// when another writer got there first. Must be atomic with respect to
    /// concurrent callers using the same key.
    async fn set_if_absent(&self, key: &str, value: &str) -> Result<Option<String>, StoreError>;

    /// Increment a counter by one and return the new value
    async fn incr(&self, name: &str) -> Result<i64, StoreError>;

    /// Read a counter; `None` when it was never incremented
    async fn counter(&self, name: &str) -> Result<Option<i64>, StoreError>;

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}

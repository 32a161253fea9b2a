//! In-memory store used by tests and by local development without a database

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::{KeyValueStore, StoreError};

/// Map-backed [`KeyValueStore`].
///
/// Clones share the same maps. The store can be switched into a failing mode
/// to exercise the degraded paths of its callers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
    counters: Arc<Mutex<HashMap<String, i64>>>,
    failing: Arc<AtomicBool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every operation fails
    pub fn failing() -> Self {
        let store = Self::default();
        store.set_failing(true);
        store
    }

    /// Toggle the failing mode
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of write-once entries currently stored
    pub fn entry_count(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("in-memory store unavailable".to_string()));
        }
        Ok(())
    }
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend(format!("Lock error: {}", e))
}

#[async_trait::async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        let entries = self.entries.lock().map_err(lock_error)?;
        Ok(entries.get(key).cloned())
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        // Lookup and insert happen under one guard
        let mut entries = self.entries.lock().map_err(lock_error)?;
        if let Some(existing) = entries.get(key) {
            return Ok(Some(existing.clone()));
        }
        entries.insert(key.to_string(), value.to_string());
        Ok(None)
    }

    async fn incr(&self, name: &str) -> Result<i64, StoreError> {
        self.check_available()?;
        let mut counters = self.counters.lock().map_err(lock_error)?;
        let value = counters.entry(name.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn counter(&self, name: &str) -> Result<Option<i64>, StoreError> {
        self.check_available()?;
        let counters = self.counters.lock().map_err(lock_error)?;
        Ok(counters.get(name).copied())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

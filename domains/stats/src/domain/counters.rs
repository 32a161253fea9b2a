//! Usage counters
//!
//! Three monotonic counters kept in the keyed store. Counting is
//! non-critical: increments never fail their caller and a snapshot degrades
//! to zeros rather than erroring.

use std::sync::Arc;

use serde::Serialize;

use letterbox_store::KeyValueStore;

/// The counters tracked by the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Counter {
    LettersCreated,
    LettersOpened,
    YesClicks,
}

impl Counter {
    pub const ALL: [Counter; 3] = [
        Counter::LettersCreated,
        Counter::LettersOpened,
        Counter::YesClicks,
    ];

    /// Store key; shared with the web client's historical data
    pub fn key(&self) -> &'static str {
        match self {
            Counter::LettersCreated => "val_letters_created",
            Counter::LettersOpened => "val_letters_opened",
            Counter::YesClicks => "val_yes_clicks",
        }
    }
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Point-in-time read of all counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct UsageSnapshot {
    pub letters_created: i64,
    pub letters_opened: i64,
    pub yes_clicks: i64,
}

/// Counter service over the shared keyed store
#[derive(Clone)]
pub struct UsageCounters {
    store: Arc<dyn KeyValueStore>,
}

impl UsageCounters {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Bump a counter. Failures are logged and swallowed.
    pub async fn increment(&self, counter: Counter) {
        match self.store.incr(counter.key()).await {
            Ok(value) => tracing::debug!(counter = %counter, value, "Counter incremented"),
            Err(e) => tracing::warn!(counter = %counter, error = %e, "Failed to increment counter"),
        }
    }

    /// Read all counters concurrently; any failed read counts as zero
    pub async fn snapshot(&self) -> UsageSnapshot {
        let (letters_created, letters_opened, yes_clicks) = tokio::join!(
            self.read(Counter::LettersCreated),
            self.read(Counter::LettersOpened),
            self.read(Counter::YesClicks),
        );

        UsageSnapshot {
            letters_created,
            letters_opened,
            yes_clicks,
        }
    }

    async fn read(&self, counter: Counter) -> i64 {
        match self.store.counter(counter.key()).await {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                tracing::warn!(counter = %counter, error = %e, "Failed to read counter");
                0
            }
        }
    }
}

impl std::fmt::Debug for UsageCounters {
    #[mutants::skip] // Debug output only
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsageCounters")
            .field("backend", &self.store.backend_name())
            .finish()
    }
}

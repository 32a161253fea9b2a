//! Stats domain state

use crate::UsageCounters;

/// Application state for the Stats domain
#[derive(Clone)]
pub struct StatsState {
    pub counters: UsageCounters,
}

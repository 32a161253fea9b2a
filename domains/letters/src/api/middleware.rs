//! Letters domain state

use std::sync::Arc;

use letterbox_stats::UsageCounters;

use crate::persistence::LetterStore;

/// Application state for the Letters domain
#[derive(Clone)]
pub struct LettersState {
    pub letters: Arc<dyn LetterStore>,
    pub counters: UsageCounters,
}

//! Replies domain state

use std::sync::Arc;

use crate::ReplyLedger;

/// Application state for the Replies domain
#[derive(Clone)]
pub struct RepliesState {
    pub ledger: Arc<ReplyLedger>,
}

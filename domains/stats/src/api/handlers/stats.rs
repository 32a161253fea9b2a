//! Counter and stats API handlers
//!
//! The counter endpoints always answer success: counting must never break
//! the page that reports it.

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::api::middleware::StatsState;
use crate::domain::counters::{Counter, UsageSnapshot};

/// Record that a letter link was created client-side
pub async fn record_created(State(state): State<StatsState>) -> Json<Value> {
    state.counters.increment(Counter::LettersCreated).await;
    Json(json!({ "success": true }))
}

/// Record that a letter was opened
pub async fn record_opened(State(state): State<StatsState>) -> Json<Value> {
    state.counters.increment(Counter::LettersOpened).await;
    Json(json!({ "success": true }))
}

/// Read the usage counters
pub async fn get_stats(State(state): State<StatsState>) -> Json<UsageSnapshot> {
    Json(state.counters.snapshot().await)
}

//! Route definitions for Stats domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::stats;
use super::middleware::StatsState;

/// Create all Stats domain API routes
pub fn routes() -> Router<StatsState> {
    Router::new()
        .route("/api/create", post(stats::record_created))
        .route("/api/opened", post(stats::record_opened))
        .route("/api/stats", get(stats::get_stats))
}

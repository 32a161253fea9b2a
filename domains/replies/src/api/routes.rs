//! Route definitions for Replies domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::replies;
use super::middleware::RepliesState;

/// Create all Replies domain API routes
pub fn routes() -> Router<RepliesState> {
    Router::new()
        .route("/api/reply", post(replies::submit_reply))
        .route("/api/check", get(replies::check_reply))
}

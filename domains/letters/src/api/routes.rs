//! Route definitions for Letters domain API

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::letters;
use super::middleware::LettersState;

/// Create all Letters domain API routes
pub fn routes() -> Router<LettersState> {
    Router::new()
        .route("/api/letters", post(letters::create_letter))
        .route("/api/letters/{reference}", get(letters::get_letter))
}

//! HTTP API for the Letters domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::LettersState;
pub use routes::routes;

//! HTTP API for the Replies domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::RepliesState;
pub use routes::routes;

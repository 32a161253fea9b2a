//! HTTP API for the Stats domain

pub mod handlers;
pub mod middleware;
pub mod routes;

pub use middleware::StatsState;
pub use routes::routes;

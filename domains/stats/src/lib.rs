//! Stats domain: usage counters (letters created, letters opened, yes clicks)

pub mod api;
pub mod domain;

pub use domain::counters::{Counter, UsageCounters, UsageSnapshot};

pub use api::routes;
pub use api::StatsState;

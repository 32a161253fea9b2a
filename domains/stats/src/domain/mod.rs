//! Stats domain logic

pub mod counters;

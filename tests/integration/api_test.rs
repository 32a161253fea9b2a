//! API endpoint integration tests
//!
//! Drives the composed router end to end with in-memory backends, through
//! the same HTTP layers the binaries install.

#![allow(dead_code)]

mod common;
mod layers;
mod letters;
mod postgres;
mod replies;
mod stats;

//! Shared configuration, error handling, and extractors for Letterbox
//!
//! This crate provides common functionality used across the Letterbox services:
//! - Configuration management following 12-factor principles
//! - The HTTP-facing error type and its JSON rendering
//! - Request extractors shared by the domain routers

pub mod config;
pub mod error;
pub mod extractors;

pub use config::{Config, LetterPersistence, StoreBackend};
pub use error::{Error, Result};
pub use extractors::ValidatedJson;

//! Configuration management following 12-factor app principles
//!
//! All configuration is loaded from environment variables to ensure
//! clean separation between code and config.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

/// How issued letters are persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LetterPersistence {
    /// The link carries the whole letter as a compressed token
    Token,
    /// The link carries a row id resolved against the letters table
    Record,
}

impl FromStr for LetterPersistence {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" => Ok(Self::Token),
            "record" => Ok(Self::Record),
            other => Err(anyhow::anyhow!(
                "Unknown LETTER_PERSISTENCE: {}. Supported values: token, record",
                other
            )),
        }
    }
}

/// Backend for the shared keyed store (replies and counters)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" | "in-memory" => Ok(Self::Memory),
            other => Err(anyhow::anyhow!(
                "Unknown STORE_BACKEND: {}. Supported values: postgres, memory",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Database connection URL (required for the postgres backend)
    pub database_url: Option<String>,

    /// Keyed store backend
    pub store_backend: StoreBackend,

    /// Letter persistence strategy
    pub letter_persistence: LetterPersistence,

    /// Base URL used when building shareable links
    pub app_base_url: String,

    /// Comma-separated list of allowed CORS origins
    pub cors_allowed_origins: Option<String>,

    /// Runtime configuration
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let database_url = env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());

        let store_backend = match env::var("STORE_BACKEND") {
            Ok(value) => value.parse()?,
            Err(_) if database_url.is_some() => StoreBackend::Postgres,
            Err(_) => StoreBackend::Memory,
        };

        if store_backend == StoreBackend::Postgres && database_url.is_none() {
            return Err(anyhow::anyhow!(
                "DATABASE_URL is required when STORE_BACKEND=postgres"
            ));
        }

        let letter_persistence = match env::var("LETTER_PERSISTENCE") {
            Ok(value) => value.parse()?,
            Err(_) => LetterPersistence::Token,
        };

        let config = Self {
            database_url,
            store_backend,
            letter_persistence,
            app_base_url: env::var("APP_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string())
                .trim_end_matches('/')
                .to_string(),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS").ok(),
            rust_log: env::var("RUST_LOG").unwrap_or_else(|_| "letterbox=debug".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        };

        Ok(config)
    }
}

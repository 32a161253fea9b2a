//! Repository implementations for the Letters domain
//!
//! Only used by the record persistence strategy; token-mode letters never
//! touch the database.

pub mod letters;
pub mod memory;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use letterbox_common::Result;

use crate::domain::entities::{LetterRecord, Theme};

pub use letters::PgLetterRepository;
pub use memory::InMemoryLetterRepository;

/// Letter row as stored in the `letters` table
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct StoredLetter {
    pub id: Uuid,
    pub recipient_name: String,
    pub sender_name: String,
    pub message: String,
    pub theme_color: String,
    pub sender_email: String,
    pub music_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl StoredLetter {
    /// Build a fresh row for a validated letter
    pub fn new(record: &LetterRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            recipient_name: record.recipient_name().to_string(),
            sender_name: record.sender_name().to_string(),
            message: record.message().to_string(),
            theme_color: record.theme().as_str().to_string(),
            sender_email: record.sender_email().to_string(),
            music_id: record.music_id().map(str::to_string),
            created_at: Utc::now(),
        }
    }

    pub fn into_record(self) -> LetterRecord {
        LetterRecord::from_parts(
            self.recipient_name,
            self.sender_name,
            self.message,
            Theme::parse_or_default(Some(&self.theme_color)),
            self.sender_email,
            self.music_id,
        )
    }
}

/// Insert / find-by-id access to stored letters
#[async_trait::async_trait]
pub trait LetterRepository: Send + Sync {
    async fn create(&self, letter: &StoredLetter) -> Result<StoredLetter>;

    async fn find(&self, id: Uuid) -> Result<Option<StoredLetter>>;
}

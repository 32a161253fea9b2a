//! Letter persistence strategies
//!
//! `token`: the letter lives entirely inside its link; nothing is stored.
//! `record`: the letter is a row, the link carries only its id.
//!
//! The strategy is picked once at startup from `LETTER_PERSISTENCE`.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use letterbox_common::LetterPersistence;

use crate::domain::codec::{self, CodecError};
use crate::domain::entities::{LetterId, LetterRecord};
use crate::repository::{LetterRepository, StoredLetter};

#[derive(Error, Debug)]
pub enum LetterError {
    #[error("Invalid letter reference: {0}")]
    InvalidReference(String),

    #[error("Letter not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Backend(#[from] letterbox_common::Error),
}

impl From<LetterError> for letterbox_common::Error {
    fn from(e: LetterError) -> Self {
        match e {
            LetterError::InvalidReference(msg) => letterbox_common::Error::InvalidLink(msg),
            LetterError::NotFound(_) => {
                letterbox_common::Error::NotFound("Letter not found".to_string())
            }
            LetterError::Codec(codec) => codec.into(),
            LetterError::Backend(inner) => inner,
        }
    }
}

/// A freshly issued letter link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedLetter {
    pub letter_id: LetterId,
    /// What goes into the link: a token or a row id
    pub reference: String,
    pub url: String,
}

/// A letter read back from its reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLetter {
    pub letter_id: LetterId,
    pub record: LetterRecord,
}

#[async_trait::async_trait]
pub trait LetterStore: Send + Sync {
    /// Persist (or encode) a letter and mint its shareable link
    async fn issue(&self, record: &LetterRecord) -> Result<IssuedLetter, LetterError>;

    /// Read a letter back from the reference carried by its link
    async fn resolve(&self, reference: &str) -> Result<ResolvedLetter, LetterError>;

    fn strategy(&self) -> LetterPersistence;
}

/// Stateless strategy: the link is the storage
#[derive(Debug, Clone)]
pub struct TokenLetterStore {
    base_url: String,
}

impl TokenLetterStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait::async_trait]
impl LetterStore for TokenLetterStore {
    async fn issue(&self, record: &LetterRecord) -> Result<IssuedLetter, LetterError> {
        let nonce = Uuid::new_v4().simple().to_string();
        let token = codec::encode_with_nonce(record, &nonce)?;
        let letter_id = LetterId::from_token(&token);

        tracing::debug!(letter_id = %letter_id, token_len = token.len(), "Issued token letter");

        Ok(IssuedLetter {
            letter_id,
            url: format!("{}/open?d={}", self.base_url, token),
            reference: token,
        })
    }

    async fn resolve(&self, reference: &str) -> Result<ResolvedLetter, LetterError> {
        let token = codec::normalize_token(reference);
        let record = codec::decode(&token)?;

        Ok(ResolvedLetter {
            letter_id: LetterId::from_token(&token),
            record,
        })
    }

    fn strategy(&self) -> LetterPersistence {
        LetterPersistence::Token
    }
}

/// Stored strategy: letters are rows, links carry row ids
#[derive(Clone)]
pub struct RecordLetterStore {
    base_url: String,
    repository: Arc<dyn LetterRepository>,
}

impl RecordLetterStore {
    pub fn new(base_url: impl Into<String>, repository: Arc<dyn LetterRepository>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            repository,
        }
    }
}

#[async_trait::async_trait]
impl LetterStore for RecordLetterStore {
    async fn issue(&self, record: &LetterRecord) -> Result<IssuedLetter, LetterError> {
        let created = self.repository.create(&StoredLetter::new(record)).await?;

        tracing::debug!(letter_id = %created.id, "Stored letter record");

        Ok(IssuedLetter {
            letter_id: LetterId::from_uuid(created.id),
            reference: created.id.to_string(),
            url: format!("{}/invitation/{}", self.base_url, created.id),
        })
    }

    async fn resolve(&self, reference: &str) -> Result<ResolvedLetter, LetterError> {
        let id = Uuid::parse_str(reference.trim())
            .map_err(|_| LetterError::InvalidReference("Letter id is not a UUID".to_string()))?;

        let stored = self
            .repository
            .find(id)
            .await?
            .ok_or_else(|| LetterError::NotFound(id.to_string()))?;

        Ok(ResolvedLetter {
            letter_id: LetterId::from_uuid(stored.id),
            record: stored.into_record(),
        })
    }

    fn strategy(&self) -> LetterPersistence {
        LetterPersistence::Record
    }
}

//! Domain entities for the Letters domain
//!
//! A letter is a small immutable record. In token mode the record travels
//! inside the link itself, so every field here must survive the codec; in
//! record mode it is also a row in the `letters` table.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;
use validator::ValidateEmail;

use letterbox_common::{Error, Result};

use super::music::is_music_id;

/// Maximum recipient/sender name length (characters)
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum letter body length (characters)
pub const MAX_MESSAGE_LENGTH: usize = 5000;

/// Number of digest bytes kept in a token-derived letter id
const LETTER_ID_BYTES: usize = 16;

/// Visual theme of a letter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Red,
    #[default]
    Pink,
    Purple,
}

impl Theme {
    /// Parse a theme name case-insensitively; `None` for anything unrecognized
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "red" => Some(Theme::Red),
            "pink" => Some(Theme::Pink),
            "purple" => Some(Theme::Purple),
            _ => None,
        }
    }

    /// Parse a theme name, falling back to the default theme
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(Self::parse).unwrap_or_default()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Red => "red",
            Theme::Pink => "pink",
            Theme::Purple => "purple",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Letter content
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterRecord {
    to: String,
    from: String,
    message: String,
    theme: Theme,
    sender_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    music_id: Option<String>,
}

impl LetterRecord {
    /// Create a new letter from user input
    pub fn new(
        to: String,
        from: String,
        message: String,
        theme: Theme,
        sender_email: String,
        music_id: Option<String>,
    ) -> Result<Self> {
        let to = to.trim().to_string();
        let from = from.trim().to_string();
        let sender_email = sender_email.trim().to_string();

        validate_name("Recipient name", &to)?;
        validate_name("Sender name", &from)?;

        if message.trim().is_empty() {
            return Err(Error::Validation("Message is required".to_string()));
        }
        if message.chars().count() > MAX_MESSAGE_LENGTH {
            return Err(Error::Validation(format!(
                "Message must be at most {} characters",
                MAX_MESSAGE_LENGTH
            )));
        }

        if !sender_email.is_empty() && !sender_email.validate_email() {
            return Err(Error::Validation(
                "Sender email must be a valid email address".to_string(),
            ));
        }

        if let Some(ref id) = music_id {
            if !is_music_id(id) {
                return Err(Error::Validation("Invalid music id".to_string()));
            }
        }

        Ok(Self {
            to,
            from,
            message,
            theme,
            sender_email,
            music_id,
        })
    }

    /// Assemble a record read back from a token or a stored row.
    ///
    /// Only checks that the parts are present; content rules belong to
    /// [`LetterRecord::new`] so that previously issued links keep opening.
    pub(crate) fn from_parts(
        to: String,
        from: String,
        message: String,
        theme: Theme,
        sender_email: String,
        music_id: Option<String>,
    ) -> Self {
        Self {
            to,
            from,
            message,
            theme,
            sender_email,
            music_id: music_id.filter(|id| is_music_id(id)),
        }
    }

    pub fn recipient_name(&self) -> &str {
        &self.to
    }

    pub fn sender_name(&self) -> &str {
        &self.from
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn sender_email(&self) -> &str {
        &self.sender_email
    }

    pub fn music_id(&self) -> Option<&str> {
        self.music_id.as_deref()
    }
}

fn validate_name(label: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", label)));
    }
    if value.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "{} must be at most {} characters",
            label, MAX_NAME_LENGTH
        )));
    }
    Ok(())
}

/// Stable identifier of a letter, used to key replies
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LetterId(String);

impl LetterId {
    /// Derive the id of a token-mode letter: every holder of the same link
    /// derives the same id
    pub fn from_token(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        Self(hex::encode(&digest[..LETTER_ID_BYTES]))
    }

    /// Id of a record-mode letter
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LetterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

//! Domain entities for the Replies domain

use serde::Serialize;

/// Store key prefix for reply entries
pub const REPLY_KEY_PREFIX: &str = "reply:";

/// A recipient's answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    /// Interpret a submitted answer: only a case-insensitive "yes" is a yes
    pub fn normalize(raw: Option<&str>) -> Self {
        match raw {
            Some(value) if value.to_lowercase() == "yes" => Answer::Yes,
            _ => Answer::No,
        }
    }

    /// Interpret a stored answer; anything other than "yes" reads back as no
    pub fn from_stored(value: &str) -> Self {
        if value == "yes" {
            Answer::Yes
        } else {
            Answer::No
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Answer::Yes => "yes",
            Answer::No => "no",
        }
    }

    pub fn is_yes(&self) -> bool {
        matches!(self, Answer::Yes)
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The recorded answer for one letter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyEntry {
    pub letter_id: String,
    pub answer: Answer,
}

impl ReplyEntry {
    pub fn new(letter_id: impl Into<String>, answer: Answer) -> Self {
        Self {
            letter_id: letter_id.into(),
            answer,
        }
    }

    /// Store key holding this entry
    pub fn key(&self) -> String {
        store_key(&self.letter_id)
    }
}

pub fn store_key(letter_id: &str) -> String {
    format!("{}{}", REPLY_KEY_PREFIX, letter_id)
}

/// A reply as submitted by the recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplySubmission {
    /// Letter being answered; `None` disables deduplication
    pub letter_id: Option<String>,
    pub answer: Answer,
    pub message: String,
    pub sender_email: String,
    pub recipient_name: String,
}

impl ReplySubmission {
    /// Build a submission from raw request fields. Blank ids count as absent.
    pub fn new(
        letter_id: Option<String>,
        answer: Option<&str>,
        message: Option<String>,
        sender_email: Option<String>,
        recipient_name: Option<String>,
    ) -> Self {
        Self {
            letter_id: letter_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            answer: Answer::normalize(answer),
            message: message.unwrap_or_default(),
            sender_email: sender_email.unwrap_or_default().trim().to_string(),
            recipient_name: recipient_name.unwrap_or_default().trim().to_string(),
        }
    }
}

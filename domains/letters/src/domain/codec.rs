//! Letter codec: the link is the storage.
//!
//! A letter is serialized to JSON with camelCase field names and compressed
//! into the URL-safe alphabet of [`super::lz`]. Tokens are the only copy of
//! a token-mode letter, so decoding stays lenient about content (unknown
//! fields, legacy `themeColor`, malformed `musicId`) and strict only about
//! structure.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::entities::{LetterRecord, Theme};
use super::lz;

/// Longest token accepted for decoding (symbols)
pub const MAX_TOKEN_LEN: usize = 16 * 1024;

/// Largest decompressed payload accepted (UTF-16 code units)
pub const MAX_DECOMPRESSED_UNITS: usize = 256 * 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Token is empty")]
    Empty,

    #[error("Token is too long ({0} characters)")]
    TooLong(usize),

    #[error("Token contains an invalid character: {0:?}")]
    InvalidCharacter(char),

    #[error("Token payload is corrupt or too large")]
    Corrupt,

    #[error("Token payload is not valid text")]
    InvalidText,

    #[error("Token payload is not a letter: {0}")]
    Malformed(String),

    #[error("Failed to serialize letter: {0}")]
    Serialization(String),
}

impl From<CodecError> for letterbox_common::Error {
    fn from(e: CodecError) -> Self {
        match e {
            CodecError::Serialization(msg) => letterbox_common::Error::Internal(msg),
            other => letterbox_common::Error::InvalidLink(other.to_string()),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LetterWire<'a> {
    to: &'a str,
    from: &'a str,
    message: &'a str,
    theme: &'a str,
    // Legacy alias, still read by older clients
    theme_color: &'a str,
    sender_email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    music_id: Option<&'a str>,
    // Issue nonce; gives each issued link its own letter id
    #[serde(skip_serializing_if = "Option::is_none")]
    n: Option<&'a str>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct IncomingLetter {
    to: String,
    from: String,
    message: String,
    sender_email: String,
    #[serde(default)]
    theme: Option<Value>,
    #[serde(default)]
    theme_color: Option<Value>,
    #[serde(default)]
    music_id: Option<Value>,
}

/// Undo query-string decoding damage: `+` arrives as a space
pub fn normalize_token(raw: &str) -> String {
    raw.trim().replace(' ', "+")
}

/// Encode a letter into a URL-safe token
pub fn encode(record: &LetterRecord) -> Result<String, CodecError> {
    encode_wire(record, None)
}

/// Encode a letter together with a per-issue nonce.
///
/// The nonce is ignored on decode; it only makes the token, and with it the
/// letter id, unique to this issue.
pub fn encode_with_nonce(record: &LetterRecord, nonce: &str) -> Result<String, CodecError> {
    encode_wire(record, Some(nonce))
}

fn encode_wire(record: &LetterRecord, nonce: Option<&str>) -> Result<String, CodecError> {
    let theme = record.theme().as_str();
    let wire = LetterWire {
        to: record.recipient_name(),
        from: record.sender_name(),
        message: record.message(),
        theme,
        theme_color: theme,
        sender_email: record.sender_email(),
        music_id: record.music_id(),
        n: nonce,
    };

    let json =
        serde_json::to_string(&wire).map_err(|e| CodecError::Serialization(e.to_string()))?;
    Ok(lz::compress(&json))
}

/// Decode a token back into a letter. Never panics.
pub fn decode(token: &str) -> Result<LetterRecord, CodecError> {
    let token = normalize_token(token);

    if token.is_empty() {
        return Err(CodecError::Empty);
    }
    if token.len() > MAX_TOKEN_LEN {
        return Err(CodecError::TooLong(token.len()));
    }
    if let Some(bad) = token.chars().find(|c| !c.is_ascii() || lz::symbol_value(*c as u8).is_none()) {
        return Err(CodecError::InvalidCharacter(bad));
    }

    let units = lz::decompress(&token, MAX_DECOMPRESSED_UNITS).ok_or(CodecError::Corrupt)?;
    let json = String::from_utf16(&units).map_err(|_| CodecError::InvalidText)?;

    let value: Value =
        serde_json::from_str(&json).map_err(|e| CodecError::Malformed(e.to_string()))?;
    if !value.is_object() {
        return Err(CodecError::Malformed("expected a JSON object".to_string()));
    }
    let incoming: IncomingLetter =
        serde_json::from_value(value).map_err(|e| CodecError::Malformed(e.to_string()))?;

    let theme = resolve_theme(incoming.theme.as_ref(), incoming.theme_color.as_ref());
    let music_id = match incoming.music_id {
        Some(Value::String(id)) => Some(id),
        _ => None,
    };

    Ok(LetterRecord::from_parts(
        incoming.to,
        incoming.from,
        incoming.message,
        theme,
        incoming.sender_email,
        music_id,
    ))
}

/// `theme` if it is a non-empty string, else `themeColor`, else the default
fn resolve_theme(theme: Option<&Value>, theme_color: Option<&Value>) -> Theme {
    let non_empty = |v: Option<&Value>| match v {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    let name = non_empty(theme).or_else(|| non_empty(theme_color));
    Theme::parse_or_default(name.as_deref())
}

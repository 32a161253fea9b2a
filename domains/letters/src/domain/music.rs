//! Background-music references
//!
//! Letters may carry an 11-character video id. Senders paste whatever they
//! have (full watch URL, short link, embed URL, or the bare id), so the id
//! is pulled out with an ordered list of patterns.

use regex::Regex;

lazy_static::lazy_static! {
    /// Matchers in priority order; a full URL wins over a bare id
    static ref MUSIC_PATTERNS: [Regex; 2] = [
        Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/|youtube\.com/embed/)([A-Za-z0-9_-]{11})")
            .expect("static music URL pattern"),
        Regex::new(r"^([A-Za-z0-9_-]{11})$").expect("static music id pattern"),
    ];

    static ref MUSIC_ID_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("static music id pattern");
}

/// Extract a music id from a pasted URL or bare id
pub fn extract_music_reference(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    MUSIC_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures(trimmed)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Whether `value` already has the shape of a music id
pub fn is_music_id(value: &str) -> bool {
    MUSIC_ID_REGEX.is_match(value)
}

//! Letter API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use letterbox_common::{Result, ValidatedJson};
use letterbox_stats::Counter;

use crate::api::middleware::LettersState;
use crate::domain::entities::{LetterId, LetterRecord, Theme};
use crate::domain::music::extract_music_reference;

/// Request for creating a letter
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLetterRequest {
    pub to: String,
    pub from: String,
    pub message: String,

    /// Theme name; unknown values fall back to pink
    pub theme: Option<String>,

    /// Where to send the reply notification
    pub sender_email: Option<String>,

    /// Video URL or bare id for background music
    #[validate(length(max = 2048))]
    pub music_url: Option<String>,
}

/// Response for a created letter
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLetterResponse {
    pub letter_id: LetterId,
    pub reference: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_id: Option<String>,
}

/// Response for an opened letter
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LetterResponse {
    pub letter_id: LetterId,
    pub letter: LetterRecord,
}

/// Create a letter and mint its shareable link
pub async fn create_letter(
    State(state): State<LettersState>,
    ValidatedJson(req): ValidatedJson<CreateLetterRequest>,
) -> Result<(StatusCode, Json<CreateLetterResponse>)> {
    // A link we cannot read is dropped, not fatal: the letter still works without music
    let music_id = req.music_url.as_deref().and_then(extract_music_reference);

    let record = LetterRecord::new(
        req.to,
        req.from,
        req.message,
        Theme::parse_or_default(req.theme.as_deref()),
        req.sender_email.unwrap_or_default(),
        music_id,
    )?;

    let issued = state.letters.issue(&record).await?;

    tracing::info!(
        letter_id = %issued.letter_id,
        strategy = ?state.letters.strategy(),
        "Letter created"
    );

    state.counters.increment(Counter::LettersCreated).await;

    Ok((
        StatusCode::CREATED,
        Json(CreateLetterResponse {
            letter_id: issued.letter_id,
            reference: issued.reference,
            url: issued.url,
            music_id: record.music_id().map(str::to_string),
        }),
    ))
}

/// Open a letter from the reference carried by its link
pub async fn get_letter(
    State(state): State<LettersState>,
    Path(reference): Path<String>,
) -> Result<Json<LetterResponse>> {
    let resolved = state.letters.resolve(&reference).await?;

    Ok(Json(LetterResponse {
        letter_id: resolved.letter_id,
        letter: resolved.record,
    }))
}

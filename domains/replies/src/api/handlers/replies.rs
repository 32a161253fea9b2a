//! Reply API handlers
//!
//! Expected reply failures (store down, no sender identity, transport error)
//! are reported in a 200 body with `success: false` so the client can show
//! a message without treating the answer as lost.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use letterbox_common::{Error, Result, ValidatedJson};

use crate::api::middleware::RepliesState;
use crate::domain::entities::ReplySubmission;
use crate::domain::ledger::ReplyStatus;

/// Request for submitting a reply
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReplyRequest {
    /// Letter being answered; anything but a string disables deduplication
    #[serde(default, alias = "letterId")]
    pub id: Option<Value>,

    /// Anything but a case-insensitive "yes" counts as no
    #[serde(default)]
    pub answer: Option<Value>,

    // Free-text fields; non-strings are dropped
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub sender_email: Option<Value>,
    #[serde(default)]
    pub recipient_name: Option<Value>,
}

fn string_field(value: Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(text)) => Some(text),
        _ => None,
    }
}

impl ReplyRequest {
    fn into_submission(self) -> ReplySubmission {
        let id = string_field(self.id);
        let answer = self.answer.as_ref().and_then(Value::as_str);

        ReplySubmission::new(
            id,
            answer,
            string_field(self.message),
            string_field(self.sender_email),
            string_field(self.recipient_name),
        )
    }
}

/// Query params for checking a reply
#[derive(Debug, Deserialize)]
pub struct CheckReplyQuery {
    pub id: Option<String>,
}

/// Submit a recipient's answer
pub async fn submit_reply(
    State(state): State<RepliesState>,
    ValidatedJson(req): ValidatedJson<ReplyRequest>,
) -> Json<Value> {
    let submission = req.into_submission();

    match state.ledger.submit_reply(&submission).await {
        Ok(_) => Json(json!({ "success": true })),
        Err(e) => Json(json!({
            "success": false,
            "error": {
                "code": e.code(),
                "message": e.to_string(),
            }
        })),
    }
}

/// Check whether a letter has been answered
pub async fn check_reply(
    State(state): State<RepliesState>,
    Query(query): Query<CheckReplyQuery>,
) -> Result<Json<Value>> {
    let id = query
        .id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::Validation("Missing id query parameter".to_string()))?;

    let body = match state.ledger.reply_status(id).await {
        ReplyStatus::Replied(answer) => json!({ "replied": true, "answer": answer }),
        ReplyStatus::NotReplied => json!({ "replied": false }),
    };

    Ok(Json(body))
}

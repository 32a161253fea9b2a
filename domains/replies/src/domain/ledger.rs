//! Reply ledger
//!
//! Records at most one answer per letter and notifies the letter's sender
//! once. The write-once store entry is the single point of truth: the
//! lookup and the persist step are one atomic `set_if_absent`, so two
//! concurrent submissions for the same letter cannot both reach the
//! notification step.

use std::sync::Arc;

use thiserror::Error;

use letterbox_email::{ReplyNotice, SenderPool};
use letterbox_stats::{Counter, UsageCounters};
use letterbox_store::KeyValueStore;

use super::entities::{store_key, Answer, ReplyEntry, ReplySubmission};
use super::state::{ReplyEvent, ReplyState, ReplyStateMachine, Transition};

/// Successful result of a reply submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// This submission was accepted
    Recorded { notified: bool },
    /// The letter was answered earlier; the earlier answer stands
    AlreadyAnswered(Answer),
}

#[derive(Error, Debug)]
pub enum ReplyError {
    #[error("Reply store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("No notification sender identity is configured")]
    NoNotificationIdentity,

    #[error("Failed to send reply notification: {0}")]
    NotificationFailed(String),
}

impl ReplyError {
    pub fn code(&self) -> &'static str {
        match self {
            ReplyError::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            ReplyError::NoNotificationIdentity => "NO_NOTIFICATION_IDENTITY",
            ReplyError::NotificationFailed(_) => "NOTIFICATION_FAILED",
        }
    }
}

/// Whether a letter has been answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
    NotReplied,
    Replied(Answer),
}

pub struct ReplyLedger {
    store: Arc<dyn KeyValueStore>,
    counters: UsageCounters,
    senders: Arc<SenderPool>,
}

impl ReplyLedger {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        counters: UsageCounters,
        senders: Arc<SenderPool>,
    ) -> Self {
        Self {
            store,
            counters,
            senders,
        }
    }

    /// Record a reply and notify the letter's sender.
    ///
    /// Without a letter id nothing is deduplicated and every call notifies.
    /// A notification failure leaves the recorded answer in place.
    pub async fn submit_reply(
        &self,
        submission: &ReplySubmission,
    ) -> Result<ReplyOutcome, ReplyError> {
        if let Some(letter_id) = submission.letter_id.as_deref() {
            let entry = ReplyEntry::new(letter_id, submission.answer);

            let existing = self
                .store
                .set_if_absent(&entry.key(), entry.answer.as_str())
                .await
                .map_err(|e| {
                    tracing::error!(letter_id = %letter_id, error = %e, "Failed to persist reply");
                    ReplyError::StoreUnavailable(e.to_string())
                })?;

            let current = ReplyState::from_stored(existing.as_deref());
            match ReplyStateMachine::transition(current, ReplyEvent::Answer(entry.answer)) {
                Transition::Ignored(state) => {
                    let answer = state.answer().unwrap_or(Answer::No);
                    tracing::info!(
                        letter_id = %letter_id,
                        existing = %answer,
                        "Letter already answered, ignoring reply"
                    );
                    return Ok(ReplyOutcome::AlreadyAnswered(answer));
                }
                Transition::Recorded(_) => {
                    tracing::info!(letter_id = %letter_id, answer = %entry.answer, "Reply recorded");
                }
            }
        }

        if submission.answer.is_yes() {
            self.counters.increment(Counter::YesClicks).await;
        }

        if submission.sender_email.is_empty() {
            tracing::debug!("No sender email on letter, skipping notification");
            return Ok(ReplyOutcome::Recorded { notified: false });
        }

        let sender = self.senders.select().map_err(|e| {
            tracing::error!(error = %e, "No identity available for reply notification");
            ReplyError::NoNotificationIdentity
        })?;

        let notice = ReplyNotice {
            recipient_name: &submission.recipient_name,
            accepted: submission.answer.is_yes(),
            message: &submission.message,
        };

        match sender
            .send_reply_notification(&submission.sender_email, &notice)
            .await
        {
            Ok(receipt) => {
                tracing::info!(
                    sender = %receipt.sender,
                    provider = %receipt.provider,
                    message_id = %receipt.message_id,
                    "Reply notification sent"
                );
                Ok(ReplyOutcome::Recorded { notified: true })
            }
            Err(e) => {
                tracing::error!(
                    sender = %sender.sender_address(),
                    error = %e,
                    "Reply notification failed"
                );
                Err(ReplyError::NotificationFailed(e.to_string()))
            }
        }
    }

    /// Look up whether a letter has been answered. A store failure reads as
    /// not replied.
    pub async fn reply_status(&self, letter_id: &str) -> ReplyStatus {
        match self.store.get(&store_key(letter_id.trim())).await {
            Ok(Some(stored)) => ReplyStatus::Replied(Answer::from_stored(&stored)),
            Ok(None) => ReplyStatus::NotReplied,
            Err(e) => {
                tracing::warn!(letter_id = %letter_id, error = %e, "Failed to read reply status");
                ReplyStatus::NotReplied
            }
        }
    }
}

//! Replies domain: one answer per letter, one notification per answer

pub mod api;
pub mod domain;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Answer, ReplyEntry, ReplySubmission};
pub use domain::ledger::{ReplyError, ReplyLedger, ReplyOutcome, ReplyStatus};
pub use domain::state::{ReplyEvent, ReplyState, ReplyStateMachine, Transition};

// Re-export API types
pub use api::routes;
pub use api::RepliesState;

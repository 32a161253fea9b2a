//! State machine for a letter's reply
//!
//! Reply states: Unanswered → Answered(answer) (terminal)
//!
//! Answering an answered letter is not an error: the first answer stands and
//! the attempt is reported as ignored.

use super::entities::Answer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyState {
    Unanswered,
    Answered(Answer),
}

impl ReplyState {
    /// Build the current state from a stored value
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some(stored) => ReplyState::Answered(Answer::from_stored(stored)),
            None => ReplyState::Unanswered,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ReplyState::Answered(_))
    }

    pub fn answer(&self) -> Option<Answer> {
        match self {
            ReplyState::Answered(answer) => Some(*answer),
            ReplyState::Unanswered => None,
        }
    }
}

impl std::fmt::Display for ReplyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplyState::Unanswered => write!(f, "unanswered"),
            ReplyState::Answered(answer) => write!(f, "answered({})", answer),
        }
    }
}

/// Events that drive reply state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyEvent {
    Answer(Answer),
}

/// Result of applying an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The event changed the state; side effects should run
    Recorded(ReplyState),
    /// The event was a no-op; carries the state that stands
    Ignored(ReplyState),
}

impl Transition {
    pub fn state(&self) -> ReplyState {
        match self {
            Transition::Recorded(state) | Transition::Ignored(state) => *state,
        }
    }
}

/// Reply state machine
pub struct ReplyStateMachine;

impl ReplyStateMachine {
    /// Apply an event to the current state
    pub fn transition(current: ReplyState, event: ReplyEvent) -> Transition {
        match (current, event) {
            (ReplyState::Unanswered, ReplyEvent::Answer(answer)) => {
                Transition::Recorded(ReplyState::Answered(answer))
            }
            (ReplyState::Answered(_), ReplyEvent::Answer(_)) => Transition::Ignored(current),
        }
    }
}

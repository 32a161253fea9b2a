//! Sender pool: spreads notifications across the configured identities

use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rand::Rng;

use crate::{EmailError, EmailService};

/// How a sender is picked for each notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    Random,
    RoundRobin,
}

impl FromStr for SelectionPolicy {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "round-robin" | "round_robin" | "roundrobin" => Ok(Self::RoundRobin),
            other => Err(EmailError::Configuration(format!(
                "Unknown EMAIL_SELECTION: {}. Supported values: random, round-robin",
                other
            ))),
        }
    }
}

pub struct SenderPool {
    senders: Vec<Arc<dyn EmailService>>,
    policy: SelectionPolicy,
    cursor: AtomicUsize,
}

impl SenderPool {
    pub fn new(senders: Vec<Arc<dyn EmailService>>, policy: SelectionPolicy) -> Self {
        Self {
            senders,
            policy,
            cursor: AtomicUsize::new(0),
        }
    }

    pub fn len(&self) -> usize {
        self.senders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.senders.is_empty()
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Pick the sender for the next notification
    pub fn select(&self) -> Result<Arc<dyn EmailService>, EmailError> {
        if self.senders.is_empty() {
            return Err(EmailError::Configuration(
                "No notification sender identity configured".to_string(),
            ));
        }

        let index = match self.policy {
            SelectionPolicy::Random => rand::thread_rng().gen_range(0..self.senders.len()),
            SelectionPolicy::RoundRobin => {
                self.cursor.fetch_add(1, Ordering::Relaxed) % self.senders.len()
            }
        };

        Ok(Arc::clone(&self.senders[index]))
    }
}

impl std::fmt::Debug for SenderPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let senders: Vec<&str> = self.senders.iter().map(|s| s.sender_address()).collect();
        f.debug_struct("SenderPool")
            .field("senders", &senders)
            .field("policy", &self.policy)
            .finish()
    }
}

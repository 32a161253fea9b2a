//! Mock Email Service Implementation
//!
//! Provides in-memory email capture for testing without external dependencies.
//! Used by the integration tests to count reply notifications, and can be
//! switched into a failing mode to simulate transport errors.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{EmailError, EmailMessage, EmailReceipt, EmailService};

const DEFAULT_MOCK_SENDER: &str = "notifications@letterbox.local";

/// Email captured by the mock service
#[derive(Debug, Clone)]
pub struct CapturedEmail {
    pub message: EmailMessage,
    pub receipt: EmailReceipt,
    pub captured_at: DateTime<Utc>,
}

impl CapturedEmail {
    /// Answer recorded in the notification metadata ("yes" / "no")
    pub fn answer(&self) -> Option<&str> {
        self.message.metadata.get("answer").map(String::as_str)
    }
}

/// Mock email service for testing
#[derive(Debug, Clone)]
pub struct MockEmailService {
    sender: String,
    emails: Arc<Mutex<Vec<CapturedEmail>>>,
    email_by_recipient: Arc<Mutex<HashMap<String, Vec<CapturedEmail>>>>,
    enabled: bool,
    failing: Arc<AtomicBool>,
}

impl MockEmailService {
    /// Create a new mock email service
    pub fn new() -> Self {
        Self::with_sender(DEFAULT_MOCK_SENDER)
    }

    /// Create a mock service sending as the given identity
    pub fn with_sender(sender: impl Into<String>) -> Self {
        Self {
            sender: sender.into(),
            emails: Arc::new(Mutex::new(Vec::new())),
            email_by_recipient: Arc::new(Mutex::new(HashMap::new())),
            enabled: true,
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a disabled mock email service (for testing)
    pub fn new_disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new()
        }
    }

    /// Create a mock service whose sends fail like a broken transport
    pub fn failing() -> Self {
        let service = Self::new();
        service.set_failing(true);
        service
    }

    /// Toggle transport failures
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Get all captured emails
    pub fn get_all_emails(&self) -> Vec<CapturedEmail> {
        self.emails.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Get emails sent to a specific recipient
    pub fn get_emails_for_recipient(&self, email: &str) -> Vec<CapturedEmail> {
        self.email_by_recipient
            .lock()
            .ok()
            .and_then(|by_recipient| by_recipient.get(email).cloned())
            .unwrap_or_default()
    }

    /// Get count of emails sent
    pub fn email_count(&self) -> usize {
        self.emails.lock().map(|e| e.len()).unwrap_or(0)
    }

    /// Clear all captured emails
    pub fn clear(&self) {
        if let Ok(mut emails) = self.emails.lock() {
            emails.clear();
        }
        if let Ok(mut by_recipient) = self.email_by_recipient.lock() {
            by_recipient.clear();
        }
    }

    /// Check if email sending is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Default for MockEmailService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl EmailService for MockEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        if self.failing.load(Ordering::SeqCst) {
            tracing::warn!("Mock email service simulating transport failure");
            return Err(EmailError::Smtp("simulated transport failure".to_string()));
        }

        if !self.enabled {
            tracing::warn!("Mock email service disabled, skipping send");
            return Ok(EmailReceipt {
                message_id: format!("disabled-{}", Uuid::new_v4()),
                sent_at: Utc::now(),
                provider: "mock-disabled".to_string(),
                sender: self.sender.clone(),
            });
        }

        tracing::info!("Mock email service capturing email to: {}", message.to);

        let receipt = EmailReceipt {
            message_id: format!("mock-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "mock".to_string(),
            sender: self.sender.clone(),
        };

        let captured = CapturedEmail {
            message: message.clone(),
            receipt: receipt.clone(),
            captured_at: Utc::now(),
        };

        self.emails
            .lock()
            .map_err(|e| EmailError::Smtp(format!("Lock error: {}", e)))?
            .push(captured.clone());

        self.email_by_recipient
            .lock()
            .map_err(|e| EmailError::Smtp(format!("Lock error: {}", e)))?
            .entry(message.to)
            .or_default()
            .push(captured);

        Ok(receipt)
    }

    fn sender_address(&self) -> &str {
        &self.sender
    }

    fn service_name(&self) -> &'static str {
        "mock"
    }
}

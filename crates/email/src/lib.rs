//! Letterbox Email Service
//!
//! Delivers reply notifications to letter senders with support for:
//! - SMTP relays (one authenticated account per sender identity)
//! - AWS SES integration (one verified address per sender identity)
//! - Mock email service for testing and development
//! - A [`SenderPool`] that spreads deliveries across configured identities

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod aws_ses;
pub mod content;
pub mod mock;
pub mod pool;
pub mod smtp;

pub use content::ReplyNotice;
pub use pool::{SelectionPolicy, SenderPool};

/// Highest `NOTIFY_SENDER_{n}_*` index scanned from the environment
pub const MAX_IDENTITIES: usize = 8;

#[derive(Error, Debug)]
pub enum EmailError {
    #[error("Email configuration error: {0}")]
    Configuration(String),

    #[error("Email validation error: {0}")]
    Validation(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("AWS SES error: {0}")]
    AwsSes(String),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Email message to be sent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailMessage {
    pub to: String,
    pub from: String,
    pub subject: String,
    pub body_text: String,
    pub body_html: Option<String>,
    pub metadata: HashMap<String, String>,
}

impl EmailMessage {
    /// Create a new email message
    pub fn new(to: String, from: String, subject: String, body_text: String) -> Self {
        Self {
            to,
            from,
            subject,
            body_text,
            body_html: None,
            metadata: HashMap::new(),
        }
    }

    /// Add HTML body content
    pub fn with_html(mut self, body_html: String) -> Self {
        self.body_html = Some(body_html);
        self
    }

    /// Add metadata for tracking
    pub fn with_metadata(mut self, key: String, value: String) -> Self {
        self.metadata.insert(key, value);
        self
    }
}

/// Email delivery receipt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailReceipt {
    pub message_id: String,
    pub sent_at: DateTime<Utc>,
    pub provider: String,
    pub sender: String,
}

/// One outbound sender credential
#[derive(Clone, PartialEq, Eq)]
pub struct NotificationIdentity {
    pub address: String,
    pub password: Option<String>,
}

impl NotificationIdentity {
    pub fn new(address: impl Into<String>, password: Option<String>) -> Self {
        Self {
            address: address.into(),
            password,
        }
    }
}

impl fmt::Debug for NotificationIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NotificationIdentity")
            .field("address", &self.address)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Email service configuration
#[derive(Debug, Clone)]
pub struct EmailConfig {
    /// Email service provider (smtp, ses, mock)
    pub provider: String,
    /// Enable email sending (can disable for testing)
    pub enabled: bool,
    /// Sender identities, in configuration order
    pub identities: Vec<NotificationIdentity>,
    /// How a sender is picked for each notification
    pub selection: SelectionPolicy,
    /// SMTP relay host and port
    pub smtp_host: String,
    pub smtp_port: u16,
    /// AWS region for SES
    pub aws_region: Option<String>,
    /// AWS endpoint URL (for LocalStack)
    pub aws_endpoint_url: Option<String>,
    /// Display name used in the From header
    pub from_name: String,
}

impl EmailConfig {
    /// Create email config from environment variables
    pub fn from_env() -> Result<Self, EmailError> {
        dotenvy::dotenv().ok();

        let provider = std::env::var("EMAIL_PROVIDER").unwrap_or_else(|_| "mock".to_string());

        let enabled = std::env::var("EMAIL_ENABLED")
            .unwrap_or_else(|_| "true".to_string())
            .parse()
            .unwrap_or(true);

        let selection = match std::env::var("EMAIL_SELECTION") {
            Ok(value) => value.parse()?,
            Err(_) => SelectionPolicy::Random,
        };

        let smtp_port = match std::env::var("SMTP_PORT") {
            Ok(value) => value.parse().map_err(|_| {
                EmailError::Configuration(format!("SMTP_PORT is not a port number: {}", value))
            })?,
            Err(_) => 587,
        };

        Ok(Self {
            provider,
            enabled,
            identities: identities_from_env(),
            selection,
            smtp_host: std::env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port,
            aws_region: std::env::var("AWS_REGION").ok(),
            aws_endpoint_url: std::env::var("AWS_ENDPOINT_URL").ok(),
            from_name: std::env::var("EMAIL_FROM_NAME").unwrap_or_else(|_| "Letterbox".to_string()),
        })
    }

    /// Identities usable by the configured provider.
    ///
    /// SMTP needs a password per identity; SES and mock only need the address.
    pub fn usable_identities(&self) -> Vec<NotificationIdentity> {
        let needs_password = matches!(self.provider.as_str(), "smtp");
        self.identities
            .iter()
            .filter(|identity| {
                let usable = !needs_password || identity.password.is_some();
                if !usable {
                    tracing::warn!(
                        sender = %identity.address,
                        "Skipping sender identity without a password"
                    );
                }
                usable
            })
            .cloned()
            .collect()
    }
}

/// Scan `NOTIFY_SENDER_{n}_ADDRESS` / `NOTIFY_SENDER_{n}_PASSWORD` for n in 1..=MAX_IDENTITIES
fn identities_from_env() -> Vec<NotificationIdentity> {
    (1..=MAX_IDENTITIES)
        .filter_map(|n| {
            let address = std::env::var(format!("NOTIFY_SENDER_{}_ADDRESS", n))
                .ok()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())?;
            let password = std::env::var(format!("NOTIFY_SENDER_{}_PASSWORD", n))
                .ok()
                .filter(|p| !p.is_empty());
            Some(NotificationIdentity::new(address, password))
        })
        .collect()
}

/// Email service trait for different implementations.
///
/// Each instance sends as exactly one identity.
#[async_trait::async_trait]
pub trait EmailService: Send + Sync {
    /// Send an email message
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError>;

    /// Address of the identity this service sends as
    fn sender_address(&self) -> &str;

    /// Provider name for logs and receipts
    fn service_name(&self) -> &'static str;

    /// Notify a letter's sender that the recipient replied
    async fn send_reply_notification(
        &self,
        sender_email: &str,
        notice: &ReplyNotice<'_>,
    ) -> Result<EmailReceipt, EmailError> {
        let message = EmailMessage::new(
            sender_email.to_string(),
            self.sender_address().to_string(),
            content::reply_subject(notice),
            content::reply_text(notice)?,
        )
        .with_html(content::reply_html(notice)?)
        .with_metadata("email_type".to_string(), "reply_notification".to_string())
        .with_metadata("answer".to_string(), notice.answer_label().to_lowercase());

        self.send_email(message).await
    }
}

/// Email service factory
pub struct EmailServiceFactory;

impl EmailServiceFactory {
    /// Create the sender pool based on configuration.
    ///
    /// An empty pool is not an error here: replies are still recorded and the
    /// missing identity surfaces as a failed notification.
    pub async fn create_pool(config: EmailConfig) -> Result<SenderPool, EmailError> {
        if !config.enabled {
            tracing::info!("Email service disabled, using mock implementation");
            return Ok(SenderPool::new(
                vec![Arc::new(mock::MockEmailService::new_disabled())],
                config.selection,
            ));
        }

        let identities = config.usable_identities();

        let senders: Vec<Arc<dyn EmailService>> = match config.provider.as_str() {
            "smtp" => {
                tracing::info!(count = identities.len(), "Creating SMTP sender pool");
                identities
                    .into_iter()
                    .map(|identity| {
                        smtp::SmtpEmailService::new(&config, identity)
                            .map(|s| Arc::new(s) as Arc<dyn EmailService>)
                    })
                    .collect::<Result<_, _>>()?
            }
            "ses" | "aws-ses" => {
                tracing::info!(count = identities.len(), "Creating AWS SES sender pool");
                let client = aws_ses::SesEmailService::connect(&config).await;
                identities
                    .into_iter()
                    .map(|identity| {
                        Arc::new(aws_ses::SesEmailService::new(
                            client.clone(),
                            identity.address,
                            config.from_name.clone(),
                        )) as Arc<dyn EmailService>
                    })
                    .collect()
            }
            "mock" => {
                tracing::info!("Creating mock sender pool");
                if identities.is_empty() {
                    vec![Arc::new(mock::MockEmailService::new()) as Arc<dyn EmailService>]
                } else {
                    identities
                        .into_iter()
                        .map(|identity| {
                            Arc::new(mock::MockEmailService::with_sender(identity.address))
                                as Arc<dyn EmailService>
                        })
                        .collect()
                }
            }
            provider => {
                return Err(EmailError::Configuration(format!(
                    "Unknown email provider: {}. Supported providers: smtp, ses, mock",
                    provider
                )))
            }
        };

        if senders.is_empty() {
            tracing::warn!(
                provider = %config.provider,
                "No sender identities configured; reply notifications will fail"
            );
        }

        Ok(SenderPool::new(senders, config.selection))
    }
}

//! SMTP Email Service Implementation
//!
//! Sends through an authenticated STARTTLS relay (Gmail by default). Each
//! sender identity owns its own pooled transport and credentials.

use chrono::Utc;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use uuid::Uuid;

use crate::{
    EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService, NotificationIdentity,
};

/// SMTP email service bound to a single sender identity
pub struct SmtpEmailService {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
    from_name: String,
}

impl SmtpEmailService {
    /// Create a service for one identity. No connection is opened until the
    /// first send.
    pub fn new(config: &EmailConfig, identity: NotificationIdentity) -> Result<Self, EmailError> {
        let password = identity.password.ok_or_else(|| {
            EmailError::Configuration(format!(
                "Missing SMTP password for sender {}",
                identity.address
            ))
        })?;

        let credentials = Credentials::new(identity.address.clone(), password);

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| EmailError::Smtp(e.to_string()))?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        tracing::info!(
            host = %config.smtp_host,
            port = config.smtp_port,
            sender = %identity.address,
            "Created SMTP sender"
        );

        Ok(Self {
            transport,
            sender: identity.address,
            from_name: config.from_name.clone(),
        })
    }

    /// Build a lettre Message from our EmailMessage type.
    fn build_message(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let from_address: Address = message
            .from
            .parse()
            .map_err(|e| EmailError::Validation(format!("From '{}': {}", message.from, e)))?;
        let to_address: Address = message
            .to
            .parse()
            .map_err(|e| EmailError::Validation(format!("To '{}': {}", message.to, e)))?;

        let builder = Message::builder()
            .from(Mailbox::new(Some(self.from_name.clone()), from_address))
            .to(Mailbox::new(None, to_address))
            .subject(&message.subject);

        let built = match &message.body_html {
            Some(html) => builder.multipart(MultiPart::alternative_plain_html(
                message.body_text.clone(),
                html.clone(),
            )),
            None => builder
                .header(ContentType::TEXT_PLAIN)
                .body(message.body_text.clone()),
        };

        built.map_err(|e| EmailError::Smtp(format!("Failed to build message: {}", e)))
    }
}

#[async_trait::async_trait]
impl EmailService for SmtpEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        tracing::info!(sender = %self.sender, "Sending email via SMTP to: {}", message.to);

        let email = self.build_message(&message)?;

        self.transport
            .send(email)
            .await
            .map_err(|e| EmailError::Smtp(format!("Failed to send email: {}", e)))?;

        Ok(EmailReceipt {
            message_id: format!("smtp-{}", Uuid::new_v4()),
            sent_at: Utc::now(),
            provider: "smtp".to_string(),
            sender: self.sender.clone(),
        })
    }

    fn sender_address(&self) -> &str {
        &self.sender
    }

    fn service_name(&self) -> &'static str {
        "smtp"
    }
}

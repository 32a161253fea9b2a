//! AWS SES Email Service Implementation
//!
//! Provides production email delivery through AWS Simple Email Service (SES)
//! with support for LocalStack testing environment. Every sender identity is
//! a verified SES address sharing one client.

use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_ses::config::SharedCredentialsProvider;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use aws_sdk_ses::Client as SesClient;
use chrono::Utc;

use crate::{EmailConfig, EmailError, EmailMessage, EmailReceipt, EmailService};

/// AWS SES email service implementation
pub struct SesEmailService {
    client: SesClient,
    sender: String,
    from_name: String,
}

impl SesEmailService {
    /// Build the SES client shared by every identity in the pool
    pub async fn connect(config: &EmailConfig) -> SesClient {
        let region = config
            .aws_region
            .clone()
            .unwrap_or_else(|| "us-east-1".to_string());

        let aws_config = match config.aws_endpoint_url.as_ref() {
            Some(endpoint_url) => {
                tracing::info!("Using custom AWS endpoint: {}", endpoint_url);

                // For LocalStack, use dummy credentials
                let credentials = Credentials::new(
                    "test-access-key",
                    "test-secret-key",
                    None,
                    None,
                    "localstack-email-provider",
                );

                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region))
                    .endpoint_url(endpoint_url)
                    .credentials_provider(SharedCredentialsProvider::new(credentials))
                    .load()
                    .await
            }
            None => {
                aws_config::defaults(BehaviorVersion::latest())
                    .region(Region::new(region))
                    .load()
                    .await
            }
        };

        SesClient::new(&aws_config)
    }

    /// Create a service sending as one verified address
    pub fn new(client: SesClient, sender: String, from_name: String) -> Self {
        Self {
            client,
            sender,
            from_name,
        }
    }

    fn build_ses_message(&self, message: &EmailMessage) -> Result<Message, EmailError> {
        let mut body = Body::builder().text(utf8(&message.body_text, "text body")?);
        if let Some(html) = &message.body_html {
            body = body.html(utf8(html, "html body")?);
        }

        Ok(Message::builder()
            .subject(utf8(&message.subject, "subject")?)
            .body(body.build())
            .build())
    }
}

fn utf8(data: &str, part: &str) -> Result<Content, EmailError> {
    Content::builder()
        .data(data)
        .charset("UTF-8")
        .build()
        .map_err(|e| EmailError::AwsSes(format!("Invalid {}: {}", part, e)))
}

#[async_trait::async_trait]
impl EmailService for SesEmailService {
    async fn send_email(&self, message: EmailMessage) -> Result<EmailReceipt, EmailError> {
        tracing::info!(sender = %self.sender, "Sending email via AWS SES to: {}", message.to);

        if !message.to.contains('@') || !message.from.contains('@') {
            return Err(EmailError::Validation(
                "Invalid email address format".to_string(),
            ));
        }

        let ses_message = self.build_ses_message(&message)?;
        let destination = Destination::builder().to_addresses(&message.to).build();
        let source = format!("\"{}\" <{}>", self.from_name.replace('"', ""), message.from);

        let result = self
            .client
            .send_email()
            .source(source)
            .destination(destination)
            .message(ses_message)
            .send()
            .await
            .map_err(|e| EmailError::AwsSes(format!("Failed to send email: {}", e)))?;

        tracing::debug!(message_id = %result.message_id(), "SES accepted message");

        Ok(EmailReceipt {
            message_id: result.message_id().to_string(),
            sent_at: Utc::now(),
            provider: "aws-ses".to_string(),
            sender: self.sender.clone(),
        })
    }

    fn sender_address(&self) -> &str {
        &self.sender
    }

    fn service_name(&self) -> &'static str {
        "aws-ses"
    }
}

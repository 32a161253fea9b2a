//! Reply notification content
//!
//! Bodies are askama templates under `templates/`. The `.html` template
//! escapes every interpolated value; the `.txt` template renders verbatim.

use askama::Template;

use crate::EmailError;

/// Shown in place of an empty reply message
pub const EMPTY_MESSAGE_PLACEHOLDER: &str = "No message written.";

/// What the recipient answered, as rendered into a notification
#[derive(Debug, Clone, Copy)]
pub struct ReplyNotice<'a> {
    pub recipient_name: &'a str,
    pub accepted: bool,
    pub message: &'a str,
}

impl ReplyNotice<'_> {
    pub fn answer_label(&self) -> &'static str {
        if self.accepted {
            "Yes"
        } else {
            "No"
        }
    }

    fn message_or_placeholder(&self) -> &str {
        let trimmed = self.message.trim();
        if trimmed.is_empty() {
            EMPTY_MESSAGE_PLACEHOLDER
        } else {
            trimmed
        }
    }
}

#[derive(Template)]
#[template(path = "reply_notification.html")]
struct ReplyHtml<'a> {
    recipient_name: &'a str,
    answer: &'static str,
    message: &'a str,
}

#[derive(Template)]
#[template(path = "reply_notification.txt")]
struct ReplyText<'a> {
    recipient_name: &'a str,
    answer: &'static str,
    message: &'a str,
}

/// Subject line for a reply notification.
pub fn reply_subject(notice: &ReplyNotice<'_>) -> String {
    // Subjects are plain text; strip line breaks so the name cannot inject headers
    let name: String = notice
        .recipient_name
        .chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .collect();
    format!("💌 {} replied: {}!", name, notice.answer_label())
}

/// Plain-text body for a reply notification.
pub fn reply_text(notice: &ReplyNotice<'_>) -> Result<String, EmailError> {
    ReplyText {
        recipient_name: notice.recipient_name,
        answer: notice.answer_label(),
        message: notice.message_or_placeholder(),
    }
    .render()
    .map_err(EmailError::from)
}

/// HTML body for a reply notification.
pub fn reply_html(notice: &ReplyNotice<'_>) -> Result<String, EmailError> {
    ReplyHtml {
        recipient_name: notice.recipient_name,
        answer: notice.answer_label(),
        message: notice.message_or_placeholder(),
    }
    .render()
    .map_err(EmailError::from)
}

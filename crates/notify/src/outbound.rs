use {
    async_trait::async_trait,
    deskroute_common::types::{TicketId, UserId},
    serde::Serialize,
    std::fmt,
    tracing::info,
};

use crate::Result;

/// The two delivery paths for a leader notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Note,
}

impl NotificationChannel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Note => "note",
        }
    }
}

impl fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transactional email about one ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailMessage {
    pub ticket_id: TicketId,
    pub recipient_id: UserId,
    /// Recipient address.
    pub to: String,
    /// Language the host should localize the mail in.
    pub lang: Option<String>,
    pub subject: String,
    pub body: String,
}

/// An in-application note posted on a ticket for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub ticket_id: TicketId,
    pub recipient_id: UserId,
    pub subject: String,
    pub body: String,
}

/// Submit transactional email. Returning `Ok` means the host accepted the
/// message, not that it was delivered.
#[async_trait]
pub trait MailSender: Send + Sync {
    async fn send_mail(&self, message: &MailMessage) -> Result<()>;
}

/// Post notes to a ticket's in-application discussion.
#[async_trait]
pub trait NoteSink: Send + Sync {
    async fn post_note(&self, note: &Note) -> Result<()>;
}

/// Mail sender that only writes the message to the log.
pub struct LogMailSender;

#[async_trait]
impl MailSender for LogMailSender {
    async fn send_mail(&self, message: &MailMessage) -> Result<()> {
        info!(
            ticket_id = %message.ticket_id,
            to = %message.to,
            lang = message.lang.as_deref().unwrap_or("default"),
            subject = %message.subject,
            "mail submitted"
        );
        Ok(())
    }
}

/// Note sink that only writes the note to the log.
pub struct LogNoteSink;

#[async_trait]
impl NoteSink for LogNoteSink {
    async fn post_note(&self, note: &Note) -> Result<()> {
        info!(
            ticket_id = %note.ticket_id,
            recipient_id = %note.recipient_id,
            subject = %note.subject,
            "note posted"
        );
        Ok(())
    }
}

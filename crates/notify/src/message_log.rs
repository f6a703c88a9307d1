use std::{
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use {
    async_trait::async_trait,
    deskroute_common::types::{TicketId, UserId},
    serde::Serialize,
};

use crate::{NotificationChannel, Result};

/// One channel attempt of a leader notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationLogEntry {
    pub ticket_id: TicketId,
    pub recipient_id: UserId,
    pub channel: NotificationChannel,
    pub subject: String,
    pub delivered: bool,
    pub error: Option<String>,
    /// Unix timestamp in milliseconds.
    pub created_at: i64,
}

impl NotificationLogEntry {
    pub fn new(
        ticket_id: TicketId,
        recipient_id: UserId,
        channel: NotificationChannel,
        subject: impl Into<String>,
        outcome: std::result::Result<(), String>,
    ) -> Self {
        let created_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or_default();
        Self {
            ticket_id,
            recipient_id,
            channel,
            subject: subject.into(),
            delivered: outcome.is_ok(),
            error: outcome.err(),
            created_at,
        }
    }
}

/// Audit trail of notification attempts.
#[async_trait]
pub trait NotificationLog: Send + Sync {
    async fn record(&self, entry: NotificationLogEntry) -> Result<()>;
    async fn list_by_ticket(&self, ticket_id: TicketId) -> Result<Vec<NotificationLogEntry>>;
}

/// In-memory log. No persistence.
#[derive(Default)]
pub struct MemoryNotificationLog {
    entries: Mutex<Vec<NotificationLogEntry>>,
}

impl MemoryNotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every recorded entry, oldest first.
    pub fn entries(&self) -> Vec<NotificationLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl NotificationLog for MemoryNotificationLog {
    async fn record(&self, entry: NotificationLogEntry) -> Result<()> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.push(entry);
        Ok(())
    }

    async fn list_by_ticket(&self, ticket_id: TicketId) -> Result<Vec<NotificationLogEntry>> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        Ok(entries
            .iter()
            .filter(|e| e.ticket_id == ticket_id)
            .cloned()
            .collect())
    }
}

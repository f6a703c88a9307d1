//! Team-leader notification channels.
//!
//! A notification goes out over two independent channels: a transactional
//! email ([`MailSender`]) and an in-application note on the ticket
//! ([`NoteSink`]). Message text comes from a [`MessageRenderer`], either the
//! configured template or a synthesized fallback.

pub mod error;
pub mod message_log;
pub mod outbound;
pub mod render;

pub use {
    error::{Error, Result},
    message_log::{MemoryNotificationLog, NotificationLog, NotificationLogEntry},
    outbound::{LogMailSender, LogNoteSink, MailMessage, MailSender, Note, NoteSink, NotificationChannel},
    render::{
        FallbackRenderer, MessageRenderer, NotificationContent, RenderedMessage, TemplateRenderer,
        select_renderer,
    },
};

use deskroute_common::FromMessage;

/// Crate-wide result type for notification operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Typed notification errors shared across channels and renderers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The message template could not be rendered.
    #[error("invalid message template: {message}")]
    Template { message: String },

    /// The recipient cannot be reached on this channel.
    #[error("no usable recipient: {message}")]
    NoRecipient { message: String },

    /// Channel is not configured or not ready.
    #[error("notification channel unavailable: {message}")]
    Unavailable { message: String },

    #[error("{0}")]
    Message(String),
}

impl Error {
    #[must_use]
    pub fn template(message: impl std::fmt::Display) -> Self {
        Self::Template {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn no_recipient(message: impl std::fmt::Display) -> Self {
        Self::NoRecipient {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn unavailable(message: impl std::fmt::Display) -> Self {
        Self::Unavailable {
            message: message.to_string(),
        }
    }
}

impl FromMessage for Error {
    fn from_message(message: String) -> Self {
        Self::Message(message)
    }
}

deskroute_common::impl_context!();

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("team directory unavailable: {message}")]
    DirectoryUnavailable { message: String },
}

impl Error {
    #[must_use]
    pub fn directory_unavailable(message: impl Into<String>) -> Self {
        Self::DirectoryUnavailable {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

//! Centralized error types for mailsink.

use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the mailsink library.
#[derive(Error, Debug)]
pub enum MailsinkError {
    /// I/O error with the associated file path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The attachment destination is missing or not a directory.
    #[error("Attachment directory not usable: {0}")]
    InvalidSaveDir(PathBuf),

    /// The raw input could not be decoded as an email message.
    #[error("Unable to decode message: {0}")]
    Parse(String),

    /// The sender is not on the configured allow-list.
    #[error("{0} is not an allowed sender")]
    SenderRejected(String),

    /// The writer ran out of candidate names for an attachment.
    #[error("Could not claim a unique name for '{name}' after {attempts} attempts")]
    SaveExhausted { name: String, attempts: u32 },
}

/// Convenience alias for `Result<T, MailsinkError>`.
pub type Result<T> = std::result::Result<T, MailsinkError>;

/// Helper to convert a bare `std::io::Error` together with a path.
impl MailsinkError {
    /// Create an `Io` variant from a path and an `io::Error`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Allow `?` on `std::io::Error` inside functions returning `MailsinkError`
/// when no path context is available (rare; prefer `MailsinkError::io`).
impl From<std::io::Error> for MailsinkError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::from("<unknown>"),
            source,
        }
    }
}

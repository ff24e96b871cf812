//! Final output of processing one message.

use crate::model::attachment::SavedFile;

/// Everything extracted from one accepted message.
///
/// Handed to the reporting collaborators (database insert, receipt email)
/// and printable as JSON. Built once per message, never reused.
#[derive(Debug, Clone, serde::Serialize)]
pub struct MessageResult {
    /// Bare sender address that passed the allow-list.
    pub from: String,

    /// Decoded Subject header (empty when the message had none).
    pub subject: String,

    /// Cleaned plain-text body, or a fixed placeholder when the message
    /// carried no plain text.
    pub body: String,

    /// Attachments written to disk, in encounter order. Final names are
    /// unique, so this doubles as a name-keyed collection.
    pub files: Vec<SavedFile>,
}

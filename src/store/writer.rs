//! Collision-free attachment persistence.
//!
//! One destination directory may be shared by any number of concurrent
//! invocations; exclusive creation (`O_CREAT | O_EXCL`) is the only
//! synchronization between them.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{MailsinkError, Result};
use crate::model::attachment::SavedFile;

/// Gives up after this many candidate names. Every attempt past the first
/// carries a numeric suffix, so exhaustion cannot be caused by a stuck clock.
const MAX_SAVE_ATTEMPTS: u32 = 64;

/// Writes attachments into one destination directory under unique names.
#[derive(Debug, Clone)]
pub struct AttachmentStore {
    dir: PathBuf,
}

impl AttachmentStore {
    /// Open a store over an existing directory.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.is_dir() {
            return Err(MailsinkError::InvalidSaveDir(dir));
        }
        Ok(Self { dir })
    }

    /// Directory this store writes into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Persist `content` under a unique timestamped name derived from
    /// `desired`, returning the record for the written file.
    ///
    /// The final name is `<unix-seconds>_<sanitized>`; retries refresh the
    /// timestamp and append `_<n>`. Existence is re-checked on every
    /// iteration, but the `create_new` open is what actually claims a name,
    /// so two concurrent callers can never both win the same one; the loser
    /// moves on to the next candidate.
    pub fn save(&self, desired: &str, content: &[u8], mime_type: &str) -> Result<SavedFile> {
        let base = sanitize_base_name(desired);

        for attempt in 0..MAX_SAVE_ATTEMPTS {
            let stamp = chrono::Utc::now().timestamp();
            let name = if attempt == 0 {
                format!("{stamp}_{base}")
            } else {
                format!("{stamp}_{base}_{attempt}")
            };
            let path = self.dir.join(&name);

            if path.exists() {
                continue;
            }

            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                    tracing::debug!(name = %name, "lost creation race, retrying");
                    continue;
                }
                Err(e) => return Err(MailsinkError::io(path, e)),
            };

            if let Err(e) = file.write_all(content) {
                // Never leave a partial file claiming success.
                drop(file);
                let _ = std::fs::remove_file(&path);
                return Err(MailsinkError::io(path, e));
            }
            drop(file);

            tracing::debug!(name = %name, bytes = content.len(), "attachment written");
            return Ok(SavedFile::new(name, content.len() as u64, mime_type));
        }

        Err(MailsinkError::SaveExhausted {
            name: base,
            attempts: MAX_SAVE_ATTEMPTS,
        })
    }
}

/// Sanitize a base file name: every character outside `[A-Za-z0-9_-]`
/// becomes `_`. An empty input falls back to `file`.
pub fn sanitize_base_name(s: &str) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

//! Top-level message processing: the sender gate and the decode steps.

use crate::config::Config;
use crate::decode::{self, uudecode};
use crate::error::{MailsinkError, Result};
use crate::model::address::EmailAddress;
use crate::model::message::MessageResult;
use crate::parser::message;
use crate::store::writer::AttachmentStore;

/// MIME type recorded for files recovered from uuencoded blocks.
const UU_MIME_TYPE: &str = "unknown";

/// Drives one message from raw bytes to a [`MessageResult`].
pub struct MessagePipeline<'a> {
    config: &'a Config,
    store: AttachmentStore,
}

impl<'a> MessagePipeline<'a> {
    /// Build a pipeline over the configured destination directory.
    pub fn new(config: &'a Config) -> Result<Self> {
        let store = AttachmentStore::new(&config.storage.save_dir)?;
        Ok(Self { config, store })
    }

    /// Process one raw message.
    ///
    /// The sender gate runs before anything touches the filesystem: a
    /// rejected sender means zero side effects.
    pub fn process(&self, raw: &[u8]) -> Result<MessageResult> {
        let parsed = message::parse_message(raw)?;

        let sender = EmailAddress::parse(&parsed.from);
        if !self.config.policy.is_sender_allowed(&sender.address) {
            return Err(MailsinkError::SenderRejected(sender.address));
        }
        tracing::debug!(from = %sender, subject = %parsed.subject, "sender accepted");

        let mut outcome =
            decode::decode_message(&parsed.root, &self.config.policy, &self.store)?;

        let (body, uu_files) = uudecode::extract_uuencoded(&outcome.body);
        for file in uu_files {
            let saved = self.store.save(&file.name, &file.data, UU_MIME_TYPE)?;
            tracing::info!(name = %saved.name, size = %saved.size, "uuencoded file saved");
            outcome.files.push(saved);
        }

        Ok(MessageResult {
            from: sender.address,
            subject: parsed.subject,
            body,
            files: outcome.files,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PolicyConfig, StorageConfig};

    const SIMPLE: &[u8] = b"From: Alice <alice@example.com>\r\n\
Subject: Hi\r\n\
Content-Type: text/plain\r\n\
\r\n\
Hello pipeline\r\n";

    fn test_config(dir: &std::path::Path, senders: &[&str]) -> Config {
        Config {
            storage: StorageConfig {
                save_dir: dir.to_path_buf(),
            },
            policy: PolicyConfig {
                allowed_senders: senders.iter().map(|s| s.to_string()).collect(),
                ..PolicyConfig::default()
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_rejected_sender_has_zero_side_effects() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), &[]);
        let pipeline = MessagePipeline::new(&config).unwrap();

        let err = pipeline.process(SIMPLE).unwrap_err();
        assert!(matches!(err, MailsinkError::SenderRejected(ref a) if a == "alice@example.com"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_accepted_sender_produces_result() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path(), &["alice@example.com"]);
        let pipeline = MessagePipeline::new(&config).unwrap();

        let result = pipeline.process(SIMPLE).unwrap();
        assert_eq!(result.from, "alice@example.com");
        assert_eq!(result.subject, "Hi");
        assert!(result.body.contains("Hello pipeline"));
        assert!(result.files.is_empty());
    }
}

//! The decoding walk: classify every part, accumulate body text, persist
//! attachments.

pub mod classify;
pub mod uudecode;

use crate::config::PolicyConfig;
use crate::error::Result;
use crate::model::attachment::SavedFile;
use crate::model::part::MimePart;
use crate::parser::message::decode_text_bytes;
use crate::store::writer::AttachmentStore;

use classify::{classify, resolve_filename, PartClass};

/// Body placeholder when the whole message is one inline binary.
pub const BINARY_BODY: &str = "Body was a binary";

/// Body placeholder when the tree holds no plain-text part at all.
pub const NO_BODY: &str = "No plain text body found";

/// Maximum tree depth the walk will follow.
const MAX_DEPTH: usize = 10;

/// Body text and files produced by walking one message tree.
#[derive(Debug, Clone, Default)]
pub struct DecodeOutcome {
    /// Concatenated text/plain fragments, or a placeholder.
    pub body: String,
    /// Attachments persisted during the walk, in encounter order.
    pub files: Vec<SavedFile>,
}

/// Walk the decoded tree, saving attachments through `store`.
///
/// A multipart root is always walked child by child. A *non-multipart* root
/// carrying an inline disposition is the whole message: its bytes are saved
/// as a single attachment (the allow-list is not consulted for this case)
/// and the body becomes [`BINARY_BODY`]. A tree that yields no body text at
/// all comes back with [`NO_BODY`].
pub fn decode_message(
    root: &MimePart,
    policy: &PolicyConfig,
    store: &AttachmentStore,
) -> Result<DecodeOutcome> {
    let mut outcome = DecodeOutcome::default();

    let root_meta = root.meta();
    if !root_meta.is_multipart() && root_meta.disposition.as_deref() == Some("inline") {
        if let MimePart::Leaf { body, .. } = root {
            let filename = resolve_filename(root_meta);
            let saved = store.save(&filename, body, &root_meta.mime_type())?;
            tracing::info!(name = %saved.name, size = %saved.size, "inline message body saved");
            outcome.files.push(saved);
            outcome.body = BINARY_BODY.to_string();
            return Ok(outcome);
        }
    }

    walk(root, policy, store, 0, &mut outcome)?;

    if outcome.body.is_empty() {
        outcome.body = NO_BODY.to_string();
    }
    Ok(outcome)
}

/// Recursive step. Accumulators travel in `outcome`; nothing else is shared.
fn walk(
    part: &MimePart,
    policy: &PolicyConfig,
    store: &AttachmentStore,
    depth: usize,
    outcome: &mut DecodeOutcome,
) -> Result<()> {
    match classify(part.meta(), policy) {
        PartClass::Container => {
            let MimePart::Container { children, .. } = part else {
                // A multipart leaf (collapsed by the parser) has nothing to walk.
                return Ok(());
            };
            if depth >= MAX_DEPTH {
                tracing::warn!(depth, "part nesting too deep, skipping subtree");
                return Ok(());
            }
            for child in children {
                walk(child, policy, store, depth + 1, outcome)?;
            }
        }
        PartClass::Body => {
            if let MimePart::Leaf { body, .. } = part {
                outcome.body.push_str(&decode_text_bytes(body));
                outcome.body.push('\n');
            }
        }
        PartClass::Attachment {
            filename,
            mime_type,
        } => {
            if let MimePart::Leaf { body, .. } = part {
                let saved = store.save(&filename, body, &mime_type)?;
                tracing::info!(
                    name = %saved.name,
                    size = %saved.size,
                    mime = %saved.mime_type,
                    "attachment saved"
                );
                outcome.files.push(saved);
            }
        }
        PartClass::Discard => {
            tracing::debug!(mime = %part.meta().mime_type(), "part discarded");
        }
    }
    Ok(())
}

//! Per-part classification: body text, named attachment, or container.

use crate::config::PolicyConfig;
use crate::model::part::PartMeta;

/// Fallback filename when neither header names the part.
pub const DEFAULT_FILENAME: &str = "file";

/// What the walk should do with one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartClass {
    /// Recurse into the children.
    Container,
    /// Append the part's text to the message body.
    Body,
    /// Persist the part under `filename` with `mime_type`.
    Attachment { filename: String, mime_type: String },
    /// Neither body nor an allowed attachment; dropped silently.
    Discard,
}

/// Classify one part from its header metadata.
///
/// The check order is the policy: containers first, then the bare text/plain
/// body case, then the attachment allow-list. Parts matching nothing are
/// discarded without a trace; unclassified binary content is never
/// persisted.
pub fn classify(meta: &PartMeta, policy: &PolicyConfig) -> PartClass {
    if meta.is_multipart() {
        return PartClass::Container;
    }

    let mime_type = meta.mime_type();
    if mime_type == "text/plain" && meta.disposition.is_none() {
        return PartClass::Body;
    }

    if policy.is_mime_allowed(&mime_type) {
        return PartClass::Attachment {
            filename: resolve_filename(meta),
            mime_type,
        };
    }

    PartClass::Discard
}

/// Resolve an attachment's filename.
///
/// Mail clients disagree about where the name lives, so this is an ordered
/// lookup chain: the content-type `name` parameter wins, then the
/// disposition `filename` parameter, then the literal fallback.
pub fn resolve_filename(meta: &PartMeta) -> String {
    meta.type_name
        .as_deref()
        .or(meta.disposition_filename.as_deref())
        .unwrap_or(DEFAULT_FILENAME)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(primary: &str, secondary: &str) -> PartMeta {
        PartMeta {
            primary_type: primary.to_string(),
            secondary_type: secondary.to_string(),
            ..PartMeta::default()
        }
    }

    fn default_policy() -> PolicyConfig {
        PolicyConfig::default()
    }

    #[test]
    fn test_multipart_is_container() {
        let m = meta("multipart", "mixed");
        assert_eq!(classify(&m, &default_policy()), PartClass::Container);
    }

    #[test]
    fn test_plain_text_without_disposition_is_body() {
        let m = meta("text", "plain");
        assert_eq!(classify(&m, &default_policy()), PartClass::Body);
    }

    #[test]
    fn test_plain_text_with_disposition_is_not_body() {
        let mut m = meta("text", "plain");
        m.disposition = Some("attachment".to_string());
        // Not in the default allow-list either, so it drops.
        assert_eq!(classify(&m, &default_policy()), PartClass::Discard);
    }

    #[test]
    fn test_allowed_mime_is_attachment() {
        let mut m = meta("application", "zip");
        m.type_name = Some("archive.zip".to_string());
        match classify(&m, &default_policy()) {
            PartClass::Attachment { filename, mime_type } => {
                assert_eq!(filename, "archive.zip");
                assert_eq!(mime_type, "application/zip");
            }
            other => panic!("expected attachment, got {other:?}"),
        }
    }

    #[test]
    fn test_disallowed_mime_is_discarded() {
        let m = meta("video", "mp4");
        assert_eq!(classify(&m, &default_policy()), PartClass::Discard);
    }

    #[test]
    fn test_filename_content_type_wins() {
        let mut m = meta("application", "pdf");
        m.type_name = Some("foo.txt".to_string());
        m.disposition_filename = Some("bar.txt".to_string());
        assert_eq!(resolve_filename(&m), "foo.txt");
    }

    #[test]
    fn test_filename_falls_back_to_disposition() {
        let mut m = meta("application", "pdf");
        m.disposition_filename = Some("bar.txt".to_string());
        assert_eq!(resolve_filename(&m), "bar.txt");
    }

    #[test]
    fn test_filename_literal_fallback() {
        let m = meta("application", "pdf");
        assert_eq!(resolve_filename(&m), DEFAULT_FILENAME);
    }
}

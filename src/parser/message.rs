//! Adapter from `mail-parser`'s output to the decoded tree the walk consumes.
//!
//! This is the crate's only contact with the MIME grammar itself; everything
//! downstream sees [`MimePart`] and plain strings.

use mail_parser::{Message, MessageParser, MessagePart, MimeHeaders, PartType};

use crate::error::{MailsinkError, Result};
use crate::model::part::{MimePart, PartMeta};

/// Maximum depth for adapting nested multipart structure. Deeper nodes are
/// kept as opaque leaves instead of recursing further.
const MAX_DEPTH: usize = 10;

/// A fully decoded message: envelope strings plus the MIME tree.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    /// Decoded `From` header value (display name and/or address).
    pub from: String,
    /// Decoded `Subject` header value (empty when missing).
    pub subject: String,
    /// Root of the decoded MIME tree.
    pub root: MimePart,
}

/// Parse one complete raw RFC-2822 message into a [`ParsedMessage`].
///
/// Uses `mail-parser` internally; an input it cannot recognize as a message
/// at all is a fatal [`MailsinkError::Parse`].
pub fn parse_message(raw: &[u8]) -> Result<ParsedMessage> {
    // Tolerate mbox-style delivery: skip a leading "From " separator line.
    let message_bytes = skip_from_line(raw);

    let msg = MessageParser::default()
        .parse(message_bytes)
        .ok_or_else(|| MailsinkError::Parse("input is not an RFC 2822 message".into()))?;

    let root = build_part(&msg, 0, 0)
        .ok_or_else(|| MailsinkError::Parse("message has no decodable content".into()))?;

    Ok(ParsedMessage {
        from: from_header(&msg),
        subject: msg.subject().unwrap_or_default().to_string(),
        root,
    })
}

/// Reassemble the `From` header as a single string.
///
/// Prefers the structured address (`Name <addr>` when both are known), and
/// falls back to the raw header value so that even malformed senders reach
/// the allow-list check unchanged.
fn from_header(msg: &Message<'_>) -> String {
    if let Some(addr) = msg.from().and_then(|a| a.first()) {
        match (addr.name(), addr.address()) {
            (Some(name), Some(address)) => return format!("{name} <{address}>"),
            (None, Some(address)) => return address.to_string(),
            _ => {}
        }
    }
    msg.header_raw("From")
        .map(|raw| raw.trim().to_string())
        .unwrap_or_default()
}

/// Build the tree node for `part_id`, recursing into multipart children.
fn build_part(msg: &Message<'_>, part_id: usize, depth: usize) -> Option<MimePart> {
    let part = msg.parts.get(part_id)?;
    let meta = part_meta(part);

    if let PartType::Multipart(children) = &part.body {
        if depth >= MAX_DEPTH {
            tracing::warn!(depth, "multipart nesting too deep, keeping raw bytes");
            return Some(MimePart::Leaf {
                meta,
                body: part.contents().to_vec(),
            });
        }
        let children = children
            .iter()
            .filter_map(|id| build_part(msg, *id, depth + 1))
            .collect();
        return Some(MimePart::Container { meta, children });
    }

    // Text, binary and nested-message parts all become leaves; `contents()`
    // yields the transfer-decoded bytes in every case.
    Some(MimePart::Leaf {
        meta,
        body: part.contents().to_vec(),
    })
}

/// Extract lowercased type/disposition metadata for one part.
fn part_meta(part: &MessagePart<'_>) -> PartMeta {
    let (primary_type, secondary_type, type_name) = match part.content_type() {
        Some(ct) => (
            ct.ctype().to_lowercase(),
            ct.subtype().unwrap_or_default().to_lowercase(),
            ct.attribute("name").map(str::to_string),
        ),
        // RFC 2045 default when no Content-Type header is present.
        None => ("text".to_string(), "plain".to_string(), None),
    };

    let (disposition, disposition_filename) = match part.content_disposition() {
        Some(d) => (
            Some(d.ctype().to_lowercase()),
            d.attribute("filename").map(str::to_string),
        ),
        None => (None, None),
    };

    PartMeta {
        primary_type,
        secondary_type,
        type_name,
        disposition,
        disposition_filename,
    }
}

/// Decode body bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts every
/// byte), so downstream accumulation and storage only ever see valid UTF-8.
pub fn decode_text_bytes(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

/// Skip the `From ` separator line some delivery agents prepend.
fn skip_from_line(data: &[u8]) -> &[u8] {
    // Handle BOM
    let data = if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    };

    if data.starts_with(b"From ") {
        if let Some(pos) = data.iter().position(|&b| b == b'\n') {
            return &data[pos + 1..];
        }
    }
    data
}

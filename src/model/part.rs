//! Decoded MIME tree consumed by the decoding walk.
//!
//! Built once per message by the parser adapter, read-only afterwards.

/// Header-derived metadata for one MIME part.
///
/// Types and disposition values are lowercased by the parser adapter, so
/// comparisons here are plain string equality.
#[derive(Debug, Clone, Default)]
pub struct PartMeta {
    /// Primary content type (e.g. `"text"`, `"multipart"`, `"application"`).
    pub primary_type: String,

    /// Secondary content type (e.g. `"plain"`, `"mixed"`, `"pdf"`).
    pub secondary_type: String,

    /// Content-Type `name` parameter, a client-supplied filename.
    pub type_name: Option<String>,

    /// Content-Disposition value (`"inline"`, `"attachment"`), if the header
    /// was present at all.
    pub disposition: Option<String>,

    /// Content-Disposition `filename` parameter.
    pub disposition_filename: Option<String>,
}

impl PartMeta {
    /// Full `primary/secondary` MIME type string.
    pub fn mime_type(&self) -> String {
        format!("{}/{}", self.primary_type, self.secondary_type)
    }

    /// `true` when the primary type is `multipart`.
    pub fn is_multipart(&self) -> bool {
        self.primary_type == "multipart"
    }
}

/// One node of the decoded message tree.
///
/// A node is either a container with ordered children or a leaf with decoded
/// body bytes; the variant makes the "never both" invariant structural.
#[derive(Debug, Clone)]
pub enum MimePart {
    /// A `multipart/*` node. Children keep document order.
    Container {
        meta: PartMeta,
        children: Vec<MimePart>,
    },

    /// A terminal node carrying its decoded body.
    Leaf { meta: PartMeta, body: Vec<u8> },
}

impl MimePart {
    /// Header metadata for this node, whichever variant it is.
    pub fn meta(&self) -> &PartMeta {
        match self {
            MimePart::Container { meta, .. } | MimePart::Leaf { meta, .. } => meta,
        }
    }
}

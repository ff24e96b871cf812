//! Records for attachments that made it to disk.

/// Size units for [`format_size`], largest divisor last.
const SIZE_UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// A persisted attachment.
///
/// Created only after the attachment store has fully written and closed the
/// file, so a `SavedFile` always refers to complete on-disk content. The
/// `name` is unique within the destination directory for the run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SavedFile {
    /// Final on-disk file name (timestamp-prefixed, sanitized).
    pub name: String,

    /// Exact number of bytes written.
    pub bytes: u64,

    /// Human-readable size, e.g. `"1.5 KB"`.
    pub size: String,

    /// MIME content type as supplied by the caller (e.g. `"application/pdf"`).
    pub mime_type: String,
}

impl SavedFile {
    /// Build a record for `bytes` of written content.
    pub fn new(name: impl Into<String>, bytes: u64, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes,
            size: format_size(bytes),
            mime_type: mime_type.into(),
        }
    }
}

/// Format a byte count into the largest applicable unit (divisor 1024),
/// rounded to two decimals with trailing zeros dropped: `1536` → `"1.5 KB"`,
/// `1073741824` → `"1 GB"`, `0` → `"0 B"`.
pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 B".to_string();
    }
    let exp = (((bytes as f64).ln() / 1024_f64.ln()).floor() as usize).min(SIZE_UNITS.len() - 1);
    let value = bytes as f64 / 1024_f64.powi(exp as i32);
    // Round to two decimals; `f64`'s Display drops the trailing zeros.
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, SIZE_UNITS[exp])
}

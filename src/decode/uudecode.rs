//! Legacy uuencoded blocks embedded in plain-text bodies.
//!
//! Some senders still paste `begin 644 name … end` blocks straight into the
//! message text. Those are decoded into files and removed from the body.

use std::sync::OnceLock;

use regex::Regex;

/// A file recovered from one uuencoded block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UuFile {
    /// Filename captured from the `begin` line.
    pub name: String,
    /// Decoded payload bytes.
    pub data: Vec<u8>,
}

/// The classic envelope: a `begin <octal-mode> <filename>` line, content
/// lines, and a terminating `end` line. Lazy quantifiers with
/// dot-matches-newline keep each match to the smallest enclosing block.
fn block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?s)begin ([0-7]{3}) (.+?)\r?\n(.+?)\r?\nend").expect("valid pattern")
    })
}

/// Find, decode and strip every uuencoded block in `body`.
///
/// Returns the cleaned body and the decoded files in document order. With no
/// blocks present the body comes back unchanged, so the call is idempotent
/// on already-cleaned text.
pub fn extract_uuencoded(body: &str) -> (String, Vec<UuFile>) {
    let re = block_pattern();

    let files: Vec<UuFile> = re
        .captures_iter(body)
        .map(|caps| UuFile {
            name: caps[2].to_string(),
            data: decode_block(&caps[3]),
        })
        .collect();

    if files.is_empty() {
        return (body.to_string(), files);
    }

    // Strip every matched envelope, replacing it with a single newline.
    // Removal can butt a stray `begin` line up against a later `end` line;
    // those residual envelopes are stripped too (never decoded), so the
    // cleaned body carries no uuencode leftovers. Each pass removes at
    // least one `begin`, which bounds the loop.
    let mut cleaned = body.to_string();
    while re.is_match(&cleaned) {
        cleaned = re.replace_all(&cleaned, "\n").into_owned();
    }
    (cleaned, files)
}

/// Decode the content lines of one block.
fn decode_block(content: &str) -> Vec<u8> {
    let mut out = Vec::new();
    for line in content.lines() {
        decode_line(line.as_bytes(), &mut out);
    }
    out
}

/// Decode one uuencoded line: a length character, then 4-character groups
/// carrying 3 bytes each, with 2- and 3-character tails for short remainders.
fn decode_line(line: &[u8], out: &mut Vec<u8>) {
    let Some(&len_char) = line.first() else {
        return;
    };
    let len = (six(len_char)) as usize;
    if len == 0 {
        // "`" (or space) terminator line carries no data.
        return;
    }

    let chars = &line[1..];
    let mut pos = 0;
    let mut decoded = 0;

    while decoded + 3 <= len && pos + 4 <= chars.len() {
        let (c0, c1, c2, c3) = (
            six(chars[pos]),
            six(chars[pos + 1]),
            six(chars[pos + 2]),
            six(chars[pos + 3]),
        );
        out.push((c0 << 2) | (c1 >> 4));
        out.push((c1 << 4) | (c2 >> 2));
        out.push((c2 << 6) | c3);
        pos += 4;
        decoded += 3;
    }

    if decoded + 2 <= len && pos + 3 <= chars.len() {
        let (c0, c1, c2) = (six(chars[pos]), six(chars[pos + 1]), six(chars[pos + 2]));
        out.push((c0 << 2) | (c1 >> 4));
        out.push((c1 << 4) | (c2 >> 2));
        pos += 3;
        decoded += 2;
    }

    if decoded + 1 <= len && pos + 2 <= chars.len() {
        let (c0, c1) = (six(chars[pos]), six(chars[pos + 1]));
        out.push((c0 << 2) | (c1 >> 4));
    }
}

/// Map one encoded character back to its 6-bit value.
fn six(c: u8) -> u8 {
    c.wrapping_sub(0x20) & 0x3F
}

#[cfg(test)]
mod tests {
    use super::*;

    // "#0V%T" decodes to "Cat", "#1&]G" to "Dog", "!00``" to "A".
    const CAT_BLOCK: &str = "begin 644 test.bin\n#0V%T\n`\nend";

    #[test]
    fn test_round_trip_single_block() {
        let body = format!("Hi,\n\n{CAT_BLOCK}\n\nBye\n");
        let (cleaned, files) = extract_uuencoded(&body);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "test.bin");
        assert_eq!(files[0].data, b"Cat");

        assert!(!cleaned.contains("begin"), "envelope left in: {cleaned:?}");
        assert!(!cleaned.contains("end"));
        assert!(cleaned.contains("Hi,"));
        assert!(cleaned.contains("Bye"));
    }

    #[test]
    fn test_extract_is_idempotent() {
        let body = format!("before\n{CAT_BLOCK}\nafter\n");
        let (cleaned, files) = extract_uuencoded(&body);
        assert_eq!(files.len(), 1);

        let (again, none) = extract_uuencoded(&cleaned);
        assert!(none.is_empty());
        assert_eq!(again, cleaned);
    }

    #[test]
    fn test_no_blocks_returns_body_unchanged() {
        let body = "just a plain message\nwith two lines\n";
        let (cleaned, files) = extract_uuencoded(body);
        assert!(files.is_empty());
        assert_eq!(cleaned, body);
    }

    #[test]
    fn test_multiple_blocks_in_order() {
        let body = format!("{CAT_BLOCK}\nmiddle\nbegin 755 dog.bin\n#1&]G\n`\nend\n");
        let (cleaned, files) = extract_uuencoded(&body);

        assert_eq!(files.len(), 2);
        assert_eq!(files[0].name, "test.bin");
        assert_eq!(files[0].data, b"Cat");
        assert_eq!(files[1].name, "dog.bin");
        assert_eq!(files[1].data, b"Dog");
        assert!(cleaned.contains("middle"));
        assert!(!cleaned.contains("begin"));
    }

    #[test]
    fn test_interleaved_envelopes_decode_once() {
        // A second begin line inside an open block is payload, not a new
        // block, and the dangling end line past the first match stays text.
        let body = "begin 644 outer.bin\nbegin 644 inner.bin\n#0V%T\nend\ntail\nend\n";
        let (cleaned, files) = extract_uuencoded(body);

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "outer.bin");
        assert!(files[0].data.ends_with(b"Cat"));

        assert!(!cleaned.contains("begin"), "envelope left in: {cleaned:?}");
        assert!(cleaned.contains("tail"));
        assert!(cleaned.contains("end"));

        let (again, residue) = extract_uuencoded(&cleaned);
        assert!(residue.is_empty(), "residual text must never decode");
        assert_eq!(again, cleaned);
    }

    #[test]
    fn test_crlf_block() {
        let body = "begin 644 test.bin\r\n#0V%T\r\n`\r\nend\r\n";
        let (cleaned, files) = extract_uuencoded(body);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].data, b"Cat");
        assert!(!cleaned.contains("begin"));
    }

    #[test]
    fn test_partial_final_group() {
        // One-byte payload: length char '!' then a 2-character tail.
        let body = "begin 644 single.bin\n!00``\n`\nend\n";
        let (_, files) = extract_uuencoded(body);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].data, b"A");
    }

    #[test]
    fn test_non_octal_mode_is_not_a_block() {
        let body = "begin 999 nope.bin\n#0V%T\n`\nend\n";
        let (cleaned, files) = extract_uuencoded(body);
        assert!(files.is_empty());
        assert_eq!(cleaned, body);
    }

    #[test]
    fn test_decode_line_longer_payload() {
        // "&2&5L;&\*" is "Hello\n" (length char '&' = 6 bytes).
        let mut out = Vec::new();
        decode_line(b"&2&5L;&\\*", &mut out);
        assert_eq!(out, b"Hello\n");
    }
}

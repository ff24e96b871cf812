//! Receipt mail back to the sender, listing what was saved.

use anyhow::Context;
use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};

use crate::config::ReportingConfig;
use crate::model::message::MessageResult;

/// Build the receipt body: a header, then one line per saved file.
pub fn receipt_body(result: &MessageResult) -> String {
    let mut body = String::from(
        "Thanks! I just saved the following files from your message:\n\nfile_name -- size\n",
    );
    for file in &result.files {
        body.push_str(&format!(
            "{} -- ({}) of type {}\n",
            file.name, file.size, file.mime_type
        ));
    }
    body.push_str("\nIf anything looks wrong, please reply to this message.\n");
    body
}

/// Send the receipt through the configured relay.
///
/// The relay is plain SMTP (a local MTA or trusted submission host); the
/// original subject is echoed back unchanged.
pub fn send_receipt(cfg: &ReportingConfig, result: &MessageResult) -> anyhow::Result<()> {
    let from: Mailbox = cfg
        .receipt_sender
        .parse()
        .context("parsing receipt sender address")?;
    let to: Mailbox = result
        .from
        .parse()
        .with_context(|| format!("parsing recipient address {}", result.from))?;

    let email = Message::builder()
        .from(from)
        .to(to)
        .subject(&result.subject)
        .body(receipt_body(result))
        .context("building receipt message")?;

    let mailer = SmtpTransport::builder_dangerous(&cfg.smtp_host)
        .port(cfg.smtp_port)
        .build();

    mailer.send(&email).context("sending receipt")?;
    tracing::info!(to = %result.from, "receipt sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attachment::SavedFile;

    #[test]
    fn test_receipt_body_lists_each_file() {
        let result = MessageResult {
            from: "jane@example.com".to_string(),
            subject: "Files".to_string(),
            body: String::new(),
            files: vec![
                SavedFile::new("1700000000_report_pdf", 1536, "application/pdf"),
                SavedFile::new("1700000000_photo_jpg", 0, "image/jpeg"),
            ],
        };

        let body = receipt_body(&result);
        assert!(body.contains("1700000000_report_pdf -- (1.5 KB) of type application/pdf\n"));
        assert!(body.contains("1700000000_photo_jpg -- (0 B) of type image/jpeg\n"));
    }

    #[test]
    fn test_receipt_body_with_no_files() {
        let result = MessageResult {
            from: "jane@example.com".to_string(),
            subject: "Empty".to_string(),
            body: String::new(),
            files: Vec::new(),
        };

        let body = receipt_body(&result);
        assert!(body.starts_with("Thanks!"));
        assert!(!body.contains(" of type "));
    }
}

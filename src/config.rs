//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$MAILSINK_CONFIG` (environment variable)
//! 2. `~/.config/mailsink/config.toml` (Linux/macOS)
//!    `%APPDATA%\mailsink\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Attachment MIME types accepted out of the box.
pub const DEFAULT_ALLOWED_MIME_TYPES: [&str; 7] = [
    "audio/wave",
    "application/pdf",
    "application/zip",
    "application/octet-stream",
    "image/jpeg",
    "image/png",
    "image/gif",
];

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Where attachments land.
    pub storage: StorageConfig,
    /// Sender and attachment-type allow-lists.
    pub policy: PolicyConfig,
    /// Optional downstream reporting (database row, receipt mail).
    pub reporting: ReportingConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override cache directory for logs.
    pub cache_dir: Option<PathBuf>,
}

/// Where attachments land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Destination directory for saved attachments. Must already exist.
    pub save_dir: PathBuf,
}

/// Sender and attachment-type allow-lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Senders whose messages are processed at all. Empty means nobody:
    /// the gate fails closed until this is configured.
    pub allowed_senders: Vec<String>,
    /// Attachment MIME types that get saved; anything else is dropped.
    pub allowed_mime_types: Vec<String>,
}

impl PolicyConfig {
    /// Exact-match membership check against the sender allow-list.
    pub fn is_sender_allowed(&self, address: &str) -> bool {
        self.allowed_senders.iter().any(|s| s == address)
    }

    /// Exact-match membership check against the MIME type allow-list.
    pub fn is_mime_allowed(&self, mime_type: &str) -> bool {
        self.allowed_mime_types.iter().any(|m| m == mime_type)
    }
}

/// Optional downstream reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    /// Insert a summary row (plus one row per saved file) into the database.
    pub save_to_db: bool,
    /// Email a receipt listing the saved files back to the sender.
    pub send_receipt: bool,
    /// SQLite connection string for the summary database.
    pub database_url: String,
    /// SMTP relay host for the receipt mail.
    pub smtp_host: String,
    /// SMTP relay port.
    pub smtp_port: u16,
    /// `From` address on the receipt mail.
    pub receipt_sender: String,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            cache_dir: None,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_dir: PathBuf::from("."),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            allowed_senders: Vec::new(),
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            save_to_db: false,
            send_receipt: false,
            database_url: "sqlite://mailsink.db?mode=rwc".to_string(),
            smtp_host: "localhost".to_string(),
            smtp_port: 25,
            receipt_sender: "mailsink@localhost".to_string(),
        }
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    // 1. Environment variable override
    if let Ok(env_path) = std::env::var("MAILSINK_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    // 2. Standard config directory
    dirs::config_dir().map(|d| d.join("mailsink").join("config.toml"))
}

/// Return the cache directory used for logs.
pub fn cache_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.cache_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailsink")
}

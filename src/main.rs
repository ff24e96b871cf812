//! CLI entry point for `mailsink`.

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use mailsink::config::{self, Config};
use mailsink::model::message::MessageResult;
use mailsink::pipeline::MessagePipeline;
use mailsink::report;

/// Save the attachments of one piped email to disk.
///
/// Reads a single raw RFC-2822 message from stdin (the shape an MTA pipe
/// alias delivers) and, when the sender is allowed, writes every permitted
/// attachment into the destination directory.
#[derive(Parser)]
#[command(name = "mailsink", version, about)]
struct Cli {
    /// Read the message from a file instead of stdin
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Destination directory for saved files (overrides config)
    #[arg(short = 'd', long, value_name = "DIR", env = "MAILSINK_SAVE_DIR")]
    save_dir: Option<PathBuf>,

    /// Accept mail from this sender address (repeatable; extends config)
    #[arg(long = "allow", value_name = "ADDRESS")]
    allow: Vec<String>,

    /// Accept attachments of this MIME type (repeatable; extends config)
    #[arg(long = "allow-mime", value_name = "TYPE")]
    allow_mime: Vec<String>,

    /// Record the message and its saved files in the database
    #[arg(long)]
    save_db: bool,

    /// Mail a receipt listing the saved files back to the sender
    #[arg(long)]
    receipt: bool,

    /// Print the processing result as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Verbose logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::load_config();

    // Configure logging: stderr + optional log file
    let log_level = match cli.verbose {
        0 => config.general.log_level.clone(),
        1 => "info".to_string(),
        2 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    setup_logging(&log_level, &config);

    // Command-line overrides on top of the config file
    if let Some(dir) = cli.save_dir {
        config.storage.save_dir = dir;
    }
    config.policy.allowed_senders.extend(cli.allow);
    config.policy.allowed_mime_types.extend(cli.allow_mime);
    if cli.save_db {
        config.reporting.save_to_db = true;
    }
    if cli.receipt {
        config.reporting.send_receipt = true;
    }

    let raw = read_message(cli.input.as_deref())?;
    tracing::debug!(bytes = raw.len(), "message read");

    let pipeline = MessagePipeline::new(&config)?;
    let result = pipeline.process(&raw)?;

    report_result(&config, &result).await?;

    // Stdout stays clean apart from the JSON result; with a pipe alias,
    // anything printed here can end up mailed back as bounce content.
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    Ok(())
}

/// Read the entire raw message before any decoding starts.
fn read_message(input: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match input {
        Some(path) => {
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut raw = Vec::new();
            std::io::stdin()
                .read_to_end(&mut raw)
                .context("reading message from stdin")?;
            Ok(raw)
        }
    }
}

/// Run the flag-gated reporting steps and log the final summary.
async fn report_result(config: &Config, result: &MessageResult) -> anyhow::Result<()> {
    if config.reporting.save_to_db {
        report::db::save_message(&config.reporting.database_url, result).await?;
    }
    if config.reporting.send_receipt {
        report::reply::send_receipt(&config.reporting, result)?;
    }

    tracing::info!(
        from = %result.from,
        subject = %result.subject,
        files = result.files.len(),
        "message processed"
    );
    Ok(())
}

/// Set up tracing with stderr output and optional file logging.
fn setup_logging(level: &str, config: &Config) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    // Try to set up file logging
    let log_dir = config::cache_dir(config);
    if std::fs::create_dir_all(&log_dir).is_ok() {
        let file_appender = tracing_appender::rolling::never(&log_dir, "mailsink.log");
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(file_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
    } else {
        // Fall back to stderr only
        tracing_subscriber::registry()
            .with(env_filter)
            .with(stderr_layer)
            .init();
    }
}

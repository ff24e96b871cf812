//! Summary persistence: one `emails` row per message, one `files` row per
//! saved attachment.

use anyhow::Context;
use sqlx::sqlite::SqlitePool;

use crate::model::message::MessageResult;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS emails (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    from_address TEXT NOT NULL,
    subject TEXT NOT NULL,
    body TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS files (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email_id INTEGER NOT NULL,
    file_name TEXT NOT NULL,
    mail_size TEXT NOT NULL,
    mime TEXT NOT NULL
);
";

/// Record the message summary, returning the new `emails` row id.
///
/// The schema is created on first use. `mail_size` stores the formatted
/// human-readable size, matching what the receipt mail shows.
pub async fn save_message(database_url: &str, result: &MessageResult) -> anyhow::Result<i64> {
    let pool = SqlitePool::connect(database_url)
        .await
        .with_context(|| format!("opening database {database_url}"))?;
    ensure_schema(&pool).await?;

    let email_id =
        sqlx::query("INSERT INTO emails (from_address, subject, body) VALUES (?, ?, ?)")
            .bind(&result.from)
            .bind(&result.subject)
            .bind(&result.body)
            .execute(&pool)
            .await
            .context("inserting email row")?
            .last_insert_rowid();

    for file in &result.files {
        sqlx::query("INSERT INTO files (email_id, file_name, mail_size, mime) VALUES (?, ?, ?, ?)")
            .bind(email_id)
            .bind(&file.name)
            .bind(&file.size)
            .bind(&file.mime_type)
            .execute(&pool)
            .await
            .with_context(|| format!("inserting file row for {}", file.name))?;
    }

    tracing::info!(email_id, files = result.files.len(), "summary recorded");
    Ok(email_id)
}

/// Create the tables if this database has not seen them yet.
async fn ensure_schema(pool: &SqlitePool) -> anyhow::Result<()> {
    for statement in SCHEMA.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .context("creating schema")?;
    }
    Ok(())
}

use rusqlite::{Connection, OptionalExtension};
use tracing::info;

/// Unprefixed name of the submissions table.
pub const SUBMISSIONS_TABLE: &str = "inquiry_form";

pub fn table_name(prefix: &str) -> String {
    format!("{prefix}{SUBMISSIONS_TABLE}")
}

/// Create the submissions table and its listing index if they do not exist yet.
///
/// `created_at` is filled by SQLite in UTC with millisecond precision and is
/// never written by the application afterwards.
pub fn install(conn: &Connection, table: &str) -> rusqlite::Result<()> {
    conn.execute_batch(&format!(
        "
        CREATE TABLE IF NOT EXISTS {table} (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            firstName   TEXT NOT NULL,
            lastName    TEXT NOT NULL,
            email       TEXT NOT NULL,
            phone       TEXT NOT NULL,
            workshop    TEXT NOT NULL,
            campus      TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%d %H:%M:%f', 'now')),
            status      TEXT NOT NULL DEFAULT 'pending'
        );

        CREATE INDEX IF NOT EXISTS idx_{table}_created_at
            ON {table}(created_at);
        "
    ))?;

    info!(table = %table, "submission schema installed");
    Ok(())
}

pub fn table_exists(conn: &Connection, table: &str) -> rusqlite::Result<bool> {
    let found: Option<String> = conn
        .query_row(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

use std::path::Path;
use std::sync::Mutex;

use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Row};
use tracing::{debug, info};

use super::domain::{NewSubmission, Submission, SubmissionId, SubmissionStatus};
use super::repository::{RepositoryError, SubmissionRepository};
use super::schema;
use crate::config::StorageConfig;

const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

impl From<rusqlite::Error> for RepositoryError {
    fn from(value: rusqlite::Error) -> Self {
        RepositoryError::Unavailable(value.to_string())
    }
}

/// SQLite-backed submissions table.
pub struct SqliteSubmissionRepository {
    conn: Mutex<Connection>,
    table: String,
}

impl SqliteSubmissionRepository {
    pub fn open(path: &Path, table_prefix: &str) -> Result<Self, RepositoryError> {
        let conn = Connection::open(path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        info!("submission store opened at {}", path.display());
        Ok(Self::with_connection(conn, table_prefix))
    }

    pub fn in_memory(table_prefix: &str) -> Result<Self, RepositoryError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::with_connection(conn, table_prefix))
    }

    pub fn from_config(config: &StorageConfig) -> Result<Self, RepositoryError> {
        if config.is_in_memory() {
            Self::in_memory(&config.table_prefix)
        } else {
            Self::open(&config.database_path, &config.table_prefix)
        }
    }

    fn with_connection(conn: Connection, table_prefix: &str) -> Self {
        Self {
            conn: Mutex::new(conn),
            table: schema::table_name(table_prefix),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, RepositoryError>
    where
        F: FnOnce(&Connection, &str) -> Result<T, RepositoryError>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| RepositoryError::Unavailable(format!("connection lock poisoned: {e}")))?;
        f(&conn, &self.table)
    }
}

struct StoredRow {
    id: i64,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    campus: String,
    workshop: String,
    created_at: String,
    status: String,
}

fn read_row(row: &Row<'_>) -> rusqlite::Result<StoredRow> {
    Ok(StoredRow {
        id: row.get(0)?,
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        campus: row.get(5)?,
        workshop: row.get(6)?,
        created_at: row.get(7)?,
        status: row.get(8)?,
    })
}

impl TryFrom<StoredRow> for Submission {
    type Error = RepositoryError;

    fn try_from(row: StoredRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<SubmissionStatus>()
            .map_err(|err| RepositoryError::Corrupt {
                id: row.id,
                reason: err.to_string(),
            })?;
        let created_at = NaiveDateTime::parse_from_str(&row.created_at, CREATED_AT_FORMAT)
            .map_err(|err| RepositoryError::Corrupt {
                id: row.id,
                reason: format!("created_at '{}': {err}", row.created_at),
            })?;

        Ok(Submission {
            id: SubmissionId(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            phone: row.phone,
            campus: row.campus,
            workshop: row.workshop,
            created_at,
            status,
        })
    }
}

fn select_columns(table: &str) -> String {
    format!(
        "SELECT id, firstName, lastName, email, phone, campus, workshop, created_at, status FROM {table}"
    )
}

fn fetch_by_id(conn: &Connection, table: &str, id: i64) -> Result<Option<Submission>, RepositoryError> {
    let sql = format!("{} WHERE id = ?1", select_columns(table));
    let row = conn.query_row(&sql, [id], read_row).optional()?;
    row.map(Submission::try_from).transpose()
}

impl SubmissionRepository for SqliteSubmissionRepository {
    fn install_schema(&self) -> Result<(), RepositoryError> {
        self.with_conn(|conn, table| Ok(schema::install(conn, table)?))
    }

    fn table_exists(&self) -> Result<bool, RepositoryError> {
        self.with_conn(|conn, table| Ok(schema::table_exists(conn, table)?))
    }

    fn insert(&self, submission: NewSubmission) -> Result<Submission, RepositoryError> {
        self.with_conn(|conn, table| {
            conn.execute(
                &format!(
                    "INSERT INTO {table} (firstName, lastName, email, phone, campus, workshop)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6)"
                ),
                rusqlite::params![
                    submission.first_name,
                    submission.last_name,
                    submission.email,
                    submission.phone,
                    submission.campus.value(),
                    submission.workshop,
                ],
            )?;
            let id = conn.last_insert_rowid();
            debug!(id, table = %table, "submission inserted");

            fetch_by_id(conn, table, id)?.ok_or_else(|| {
                RepositoryError::Unavailable(format!("inserted submission {id} vanished"))
            })
        })
    }

    fn mark_complete(&self, id: SubmissionId) -> Result<bool, RepositoryError> {
        self.with_conn(|conn, table| {
            let changed = conn.execute(
                &format!("UPDATE {table} SET status = ?1 WHERE id = ?2"),
                rusqlite::params![SubmissionStatus::Complete.label(), id.0],
            )?;
            Ok(changed > 0)
        })
    }

    fn fetch(&self, id: SubmissionId) -> Result<Option<Submission>, RepositoryError> {
        self.with_conn(|conn, table| fetch_by_id(conn, table, id.0))
    }

    fn newest_first(&self) -> Result<Vec<Submission>, RepositoryError> {
        self.with_conn(|conn, table| {
            let sql = format!("{} ORDER BY created_at DESC, id DESC", select_columns(table));
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map([], read_row)?
                .collect::<Result<Vec<_>, _>>()?;
            rows.into_iter().map(Submission::try_from).collect()
        })
    }
}

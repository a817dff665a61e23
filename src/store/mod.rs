//! Local persistent state: PR bookkeeping and draft reviews.
//!
//! SQLite with WAL and a busy timeout so independently launched
//! invocations (two terminals on the same PR) serialize safely at the
//! database level. Each operation is its own transaction; the
//! draft→submit sequence is deliberately not one cross-call transaction.

pub mod drafts;
pub mod prs;

pub use drafts::DraftReview;
pub use prs::PRState;

use std::path::Path;
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::Connection;
use thiserror::Error;

/// Errors from the store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("failed to create store directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Current schema version. Bump when the DDL below changes and add a
/// forward migration in `migrate`.
const SCHEMA_VERSION: i64 = 1;

const SCHEMA_VERSION_DDL: &str = "
    CREATE TABLE IF NOT EXISTS schema_version (
        version INTEGER NOT NULL
    ) STRICT;
";

const SCHEMA_V1_SQL: &str = "
    CREATE TABLE IF NOT EXISTS prs (
        id                     TEXT    PRIMARY KEY,
        repo                   TEXT    NOT NULL,
        number                 INTEGER NOT NULL,
        last_seen_head_sha     TEXT    NOT NULL,
        last_reviewed_head_sha TEXT,
        last_reviewed_at       INTEGER,
        last_submitted_at      INTEGER,
        snoozed_until          INTEGER,
        notes                  TEXT
    ) STRICT;

    CREATE TABLE IF NOT EXISTS draft_reviews (
        id               TEXT    PRIMARY KEY,
        pr_id            TEXT    NOT NULL,
        created_at       INTEGER NOT NULL,
        payload_json     TEXT    NOT NULL,
        rendered_preview TEXT    NOT NULL
    ) STRICT;
";

/// Handle to the local database.
///
/// `rusqlite::Connection` is not `Sync`; the mutex provides the
/// synchronization a shared handle needs. Operations are short
/// single-statement transactions.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open (or create) the database at `path` and migrate the schema.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                    path: parent.display().to_string(),
                    source,
                })?;
            }
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA synchronous=NORMAL;
             PRAGMA foreign_keys=ON;",
        )?;
        conn.busy_timeout(Duration::from_secs(5))?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// In-memory store for tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        migrate(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub(crate) fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().expect("store mutex poisoned")
    }
}

/// Forward-only, idempotent schema migration.
fn migrate(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_VERSION_DDL)?;
    let version: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |r| r.get(0),
        )
        .unwrap_or(0);
    if version < SCHEMA_VERSION {
        conn.execute_batch(SCHEMA_V1_SQL)?;
        conn.execute(
            "INSERT INTO schema_version (version) VALUES (?1)",
            [SCHEMA_VERSION],
        )?;
    }
    Ok(())
}

/// Current Unix timestamp in seconds.
pub(crate) fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}

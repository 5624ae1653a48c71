//! SQLite persistence for event registrations and event settings.

pub mod applications;
pub mod event_settings;
pub mod schema;
pub mod timestamp;
pub mod update;

use std::path::PathBuf;

use rusqlite::{Connection, TransactionBehavior};

/// Database handle owning a single SQLite connection.
///
/// Request handlers open one handle per request. The connection is closed
/// when the handle is dropped, on every exit path.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database named by a `DATABASE_URL`-style string.
    ///
    /// Accepts `sqlite://<path>`, `sqlite:<path>` or a bare path. Tables are
    /// expected to exist already; see [`Database::open_and_migrate`].
    pub fn open(url: &str) -> Result<Self, DbError> {
        let path = database_path(url)?;
        let conn = Connection::open(&path)?;
        let db = Self { conn };
        db.configure()?;
        Ok(db)
    }

    /// Open the database and create or upgrade the schema.
    pub fn open_and_migrate(url: &str) -> Result<Self, DbError> {
        let db = Self::open(url)?;
        db.migrate()?;
        Ok(db)
    }

    /// Create an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.configure()?;
        db.migrate()?;
        Ok(db)
    }

    /// Access the underlying connection with a closure.
    pub fn with_conn<F, R>(&self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&Connection) -> Result<R, DbError>,
    {
        f(&self.conn)
    }

    /// Run `f` inside a write transaction.
    ///
    /// The write lock is taken up front, so concurrent writers serialize.
    /// Commits when `f` succeeds and rolls back when it fails.
    pub fn with_tx<F, R>(&mut self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&Connection) -> Result<R, DbError>,
    {
        self.transaction(TransactionBehavior::Immediate, f)
    }

    /// Run `f` inside a read transaction so multiple queries see one snapshot.
    pub fn with_snapshot<F, R>(&mut self, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&Connection) -> Result<R, DbError>,
    {
        self.transaction(TransactionBehavior::Deferred, f)
    }

    fn transaction<F, R>(&mut self, behavior: TransactionBehavior, f: F) -> Result<R, DbError>
    where
        F: FnOnce(&Connection) -> Result<R, DbError>,
    {
        let tx = self.conn.transaction_with_behavior(behavior)?;
        match f(&tx) {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(err) => {
                match tx.rollback() {
                    Ok(()) => tracing::warn!("Transaction rolled back: {err}"),
                    Err(rollback_err) => tracing::error!("Rollback failed: {rollback_err}"),
                }
                Err(err)
            }
        }
    }

    fn configure(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA busy_timeout=5000;
                 PRAGMA foreign_keys=ON;",
            )?;
            Ok(())
        })
    }

    fn migrate(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            schema::run_migrations(conn)?;
            Ok(())
        })
    }
}

/// Resolve a `DATABASE_URL` value to a filesystem path.
pub fn database_path(url: &str) -> Result<PathBuf, DbError> {
    let trimmed = url.trim();
    let path = trimmed
        .strip_prefix("sqlite://")
        .or_else(|| trimmed.strip_prefix("sqlite:"))
        .unwrap_or(trimmed);
    if path.is_empty() {
        return Err(DbError::InvalidData(
            "database url does not name a file".into(),
        ));
    }
    Ok(PathBuf::from(path))
}

/// Database error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

#[cfg(test)]
mod tests;

use crate::db::migrations::init_with_migrations;
use crate::libs::config::DatabaseConfig;
use anyhow::Result;
use parking_lot::{Mutex, MutexGuard};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Shared handle to the calendar database.
///
/// Cloning is cheap; all clones use the same connection, serialised by a
/// mutex. Hold the guard returned by [`Db::conn`] for the whole of an
/// operation that must not interleave with others.
#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

impl Db {
    /// Opens the database described by the configuration and applies pending migrations.
    pub fn new(config: &DatabaseConfig) -> Result<Db> {
        let path = config.resolve_path()?;
        Self::open(&path, Duration::from_millis(config.busy_timeout_ms))
    }

    pub fn open(path: &Path, busy_timeout: Duration) -> Result<Db> {
        let mut conn = Self::new_without_migrations(path)?;
        conn.busy_timeout(busy_timeout)?;
        init_with_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Private in-memory database, mostly for tests.
    pub fn open_in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        init_with_migrations(&mut conn)?;
        Ok(Self::from_connection(conn))
    }

    /// Raw connection with pragmas set but no schema changes applied.
    pub fn new_without_migrations(path: &Path) -> Result<Connection> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::configure(&conn)?;
        Ok(conn)
    }

    pub fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock()
    }

    fn from_connection(conn: Connection) -> Db {
        Db {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn configure(conn: &Connection) -> Result<()> {
        // Cascading deletes of slots and bookings rely on this.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        Ok(())
    }
}

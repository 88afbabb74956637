//! Database schema migration management and versioning system.
//!
//! Every schema change is a numbered migration. Pending migrations run inside
//! one transaction when a database is opened and are recorded in the
//! `migrations` table, so opening the same file twice is a no-op.
//!
//! ## Usage
//!
//! ```rust
//! use apcal::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory()?;
//! init_with_migrations(&mut conn)?;
//! assert!(get_db_version(&conn)? > 0);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

/// SQL schema for the migrations tracking table.
const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// A single versioned schema change.
#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Registry of all migrations, applied in version order.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        // Version 1: users and key/value settings (access code lives here)
        self.add_migration(1, "create_users_and_settings", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS users (
                    email TEXT NOT NULL PRIMARY KEY,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    password_hash TEXT NOT NULL,
                    role TEXT NOT NULL DEFAULT 'user',
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS settings (
                    key TEXT NOT NULL PRIMARY KEY,
                    value TEXT NOT NULL
                )",
                [],
            )?;
            Ok(())
        });

        // Version 2: weekly work schedule template
        self.add_migration(2, "create_work_schedule", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS work_hours (
                    time TEXT NOT NULL PRIMARY KEY,
                    is_break BOOLEAN NOT NULL DEFAULT FALSE
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS days_off (
                    weekday INTEGER NOT NULL PRIMARY KEY CHECK (weekday BETWEEN 0 AND 6)
                )",
                [],
            )?;
            Ok(())
        });

        // Version 3: calendar days, their slots and bookings
        self.add_migration(3, "create_calendar", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS calendar_days (
                    date DATE NOT NULL PRIMARY KEY,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS time_slots (
                    date DATE NOT NULL,
                    time TEXT NOT NULL,
                    status TEXT NOT NULL CHECK (status IN ('open', 'break', 'booked')),
                    PRIMARY KEY (date, time),
                    FOREIGN KEY (date) REFERENCES calendar_days(date) ON DELETE CASCADE
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS bookings (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL,
                    time TEXT NOT NULL,
                    email TEXT NOT NULL,
                    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                    UNIQUE (date, time),
                    FOREIGN KEY (date, time) REFERENCES time_slots(date, time) ON DELETE CASCADE,
                    FOREIGN KEY (email) REFERENCES users(email)
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_bookings_email ON bookings(email)", [])?;
            Ok(())
        });

        // Version 4: usage analytics
        self.add_migration(4, "create_analytics", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS analytics_users (
                    email TEXT NOT NULL PRIMARY KEY,
                    registered_at TIMESTAMP,
                    last_login TIMESTAMP,
                    login_count INTEGER NOT NULL DEFAULT 0,
                    bookings_total INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )?;
            tx.execute(
                "CREATE TABLE IF NOT EXISTS analytics_counters (
                    name TEXT NOT NULL PRIMARY KEY,
                    value INTEGER NOT NULL DEFAULT 0
                )",
                [],
            )?;
            tx.execute("INSERT OR IGNORE INTO analytics_counters (name, value) VALUES ('registrations', 0)", [])?;
            Ok(())
        });

        // Version 5: permanent archive of past bookings
        self.add_migration(5, "create_day_records", |tx| {
            tx.execute(
                "CREATE TABLE IF NOT EXISTS day_records (
                    id INTEGER PRIMARY KEY,
                    date DATE NOT NULL,
                    time TEXT NOT NULL,
                    email TEXT NOT NULL,
                    archived_at TIMESTAMP NOT NULL,
                    UNIQUE (date, time)
                )",
                [],
            )?;
            tx.execute("CREATE INDEX IF NOT EXISTS idx_day_records_date ON day_records(date)", [])?;
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    /// Applies every migration newer than the current version in one transaction.
    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!("Database is up to date");
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;

        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            match (migration.up)(&tx) {
                Ok(()) => {
                    tx.execute(
                        "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                        params![migration.version, migration.name],
                    )?;
                    msg_debug!(Message::MigrationCompleted(migration.version));
                }
                Err(e) => {
                    msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                    return Err(e);
                }
            }
        }

        tx.commit()?;
        msg_debug!(Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));

        Ok(version.unwrap_or(0))
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;

        Ok(count > 0)
    }

    /// Applied migrations as (version, name, applied_at), oldest first.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;

        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(history)
    }

    fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    let manager = MigrationManager::new();
    manager.run_migrations(conn)?;
    Ok(())
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    let manager = MigrationManager::new();
    manager.get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    let current = manager.get_current_version(conn)?;
    Ok(current < manager.latest_version())
}

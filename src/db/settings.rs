//! Single-value application settings, such as the registration access code.

use rusqlite::{params, Connection, OptionalExtension, Result};

pub const ACCESS_CODE_KEY: &str = "access_code";

/// Set once the work schedule template has been seeded from config.
pub const SCHEDULE_SEEDED_KEY: &str = "schedule_seeded";

const SELECT_VALUE: &str = "SELECT value FROM settings WHERE key = ?1";
const UPSERT_VALUE: &str = "INSERT INTO settings (key, value) VALUES (?1, ?2) ON CONFLICT(key) DO UPDATE SET value = excluded.value";

pub struct Settings<'c> {
    conn: &'c Connection,
}

impl<'c> Settings<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn.query_row(SELECT_VALUE, params![key], |row| row.get(0)).optional()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(UPSERT_VALUE, params![key, value])?;
        Ok(())
    }

    pub fn access_code(&self) -> Result<Option<String>> {
        self.get(ACCESS_CODE_KEY)
    }

    pub fn set_access_code(&self, code: &str) -> Result<()> {
        self.set(ACCESS_CODE_KEY, code)
    }
}

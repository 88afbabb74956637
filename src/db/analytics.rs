//! Usage counters: registrations, logins and booking totals per user.

use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Result, Row};
use serde::Serialize;

const REGISTRATIONS: &str = "registrations";

const INSERT_REGISTRATION: &str = "
    INSERT INTO analytics_users (email, registered_at) VALUES (?1, ?2)
    ON CONFLICT(email) DO UPDATE SET registered_at = excluded.registered_at
";
const INCREMENT_COUNTER: &str = "
    INSERT INTO analytics_counters (name, value) VALUES (?1, ?2)
    ON CONFLICT(name) DO UPDATE SET value = value + excluded.value
";
const SELECT_COUNTER: &str = "SELECT value FROM analytics_counters WHERE name = ?1";
const RECORD_LOGIN: &str = "
    INSERT INTO analytics_users (email, last_login, login_count) VALUES (?1, ?2, 1)
    ON CONFLICT(email) DO UPDATE SET last_login = excluded.last_login, login_count = login_count + 1
";
const ADJUST_BOOKINGS: &str = "
    INSERT INTO analytics_users (email, bookings_total) VALUES (?1, MAX(0, ?2))
    ON CONFLICT(email) DO UPDATE SET bookings_total = MAX(0, bookings_total + ?2)
";
const SELECT_USER: &str = "SELECT email, registered_at, last_login, login_count, bookings_total FROM analytics_users WHERE email = ?1";
const SELECT_ALL: &str = "SELECT email, registered_at, last_login, login_count, bookings_total FROM analytics_users ORDER BY email";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub email: String,
    pub registered_at: Option<NaiveDateTime>,
    pub last_login: Option<NaiveDateTime>,
    pub login_count: i64,
    pub bookings_total: i64,
}

impl UserStats {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(UserStats {
            email: row.get(0)?,
            registered_at: row.get(1)?,
            last_login: row.get(2)?,
            login_count: row.get(3)?,
            bookings_total: row.get(4)?,
        })
    }
}

pub struct Analytics<'c> {
    conn: &'c Connection,
}

impl<'c> Analytics<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Starts the user's counters and bumps the registration total by one.
    pub fn record_registration(&self, email: &str, at: NaiveDateTime) -> Result<()> {
        self.conn.execute(INSERT_REGISTRATION, params![email, at])?;
        self.conn.execute(INCREMENT_COUNTER, params![REGISTRATIONS, 1])?;
        Ok(())
    }

    pub fn record_login(&self, email: &str, at: NaiveDateTime) -> Result<()> {
        self.conn.execute(RECORD_LOGIN, params![email, at])?;
        Ok(())
    }

    /// Adds `delta` to the user's booking total, never going below zero.
    pub fn adjust_bookings(&self, email: &str, delta: i64) -> Result<()> {
        self.conn.execute(ADJUST_BOOKINGS, params![email, delta])?;
        Ok(())
    }

    pub fn registration_count(&self) -> Result<i64> {
        let count = self.conn.query_row(SELECT_COUNTER, params![REGISTRATIONS], |row| row.get(0)).optional()?;
        Ok(count.unwrap_or(0))
    }

    pub fn user_stats(&self, email: &str) -> Result<Option<UserStats>> {
        self.conn.query_row(SELECT_USER, params![email], UserStats::from_row).optional()
    }

    pub fn all(&self) -> Result<Vec<UserStats>> {
        let mut stmt = self.conn.prepare(SELECT_ALL)?;
        let stats = stmt.query_map([], UserStats::from_row)?.collect::<Result<Vec<_>>>()?;
        Ok(stats)
    }
}

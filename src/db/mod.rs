//! Database layer for the apcal application.
//!
//! All calendar data lives in a single SQLite file. [`db::Db`] owns the
//! connection and applies migrations on open; each store module is a thin,
//! borrowed view over a connection or an open transaction, so several stores
//! can take part in one atomic operation.
//!
//! ## Usage
//!
//! ```rust
//! use apcal::db::{db::Db, calendar::Calendar};
//! use chrono::NaiveDate;
//!
//! let db = Db::open_in_memory()?;
//! let conn = db.conn();
//! let calendar = Calendar::new(&conn);
//! calendar.add_day(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())?;
//! assert_eq!(calendar.dates()?.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ```rust
//! use apcal::db::{db::Db, analytics::Analytics, calendar::Calendar};
//!
//! // Stores share a transaction for all-or-nothing updates
//! let db = Db::open_in_memory()?;
//! let mut conn = db.conn();
//! let tx = conn.transaction()?;
//! let _calendar = Calendar::new(&tx);
//! let _analytics = Analytics::new(&tx);
//! tx.commit()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

/// Connection handle and database initialization.
pub mod db;

/// Versioned schema migrations.
pub mod migrations;

/// Registration, login and booking counters.
pub mod analytics;

/// Calendar days, time slots and bookings.
pub mod calendar;

/// Archived bookings kept after days leave the calendar.
pub mod records;

/// Key/value settings such as the access code.
pub mod settings;

/// User accounts.
pub mod users;

/// Working hours, breaks and days off used to seed new days.
pub mod work_schedule;

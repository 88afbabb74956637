//! Core library modules for the apcal application.
//!
//! Everything above the SQLite stores lives here: configuration, the
//! message catalogue, string formats for days and times, password hashing
//! and the [`service::BookingService`] that ties them together.
//!
//! ## Usage
//!
//! ```rust
//! use apcal::libs::formatter::{format_label, parse_label};
//!
//! let (date, time) = parse_label("Mon 3 June 2024 @ 14:00")?;
//! assert_eq!(format_label(date, time), "Mon 3 June 2024 @ 14:00");
//! # Ok::<(), apcal::libs::error::CalendarError>(())
//! ```

pub mod config;
pub mod data_storage;
pub mod error;
pub mod formatter;
pub mod messages;
pub mod password;
pub mod service;
pub mod slot;
pub mod view;

//! # Apcal - Appointment Calendar
//!
//! A small appointment booking system backed by SQLite. Administrators
//! publish calendar days whose time slots are seeded from a weekly work
//! schedule; registered users book and cancel open slots.
//!
//! ## Features
//!
//! - **Accounts**: registration gated by a shared access code, Argon2 password hashes
//! - **Calendar**: days, open/break/booked slots, bulk slot edits
//! - **Bookings**: atomic booking and cancellation, upcoming appointments
//! - **Work Schedule**: working hours, daily breaks and weekly days off
//! - **Analytics**: registration, login and booking counters
//!
//! ## Usage
//!
//! ```rust,no_run
//! use apcal::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;

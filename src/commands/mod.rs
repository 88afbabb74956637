pub mod access;
pub mod book;
pub mod day;
pub mod init;
pub mod schedule;
pub mod stats;
pub mod user;

use crate::libs::config::Config;
use crate::libs::error::{CalendarError, CalendarResult};
use crate::libs::formatter::parse_day;
use crate::libs::messages::Message;
use crate::libs::service::BookingService;
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "Register, log in and manage users")]
    User(user::UserArgs),
    #[command(about = "Manage calendar days and their time slots")]
    Day(day::DayArgs),
    #[command(about = "Book an open time slot")]
    Book(book::BookArgs),
    #[command(about = "Cancel an appointment")]
    Cancel(book::CancelArgs),
    #[command(about = "List appointments of a user or a day")]
    Appointments(book::AppointmentsArgs),
    #[command(about = "Show the next appointments")]
    Next(book::NextArgs),
    #[command(about = "Show and edit the weekly work schedule")]
    Schedule(schedule::ScheduleArgs),
    #[command(about = "Show or change the registration access code")]
    AccessCode(access::AccessCodeArgs),
    #[command(about = "Show usage statistics")]
    Stats(stats::StatsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    /// Read configuration from this file instead of the data directory
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        let config = match &cli.config {
            Some(path) => Config::read_from(path)?,
            None => Config::read()?,
        };

        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::User(args) => user::cmd(&service(&config)?, args),
            Commands::Day(args) => day::cmd(&service(&config)?, args),
            Commands::Book(args) => book::book(&service(&config)?, args),
            Commands::Cancel(args) => book::cancel(&service(&config)?, args),
            Commands::Appointments(args) => book::appointments(&service(&config)?, args),
            Commands::Next(args) => book::next(&service(&config)?, args),
            Commands::Schedule(args) => schedule::cmd(&service(&config)?, args),
            Commands::AccessCode(args) => access::cmd(&service(&config)?, args),
            Commands::Stats(args) => stats::cmd(&service(&config)?, args),
        }
    }
}

fn service(config: &Config) -> Result<BookingService> {
    BookingService::open(config)
}

/// Accepts either a day string (`Mon 3 June 2024`) or an ISO date (`2024-06-03`).
pub fn parse_date_arg(value: &str) -> CalendarResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%F")
        .or_else(|_| parse_day(value))
        .map_err(|_| CalendarError::Parse(Message::InvalidDay(value.to_string()).to_string()))
}

/// Turns a service failure into the command's error. Expected failures carry
/// the catalogue message; store failures keep their source chain. Either way
/// the process exits with a non-zero status.
pub fn report<T>(error: CalendarError) -> Result<T> {
    let message = match error {
        CalendarError::Persistence(_) | CalendarError::PasswordHash(_) => return Err(error.into()),
        CalendarError::AccessDenied => Message::AccessCodeRejected.to_string(),
        CalendarError::DuplicateEmail(email) => Message::UserAlreadyExists(email).to_string(),
        CalendarError::DuplicateDay(day) => Message::DayAlreadyExists(day).to_string(),
        CalendarError::SlotUnavailable(label) => Message::SlotUnavailable(label).to_string(),
        other => other.to_string(),
    };
    Err(anyhow!(message))
}

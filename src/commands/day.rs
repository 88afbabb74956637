use super::{parse_date_arg, report};
use crate::{
    libs::{
        formatter::{format_day, format_time},
        messages::Message,
        service::BookingService,
        slot::encode_slot_list,
        view::View,
    },
    msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct DayArgs {
    #[command(subcommand)]
    command: DayCommand,
}

#[derive(Debug, Subcommand)]
enum DayCommand {
    /// Add a day to the calendar, seeded from the work schedule
    Add {
        /// Day as "Mon 3 June 2024" or 2024-06-03
        day: String,
    },
    /// Delete a day with all its slots and bookings
    Delete {
        day: String,
        /// Copy the day's bookings to the archive first
        #[arg(short, long)]
        archive: bool,
    },
    /// List all calendar days
    List,
    /// List the open times of a day
    Times { day: String },
    /// Show or replace the time slots of a day
    Slots {
        day: String,
        /// New open and break slots, e.g. "09:00=open,12:00=break"
        #[arg(short, long)]
        set: Option<String>,
        /// Print the slots in the same encoded form `--set` accepts
        #[arg(long)]
        raw: bool,
    },
    /// List the appointments of a day
    Bookings { day: String },
    /// List the emails of everyone booked on a day
    Users { day: String },
    /// Copy the day's bookings to the archive and list what it holds
    Archive { day: String },
    /// List the days that have archived bookings
    Archived,
}

pub fn cmd(service: &BookingService, args: DayArgs) -> Result<()> {
    match args.command {
        DayCommand::Add { day } => handle_add(service, &day),
        DayCommand::Delete { day, archive } => handle_delete(service, &day, archive),
        DayCommand::List => handle_list(service),
        DayCommand::Times { day } => handle_times(service, &day),
        DayCommand::Slots { day, set, raw } => handle_slots(service, &day, set, raw),
        DayCommand::Bookings { day } => handle_bookings(service, &day),
        DayCommand::Users { day } => handle_users(service, &day),
        DayCommand::Archive { day } => handle_archive(service, &day),
        DayCommand::Archived => handle_archived(service),
    }
}

fn handle_add(service: &BookingService, day: &str) -> Result<()> {
    let date = match parse_date_arg(day) {
        Ok(date) => date,
        Err(e) => return report(e),
    };

    match service.add_day(date) {
        Ok(slots) if slots.is_empty() => {
            msg_success!(Message::DayAdded(format_day(date)));
            msg_warning!(Message::EmptyWorkSchedule(format_day(date)));
        }
        Ok(slots) => {
            msg_success!(Message::DayAdded(format_day(date)));
            View::slots(&slots)?;
        }
        Err(e) => report(e)?,
    }
    Ok(())
}

fn handle_delete(service: &BookingService, day: &str, archive: bool) -> Result<()> {
    let date = match parse_date_arg(day) {
        Ok(date) => date,
        Err(e) => return report(e),
    };

    if archive {
        match service.archive_day(date) {
            Ok(count) => msg_info!(Message::DayArchived(format_day(date), count)),
            Err(e) => return report(e),
        }
    }

    match service.delete_day(date) {
        Ok(()) => msg_success!(Message::DayDeleted(format_day(date))),
        Err(e) => report(e)?,
    }
    Ok(())
}

fn handle_list(service: &BookingService) -> Result<()> {
    let days = service.list_available_days()?;
    if days.is_empty() {
        msg_info!(Message::NoDaysFound);
        return Ok(());
    }

    msg_print!(Message::DaysHeader, true);
    View::days(&days)?;
    Ok(())
}

fn handle_times(service: &BookingService, day: &str) -> Result<()> {
    let day = match parse_date_arg(day) {
        Ok(date) => format_day(date),
        Err(e) => return report(e),
    };

    let times = match service.list_available_times(&day) {
        Ok(times) => times,
        Err(e) => return report(e),
    };
    if times.is_empty() {
        msg_info!(Message::NoOpenTimes(day));
        return Ok(());
    }

    msg_print!(Message::TimesHeader(day), true);
    View::list("TIME", &times)?;
    Ok(())
}

fn handle_slots(service: &BookingService, day: &str, set: Option<String>, raw: bool) -> Result<()> {
    let day = match parse_date_arg(day) {
        Ok(date) => format_day(date),
        Err(e) => return report(e),
    };

    if let Some(encoded) = set {
        match service.set_slot_statuses(&day, &encoded) {
            Ok(()) => msg_success!(Message::SlotsUpdated(day.clone())),
            Err(e) => return report(e),
        }
    }

    match service.list_time_slots(&day) {
        Ok(slots) if raw => println!("{}", encode_slot_list(&slots)),
        Ok(slots) => {
            msg_print!(Message::SlotsHeader(day), true);
            View::slots(&slots)?;
        }
        Err(e) => report(e)?,
    }
    Ok(())
}

fn handle_bookings(service: &BookingService, day: &str) -> Result<()> {
    let day = match parse_date_arg(day) {
        Ok(date) => format_day(date),
        Err(e) => return report(e),
    };

    let lines = match service.list_appointments_for_day(&day) {
        Ok(lines) => lines,
        Err(e) => return report(e),
    };
    if lines.is_empty() {
        msg_info!(Message::NoAppointments);
        return Ok(());
    }

    msg_print!(Message::AppointmentsHeader(day), true);
    View::list("APPOINTMENT", &lines)?;
    Ok(())
}

fn handle_users(service: &BookingService, day: &str) -> Result<()> {
    let date = match parse_date_arg(day) {
        Ok(date) => date,
        Err(e) => return report(e),
    };

    let emails = service.users_booked_on(date)?;
    if emails.is_empty() {
        msg_info!(Message::NoUsersBooked(format_day(date)));
        return Ok(());
    }

    msg_print!(Message::UsersBookedHeader(format_day(date)), true);
    View::list("EMAIL", &emails)?;
    Ok(())
}

fn handle_archive(service: &BookingService, day: &str) -> Result<()> {
    let date = match parse_date_arg(day) {
        Ok(date) => date,
        Err(e) => return report(e),
    };

    match service.archive_day(date) {
        Ok(count) => msg_success!(Message::DayArchived(format_day(date), count)),
        Err(e) => report(e)?,
    }

    let records = service.archived_bookings(date)?;
    if !records.is_empty() {
        let lines: Vec<String> = records
            .iter()
            .map(|r| format!("{} {}", format_time(r.time), r.email))
            .collect();
        msg_print!(Message::ArchivedBookingsHeader(format_day(date)), true);
        View::list("ARCHIVED", &lines)?;
    }
    Ok(())
}

fn handle_archived(service: &BookingService) -> Result<()> {
    let days = service.archived_days()?;
    if days.is_empty() {
        msg_info!(Message::NoArchivedDays);
        return Ok(());
    }

    msg_print!(Message::ArchivedDaysHeader, true);
    View::list("DAY", &days)?;
    Ok(())
}

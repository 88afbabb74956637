//! Booking commands: book, cancel and the appointment listings.

use super::{parse_date_arg, report, user::sign_in};
use crate::{
    libs::{formatter::format_day, messages::Message, service::BookingService, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::Args;

const DEFAULT_NEXT_COUNT: usize = 10;

#[derive(Debug, Args)]
pub struct BookArgs {
    /// Day as "Mon 3 June 2024" or 2024-06-03
    day: String,
    /// Time as HH:MM
    time: String,
    /// Email of the user booking the slot
    #[arg(short, long)]
    email: String,
    #[arg(short, long)]
    password: Option<String>,
}

#[derive(Debug, Args)]
pub struct CancelArgs {
    /// Appointment as "Mon 3 June 2024 @ 14:00"
    appointment: String,
    /// Email of the user cancelling; administrators may cancel any appointment
    #[arg(short, long)]
    email: String,
    #[arg(short, long)]
    password: Option<String>,
}

#[derive(Debug, Args)]
pub struct AppointmentsArgs {
    /// Appointments of this user
    #[arg(short, long, conflicts_with = "day", required_unless_present = "day")]
    email: Option<String>,
    /// Appointments on this day
    #[arg(short, long)]
    day: Option<String>,
}

#[derive(Debug, Args)]
pub struct NextArgs {
    /// How many appointments to show
    #[arg(short = 'n', long, default_value_t = DEFAULT_NEXT_COUNT)]
    count: usize,
}

pub fn book(service: &BookingService, args: BookArgs) -> Result<()> {
    let user = sign_in(service, &args.email, args.password)?;
    let day = match parse_date_arg(&args.day) {
        Ok(date) => format_day(date),
        Err(e) => return report(e),
    };

    match service.book(&day, &args.time, &user) {
        Ok(label) => msg_success!(Message::AppointmentBooked(label)),
        Err(e) => report(e)?,
    }
    Ok(())
}

pub fn cancel(service: &BookingService, args: CancelArgs) -> Result<()> {
    let user = sign_in(service, &args.email, args.password)?;

    match service.cancel(&args.appointment, &user) {
        Ok(()) => msg_success!(Message::AppointmentCancelled(args.appointment)),
        Err(e) => report(e)?,
    }
    Ok(())
}

pub fn appointments(service: &BookingService, args: AppointmentsArgs) -> Result<()> {
    let (owner, result) = match (args.email, args.day) {
        (Some(email), _) => {
            let result = service.list_appointments_for_user(&email);
            (email, result)
        }
        (None, Some(day)) => match parse_date_arg(&day) {
            Ok(date) => {
                let day = format_day(date);
                let result = service.list_appointments_for_day(&day);
                (day, result)
            }
            Err(e) => return report(e),
        },
        (None, None) => return Ok(()),
    };

    let lines = match result {
        Ok(lines) => lines,
        Err(e) => return report(e),
    };
    if lines.is_empty() {
        msg_info!(Message::NoAppointments);
        return Ok(());
    }

    msg_print!(Message::AppointmentsHeader(owner), true);
    View::list("APPOINTMENT", &lines)?;
    Ok(())
}

pub fn next(service: &BookingService, args: NextArgs) -> Result<()> {
    let lines = service.next_appointments(args.count)?;
    if lines.is_empty() {
        msg_info!(Message::NoAppointments);
        return Ok(());
    }

    msg_print!(Message::NextAppointmentsHeader, true);
    View::list("APPOINTMENT", &lines)?;
    Ok(())
}

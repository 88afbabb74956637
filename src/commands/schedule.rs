use super::report;
use crate::{
    libs::{messages::Message, service::BookingService, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ScheduleArgs {
    #[command(subcommand)]
    command: Option<ScheduleCommand>,
}

#[derive(Debug, Subcommand)]
enum ScheduleCommand {
    /// Show working hours, breaks and days off
    Show,
    /// Mark a time as a daily break
    Break { time: String },
    /// Mark a time as a working hour
    Work { time: String },
    /// Remove a time from the schedule
    Remove { time: String },
    /// Mark a weekday as a day off
    DayOff { weekday: String },
    /// Mark a weekday as a work day
    WorkDay { weekday: String },
}

pub fn cmd(service: &BookingService, args: ScheduleArgs) -> Result<()> {
    match args.command.unwrap_or(ScheduleCommand::Show) {
        ScheduleCommand::Show => handle_show(service),
        ScheduleCommand::Break { time } => match service.schedule_break(&time) {
            Ok(()) => {
                msg_success!(Message::BreakScheduled(time));
                Ok(())
            }
            Err(e) => report(e),
        },
        ScheduleCommand::Work { time } => match service.schedule_non_break(&time) {
            Ok(()) => {
                msg_success!(Message::WorkingHourScheduled(time));
                Ok(())
            }
            Err(e) => report(e),
        },
        ScheduleCommand::Remove { time } => match service.remove_template_time(&time) {
            Ok(()) => {
                msg_success!(Message::TemplateTimeRemoved(time));
                Ok(())
            }
            Err(e) => report(e),
        },
        ScheduleCommand::DayOff { weekday } => match service.schedule_day_off(&weekday) {
            Ok(()) => {
                msg_success!(Message::DayOffScheduled(weekday));
                Ok(())
            }
            Err(e) => report(e),
        },
        ScheduleCommand::WorkDay { weekday } => match service.schedule_work_day(&weekday) {
            Ok(()) => {
                msg_success!(Message::WorkDayScheduled(weekday));
                Ok(())
            }
            Err(e) => report(e),
        },
    }
}

fn handle_show(service: &BookingService) -> Result<()> {
    let sections = [
        (Message::WorkingHoursHeader, "TIME", service.working_hours()?),
        (Message::DailyBreaksHeader, "TIME", service.daily_breaks()?),
        (Message::DaysOffHeader, "WEEKDAY", service.days_off_schedule()?),
    ];

    for (header, column, items) in sections {
        msg_print!(header, true);
        if items.is_empty() {
            msg_info!("-");
        } else {
            View::list(column, &items)?;
        }
    }
    Ok(())
}

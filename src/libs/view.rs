//! Console tables for the calendar commands.

use crate::db::analytics::UserStats;
use crate::db::users::User;
use crate::libs::formatter::format_time;
use crate::libs::slot::TimeSlot;
use anyhow::Result;
use prettytable::{row, Table};

const NEVER: &str = "-";

pub struct View {}

impl View {
    pub fn days(days: &[String]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["#", "DAY"]);
        for (index, day) in days.iter().enumerate() {
            table.add_row(row![index + 1, day]);
        }
        table.printstd();

        Ok(())
    }

    pub fn slots(slots: &[TimeSlot]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["TIME", "STATUS"]);
        for slot in slots {
            table.add_row(row![format_time(slot.time), slot.status]);
        }
        table.printstd();

        Ok(())
    }

    /// One column list, used for times, labels and attendee lines.
    pub fn list(header: &str, items: &[String]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row![header]);
        for item in items {
            table.add_row(row![item]);
        }
        table.printstd();

        Ok(())
    }

    pub fn user(user: &User) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["EMAIL", "NAME", "ROLE", "REGISTERED"]);
        table.add_row(row![
            user.email,
            user.display_name(),
            user.role.as_str(),
            user.created_at.map(|at| at.format("%F %R").to_string()).unwrap_or_else(|| NEVER.to_string())
        ]);
        table.printstd();

        Ok(())
    }

    pub fn stats(stats: &[UserStats]) -> Result<()> {
        let mut table = Table::new();

        table.add_row(row!["EMAIL", "REGISTERED", "LAST LOGIN", "LOGINS", "BOOKINGS"]);
        for s in stats {
            table.add_row(row![
                s.email,
                s.registered_at.map(|at| at.format("%F %R").to_string()).unwrap_or_else(|| NEVER.to_string()),
                s.last_login.map(|at| at.format("%F %R").to_string()).unwrap_or_else(|| NEVER.to_string()),
                s.login_count,
                s.bookings_total
            ]);
        }
        table.printstd();

        Ok(())
    }
}

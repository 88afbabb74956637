//! Display implementation for apcal application messages.
//!
//! Every user-facing string lives here, keyed by a `Message` variant. Callers
//! build a variant with its parameters and hand it to one of the `msg_*`
//! macros, which decide whether the text goes to the console or to `tracing`.
//!
//! ```rust
//! use apcal::libs::messages::Message;
//!
//! let message = Message::DayAdded("Mon 3 June 2024".to_string());
//! assert_eq!(message.to_string(), "Day Mon 3 June 2024 added to the calendar");
//! ```

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === USER MESSAGES ===
            Message::UserRegistered(email) => format!("User {} registered", email),
            Message::UserAlreadyExists(email) => format!("A user with email {} is already registered", email),
            Message::UserNotFound(email) => format!("No user registered with email {}", email),
            Message::UserPromoted(email) => format!("User {} is now an administrator", email),
            Message::AccessCodeRejected => "The access code is incorrect".to_string(),
            Message::LoginSucceeded(email) => format!("Logged in as {}", email),
            Message::AdminLoginSucceeded(email) => format!("Logged in as {} (administrator)", email),
            Message::LoginWrongPassword => "The password is incorrect".to_string(),
            Message::LoginUnknownEmail => "This email is not registered".to_string(),
            Message::LoginAnalyticsFailed(error) => format!("Could not update login analytics: {}", error),
            Message::UserHeader => "User:".to_string(),

            // === CALENDAR DAY MESSAGES ===
            Message::DayAdded(day) => format!("Day {} added to the calendar", day),
            Message::DayAlreadyExists(day) => format!("Day {} is already in the calendar", day),
            Message::DayDeleted(day) => format!("Day {} deleted", day),
            Message::DayArchived(day, count) => format!("Archived {} booking(s) from {}", count, day),
            Message::ArchivedBookingsHeader(day) => format!("Archived bookings of {}:", day),
            Message::ArchivedDaysHeader => "Days with archived bookings:".to_string(),
            Message::NoArchivedDays => "No bookings have been archived yet".to_string(),
            Message::EmptyWorkSchedule(day) => format!("The work schedule is empty, so {} has no time slots", day),
            Message::DaysHeader => "Available days:".to_string(),
            Message::NoDaysFound => "The calendar has no days yet".to_string(),
            Message::TimesHeader(day) => format!("Open times on {}:", day),
            Message::NoOpenTimes(day) => format!("No open times left on {}", day),
            Message::SlotsHeader(day) => format!("Time slots on {}:", day),
            Message::SlotsUpdated(day) => format!("Time slots on {} updated", day),
            Message::UsersBookedHeader(day) => format!("Users with appointments on {}:", day),
            Message::NoUsersBooked(day) => format!("Nobody has an appointment on {}", day),

            // === BOOKING MESSAGES ===
            Message::AppointmentBooked(label) => format!("Appointment booked: {}", label),
            Message::AppointmentCancelled(label) => format!("Appointment cancelled: {}", label),
            Message::SlotUnavailable(label) => format!("{} is not available for booking", label),
            Message::AppointmentsHeader(owner) => format!("Appointments for {}:", owner),
            Message::NextAppointmentsHeader => "Next appointments:".to_string(),
            Message::NoAppointments => "No appointments found".to_string(),

            // === WORK SCHEDULE MESSAGES ===
            Message::WorkingHoursHeader => "Working hours:".to_string(),
            Message::DailyBreaksHeader => "Daily breaks:".to_string(),
            Message::DaysOffHeader => "Days off:".to_string(),
            Message::BreakScheduled(time) => format!("{} is now a daily break", time),
            Message::WorkingHourScheduled(time) => format!("{} is now a working hour", time),
            Message::TemplateTimeRemoved(time) => format!("{} removed from the work schedule", time),
            Message::DayOffScheduled(weekday) => format!("{} is now a day off", weekday),
            Message::WorkDayScheduled(weekday) => format!("{} is now a work day", weekday),
            Message::ScheduleSeeded(count) => format!("Work schedule seeded with {} time slot(s)", count),

            // === ACCESS CODE MESSAGES ===
            Message::AccessCodeCurrent(code) => format!("Current access code: {}", code),
            Message::AccessCodeUpdated => "Access code updated".to_string(),

            // === ANALYTICS MESSAGES ===
            Message::RegistrationCount(count) => format!("Registered users: {}", count),
            Message::StatsHeader => "Usage statistics:".to_string(),

            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigModuleDatabase => "Database settings".to_string(),
            Message::ConfigModuleCalendar => "Calendar settings".to_string(),
            Message::ConfigModuleRegistration => "Registration settings".to_string(),

            // === VALIDATION MESSAGES ===
            Message::InvalidDay(day) => format!("'{}' is not a day like 'Mon 3 June 2024'", day),
            Message::InvalidTime(time) => format!("'{}' is not a time like '14:00'", time),
            Message::InvalidWeekday(weekday) => format!("'{}' is not a day of the week", weekday),
            Message::InvalidBookingLabel(label) => format!("'{}' is not an appointment like 'Mon 3 June 2024 @ 14:00'", label),
            Message::InvalidSlotEntry(entry) => format!("'{}' is not a slot entry like '09:00=open'", entry),
            Message::InvalidSlotStatus(status) => format!("'{}' is not a slot status (open, break)", status),
            Message::InvalidEmail(email) => format!("'{}' is not an email address", email),
            Message::EmptyField(field) => format!("{} must not be empty", field),
            Message::InvalidTimeCorrection(hours) => {
                format!("Server time correction of {} hours is outside -24..=24", hours)
            }
            Message::CorrectionOutOfRange(at, hours) => {
                format!("Cannot shift {} back by {} hours", at, hours)
            }

            // === DATABASE MESSAGES ===
            Message::DbOperationFailed(operation, error) => format!("{} failed: {}", operation, error),

            // === PROMPTS ===
            Message::PromptDatabasePath => "Database file".to_string(),
            Message::PromptServerTimeCorrection => "Server time correction (hours)".to_string(),
            Message::PromptOpeningHour => "Opening hour (0-23)".to_string(),
            Message::PromptClosingHour => "Closing hour (1-24)".to_string(),
            Message::PromptSlotMinutes => "Slot length (minutes)".to_string(),
            Message::PromptInitialAccessCode => "Initial access code".to_string(),
            Message::PromptPassword => "Password".to_string(),
            Message::PromptRepeatPassword => "Repeat password".to_string(),
            Message::PasswordMismatch => "Passwords do not match".to_string(),
            Message::PromptSelectModules => "Select settings to configure".to_string(),

            // === MIGRATION MESSAGES ===
            Message::MigrationsFound(count) => format!("Found {} pending database migrations", count),
            Message::RunningMigration(version, name) => format!("Running migration v{}: {}", version, name),
            Message::MigrationCompleted(version) => format!("✓ Migration v{} completed", version),
            Message::MigrationFailed(version, error) => format!("✗ Migration v{} failed: {}", version, error),
            Message::AllMigrationsCompleted => "All database migrations completed successfully".to_string(),
        };

        write!(f, "{}", text)
    }
}

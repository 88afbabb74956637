//! Booking service: the single entry point for calendar operations.
//!
//! The service translates the external string forms (days, times, booking
//! labels, slot lists) into `chrono` values, drives the stores and returns an
//! explicit [`CalendarResult`]. Operations that touch more than one table run
//! in one SQLite transaction, so a booking and its counter update are either
//! both stored or both discarded. Failures are logged before they are
//! returned; the caller decides how much of the error to show.
//!
//! ```rust
//! use apcal::db::db::Db;
//! use apcal::libs::config::Config;
//! use apcal::libs::service::BookingService;
//! use chrono::NaiveDate;
//!
//! let service = BookingService::with_db(Db::open_in_memory()?, &Config::default())?;
//! let user = service.register("Ada", "Lovelace", "ada@example.com", "pw", "WELCOME")?;
//! service.add_day(NaiveDate::from_ymd_opt(2024, 6, 3).unwrap())?;
//! service.book("Mon 3 June 2024", "14:00", &user)?;
//! assert_eq!(service.list_appointments_for_user("ada@example.com")?, vec!["Mon 3 June 2024 @ 14:00"]);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::db::analytics::{Analytics, UserStats};
use crate::db::calendar::{Booking, Calendar};
use crate::db::db::Db;
use crate::db::records::{DayRecord, Records};
use crate::db::settings::{Settings, SCHEDULE_SEEDED_KEY};
use crate::db::users::{Role, User, Users};
use crate::db::work_schedule::WorkSchedule;
use crate::libs::config::{CalendarConfig, Config};
use crate::libs::error::{CalendarError, CalendarResult};
use crate::libs::formatter::{
    format_attendee, format_day, format_label, format_time, parse_day, parse_label, parse_time, parse_weekday, weekday_name,
};
use crate::libs::messages::Message;
use crate::libs::password::{hash_password, verify_password};
use crate::libs::slot::{parse_slot_list, SlotStatus, TimeSlot};
use crate::msg_debug;
use anyhow::{bail, Result};
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use rusqlite::{Connection, ErrorCode};
use tracing::{error, info, warn};

const MINUTES_PER_DAY: u32 = 24 * 60;
/// Largest server clock correction, in hours, in either direction.
const MAX_TIME_CORRECTION: i64 = 24;

/// Result of a credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    Success,
    WrongPassword,
    UnknownEmail,
    AdminSuccess,
}

impl LoginOutcome {
    /// Legacy response code: 1 success, 2 wrong password, 3 unknown email, 4 admin.
    pub fn code(&self) -> i32 {
        match self {
            LoginOutcome::Success => 1,
            LoginOutcome::WrongPassword => 2,
            LoginOutcome::UnknownEmail => 3,
            LoginOutcome::AdminSuccess => 4,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success | LoginOutcome::AdminSuccess)
    }
}

#[derive(Clone)]
pub struct BookingService {
    db: Db,
    calendar: CalendarConfig,
}

impl BookingService {
    /// Opens the configured database and prepares it for use.
    pub fn open(config: &Config) -> Result<Self> {
        let db = Db::new(&config.database())?;
        Self::with_db(db, config)
    }

    /// Wraps an already opened database. On first use the work schedule
    /// template and the access code are seeded from the configuration.
    pub fn with_db(db: Db, config: &Config) -> Result<Self> {
        let calendar = config.calendar();
        check_calendar_config(&calendar)?;
        {
            let mut conn = db.conn();
            let tx = conn.transaction()?;
            seed_work_schedule(&tx, &calendar)?;
            let settings = Settings::new(&tx);
            if settings.access_code()?.is_none() {
                let code = config.registration().initial_access_code;
                require("Access code", &code)?;
                settings.set_access_code(code.trim())?;
            }
            tx.commit()?;
        }
        Ok(Self { db, calendar })
    }

    pub fn db(&self) -> &Db {
        &self.db
    }

    // === USERS ===

    /// Creates a user if `access_code` matches the stored code, ignoring case.
    pub fn register(&self, first_name: &str, last_name: &str, email: &str, password: &str, access_code: &str) -> CalendarResult<User> {
        logged("register", || {
            let email = normalize_email(email)?;
            require("First name", first_name)?;
            require("Last name", last_name)?;
            require("Password", password)?;

            let mut conn = self.db.conn();
            let tx = conn.transaction()?;

            let stored = Settings::new(&tx).access_code()?;
            if !stored.is_some_and(|code| code.trim().to_lowercase() == access_code.trim().to_lowercase()) {
                return Err(CalendarError::AccessDenied);
            }

            let users = Users::new(&tx);
            if users.exists(&email)? {
                return Err(CalendarError::DuplicateEmail(email));
            }

            let user = User::new(first_name.trim(), last_name.trim(), &email, hash_password(password)?);
            users.insert(&user).map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => CalendarError::DuplicateEmail(email.clone()),
                _ => e.into(),
            })?;
            Analytics::new(&tx).record_registration(&email, now())?;
            let user = users.get(&email)?.unwrap_or(user);
            tx.commit()?;

            info!("{}", Message::UserRegistered(email));
            Ok(user)
        })
    }

    /// Checks credentials. Successful logins update the login analytics;
    /// a failure there is logged and does not affect the outcome.
    pub fn authenticate(&self, email: &str, password: &str) -> CalendarResult<LoginOutcome> {
        logged("authenticate", || {
            let email = email.trim().to_lowercase();
            let conn = self.db.conn();

            let outcome = match Users::new(&conn).get(&email)? {
                None => LoginOutcome::UnknownEmail,
                Some(user) if !verify_password(password, &user.password_hash)? => LoginOutcome::WrongPassword,
                Some(user) if user.is_admin() => LoginOutcome::AdminSuccess,
                Some(_) => LoginOutcome::Success,
            };

            if outcome.is_success() {
                if let Err(e) = Analytics::new(&conn).record_login(&email, now()) {
                    warn!("{}", Message::LoginAnalyticsFailed(e.to_string()));
                }
            }
            Ok(outcome)
        })
    }

    pub fn lookup_user(&self, email: &str) -> CalendarResult<Option<User>> {
        logged("lookup_user", || {
            let conn = self.db.conn();
            Ok(Users::new(&conn).get(&email.trim().to_lowercase())?)
        })
    }

    pub fn promote_to_admin(&self, email: &str) -> CalendarResult<()> {
        logged("promote_to_admin", || {
            let email = email.trim().to_lowercase();
            let conn = self.db.conn();
            if Users::new(&conn).set_role(&email, Role::Admin)? == 0 {
                return Err(CalendarError::NotFound(email));
            }
            info!("{}", Message::UserPromoted(email));
            Ok(())
        })
    }

    // === CALENDAR DAYS ===

    /// Adds a day and seeds its slots from the work schedule template:
    /// working hours open, breaks closed. On a day off every slot is a break.
    pub fn add_day(&self, date: NaiveDate) -> CalendarResult<Vec<TimeSlot>> {
        logged("add_day", || {
            let mut conn = self.db.conn();
            let tx = conn.transaction()?;
            let calendar = Calendar::new(&tx);
            if calendar.day_exists(date)? {
                return Err(CalendarError::DuplicateDay(format_day(date)));
            }

            let schedule = WorkSchedule::new(&tx);
            if schedule.is_empty()? {
                warn!("{}", Message::EmptyWorkSchedule(format_day(date)));
            }
            let day_off = schedule.is_day_off(date.weekday())?;
            let slots: Vec<TimeSlot> = schedule
                .template()?
                .into_iter()
                .map(|t| {
                    let status = if day_off || t.is_break { SlotStatus::Break } else { SlotStatus::Open };
                    TimeSlot::new(t.time, status)
                })
                .collect();

            calendar.add_day(date)?;
            calendar.insert_slots(date, &slots)?;
            tx.commit()?;

            info!("{}", Message::DayAdded(format_day(date)));
            Ok(slots)
        })
    }

    /// Removes a day with its slots and bookings. Booking totals of the
    /// affected users drop accordingly.
    pub fn delete_day(&self, date: NaiveDate) -> CalendarResult<()> {
        logged("delete_day", || {
            let mut conn = self.db.conn();
            let tx = conn.transaction()?;
            let calendar = Calendar::new(&tx);
            let bookings = calendar.bookings_for_day(date)?;
            if calendar.delete_day(date)? == 0 {
                return Err(CalendarError::NotFound(format_day(date)));
            }

            let analytics = Analytics::new(&tx);
            for booking in &bookings {
                analytics.adjust_bookings(&booking.email, -1)?;
            }
            tx.commit()?;

            info!("{}", Message::DayDeleted(format_day(date)));
            Ok(())
        })
    }

    /// All calendar days, ascending, as day strings.
    pub fn list_available_days(&self) -> CalendarResult<Vec<String>> {
        Ok(self.list_available_dates()?.into_iter().map(format_day).collect())
    }

    pub fn list_available_dates(&self) -> CalendarResult<Vec<NaiveDate>> {
        logged("list_available_days", || {
            let conn = self.db.conn();
            let mut dates = Calendar::new(&conn).dates()?;
            dates.sort();
            Ok(dates)
        })
    }

    /// Open times of a day, earliest first.
    pub fn list_available_times(&self, day: &str) -> CalendarResult<Vec<String>> {
        logged("list_available_times", || {
            let date = parse_day(day)?;
            let conn = self.db.conn();
            let times = Calendar::new(&conn).times_with_status(date, SlotStatus::Open)?;
            Ok(times.into_iter().map(format_time).collect())
        })
    }

    pub fn list_time_slots(&self, day: &str) -> CalendarResult<Vec<TimeSlot>> {
        logged("list_time_slots", || {
            let date = parse_day(day)?;
            let conn = self.db.conn();
            let calendar = Calendar::new(&conn);
            if !calendar.day_exists(date)? {
                return Err(CalendarError::NotFound(format_day(date)));
            }
            Ok(calendar.slots(date)?)
        })
    }

    /// Rewrites the open and break slots of a day from an encoded list such as
    /// `"09:00=open,12:00=break"`. Booked slots are left as they are.
    pub fn set_slot_statuses(&self, day: &str, encoded: &str) -> CalendarResult<()> {
        logged("set_slot_statuses", || {
            let date = parse_day(day)?;
            let slots = parse_slot_list(encoded)?;

            let mut conn = self.db.conn();
            let tx = conn.transaction()?;
            let calendar = Calendar::new(&tx);
            if !calendar.day_exists(date)? {
                return Err(CalendarError::NotFound(format_day(date)));
            }
            calendar.replace_unbooked_slots(date, &slots)?;
            tx.commit()?;

            info!("{}", Message::SlotsUpdated(format_day(date)));
            Ok(())
        })
    }

    /// Copies the day's bookings to the permanent archive and returns how
    /// many were newly archived.
    pub fn archive_day(&self, date: NaiveDate) -> CalendarResult<usize> {
        logged("archive_day", || {
            let conn = self.db.conn();
            let calendar = Calendar::new(&conn);
            if !calendar.day_exists(date)? {
                return Err(CalendarError::NotFound(format_day(date)));
            }
            let bookings = calendar.bookings_for_day(date)?;
            let archived = Records::new(&conn).archive(&bookings, now())?;

            info!("{}", Message::DayArchived(format_day(date), archived));
            Ok(archived)
        })
    }

    /// Archived bookings of a date, ordered by time. Unlike the live
    /// calendar these survive `delete_day`.
    pub fn archived_bookings(&self, date: NaiveDate) -> CalendarResult<Vec<DayRecord>> {
        logged("archived_bookings", || {
            let conn = self.db.conn();
            Ok(Records::new(&conn).for_day(date)?)
        })
    }

    /// Every date with at least one archived booking, ascending.
    pub fn archived_days(&self) -> CalendarResult<Vec<String>> {
        logged("archived_days", || {
            let conn = self.db.conn();
            Ok(Records::new(&conn).dates()?.into_iter().map(format_day).collect())
        })
    }

    /// Emails of everyone with a booking on the date.
    pub fn users_booked_on(&self, date: NaiveDate) -> CalendarResult<Vec<String>> {
        logged("users_booked_on", || {
            let conn = self.db.conn();
            Ok(Calendar::new(&conn).emails_booked_on(date)?)
        })
    }

    // === BOOKINGS ===

    /// Books an open slot for the user and returns the booking label.
    pub fn book(&self, day: &str, time: &str, user: &User) -> CalendarResult<String> {
        logged("book", || {
            let date = parse_day(day)?;
            let time = parse_time(time)?;
            let label = format_label(date, time);

            let mut conn = self.db.conn();
            let tx = conn.transaction()?;
            if !Users::new(&tx).exists(&user.email)? {
                return Err(CalendarError::NotFound(user.email.clone()));
            }

            let calendar = Calendar::new(&tx);
            if calendar.swap_status(date, time, SlotStatus::Open, SlotStatus::Booked)? == 0 {
                return Err(CalendarError::SlotUnavailable(label));
            }
            calendar.insert_booking(date, time, &user.email)?;
            Analytics::new(&tx).adjust_bookings(&user.email, 1)?;
            tx.commit()?;

            info!("{}", Message::AppointmentBooked(format!("{} for {}", label, user.email)));
            Ok(label)
        })
    }

    /// Cancels the booking identified by `"<day> @ <time>"`. Users may only
    /// cancel their own bookings; administrators may cancel any.
    pub fn cancel(&self, label: &str, user: &User) -> CalendarResult<()> {
        logged("cancel", || {
            let (date, time) = parse_label(label)?;
            let label = format_label(date, time);

            let mut conn = self.db.conn();
            let tx = conn.transaction()?;
            let calendar = Calendar::new(&tx);
            let booking = calendar
                .booking_at(date, time)?
                .filter(|b| user.is_admin() || b.email == user.email)
                .ok_or_else(|| CalendarError::NotFound(label.clone()))?;

            calendar.delete_booking(date, time)?;
            calendar.swap_status(date, time, SlotStatus::Booked, SlotStatus::Open)?;
            Analytics::new(&tx).adjust_bookings(&booking.email, -1)?;
            tx.commit()?;

            info!("{}", Message::AppointmentCancelled(format!("{} for {}", label, booking.email)));
            Ok(())
        })
    }

    /// Booking labels of a user in chronological order.
    pub fn list_appointments_for_user(&self, email: &str) -> CalendarResult<Vec<String>> {
        logged("list_appointments_for_user", || {
            let conn = self.db.conn();
            let bookings = Calendar::new(&conn).bookings_for_user(&email.trim().to_lowercase())?;
            Ok(bookings.into_iter().map(|b| format_label(b.date, b.time)).collect())
        })
    }

    /// `"<First> <Last> @ <time>"` for every booking of the day.
    pub fn list_appointments_for_day(&self, day: &str) -> CalendarResult<Vec<String>> {
        logged("list_appointments_for_day", || {
            let date = parse_day(day)?;
            let conn = self.db.conn();
            let bookings = Calendar::new(&conn).bookings_for_day(date)?;
            format_attendees(&conn, &bookings)
        })
    }

    /// The next `count` bookings from now, corrected for the server clock.
    pub fn next_appointments(&self, count: usize) -> CalendarResult<Vec<String>> {
        self.next_appointments_from(Local::now().naive_local(), count)
    }

    /// The next `count` bookings from `now` shifted back by the configured
    /// server time correction and truncated to the hour.
    pub fn next_appointments_from(&self, now: NaiveDateTime, count: usize) -> CalendarResult<Vec<String>> {
        logged("next_appointments", || {
            let start = TimeDelta::try_hours(self.calendar.server_time_correction)
                .and_then(|correction| now.checked_sub_signed(correction))
                .ok_or_else(|| {
                    let message = Message::CorrectionOutOfRange(now.to_string(), self.calendar.server_time_correction);
                    CalendarError::Validation(message.to_string())
                })?;
            let start_time = NaiveTime::from_hms_opt(start.hour(), 0, 0).unwrap_or(NaiveTime::MIN);

            let conn = self.db.conn();
            let bookings = Calendar::new(&conn).bookings_from(start.date(), start_time, count)?;
            format_attendees(&conn, &bookings)
        })
    }

    // === WORK SCHEDULE ===

    pub fn working_hours(&self) -> CalendarResult<Vec<String>> {
        logged("working_hours", || {
            let conn = self.db.conn();
            Ok(WorkSchedule::new(&conn).working_hours()?.into_iter().map(format_time).collect())
        })
    }

    pub fn daily_breaks(&self) -> CalendarResult<Vec<String>> {
        logged("daily_breaks", || {
            let conn = self.db.conn();
            Ok(WorkSchedule::new(&conn).breaks()?.into_iter().map(format_time).collect())
        })
    }

    /// Weekday names of the scheduled days off, Monday first.
    pub fn days_off_schedule(&self) -> CalendarResult<Vec<String>> {
        logged("days_off_schedule", || {
            let conn = self.db.conn();
            let days = WorkSchedule::new(&conn).days_off()?;
            Ok(days.into_iter().map(|d| weekday_name(d).to_string()).collect())
        })
    }

    pub fn schedule_break(&self, time: &str) -> CalendarResult<()> {
        self.set_template_time("schedule_break", time, true)
    }

    pub fn schedule_non_break(&self, time: &str) -> CalendarResult<()> {
        self.set_template_time("schedule_non_break", time, false)
    }

    fn set_template_time(&self, operation: &'static str, time: &str, is_break: bool) -> CalendarResult<()> {
        logged(operation, || {
            let time = parse_time(time)?;
            let conn = self.db.conn();
            WorkSchedule::new(&conn).set_break(time, is_break)?;
            msg_debug!(if is_break {
                Message::BreakScheduled(format_time(time))
            } else {
                Message::WorkingHourScheduled(format_time(time))
            });
            Ok(())
        })
    }

    pub fn remove_template_time(&self, time: &str) -> CalendarResult<()> {
        logged("remove_template_time", || {
            let time = parse_time(time)?;
            let conn = self.db.conn();
            if WorkSchedule::new(&conn).remove(time)? == 0 {
                return Err(CalendarError::NotFound(format_time(time)));
            }
            Ok(())
        })
    }

    pub fn schedule_day_off(&self, weekday: &str) -> CalendarResult<()> {
        self.set_day_off("schedule_day_off", weekday, true)
    }

    pub fn schedule_work_day(&self, weekday: &str) -> CalendarResult<()> {
        self.set_day_off("schedule_work_day", weekday, false)
    }

    fn set_day_off(&self, operation: &'static str, weekday: &str, day_off: bool) -> CalendarResult<()> {
        logged(operation, || {
            let weekday = parse_weekday(weekday)?;
            let conn = self.db.conn();
            WorkSchedule::new(&conn).set_day_off(weekday, day_off)?;
            info!("Work days edited: {} day off = {}", weekday_name(weekday), day_off);
            Ok(())
        })
    }

    // === ACCESS CODE ===

    pub fn access_code(&self) -> CalendarResult<String> {
        logged("access_code", || {
            let conn = self.db.conn();
            Settings::new(&conn).access_code()?.ok_or_else(|| CalendarError::NotFound("access code".to_string()))
        })
    }

    pub fn set_access_code(&self, code: &str) -> CalendarResult<()> {
        logged("set_access_code", || {
            require("Access code", code)?;
            let conn = self.db.conn();
            Settings::new(&conn).set_access_code(code.trim())?;
            info!("{}", Message::AccessCodeUpdated);
            Ok(())
        })
    }

    // === ANALYTICS ===

    pub fn registration_count(&self) -> CalendarResult<i64> {
        logged("registration_count", || {
            let conn = self.db.conn();
            Ok(Analytics::new(&conn).registration_count()?)
        })
    }

    pub fn user_stats(&self, email: &str) -> CalendarResult<Option<UserStats>> {
        logged("user_stats", || {
            let conn = self.db.conn();
            Ok(Analytics::new(&conn).user_stats(&email.trim().to_lowercase())?)
        })
    }

    pub fn all_user_stats(&self) -> CalendarResult<Vec<UserStats>> {
        logged("all_user_stats", || {
            let conn = self.db.conn();
            Ok(Analytics::new(&conn).all()?)
        })
    }
}

/// Runs an operation and logs its error, if any, before handing it back.
fn logged<T>(operation: &'static str, f: impl FnOnce() -> CalendarResult<T>) -> CalendarResult<T> {
    f().inspect_err(|e| error!(operation, kind = ?e.kind(), "{}", Message::DbOperationFailed(operation.to_string(), e.to_string())))
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn require(field: &'static str, value: &str) -> CalendarResult<()> {
    if value.trim().is_empty() {
        return Err(CalendarError::Validation(Message::EmptyField(field).to_string()));
    }
    Ok(())
}

fn normalize_email(email: &str) -> CalendarResult<String> {
    let email = email.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(CalendarError::Validation(Message::InvalidEmail(email).to_string())),
    }
}

/// Resolves booking emails to display names. A booking whose user is gone
/// is shown with the raw email.
fn format_attendees(conn: &Connection, bookings: &[Booking]) -> CalendarResult<Vec<String>> {
    let users = Users::new(conn);
    let mut lines = Vec::with_capacity(bookings.len());
    for booking in bookings {
        match users.get(&booking.email)? {
            Some(user) => lines.push(format_attendee(&user.first_name, &user.last_name, booking.time)),
            None => {
                warn!("{}", Message::UserNotFound(booking.email.clone()));
                lines.push(format!("{} @ {}", booking.email, format_time(booking.time)));
            }
        }
    }
    Ok(lines)
}

/// Rejects calendar settings that would break seeding or the upcoming
/// appointments window. Runs on every open, not only the first.
fn check_calendar_config(config: &CalendarConfig) -> Result<()> {
    if !(1..=MINUTES_PER_DAY).contains(&config.slot_minutes)
        || config.opening_hour >= config.closing_hour
        || config.closing_hour > 24
    {
        bail!(
            "invalid calendar hours: {}-{} every {} minutes",
            config.opening_hour,
            config.closing_hour,
            config.slot_minutes
        );
    }
    if !(-MAX_TIME_CORRECTION..=MAX_TIME_CORRECTION).contains(&config.server_time_correction) {
        bail!(Message::InvalidTimeCorrection(config.server_time_correction).to_string());
    }
    Ok(())
}

/// Fills the template from config the first time a database is opened.
fn seed_work_schedule(conn: &Connection, config: &CalendarConfig) -> Result<()> {
    let settings = Settings::new(conn);
    if settings.get(SCHEDULE_SEEDED_KEY)?.is_some() {
        return Ok(());
    }
    let schedule = WorkSchedule::new(conn);
    let breaks = config.break_times.iter().map(|t| parse_time(t)).collect::<CalendarResult<Vec<_>>>()?;

    let mut minutes = config.opening_hour * 60;
    let mut seeded = 0;
    while minutes < config.closing_hour * 60 {
        if let Some(time) = NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0) {
            schedule.set_break(time, breaks.contains(&time))?;
            seeded += 1;
        }
        minutes += config.slot_minutes;
    }
    for time in &breaks {
        schedule.set_break(*time, true)?;
    }
    for day in &config.days_off {
        schedule.set_day_off(parse_weekday(day)?, true)?;
    }

    settings.set(SCHEDULE_SEEDED_KEY, "1")?;
    msg_debug!(Message::ScheduleSeeded(seeded));
    Ok(())
}

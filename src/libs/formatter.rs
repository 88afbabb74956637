//! Parsing and formatting of the external calendar representations.
//!
//! Days travel as `"Mon 3 June 2024"`, times as `"14:00"` and appointments as
//! `"<day> @ <time>"`. Everything entering the service goes through these
//! functions, so the rest of the crate only sees `chrono` values.
//!
//! ```rust
//! use apcal::libs::formatter::{format_label, parse_label};
//!
//! let (date, time) = parse_label("Mon 3 June 2024 @ 14:00")?;
//! assert_eq!(format_label(date, time), "Mon 3 June 2024 @ 14:00");
//! # Ok::<(), apcal::libs::error::CalendarError>(())
//! ```

use crate::libs::error::{CalendarError, CalendarResult};
use crate::libs::messages::Message;
use chrono::{NaiveDate, NaiveTime, Timelike, Weekday};

/// English "Weekday Day Month Year", e.g. `Mon 3 June 2024`.
pub const DAY_FORMAT: &str = "%a %-d %B %Y";

pub const TIME_FORMAT: &str = "%H:%M";

/// Separator between the day and the time in a booking label.
pub const LABEL_SEPARATOR: char = '@';

pub fn format_day(date: NaiveDate) -> String {
    date.format(DAY_FORMAT).to_string()
}

/// Parses a day string in exactly the form [`format_day`] produces. A weekday
/// that does not match the date, abbreviated months, zero-padded days and
/// other capitalisations are rejected.
pub fn parse_day(day: &str) -> CalendarResult<NaiveDate> {
    let invalid = || CalendarError::Parse(Message::InvalidDay(day.to_string()).to_string());
    let date = NaiveDate::parse_from_str(day.trim(), DAY_FORMAT).map_err(|_| invalid())?;
    if format_day(date) != day.trim() {
        return Err(invalid());
    }
    Ok(date)
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

/// Parses an `HH:MM` time of day.
pub fn parse_time(time: &str) -> CalendarResult<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), TIME_FORMAT).map_err(|_| CalendarError::Parse(Message::InvalidTime(time.to_string()).to_string()))
}

pub fn format_label(date: NaiveDate, time: NaiveTime) -> String {
    format!("{} {} {}", format_day(date), LABEL_SEPARATOR, format_time(time))
}

/// Splits `"<day> @ <time>"` into its parts.
pub fn parse_label(label: &str) -> CalendarResult<(NaiveDate, NaiveTime)> {
    let (day, time) = label
        .split_once(LABEL_SEPARATOR)
        .ok_or_else(|| CalendarError::Parse(Message::InvalidBookingLabel(label.to_string()).to_string()))?;
    Ok((parse_day(day)?, parse_time(time)?))
}

/// Renders an attendee line for day and upcoming views.
pub fn format_attendee(first_name: &str, last_name: &str, time: NaiveTime) -> String {
    format!("{} {} {} {}", first_name, last_name, LABEL_SEPARATOR, format_time(time))
}

/// Accepts full English names and three-letter abbreviations in any case.
pub fn parse_weekday(weekday: &str) -> CalendarResult<Weekday> {
    weekday
        .trim()
        .parse::<Weekday>()
        .map_err(|_| CalendarError::Parse(Message::InvalidWeekday(weekday.to_string()).to_string()))
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Drops seconds and below so stored slot times compare exactly.
pub fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    time.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(time)
}

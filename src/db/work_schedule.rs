//! Weekly work schedule template used to seed new calendar days.
//!
//! The template is a list of times of day, each flagged as a working hour or
//! a break, plus a set of weekdays off. Editing it never touches days that
//! already exist in the calendar.

use crate::libs::formatter::truncate_to_minute;
use chrono::{NaiveTime, Weekday};
use rusqlite::{params, Connection, Result};

const SELECT_TEMPLATE: &str = "SELECT time, is_break FROM work_hours ORDER BY time";
const SELECT_BY_KIND: &str = "SELECT time FROM work_hours WHERE is_break = ?1 ORDER BY time";
const UPSERT_TIME: &str = "INSERT INTO work_hours (time, is_break) VALUES (?1, ?2) ON CONFLICT(time) DO UPDATE SET is_break = excluded.is_break";
const DELETE_TIME: &str = "DELETE FROM work_hours WHERE time = ?1";
const COUNT_TIMES: &str = "SELECT COUNT(*) FROM work_hours";
const SELECT_DAYS_OFF: &str = "SELECT weekday FROM days_off ORDER BY weekday";
const INSERT_DAY_OFF: &str = "INSERT OR IGNORE INTO days_off (weekday) VALUES (?1)";
const DELETE_DAY_OFF: &str = "DELETE FROM days_off WHERE weekday = ?1";
const COUNT_DAY_OFF: &str = "SELECT COUNT(*) FROM days_off WHERE weekday = ?1";

/// One time of day in the template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateSlot {
    pub time: NaiveTime,
    pub is_break: bool,
}

pub struct WorkSchedule<'c> {
    conn: &'c Connection,
}

impl<'c> WorkSchedule<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// All template times in chronological order.
    pub fn template(&self) -> Result<Vec<TemplateSlot>> {
        let mut stmt = self.conn.prepare(SELECT_TEMPLATE)?;
        let slots = stmt
            .query_map([], |row| {
                Ok(TemplateSlot {
                    time: row.get(0)?,
                    is_break: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(slots)
    }

    pub fn working_hours(&self) -> Result<Vec<NaiveTime>> {
        self.times(false)
    }

    pub fn breaks(&self) -> Result<Vec<NaiveTime>> {
        self.times(true)
    }

    fn times(&self, is_break: bool) -> Result<Vec<NaiveTime>> {
        let mut stmt = self.conn.prepare(SELECT_BY_KIND)?;
        let times = stmt.query_map(params![is_break], |row| row.get(0))?.collect::<Result<Vec<_>>>()?;
        Ok(times)
    }

    /// Marks a time as a break or a working hour, adding it if absent.
    pub fn set_break(&self, time: NaiveTime, is_break: bool) -> Result<()> {
        self.conn.execute(UPSERT_TIME, params![truncate_to_minute(time), is_break])?;
        Ok(())
    }

    pub fn remove(&self, time: NaiveTime) -> Result<usize> {
        self.conn.execute(DELETE_TIME, params![time])
    }

    pub fn is_empty(&self) -> Result<bool> {
        let count: i64 = self.conn.query_row(COUNT_TIMES, [], |row| row.get(0))?;
        Ok(count == 0)
    }

    pub fn days_off(&self) -> Result<Vec<Weekday>> {
        let mut stmt = self.conn.prepare(SELECT_DAYS_OFF)?;
        let days = stmt
            .query_map([], |row| row.get::<_, u8>(0))?
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .filter_map(|n| Weekday::try_from(n).ok())
            .collect();
        Ok(days)
    }

    pub fn set_day_off(&self, weekday: Weekday, day_off: bool) -> Result<()> {
        let n = weekday.num_days_from_monday();
        if day_off {
            self.conn.execute(INSERT_DAY_OFF, params![n])?;
        } else {
            self.conn.execute(DELETE_DAY_OFF, params![n])?;
        }
        Ok(())
    }

    pub fn is_day_off(&self, weekday: Weekday) -> Result<bool> {
        let count: i64 = self.conn.query_row(COUNT_DAY_OFF, params![weekday.num_days_from_monday()], |row| row.get(0))?;
        Ok(count > 0)
    }
}

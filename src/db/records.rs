//! Permanent archive of bookings copied out of the live calendar.

use crate::db::calendar::Booking;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, Result};

const INSERT_RECORD: &str = "INSERT OR IGNORE INTO day_records (date, time, email, archived_at) VALUES (?1, ?2, ?3, ?4)";
const SELECT_BY_DATE: &str = "SELECT date, time, email, archived_at FROM day_records WHERE date = ?1 ORDER BY time";
const SELECT_DATES: &str = "SELECT DISTINCT date FROM day_records ORDER BY date";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub email: String,
    pub archived_at: NaiveDateTime,
}

pub struct Records<'c> {
    conn: &'c Connection,
}

impl<'c> Records<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Copies bookings into the archive. Slots archived earlier are skipped;
    /// the return value counts only newly archived bookings.
    pub fn archive(&self, bookings: &[Booking], at: NaiveDateTime) -> Result<usize> {
        let mut stmt = self.conn.prepare(INSERT_RECORD)?;
        let mut archived = 0;
        for booking in bookings {
            archived += stmt.execute(params![booking.date, booking.time, booking.email, at])?;
        }
        Ok(archived)
    }

    pub fn for_day(&self, date: NaiveDate) -> Result<Vec<DayRecord>> {
        let mut stmt = self.conn.prepare(SELECT_BY_DATE)?;
        let records = stmt
            .query_map(params![date], |row| {
                Ok(DayRecord {
                    date: row.get(0)?,
                    time: row.get(1)?,
                    email: row.get(2)?,
                    archived_at: row.get(3)?,
                })
            })?
            .collect::<Result<Vec<_>>>()?;
        Ok(records)
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(SELECT_DATES)?;
        let dates = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<_>>>()?;
        Ok(dates)
    }
}

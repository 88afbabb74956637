//! Calendar days, their time slots and bookings.
//!
//! A day owns its slots and a slot owns at most one booking; deleting a day
//! cascades to both. Slot transitions are written as conditional updates so
//! that a slot only becomes booked if it was open at that instant.

use crate::libs::formatter::truncate_to_minute;
use crate::libs::slot::{SlotStatus, TimeSlot};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Result, Row};

const INSERT_DAY: &str = "INSERT INTO calendar_days (date) VALUES (?1)";
const DELETE_DAY: &str = "DELETE FROM calendar_days WHERE date = ?1";
const COUNT_DAY: &str = "SELECT COUNT(*) FROM calendar_days WHERE date = ?1";
const SELECT_DATES: &str = "SELECT date FROM calendar_days ORDER BY date";

const INSERT_SLOT: &str = "INSERT INTO time_slots (date, time, status) VALUES (?1, ?2, ?3) ON CONFLICT(date, time) DO NOTHING";
const DELETE_UNBOOKED_SLOTS: &str = "DELETE FROM time_slots WHERE date = ?1 AND status != 'booked'";
const SELECT_SLOTS: &str = "SELECT time, status FROM time_slots WHERE date = ?1 ORDER BY time";
const SELECT_TIMES_BY_STATUS: &str = "SELECT time FROM time_slots WHERE date = ?1 AND status = ?2 ORDER BY time";
const SELECT_SLOT_STATUS: &str = "SELECT status FROM time_slots WHERE date = ?1 AND time = ?2";
const SWAP_SLOT_STATUS: &str = "UPDATE time_slots SET status = ?4 WHERE date = ?1 AND time = ?2 AND status = ?3";

const INSERT_BOOKING: &str = "INSERT INTO bookings (date, time, email) VALUES (?1, ?2, ?3)";
const DELETE_BOOKING: &str = "DELETE FROM bookings WHERE date = ?1 AND time = ?2";
const SELECT_BOOKING_AT: &str = "SELECT id, date, time, email, created_at FROM bookings WHERE date = ?1 AND time = ?2";
const SELECT_BOOKINGS_BY_EMAIL: &str = "SELECT id, date, time, email, created_at FROM bookings WHERE email = ?1 ORDER BY date, time";
const SELECT_BOOKINGS_BY_DATE: &str = "SELECT id, date, time, email, created_at FROM bookings WHERE date = ?1 ORDER BY time";
const SELECT_BOOKINGS_FROM: &str = "
    SELECT id, date, time, email, created_at FROM bookings
    WHERE date > ?1 OR (date = ?1 AND time >= ?2)
    ORDER BY date, time
    LIMIT ?3
";
const SELECT_EMAILS_BY_DATE: &str = "SELECT DISTINCT email FROM bookings WHERE date = ?1 ORDER BY email";

/// A booked slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub email: String,
    pub created_at: Option<NaiveDateTime>,
}

impl Booking {
    fn from_row(row: &Row<'_>) -> Result<Self> {
        Ok(Booking {
            id: row.get(0)?,
            date: row.get(1)?,
            time: row.get(2)?,
            email: row.get(3)?,
            created_at: row.get(4)?,
        })
    }
}

pub struct Calendar<'c> {
    conn: &'c Connection,
}

impl<'c> Calendar<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn add_day(&self, date: NaiveDate) -> Result<()> {
        self.conn.execute(INSERT_DAY, params![date])?;
        Ok(())
    }

    /// Removes the day with its slots and bookings. Returns 0 if it did not exist.
    pub fn delete_day(&self, date: NaiveDate) -> Result<usize> {
        self.conn.execute(DELETE_DAY, params![date])
    }

    pub fn day_exists(&self, date: NaiveDate) -> Result<bool> {
        let count: i64 = self.conn.query_row(COUNT_DAY, params![date], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// All days in ascending order.
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        let mut stmt = self.conn.prepare(SELECT_DATES)?;
        let dates = stmt.query_map([], |row| row.get(0))?.collect::<Result<Vec<_>>>()?;
        Ok(dates)
    }

    /// Inserts slots, leaving any slot that already exists untouched.
    pub fn insert_slots(&self, date: NaiveDate, slots: &[TimeSlot]) -> Result<()> {
        let mut stmt = self.conn.prepare(INSERT_SLOT)?;
        for slot in slots {
            stmt.execute(params![date, truncate_to_minute(slot.time), slot.status])?;
        }
        Ok(())
    }

    /// Replaces every open or break slot of the day; booked slots survive.
    pub fn replace_unbooked_slots(&self, date: NaiveDate, slots: &[TimeSlot]) -> Result<()> {
        self.conn.execute(DELETE_UNBOOKED_SLOTS, params![date])?;
        self.insert_slots(date, slots)
    }

    pub fn slots(&self, date: NaiveDate) -> Result<Vec<TimeSlot>> {
        let mut stmt = self.conn.prepare(SELECT_SLOTS)?;
        let slots = stmt
            .query_map(params![date], |row| Ok(TimeSlot::new(row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>>>()?;
        Ok(slots)
    }

    pub fn times_with_status(&self, date: NaiveDate, status: SlotStatus) -> Result<Vec<NaiveTime>> {
        let mut stmt = self.conn.prepare(SELECT_TIMES_BY_STATUS)?;
        let times = stmt.query_map(params![date, status], |row| row.get(0))?.collect::<Result<Vec<_>>>()?;
        Ok(times)
    }

    pub fn slot_status(&self, date: NaiveDate, time: NaiveTime) -> Result<Option<SlotStatus>> {
        self.conn.query_row(SELECT_SLOT_STATUS, params![date, time], |row| row.get(0)).optional()
    }

    /// Moves a slot from `from` to `to`. Returns 0 when the slot is missing
    /// or not currently in `from`.
    pub fn swap_status(&self, date: NaiveDate, time: NaiveTime, from: SlotStatus, to: SlotStatus) -> Result<usize> {
        self.conn.execute(SWAP_SLOT_STATUS, params![date, time, from, to])
    }

    pub fn insert_booking(&self, date: NaiveDate, time: NaiveTime, email: &str) -> Result<i64> {
        self.conn.execute(INSERT_BOOKING, params![date, time, email])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn delete_booking(&self, date: NaiveDate, time: NaiveTime) -> Result<usize> {
        self.conn.execute(DELETE_BOOKING, params![date, time])
    }

    pub fn booking_at(&self, date: NaiveDate, time: NaiveTime) -> Result<Option<Booking>> {
        self.conn.query_row(SELECT_BOOKING_AT, params![date, time], Booking::from_row).optional()
    }

    pub fn bookings_for_user(&self, email: &str) -> Result<Vec<Booking>> {
        self.query_bookings(SELECT_BOOKINGS_BY_EMAIL, params![email])
    }

    pub fn bookings_for_day(&self, date: NaiveDate) -> Result<Vec<Booking>> {
        self.query_bookings(SELECT_BOOKINGS_BY_DATE, params![date])
    }

    /// Up to `limit` bookings at or after the given day and time.
    pub fn bookings_from(&self, date: NaiveDate, time: NaiveTime, limit: usize) -> Result<Vec<Booking>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        self.query_bookings(SELECT_BOOKINGS_FROM, params![date, time, limit])
    }

    pub fn emails_booked_on(&self, date: NaiveDate) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(SELECT_EMAILS_BY_DATE)?;
        let emails = stmt.query_map(params![date], |row| row.get(0))?.collect::<Result<Vec<_>>>()?;
        Ok(emails)
    }

    fn query_bookings(&self, sql: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<Booking>> {
        let mut stmt = self.conn.prepare(sql)?;
        let bookings = stmt.query_map(params, Booking::from_row)?.collect::<Result<Vec<_>>>()?;
        Ok(bookings)
    }
}

//! Time slot model and the compact slot list encoding.
//!
//! A day's slots can be rewritten in bulk from a string such as
//! `"09:00=open, 12:00=break; 13:00=open"`. Entries are separated by commas or
//! semicolons; only `open` and `break` may be assigned this way, `booked` is
//! reserved for the booking flow.

use crate::libs::error::{CalendarError, CalendarResult};
use crate::libs::formatter::{format_time, parse_time};
use crate::libs::messages::Message;
use chrono::NaiveTime;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Open,
    Break,
    Booked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Open => "open",
            SlotStatus::Break => "break",
            SlotStatus::Booked => "booked",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SlotStatus {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "open" => Ok(SlotStatus::Open),
            "break" => Ok(SlotStatus::Break),
            "booked" => Ok(SlotStatus::Booked),
            _ => Err(CalendarError::Parse(Message::InvalidSlotStatus(s.to_string()).to_string())),
        }
    }
}

impl ToSql for SlotStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SlotStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value.as_str()?.parse().map_err(|e: CalendarError| FromSqlError::Other(Box::new(e)))
    }
}

/// A single time slot of a calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub time: NaiveTime,
    pub status: SlotStatus,
}

impl TimeSlot {
    pub fn new(time: NaiveTime, status: SlotStatus) -> Self {
        Self { time, status }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", format_time(self.time), self.status)
    }
}

/// Decodes a slot list. Duplicate times keep the last entry.
pub fn parse_slot_list(encoded: &str) -> CalendarResult<Vec<TimeSlot>> {
    let mut slots: Vec<TimeSlot> = Vec::new();

    for entry in encoded.split([',', ';']).map(str::trim).filter(|e| !e.is_empty()) {
        let (time, status) = entry
            .split_once('=')
            .ok_or_else(|| CalendarError::Parse(Message::InvalidSlotEntry(entry.to_string()).to_string()))?;
        let time = parse_time(time)?;
        let status: SlotStatus = status.parse()?;
        if status == SlotStatus::Booked {
            return Err(CalendarError::Parse(Message::InvalidSlotStatus(status.to_string()).to_string()));
        }

        slots.retain(|s| s.time != time);
        slots.push(TimeSlot::new(time, status));
    }

    slots.sort_by_key(|s| s.time);
    Ok(slots)
}

/// Encodes slots in the form accepted by [`parse_slot_list`].
pub fn encode_slot_list(slots: &[TimeSlot]) -> String {
    slots.iter().map(ToString::to_string).collect::<Vec<_>>().join(",")
}

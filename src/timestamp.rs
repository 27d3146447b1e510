//! Core Data timestamp normalization and calendar-month periods.
//!
//! The Photos database stores dates as seconds since 2001-01-01 00:00:00 UTC
//! (the Core Data reference date). Values are not always trustworthy: zeros,
//! negatives, overflowed numbers and the occasional text cell all show up in
//! real libraries, so normalization yields `None` instead of failing.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rusqlite::types::{FromSql, FromSqlResult, ValueRef};
use std::fmt;

/// Upper bound for a plausible stored value, roughly 50 years in seconds.
pub const MAX_REFERENCE_SECONDS: f64 = 1_577_836_800.0;

/// The Core Data reference date, 2001-01-01 00:00:00.
pub const REFERENCE_EPOCH: NaiveDateTime = match NaiveDate::from_ymd_opt(2001, 1, 1) {
    Some(date) => match date.and_hms_opt(0, 0, 0) {
        Some(midnight) => midnight,
        None => panic!("midnight is a valid time"),
    },
    None => panic!("2001-01-01 is a valid date"),
};

pub fn reference_epoch() -> NaiveDateTime {
    REFERENCE_EPOCH
}

/// A timestamp cell exactly as SQLite returned it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl RawTimestamp {
    /// Seconds since the reference date, if the cell holds something numeric.
    pub fn as_seconds(&self) -> Option<f64> {
        match self {
            RawTimestamp::Integer(v) => Some(*v as f64),
            RawTimestamp::Real(v) => Some(*v),
            RawTimestamp::Text(s) => s.trim().parse::<f64>().ok(),
            RawTimestamp::Null | RawTimestamp::Blob(_) => None,
        }
    }
}

impl FromSql for RawTimestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        Ok(match value {
            ValueRef::Null => RawTimestamp::Null,
            ValueRef::Integer(v) => RawTimestamp::Integer(v),
            ValueRef::Real(v) => RawTimestamp::Real(v),
            ValueRef::Text(t) => RawTimestamp::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => RawTimestamp::Blob(b.to_vec()),
        })
    }
}

impl fmt::Display for RawTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawTimestamp::Null => write!(f, "NULL"),
            RawTimestamp::Integer(v) => write!(f, "{}", v),
            RawTimestamp::Real(v) => write!(f, "{}", v),
            RawTimestamp::Text(s) => write!(f, "{:?}", s),
            RawTimestamp::Blob(b) => write!(f, "<{} byte blob>", b.len()),
        }
    }
}

/// Convert a stored timestamp to a calendar date-time.
///
/// Returns `None` for null, zero, non-numeric, negative, non-finite and
/// out-of-range values.
pub fn normalize(raw: &RawTimestamp) -> Option<NaiveDateTime> {
    raw.as_seconds().and_then(normalize_seconds)
}

/// Convert seconds since the reference date to a calendar date-time.
pub fn normalize_seconds(seconds: f64) -> Option<NaiveDateTime> {
    if !seconds.is_finite() || seconds <= 0.0 || seconds > MAX_REFERENCE_SECONDS {
        return None;
    }

    let whole = seconds.trunc();
    let nanos = ((seconds - whole) * 1_000_000_000.0).round() as i64;
    let offset = Duration::seconds(whole as i64) + Duration::nanoseconds(nanos);

    reference_epoch().checked_add_signed(offset)
}

/// A calendar month, ordered chronologically and shown as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Truncate a date-time to its calendar month.
    pub fn of(date: &NaiveDateTime) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

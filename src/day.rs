//! Calendar-day helpers.
//!
//! Days are bare `NaiveDate` values with no time zone attached. Callers own
//! the time zone policy; everything here only compares and iterates dates.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};

use crate::error::{Error, Result};

/// Canonical on-disk and on-wire day format.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a `YYYY-MM-DD` day key.
pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    // chrono accepts unpadded fields; day keys are compared as strings elsewhere
    if trimmed.len() != 10 {
        return Err(Error::InvalidDate(raw.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DAY_FORMAT).map_err(|_| Error::InvalidDate(raw.to_string()))
}

/// Calendar day of an instant, read in UTC.
pub fn utc_day(now: DateTime<Utc>) -> NaiveDate {
    now.date_naive()
}

/// `day` minus `n` days, saturating at the earliest representable date.
pub fn days_before(day: NaiveDate, n: u64) -> NaiveDate {
    day.checked_sub_days(Days::new(n)).unwrap_or(NaiveDate::MIN)
}

/// `day` minus `n` calendar months; the day of month is clamped to the end of
/// a shorter target month (Aug 31 minus 6 months is Feb 28/29).
pub fn months_before(day: NaiveDate, n: u32) -> NaiveDate {
    day.checked_sub_months(Months::new(n)).unwrap_or(NaiveDate::MIN)
}

/// The `len` calendar days ending at `end`, oldest first.
pub fn window(end: NaiveDate, len: usize) -> Vec<NaiveDate> {
    if len == 0 {
        return Vec::new();
    }
    let start = days_before(end, (len - 1) as u64);
    start.iter_days().take_while(|day| *day <= end).take(len).collect()
}

/// Inclusive day range used by completion queries. Open ends are unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DayRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DayRange {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn single(day: NaiveDate) -> Self {
        Self::between(day, day)
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start.map_or(true, |start| day >= start) && self.end.map_or(true, |end| day <= end)
    }
}

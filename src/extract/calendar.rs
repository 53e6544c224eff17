//! Epoch-millisecond timestamps to calendar fields

use crate::error::{Error, Result};
use crate::model::TimeRow;
use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDateTime, Offset, Timelike, Utc};

/// How event timestamps become wall-clock `start_time` values
///
/// Events carry epoch milliseconds. The derived `start_time` is the naive
/// wall-clock time at a fixed UTC offset (UTC unless configured otherwise),
/// with millisecond precision kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarPolicy {
    offset: FixedOffset,
}

impl Default for CalendarPolicy {
    fn default() -> Self {
        Self::utc()
    }
}

impl CalendarPolicy {
    /// Wall-clock time in UTC
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Wall-clock time at a fixed offset east of UTC
    pub fn with_offset_secs(secs: i32) -> Result<Self> {
        let offset = FixedOffset::east_opt(secs).ok_or_else(|| {
            Error::invalid_value(
                "utc_offset_secs",
                format!("{secs} is outside the range of a UTC offset (±86399)"),
            )
        })?;
        Ok(Self { offset })
    }

    /// Offset east of UTC in seconds
    pub fn offset_secs(&self) -> i32 {
        self.offset.local_minus_utc()
    }

    /// Convert epoch milliseconds to a naive `start_time`
    pub fn start_time(&self, millis: i64) -> Result<NaiveDateTime> {
        DateTime::<Utc>::from_timestamp_millis(millis)
            .map(|utc| utc.naive_utc())
            .and_then(|naive| {
                naive.checked_add_signed(Duration::seconds(i64::from(self.offset_secs())))
            })
            .ok_or_else(|| {
                Error::malformed("ts", format!("{millis} is outside the supported date range"))
            })
    }

    /// Decompose a `start_time` into its time-table row
    ///
    /// `week` is the ISO-8601 week number. `weekday` counts 1 = Sunday
    /// through 7 = Saturday.
    pub fn time_row(&self, start_time: NaiveDateTime) -> TimeRow {
        TimeRow {
            start_time,
            hour: start_time.hour() as i32,
            day: start_time.day() as i32,
            week: start_time.iso_week().week() as i32,
            month: start_time.month() as i32,
            year: start_time.year(),
            weekday: start_time.weekday().number_from_sunday() as i32,
        }
    }
}

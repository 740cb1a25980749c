//! Timestamp value object for immutable points in time.

use chrono::{DateTime, Duration, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Immutable point in time, always UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a timestamp for the current moment.
    pub fn now() -> Self {
        Self(Utc::now())
    }

    /// Creates a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the inner DateTime.
    pub fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Checks if this timestamp is before another.
    pub fn is_before(&self, other: &Timestamp) -> bool {
        self.0 < other.0
    }

    /// Checks if this timestamp is after another.
    pub fn is_after(&self, other: &Timestamp) -> bool {
        self.0 > other.0
    }

    /// Returns the duration from another timestamp to this one.
    ///
    /// Returns negative duration if other is after self.
    pub fn duration_since(&self, other: &Timestamp) -> Duration {
        self.0.signed_duration_since(other.0)
    }

    /// Creates a new timestamp by adding the specified number of seconds.
    pub fn plus_secs(&self, secs: i64) -> Self {
        Self(self.0 + Duration::seconds(secs))
    }

    /// Creates a new timestamp by subtracting the specified number of seconds.
    pub fn minus_secs(&self, secs: i64) -> Self {
        Self(self.0 - Duration::seconds(secs))
    }

    /// Creates a new timestamp offset by a std duration.
    pub fn plus(&self, duration: std::time::Duration) -> Self {
        Self(self.0 + Duration::from_std(duration).unwrap_or_else(|_| Duration::zero()))
    }

    /// Returns the last second (23:59:59) of the calendar day this
    /// timestamp falls on in `tz`.
    pub fn end_of_day_in(&self, tz: Tz) -> Self {
        let local_date = self.0.with_timezone(&tz).date_naive();
        let Some(naive) = local_date.and_hms_opt(23, 59, 59) else {
            return *self;
        };

        match tz.from_local_datetime(&naive).latest() {
            Some(dt) => Self(dt.with_timezone(&Utc)),
            // Local gap at 23:59:59; fall back to the naive wall clock as UTC.
            None => Self(naive.and_utc()),
        }
    }

    /// Returns the hour of day (0-23) in `tz`.
    pub fn hour_in(&self, tz: Tz) -> u32 {
        self.0.with_timezone(&tz).hour()
    }

    /// Creates a timestamp from Unix seconds.
    pub fn from_unix_secs(secs: i64) -> Self {
        Self(Utc.timestamp_opt(secs, 0).single().unwrap_or_default())
    }

    /// Returns the timestamp as Unix seconds.
    pub fn as_unix_secs(&self) -> i64 {
        self.0.timestamp()
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

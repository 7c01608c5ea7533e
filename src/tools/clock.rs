//! Time source for the date tools

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Source of the current local time
pub trait Clock: Send + Sync {
    /// The current local date and time
    fn now(&self) -> NaiveDateTime;

    /// Today at midnight
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// Wall clock in the local system timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Clock frozen at a single instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    now: NaiveDateTime,
}

impl FixedClock {
    /// Freeze the clock at `now`
    pub fn new(now: NaiveDateTime) -> Self {
        Self { now }
    }

    /// Freeze the clock at noon on the given date
    ///
    /// Returns `None` for an invalid calendar date.
    pub fn on(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .map(Self::new)
    }

    /// Freeze the clock at a timezone-aware instant, keeping its local time
    pub fn from_datetime<Tz: TimeZone>(instant: &DateTime<Tz>) -> Self {
        Self::new(instant.naive_local())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.now
    }
}

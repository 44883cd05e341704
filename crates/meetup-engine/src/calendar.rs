//! Injected clock and calendar.
//!
//! Nothing in the engine reads the wall clock or the host's local timezone
//! directly. Deadline checks take a [`Clock`], day arithmetic takes a
//! [`Calendar`], so both can be pinned in tests.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::{MeetupError, Result};
use crate::slot::TimeSlot;

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Calendar-day arithmetic in one IANA timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    tz: Tz,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn utc() -> Self {
        Self { tz: Tz::UTC }
    }

    /// Build a calendar from an IANA name such as `"America/New_York"`.
    ///
    /// # Errors
    /// Returns `MeetupError::InvalidTimezone` for an unknown name.
    pub fn from_name(name: &str) -> Result<Self> {
        let tz: Tz = name
            .parse()
            .map_err(|_| MeetupError::InvalidTimezone(name.to_string()))?;
        Ok(Self { tz })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// The local calendar date an instant falls on.
    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        instant.with_timezone(&self.tz).date_naive()
    }

    /// First instant of a local date.
    ///
    /// When local midnight falls in a DST gap the day starts at the first
    /// valid local time after it; when it is ambiguous the earlier instant wins.
    pub fn day_start(&self, date: NaiveDate) -> DateTime<Utc> {
        let midnight = date.and_time(NaiveTime::MIN);
        (0..=12)
            .map(|step| midnight + Duration::minutes(15 * step))
            .find_map(|local| self.tz.from_local_datetime(&local).earliest())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| midnight.and_utc())
    }

    /// Start of the local day containing `instant`.
    pub fn start_of_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        self.day_start(self.local_date(instant))
    }

    /// Start of the local day after the one containing `instant`.
    ///
    /// On the last representable date this saturates at
    /// `DateTime::<Utc>::MAX_UTC`.
    pub fn next_day(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        match self.local_date(instant).succ_opt() {
            Some(next) => self.day_start(next),
            None => self
                .start_of_day(instant)
                .checked_add_signed(Duration::days(1))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    /// The whole local day containing `instant`, as `[midnight, next midnight)`.
    pub fn day_slot(&self, instant: DateTime<Utc>) -> TimeSlot {
        TimeSlot {
            start: self.start_of_day(instant),
            end: self.next_day(instant),
        }
    }

    /// Start-of-day instants for every local day from the day of `start` to
    /// the day of `end`, both inclusive. Empty when `end < start`.
    pub fn days_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<DateTime<Utc>> {
        if end < start {
            return Vec::new();
        }
        let last = self.local_date(end);
        self.local_date(start)
            .iter_days()
            .take_while(|date| *date <= last)
            .map(|date| self.day_start(date))
            .collect()
    }
}

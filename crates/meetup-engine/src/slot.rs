//! Half-open time intervals.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::codec::reference_date;
use crate::error::{MeetupError, Result};

/// A half-open interval `[start, end)`.
///
/// Ordering is by `start`, then `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeSlot {
    #[serde(with = "reference_date")]
    pub start: DateTime<Utc>,
    #[serde(with = "reference_date")]
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    /// Build a slot, rejecting empty or inverted intervals.
    ///
    /// # Errors
    /// Returns `MeetupError::MalformedInterval` when `start >= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        let slot = Self { start, end };
        slot.validate()?;
        Ok(slot)
    }

    /// Re-check the interval invariant on a slot built from raw fields
    /// (for example one decoded from an encoded record).
    pub fn validate(&self) -> Result<()> {
        if self.start < self.end {
            Ok(())
        } else {
            Err(MeetupError::MalformedInterval {
                start: self.start.to_rfc3339(),
                end: self.end.to_rfc3339(),
            })
        }
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// The overlap of two slots, or `None` when they share no time.
    ///
    /// Adjacent slots (one ends exactly when the other starts) do not overlap.
    pub fn intersect(&self, other: &TimeSlot) -> Option<TimeSlot> {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        (start < end).then_some(TimeSlot { start, end })
    }

    /// True when `other` lies entirely within this slot.
    pub fn contains(&self, other: &TimeSlot) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}


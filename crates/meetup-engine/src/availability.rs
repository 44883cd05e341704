//! Per-participant availability responses.
//!
//! A [`UserAvailability`] is what one participant submits: the intervals they
//! can make and, for display only, the intervals they cannot. For full-day
//! meetups the same response is viewed through [`UserAvailability::available_days`],
//! which collapses it to a set of calendar days.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::calendar::Calendar;
use crate::codec::reference_date;
use crate::error::Result;
use crate::slot::TimeSlot;

/// One participant's response to a meetup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAvailability {
    /// Opaque, host-provided participant id. Identity key within a meetup.
    pub user_id: String,
    pub user_name: String,
    /// Intervals the participant can attend.
    pub available_slots: Vec<TimeSlot>,
    /// Intervals the participant marked as unavailable. Never read by the
    /// intersection engine.
    pub busy_slots: Vec<TimeSlot>,
    #[serde(with = "reference_date")]
    pub response_date: DateTime<Utc>,
}

impl UserAvailability {
    /// Build a full-day response from picked calendar days.
    ///
    /// Each day becomes one slot spanning its local midnight to the next
    /// local midnight. Instants anywhere inside a day select that day.
    pub fn from_days(
        user_id: impl Into<String>,
        user_name: impl Into<String>,
        available_days: &[DateTime<Utc>],
        unavailable_days: &[DateTime<Utc>],
        response_date: DateTime<Utc>,
        calendar: &Calendar,
    ) -> Self {
        let to_slots = |days: &[DateTime<Utc>]| -> Vec<TimeSlot> {
            days.iter().map(|day| calendar.day_slot(*day)).collect()
        };
        Self {
            user_id: user_id.into(),
            user_name: user_name.into(),
            available_slots: to_slots(available_days),
            busy_slots: to_slots(unavailable_days),
            response_date,
        }
    }

    /// Start-of-day instants of every day on which an available slot starts.
    ///
    /// Only each slot's start is considered; two slots starting on the same
    /// local day collapse into one entry.
    pub fn available_days(&self, calendar: &Calendar) -> BTreeSet<DateTime<Utc>> {
        self.available_slots
            .iter()
            .map(|slot| calendar.start_of_day(slot.start))
            .collect()
    }

    pub fn has_availability(&self) -> bool {
        !self.available_slots.is_empty()
    }

    /// Check every available and busy slot for `start < end`.
    ///
    /// # Errors
    /// Returns `MeetupError::MalformedInterval` for the first bad slot.
    pub fn validate(&self) -> Result<()> {
        self.available_slots
            .iter()
            .chain(self.busy_slots.iter())
            .try_for_each(TimeSlot::validate)
    }
}

//! Common availability across participants.
//!
//! Two independent algorithms, chosen by the meetup kind:
//!
//! - [`common_days`] for full-day meetups: set intersection of each
//!   participant's available days.
//! - [`common_slots`] for timed meetups: pairwise interval intersection folded
//!   across participants, then filtered by the minimum meeting length.
//!
//! Both require at least two responses. A single participant has no one to
//! agree with, so the result is empty.

use std::collections::BTreeSet;

use chrono::{DateTime, Duration, Utc};

use crate::availability::UserAvailability;
use crate::calendar::Calendar;
use crate::slot::TimeSlot;

/// Minimum number of responses before any common availability is reported.
pub const MIN_RESPONSES: usize = 2;

/// Output of the intersection engine for one meetup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommonAvailability {
    /// Start-of-day instants every participant can make, ascending.
    Days(Vec<DateTime<Utc>>),
    /// Intervals every participant can make, ordered by start.
    Slots(Vec<TimeSlot>),
}

impl CommonAvailability {
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Days(days) => days.len(),
            Self::Slots(slots) => slots.len(),
        }
    }

    /// The finalize candidates as slots. A common day becomes the slot
    /// `[day, next local midnight)`.
    pub fn candidates(&self, calendar: &Calendar) -> Vec<TimeSlot> {
        match self {
            Self::Days(days) => days.iter().map(|day| calendar.day_slot(*day)).collect(),
            Self::Slots(slots) => slots.clone(),
        }
    }

    pub fn contains(&self, slot: &TimeSlot, calendar: &Calendar) -> bool {
        match self {
            Self::Days(days) => days.iter().any(|day| calendar.day_slot(*day) == *slot),
            Self::Slots(slots) => slots.contains(slot),
        }
    }
}

/// Days on which every participant is available, sorted ascending.
///
/// The result does not depend on the order of `responses`.
pub fn common_days(responses: &[UserAvailability], calendar: &Calendar) -> Vec<DateTime<Utc>> {
    if responses.len() < MIN_RESPONSES {
        return Vec::new();
    }

    let mut sets = responses.iter().map(|r| r.available_days(calendar));
    let Some(first) = sets.next() else {
        return Vec::new();
    };
    let common: BTreeSet<DateTime<Utc>> =
        sets.fold(first, |acc, days| acc.intersection(&days).copied().collect());

    tracing::trace!(
        responses = responses.len(),
        common = common.len(),
        "computed common days"
    );

    // BTreeSet iterates in ascending order.
    common.into_iter().collect()
}

/// Intervals every participant is available for at least `min_duration`.
///
/// Returns an empty list when fewer than two participants responded or when
/// `min_duration` is `None`.
pub fn common_slots(
    responses: &[UserAvailability],
    min_duration: Option<Duration>,
) -> Vec<TimeSlot> {
    let Some(min_duration) = min_duration else {
        return Vec::new();
    };
    if responses.len() < MIN_RESPONSES {
        return Vec::new();
    }

    let mut candidates = responses[0].available_slots.clone();
    for response in &responses[1..] {
        candidates = intersect_slots(&candidates, &response.available_slots);
        if candidates.is_empty() {
            break;
        }
    }

    let mut common: Vec<TimeSlot> = candidates
        .into_iter()
        .filter(|slot| slot.duration() >= min_duration)
        .collect();
    common.sort();

    tracing::trace!(
        responses = responses.len(),
        min_minutes = min_duration.num_minutes(),
        common = common.len(),
        "computed common slots"
    );

    common
}

/// Every strictly positive overlap between a slot of `a` and a slot of `b`.
///
/// The output has one entry per overlapping pair, in `a`-major order.
/// Touching slots produce nothing.
pub fn intersect_slots(a: &[TimeSlot], b: &[TimeSlot]) -> Vec<TimeSlot> {
    let mut overlaps = Vec::new();

    for slot_a in a {
        for slot_b in b {
            if let Some(overlap) = slot_a.intersect(slot_b) {
                overlaps.push(overlap);
            }
        }
    }

    overlaps
}

//! The meetup aggregate.
//!
//! A [`Meetup`] owns its fixed parameters (kind, date range, duration,
//! deadline), the collection of participant responses, and the terminal
//! finalize state. All reads and writes go through its methods:
//!
//! - [`Meetup::submit_availability`] — last-write-wins by `user_id`
//! - [`Meetup::common_availability`] — runs the intersection engine
//! - [`Meetup::finalize`] — the single transition into the terminal state

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::availability::UserAvailability;
use crate::calendar::{Calendar, Clock};
use crate::codec::{reference_date, seconds, uuid_upper};
use crate::error::{MeetupError, Result};
use crate::intersection::{self, CommonAvailability};
use crate::lifecycle::{MeetupStatus, SubmissionPolicy};
use crate::slot::TimeSlot;

/// What kind of meetup is being scheduled.
///
/// Only [`MeetupKind::Trip`] is full-day; every other kind uses timed slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetupKind {
    Trip,
    Hangout,
    Date,
    Meeting,
    Event,
}

impl MeetupKind {
    pub const ALL: [MeetupKind; 5] = [
        MeetupKind::Trip,
        MeetupKind::Hangout,
        MeetupKind::Date,
        MeetupKind::Meeting,
        MeetupKind::Event,
    ];

    /// Whether availability is tracked per calendar day instead of per time slot.
    pub fn is_full_day(&self) -> bool {
        matches!(self, MeetupKind::Trip)
    }

    pub fn label(&self) -> &'static str {
        match self {
            MeetupKind::Trip => "Trip",
            MeetupKind::Hangout => "Hangout",
            MeetupKind::Date => "Date",
            MeetupKind::Meeting => "Meeting",
            MeetupKind::Event => "Event",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            MeetupKind::Trip => "✈️",
            MeetupKind::Hangout => "🎉",
            MeetupKind::Date => "💕",
            MeetupKind::Meeting => "💼",
            MeetupKind::Event => "📅",
        }
    }
}

/// Meeting lengths offered when creating a timed meetup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationPreset {
    ThirtyMinutes,
    #[default]
    OneHour,
    TwoHours,
    ThreeHours,
    /// A custom length in minutes.
    Custom(u32),
}

impl DurationPreset {
    pub fn duration(&self) -> Duration {
        match self {
            DurationPreset::ThirtyMinutes => Duration::minutes(30),
            DurationPreset::OneHour => Duration::hours(1),
            DurationPreset::TwoHours => Duration::hours(2),
            DurationPreset::ThreeHours => Duration::hours(3),
            DurationPreset::Custom(minutes) => Duration::minutes(i64::from(*minutes)),
        }
    }

    /// The duration a meetup of `kind` should carry: `None` for full-day kinds.
    pub fn for_kind(&self, kind: MeetupKind) -> Option<Duration> {
        (!kind.is_full_day()).then(|| self.duration())
    }
}

/// Parameters an organizer supplies when creating a meetup.
///
/// Identifiers are generated by the host and passed through unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMeetup {
    pub id: Uuid,
    pub title: String,
    pub kind: MeetupKind,
    pub creator_id: String,
    pub creator_name: String,
    pub start_date_range: DateTime<Utc>,
    pub end_date_range: DateTime<Utc>,
    pub duration: Option<Duration>,
    pub deadline: DateTime<Utc>,
}

/// Outcome of a successful submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// First response from this participant.
    Inserted,
    /// The participant's previous response was discarded.
    Replaced,
}

/// A meetup and every response collected for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meetup {
    #[serde(with = "uuid_upper")]
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: MeetupKind,
    pub creator_id: String,
    pub creator_name: String,
    #[serde(with = "reference_date")]
    pub created_date: DateTime<Utc>,
    #[serde(with = "reference_date")]
    pub start_date_range: DateTime<Utc>,
    #[serde(with = "reference_date")]
    pub end_date_range: DateTime<Utc>,
    /// Minimum meeting length. `None` exactly when the kind is full-day.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "seconds::option")]
    pub duration: Option<Duration>,
    #[serde(with = "reference_date")]
    pub deadline: DateTime<Utc>,
    /// Unique by `user_id`, in submission order.
    #[serde(default)]
    availabilities: Vec<UserAvailability>,
    #[serde(default)]
    is_finalized: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    finalized_time_slot: Option<TimeSlot>,
}

impl Meetup {
    /// Create an open meetup with no responses.
    ///
    /// # Errors
    /// - `InvalidDateRange` if the range does not end after it starts
    /// - `DeadlineInPast` if the deadline is not after `clock.now()`
    /// - `DurationMismatch` if the duration does not fit the kind
    pub fn create(new: NewMeetup, clock: &impl Clock) -> Result<Self> {
        let now = clock.now();
        let meetup = Self {
            id: new.id,
            title: new.title,
            kind: new.kind,
            creator_id: new.creator_id,
            creator_name: new.creator_name,
            created_date: now,
            start_date_range: new.start_date_range,
            end_date_range: new.end_date_range,
            duration: new.duration,
            deadline: new.deadline,
            availabilities: Vec::new(),
            is_finalized: false,
            finalized_time_slot: None,
        };
        meetup.validate()?;
        if meetup.deadline <= now {
            return Err(MeetupError::DeadlineInPast);
        }

        tracing::debug!(id = %meetup.id, kind = meetup.kind.label(), "created meetup");
        Ok(meetup)
    }

    /// Check the structural invariants of a record, e.g. one just decoded.
    pub fn validate(&self) -> Result<()> {
        if self.start_date_range >= self.end_date_range {
            return Err(MeetupError::InvalidDateRange);
        }

        match (self.kind.is_full_day(), self.duration) {
            (true, Some(_)) => {
                return Err(MeetupError::DurationMismatch(format!(
                    "{} meetups are full-day and take no duration",
                    self.kind.label()
                )))
            }
            (false, None) => {
                return Err(MeetupError::DurationMismatch(format!(
                    "{} meetups require a duration",
                    self.kind.label()
                )))
            }
            (false, Some(d)) if d <= Duration::zero() => {
                return Err(MeetupError::DurationMismatch(
                    "duration must be positive".to_string(),
                ))
            }
            _ => {}
        }

        if self.is_finalized != self.finalized_time_slot.is_some() {
            return Err(MeetupError::InconsistentRecord(
                "isFinalized and finalizedTimeSlot disagree".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for availability in &self.availabilities {
            if !seen.insert(availability.user_id.as_str()) {
                return Err(MeetupError::InconsistentRecord(format!(
                    "duplicate response from user {}",
                    availability.user_id
                )));
            }
            availability.validate()?;
        }
        Ok(())
    }

    pub fn status(&self, clock: &impl Clock) -> MeetupStatus {
        MeetupStatus::at(self.is_finalized, self.deadline, clock.now())
    }

    /// Not finalized and the deadline has not passed.
    pub fn is_active(&self, clock: &impl Clock) -> bool {
        self.status(clock).is_active()
    }

    /// Status line in the calendar's timezone.
    pub fn status_line(&self, clock: &impl Clock, calendar: &Calendar) -> String {
        self.status(clock)
            .describe(self.deadline, self.finalized_time_slot.as_ref(), calendar)
    }

    pub fn availabilities(&self) -> &[UserAvailability] {
        &self.availabilities
    }

    pub fn participant(&self, user_id: &str) -> Option<&UserAvailability> {
        self.availabilities.iter().find(|a| a.user_id == user_id)
    }

    pub fn participant_count(&self) -> usize {
        self.availabilities.len()
    }

    pub fn is_finalized(&self) -> bool {
        self.is_finalized
    }

    pub fn finalized_time_slot(&self) -> Option<&TimeSlot> {
        self.finalized_time_slot.as_ref()
    }

    /// Record a participant's response, replacing any earlier one from the
    /// same `user_id`. The replacement moves to the end of the list.
    ///
    /// # Errors
    /// - `MalformedInterval` if any slot has `start >= end`
    /// - `NoAvailability` if no slot is marked available
    /// - `AlreadyFinalized` if the meetup is finalized
    /// - `DeadlinePassed` if the deadline passed and `policy` rejects late responses
    pub fn submit_availability(
        &mut self,
        availability: UserAvailability,
        clock: &impl Clock,
        policy: SubmissionPolicy,
    ) -> Result<Submission> {
        availability.validate()?;
        if !availability.has_availability() {
            return Err(MeetupError::NoAvailability);
        }
        policy.check(self.status(clock), self.deadline)?;

        let before = self.availabilities.len();
        self.availabilities
            .retain(|existing| existing.user_id != availability.user_id);
        let outcome = if self.availabilities.len() < before {
            Submission::Replaced
        } else {
            Submission::Inserted
        };

        tracing::debug!(
            id = %self.id,
            user_id = %availability.user_id,
            slots = availability.available_slots.len(),
            ?outcome,
            "recorded availability"
        );

        self.availabilities.push(availability);
        Ok(outcome)
    }

    /// Run the intersection engine on the current responses.
    pub fn common_availability(&self, calendar: &Calendar) -> CommonAvailability {
        if self.kind.is_full_day() {
            CommonAvailability::Days(intersection::common_days(&self.availabilities, calendar))
        } else {
            CommonAvailability::Slots(intersection::common_slots(
                &self.availabilities,
                self.duration,
            ))
        }
    }

    /// Fix the meetup to `slot`. Allowed once, from Active or Expired.
    ///
    /// `slot` must be one of the current candidates: a common slot for timed
    /// meetups, or a whole common day (`[midnight, next midnight)` in
    /// `calendar`) for full-day ones.
    ///
    /// # Errors
    /// - `AlreadyFinalized` if the meetup is already finalized
    /// - `NoCommonAvailability` if there are no candidates
    /// - `SlotNotInCandidateSet` if `slot` is not a candidate
    pub fn finalize(&mut self, slot: TimeSlot, calendar: &Calendar) -> Result<()> {
        if self.is_finalized {
            return Err(MeetupError::AlreadyFinalized);
        }

        let common = self.common_availability(calendar);
        if common.is_empty() {
            return Err(MeetupError::NoCommonAvailability);
        }
        if !common.contains(&slot, calendar) {
            return Err(MeetupError::SlotNotInCandidateSet {
                start: slot.start.to_rfc3339(),
                end: slot.end.to_rfc3339(),
            });
        }

        self.is_finalized = true;
        self.finalized_time_slot = Some(slot);

        tracing::debug!(
            id = %self.id,
            start = %slot.start,
            end = %slot.end,
            "finalized meetup"
        );
        Ok(())
    }

    /// Finalize a full-day meetup to the local day containing `day`.
    pub fn finalize_day(&mut self, day: DateTime<Utc>, calendar: &Calendar) -> Result<()> {
        self.finalize(calendar.day_slot(day), calendar)
    }
}

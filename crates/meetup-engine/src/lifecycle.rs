//! Meetup lifecycle states and the submission policy.
//!
//! ```text
//!   Active ──(clock passes deadline)──► Expired
//!     │                                   │
//!     └───────────finalize(slot)──────────┴──► Finalized (terminal)
//! ```
//!
//! Expiry is derived from the clock on every read; no state changes when the
//! deadline passes.

use chrono::{DateTime, Utc};

use crate::calendar::Calendar;
use crate::error::{MeetupError, Result};
use crate::slot::TimeSlot;

const DISPLAY_FORMAT: &str = "%b %-d, %Y at %-I:%M %p";

/// Where a meetup is in its lifecycle at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeetupStatus {
    /// Not finalized and the deadline has not passed.
    Active,
    /// Not finalized and the deadline has passed.
    Expired,
    /// A slot was chosen. Terminal.
    Finalized,
}

impl MeetupStatus {
    pub fn at(is_finalized: bool, deadline: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        if is_finalized {
            Self::Finalized
        } else if now < deadline {
            Self::Active
        } else {
            Self::Expired
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    /// Finalize is allowed from every non-terminal state.
    pub fn can_finalize(&self) -> bool {
        !matches!(self, Self::Finalized)
    }

    /// One-line status for display, with instants shown in `calendar`'s zone.
    pub fn describe(
        &self,
        deadline: DateTime<Utc>,
        finalized: Option<&TimeSlot>,
        calendar: &Calendar,
    ) -> String {
        let fmt = |instant: DateTime<Utc>| {
            instant
                .with_timezone(&calendar.timezone())
                .format(DISPLAY_FORMAT)
                .to_string()
        };
        match (self, finalized) {
            (Self::Finalized, Some(slot)) => format!("Finalized for {}", fmt(slot.start)),
            (Self::Finalized, None) => "Finalized".to_string(),
            (Self::Active, _) => format!("Responses due {}", fmt(deadline)),
            (Self::Expired, _) => "Response period ended".to_string(),
        }
    }
}

/// Rules for accepting availability submissions.
///
/// Submissions to a finalized meetup are always rejected; late submissions
/// (after the deadline, before finalization) are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionPolicy {
    /// Accept responses after the deadline has passed.
    pub accept_late: bool,
}

impl Default for SubmissionPolicy {
    fn default() -> Self {
        Self { accept_late: true }
    }
}

impl SubmissionPolicy {
    /// Rejects any late submission.
    pub fn strict() -> Self {
        Self { accept_late: false }
    }

    /// Decide whether a submission may be applied in `status`.
    ///
    /// # Errors
    /// `AlreadyFinalized` for a finalized meetup, `DeadlinePassed` for an
    /// expired one when late submissions are disabled.
    pub fn check(&self, status: MeetupStatus, deadline: DateTime<Utc>) -> Result<()> {
        match status {
            MeetupStatus::Active => Ok(()),
            MeetupStatus::Expired if self.accept_late => Ok(()),
            MeetupStatus::Expired => Err(MeetupError::DeadlinePassed(deadline.to_rfc3339())),
            MeetupStatus::Finalized => Err(MeetupError::AlreadyFinalized),
        }
    }
}

//! Error types for meetup-engine operations.

use thiserror::Error;

/// Errors reported by the aggregate, the calendar, and the codec.
///
/// Every variant is a local, recoverable condition. Retrying the same call
/// with the same input yields the same error.
#[derive(Error, Debug)]
pub enum MeetupError {
    /// Finalize was requested while the engine has no common availability.
    #[error("No common availability among participants")]
    NoCommonAvailability,

    /// The chosen slot is not one of the current candidates.
    #[error("Slot {start} - {end} is not a common candidate")]
    SlotNotInCandidateSet { start: String, end: String },

    /// The meetup has already been finalized.
    #[error("Meetup is already finalized")]
    AlreadyFinalized,

    /// A time slot whose start is not strictly before its end.
    #[error("Malformed interval: start {start} is not before end {end}")]
    MalformedInterval { start: String, end: String },

    /// A response marks no available slot.
    #[error("No availability: at least one slot must be marked available")]
    NoAvailability,

    /// A submission arrived after the deadline while late responses are disabled.
    #[error("Response deadline {0} has passed")]
    DeadlinePassed(String),

    /// The meetup date range does not end after it starts.
    #[error("Invalid date range: end date must be after start date")]
    InvalidDateRange,

    /// The response deadline is not in the future at creation time.
    #[error("Invalid deadline: deadline must be in the future")]
    DeadlineInPast,

    /// A duration was given for a full-day meetup, or missing for a timed one.
    #[error("Duration mismatch: {0}")]
    DurationMismatch(String),

    /// A decoded record violates an aggregate invariant.
    #[error("Inconsistent meetup record: {0}")]
    InconsistentRecord(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// The encoded record could not be read or written.
    #[error("Codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MeetupError>;

//! # meetup-engine
//!
//! Availability intersection and lifecycle engine for group meetup scheduling.
//!
//! Participants each report when they are free; the engine computes the days
//! or time windows that work for everyone and governs the single transition
//! from an open meetup to a finalized one. Everything is synchronous and
//! deterministic: the wall clock and the calendar timezone are injected.
//!
//! ## Modules
//!
//! - [`slot`] — `TimeSlot`, a half-open interval
//! - [`availability`] — one participant's response and its day projection
//! - [`calendar`] — injected `Clock` and `Calendar` (IANA timezone)
//! - [`intersection`] — common days / common timed slots across participants
//! - [`lifecycle`] — `MeetupStatus` and the submission policy
//! - [`meetup`] — the `Meetup` aggregate
//! - [`codec`] — interoperable JSON encoding and message links
//! - [`error`] — Error types

pub mod availability;
pub mod calendar;
pub mod codec;
pub mod error;
pub mod intersection;
pub mod lifecycle;
pub mod meetup;
pub mod slot;

pub use availability::UserAvailability;
pub use calendar::{Calendar, Clock, FixedClock, SystemClock};
pub use error::MeetupError;
pub use intersection::{common_days, common_slots, CommonAvailability};
pub use lifecycle::{MeetupStatus, SubmissionPolicy};
pub use meetup::{DurationPreset, Meetup, MeetupKind, NewMeetup, Submission};
pub use slot::TimeSlot;

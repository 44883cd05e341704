//! Structured encoding of meetup records.
//!
//! Records travel between hosts as JSON with the field names and value
//! encodings used by existing payloads:
//!
//! - instants are floating-point seconds since 2001-01-01T00:00:00Z
//!   (the Apple reference date)
//! - durations are floating-point seconds
//! - ids are upper-case hyphenated UUIDs
//! - absent optionals are omitted, and both a missing key and `null` decode
//!   as `None`
//!
//! The module also builds the message link (`meetup://<UUID>`) and the short
//! texts a host shows next to an encoded record.

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;
use crate::meetup::Meetup;

/// Scheme prefix of the link that identifies a meetup inside a message.
pub const LINK_SCHEME: &str = "meetup://";

/// Encode any record (a `Meetup`, a `UserAvailability`, ...) as compact JSON.
pub fn encode<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// Encode a record as indented JSON.
pub fn encode_pretty<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Decode a record from JSON.
///
/// # Errors
/// Returns `MeetupError::Codec` when the input is not valid JSON or does not
/// match the record's shape.
pub fn decode<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Build the `meetup://<UUID>` link for a meetup id.
pub fn meetup_link(id: Uuid) -> String {
    let mut buf = Uuid::encode_buffer();
    format!("{}{}", LINK_SCHEME, id.as_hyphenated().encode_upper(&mut buf))
}

/// Extract the meetup id from a `meetup://<UUID>` link.
///
/// Returns `None` for any other scheme or a malformed UUID.
pub fn parse_meetup_link(link: &str) -> Option<Uuid> {
    link.strip_prefix(LINK_SCHEME)
        .and_then(|rest| Uuid::parse_str(rest).ok())
}

/// Message caption: the kind's icon followed by the title.
pub fn caption(meetup: &Meetup) -> String {
    format!("{} {}", meetup.kind.icon(), meetup.title)
}

/// Message summary, e.g. "Alice created a hangout meetup".
pub fn summary_text(meetup: &Meetup) -> String {
    format!(
        "{} created a {} meetup",
        meetup.creator_name,
        meetup.kind.label().to_lowercase()
    )
}

/// Serde adapter: `DateTime<Utc>` as seconds since the Apple reference date.
///
/// Instants are carried at millisecond precision: encoding truncates to the
/// millisecond and decoding rounds to the nearest one. An `f64` resolves a
/// millisecond across the whole `DateTime<Utc>` range, so every
/// millisecond-granular instant round-trips exactly.
pub mod reference_date {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    /// Unix timestamp of 2001-01-01T00:00:00Z.
    pub const REFERENCE_UNIX_SECONDS: i64 = 978_307_200;

    const MILLIS_PER_SECOND: i64 = 1_000;
    const NANOS_PER_MILLI: u32 = 1_000_000;

    pub fn to_seconds(instant: &DateTime<Utc>) -> f64 {
        let whole = instant.timestamp() - REFERENCE_UNIX_SECONDS;
        whole as f64 + f64::from(instant.timestamp_subsec_millis()) / 1e3
    }

    /// Inverse of [`to_seconds`], rounded to the nearest millisecond.
    /// Returns `None` for non-finite or out-of-range input.
    pub fn from_seconds(seconds: f64) -> Option<DateTime<Utc>> {
        if !seconds.is_finite() {
            return None;
        }
        let floor = seconds.floor();
        if floor.abs() > i64::MAX as f64 {
            return None;
        }
        let mut whole = floor as i64;
        let mut millis = ((seconds - floor) * 1e3).round() as i64;
        if millis >= MILLIS_PER_SECOND {
            whole += 1;
            millis -= MILLIS_PER_SECOND;
        }
        let unix = whole.checked_add(REFERENCE_UNIX_SECONDS)?;
        DateTime::from_timestamp(unix, millis as u32 * NANOS_PER_MILLI)
    }

    pub fn serialize<S: Serializer>(
        instant: &DateTime<Utc>,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_seconds(instant))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<DateTime<Utc>, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        from_seconds(seconds)
            .ok_or_else(|| de::Error::custom(format!("instant out of range: {}", seconds)))
    }
}

/// Serde adapter: `chrono::Duration` as floating-point seconds.
pub mod seconds {
    use chrono::Duration;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn to_seconds(duration: &Duration) -> f64 {
        duration.num_milliseconds() as f64 / 1000.0
    }

    pub fn from_seconds(seconds: f64) -> Option<Duration> {
        if !seconds.is_finite() {
            return None;
        }
        let millis = (seconds * 1000.0).round();
        if millis.abs() > i64::MAX as f64 {
            return None;
        }
        Duration::try_milliseconds(millis as i64)
    }

    pub fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_f64(to_seconds(duration))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Duration, D::Error> {
        let seconds = f64::deserialize(deserializer)?;
        from_seconds(seconds)
            .ok_or_else(|| de::Error::custom(format!("duration out of range: {}", seconds)))
    }

    /// Same encoding for `Option<Duration>`; `null` and a missing key both
    /// decode as `None` when paired with `#[serde(default)]`.
    pub mod option {
        use chrono::Duration;
        use serde::{de, Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            duration: &Option<Duration>,
            serializer: S,
        ) -> std::result::Result<S::Ok, S::Error> {
            match duration {
                Some(d) => serializer.serialize_some(&super::to_seconds(d)),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> std::result::Result<Option<Duration>, D::Error> {
            match Option::<f64>::deserialize(deserializer)? {
                Some(seconds) => super::from_seconds(seconds).map(Some).ok_or_else(|| {
                    de::Error::custom(format!("duration out of range: {}", seconds))
                }),
                None => Ok(None),
            }
        }
    }
}

/// Serde adapter: `Uuid` written upper-case, read in either case.
pub mod uuid_upper {
    use serde::{Deserialize, Deserializer, Serializer};
    use uuid::Uuid;

    pub fn serialize<S: Serializer>(
        id: &Uuid,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        let mut buf = Uuid::encode_buffer();
        serializer.serialize_str(id.as_hyphenated().encode_upper(&mut buf))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<Uuid, D::Error> {
        Uuid::deserialize(deserializer)
    }
}

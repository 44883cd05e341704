//! Tests for the interoperable JSON encoding and message helpers.

use chrono::{DateTime, Duration, TimeZone, Utc};
use meetup_engine::codec::{self, reference_date};
use meetup_engine::{
    Calendar, FixedClock, Meetup, MeetupError, MeetupKind, NewMeetup, SubmissionPolicy, TimeSlot,
    UserAvailability,
};
use serde_json::{json, Value};
use uuid::Uuid;

// ── Helpers ─────────────────────────────────────────────────────────────────

const MEETUP_ID: &str = "6F9619FF-8B86-D011-B42D-00C04FC964FF";

fn clock() -> FixedClock {
    FixedClock(Utc.with_ymd_and_hms(2026, 6, 20, 10, 0, 0).unwrap())
}

fn hangout() -> Meetup {
    Meetup::create(
        NewMeetup {
            id: Uuid::parse_str(MEETUP_ID).unwrap(),
            title: "Coffee".to_string(),
            kind: MeetupKind::Hangout,
            creator_id: "u-alice".to_string(),
            creator_name: "Alice".to_string(),
            start_date_range: Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap(),
            end_date_range: Utc.with_ymd_and_hms(2026, 7, 7, 0, 0, 0).unwrap(),
            duration: Some(Duration::hours(1)),
            deadline: Utc.with_ymd_and_hms(2026, 6, 25, 18, 0, 0).unwrap(),
        },
        &clock(),
    )
    .unwrap()
}

/// A record in the shape produced by the original app, with whole-second
/// reference-date numbers and one response.
fn original_payload() -> &'static str {
    r#"{
        "id": "6F9619FF-8B86-D011-B42D-00C04FC964FF",
        "title": "Lake weekend",
        "type": "Trip",
        "creatorId": "u-alice",
        "creatorName": "Alice",
        "createdDate": 803642400,
        "startDateRange": 804556800,
        "endDateRange": 805075200,
        "deadline": 804103200,
        "availabilities": [
            {
                "userId": "u-bob",
                "userName": "Bob",
                "availableSlots": [{"start": 804556800, "end": 804643200}],
                "busySlots": [],
                "responseDate": 803700000.5
            }
        ],
        "isFinalized": false
    }"#
}

// ── Reference-date encoding ─────────────────────────────────────────────────

#[test]
fn reference_date_epoch_is_zero() {
    let epoch = Utc.with_ymd_and_hms(2001, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(reference_date::to_seconds(&epoch), 0.0);
    assert_eq!(reference_date::from_seconds(0.0), Some(epoch));
}

#[test]
fn reference_date_known_instant() {
    let instant = Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap();
    assert_eq!(reference_date::to_seconds(&instant), 804_556_800.0);
}

#[test]
fn reference_date_keeps_fractional_seconds() {
    let instant = reference_date::from_seconds(-0.25).unwrap();
    assert_eq!(
        instant,
        Utc.with_ymd_and_hms(2000, 12, 31, 23, 59, 59).unwrap()
            + Duration::milliseconds(750)
    );
}

#[test]
fn reference_date_truncates_to_milliseconds() {
    let instant =
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap() + Duration::nanoseconds(123_456_789);
    let decoded = reference_date::from_seconds(reference_date::to_seconds(&instant)).unwrap();
    assert_eq!(decoded.timestamp_subsec_nanos(), 123_000_000);
}

#[test]
fn reference_date_covers_representable_extremes() {
    let max = DateTime::<Utc>::MAX_UTC;
    let decoded = reference_date::from_seconds(reference_date::to_seconds(&max)).unwrap();
    assert_eq!(decoded.timestamp(), max.timestamp());
    assert_eq!(decoded.timestamp_subsec_millis(), 999);

    let min = DateTime::<Utc>::MIN_UTC;
    assert_eq!(
        reference_date::from_seconds(reference_date::to_seconds(&min)),
        Some(min)
    );
}

#[test]
fn reference_date_rejects_non_finite() {
    assert_eq!(reference_date::from_seconds(f64::NAN), None);
    assert_eq!(reference_date::from_seconds(f64::INFINITY), None);
}

// ── Meetup encoding ─────────────────────────────────────────────────────────

#[test]
fn encoded_meetup_uses_original_field_names() {
    let encoded = codec::encode(&hangout()).unwrap();
    let value: Value = serde_json::from_str(&encoded).unwrap();

    assert_eq!(value["id"], json!(MEETUP_ID));
    assert_eq!(value["type"], json!("Hangout"));
    assert_eq!(value["creatorId"], json!("u-alice"));
    assert_eq!(value["creatorName"], json!("Alice"));
    assert_eq!(value["createdDate"], json!(803_642_400.0));
    assert_eq!(value["startDateRange"], json!(804_556_800.0));
    assert_eq!(value["duration"], json!(3600.0));
    assert_eq!(value["deadline"], json!(804_103_200.0));
    assert_eq!(value["availabilities"], json!([]));
    assert_eq!(value["isFinalized"], json!(false));
}

#[test]
fn absent_optionals_are_omitted() {
    let encoded = codec::encode(&hangout()).unwrap();
    let value: Value = serde_json::from_str(&encoded).unwrap();
    let object = value.as_object().unwrap();

    assert!(!object.contains_key("finalizedTimeSlot"));
    assert!(object.contains_key("duration"));
}

#[test]
fn meetup_round_trips_through_json() {
    let cal = Calendar::utc();
    let mut meetup = hangout();
    let slot = |h1, h2| TimeSlot {
        start: Utc.with_ymd_and_hms(2026, 7, 1, h1, 0, 0).unwrap(),
        end: Utc.with_ymd_and_hms(2026, 7, 1, h2, 0, 0).unwrap(),
    };
    for (user, s) in [("a", slot(9, 12)), ("b", slot(11, 13))] {
        meetup
            .submit_availability(
                UserAvailability {
                    user_id: user.to_string(),
                    user_name: user.to_string(),
                    available_slots: vec![s],
                    busy_slots: vec![slot(18, 20)],
                    response_date: clock().0,
                },
                &clock(),
                SubmissionPolicy::default(),
            )
            .unwrap();
    }
    meetup.finalize(slot(11, 12), &cal).unwrap();

    let decoded: Meetup = codec::decode(&codec::encode_pretty(&meetup).unwrap()).unwrap();
    assert_eq!(decoded, meetup);
    assert_eq!(decoded.finalized_time_slot(), Some(&slot(11, 12)));
}

#[test]
fn decodes_original_app_payload() {
    let meetup: Meetup = codec::decode(original_payload()).unwrap();

    assert_eq!(meetup.id, Uuid::parse_str(MEETUP_ID).unwrap());
    assert_eq!(meetup.kind, MeetupKind::Trip);
    assert_eq!(meetup.duration, None, "missing duration decodes as None");
    assert!(meetup.finalized_time_slot().is_none());
    assert_eq!(meetup.participant_count(), 1);

    let bob = meetup.participant("u-bob").unwrap();
    assert_eq!(
        bob.available_slots[0].start,
        Utc.with_ymd_and_hms(2026, 7, 1, 0, 0, 0).unwrap()
    );
    assert_eq!(bob.available_slots[0].duration(), Duration::days(1));
    assert!(meetup.validate().is_ok());
}

#[test]
fn null_optionals_decode_as_none() {
    let mut value: Value = serde_json::from_str(original_payload()).unwrap();
    value["duration"] = Value::Null;
    value["finalizedTimeSlot"] = Value::Null;

    let meetup: Meetup = codec::decode(&value.to_string()).unwrap();
    assert_eq!(meetup.duration, None);
    assert!(meetup.finalized_time_slot().is_none());
}

#[test]
fn decoded_record_with_duplicate_users_fails_validation() {
    let mut value: Value = serde_json::from_str(original_payload()).unwrap();
    let response = value["availabilities"][0].clone();
    value["availabilities"]
        .as_array_mut()
        .unwrap()
        .push(response);

    let meetup: Meetup = codec::decode(&value.to_string()).unwrap();
    assert!(matches!(
        meetup.validate(),
        Err(MeetupError::InconsistentRecord(_))
    ));
}

#[test]
fn decoded_finalized_flag_without_slot_fails_validation() {
    let mut value: Value = serde_json::from_str(original_payload()).unwrap();
    value["isFinalized"] = json!(true);

    let meetup: Meetup = codec::decode(&value.to_string()).unwrap();
    assert!(matches!(
        meetup.validate(),
        Err(MeetupError::InconsistentRecord(_))
    ));
}

#[test]
fn unknown_kind_is_a_codec_error() {
    let mut value: Value = serde_json::from_str(original_payload()).unwrap();
    value["type"] = json!("Picnic");

    let result: Result<Meetup, MeetupError> = codec::decode(&value.to_string());
    assert!(matches!(result, Err(MeetupError::Codec(_))));
}

// ── Message helpers ─────────────────────────────────────────────────────────

#[test]
fn meetup_link_round_trip() {
    let id = Uuid::parse_str(MEETUP_ID).unwrap();
    let link = codec::meetup_link(id);
    assert_eq!(link, format!("meetup://{}", MEETUP_ID));
    assert_eq!(codec::parse_meetup_link(&link), Some(id));
}

#[test]
fn parse_meetup_link_rejects_foreign_links() {
    assert_eq!(codec::parse_meetup_link("https://example.com"), None);
    assert_eq!(codec::parse_meetup_link("meetup://not-a-uuid"), None);
    assert_eq!(codec::parse_meetup_link(""), None);
}

#[test]
fn caption_and_summary() {
    let meetup = hangout();
    assert_eq!(codec::caption(&meetup), "🎉 Coffee");
    assert_eq!(codec::summary_text(&meetup), "Alice created a hangout meetup");
}

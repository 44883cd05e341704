//! Tests for participant responses and their day projection.

use chrono::{DateTime, Duration, TimeZone, Utc};
use meetup_engine::{Calendar, MeetupError, TimeSlot, UserAvailability};

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, day, hour, 0, 0).unwrap()
}

fn response(slots: Vec<TimeSlot>) -> UserAvailability {
    UserAvailability {
        user_id: "u-1".to_string(),
        user_name: "One".to_string(),
        available_slots: slots,
        busy_slots: vec![],
        response_date: at(1, 0),
    }
}

#[test]
fn slots_on_same_day_collapse_to_one_day() {
    let ua = response(vec![
        TimeSlot { start: at(1, 9), end: at(1, 10) },
        TimeSlot { start: at(1, 14), end: at(1, 16) },
        TimeSlot { start: at(3, 9), end: at(3, 10) },
    ]);

    let days: Vec<_> = ua.available_days(&Calendar::utc()).into_iter().collect();
    assert_eq!(days, vec![at(1, 0), at(3, 0)]);
}

#[test]
fn no_slots_means_no_days() {
    let ua = response(vec![]);
    assert!(ua.available_days(&Calendar::utc()).is_empty());
    assert!(!ua.has_availability());
}

#[test]
fn from_days_builds_midnight_to_midnight_slots() {
    let cal = Calendar::utc();
    // Any instant inside the day selects it.
    let ua = UserAvailability::from_days("u-1", "One", &[at(2, 13)], &[at(4, 8)], at(1, 0), &cal);

    assert_eq!(
        ua.available_slots,
        vec![TimeSlot { start: at(2, 0), end: at(3, 0) }]
    );
    assert_eq!(
        ua.busy_slots,
        vec![TimeSlot { start: at(4, 0), end: at(5, 0) }]
    );
    assert_eq!(ua.available_slots[0].duration(), Duration::days(1));
}

#[test]
fn from_days_respects_calendar_timezone() {
    let cal = Calendar::from_name("Europe/Berlin").unwrap();
    // 2026-07-02T00:00 in Berlin (CEST, UTC+2) is 2026-07-01T22:00Z.
    let ua = UserAvailability::from_days("u-1", "One", &[at(2, 10)], &[], at(1, 0), &cal);

    assert_eq!(ua.available_slots[0].start, at(1, 22));
    assert_eq!(ua.available_slots[0].end, at(2, 22));
}

#[test]
fn busy_slots_do_not_affect_days() {
    let mut ua = response(vec![TimeSlot { start: at(1, 9), end: at(1, 10) }]);
    let before = ua.available_days(&Calendar::utc());
    ua.busy_slots = vec![TimeSlot { start: at(1, 0), end: at(2, 0) }];
    assert_eq!(ua.available_days(&Calendar::utc()), before);
}

#[test]
fn validate_flags_bad_busy_slot() {
    let mut ua = response(vec![TimeSlot { start: at(1, 9), end: at(1, 10) }]);
    assert!(ua.validate().is_ok());

    ua.busy_slots = vec![TimeSlot { start: at(1, 12), end: at(1, 11) }];
    assert!(matches!(
        ua.validate(),
        Err(MeetupError::MalformedInterval { .. })
    ));
}

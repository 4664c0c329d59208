use super::*;
use chrono::{NaiveDate, TimeZone};

const MOCK_ISO: &str = "2022-12-25T13:50:30Z";

fn mock_now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2022, 12, 25)
        .and_then(|date| date.and_hms_opt(13, 50, 30))
        .expect("valid mock instant")
}

#[test]
fn to_isotime_renders_wire_format() {
    assert_eq!(to_isotime(&mock_now()), MOCK_ISO);
}

#[test]
fn to_isotime_drops_fractional_seconds() {
    let instant = NaiveDate::from_ymd_opt(2022, 12, 25)
        .and_then(|date| date.and_hms_micro_opt(13, 50, 30, 999_999))
        .expect("valid instant");
    assert_eq!(to_isotime(&instant), MOCK_ISO);
}

#[test]
fn to_instant_parses_wire_format() {
    assert_eq!(to_instant(MOCK_ISO).expect("parse"), mock_now());
}

#[test]
fn to_instant_round_trips_whole_second_instants() {
    let instant = mock_now();
    assert_eq!(to_instant(&to_isotime(&instant)).expect("parse"), instant);
}

#[test]
fn to_instant_rejects_malformed_input() {
    for bad in ["", "2022-12-25", "2022-12-25 13:50:30Z", "yesterday", "2022-13-25T13:50:30Z"] {
        let err = to_instant(bad).expect_err("malformed timestamp");
        assert_eq!(err, FormatError::Malformed(bad.to_string()));
    }
}

#[test]
fn add_offset_applies_every_component() {
    let shifted = add_offset(
        MOCK_ISO,
        Offset {
            days: 1,
            hours: 1,
            minutes: 1,
            seconds: 1,
        },
    )
    .expect("shift");
    assert_eq!(shifted, "2022-12-26T14:51:31Z");
}

#[test]
fn add_offset_accepts_negative_components() {
    let shifted = add_offset(
        MOCK_ISO,
        Offset {
            days: -9,
            minutes: -58,
            ..Offset::default()
        },
    )
    .expect("shift");
    assert_eq!(shifted, "2022-12-16T12:52:30Z");
}

#[test]
fn add_offset_forward_then_back_is_identity() {
    let forward = add_offset(MOCK_ISO, Offset::days(1)).expect("forward");
    let back = add_offset(&forward, Offset::days(-1)).expect("back");
    assert_eq!(back, MOCK_ISO);
}

#[test]
fn add_offset_reports_overflow() {
    let err = add_offset(MOCK_ISO, Offset::days(i64::MAX / 86_400)).expect_err("overflow");
    assert_eq!(err, FormatError::OutOfRange(MOCK_ISO.to_string()));
}

#[test]
fn now_isotime_reads_injected_clock() {
    let clock = FixedClock(Utc.from_utc_datetime(&mock_now()));
    assert_eq!(now_isotime(&clock), MOCK_ISO);
}

#[test]
fn seconds_between_counts_whole_seconds() {
    let cases = [
        ("2022-12-25T13:51:00Z", 30),
        ("2022-12-26T13:49:30Z", 86_340),
        ("2022-12-26T13:51:30Z", 86_460),
        ("2022-12-26T13:50:30Z", 86_400),
        ("2022-12-25T13:50:30Z", 0),
        ("2022-12-25T13:50:00Z", -30),
    ];
    for (end, expected) in cases {
        assert_eq!(
            seconds_between(MOCK_ISO, end).expect("seconds"),
            expected,
            "{MOCK_ISO} -> {end}"
        );
    }
}

#[test]
fn seconds_between_propagates_format_errors() {
    assert!(seconds_between("nope", MOCK_ISO).is_err());
    assert!(seconds_between(MOCK_ISO, "nope").is_err());
}

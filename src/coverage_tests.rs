use super::*;

const RANGE_START: &str = "2022-07-29T04:18:19Z";
const RANGE_STOP: &str = "2022-08-01T00:00:00Z";

fn slots(pairs: &[(&str, &str)]) -> Vec<TimeSlot> {
    pairs.iter().map(|&pair| TimeSlot::from(pair)).collect()
}

fn contiguous_six() -> Vec<TimeSlot> {
    slots(&[
        ("2022-07-29T04:18:19Z", "2022-07-29T12:00:00Z"),
        ("2022-07-29T04:18:19Z", "2022-07-30T00:00:00Z"),
        ("2022-07-30T00:00:00Z", "2022-07-30T12:00:00Z"),
        ("2022-07-30T12:00:00Z", "2022-07-31T00:00:00Z"),
        ("2022-07-31T00:00:00Z", "2022-07-31T12:00:00Z"),
        ("2022-07-31T12:00:00Z", "2022-08-01T00:00:00Z"),
    ])
}

fn touching_four() -> Vec<TimeSlot> {
    slots(&[
        ("2022-07-29T04:18:19Z", "2022-07-29T12:00:00Z"),
        ("2022-07-30T00:00:00Z", "2022-07-30T12:00:00Z"),
        ("2022-07-29T12:00:00Z", "2022-07-30T00:00:00Z"),
        ("2022-07-30T12:00:00Z", "2022-07-31T00:00:00Z"),
    ])
}

#[test]
fn empty_slots_are_never_gapless() {
    assert!(!is_gapless(&[]));
}

#[test]
fn single_slot_is_gapless() {
    assert!(is_gapless(&slots(&[(RANGE_START, RANGE_STOP)])));
}

#[test]
fn half_hour_hole_is_a_gap() {
    let with_gap = slots(&[
        ("2022-07-29T04:18:19Z", "2022-07-29T12:00:00Z"),
        ("2022-07-30T00:00:00Z", "2022-07-30T12:00:00Z"),
        ("2022-07-29T12:30:00Z", "2022-07-30T00:00:00Z"),
        ("2022-07-30T12:30:00Z", "2022-07-31T00:00:00Z"),
    ]);
    assert!(!is_gapless(&with_gap));
}

#[test]
fn touching_boundaries_are_gapless() {
    assert!(is_gapless(&touching_four()));
}

#[test]
fn gapless_ignores_input_order() {
    let mut reversed = touching_four();
    reversed.sort();
    reversed.reverse();
    assert!(is_gapless(&reversed));
}

#[test]
fn overlapping_slots_are_gapless() {
    let overlapping = slots(&[
        ("2022-07-29T00:00:00Z", "2022-07-29T12:00:00Z"),
        ("2022-07-29T11:00:00Z", "2022-07-30T00:00:00Z"),
        ("2022-07-29T23:59:59Z", "2022-07-30T06:00:00Z"),
    ]);
    assert!(is_gapless(&overlapping));
}

#[test]
fn nested_slot_replaces_running_stop() {
    // The short shift inside the long one pulls the running stop back to 02:00.
    let nested = slots(&[
        ("2022-07-29T00:00:00Z", "2022-07-29T10:00:00Z"),
        ("2022-07-29T01:00:00Z", "2022-07-29T02:00:00Z"),
        ("2022-07-29T05:00:00Z", "2022-07-29T12:00:00Z"),
    ]);
    assert!(!is_gapless(&nested));
}

#[test]
fn evaluation_leaves_caller_slots_untouched() {
    let original = touching_four();
    let copy = original.clone();
    assert!(is_gapless(&original));
    assert!(!is_covered(&original, RANGE_START, RANGE_STOP));
    assert_eq!(original, copy);
}

#[test]
fn empty_slots_are_never_covered() {
    assert!(!is_covered(&[], RANGE_START, RANGE_STOP));
}

#[test]
fn contiguous_slots_cover_exact_range() {
    assert!(is_covered(&contiguous_six(), RANGE_START, RANGE_STOP));
}

#[test]
fn range_starting_one_second_early_is_not_covered() {
    assert!(!is_covered(
        &contiguous_six(),
        "2022-07-29T04:18:18Z",
        RANGE_STOP
    ));
}

#[test]
fn range_ending_after_last_slot_is_not_covered() {
    assert!(!is_covered(
        &contiguous_six(),
        RANGE_START,
        "2022-08-01T00:00:01Z"
    ));
}

#[test]
fn narrower_range_inside_gapless_slots_is_covered() {
    assert!(is_covered(
        &contiguous_six(),
        "2022-07-30T00:00:00Z",
        "2022-07-31T06:00:00Z"
    ));
}

#[test]
fn gap_defeats_coverage_even_when_edges_fit() {
    let with_gap = slots(&[
        ("2022-07-29T04:18:19Z", "2022-07-29T12:00:00Z"),
        ("2022-07-30T00:00:00Z", "2022-07-30T12:00:00Z"),
        ("2022-07-29T12:30:00Z", "2022-07-30T00:00:00Z"),
        ("2022-07-30T12:30:00Z", "2022-07-31T00:00:00Z"),
    ]);
    assert!(!is_gapless(&with_gap));
    assert!(!is_covered(&with_gap, RANGE_START, "2022-07-31T00:00:00Z"));
}

#[test]
fn missing_start_coverage_is_not_covered() {
    assert!(!is_covered(
        &touching_four(),
        "2022-07-29T04:17:19Z",
        "2022-07-31T00:00:00Z"
    ));
}

#[test]
fn missing_end_coverage_is_not_covered() {
    assert!(!is_covered(&touching_four(), RANGE_START, RANGE_STOP));
}

#[test]
fn right_edge_comes_from_last_slot_by_start() {
    // The longest shift starts first, so the latest-starting slot decides the edge.
    let long_first = slots(&[
        ("2022-07-29T04:18:19Z", "2022-08-02T00:00:00Z"),
        ("2022-07-30T00:00:00Z", "2022-07-30T12:00:00Z"),
    ]);
    assert!(!is_covered(&long_first, RANGE_START, RANGE_STOP));
}

#[test]
fn duplicate_slots_do_not_change_the_decision() {
    let mut doubled = contiguous_six();
    doubled.extend(contiguous_six());
    assert!(is_covered(&doubled, RANGE_START, RANGE_STOP));
}

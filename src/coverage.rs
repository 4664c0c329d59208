//! On-call coverage evaluation.
//!
//! A schedule (or every schedule behind an escalation rule) renders to a bag of
//! `(start, end)` shifts. Coverage holds when those shifts, walked
//! earliest-first, never leave a hole and together reach both edges of the
//! window being checked.
//!
//! Timestamps are compared as strings. This is sound only for the fixed
//! `YYYY-MM-DDTHH:MM:SSZ` format; see [`crate::datetool`].
use serde::{Deserialize, Serialize};

/// One on-call interval. Callers supply `start <= end`.
///
/// The derived ordering is (start, end), which is the earliest-first walk order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: String,
    pub end: String,
}

impl TimeSlot {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }
}

impl<S: Into<String>, E: Into<String>> From<(S, E)> for TimeSlot {
    fn from((start, end): (S, E)) -> Self {
        Self::new(start, end)
    }
}

/// True when the slots, walked earliest-first, leave no gap between neighbours.
///
/// Empty input is never gapless. The running stop is replaced by each slot's
/// end rather than extended to the maximum seen so far, so a slot nested inside
/// its predecessor pulls the stop back to its own end.
///
/// Input order does not matter: the slots are sorted internally.
pub fn is_gapless(slots: &[TimeSlot]) -> bool {
    let mut ordered: Vec<&TimeSlot> = slots.iter().collect();
    ordered.sort();
    gapless_in_order(&ordered)
}

fn gapless_in_order(ordered: &[&TimeSlot]) -> bool {
    let mut walk = ordered.iter();
    let Some(first) = walk.next() else {
        return false;
    };
    let mut prior_stop = first.end.as_str();
    for slot in walk {
        if slot.start.as_str() > prior_stop {
            return false;
        }
        prior_stop = slot.end.as_str();
    }
    true
}

/// True when the slots are gapless and span `[range_start, range_stop]`.
///
/// The left edge is the start of the earliest slot; the right edge is the end
/// of the slot that sorts last by (start, end), which is not necessarily the
/// largest end seen.
pub fn is_covered(slots: &[TimeSlot], range_start: &str, range_stop: &str) -> bool {
    let mut ordered: Vec<&TimeSlot> = slots.iter().collect();
    ordered.sort();
    if !gapless_in_order(&ordered) {
        return false;
    }
    let (Some(earliest), Some(latest)) = (ordered.first(), ordered.last()) else {
        return false;
    };
    earliest.start.as_str() <= range_start && range_stop <= latest.end.as_str()
}

#[cfg(test)]
#[path = "coverage_tests.rs"]
mod tests;

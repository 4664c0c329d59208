//! Read-only reports built by polling PagerDuty list endpoints.
pub mod coverage_gap;
pub mod user_report;

use crate::datetool::{self, Clock};

/// `YYYY-MM-DD` of the clock's current instant, used to stamp report file names.
pub fn date_stamp(clock: &dyn Clock) -> String {
    let now = datetool::now_isotime(clock);
    match now.split_once('T') {
        Some((date, _)) => date.to_string(),
        None => now,
    }
}

//! PagerDuty timestamp helpers.
//!
//! PagerDuty renders every instant we consume as `YYYY-MM-DDTHH:MM:SSZ`. The
//! format is fixed width and always UTC, so two well-formed timestamps compare
//! chronologically as plain strings. Parsing is only needed for arithmetic.
use chrono::{DateTime, Duration, NaiveDateTime, Utc};

/// Wire format for PagerDuty timestamps.
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

const PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// A timestamp string that could not be parsed or shifted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("invalid timestamp {0:?}, expected YYYY-MM-DDTHH:MM:SSZ")]
    Malformed(String),
    #[error("offset moves {0:?} outside the representable range")]
    OutOfRange(String),
}

/// Source of the current instant.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads the system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Signed offset applied by [`add_offset`]. Every component may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Offset {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl Offset {
    pub fn days(days: i64) -> Self {
        Self {
            days,
            ..Self::default()
        }
    }

    fn to_duration(self) -> Option<Duration> {
        Duration::try_days(self.days)?
            .checked_add(&Duration::try_hours(self.hours)?)?
            .checked_add(&Duration::try_minutes(self.minutes)?)?
            .checked_add(&Duration::try_seconds(self.seconds)?)
    }
}

/// Format an instant in the PagerDuty wire format, dropping sub-second precision.
pub fn to_isotime(instant: &NaiveDateTime) -> String {
    instant.format(ISO_FORMAT).to_string()
}

/// Parse a PagerDuty timestamp into a naive (implicitly UTC) instant.
pub fn to_instant(isotime: &str) -> Result<NaiveDateTime, FormatError> {
    let trimmed = isotime.trim_end_matches('Z');
    NaiveDateTime::parse_from_str(trimmed, PARSE_FORMAT)
        .map_err(|_| FormatError::Malformed(isotime.to_string()))
}

/// Shift a PagerDuty timestamp by `offset` and re-render it.
pub fn add_offset(isotime: &str, offset: Offset) -> Result<String, FormatError> {
    let instant = to_instant(isotime)?;
    let shifted = offset
        .to_duration()
        .and_then(|delta| instant.checked_add_signed(delta))
        .ok_or_else(|| FormatError::OutOfRange(isotime.to_string()))?;
    Ok(to_isotime(&shifted))
}

/// Current instant from `clock` in the PagerDuty wire format.
pub fn now_isotime(clock: &dyn Clock) -> String {
    to_isotime(&clock.now().naive_utc())
}

/// Whole seconds from `start` to `end`; negative when `end` precedes `start`.
pub fn seconds_between(start: &str, end: &str) -> Result<i64, FormatError> {
    let start = to_instant(start)?;
    let end = to_instant(end)?;
    Ok((end - start).num_seconds())
}

#[cfg(test)]
#[path = "datetool_tests.rs"]
mod tests;

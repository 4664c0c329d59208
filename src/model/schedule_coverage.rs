use crate::coverage::{self, TimeSlot};
use serde::{Deserialize, Serialize};

/// Coverage summary for one schedule over the lookahead window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleCoverage {
    pub pd_id: String,
    pub name: String,
    pub html_url: String,
    pub coverage: f64,
    pub is_fully_covered: Option<bool>,
    #[serde(skip)]
    pub entries: Vec<TimeSlot>,
}

#[derive(Deserialize)]
struct ScheduleResponse {
    schedule: ScheduleBody,
}

#[derive(Deserialize)]
struct ScheduleBody {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    final_schedule: Option<FinalSchedule>,
}

#[derive(Deserialize)]
struct FinalSchedule {
    #[serde(default)]
    rendered_coverage_percentage: Option<f64>,
    #[serde(default)]
    rendered_schedule_entries: Option<Vec<RenderedEntry>>,
}

#[derive(Deserialize)]
struct RenderedEntry {
    start: String,
    end: String,
}

impl ScheduleCoverage {
    /// Build from a `GET /schedules/{id}` response rendered over a time window.
    pub fn build_from(resp: serde_json::Value) -> serde_json::Result<Self> {
        let resp: ScheduleResponse = serde_json::from_value(resp)?;
        let schedule = resp.schedule;
        let (coverage, entries) = match schedule.final_schedule {
            Some(final_schedule) => (
                final_schedule.rendered_coverage_percentage.unwrap_or(0.0),
                final_schedule
                    .rendered_schedule_entries
                    .unwrap_or_default()
                    .into_iter()
                    .map(|entry| TimeSlot::new(entry.start, entry.end))
                    .collect(),
            ),
            None => (0.0, Vec::new()),
        };
        Ok(Self {
            pd_id: schedule.id.unwrap_or_default(),
            name: schedule.name.unwrap_or_default(),
            html_url: schedule.html_url.unwrap_or_default(),
            coverage,
            is_fully_covered: None,
            entries,
        })
    }

    /// Record whether this schedule alone covers `[since, until]`.
    pub fn evaluate(&mut self, since: &str, until: &str) {
        self.is_fully_covered = Some(coverage::is_covered(&self.entries, since, until));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEDULE: &str = include_str!("../../tests/fixtures/cov_gap/schedule_gap.json");

    #[test]
    fn build_from_reads_summary_and_rendered_entries() {
        let resp = serde_json::from_str(SCHEDULE).expect("fixture json");

        let model = ScheduleCoverage::build_from(resp).expect("build schedule");

        assert_eq!(model.pd_id, "PG3MDI8");
        assert_eq!(model.name, "Preocts Coverage Gaps");
        assert!((model.coverage - 97.9).abs() < f64::EPSILON);
        assert_eq!(model.entries.len(), 3);
        assert_eq!(
            model.entries[0],
            TimeSlot::new("2022-07-29T04:18:19Z", "2022-07-29T12:00:00Z")
        );
        assert_eq!(model.is_fully_covered, None);
    }

    #[test]
    fn build_from_defaults_missing_final_schedule() {
        let resp = serde_json::json!({"schedule": {"id": "P1", "final_schedule": null}});

        let model = ScheduleCoverage::build_from(resp).expect("build schedule");

        assert!(model.coverage.abs() < f64::EPSILON);
        assert!(model.entries.is_empty());
        assert_eq!(model.name, "");
    }

    #[test]
    fn evaluate_flags_gap_in_rendered_entries() {
        let resp = serde_json::from_str(SCHEDULE).expect("fixture json");
        let mut model = ScheduleCoverage::build_from(resp).expect("build schedule");

        model.evaluate("2022-07-29T04:18:19Z", "2022-07-31T00:00:00Z");

        assert_eq!(model.is_fully_covered, Some(false));
    }
}

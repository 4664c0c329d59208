//! Find and resolve stale open incidents.
//!
//! A run without an input file only previews: it lists open incidents, narrows
//! them down to old, unprioritized, and inactive ones, and writes them to CSV.
//! Feeding that CSV back in resolves every row it contains.
use crate::datetool::{self, Clock};
use crate::ioutil;
use crate::model::Incident;
use crate::pagerduty::{ListQuery, PagerDutyApi};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::path::{Path, PathBuf};

pub const DEFAULT_CLOSE_AFTER_DAYS: i64 = 10;
/// Upper bound accepted on the command line: a century.
pub const MAX_CLOSE_AFTER_DAYS: i64 = 36_500;

const SECONDS_PER_DAY: i64 = 86_400;
const TITLE_TAG: &str = "[closed by automation]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseOptions {
    /// Incidents older than this many days are considered for closing.
    pub close_after_days: i64,
    /// Close old incidents even when their log shows recent activity.
    pub close_active: bool,
    /// Consider incidents that carry a priority.
    pub close_priority: bool,
}

impl Default for CloseOptions {
    fn default() -> Self {
        Self {
            close_after_days: DEFAULT_CLOSE_AFTER_DAYS,
            close_active: false,
            close_priority: false,
        }
    }
}

/// Outcome of resolving a batch of incidents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub resolved: Vec<Incident>,
    pub errors: Vec<Incident>,
}

#[derive(Deserialize)]
struct LogEntry {
    created_at: String,
}

pub struct CloseOldIncidents<'a> {
    api: &'a PagerDutyApi,
    clock: &'a dyn Clock,
    options: CloseOptions,
    max_query_limit: usize,
}

impl<'a> CloseOldIncidents<'a> {
    pub fn new(
        api: &'a PagerDutyApi,
        clock: &'a dyn Clock,
        options: CloseOptions,
        max_query_limit: usize,
    ) -> Self {
        Self {
            api,
            clock,
            options,
            max_query_limit,
        }
    }

    /// Preview when `input_file` is absent, otherwise resolve its rows.
    /// Returns the paths of the files written to `output_dir`.
    pub fn run(&self, input_file: Option<&Path>, output_dir: &Path) -> Result<Vec<PathBuf>> {
        let stamp = file_stamp(self.clock);
        let mut written = Vec::new();
        let mut write = |prefix: &str, rows: &[Incident]| -> Result<()> {
            let path = output_dir.join(format!("{prefix}-{stamp}.csv"));
            if ioutil::write_to_file(&path, &ioutil::to_csv_string(rows)?)? {
                tracing::info!(rows = rows.len(), path = %path.display(), "wrote incidents");
                written.push(path);
            }
            Ok(())
        };

        match input_file {
            Some(input_file) => {
                tracing::info!(path = %input_file.display(), "reading input file");
                let to_close: Vec<Incident> =
                    ioutil::csv_to_rows(&ioutil::read_from_file(input_file)?)
                        .with_context(|| format!("parse {}", input_file.display()))?;
                tracing::info!(count = to_close.len(), "read incidents, starting actions");
                let resolution = self.close_incidents(&to_close)?;
                write("close-old-incidents", &resolution.resolved)?;
                write("close-old-incidents-errors", &resolution.errors)?;
            }
            None => {
                let preview = self.preview()?;
                write("close-old-incidents-preview", &preview)?;
            }
        }
        Ok(written)
    }

    /// Open incidents that qualify for closing under the current options.
    pub fn preview(&self) -> Result<Vec<Incident>> {
        tracing::info!("pulling incidents from PagerDuty, this can take a while");
        let incidents = self.get_open_incidents()?;
        tracing::info!(count = incidents.len(), "found open incidents");

        let isolated = self.isolate_old_incidents(incidents)?;
        let isolated = self.isolate_nonpriority_incidents(isolated);
        // needs one request per incident
        if self.options.close_active {
            return Ok(isolated);
        }
        self.isolate_inactive_incidents(isolated)
    }

    /// Resolve each incident; failures are collected rather than aborting the batch.
    pub fn close_incidents(&self, incidents: &[Incident]) -> Result<Resolution> {
        tracing::info!(count = incidents.len(), "start close actions");
        let mut resolution = Resolution::default();
        for incident in incidents {
            tracing::debug!(incident_number = incident.incident_number, "closing incident");
            if self.resolve_incident(&incident.incident_id, &incident.title)? {
                resolution.resolved.push(incident.clone());
            } else {
                resolution.errors.push(incident.clone());
            }
        }
        Ok(resolution)
    }

    fn resolve_incident(&self, incident_id: &str, title: &str) -> Result<bool> {
        let payload = json!({
            "incident": {
                "type": "incident_reference",
                "status": "resolved",
                "title": format!("{TITLE_TAG} {title}"),
            }
        });
        let resp = self.api.put(&format!("/incidents/{incident_id}"), &payload)?;
        if resp.is_none() {
            tracing::error!(incident_id, "error resolving incident");
        }
        Ok(resp.is_some())
    }

    fn get_open_incidents(&self) -> Result<Vec<Incident>> {
        let query = ListQuery::new("/incidents", "incidents")?
            .param("time_zone", "UTC")
            .params("statuses[]", ["triggered", "acknowledged"])
            .param("date_range", "all");
        let incidents = self.api.list_all(&query, self.max_query_limit)?;
        tracing::info!(count = incidents.len(), "discovered incidents");
        incidents
            .into_iter()
            .map(|incident| Incident::build_from(incident).context("decode incident"))
            .collect()
    }

    /// `created_at` of the incident's newest log entry, if it has any.
    fn get_newest_log_entry_date(&self, incident_id: &str) -> Result<Option<String>> {
        let query = ListQuery::new(format!("/incidents/{incident_id}/log_entries"), "log_entries")?
            .param("time_zone", "UTC");
        let page = self.api.list_page(&query, 0, 1, false)?;
        let Some(entry) = page.objects.into_iter().next() else {
            return Ok(None);
        };
        let entry: LogEntry = serde_json::from_value(entry)
            .with_context(|| format!("decode log entry of {incident_id}"))?;
        Ok(Some(entry.created_at))
    }

    fn isolate_old_incidents(&self, incidents: Vec<Incident>) -> Result<Vec<Incident>> {
        let mut old = Vec::new();
        for incident in incidents {
            if self.is_stale(&incident.created_at)? {
                old.push(incident);
            }
        }
        tracing::info!(count = old.len(), "isolated old incidents");
        Ok(old)
    }

    fn isolate_nonpriority_incidents(&self, incidents: Vec<Incident>) -> Vec<Incident> {
        let isolated: Vec<Incident> = incidents
            .into_iter()
            .filter(|incident| self.options.close_priority || !incident.has_priority)
            .collect();
        tracing::info!(count = isolated.len(), "isolated nonpriority incidents");
        isolated
    }

    fn isolate_inactive_incidents(&self, incidents: Vec<Incident>) -> Result<Vec<Incident>> {
        let mut inactive = Vec::new();
        for (idx, incident) in incidents.into_iter().enumerate() {
            if idx % 100 == 0 {
                tracing::info!(from = idx, to = idx + 100, "checking incidents");
            }
            // no log entries: fall back to the already stale creation time
            let last_activity = self
                .get_newest_log_entry_date(&incident.incident_id)?
                .unwrap_or_else(|| incident.created_at.clone());
            if self.is_stale(&last_activity)? {
                tracing::debug!(incident_number = incident.incident_number, "incident has no activity");
                inactive.push(incident);
            }
        }
        tracing::info!(count = inactive.len(), "isolated inactive incidents");
        Ok(inactive)
    }

    fn is_stale(&self, isotime: &str) -> Result<bool> {
        let now = datetool::now_isotime(self.clock);
        let age = datetool::seconds_between(isotime, &now)?;
        let threshold = self
            .options
            .close_after_days
            .checked_mul(SECONDS_PER_DAY)
            .ok_or_else(|| {
                anyhow!(
                    "close after {} days overflows the age threshold",
                    self.options.close_after_days
                )
            })?;
        Ok(age > threshold)
    }
}

/// `YYYYmmdd-HHMM` of the clock's current instant.
pub fn file_stamp(clock: &dyn Clock) -> String {
    clock.now().format("%Y%m%d-%H%M").to_string()
}

#[cfg(test)]
#[path = "incidents_tests.rs"]
mod tests;

//! On-call coverage gap report.
//!
//! Renders every schedule over a lookahead window, then checks each
//! escalation rule against the combined shifts of the schedules it targets.
//! A rule with no schedule targets has nothing to cover it and is flagged.
use crate::coverage::{self, TimeSlot};
use crate::datetool::{self, Clock, Offset};
use crate::ioutil;
use crate::model::{EscalationPolicy, EscalationRuleCoverage, ScheduleCoverage};
use crate::pagerduty::{ListQuery, PagerDutyApi};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

pub const DEFAULT_LOOK_AHEAD_DAYS: i64 = 14;

/// CSV bodies of the two coverage reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapReports {
    pub schedule_csv: String,
    pub escalation_csv: String,
}

#[derive(Deserialize)]
struct ScheduleRef {
    id: String,
}

pub struct CoverageGapReport<'a> {
    api: &'a PagerDutyApi,
    since: String,
    until: String,
    max_query_limit: usize,
    schedules: BTreeMap<String, ScheduleCoverage>,
    escalations: BTreeMap<String, EscalationRuleCoverage>,
}

impl<'a> CoverageGapReport<'a> {
    /// The window runs from the clock's current instant to `look_ahead_days` later.
    pub fn new(
        api: &'a PagerDutyApi,
        clock: &dyn Clock,
        max_query_limit: usize,
        look_ahead_days: i64,
    ) -> Result<Self> {
        let since = datetool::now_isotime(clock);
        let until = datetool::add_offset(&since, Offset::days(look_ahead_days))
            .context("compute lookahead window")?;
        Ok(Self {
            api,
            since,
            until,
            max_query_limit,
            schedules: BTreeMap::new(),
            escalations: BTreeMap::new(),
        })
    }

    pub fn window(&self) -> (&str, &str) {
        (&self.since, &self.until)
    }

    /// Pull schedules and escalation policies, evaluate coverage, render CSVs.
    pub fn run_reports(&mut self) -> Result<GapReports> {
        let schedule_ids = self.get_all_schedule_ids()?;
        self.map_schedule_coverages(&schedule_ids)?;
        let policies = self.get_all_escalations()?;
        self.map_escalation_coverages(&policies);
        self.hydrate_escalation_coverage_flags();

        let schedules: Vec<&ScheduleCoverage> = self.schedules.values().collect();
        let escalations: Vec<&EscalationRuleCoverage> = self.escalations.values().collect();
        Ok(GapReports {
            schedule_csv: ioutil::to_csv_string(&schedules)?,
            escalation_csv: ioutil::to_csv_string(&escalations)?,
        })
    }

    /// Render one schedule over the window. A failed fetch is logged and skipped.
    pub fn get_schedule_coverage(&self, schedule_id: &str) -> Result<Option<ScheduleCoverage>> {
        let params = [
            ("since", self.since.as_str()),
            ("until", self.until.as_str()),
            ("time_zone", "Etc/UTC"),
        ];
        let Some(resp) = self.api.get(&format!("/schedules/{schedule_id}"), &params)? else {
            tracing::error!(schedule_id, "error fetching schedule");
            return Ok(None);
        };
        let mut schedule = ScheduleCoverage::build_from(resp)
            .with_context(|| format!("decode schedule {schedule_id}"))?;
        schedule.evaluate(&self.since, &self.until);
        Ok(Some(schedule))
    }

    fn get_all_schedule_ids(&self) -> Result<BTreeSet<String>> {
        let query = ListQuery::new("/schedules", "schedules")?;
        let schedules: Vec<ScheduleRef> = self.api.list_all_as(&query, self.max_query_limit)?;
        let ids: BTreeSet<String> = schedules.into_iter().map(|schedule| schedule.id).collect();
        tracing::info!(count = ids.len(), "discovered schedules");
        Ok(ids)
    }

    fn get_all_escalations(&self) -> Result<Vec<EscalationPolicy>> {
        let query = ListQuery::new("/escalation_policies", "escalation_policies")?;
        let policies: Vec<EscalationPolicy> =
            self.api.list_all_as(&query, self.max_query_limit)?;
        tracing::info!(count = policies.len(), "discovered escalation policies");
        Ok(policies)
    }

    fn map_schedule_coverages(&mut self, schedule_ids: &BTreeSet<String>) -> Result<()> {
        tracing::info!(count = schedule_ids.len(), "pulling schedules for coverage");
        for (idx, schedule_id) in schedule_ids.iter().enumerate() {
            tracing::debug!(schedule_id = %schedule_id, index = idx + 1, of = schedule_ids.len(), "pulling schedule");
            if let Some(coverage) = self.get_schedule_coverage(schedule_id)? {
                self.schedules.insert(schedule_id.clone(), coverage);
            }
        }
        Ok(())
    }

    fn map_escalation_coverages(&mut self, policies: &[EscalationPolicy]) {
        tracing::info!(count = policies.len(), "mapping escalations for coverage");
        for policy in policies {
            for rule in EscalationRuleCoverage::build_from(policy) {
                self.escalations.insert(rule.key(), rule);
            }
        }
        tracing::info!(count = self.escalations.len(), "escalation rules mapped");
    }

    /// Schedules must be mapped before rules are evaluated.
    fn hydrate_escalation_coverage_flags(&mut self) {
        for rule in self.escalations.values_mut() {
            let entries = extract_entries(&self.schedules, &rule.rule_target_ids);
            rule.is_fully_covered = Some(coverage::is_covered(
                &entries,
                &self.since,
                &self.until,
            ));
        }
    }
}

/// Every shift of the given schedules; ids without a mapped schedule are ignored.
fn extract_entries(
    schedules: &BTreeMap<String, ScheduleCoverage>,
    schedule_ids: &[String],
) -> Vec<TimeSlot> {
    schedule_ids
        .iter()
        .filter_map(|id| schedules.get(id))
        .flat_map(|schedule| schedule.entries.iter().cloned())
        .collect()
}

#[cfg(test)]
#[path = "coverage_gap_tests.rs"]
mod tests;

//! Per-user report of team roles, schedule membership, and notification setup.
use crate::ioutil;
use crate::model::{TeamMember, TeamRef, UserReportRow, UserTeam};
use crate::pagerduty::{ListQuery, PagerDutyApi};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Deserialize)]
struct ScheduleUsers {
    #[serde(default)]
    users: Option<Vec<ScheduleUser>>,
}

#[derive(Deserialize)]
struct ScheduleUser {
    id: String,
    #[serde(default)]
    deleted_at: Option<String>,
}

pub struct UserReport<'a> {
    api: &'a PagerDutyApi,
    max_query_limit: usize,
    users: BTreeMap<String, UserReportRow>,
    teams: BTreeSet<TeamRef>,
    memberships: Vec<UserTeam>,
    scheduled_users: BTreeSet<String>,
}

impl<'a> UserReport<'a> {
    pub fn new(api: &'a PagerDutyApi, max_query_limit: usize) -> Self {
        Self {
            api,
            max_query_limit,
            users: BTreeMap::new(),
            teams: BTreeSet::new(),
            memberships: Vec::new(),
            scheduled_users: BTreeSet::new(),
        }
    }

    /// Pull users (optionally limited to `team_ids`), their team memberships,
    /// and schedule participation, then render the report as CSV.
    pub fn run_report(&mut self, team_ids: &[String]) -> Result<String> {
        self.get_users(team_ids)?;
        self.get_memberships()?;
        self.get_scheduled_users()?;
        self.hydrate_rows();

        let rows: Vec<&UserReportRow> = self.users.values().collect();
        ioutil::to_csv_string(&rows)
    }

    fn get_users(&mut self, team_ids: &[String]) -> Result<()> {
        let query = ListQuery::new("/users", "users")?
            .params("include[]", ["notification_rules", "contact_methods"])
            .params("team_ids[]", team_ids.iter().cloned());
        let users = self.api.list_all(&query, self.max_query_limit)?;
        tracing::info!(count = users.len(), "discovered users");
        for user in users {
            let (row, teams) = UserReportRow::build_from(user).context("decode user")?;
            self.teams.extend(teams);
            self.users.insert(row.id.clone(), row);
        }
        Ok(())
    }

    fn get_memberships(&mut self) -> Result<()> {
        tracing::info!(count = self.teams.len(), "pulling team memberships");
        for team in &self.teams {
            let query = ListQuery::new(format!("/teams/{}/members", team.id), "members")?;
            let members: Vec<TeamMember> = self.api.list_all_as(&query, self.max_query_limit)?;
            self.memberships.extend(
                members
                    .into_iter()
                    .map(|member| UserTeam::from_member(member, &team.id, &team.summary)),
            );
        }
        Ok(())
    }

    fn get_scheduled_users(&mut self) -> Result<()> {
        let query = ListQuery::new("/schedules", "schedules")?;
        let schedules: Vec<ScheduleUsers> = self.api.list_all_as(&query, self.max_query_limit)?;
        self.scheduled_users = schedules
            .into_iter()
            .flat_map(|schedule| schedule.users.unwrap_or_default())
            .filter(|user| user.deleted_at.is_none())
            .map(|user| user.id)
            .collect();
        tracing::info!(count = self.scheduled_users.len(), "users on a schedule");
        Ok(())
    }

    fn hydrate_rows(&mut self) {
        for membership in &self.memberships {
            let Some(row) = self.users.get_mut(&membership.user_id) else {
                tracing::debug!(user_id = %membership.user_id, team_id = %membership.team_id, "membership for unlisted user");
                continue;
            };
            match row.teams_for_role(&membership.team_role) {
                Some(teams) => teams.push(membership.label()),
                None => {
                    tracing::debug!(role = %membership.team_role, user_id = %membership.user_id, "unknown team role");
                }
            }
        }
        for (user_id, row) in &mut self.users {
            row.on_schedule = self.scheduled_users.contains(user_id);
        }
    }
}

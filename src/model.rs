//! Report rows built from PagerDuty API responses.
//!
//! Each row type decodes the slice of the API payload it needs and flattens it
//! into the shape written to CSV.
mod escalation_rule_coverage;
mod incident;
mod schedule_coverage;
mod user_report_row;
mod user_team;

pub use escalation_rule_coverage::{EscalationPolicy, EscalationRuleCoverage};
pub use incident::Incident;
pub use schedule_coverage::ScheduleCoverage;
pub use user_report_row::{TeamRef, UserReportRow};
pub use user_team::{TeamMember, UserTeam};

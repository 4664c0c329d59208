//! CLI argument parsing for the PagerDuty utilities.
use crate::config::LogLevel;
use crate::incidents::{DEFAULT_CLOSE_AFTER_DAYS, MAX_CLOSE_AFTER_DAYS};
use crate::pagerduty::{DEFAULT_BASE_URL, MAX_QUERY_LIMIT};
use crate::report::coverage_gap::DEFAULT_LOOK_AHEAD_DAYS;
use crate::safelist::Region;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Root CLI entrypoint.
#[derive(Parser, Debug)]
#[command(
    name = "pd-utils",
    version,
    about = "PagerDuty command line utilities",
    after_help = "Examples:\n  pd-utils coverage-gap-report --look-ahead-days 30\n  pd-utils user-report --team-ids PHB3G42 PLNRGGS\n  pd-utils close-old-incidents --close-after-days 30\n  pd-utils close-old-incidents --inputfile close-old-incidents-preview-20220820-0905.csv\n  pd-utils send-alert <routing-key> \"Disk full\" \"sda1 at 99%\"\n  pd-utils webhook-ips eu",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Logging level (default: $LOGGING_LEVEL | ERROR); RUST_LOG overrides it
    #[arg(
        long,
        global = true,
        env = "LOGGING_LEVEL",
        value_enum,
        ignore_case = true,
        default_value_t = LogLevel::Error
    )]
    pub logging_level: LogLevel,

    /// Env file to load instead of searching for `.env`
    #[arg(long, global = true, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    CoverageGapReport(CoverageGapArgs),
    UserReport(UserReportArgs),
    CloseOldIncidents(CloseOldIncidentsArgs),
    SendAlert(SendAlertArgs),
    WebhookIps(WebhookIpsArgs),
}

/// Connection and output settings shared by the API-backed commands.
#[derive(Args, Debug, Clone)]
pub struct StandardArgs {
    /// PagerDuty API token (default: $PAGERDUTY_TOKEN)
    #[arg(
        long,
        env = "PAGERDUTY_TOKEN",
        default_value = "",
        hide_env_values = true,
        hide_default_value = true
    )]
    pub token: String,

    /// PagerDuty account email (default: $PAGERDUTY_EMAIL)
    #[arg(long, env = "PAGERDUTY_EMAIL", default_value = "", hide_default_value = true)]
    pub email: String,

    /// REST API root
    #[arg(long, env = "PAGERDUTY_BASE_URL", value_name = "URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory report files are written to
    #[arg(long, value_name = "DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Page size for list requests
    #[arg(
        long,
        value_name = "N",
        default_value_t = MAX_QUERY_LIMIT as u16,
        value_parser = clap::value_parser!(u16).range(1..=MAX_QUERY_LIMIT as i64)
    )]
    pub max_query_limit: u16,
}

#[derive(Args, Debug)]
#[command(about = "Report schedules and escalation rules with on-call coverage gaps")]
pub struct CoverageGapArgs {
    #[command(flatten)]
    pub standard: StandardArgs,

    /// Days ahead of now to check for coverage
    #[arg(long, value_name = "DAYS", default_value_t = DEFAULT_LOOK_AHEAD_DAYS)]
    pub look_ahead_days: i64,
}

#[derive(Args, Debug)]
#[command(about = "Report user accounts with team roles and notification setup")]
pub struct UserReportArgs {
    #[command(flatten)]
    pub standard: StandardArgs,

    /// Team ids to include in the report (default: all users)
    #[arg(long, alias = "team_ids", value_name = "ID", num_args = 0..)]
    pub team_ids: Vec<String>,
}

#[derive(Args, Debug)]
#[command(about = "Preview stale open incidents, or resolve those listed in a preview file")]
pub struct CloseOldIncidentsArgs {
    #[command(flatten)]
    pub standard: StandardArgs,

    /// Preview CSV of incidents to resolve; without it a new preview is written
    #[arg(long, value_name = "PATH")]
    pub inputfile: Option<PathBuf>,

    /// Incidents older than this are considered for closing
    #[arg(
        long,
        value_name = "DAYS",
        default_value_t = DEFAULT_CLOSE_AFTER_DAYS,
        value_parser = clap::value_parser!(i64).range(0..=MAX_CLOSE_AFTER_DAYS)
    )]
    pub close_after_days: i64,

    /// Close old incidents regardless of activity
    #[arg(long)]
    pub close_active: bool,

    /// Consider incidents with priority for closing
    #[arg(long)]
    pub close_priority: bool,
}

#[derive(Args, Debug)]
#[command(about = "Trigger an alert through the Events API v2")]
pub struct SendAlertArgs {
    /// Integration (routing) key of the target service
    pub routing_key: String,

    /// Alert title
    pub title: String,

    /// Message shown in the incident body
    pub body: String,

    /// Deduplication key (default: current epoch seconds)
    pub dedup: Option<String>,
}

#[derive(Args, Debug)]
#[command(about = "Print the PagerDuty webhook IP safelist")]
pub struct WebhookIpsArgs {
    /// Service region to list
    #[arg(value_enum, ignore_case = true, default_value_t = Region::All)]
    pub region: Region,
}

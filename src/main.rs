use anyhow::{Context, Result};
use clap::Parser;
use pd_utils::cli::{
    CloseOldIncidentsArgs, Command, CoverageGapArgs, RootArgs, SendAlertArgs, UserReportArgs,
    WebhookIpsArgs,
};
use pd_utils::config::{self, LogLevel, RuntimeConfig};
use pd_utils::datetool::SystemClock;
use pd_utils::incidents::{CloseOldIncidents, CloseOptions};
use pd_utils::pagerduty::transport::UreqTransport;
use pd_utils::pagerduty::PagerDutyApi;
use pd_utils::report::coverage_gap::CoverageGapReport;
use pd_utils::report::user_report::UserReport;
use pd_utils::{alert, ioutil, report, safelist};
use std::path::Path;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const API_TIMEOUT: Duration = Duration::from_secs(60);

fn main() -> Result<()> {
    config::load_dotenv();
    let mut args = RootArgs::parse();
    if let Some(env_file) = args.env_file.clone() {
        config::load_env_file(&env_file)
            .with_context(|| format!("load env file {}", env_file.display()))?;
        // re-read so values from the file fill in env-backed flags
        args = RootArgs::parse();
    }
    init_tracing(args.logging_level);

    match args.command {
        Command::CoverageGapReport(args) => run_coverage_gap_report(args),
        Command::UserReport(args) => run_user_report(args),
        Command::CloseOldIncidents(args) => run_close_old_incidents(args),
        Command::SendAlert(args) => run_send_alert(args),
        Command::WebhookIps(args) => run_webhook_ips(args),
    }
}

fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn connect(config: &RuntimeConfig) -> PagerDutyApi {
    PagerDutyApi::new(
        config.base_url.as_str(),
        &config.token,
        config.email.as_deref(),
        Box::new(UreqTransport::new(Some(API_TIMEOUT))),
    )
}

fn save_report(path: &Path, content: &str) -> Result<()> {
    if ioutil::write_to_file(path, content)? {
        println!("Report saved to {}", path.display());
    } else {
        println!("Nothing to report, skipped {}", path.display());
    }
    Ok(())
}

fn run_coverage_gap_report(args: CoverageGapArgs) -> Result<()> {
    let config = RuntimeConfig::from_args(&args.standard, false)?;
    let api = connect(&config);
    let clock = SystemClock;

    println!("Starting coverage gap report, this pull can take some time.");
    let mut gap_report =
        CoverageGapReport::new(&api, &clock, config.max_query_limit, args.look_ahead_days)?;
    let (since, until) = gap_report.window();
    tracing::info!(since, until, "checking coverage window");
    let reports = gap_report.run_reports().context("coverage gap report")?;

    let stamp = report::date_stamp(&clock);
    save_report(
        &config.output_path(&format!("schedule_gap_report{stamp}.csv")),
        &reports.schedule_csv,
    )?;
    save_report(
        &config.output_path(&format!("escalation_rule_gap_report{stamp}.csv")),
        &reports.escalation_csv,
    )
}

fn run_user_report(args: UserReportArgs) -> Result<()> {
    let config = RuntimeConfig::from_args(&args.standard, false)?;
    let api = connect(&config);

    println!("Starting user report, this pull can take some time.");
    let csv = UserReport::new(&api, config.max_query_limit)
        .run_report(&args.team_ids)
        .context("user report")?;

    let stamp = report::date_stamp(&SystemClock);
    save_report(&config.output_path(&format!("user_report{stamp}.csv")), &csv)
}

fn run_close_old_incidents(args: CloseOldIncidentsArgs) -> Result<()> {
    let config = RuntimeConfig::from_args(&args.standard, true)?;
    let api = connect(&config);
    let clock = SystemClock;
    let options = CloseOptions {
        close_after_days: args.close_after_days,
        close_active: args.close_active,
        close_priority: args.close_priority,
    };

    let closer = CloseOldIncidents::new(&api, &clock, options, config.max_query_limit);
    let written = closer
        .run(args.inputfile.as_deref(), &config.output_dir)
        .context("close old incidents")?;
    if written.is_empty() {
        println!("No incidents matched, nothing written.");
    }
    for path in written {
        println!("Report saved to {}", path.display());
    }
    Ok(())
}

fn run_send_alert(args: SendAlertArgs) -> Result<()> {
    let transport = UreqTransport::new(Some(API_TIMEOUT));
    let reply = alert::send_alert(
        &transport,
        &SystemClock,
        &args.routing_key,
        &args.title,
        &args.body,
        args.dedup.as_deref(),
    )
    .context("send alert")?;
    println!("Alert status: {}", reply.status);
    println!("Alert response: {}", reply.body);
    if !reply.is_success() {
        anyhow::bail!("alert rejected with HTTP {}", reply.status);
    }
    Ok(())
}

fn run_webhook_ips(args: WebhookIpsArgs) -> Result<()> {
    let transport = UreqTransport::new(Some(safelist::TIMEOUT));
    let ips = safelist::get_safelist(&transport, args.region).context("webhook safelist")?;
    for ip in ips {
        println!("{ip}");
    }
    Ok(())
}

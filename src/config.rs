//! Runtime settings resolved from flags, the environment, and `.env`.
use crate::cli::StandardArgs;
use clap::ValueEnum;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("missing PagerDuty token, pass --token or set PAGERDUTY_TOKEN")]
    MissingToken,
    #[error("missing PagerDuty email, pass --email or set PAGERDUTY_EMAIL")]
    MissingEmail,
}

/// Levels accepted by `--logging-level`, named the way `LOGGING_LEVEL` is usually set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    #[default]
    Error,
    Critical,
}

impl LogLevel {
    /// `tracing` filter directive for this level; `CRITICAL` has no tracing
    /// counterpart and maps to `error`.
    pub fn filter(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error | LogLevel::Critical => "error",
        }
    }
}

/// Validated settings shared by the API-backed commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub token: String,
    pub email: Option<String>,
    pub base_url: String,
    pub output_dir: PathBuf,
    pub max_query_limit: usize,
}

impl RuntimeConfig {
    /// Commands that modify PagerDuty pass `require_email`; the API rejects
    /// writes without a `From` header.
    pub fn from_args(args: &StandardArgs, require_email: bool) -> Result<Self, ConfigError> {
        let token = args.token.trim();
        if token.is_empty() {
            return Err(ConfigError::MissingToken);
        }
        let email = Some(args.email.trim())
            .filter(|email| !email.is_empty())
            .map(str::to_string);
        if require_email && email.is_none() {
            return Err(ConfigError::MissingEmail);
        }
        Ok(Self {
            token: token.to_string(),
            email,
            base_url: args.base_url.clone(),
            output_dir: args.output_dir.clone(),
            max_query_limit: usize::from(args.max_query_limit),
        })
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// Load `.env` from the working directory or its parents. A missing file is fine.
pub fn load_dotenv() -> Option<PathBuf> {
    match dotenvy::dotenv() {
        Ok(path) => Some(path),
        Err(err) if err.not_found() => None,
        Err(err) => {
            // logging is not up yet
            eprintln!("warning: ignoring .env: {err}");
            None
        }
    }
}

/// Load a specific env file, used by tests and `--env-file`.
pub fn load_env_file(path: &Path) -> Result<(), dotenvy::Error> {
    dotenvy::from_path(path)
}

//! Shared helpers for driving the `pd-utils` binary.

use std::path::Path;
use std::process::{Command, Output};

/// Environment read by the binary; cleared so the host setup cannot leak in.
const ENV_KEYS: &[&str] = &[
    "PAGERDUTY_TOKEN",
    "PAGERDUTY_EMAIL",
    "PAGERDUTY_BASE_URL",
    "LOGGING_LEVEL",
    "RUST_LOG",
];

/// Nothing listens here, so API calls fail fast with a connection error.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:9";

/// Run `pd-utils` with `args` inside `dir`.
pub fn run_in(dir: &Path, args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pd-utils"));
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd.current_dir(dir)
        .args(args)
        .output()
        .expect("spawn pd-utils")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

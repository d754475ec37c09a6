//! Command-line definitions for sysauditctl

use chrono::NaiveDateTime;
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::errors::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser, Debug)]
#[command(name = "sysauditctl")]
#[command(about = "Run health checks against a live system or an extracted snapshot", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: /etc/sysaudit/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr (RUST_LOG still wins)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the available checks
    List,

    /// Run checks and print their results
    Run(RunArgs),
}

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Check identifier to run (repeatable; default: all)
    #[arg(long = "check", value_name = "ID")]
    pub checks: Vec<String>,

    /// Profile file with +include / -exclude lines
    #[arg(long)]
    pub profile: Option<PathBuf>,

    /// Snapshot root to audit instead of the live system
    #[arg(long, env = "SYSAUDIT_ROOT")]
    pub root: Option<PathBuf>,

    /// Reference time for year-less log timestamps ("YYYY-MM-DD HH:MM:SS")
    #[arg(long, value_parser = parse_now)]
    pub now: Option<NaiveDateTime>,

    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

fn parse_now(value: &str) -> Result<NaiveDateTime, String> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .map_err(|e| format!("expected \"YYYY-MM-DD HH:MM:SS\": {}", e))
}

/// Exit code for a failed `Cli::try_parse`: help and version are not errors
pub fn parse_exit_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
        _ => EXIT_USAGE,
    }
}

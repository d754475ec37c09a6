//! Command implementations for sysauditctl

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use sysaudit_common::{AuditConfig, CheckContext, CheckRegistry, CheckResult, Profile};
use tracing::info;

use crate::cli::RunArgs;
use crate::errors::{EXIT_CHECK_FAILED, EXIT_FATAL, EXIT_SUCCESS};

/// A check that aborted instead of producing a result
#[derive(Debug, Clone, Serialize)]
pub struct CheckError {
    pub id: String,
    pub message: String,
    pub exit_code: i32,
}

/// Everything one `run` produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub results: Vec<CheckResult>,
    pub errors: Vec<CheckError>,
    /// Aggregated profile result when a profile was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<CheckResult>,
}

impl RunReport {
    pub fn exit_code(&self) -> i32 {
        if let Some(error) = self.errors.first() {
            return error.exit_code.max(EXIT_FATAL);
        }
        if self.results.iter().any(|r| r.status.is_failed()) {
            EXIT_CHECK_FAILED
        } else {
            EXIT_SUCCESS
        }
    }
}

/// Run the selected checks against the configured root
pub fn run_checks(registry: &CheckRegistry, args: &RunArgs, mut config: AuditConfig) -> Result<RunReport> {
    if let Some(root) = &args.root {
        config.root = root.clone();
    }
    let now = args.now.unwrap_or_else(|| Local::now().naive_local());
    let ctx = CheckContext::new(config, now);

    let profile = args
        .profile
        .as_deref()
        .map(|path| {
            Profile::load(path).with_context(|| format!("loading profile {}", path.display()))
        })
        .transpose()?;

    let mut ids: Vec<&str> = if args.checks.is_empty() {
        registry.ids()
    } else {
        args.checks.iter().map(String::as_str).collect()
    };
    if let Some(profile) = &profile {
        ids = profile.select(ids);
    }
    info!(
        "Running {} check(s) against {} (now = {})",
        ids.len(),
        ctx.root.display(),
        ctx.now
    );

    let mut results = Vec::new();
    let mut errors = Vec::new();
    for run in registry.run_selected(&ids, &ctx) {
        match run.outcome {
            Ok(result) => results.push(result),
            Err(e) => errors.push(CheckError {
                id: run.id,
                message: e.to_string(),
                exit_code: e.exit_code(),
            }),
        }
    }

    let profile = profile.map(|p| p.aggregate(&results));
    Ok(RunReport {
        results,
        errors,
        profile,
    })
}

//! Text rendering for sysauditctl
//!
//! Colors are applied only when `color` is set, so the plain output is
//! stable for tests and pipes.

use owo_colors::OwoColorize;
use std::fmt::Write as _;
use sysaudit_common::{CheckRegistry, CheckResult, CheckStatus};

use crate::commands::RunReport;

fn status_label(status: CheckStatus, color: bool) -> String {
    let label = match status {
        CheckStatus::Ok => "[OK]",
        CheckStatus::Failed => "[FAILED]",
        CheckStatus::Skipped => "[SKIPPED]",
    };
    if !color {
        return label.to_string();
    }
    match status {
        CheckStatus::Ok => label.bright_green().to_string(),
        CheckStatus::Failed => label.bright_red().bold().to_string(),
        CheckStatus::Skipped => label.yellow().to_string(),
    }
}

fn render_result(out: &mut String, result: &CheckResult, color: bool) {
    let _ = writeln!(
        out,
        "{} {} - {} ({} ms)",
        status_label(result.status, color),
        result.id,
        result.name,
        result.duration_ms
    );
    for line in result.text.lines() {
        let _ = writeln!(out, "    {}", line);
    }
}

/// Human-readable run output
pub fn render_text(report: &RunReport, color: bool) -> String {
    let mut out = String::new();
    for result in &report.results {
        render_result(&mut out, result, color);
    }
    for error in &report.errors {
        let label = if color {
            "[ERROR]".red().to_string()
        } else {
            "[ERROR]".to_string()
        };
        let _ = writeln!(out, "{} {}: {}", label, error.id, error.message);
    }
    if let Some(profile) = &report.profile {
        render_result(&mut out, profile, color);
    }
    out
}

/// One line per registered check
pub fn render_list(registry: &CheckRegistry) -> String {
    let mut out = String::new();
    for meta in registry.metas() {
        let _ = writeln!(
            out,
            "{:24} {:10} {} - {}",
            meta.id, meta.category, meta.long_name, meta.description
        );
    }
    out
}

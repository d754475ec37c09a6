//! Reboot anomaly rules and report rendering

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::event::{Event, RebootStatus};
use crate::check::CheckStatus;
use crate::config::RebootSettings;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Thresholds applied to every reconciled event
#[derive(Debug, Clone, Copy)]
pub struct AnomalyRules {
    pub bootloader_init_limit_secs: f64,
    pub downtime_limit_secs: f64,
}

impl Default for AnomalyRules {
    fn default() -> Self {
        Self::from(&RebootSettings::default())
    }
}

impl From<&RebootSettings> for AnomalyRules {
    fn from(settings: &RebootSettings) -> Self {
        Self {
            bootloader_init_limit_secs: settings.bootloader_init_limit_secs,
            downtime_limit_secs: settings.downtime_limit_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    HardReboot,
    SlowBootloader,
    LongDowntime,
}

/// One fired rule on one event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub sequence_index: usize,
    pub time: NaiveDateTime,
    pub message: String,
}

/// Reconciled events plus everything the rules flagged
#[derive(Debug, Clone)]
pub struct RebootReport {
    pub events: Vec<Event>,
    pub findings: Vec<Finding>,
}

impl RebootReport {
    /// Apply every rule to every event, independently
    pub fn evaluate(events: Vec<Event>, rules: &AnomalyRules) -> Self {
        let mut findings = Vec::new();
        for event in &events {
            let mut flag = |kind: FindingKind, message: String| {
                findings.push(Finding {
                    kind,
                    sequence_index: event.sequence_index,
                    time: event.time,
                    message,
                });
            };
            if event.status == RebootStatus::Hard {
                flag(FindingKind::HardReboot, "hard reboot found".to_string());
            }
            if event.duration_bootloader_init > rules.bootloader_init_limit_secs {
                flag(
                    FindingKind::SlowBootloader,
                    format!(
                        "bootloader took more than {}s to init",
                        rules.bootloader_init_limit_secs
                    ),
                );
            }
            if event.duration_down > rules.downtime_limit_secs {
                flag(
                    FindingKind::LongDowntime,
                    format!(
                        "system was down for more than {} minutes",
                        rules.downtime_limit_secs / 60.0
                    ),
                );
            }
        }
        Self { events, findings }
    }

    pub fn problem_count(&self) -> usize {
        self.findings.len()
    }

    pub fn status(&self) -> CheckStatus {
        if self.findings.is_empty() {
            CheckStatus::Ok
        } else {
            CheckStatus::Failed
        }
    }

    /// Count line, one line per finding, then the event table
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} problem(s) found", self.problem_count());
        for finding in &self.findings {
            let _ = writeln!(
                out,
                "- {} ({})",
                finding.message,
                finding.time.format(TIME_FORMAT)
            );
        }
        out.push_str("Events:\n");
        out.push_str(&render_header());
        for event in &self.events {
            out.push_str(&render_row(event));
        }
        out
    }
}

fn render_header() -> String {
    format!(
        "{:19.19} {:10.10} {:15.15} {:6.6} {:>4.4} {:>3.3} {:>5.5}\n",
        "Time", "Context", "Description", "Status", "Boot", "OS", "Down"
    )
}

fn render_row(event: &Event) -> String {
    format!(
        "{} {:10.10} {:15.15} {:6.6} {:4.0} {:3.0} {:5.0}\n",
        event.time.format(TIME_FORMAT),
        event.context.as_str(),
        event.description.as_str(),
        event.status.as_str(),
        event.duration_bootloader_init,
        event.duration_os_up,
        event.duration_down
    )
}

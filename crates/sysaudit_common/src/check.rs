//! Check definitions shared by every audit check
//!
//! A check runs against a frozen snapshot rooted at `CheckContext::root` and
//! yields a status plus free text for the reporting layer.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::AuditConfig;
use crate::error::Result;

/// Check outcome
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Ok,
    Skipped,
    Failed,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Skipped => "skipped",
            CheckStatus::Failed => "failed",
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, CheckStatus::Failed)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result from running a check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    pub status: CheckStatus,
    pub text: String,
    pub duration_ms: u64,
}

impl CheckResult {
    pub fn new(meta: &CheckMeta, status: CheckStatus, text: impl Into<String>) -> Self {
        Self {
            id: meta.id.to_string(),
            name: meta.long_name.to_string(),
            status,
            text: text.into(),
            duration_ms: 0,
        }
    }

    pub fn skipped(meta: &CheckMeta, reason: impl Into<String>) -> Self {
        Self::new(meta, CheckStatus::Skipped, reason)
    }

    /// Stamp the time elapsed since `start`
    pub fn timed(mut self, start: Instant) -> Self {
        self.duration_ms = start.elapsed().as_millis() as u64;
        self
    }
}

/// Static description of a check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckMeta {
    /// Stable identifier, path-like (e.g. "core/system/reboot")
    pub id: &'static str,
    /// Human-readable name
    pub long_name: &'static str,
    /// One-line description
    pub description: &'static str,
    pub category: &'static str,
}

/// Everything a check may look at
#[derive(Debug, Clone)]
pub struct CheckContext {
    /// Snapshot root; "/" for the live system
    pub root: PathBuf,
    /// Reference instant for year-less log timestamps
    pub now: NaiveDateTime,
    pub config: AuditConfig,
}

impl CheckContext {
    pub fn new(config: AuditConfig, now: NaiveDateTime) -> Self {
        Self {
            root: config.root.clone(),
            now,
            config,
        }
    }

    /// Resolve a snapshot-relative path under the root
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        let relative = relative.strip_prefix("/").unwrap_or(relative);
        self.root.join(relative)
    }
}

/// Audit check interface
pub trait Check {
    fn meta(&self) -> &CheckMeta;
    fn run(&self, ctx: &CheckContext) -> Result<CheckResult>;

    fn id(&self) -> &str {
        self.meta().id
    }
}

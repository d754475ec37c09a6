//! Check profiles
//!
//! A profile file names a group of checks with include/exclude lines:
//!
//! ```text
//! # lines starting with '+' include, '-' exclude, the rest is ignored
//! +core/system
//! -core/system/slow
//! ```
//!
//! An identifier is selected when the include list is empty or one include
//! pattern is a substring of it, and no exclude pattern is.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::check::{CheckResult, CheckStatus};
use crate::error::{AuditError, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl Profile {
    /// Parse profile text
    pub fn parse(name: impl Into<String>, content: &str) -> Self {
        let mut profile = Profile {
            name: name.into(),
            ..Default::default()
        };
        for line in content.lines() {
            if let Some(pattern) = line.strip_prefix('+') {
                push_pattern(&mut profile.include, pattern);
            } else if let Some(pattern) = line.strip_prefix('-') {
                push_pattern(&mut profile.exclude, pattern);
            }
        }
        profile
    }

    /// Load a profile file; the profile is named after the file stem.
    /// An unreadable file is a usage error.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            AuditError::Config(format!("profile {}: {}", path.display(), e))
        })?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let profile = Self::parse(name, &content);
        debug!(
            "Loaded profile '{}': {} include, {} exclude",
            profile.name,
            profile.include.len(),
            profile.exclude.len()
        );
        Ok(profile)
    }

    pub fn matches(&self, id: &str) -> bool {
        let included = self.include.is_empty() || self.include.iter().any(|p| id.contains(p.as_str()));
        included && !self.exclude.iter().any(|p| id.contains(p.as_str()))
    }

    /// Filter a known set of identifiers, keeping their order
    pub fn select<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
        ids.into_iter().filter(|id| self.matches(id)).collect()
    }

    /// Merge the results of the profile's checks into one result
    pub fn aggregate(&self, results: &[CheckResult]) -> CheckResult {
        let components: Vec<&CheckResult> =
            results.iter().filter(|r| self.matches(&r.id)).collect();
        let text = components
            .iter()
            .map(|r| format!("{} [{}]: {}", r.id, r.status, r.text.trim()))
            .collect::<Vec<_>>()
            .join("\n");
        CheckResult {
            id: format!("profiles/{}", self.name),
            name: format!("Profiles: {}", self.name),
            status: CheckStatus::Ok,
            text,
            duration_ms: components.iter().map(|r| r.duration_ms).sum(),
        }
    }
}

fn push_pattern(list: &mut Vec<String>, raw: &str) {
    let pattern = raw.trim();
    if !pattern.is_empty() {
        list.push(pattern.to_string());
    }
}

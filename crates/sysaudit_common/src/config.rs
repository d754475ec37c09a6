//! sysaudit Configuration
//!
//! Configuration lives in /etc/sysaudit/config.toml. Every field has a
//! default, so a missing file or a partial file is fine. A file that exists
//! but does not parse is an error.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{AuditError, Result};
use crate::reboot::timestamp::MAX_CLOCK_SKEW_HOURS;

/// System configuration directory
pub const SYSTEM_CONFIG_DIR: &str = "/etc/sysaudit";
const CONFIG_FILE: &str = "config.toml";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Base path every snapshot file is resolved against
    #[serde(default = "default_root")]
    pub root: PathBuf,

    #[serde(default)]
    pub log: LogConfig,

    #[serde(default)]
    pub reboot: RebootSettings,
}

fn default_root() -> PathBuf {
    PathBuf::from("/")
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            log: LogConfig::default(),
            reboot: RebootSettings::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Reboot check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RebootSettings {
    /// Release identifier file, relative to the root
    #[serde(default = "default_release_file")]
    pub release_file: PathBuf,

    /// Substring the release file must contain for the check to apply
    #[serde(default = "default_release_marker")]
    pub release_marker: String,

    /// Syslog file, relative to the root
    #[serde(default = "default_messages_file")]
    pub messages_file: PathBuf,

    /// A start less than this many seconds after a stop is a clean reboot
    #[serde(default = "default_clean_window")]
    pub clean_window_secs: f64,

    /// Bootloader init slower than this is flagged
    #[serde(default = "default_bootloader_limit")]
    pub bootloader_init_limit_secs: f64,

    /// Downtime longer than this is flagged
    #[serde(default = "default_downtime_limit")]
    pub downtime_limit_secs: f64,

    /// How far past "now" a resolved log timestamp may land (clock skew, UTC)
    #[serde(default = "default_clock_skew")]
    pub clock_skew_hours: i64,
}

fn default_release_file() -> PathBuf {
    PathBuf::from("etc/redhat-release")
}

fn default_release_marker() -> String {
    "Red Hat Enterprise Linux Server release 7".to_string()
}

fn default_messages_file() -> PathBuf {
    PathBuf::from("var/log/messages")
}

fn default_clean_window() -> f64 {
    300.0 // 5 minutes
}

fn default_bootloader_limit() -> f64 {
    20.0
}

fn default_downtime_limit() -> f64 {
    600.0 // 10 minutes
}

fn default_clock_skew() -> i64 {
    12
}

impl Default for RebootSettings {
    fn default() -> Self {
        Self {
            release_file: default_release_file(),
            release_marker: default_release_marker(),
            messages_file: default_messages_file(),
            clean_window_secs: default_clean_window(),
            bootloader_init_limit_secs: default_bootloader_limit(),
            downtime_limit_secs: default_downtime_limit(),
            clock_skew_hours: default_clock_skew(),
        }
    }
}

impl RebootSettings {
    /// Reject values the check cannot work with
    pub fn validate(&self) -> std::result::Result<(), String> {
        if !(0..=MAX_CLOCK_SKEW_HOURS).contains(&self.clock_skew_hours) {
            return Err(format!(
                "reboot.clock_skew_hours must be between 0 and {}, got {}",
                MAX_CLOCK_SKEW_HOURS, self.clock_skew_hours
            ));
        }
        let limits = [
            ("clean_window_secs", self.clean_window_secs),
            ("bootloader_init_limit_secs", self.bootloader_init_limit_secs),
            ("downtime_limit_secs", self.downtime_limit_secs),
        ];
        for (name, value) in limits {
            if !value.is_finite() || value < 0.0 {
                return Err(format!(
                    "reboot.{} must be a finite, non-negative number, got {}",
                    name, value
                ));
            }
        }
        Ok(())
    }
}

/// Default config file location
pub fn config_path() -> PathBuf {
    Path::new(SYSTEM_CONFIG_DIR).join(CONFIG_FILE)
}

impl AuditConfig {
    /// Load from the system location, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        let system_path = config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }
        debug!("No config at {}, using defaults", system_path.display());
        Ok(Self::default())
    }

    /// Load from an explicit path; the file must exist, parse and validate
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| AuditError::Config(format!("{}: {}", path.display(), e)))?;
        Self::parse_checked(&content)
            .map_err(|e| AuditError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse and validate TOML content
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_checked(content).map_err(AuditError::Config)
    }

    fn parse_checked(content: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(content).map_err(|e| e.to_string())?;
        config.reboot.validate()?;
        Ok(config)
    }
}

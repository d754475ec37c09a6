//! Error types for sysaudit.
//!
//! Anomalies found by a check are not errors: they come back as a failed
//! `CheckResult`. Everything here aborts the check that raised it.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Malformed timestamp in line {line:?}: {reason}")]
    MalformedTimestamp { line: String, reason: String },

    #[error("Cannot read log file {}: {source}", .path.display())]
    LogUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown check: {0}")]
    UnknownCheck(String),

    #[error("Check registered twice: {0}")]
    DuplicateCheck(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AuditError {
    /// Process exit code used by the CLI when this error ends a run
    pub fn exit_code(&self) -> i32 {
        match self {
            AuditError::UnknownCheck(_) | AuditError::Config(_) => 64,
            AuditError::DuplicateCheck(_) => 70,
            AuditError::MalformedTimestamp { .. } | AuditError::LogUnreadable { .. } => 2,
            AuditError::Io(_) => 2,
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

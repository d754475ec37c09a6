//! Exit codes for sysauditctl

use sysaudit_common::AuditError;

/// All checks ok or skipped
pub const EXIT_SUCCESS: i32 = 0;

/// At least one check reported a problem
pub const EXIT_CHECK_FAILED: i32 = 1;

/// A check could not complete (unreadable log, malformed timestamp, ...)
pub const EXIT_FATAL: i32 = 2;

/// Bad arguments, config or profile
pub const EXIT_USAGE: i32 = 64;

/// Exit code for an error that ended the run
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<AuditError>()
        .map(AuditError::exit_code)
        .unwrap_or(EXIT_FATAL)
}

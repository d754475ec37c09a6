//! sysaudit Common - checks run against a frozen system snapshot
//!
//! Each check yields a status (ok, failed, skipped) and free text for the
//! reporting layer. The reboot check reconstructs shutdown, bootloader and
//! startup events from the syslog.

pub mod check;
pub mod config;
pub mod error;
pub mod profile;
pub mod reboot;
pub mod registry;
pub mod release;

pub use check::{Check, CheckContext, CheckMeta, CheckResult, CheckStatus};
pub use config::AuditConfig;
pub use error::{AuditError, Result};
pub use profile::Profile;
pub use reboot::RebootCheck;
pub use registry::{CheckRegistry, CheckRun};

//! Reboot Validation
//!
//! Guesses whether the latest reboots recorded in the syslog were clean or
//! not, and how long the machine spent down, in the bootloader and running.
//!
//! Pipeline: scanner (with bootloader context tracking) → reconciler (sort,
//! index, pair, classify) → anomaly rules → report text.

pub mod event;
pub mod reconcile;
pub mod report;
pub mod scanner;
pub mod timestamp;

pub use event::{Description, Event, EventContext, RebootStatus, ScannedEvent};
pub use reconcile::{Direction, MatchIndex, Reconciler};
pub use report::{AnomalyRules, Finding, FindingKind, RebootReport};
pub use scanner::ScanSession;
pub use timestamp::TimestampResolver;

use std::time::Instant;
use tracing::{debug, info};

use crate::check::{Check, CheckContext, CheckMeta, CheckResult};
use crate::error::Result;
use crate::release::{detect_release, ReleaseSupport};

pub const REBOOT_CHECK: CheckMeta = CheckMeta {
    id: "core/system/reboot",
    long_name: "Reboot Validation",
    description: "Guess whether the latest reboot(s) were clean or not",
    category: "system",
};

/// Reboot reconstruction check
#[derive(Debug, Default, Clone, Copy)]
pub struct RebootCheck;

impl RebootCheck {
    /// Scan, reconcile and evaluate. `None` when the log holds no reboot.
    pub fn analyze(&self, ctx: &CheckContext) -> Result<Option<RebootReport>> {
        let settings = &ctx.config.reboot;
        let log_path = ctx.resolve(&settings.messages_file);

        let resolver = TimestampResolver::new(ctx.now, settings.clock_skew_hours)?;
        debug!("Resolving log timestamps up to {}", resolver.limit());
        let mut session = ScanSession::new(resolver);
        session.scan_file(&log_path)?;
        let scanned = session.finish();
        if scanned.is_empty() {
            return Ok(None);
        }

        let events = Reconciler::new(settings.clean_window_secs).reconcile(&scanned);
        Ok(Some(RebootReport::evaluate(events, &AnomalyRules::from(settings))))
    }

    /// Release gate, then the analysis rendered as a check result
    fn outcome(&self, ctx: &CheckContext) -> Result<CheckResult> {
        let settings = &ctx.config.reboot;

        let release_path = ctx.resolve(&settings.release_file);
        match detect_release(&release_path, &settings.release_marker)? {
            ReleaseSupport::Supported => {}
            ReleaseSupport::Missing => {
                return Ok(CheckResult::skipped(
                    &REBOOT_CHECK,
                    "Non Red Hat system, skipping",
                ));
            }
            ReleaseSupport::Unsupported(release) => {
                debug!("Unsupported release: {}", release);
                return Ok(CheckResult::skipped(
                    &REBOOT_CHECK,
                    "Only works on Red Hat Enterprise Linux 7 or greater, skipping",
                ));
            }
        }

        let result = match self.analyze(ctx)? {
            None => CheckResult::skipped(&REBOOT_CHECK, "No reboot found"),
            Some(report) => {
                info!(
                    "Reboot check: {} events, {} problem(s)",
                    report.events.len(),
                    report.problem_count()
                );
                CheckResult::new(&REBOOT_CHECK, report.status(), report.render())
            }
        };
        Ok(result)
    }
}

impl Check for RebootCheck {
    fn meta(&self) -> &CheckMeta {
        &REBOOT_CHECK
    }

    fn run(&self, ctx: &CheckContext) -> Result<CheckResult> {
        let start = Instant::now();
        Ok(self.outcome(ctx)?.timed(start))
    }
}

//! Syslog scanner for reboot canaries
//!
//! One forward pass over the log. Three canary markers are recognized, first
//! match wins:
//! - "... Journal stopped": journald went down (stop)
//! - "... Journal started": journald came up (start), ignored while a
//!   bootloader span is open
//! - "... kernel: Command line: ...": the kernel just booted (bootloader start)
//!
//! The journald stop that closes a bootloader span (initramfs switch-root) is
//! re-tagged as a bootloader event.

use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use super::event::{Description, EventContext, ScannedEvent};
use super::timestamp::TimestampResolver;
use crate::error::{AuditError, Result};

pub const JOURNAL_STOPPED: &str = " Journal stopped";
pub const JOURNAL_STARTED: &str = " Journal started";
pub const KERNEL_CMDLINE: &str = " kernel: Command line: ";

/// Which canary a line carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Canary {
    JournalStopped,
    JournalStarted,
    KernelCommandLine,
}

/// Classify a line (already stripped of trailing whitespace)
pub fn classify(line: &str) -> Option<Canary> {
    if line.ends_with(JOURNAL_STOPPED) {
        Some(Canary::JournalStopped)
    } else if line.ends_with(JOURNAL_STARTED) {
        Some(Canary::JournalStarted)
    } else if line.contains(KERNEL_CMDLINE) {
        Some(Canary::KernelCommandLine)
    } else {
        None
    }
}

/// Scan state for one log.
///
/// Owns the event arena and the index of the bootloader start still waiting
/// for its closing stop.
#[derive(Debug)]
pub struct ScanSession {
    resolver: TimestampResolver,
    events: Vec<ScannedEvent>,
    open_bootloader: Option<usize>,
}

impl ScanSession {
    pub fn new(resolver: TimestampResolver) -> Self {
        Self {
            resolver,
            events: Vec::new(),
            open_bootloader: None,
        }
    }

    pub fn events(&self) -> &[ScannedEvent] {
        &self.events
    }

    /// Arena index of the bootloader start awaiting its stop, if any
    pub fn open_bootloader(&self) -> Option<usize> {
        self.open_bootloader
    }

    fn push(&mut self, event: ScannedEvent) -> usize {
        self.events.push(event);
        self.events.len() - 1
    }

    /// Feed one line. Returns the arena index of the event it created.
    pub fn feed_line(&mut self, line: &str) -> Result<Option<usize>> {
        let line = line.trim_end();
        let canary = match classify(line) {
            Some(c) => c,
            None => return Ok(None),
        };

        match canary {
            Canary::JournalStopped => {
                let time = self.resolver.resolve(line)?;
                let idx = self.push(ScannedEvent::new(Description::Stop, time));
                if let Some(start_idx) = self.open_bootloader.take() {
                    trace!("Closing bootloader span opened at event {}", start_idx);
                    self.events[idx].context = Some(EventContext::Bootloader);
                }
                Ok(Some(idx))
            }
            Canary::JournalStarted => {
                if self.open_bootloader.is_some() {
                    return Ok(None);
                }
                let time = self.resolver.resolve(line)?;
                Ok(Some(self.push(ScannedEvent::new(Description::Start, time))))
            }
            Canary::KernelCommandLine => {
                let time = self.resolver.resolve(line)?;
                let idx = self.push(
                    ScannedEvent::new(Description::Start, time)
                        .with_context(EventContext::Bootloader),
                );
                self.open_bootloader = Some(idx);
                Ok(Some(idx))
            }
        }
    }

    /// Feed every line of `text`
    pub fn scan_text(&mut self, text: &str) -> Result<()> {
        for line in text.lines() {
            self.feed_line(line)?;
        }
        Ok(())
    }

    /// Read and scan a log file. Non-UTF-8 bytes are replaced, not fatal.
    pub fn scan_file(&mut self, path: &Path) -> Result<()> {
        let bytes = fs::read(path).map_err(|source| AuditError::LogUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let text = String::from_utf8_lossy(&bytes);
        self.scan_text(&text)?;
        debug!(
            "Scanned {} ({} bytes): {} reboot events",
            path.display(),
            bytes.len(),
            self.events.len()
        );
        Ok(())
    }

    pub fn finish(self) -> Vec<ScannedEvent> {
        self.events
    }
}

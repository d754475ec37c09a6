//! Reboot event model
//!
//! One event per matched log line. The scanner produces `ScannedEvent`s whose
//! context may still be unknown; the reconciler turns them into `Event`s with a
//! resolved context and fills in status and durations.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Which side of a transition the line marks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Description {
    Start,
    Stop,
}

impl Description {
    pub fn as_str(&self) -> &'static str {
        match self {
            Description::Start => "start",
            Description::Stop => "stop",
        }
    }
}

/// Where the transition happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventContext {
    /// Firmware hand-off until the kernel re-initializes logging
    Bootloader,
    OperatingSystem,
}

impl EventContext {
    /// Short label used in the report table
    pub fn as_str(&self) -> &'static str {
        match self {
            EventContext::Bootloader => "bootloader",
            EventContext::OperatingSystem => "os",
        }
    }
}

/// Reboot classification, meaningful on OS starts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RebootStatus {
    #[default]
    Unresolved,
    Clean,
    Hard,
}

impl RebootStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RebootStatus::Unresolved => "-",
            RebootStatus::Clean => "clean",
            RebootStatus::Hard => "hard",
        }
    }
}

/// Event as emitted by the scanner
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedEvent {
    pub description: Description,
    pub time: NaiveDateTime,
    /// `None` until the context resolver (or the default) decides
    pub context: Option<EventContext>,
}

impl ScannedEvent {
    pub fn new(description: Description, time: NaiveDateTime) -> Self {
        Self {
            description,
            time,
            context: None,
        }
    }

    pub fn with_context(mut self, context: EventContext) -> Self {
        self.context = Some(context);
        self
    }
}

/// Reconciled event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub description: Description,
    pub time: NaiveDateTime,
    pub context: EventContext,
    pub status: RebootStatus,
    /// Position after the chronological sort; zero-based, contiguous
    pub sequence_index: usize,
    /// Seconds since the matching stop (starts only)
    pub duration_down: f64,
    /// Seconds the bootloader took (bootloader stops only)
    pub duration_bootloader_init: f64,
    /// Seconds the OS ran before this stop (OS stops only)
    pub duration_os_up: f64,
}

impl Event {
    /// Resolve a scanned event; untouched contexts default to the OS
    pub fn from_scanned(scanned: &ScannedEvent, sequence_index: usize) -> Self {
        Self {
            description: scanned.description,
            time: scanned.time,
            context: scanned.context.unwrap_or(EventContext::OperatingSystem),
            status: RebootStatus::Unresolved,
            sequence_index,
            duration_down: 0.0,
            duration_bootloader_init: 0.0,
            duration_os_up: 0.0,
        }
    }

    pub fn key(&self) -> (EventContext, Description) {
        (self.context, self.description)
    }

    pub fn is(&self, context: EventContext, description: Description) -> bool {
        self.context == context && self.description == description
    }
}

/// Fractional seconds from `earlier` to `later`
pub fn seconds_between(earlier: NaiveDateTime, later: NaiveDateTime) -> f64 {
    let delta = later - earlier;
    delta.num_milliseconds() as f64 / 1000.0
}

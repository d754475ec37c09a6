//! Chronological reconciliation of reboot events
//!
//! Sorts scanned events by time, numbers them, then walks them once in order:
//! - os stop: the immediate next start gets its downtime, and `clean` when it
//!   came quickly; the stop gets the uptime since the nearest earlier os start
//! - bootloader stop right after a bootloader start: bootloader init time
//! - os start: downtime since the nearest earlier os stop; `hard` when there is
//!   no such stop or it is too old
//!
//! The hard rule runs after the clean rule, so it is the one observed if both
//! ever apply to the same start.

use std::collections::HashMap;
use tracing::debug;

use super::event::{seconds_between, Description, Event, EventContext, RebootStatus, ScannedEvent};

/// Search direction for `MatchIndex::find`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Backward,
    Forward,
}

/// Per-(context, description) ordered lists of sequence indices
#[derive(Debug, Default)]
pub struct MatchIndex {
    by_key: HashMap<(EventContext, Description), Vec<usize>>,
}

impl MatchIndex {
    pub fn build(events: &[Event]) -> Self {
        let mut by_key: HashMap<_, Vec<usize>> = HashMap::new();
        for event in events {
            by_key.entry(event.key()).or_default().push(event.sequence_index);
        }
        Self { by_key }
    }

    /// Nearest index strictly before (backward) or after (forward) `from`
    /// whose event has the given context and description.
    pub fn find(
        &self,
        context: EventContext,
        description: Description,
        from: usize,
        direction: Direction,
    ) -> Option<usize> {
        let list = self.by_key.get(&(context, description))?;
        match direction {
            Direction::Backward => {
                let pos = list.partition_point(|&i| i < from);
                pos.checked_sub(1).map(|p| list[p])
            }
            Direction::Forward => {
                let pos = list.partition_point(|&i| i <= from);
                list.get(pos).copied()
            }
        }
    }
}

/// Pairs and classifies events
#[derive(Debug, Clone, Copy)]
pub struct Reconciler {
    clean_window_secs: f64,
}

impl Default for Reconciler {
    fn default() -> Self {
        Self {
            clean_window_secs: 300.0,
        }
    }
}

impl Reconciler {
    pub fn new(clean_window_secs: f64) -> Self {
        Self { clean_window_secs }
    }

    /// Sort, index and classify. Pure: the same input gives the same output.
    pub fn reconcile(&self, scanned: &[ScannedEvent]) -> Vec<Event> {
        let mut order: Vec<&ScannedEvent> = scanned.iter().collect();
        // stable: events with equal times keep scan order
        order.sort_by_key(|e| e.time);

        let mut events: Vec<Event> = order
            .into_iter()
            .enumerate()
            .map(|(idx, scanned)| Event::from_scanned(scanned, idx))
            .collect();

        let index = MatchIndex::build(&events);
        for i in 0..events.len() {
            match events[i].key() {
                (EventContext::OperatingSystem, Description::Stop) => {
                    self.on_os_stop(&mut events, &index, i)
                }
                (EventContext::Bootloader, Description::Stop) => on_bootloader_stop(&mut events, i),
                (EventContext::OperatingSystem, Description::Start) => {
                    self.on_os_start(&mut events, &index, i)
                }
                (EventContext::Bootloader, Description::Start) => {}
            }
        }

        let hard = events.iter().filter(|e| e.status == RebootStatus::Hard).count();
        let clean = events.iter().filter(|e| e.status == RebootStatus::Clean).count();
        debug!(
            "Reconciled {} events: {} clean, {} hard",
            events.len(),
            clean,
            hard
        );
        events
    }

    fn on_os_stop(&self, events: &mut [Event], index: &MatchIndex, i: usize) {
        let stop_time = events[i].time;
        if let Some(next) = events.get_mut(i + 1) {
            if next.description == Description::Start {
                let gap = seconds_between(stop_time, next.time);
                next.duration_down = gap;
                if gap < self.clean_window_secs {
                    next.status = RebootStatus::Clean;
                }
            }
        }

        let started = index.find(
            EventContext::OperatingSystem,
            Description::Start,
            i,
            Direction::Backward,
        );
        if let Some(m) = started {
            events[i].duration_os_up = seconds_between(events[m].time, stop_time);
        }
    }

    fn on_os_start(&self, events: &mut [Event], index: &MatchIndex, i: usize) {
        let stopped = index.find(
            EventContext::OperatingSystem,
            Description::Stop,
            i,
            Direction::Backward,
        );
        match stopped {
            Some(m) => {
                let gap = seconds_between(events[m].time, events[i].time);
                events[i].duration_down = gap;
                if gap > self.clean_window_secs {
                    events[i].status = RebootStatus::Hard;
                }
            }
            None => events[i].status = RebootStatus::Hard,
        }
    }
}

fn on_bootloader_stop(events: &mut [Event], i: usize) {
    if i == 0 || !events[i - 1].is(EventContext::Bootloader, Description::Start) {
        return;
    }
    events[i].duration_bootloader_init = seconds_between(events[i - 1].time, events[i].time);
}

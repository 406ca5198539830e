//! Read-only aggregation over a plant's event log.
//!
//! Events reference phases weakly: a `phase_id` may point at a phase that
//! was since deleted, and every helper here tolerates that. Nothing in the
//! timeline math depends on events; these exist for display.

use jiff::Timestamp;
use serde::Serialize;

use crate::models::{Event, EventKind};
use crate::timeline::days_between;

/// Events linked to the given phase, in log order.
pub fn for_phase(events: &[Event], phase_id: u64) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.phase_id == Some(phase_id))
        .collect()
}

/// Events of one kind, in log order.
pub fn of_kind(events: &[Event], kind: EventKind) -> Vec<&Event> {
    events.iter().filter(|event| event.kind == kind).collect()
}

/// Events whose timestamp falls in `[from, to)`.
pub fn in_range(events: &[Event], from: Timestamp, to: Timestamp) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.timestamp >= from && event.timestamp < to)
        .collect()
}

/// Whole days since the most recent event of `kind`, or `None` if the log
/// has none. Clamped to zero for future-dated events.
pub fn days_since_last(events: &[Event], kind: EventKind, now: Timestamp) -> Option<i64> {
    events
        .iter()
        .filter(|event| event.kind == kind)
        .map(|event| event.timestamp)
        .max()
        .map(|last| days_between(last, now).max(0))
}

/// Per-kind event counts over one trailing window.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct KindCounts {
    pub watering: u32,
    pub feeding: u32,
    pub observation: u32,
    pub training: u32,
    pub harvest: u32,
    pub transplant: u32,
    pub custom: u32,
}

impl KindCounts {
    fn bump(&mut self, kind: EventKind) {
        let slot = match kind {
            EventKind::Watering => &mut self.watering,
            EventKind::Feeding => &mut self.feeding,
            EventKind::Observation => &mut self.observation,
            EventKind::Training => &mut self.training,
            EventKind::Harvest => &mut self.harvest,
            EventKind::Transplant => &mut self.transplant,
            EventKind::Custom => &mut self.custom,
        };
        *slot += 1;
    }

    pub fn total(&self) -> u32 {
        self.watering
            + self.feeding
            + self.observation
            + self.training
            + self.harvest
            + self.transplant
            + self.custom
    }
}

/// Trailing 7- and 30-day activity counts.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ActivitySummary {
    pub last_7_days: KindCounts,
    pub last_30_days: KindCounts,
}

/// Count events per kind over the trailing 7- and 30-day windows ending at
/// `now`. Future-dated events are outside both windows.
pub fn activity_summary(events: &[Event], now: Timestamp) -> ActivitySummary {
    let mut summary = ActivitySummary::default();
    for event in events {
        if event.timestamp > now {
            continue;
        }
        let age_days = days_between(event.timestamp, now);
        if age_days < 30 {
            summary.last_30_days.bump(event.kind);
            if age_days < 7 {
                summary.last_7_days.bump(event.kind);
            }
        }
    }
    summary
}

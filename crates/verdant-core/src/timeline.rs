//! The phase timeline engine.
//!
//! A pure computation over an ordered phase sequence and a reference
//! instant. Given `(phases, now)` it derives, per phase, the temporal and
//! progress status, plus plant-level summary metrics. It also provides the
//! pure mutation helpers (start-date edit, advance, reorder, insert,
//! delete) that every caller must route phase changes through.
//!
//! # The current-phase rule
//!
//! The current phase is the **last** phase in sequence order whose
//! `start_date` is set — not the first unfinished one, since a phase can be
//! started out of order for corrections. If no phase has a start date there
//! is no current phase. This is the single source of truth; the cached
//! `is_active`/`is_completed` flags on [`PhaseInstance`] are rewritten from
//! this rule by every mutation helper and are never read back as truth.
//!
//! # Purity
//!
//! Nothing here performs I/O or holds state beyond its inputs. Every
//! mutation helper returns a **new** phase sequence; callers own
//! read-modify-write atomicity against their store.

use jiff::{SignedDuration, Timestamp};
use serde::Serialize;
use thiserror::Error;

use crate::models::PhaseInstance;

/// Seconds in a civil day, the granularity all timeline math works at.
pub const SECONDS_PER_DAY: i64 = 86_400;

/// A phase mutation rejected by a timeline rule.
///
/// These are caller-recoverable validation outcomes, not failures: the
/// caller must surface the message and leave the sequence untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseRuleViolation {
    /// Candidate start date is before a started predecessor
    #[error(
        "start date {candidate} is before phase '{bound_phase}' started ({bound}); \
         a phase cannot start before the phase before it"
    )]
    StartDateTooEarly {
        candidate: Timestamp,
        bound: Timestamp,
        bound_phase: String,
    },
    /// Candidate start date is after a started successor
    #[error(
        "start date {candidate} is after phase '{bound_phase}' started ({bound}); \
         a phase cannot start after a later phase that has already started"
    )]
    StartDateTooLate {
        candidate: Timestamp,
        bound: Timestamp,
        bound_phase: String,
    },
    /// Deletion of a phase with a recorded start date
    #[error("phase '{name}' has a recorded start date and cannot be deleted")]
    DeleteStarted { name: String },
    /// Deletion of the sole remaining phase
    #[error("a plant must keep at least one phase")]
    DeleteLastPhase,
    /// A phase ID that does not occur in the sequence
    #[error("phase with ID {id} is not part of this plant's sequence")]
    UnknownPhase { id: u64 },
    /// A reorder that is not a permutation of the sequence
    #[error("new order must contain each of the plant's phase IDs exactly once")]
    InvalidOrder,
    /// An advance with no later phase to start
    #[error("there is no later phase to advance into")]
    NothingToAdvance,
}

/// Temporal standing of one phase relative to the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseStanding {
    /// Strictly before the current phase in sequence order
    Completed,
    /// The current phase
    Current,
    /// After the current phase (or nothing started yet)
    Upcoming,
}

/// Derived per-phase record of the timeline.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineEntry {
    /// ID of the phase this entry describes
    pub phase_id: u64,
    /// Name of the phase
    pub name: String,
    /// Standing relative to the current phase
    pub standing: PhaseStanding,
    /// Whole days actually spent in the phase (0 for upcoming phases)
    pub days_elapsed: i64,
    /// Current phase whose elapsed time exceeds its maximum duration
    pub is_overdue: bool,
    /// Progress through the phase: completed 100, upcoming 0, current
    /// `min(elapsed / duration_max * 100, 100)`
    pub progress_percentage: f64,
    /// Projected start, assuming every phase runs its maximum duration
    pub estimated_start: Timestamp,
    /// Projected end under the same assumption
    pub estimated_end: Timestamp,
}

/// Plant-level summary metrics derived from the whole sequence.
#[derive(Debug, Clone, Serialize)]
pub struct TimelineSummary {
    /// Overall progress in percent across all phases
    pub total_progress: f64,
    /// Days until the projected end of the last harvest-tagged phase,
    /// clamped to zero; `None` when no phase carries the harvest tag
    pub days_until_harvest: Option<i64>,
    /// Days until the current phase satisfies its minimum duration,
    /// clamped to zero; `None` when no phase has started
    pub days_until_next_phase: Option<i64>,
    /// Whether a current phase exists, is not the last phase, and has
    /// satisfied its minimum dwell time
    pub can_advance: bool,
}

/// The computed timeline: per-phase entries plus summary metrics.
#[derive(Debug, Clone)]
pub struct PhaseTimeline {
    entries: Vec<TimelineEntry>,
    summary: TimelineSummary,
    current_index: Option<usize>,
}

impl PhaseTimeline {
    /// Compute the timeline for an ordered phase sequence at `now`.
    pub fn compute(phases: &[PhaseInstance], now: Timestamp) -> Self {
        let current_index = current_phase_index(phases);

        let mut entries = Vec::with_capacity(phases.len());

        // Projection cursor: starts at the first recorded start date (or
        // `now` if nothing started), then walks forward accumulating each
        // phase's maximum duration. Recorded dates re-anchor the cursor.
        let mut cursor = phases
            .iter()
            .find_map(|phase| phase.start_date)
            .unwrap_or(now);

        for (index, phase) in phases.iter().enumerate() {
            let standing = match current_index {
                Some(current) if index < current => PhaseStanding::Completed,
                Some(current) if index == current => PhaseStanding::Current,
                _ => PhaseStanding::Upcoming,
            };

            let days_elapsed = match (standing, phase.start_date) {
                (PhaseStanding::Current, Some(start)) => days_between(start, now).max(0),
                (PhaseStanding::Completed, Some(start)) => {
                    // Actual dwell time: until the next phase started, or
                    // until now if the next phase has no date yet.
                    let end = phases
                        .get(index + 1)
                        .and_then(|next| next.start_date)
                        .unwrap_or(now);
                    days_between(start, end).max(0)
                }
                _ => 0,
            };

            let is_overdue = standing == PhaseStanding::Current
                && days_elapsed > i64::from(phase.duration_max);

            let progress_percentage = match standing {
                PhaseStanding::Completed => 100.0,
                PhaseStanding::Upcoming => 0.0,
                PhaseStanding::Current => {
                    if phase.duration_max == 0 {
                        100.0
                    } else {
                        (days_elapsed as f64 / f64::from(phase.duration_max) * 100.0).min(100.0)
                    }
                }
            };

            let estimated_start = phase.start_date.unwrap_or(cursor);
            let estimated_end = add_days(estimated_start, i64::from(phase.duration_max));
            cursor = estimated_end;

            entries.push(TimelineEntry {
                phase_id: phase.id,
                name: phase.name.clone(),
                standing,
                days_elapsed,
                is_overdue,
                progress_percentage,
                estimated_start,
                estimated_end,
            });
        }

        let summary = Self::summarize(phases, &entries, current_index, now);

        Self {
            entries,
            summary,
            current_index,
        }
    }

    fn summarize(
        phases: &[PhaseInstance],
        entries: &[TimelineEntry],
        current_index: Option<usize>,
        now: Timestamp,
    ) -> TimelineSummary {
        let total = phases.len();

        let total_progress = match (total, current_index) {
            (0, _) => 0.0,
            (_, None) => 0.0,
            (_, Some(current)) => {
                let completed = current as f64;
                let current_progress = entries[current].progress_percentage / 100.0;
                (completed + current_progress) / total as f64 * 100.0
            }
        };

        // The harvest estimate anchors on the last tagged phase so that a
        // sequence with several tagged stages projects to the final one.
        let days_until_harvest = entries
            .iter()
            .zip(phases)
            .filter(|(_, phase)| phase.counts_toward_harvest)
            .next_back()
            .map(|(entry, _)| days_between(now, entry.estimated_end).max(0));

        let (days_until_next_phase, can_advance) = match current_index {
            None => (None, false),
            Some(current) => {
                let elapsed = entries[current].days_elapsed;
                let min = i64::from(phases[current].duration_min);
                let remaining = (min - elapsed).max(0);
                let advanceable = current + 1 < total && elapsed >= min;
                (Some(remaining), advanceable)
            }
        };

        TimelineSummary {
            total_progress,
            days_until_harvest,
            days_until_next_phase,
            can_advance,
        }
    }

    /// Derived per-phase records, in sequence order.
    pub fn entries(&self) -> &[TimelineEntry] {
        &self.entries
    }

    /// Plant-level summary metrics.
    pub fn summary(&self) -> &TimelineSummary {
        &self.summary
    }

    /// Index of the current phase, if any phase has started.
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// Entry for the current phase, if any phase has started.
    pub fn current_entry(&self) -> Option<&TimelineEntry> {
        self.current_index.map(|index| &self.entries[index])
    }
}

/// Index of the last phase in sequence order with a recorded start date.
pub fn current_phase_index(phases: &[PhaseInstance]) -> Option<usize> {
    phases.iter().rposition(|phase| phase.start_date.is_some())
}

/// ID of the current phase, used to stamp new events.
pub fn current_phase_id(phases: &[PhaseInstance]) -> Option<u64> {
    current_phase_index(phases).map(|index| phases[index].id)
}

/// Validate a candidate start date for the phase at `index`.
///
/// The nearest preceding phase with a start date sets the lower bound and
/// the nearest following one the upper bound. Clearing a date (`None`) is
/// always valid. An index at or past the end is treated as a position
/// after the last phase, so every started phase bounds it from below.
pub fn validate_phase_date(
    phases: &[PhaseInstance],
    index: usize,
    candidate: Option<Timestamp>,
) -> Result<(), PhaseRuleViolation> {
    let Some(candidate) = candidate else {
        return Ok(());
    };

    let lower = phases[..index.min(phases.len())]
        .iter()
        .rev()
        .find(|phase| phase.start_date.is_some());
    if let Some(bound_phase) = lower {
        let bound = bound_phase.start_date.unwrap_or(candidate);
        if candidate < bound {
            return Err(PhaseRuleViolation::StartDateTooEarly {
                candidate,
                bound,
                bound_phase: bound_phase.name.clone(),
            });
        }
    }

    let upper = phases
        .get(index.saturating_add(1)..)
        .unwrap_or_default()
        .iter()
        .find(|phase| phase.start_date.is_some());
    if let Some(bound_phase) = upper {
        let bound = bound_phase.start_date.unwrap_or(candidate);
        if candidate > bound {
            return Err(PhaseRuleViolation::StartDateTooLate {
                candidate,
                bound,
                bound_phase: bound_phase.name.clone(),
            });
        }
    }

    Ok(())
}

/// Return a new sequence with one phase's start date replaced.
///
/// The candidate is checked against the neighbor bounds first; derived
/// flags are recomputed for the whole sequence, since changing one date can
/// shift which phase is current.
pub fn with_start_date(
    phases: &[PhaseInstance],
    phase_id: u64,
    date: Option<Timestamp>,
) -> Result<Vec<PhaseInstance>, PhaseRuleViolation> {
    let index = index_of(phases, phase_id)?;
    validate_phase_date(phases, index, date)?;

    let mut next = phases.to_vec();
    next[index].start_date = date;
    refresh_flags(&mut next);
    Ok(next)
}

/// Return a new sequence with the phase after the current one started at
/// `now`.
///
/// This is the unconditional variant: it does not check the minimum dwell
/// time. Callers that want gating consult [`TimelineSummary::can_advance`]
/// first. With nothing started yet, the first phase is started.
pub fn advanced(
    phases: &[PhaseInstance],
    now: Timestamp,
) -> Result<Vec<PhaseInstance>, PhaseRuleViolation> {
    let next_index = match current_phase_index(phases) {
        Some(current) => current + 1,
        None => 0,
    };
    if next_index >= phases.len() {
        return Err(PhaseRuleViolation::NothingToAdvance);
    }

    let mut next = phases.to_vec();
    next[next_index].start_date = Some(now);
    refresh_flags(&mut next);
    Ok(next)
}

/// Return a new sequence rearranged to the given ID order.
///
/// Reordering never touches any start date; it only changes which index is
/// current and therefore which phases count as completed.
pub fn reordered(
    phases: &[PhaseInstance],
    order: &[u64],
) -> Result<Vec<PhaseInstance>, PhaseRuleViolation> {
    if order.len() != phases.len() {
        return Err(PhaseRuleViolation::InvalidOrder);
    }

    let mut next = Vec::with_capacity(phases.len());
    for &id in order {
        let phase = phases
            .iter()
            .find(|phase| phase.id == id)
            .ok_or(PhaseRuleViolation::InvalidOrder)?;
        if next.iter().any(|p: &PhaseInstance| p.id == id) {
            return Err(PhaseRuleViolation::InvalidOrder);
        }
        next.push(phase.clone());
    }

    refresh_flags(&mut next);
    Ok(next)
}

/// Return a new sequence with an unstarted phase inserted at `position`.
///
/// Positions past the end append. The engine places no restriction on the
/// position; any higher-level placement policy belongs to the caller.
pub fn with_inserted(
    phases: &[PhaseInstance],
    phase: PhaseInstance,
    position: usize,
) -> Vec<PhaseInstance> {
    let mut next = phases.to_vec();
    let position = position.min(next.len());
    next.insert(position, phase);
    refresh_flags(&mut next);
    next
}

/// Return a new sequence with one phase removed.
///
/// Hard-rejected for a phase with a recorded start date (a started phase's
/// history is never discarded) and for the sole remaining phase.
pub fn without_phase(
    phases: &[PhaseInstance],
    phase_id: u64,
) -> Result<Vec<PhaseInstance>, PhaseRuleViolation> {
    let index = index_of(phases, phase_id)?;

    if phases[index].start_date.is_some() {
        return Err(PhaseRuleViolation::DeleteStarted {
            name: phases[index].name.clone(),
        });
    }
    if phases.len() == 1 {
        return Err(PhaseRuleViolation::DeleteLastPhase);
    }

    let mut next = phases.to_vec();
    next.remove(index);
    refresh_flags(&mut next);
    Ok(next)
}

/// Rewrite positions and the cached `is_active`/`is_completed` flags from
/// the current-phase rule.
pub fn refresh_flags(phases: &mut [PhaseInstance]) {
    let current = current_phase_index(phases);
    for (index, phase) in phases.iter_mut().enumerate() {
        phase.position = index as u32;
        phase.is_active = current == Some(index);
        phase.is_completed = current.is_some_and(|c| index < c);
    }
}

/// Whole days from `a` to `b`, truncating toward zero.
pub fn days_between(a: Timestamp, b: Timestamp) -> i64 {
    b.duration_since(a).as_secs() / SECONDS_PER_DAY
}

fn add_days(timestamp: Timestamp, days: i64) -> Timestamp {
    timestamp
        .saturating_add(SignedDuration::from_secs(days * SECONDS_PER_DAY))
        .expect("saturating_add with SignedDuration is infallible")
}

fn index_of(phases: &[PhaseInstance], phase_id: u64) -> Result<usize, PhaseRuleViolation> {
    phases
        .iter()
        .position(|phase| phase.id == phase_id)
        .ok_or(PhaseRuleViolation::UnknownPhase { id: phase_id })
}

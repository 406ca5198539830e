//! Parameter structures for tracker operations
//!
//! Shared parameter structures usable from any interface (CLI today,
//! anything else tomorrow) without framework-specific derives. Interface
//! layers wrap these with their own derives (clap `Args` etc.) and convert
//! via `From`/`Into`; the [`Tracker`](crate::tracker::Tracker) methods
//! accept only these core types.
//!
//! Free-text fields like dates, lifecycles, and event kinds arrive as
//! strings and are parsed here in `validate()` methods, so every interface
//! gets identical validation and error messages.

use jiff::civil::Date;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, TrackerError};
use crate::models::{EventKind, LifecycleKind, PhaseTemplate};

/// Parse a date input: an RFC 3339 timestamp, or a plain `YYYY-MM-DD`
/// civil date taken as UTC midnight.
pub fn parse_date_input(field: &str, input: &str) -> Result<Timestamp> {
    if let Ok(timestamp) = input.parse::<Timestamp>() {
        return Ok(timestamp);
    }

    let date = input.parse::<Date>().map_err(|_| {
        TrackerError::invalid_input(
            field,
            format!("'{input}' is not a date (expected YYYY-MM-DD or an RFC 3339 timestamp)"),
        )
    })?;

    date.at(0, 0, 0, 0)
        .to_zoned(TimeZone::UTC)
        .map(|zoned| zoned.timestamp())
        .map_err(|e| TrackerError::invalid_input(field, e.to_string()))
}

/// Generic parameters for operations requiring just an ID.
///
/// Used for operations like show_plant, archive_plant, unarchive_plant,
/// delete_plant, delete_phase, delete_event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the resource to operate on
    pub id: u64,
}

/// Parameters for creating a new plant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatePlant {
    /// Display name of the plant (required)
    pub name: String,
    /// Optional strain name
    pub strain: Option<String>,
    /// Optional growing medium (soil, coco, hydro, ...)
    pub medium: Option<String>,
    /// Lifecycle kind: 'photoperiod' or 'autoflower'; defaults to
    /// photoperiod
    pub lifecycle: Option<String>,
    /// Strain-specific phase templates; empty uses the built-in defaults
    #[serde(default)]
    pub templates: Vec<PhaseTemplate>,
}

impl CreatePlant {
    /// Parse the lifecycle string.
    pub fn validate(&self) -> Result<LifecycleKind> {
        match &self.lifecycle {
            None => Ok(LifecycleKind::Photoperiod),
            Some(s) => LifecycleKind::from_str(s).map_err(|_| {
                TrackerError::invalid_input(
                    "lifecycle",
                    format!("Invalid lifecycle: {s}. Must be 'photoperiod' or 'autoflower'"),
                )
            }),
        }
    }
}

/// Parameters for listing plants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPlants {
    /// Whether to show archived plants instead of active ones
    #[serde(default)]
    pub archived: bool,
}

/// Parameters for setting or clearing a phase's start date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SetPhaseDate {
    /// Phase ID to update
    pub phase_id: u64,
    /// New start date; ignored when `clear` is set
    pub date: Option<String>,
    /// Clear the start date instead of setting one
    #[serde(default)]
    pub clear: bool,
}

impl SetPhaseDate {
    /// Resolve the date input to the timestamp to store.
    ///
    /// `clear` wins over `date`; a missing date with no `clear` flag is
    /// rejected rather than silently treated as clearing.
    pub fn validate(&self) -> Result<Option<Timestamp>> {
        if self.clear {
            return Ok(None);
        }
        match &self.date {
            Some(input) => parse_date_input("date", input).map(Some),
            None => Err(TrackerError::invalid_input(
                "date",
                "a date is required unless clearing",
            )),
        }
    }
}

/// Parameters for advancing a plant to its next phase.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Advance {
    /// Plant ID to advance
    pub plant_id: u64,
    /// Advance even if the current phase has not met its minimum duration
    #[serde(default)]
    pub force: bool,
}

/// Parameters for inserting a new phase into a plant's sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsertPhase {
    /// Plant ID to insert into
    pub plant_id: u64,
    /// Name of the new phase
    pub name: String,
    /// Minimum duration in days
    pub duration_min: u32,
    /// Maximum duration in days
    pub duration_max: u32,
    /// Optional description
    pub description: Option<String>,
    /// Whether the phase counts toward the harvest estimate
    #[serde(default)]
    pub counts_toward_harvest: bool,
    /// Position to insert at (0-indexed); past-the-end appends
    pub position: u32,
}

impl InsertPhase {
    /// Build and validate the template for the new phase.
    pub fn validate(&self) -> Result<PhaseTemplate> {
        let template = PhaseTemplate {
            name: self.name.clone(),
            duration_min: self.duration_min,
            duration_max: self.duration_max,
            description: self.description.clone(),
            counts_toward_harvest: self.counts_toward_harvest,
        };
        template.validate()?;
        Ok(template)
    }
}

/// Parameters for reordering a plant's phases.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReorderPhases {
    /// Plant ID whose phases to reorder
    pub plant_id: u64,
    /// Phase IDs in the new order; must name each phase exactly once
    pub order: Vec<u64>,
}

/// Parameters for recording a care event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordEvent {
    /// Plant ID the event belongs to
    pub plant_id: u64,
    /// Event kind: watering, feeding, observation, training, harvest,
    /// transplant, or custom
    pub kind: String,
    /// Optional free-form note
    pub note: Option<String>,
    /// Optional numeric amount (milliliters watered, grams fed, ...)
    pub amount: Option<f64>,
    /// Event time; defaults to now
    pub timestamp: Option<String>,
}

impl RecordEvent {
    /// Parse the kind and optional timestamp.
    pub fn validate(&self) -> Result<(EventKind, Option<Timestamp>)> {
        let kind = EventKind::from_str(&self.kind).map_err(|_| {
            TrackerError::invalid_input(
                "kind",
                format!(
                    "Invalid event kind: {}. Must be one of watering, feeding, observation, \
                     training, harvest, transplant, custom",
                    self.kind
                ),
            )
        })?;

        let timestamp = match &self.timestamp {
            Some(input) => Some(parse_date_input("timestamp", input)?),
            None => None,
        };

        Ok((kind, timestamp))
    }
}

/// Parameters for editing a recorded event.
///
/// Only the provided fields change; omitted fields keep their stored
/// values. The phase stamp is set at recording time and never edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateEvent {
    /// Event ID to update
    pub event_id: u64,
    /// New event kind
    pub kind: Option<String>,
    /// New free-form note
    pub note: Option<String>,
    /// New numeric amount
    pub amount: Option<f64>,
    /// New event time
    pub timestamp: Option<String>,
}

impl UpdateEvent {
    /// Parse the optional kind and timestamp; at least one field must be
    /// given.
    pub fn validate(&self) -> Result<(Option<EventKind>, Option<Timestamp>)> {
        if self.kind.is_none()
            && self.note.is_none()
            && self.amount.is_none()
            && self.timestamp.is_none()
        {
            return Err(TrackerError::invalid_input(
                "event_id",
                "nothing to update; provide a kind, note, amount, or timestamp",
            ));
        }

        let kind = match &self.kind {
            Some(s) => Some(EventKind::from_str(s).map_err(|_| {
                TrackerError::invalid_input("kind", format!("Invalid event kind: {s}"))
            })?),
            None => None,
        };

        let timestamp = match &self.timestamp {
            Some(input) => Some(parse_date_input("timestamp", input)?),
            None => None,
        };

        Ok((kind, timestamp))
    }
}

/// Parameters for listing a plant's events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListEvents {
    /// Plant ID whose events to list
    pub plant_id: u64,
    /// Limit to one event kind
    pub kind: Option<String>,
    /// Limit to events at or after this date
    pub since: Option<String>,
}

impl ListEvents {
    /// Parse the optional kind and since filters.
    pub fn validate(&self) -> Result<(Option<EventKind>, Option<Timestamp>)> {
        let kind = match &self.kind {
            Some(s) => Some(EventKind::from_str(s).map_err(|_| {
                TrackerError::invalid_input("kind", format!("Invalid event kind: {s}"))
            })?),
            None => None,
        };

        let since = match &self.since {
            Some(input) => Some(parse_date_input("since", input)?),
            None => None,
        };

        Ok((kind, since))
    }
}

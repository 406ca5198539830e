//! Data models for plants, phases, and care events.
//!
//! This module contains the core domain models of the Verdant cultivation
//! tracker. Each model implements Display for direct markdown formatting,
//! while collection- and operation-level formatting lives in the wrapper
//! types of the [`crate::display`] module.
//!
//! # Model overview
//!
//! - [`Plant`]: root aggregate owning an ordered phase sequence and a flat
//!   event list
//! - [`PhaseInstance`]: one stage of a plant's growth lifecycle, with an
//!   optional recorded start date and cached derived flags
//! - [`PhaseTemplate`]: immutable blueprint a phase is instantiated from
//! - [`Event`]: a timestamped care annotation with a weak phase reference
//!
//! The "current phase" of a plant is never stored; it is always re-derived
//! from the phase sequence by the timeline engine ([`crate::timeline`]).
//! The `is_active`/`is_completed` fields on [`PhaseInstance`] are persisted
//! caches that the engine rewrites on every phase mutation; readers must
//! treat them as display hints, not as the source of truth.

use std::{fmt, str::FromStr};

use jiff::{tz::TimeZone, Timestamp};
use serde::{Deserialize, Serialize};

/// Type-safe enumeration of plant statuses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlantStatus {
    /// Plant is actively tracked and visible
    #[default]
    Active,

    /// Plant is archived and hidden from normal views
    Archived,
}

impl FromStr for PlantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(PlantStatus::Active),
            "archived" => Ok(PlantStatus::Archived),
            _ => Err(format!("Invalid plant status: {s}")),
        }
    }
}

impl fmt::Display for PlantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl PlantStatus {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PlantStatus::Active => "active",
            PlantStatus::Archived => "archived",
        }
    }
}

/// Lifecycle kind a plant's default phase sequence is chosen by.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleKind {
    /// Light-cycle dependent flowering; the long default sequence
    #[default]
    Photoperiod,

    /// Age-triggered flowering; a shorter, tighter sequence
    Autoflower,
}

impl FromStr for LifecycleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photoperiod" | "photo" => Ok(LifecycleKind::Photoperiod),
            "autoflower" | "auto" => Ok(LifecycleKind::Autoflower),
            _ => Err(format!("Invalid lifecycle kind: {s}")),
        }
    }
}

impl fmt::Display for LifecycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl LifecycleKind {
    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleKind::Photoperiod => "photoperiod",
            LifecycleKind::Autoflower => "autoflower",
        }
    }
}

/// Immutable phase blueprint provided by a strain or the built-in defaults.
///
/// Templates belonging to one lifecycle are ordered; the order is the
/// declared growth sequence (e.g. Germination → Seedling → Vegetation).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseTemplate {
    /// Name of the growth stage
    pub name: String,

    /// Minimum expected duration in days (> 0)
    pub duration_min: u32,

    /// Maximum expected duration in days (>= duration_min)
    pub duration_max: u32,

    /// Optional care notes for the stage
    pub description: Option<String>,

    /// Marks the phase whose projected end is the harvest estimate.
    ///
    /// Explicit tag instead of matching on the phase name, so renaming a
    /// phase never changes harvest math.
    #[serde(default)]
    pub counts_toward_harvest: bool,
}

/// One stage of a specific plant's growth lifecycle.
///
/// Created from a [`PhaseTemplate`] when the plant is created, then
/// independently editable. A phase with a recorded `start_date` can never
/// be deleted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhaseInstance {
    /// Unique identifier, stable across reorders and edits
    pub id: u64,

    /// ID of the owning plant
    pub plant_id: u64,

    /// Name of the growth stage
    pub name: String,

    /// Minimum expected duration in days
    pub duration_min: u32,

    /// Maximum expected duration in days
    pub duration_max: u32,

    /// Optional care notes
    pub description: Option<String>,

    /// Harvest estimate tag, copied from the template
    #[serde(default)]
    pub counts_toward_harvest: bool,

    /// When this phase actually began; `None` means "not yet started"
    pub start_date: Option<Timestamp>,

    /// Cached "this is the current phase" flag (rewritten on mutation)
    #[serde(default)]
    pub is_active: bool,

    /// Cached "a later phase has started" flag (rewritten on mutation)
    #[serde(default)]
    pub is_completed: bool,

    /// Order of the phase within the plant's sequence (0-indexed)
    pub position: u32,

    /// Timestamp when the phase record was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the phase record was last updated (UTC)
    pub updated_at: Timestamp,
}

impl PhaseInstance {
    /// Status with a consistent icon for display.
    ///
    /// - `✓` completed (a later phase has started)
    /// - `➤` current
    /// - `○` not yet started
    pub fn status_icon(&self) -> &'static str {
        if self.is_active {
            "➤"
        } else if self.is_completed {
            "✓"
        } else {
            "○"
        }
    }
}

/// Type-safe enumeration of care event kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Plain watering
    Watering,
    /// Watering with nutrients
    Feeding,
    /// Free-form observation
    Observation,
    /// Training (topping, LST, defoliation, ...)
    Training,
    /// Harvest of plant material
    Harvest,
    /// Transplant into a new container or medium
    Transplant,
    /// Anything else
    Custom,
}

impl EventKind {
    /// All kinds, in display order.
    pub const ALL: [EventKind; 7] = [
        EventKind::Watering,
        EventKind::Feeding,
        EventKind::Observation,
        EventKind::Training,
        EventKind::Harvest,
        EventKind::Transplant,
        EventKind::Custom,
    ];

    /// Convert to database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Watering => "watering",
            EventKind::Feeding => "feeding",
            EventKind::Observation => "observation",
            EventKind::Training => "training",
            EventKind::Harvest => "harvest",
            EventKind::Transplant => "transplant",
            EventKind::Custom => "custom",
        }
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "watering" | "water" => Ok(EventKind::Watering),
            "feeding" | "feed" => Ok(EventKind::Feeding),
            "observation" | "note" => Ok(EventKind::Observation),
            "training" => Ok(EventKind::Training),
            "harvest" => Ok(EventKind::Harvest),
            "transplant" => Ok(EventKind::Transplant),
            "custom" => Ok(EventKind::Custom),
            _ => Err(format!("Invalid event kind: {s}")),
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A timestamped care annotation on a plant.
///
/// Events live on the plant's flat list, not inside phases. The `phase_id`
/// is a weak back-reference stamped at creation time; deleting a phase
/// leaves it dangling, and all read paths tolerate that.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Unique identifier for the event
    pub id: u64,

    /// ID of the plant the event belongs to
    pub plant_id: u64,

    /// Phase that was current when the event was recorded, if any
    pub phase_id: Option<u64>,

    /// Kind of care event
    pub kind: EventKind,

    /// Free-form note
    pub note: Option<String>,

    /// Kind-specific amount (ml of water, g of nutrients, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    /// When the care action happened (UTC)
    pub timestamp: Timestamp,

    /// Timestamp when the event record was created (UTC)
    pub created_at: Timestamp,
}

/// Represents a complete plant with metadata, phases, and events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plant {
    /// Unique identifier for the plant
    pub id: u64,

    /// Display name of the plant
    pub name: String,

    /// Strain name, if known
    pub strain: Option<String>,

    /// Growing medium (soil, coco, hydro, ...)
    pub medium: Option<String>,

    /// Lifecycle kind the default phases were chosen by
    #[serde(default)]
    pub lifecycle: LifecycleKind,

    /// Status of the plant (active or archived)
    #[serde(default)]
    pub status: PlantStatus,

    /// Timestamp when the plant was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp when the plant was last modified (UTC)
    pub updated_at: Timestamp,

    /// Ordered phase sequence (lazy-loaded by default)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub phases: Vec<PhaseInstance>,

    /// Flat event list (lazy-loaded by default)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub events: Vec<Event>,
}

/// Filter options for querying plants.
#[derive(Debug, Clone, Default)]
pub struct PlantFilter {
    /// Filter by plant name (case-insensitive partial match)
    pub name_contains: Option<String>,

    /// Filter by plant status (active/archived).
    /// If None, defaults to showing only active plants
    pub status: Option<PlantStatus>,

    /// Show all plants regardless of status
    pub include_archived: bool,
}

impl From<&crate::params::ListPlants> for PlantFilter {
    fn from(params: &crate::params::ListPlants) -> Self {
        if params.archived {
            Self {
                status: Some(PlantStatus::Archived),
                include_archived: true,
                ..Default::default()
            }
        } else {
            Self {
                status: Some(PlantStatus::Active),
                include_archived: false,
                ..Default::default()
            }
        }
    }
}

/// Summary information about a plant with phase statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlantSummary {
    /// Plant ID
    pub id: u64,
    /// Display name of the plant
    pub name: String,
    /// Strain name, if known
    pub strain: Option<String>,
    /// Plant status
    pub status: PlantStatus,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of phases
    pub total_phases: u32,
    /// Number of phases with a recorded start date
    pub started_phases: u32,
    /// Name of the cached current phase, if any
    pub current_phase: Option<String>,
}

impl From<&Plant> for PlantSummary {
    fn from(plant: &Plant) -> Self {
        let total_phases = plant.phases.len() as u32;
        let started_phases = plant
            .phases
            .iter()
            .filter(|phase| phase.start_date.is_some())
            .count() as u32;
        let current_phase = plant
            .phases
            .iter()
            .rev()
            .find(|phase| phase.start_date.is_some())
            .map(|phase| phase.name.clone());

        Self {
            id: plant.id,
            name: plant.name.clone(),
            strain: plant.strain.clone(),
            status: plant.status,
            created_at: plant.created_at,
            updated_at: plant.updated_at,
            total_phases,
            started_phases,
            current_phase,
        }
    }
}

impl fmt::Display for Plant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {}. {}", self.id, self.name)?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- Status: {}", self.status.as_str())?;
        writeln!(f, "- Lifecycle: {}", self.lifecycle.as_str())?;
        if let Some(strain) = &self.strain {
            writeln!(f, "- Strain: {strain}")?;
        }
        if let Some(medium) = &self.medium {
            writeln!(f, "- Medium: {medium}")?;
        }
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if !self.phases.is_empty() {
            writeln!(f, "\n## Phases")?;
            writeln!(f)?;
            for phase in &self.phases {
                write!(f, "{phase}")?;
            }
        } else {
            writeln!(f, "\nNo phases on this plant.")?;
        }

        Ok(())
    }
}

impl PhaseInstance {
    fn fmt_phase(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({}) {}–{} days",
            self.id,
            self.name,
            self.status_icon(),
            self.duration_min,
            self.duration_max
        )?;
        writeln!(f)?;

        if let Some(start) = &self.start_date {
            writeln!(f, "- Started: {}", LocalDateTime(start))?;
            writeln!(f)?;
        }

        if let Some(desc) = &self.description {
            writeln!(f, "{desc}")?;
            writeln!(f)?;
        }

        Ok(())
    }
}

impl fmt::Display for PhaseInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_phase(f)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "- **{}** at {}",
            self.kind.as_str(),
            LocalDateTime(&self.timestamp)
        )?;
        if let Some(amount) = self.amount {
            write!(f, " ({amount})")?;
        }
        if let Some(note) = &self.note {
            write!(f, ": {note}")?;
        }
        writeln!(f)
    }
}

impl fmt::Display for PlantSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_phases > 0 {
            format!(" ({}/{})", self.started_phases, self.total_phases)
        } else {
            String::new()
        };

        writeln!(f, "## {} (ID: {}){progress}", self.name, self.id)?;
        writeln!(f)?;

        if let Some(strain) = &self.strain {
            writeln!(f, "- **Strain**: {strain}")?;
        }

        if let Some(current) = &self.current_phase {
            writeln!(f, "- **Current phase**: {current}")?;
        }

        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

/// A wrapper around [`Timestamp`] that formats in the system timezone.
///
/// The display format follows the pattern `YYYY-MM-DD HH:MM:SS TZ`. The
/// wrapper is zero-cost; it only holds a reference and formats on demand.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl<'a> LocalDateTime<'a> {
    /// Create a new `LocalDateTime` wrapper around a timestamp reference.
    pub fn new(timestamp: &'a Timestamp) -> Self {
        Self(timestamp)
    }
}

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;

    use super::*;

    fn test_phase(id: u64, position: u32, started: bool) -> PhaseInstance {
        PhaseInstance {
            id,
            plant_id: 1,
            name: format!("Phase {position}"),
            duration_min: 3,
            duration_max: 10,
            description: Some("Keep the medium moist".to_string()),
            counts_toward_harvest: false,
            start_date: started.then(|| Timestamp::from_second(1640995200).unwrap()),
            is_active: false,
            is_completed: false,
            position,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1641081600).unwrap(),
        }
    }

    fn test_plant() -> Plant {
        Plant {
            id: 7,
            name: "Northern Lights #2".to_string(),
            strain: Some("Northern Lights".to_string()),
            medium: Some("coco".to_string()),
            lifecycle: LifecycleKind::Photoperiod,
            status: PlantStatus::Active,
            created_at: Timestamp::from_second(1640995200).unwrap(),
            updated_at: Timestamp::from_second(1641081600).unwrap(),
            phases: vec![test_phase(1, 0, true), test_phase(2, 1, false)],
            events: vec![],
        }
    }

    #[test]
    fn test_plant_status_round_trip() {
        assert_eq!("active".parse::<PlantStatus>().unwrap(), PlantStatus::Active);
        assert_eq!(
            "Archived".parse::<PlantStatus>().unwrap(),
            PlantStatus::Archived
        );
        assert!("gone".parse::<PlantStatus>().is_err());
        assert_eq!(PlantStatus::Active.as_str(), "active");
    }

    #[test]
    fn test_lifecycle_kind_parse_aliases() {
        assert_eq!(
            "photo".parse::<LifecycleKind>().unwrap(),
            LifecycleKind::Photoperiod
        );
        assert_eq!(
            "auto".parse::<LifecycleKind>().unwrap(),
            LifecycleKind::Autoflower
        );
        assert!("semi".parse::<LifecycleKind>().is_err());
    }

    #[test]
    fn test_event_kind_round_trip() {
        for kind in EventKind::ALL {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
        assert_eq!("water".parse::<EventKind>().unwrap(), EventKind::Watering);
        assert!("pruning?".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_phase_status_icon() {
        let mut phase = test_phase(1, 0, true);
        phase.is_active = true;
        assert_eq!(phase.status_icon(), "➤");

        phase.is_active = false;
        phase.is_completed = true;
        assert_eq!(phase.status_icon(), "✓");

        phase.is_completed = false;
        assert_eq!(phase.status_icon(), "○");
    }

    #[test]
    fn test_plant_display_with_phases() {
        let plant = test_plant();
        let output = format!("{plant}");

        assert!(output.contains("# 7. Northern Lights #2"));
        assert!(output.contains("- Status: active"));
        assert!(output.contains("- Lifecycle: photoperiod"));
        assert!(output.contains("- Strain: Northern Lights"));
        assert!(output.contains("- Medium: coco"));
        assert!(output.contains("## Phases"));
        assert!(output.contains("Phase 0"));
        assert!(output.contains("Phase 1"));
    }

    #[test]
    fn test_plant_display_empty_phases() {
        let mut plant = test_plant();
        plant.phases.clear();
        let output = format!("{plant}");

        assert!(output.contains("No phases on this plant."));
        assert!(!output.contains("## Phases"));
    }

    #[test]
    fn test_event_display() {
        let event = Event {
            id: 3,
            plant_id: 7,
            phase_id: Some(1),
            kind: EventKind::Feeding,
            note: Some("half-strength bloom mix".to_string()),
            amount: Some(500.0),
            timestamp: Timestamp::from_second(1640995200).unwrap(),
            created_at: Timestamp::from_second(1640995200).unwrap(),
        };
        let output = format!("{event}");

        assert!(output.contains("**feeding**"));
        assert!(output.contains("(500)"));
        assert!(output.contains("half-strength bloom mix"));
    }

    #[test]
    fn test_plant_summary_from_plant() {
        let plant = test_plant();
        let summary = PlantSummary::from(&plant);

        assert_eq!(summary.id, plant.id);
        assert_eq!(summary.name, plant.name);
        assert_eq!(summary.total_phases, 2);
        assert_eq!(summary.started_phases, 1);
        assert_eq!(summary.current_phase, Some("Phase 0".to_string()));
    }

    #[test]
    fn test_plant_summary_current_is_last_started() {
        let mut plant = test_plant();
        // Start the second phase too; the summary should name the later one.
        plant.phases[1].start_date = Some(Timestamp::from_second(1641254400).unwrap());
        let summary = PlantSummary::from(&plant);

        assert_eq!(summary.started_phases, 2);
        assert_eq!(summary.current_phase, Some("Phase 1".to_string()));
    }

    #[test]
    fn test_plant_summary_display() {
        let summary = PlantSummary::from(&test_plant());
        let output = format!("{summary}");

        assert!(output.contains("## Northern Lights #2 (ID: 7) (1/2)"));
        assert!(output.contains("- **Strain**: Northern Lights"));
        assert!(output.contains("- **Current phase**: Phase 0"));
        assert!(output.ends_with("\n\n"));
    }

    #[test]
    fn test_local_date_time_display_format() {
        let timestamp = Timestamp::from_second(1640995200).unwrap();
        let output = format!("{}", LocalDateTime::new(&timestamp));

        let parts: Vec<&str> = output.split_whitespace().collect();
        assert_eq!(parts.len(), 3); // Date, Time, Timezone
        assert!(parts[1].contains(':'));
        assert!(!parts[2].is_empty());
    }
}

//! Display wrapper types for formatting different contexts.
//!
//! Presentation lives in wrapper types rather than on the domain models
//! directly, so the same data can be formatted differently per context (a
//! plant list entry vs. the full timeline stepper). All formatters produce
//! markdown for rich terminal display.
//!
//! - [`PlantList`]: collections of plant summaries with optional titles
//! - [`PhaseList`]: a phase sequence, used after phase mutations
//! - [`TimelineView`]: the computed timeline stepper plus summary metrics
//! - [`EventList`]: a plant's event log
//! - [`ActivityView`]: trailing 7-/30-day event counts
//! - [`CreateResult`], [`DeleteResult`], [`OperationStatus`]: operation
//!   outcomes

use std::fmt;

use crate::events::ActivitySummary;
use crate::models::{Event, PhaseInstance, Plant, PlantSummary};
use crate::timeline::{PhaseStanding, PhaseTimeline, TimelineEntry};

/// Wrapper type for displaying a collection of plants as a formatted list.
pub struct PlantList<'a> {
    plants: &'a [PlantSummary],
    title: Option<&'a str>,
}

impl<'a> PlantList<'a> {
    /// Create a new PlantList wrapper.
    pub fn new(plants: &'a [PlantSummary]) -> Self {
        Self {
            plants,
            title: None,
        }
    }

    /// Create a PlantList with a title header.
    pub fn with_title(plants: &'a [PlantSummary], title: &'a str) -> Self {
        Self {
            plants,
            title: Some(title),
        }
    }
}

impl<'a> fmt::Display for PlantList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "# {title}")?;
            writeln!(f)?;
        }

        if self.plants.is_empty() {
            writeln!(f, "No plants found.")?;
            return Ok(());
        }

        for plant in self.plants {
            write!(f, "{plant}")?;
        }

        Ok(())
    }
}

/// Wrapper type for displaying a phase sequence, typically after a
/// mutation rewrote it.
pub struct PhaseList<'a> {
    phases: &'a [PhaseInstance],
    title: Option<&'a str>,
}

impl<'a> PhaseList<'a> {
    /// Create a new PhaseList wrapper.
    pub fn new(phases: &'a [PhaseInstance]) -> Self {
        Self {
            phases,
            title: None,
        }
    }

    /// Create a PhaseList with a title header.
    pub fn with_title(phases: &'a [PhaseInstance], title: &'a str) -> Self {
        Self {
            phases,
            title: Some(title),
        }
    }
}

impl<'a> fmt::Display for PhaseList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "# {title}")?;
            writeln!(f)?;
        }

        if self.phases.is_empty() {
            writeln!(f, "No phases found.")?;
            return Ok(());
        }

        for phase in self.phases {
            write!(f, "{phase}")?;
        }

        Ok(())
    }
}

/// The timeline stepper: one line per phase plus plant-level metrics.
pub struct TimelineView<'a> {
    plant: &'a Plant,
    timeline: &'a PhaseTimeline,
}

impl<'a> TimelineView<'a> {
    /// Create a new TimelineView wrapper.
    pub fn new(plant: &'a Plant, timeline: &'a PhaseTimeline) -> Self {
        Self { plant, timeline }
    }

    fn write_entry(f: &mut fmt::Formatter<'_>, index: usize, entry: &TimelineEntry) -> fmt::Result {
        let icon = match entry.standing {
            PhaseStanding::Current => "➤",
            PhaseStanding::Completed => "✓",
            PhaseStanding::Upcoming => "○",
        };

        match entry.standing {
            PhaseStanding::Current => {
                write!(
                    f,
                    "{icon} **{}. {}** — day {}, {:.0}%",
                    index + 1,
                    entry.name,
                    entry.days_elapsed,
                    entry.progress_percentage
                )?;
                if entry.is_overdue {
                    write!(f, " (overdue)")?;
                }
                writeln!(f)
            }
            PhaseStanding::Completed => {
                writeln!(
                    f,
                    "{icon} {}. {} — {} day(s)",
                    index + 1,
                    entry.name,
                    entry.days_elapsed
                )
            }
            PhaseStanding::Upcoming => {
                writeln!(
                    f,
                    "{icon} {}. {} — projected {} to {}",
                    index + 1,
                    entry.name,
                    entry.estimated_start.strftime("%Y-%m-%d"),
                    entry.estimated_end.strftime("%Y-%m-%d")
                )
            }
        }
    }
}

impl<'a> fmt::Display for TimelineView<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "# {} — Timeline", self.plant.name)?;
        writeln!(f)?;

        if self.timeline.entries().is_empty() {
            writeln!(f, "No phases on this plant.")?;
            return Ok(());
        }

        for (index, entry) in self.timeline.entries().iter().enumerate() {
            Self::write_entry(f, index, entry)?;
        }

        let summary = self.timeline.summary();
        writeln!(f)?;
        writeln!(f, "**Overall progress:** {:.0}%", summary.total_progress)?;

        match summary.days_until_next_phase {
            Some(days) => writeln!(f, "**Days until next phase:** {days}")?,
            None => writeln!(f, "**Days until next phase:** – (no phase started)")?,
        }

        match summary.days_until_harvest {
            Some(days) => writeln!(f, "**Estimated harvest:** in {days} day(s)")?,
            None => writeln!(f, "**Estimated harvest:** unknown (no harvest phase tagged)")?,
        }

        writeln!(
            f,
            "**Ready to advance:** {}",
            if summary.can_advance { "yes" } else { "no" }
        )
    }
}

/// Wrapper type for displaying a plant's event log.
pub struct EventList<'a> {
    events: &'a [Event],
    title: Option<&'a str>,
}

impl<'a> EventList<'a> {
    /// Create a new EventList wrapper.
    pub fn new(events: &'a [Event]) -> Self {
        Self {
            events,
            title: None,
        }
    }

    /// Create an EventList with a title header.
    pub fn with_title(events: &'a [Event], title: &'a str) -> Self {
        Self {
            events,
            title: Some(title),
        }
    }
}

impl<'a> fmt::Display for EventList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(title) = self.title {
            writeln!(f, "# {title}")?;
            writeln!(f)?;
        }

        if self.events.is_empty() {
            writeln!(f, "No events recorded.")?;
            return Ok(());
        }

        for event in self.events {
            write!(f, "{event}")?;
        }

        Ok(())
    }
}

/// Trailing activity counts over the 7- and 30-day windows.
pub struct ActivityView {
    pub summary: ActivitySummary,
}

impl ActivityView {
    /// Create a new ActivityView wrapper.
    pub fn new(summary: ActivitySummary) -> Self {
        Self { summary }
    }
}

impl fmt::Display for ActivityView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "## Activity")?;
        writeln!(f)?;
        writeln!(
            f,
            "- Last 7 days: {} event(s) ({} watering, {} feeding)",
            self.summary.last_7_days.total(),
            self.summary.last_7_days.watering,
            self.summary.last_7_days.feeding
        )?;
        writeln!(
            f,
            "- Last 30 days: {} event(s) ({} watering, {} feeding)",
            self.summary.last_30_days.total(),
            self.summary.last_30_days.watering,
            self.summary.last_30_days.feeding
        )
    }
}

/// Wrapper type for displaying the result of create operations.
pub struct CreateResult<T> {
    pub resource: T,
}

impl<T> CreateResult<T> {
    /// Create a new CreateResult wrapper.
    pub fn new(resource: T) -> Self {
        Self { resource }
    }
}

impl fmt::Display for CreateResult<Plant> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Created plant with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

impl fmt::Display for CreateResult<Event> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Recorded event with ID: {}", self.resource.id)?;
        writeln!(f)?;
        write!(f, "{}", self.resource)
    }
}

/// Wrapper type for displaying the result of delete operations.
pub struct DeleteResult {
    pub resource_id: u64,
    pub resource_type: &'static str,
    pub resource_name: Option<String>,
}

impl DeleteResult {
    /// Create a new DeleteResult wrapper.
    pub fn new(resource_id: u64, resource_type: &'static str) -> Self {
        Self {
            resource_id,
            resource_type,
            resource_name: None,
        }
    }

    /// Create a DeleteResult with the resource name for better context.
    pub fn with_name(resource_id: u64, resource_type: &'static str, name: String) -> Self {
        Self {
            resource_id,
            resource_type,
            resource_name: Some(name),
        }
    }
}

impl fmt::Display for DeleteResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource_name {
            Some(name) => writeln!(
                f,
                "Deleted {} '{}' (ID: {})",
                self.resource_type, name, self.resource_id
            ),
            None => writeln!(
                f,
                "Deleted {} with ID: {}",
                self.resource_type, self.resource_id
            ),
        }
    }
}

/// Wrapper type for displaying operation confirmation messages.
pub struct OperationStatus {
    pub message: String,
    pub success: bool,
}

impl OperationStatus {
    /// Create a new success status.
    pub fn success(message: String) -> Self {
        Self {
            message,
            success: true,
        }
    }

    /// Create a new failure status.
    pub fn failure(message: String) -> Self {
        Self {
            message,
            success: false,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.success { "Success:" } else { "Error:" };
        writeln!(f, "{} {}", prefix, self.message)
    }
}

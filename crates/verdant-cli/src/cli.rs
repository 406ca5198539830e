//! Command definitions and handlers for the Verdant CLI
//!
//! Each subcommand is described by a clap `Args` wrapper that converts into
//! the matching interface-agnostic parameter type from `verdant_core`:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Tracker
//! ```
//!
//! Keeping the clap derives out of the core types means the same parameter
//! structures (and their validation) can back any interface, while help
//! text, aliases, and flag names stay here. The [`Cli`] struct at the bottom
//! dispatches parsed commands against the tracker and feeds the resulting
//! display wrappers through the terminal renderer.

use anyhow::Result;
use clap::{Args, Subcommand};
use jiff::Timestamp;
use verdant_core::{
    display::{
        ActivityView, CreateResult, DeleteResult, EventList, OperationStatus, PhaseList,
        PlantList, TimelineView,
    },
    events::activity_summary,
    params::{
        Advance, CreatePlant, Id, InsertPhase, ListEvents, ListPlants, RecordEvent,
        ReorderPhases, SetPhaseDate, UpdateEvent,
    },
    Tracker,
};

use crate::renderer::TerminalRenderer;

/// Create a new plant
///
/// The plant gets a full phase sequence instantiated from its lifecycle's
/// built-in templates, with the first phase started immediately.
#[derive(Args)]
pub struct CreatePlantArgs {
    /// Display name of the plant
    pub name: String,
    /// Strain name
    #[arg(short, long, help = "Strain name, e.g. 'Northern Lights'")]
    pub strain: Option<String>,
    /// Growing medium
    #[arg(short, long, help = "Growing medium (soil, coco, hydro, ...)")]
    pub medium: Option<String>,
    /// Lifecycle kind, defaults to photoperiod
    #[arg(short, long, help = "Lifecycle kind: 'photoperiod' or 'autoflower'")]
    pub lifecycle: Option<String>,
}

impl From<CreatePlantArgs> for CreatePlant {
    fn from(val: CreatePlantArgs) -> Self {
        CreatePlant {
            name: val.name,
            strain: val.strain,
            medium: val.medium,
            lifecycle: val.lifecycle,
            templates: Vec::new(),
        }
    }
}

/// List all plants
#[derive(Args)]
pub struct ListPlantsArgs {
    /// Show archived plants instead of active plants
    #[arg(long, help = "Show archived plants instead of active ones")]
    pub archived: bool,
}

impl From<ListPlantsArgs> for ListPlants {
    fn from(val: ListPlantsArgs) -> Self {
        ListPlants {
            archived: val.archived,
        }
    }
}

/// Show a plant's timeline
///
/// Displays the phase stepper (completed, current, and projected phases),
/// overall progress, the harvest estimate, and recent care activity.
#[derive(Args)]
pub struct ShowPlantArgs {
    /// ID of the plant to display
    #[arg(help = "Unique identifier of the plant to show")]
    pub id: u64,
}

impl From<ShowPlantArgs> for Id {
    fn from(val: ShowPlantArgs) -> Self {
        Id { id: val.id }
    }
}

/// Archive a plant
///
/// Move a plant out of the default listing without deleting anything. The
/// phase sequence and event log are preserved and the plant can be restored
/// later with the unarchive command.
#[derive(Args)]
pub struct ArchivePlantArgs {
    /// ID of the plant to archive
    pub id: u64,
}

impl From<ArchivePlantArgs> for Id {
    fn from(val: ArchivePlantArgs) -> Self {
        Id { id: val.id }
    }
}

/// Unarchive a plant
#[derive(Args)]
pub struct UnarchivePlantArgs {
    /// ID of the archived plant to restore
    pub id: u64,
}

impl From<UnarchivePlantArgs> for Id {
    fn from(val: UnarchivePlantArgs) -> Self {
        Id { id: val.id }
    }
}

/// Delete a plant permanently
#[derive(Args)]
pub struct DeletePlantArgs {
    /// ID of the plant to delete
    #[arg(help = "Unique identifier of the plant to permanently delete")]
    pub id: u64,
    /// Confirm the deletion (required to prevent accidental deletion)
    #[arg(long)]
    pub confirm: bool,
}

#[derive(Subcommand)]
pub enum PlantCommands {
    /// Create a new plant
    #[command(alias = "c")]
    Create(CreatePlantArgs),
    /// List all plants
    #[command(aliases = ["l", "ls"])]
    List(ListPlantsArgs),
    /// Show a plant's timeline
    #[command(alias = "s")]
    Show(ShowPlantArgs),
    /// Archive a plant
    #[command(alias = "a")]
    Archive(ArchivePlantArgs),
    /// Unarchive a plant
    #[command(alias = "u")]
    Unarchive(UnarchivePlantArgs),
    /// Delete a plant permanently
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePlantArgs),
}

/// List a plant's phases in sequence order
#[derive(Args)]
pub struct ListPhasesArgs {
    /// ID of the plant whose phases to list
    pub plant_id: u64,
}

impl From<ListPhasesArgs> for Id {
    fn from(val: ListPhasesArgs) -> Self {
        Id { id: val.plant_id }
    }
}

/// Set or clear a phase's start date
///
/// The date must fall between the start dates of the neighboring started
/// phases, so the sequence order always matches the date order. Clearing a
/// date un-starts the phase.
#[derive(Args)]
pub struct SetPhaseDateArgs {
    /// ID of the phase to update
    pub phase_id: u64,
    /// Start date as YYYY-MM-DD or an RFC 3339 timestamp
    #[arg(help = "Start date (YYYY-MM-DD or RFC 3339); omit with --clear")]
    pub date: Option<String>,
    /// Clear the start date instead of setting one
    #[arg(long)]
    pub clear: bool,
}

impl From<SetPhaseDateArgs> for SetPhaseDate {
    fn from(val: SetPhaseDateArgs) -> Self {
        SetPhaseDate {
            phase_id: val.phase_id,
            date: val.date,
            clear: val.clear,
        }
    }
}

/// Advance a plant to its next phase
///
/// Starts the phase after the current one at the present moment. Without
/// --force the current phase must have run for at least its minimum
/// duration.
#[derive(Args)]
pub struct AdvanceArgs {
    /// ID of the plant to advance
    pub plant_id: u64,
    /// Advance even if the current phase has not met its minimum duration
    #[arg(long)]
    pub force: bool,
}

impl From<AdvanceArgs> for Advance {
    fn from(val: AdvanceArgs) -> Self {
        Advance {
            plant_id: val.plant_id,
            force: val.force,
        }
    }
}

/// Insert a new phase into a plant's sequence
///
/// Position is 0-indexed; existing phases at or after it shift down. The
/// new phase starts out without a date.
#[derive(Args)]
pub struct InsertPhaseArgs {
    /// ID of the plant to insert into
    pub plant_id: u64,
    /// 0-based position for the new phase (past-the-end appends)
    pub position: u32,
    /// Name of the new phase
    pub name: String,
    /// Minimum expected duration in days
    #[arg(long, value_name = "DAYS")]
    pub min: u32,
    /// Maximum expected duration in days
    #[arg(long, value_name = "DAYS")]
    pub max: u32,
    /// Optional description of the phase
    #[arg(short, long)]
    pub description: Option<String>,
    /// Count this phase toward the harvest estimate
    #[arg(long)]
    pub harvest: bool,
}

impl From<InsertPhaseArgs> for InsertPhase {
    fn from(val: InsertPhaseArgs) -> Self {
        InsertPhase {
            plant_id: val.plant_id,
            name: val.name,
            duration_min: val.min,
            duration_max: val.max,
            description: val.description,
            counts_toward_harvest: val.harvest,
            position: val.position,
        }
    }
}

/// Delete an unstarted phase
#[derive(Args)]
pub struct DeletePhaseArgs {
    /// ID of the phase to delete
    #[arg(help = "Unique identifier of the phase to delete (must be unstarted)")]
    pub id: u64,
}

impl From<DeletePhaseArgs> for Id {
    fn from(val: DeletePhaseArgs) -> Self {
        Id { id: val.id }
    }
}

/// Reorder a plant's phases
#[derive(Args)]
pub struct ReorderPhasesArgs {
    /// ID of the plant whose phases to reorder
    pub plant_id: u64,
    /// Phase IDs in the new order - comma-separated, each exactly once
    #[arg(value_delimiter = ',', help = "Phase IDs in the new order (comma-separated)")]
    pub order: Vec<u64>,
}

impl From<ReorderPhasesArgs> for ReorderPhases {
    fn from(val: ReorderPhasesArgs) -> Self {
        ReorderPhases {
            plant_id: val.plant_id,
            order: val.order,
        }
    }
}

#[derive(Subcommand)]
pub enum PhaseCommands {
    /// List a plant's phases in sequence order
    #[command(aliases = ["l", "ls"])]
    List(ListPhasesArgs),
    /// Set or clear a phase's start date
    SetDate(SetPhaseDateArgs),
    /// Advance a plant to its next phase
    #[command(alias = "a")]
    Advance(AdvanceArgs),
    /// Insert a new phase into a plant's sequence
    #[command(alias = "i")]
    Insert(InsertPhaseArgs),
    /// Delete an unstarted phase
    #[command(aliases = ["d", "rm"])]
    Delete(DeletePhaseArgs),
    /// Reorder a plant's phases
    #[command(alias = "r")]
    Reorder(ReorderPhasesArgs),
}

/// Record a care event
///
/// The event is stamped with the plant's current phase at recording time, so
/// the log can later be read per phase even after the sequence changes.
#[derive(Args)]
pub struct RecordEventArgs {
    /// ID of the plant the event belongs to
    pub plant_id: u64,
    /// Event kind
    #[arg(
        help = "Event kind: watering, feeding, observation, training, harvest, transplant, custom"
    )]
    pub kind: String,
    /// Free-form note
    #[arg(short, long, help = "Free-form note, e.g. '1L, pH 6.3'")]
    pub note: Option<String>,
    /// Numeric amount
    #[arg(short, long, help = "Numeric amount (milliliters watered, grams fed, ...)")]
    pub amount: Option<f64>,
    /// Event time; defaults to now
    #[arg(long, help = "Event time (YYYY-MM-DD or RFC 3339); defaults to now")]
    pub date: Option<String>,
}

impl From<RecordEventArgs> for RecordEvent {
    fn from(val: RecordEventArgs) -> Self {
        RecordEvent {
            plant_id: val.plant_id,
            kind: val.kind,
            note: val.note,
            amount: val.amount,
            timestamp: val.date,
        }
    }
}

/// Edit a recorded event
///
/// Only the provided fields change; the phase stamp stays as recorded.
#[derive(Args)]
pub struct UpdateEventArgs {
    /// ID of the event to edit
    pub id: u64,
    /// New event kind
    #[arg(short, long)]
    pub kind: Option<String>,
    /// New free-form note
    #[arg(short, long)]
    pub note: Option<String>,
    /// New numeric amount
    #[arg(short, long)]
    pub amount: Option<f64>,
    /// New event time
    #[arg(long, help = "Event time (YYYY-MM-DD or RFC 3339)")]
    pub date: Option<String>,
}

impl From<UpdateEventArgs> for UpdateEvent {
    fn from(val: UpdateEventArgs) -> Self {
        UpdateEvent {
            event_id: val.id,
            kind: val.kind,
            note: val.note,
            amount: val.amount,
            timestamp: val.date,
        }
    }
}

/// List a plant's events
#[derive(Args)]
pub struct ListEventsArgs {
    /// ID of the plant whose events to list
    pub plant_id: u64,
    /// Limit to one event kind
    #[arg(short, long)]
    pub kind: Option<String>,
    /// Limit to events at or after this date
    #[arg(long, value_name = "DATE")]
    pub since: Option<String>,
}

impl From<ListEventsArgs> for ListEvents {
    fn from(val: ListEventsArgs) -> Self {
        ListEvents {
            plant_id: val.plant_id,
            kind: val.kind,
            since: val.since,
        }
    }
}

/// Show recent care activity for a plant
#[derive(Args)]
pub struct ActivityArgs {
    /// ID of the plant to summarize
    pub plant_id: u64,
}

impl From<ActivityArgs> for Id {
    fn from(val: ActivityArgs) -> Self {
        Id { id: val.plant_id }
    }
}

/// Delete an event
#[derive(Args)]
pub struct DeleteEventArgs {
    /// ID of the event to delete
    pub id: u64,
}

impl From<DeleteEventArgs> for Id {
    fn from(val: DeleteEventArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// Record a care event
    #[command(aliases = ["r", "add"])]
    Record(RecordEventArgs),
    /// Edit a recorded event
    #[command(alias = "u")]
    Update(UpdateEventArgs),
    /// List a plant's events
    #[command(aliases = ["l", "ls"])]
    List(ListEventsArgs),
    /// Show recent care activity for a plant
    #[command(alias = "act")]
    Activity(ActivityArgs),
    /// Delete an event
    #[command(aliases = ["d", "rm"])]
    Delete(DeleteEventArgs),
}

/// Command dispatcher: runs parsed commands against the tracker and renders
/// the results.
pub struct Cli {
    tracker: Tracker,
    renderer: TerminalRenderer,
}

impl Cli {
    /// Create a new CLI handler.
    pub fn new(tracker: Tracker, renderer: TerminalRenderer) -> Self {
        Self { tracker, renderer }
    }

    /// List plants; also the default action when no command is given.
    pub async fn list_plants(&self, params: &ListPlants) -> Result<()> {
        let plants = self.tracker.list_plants_summary(params).await?;
        let title = if params.archived {
            "Archived Plants"
        } else {
            "Active Plants"
        };
        self.renderer
            .render(&PlantList::with_title(&plants, title).to_string())
    }

    /// Handle plant subcommands.
    pub async fn handle_plant_command(&self, command: PlantCommands) -> Result<()> {
        match command {
            PlantCommands::Create(args) => {
                let plant = self.tracker.create_plant(&args.into()).await?;
                self.renderer.render(&CreateResult::new(plant).to_string())
            }
            PlantCommands::List(args) => self.list_plants(&args.into()).await,
            PlantCommands::Show(args) => {
                let params: Id = args.into();
                match self.tracker.plant_timeline(&params).await? {
                    Some((plant, timeline)) => {
                        let mut output = TimelineView::new(&plant, &timeline).to_string();
                        if !plant.events.is_empty() {
                            let summary = activity_summary(&plant.events, Timestamp::now());
                            output.push('\n');
                            output.push_str(&ActivityView::new(summary).to_string());
                        }
                        self.renderer.render(&output)
                    }
                    None => self.render_not_found(params.id),
                }
            }
            PlantCommands::Archive(args) => {
                let params: Id = args.into();
                match self.tracker.archive_plant_with_confirmation(&params).await? {
                    Some(plant) => self.renderer.render(
                        &OperationStatus::success(format!(
                            "Archived plant '{}' (ID: {})",
                            plant.name, plant.id
                        ))
                        .to_string(),
                    ),
                    None => self.render_not_found(params.id),
                }
            }
            PlantCommands::Unarchive(args) => {
                let params: Id = args.into();
                match self
                    .tracker
                    .unarchive_plant_with_confirmation(&params)
                    .await?
                {
                    Some(plant) => self.renderer.render(
                        &OperationStatus::success(format!(
                            "Unarchived plant '{}' (ID: {})",
                            plant.name, plant.id
                        ))
                        .to_string(),
                    ),
                    None => self.render_not_found(params.id),
                }
            }
            PlantCommands::Delete(args) => {
                if !args.confirm {
                    return self.renderer.render(
                        &OperationStatus::failure(format!(
                            "Deletion is permanent; pass --confirm to delete plant {}",
                            args.id
                        ))
                        .to_string(),
                    );
                }
                let params = Id { id: args.id };
                match self.tracker.delete_plant_with_confirmation(&params).await? {
                    Some(plant) => self.renderer.render(
                        &DeleteResult::with_name(plant.id, "plant", plant.name).to_string(),
                    ),
                    None => self.render_not_found(params.id),
                }
            }
        }
    }

    /// Handle phase subcommands.
    pub async fn handle_phase_command(&self, command: PhaseCommands) -> Result<()> {
        match command {
            PhaseCommands::List(args) => {
                let phases = self.tracker.get_phases(&args.into()).await?;
                self.render_phases(&phases)
            }
            PhaseCommands::SetDate(args) => {
                let phases = self.tracker.set_phase_date(&args.into()).await?;
                self.render_phases(&phases)
            }
            PhaseCommands::Advance(args) => {
                let phases = self.tracker.advance(&args.into()).await?;
                self.render_phases(&phases)
            }
            PhaseCommands::Insert(args) => {
                let phases = self.tracker.insert_phase(&args.into()).await?;
                self.render_phases(&phases)
            }
            PhaseCommands::Delete(args) => {
                let params: Id = args.into();
                let phases = self.tracker.delete_phase(&params).await?;
                let mut output = DeleteResult::new(params.id, "phase").to_string();
                output.push('\n');
                output.push_str(&PhaseList::with_title(&phases, "Phases").to_string());
                self.renderer.render(&output)
            }
            PhaseCommands::Reorder(args) => {
                let phases = self.tracker.reorder_phases(&args.into()).await?;
                self.render_phases(&phases)
            }
        }
    }

    /// Handle event subcommands.
    pub async fn handle_event_command(&self, command: EventCommands) -> Result<()> {
        match command {
            EventCommands::Record(args) => {
                let event = self.tracker.record_event(&args.into()).await?;
                self.renderer.render(&CreateResult::new(event).to_string())
            }
            EventCommands::Update(args) => {
                let event = self.tracker.update_event(&args.into()).await?;
                let mut output =
                    OperationStatus::success(format!("Updated event {}", event.id)).to_string();
                output.push('\n');
                output.push_str(&EventList::with_title(&[event], "Events").to_string());
                self.renderer.render(&output)
            }
            EventCommands::List(args) => {
                let events = self.tracker.list_events(&args.into()).await?;
                self.renderer
                    .render(&EventList::with_title(&events, "Events").to_string())
            }
            EventCommands::Activity(args) => {
                let params: Id = args.into();
                match self.tracker.get_plant(&params).await? {
                    Some(plant) => {
                        let summary = activity_summary(&plant.events, Timestamp::now());
                        self.renderer.render(&ActivityView::new(summary).to_string())
                    }
                    None => self.render_not_found(params.id),
                }
            }
            EventCommands::Delete(args) => {
                let params: Id = args.into();
                self.tracker.delete_event(&params).await?;
                self.renderer
                    .render(&DeleteResult::new(params.id, "event").to_string())
            }
        }
    }

    fn render_phases(&self, phases: &[verdant_core::PhaseInstance]) -> Result<()> {
        self.renderer
            .render(&PhaseList::with_title(phases, "Phases").to_string())
    }

    fn render_not_found(&self, id: u64) -> Result<()> {
        self.renderer
            .render(&OperationStatus::failure(format!("Plant with ID {id} not found")).to_string())
    }
}

//! High-level tracker API with async support.

use std::path::{Path, PathBuf};

use jiff::Timestamp;
use tokio::task;

use crate::{
    db::Database,
    error::{Result, TrackerError},
    models::{Event, PhaseInstance, Plant, PlantFilter, PlantSummary},
    params::{
        Advance, CreatePlant, Id, InsertPhase, ListEvents, ListPlants, RecordEvent, ReorderPhases,
        SetPhaseDate, UpdateEvent,
    },
    timeline::PhaseTimeline,
};

/// Main tracker interface for managing plants, phases, and events.
pub struct Tracker {
    db_path: PathBuf,
}

impl Tracker {
    fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Creates a new plant, instantiating its phase sequence from the
    /// given templates (or the lifecycle's built-in defaults).
    pub async fn create_plant(&self, params: &CreatePlant) -> Result<Plant> {
        let lifecycle = params.validate()?;
        let db_path = self.db_path.clone();
        let name = params.name.clone();
        let strain = params.strain.clone();
        let medium = params.medium.clone();
        let templates = params.templates.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_plant(
                &name,
                strain.as_deref(),
                medium.as_deref(),
                lifecycle,
                &templates,
            )
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Retrieves a plant by its ID, with phases and events loaded.
    pub async fn get_plant(&self, params: &Id) -> Result<Option<Plant>> {
        let db_path = self.db_path.clone();
        let plant_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_plant(plant_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists plant summaries with optional filtering.
    pub async fn list_plants(&self, filter: Option<PlantFilter>) -> Result<Vec<PlantSummary>> {
        let db_path = self.db_path.clone();

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_plants(filter.as_ref())
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Handle listing plants with the archived toggle mapped to a filter.
    pub async fn list_plants_summary(&self, params: &ListPlants) -> Result<Vec<PlantSummary>> {
        self.list_plants(Some(PlantFilter::from(params))).await
    }

    /// Retrieves a plant together with its computed timeline at now, or
    /// `None` if the plant does not exist.
    pub async fn plant_timeline(&self, params: &Id) -> Result<Option<(Plant, PhaseTimeline)>> {
        let plant = self.get_plant(params).await?;
        Ok(plant.map(|plant| {
            let timeline = PhaseTimeline::compute(&plant.phases, Timestamp::now());
            (plant, timeline)
        }))
    }

    /// Archives a plant (soft delete).
    pub async fn archive_plant(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let plant_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.archive_plant(plant_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Unarchives a plant (restores from archive).
    pub async fn unarchive_plant(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let plant_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.unarchive_plant(plant_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Permanently deletes a plant, its phases, and its events.
    /// This operation cannot be undone.
    pub async fn delete_plant(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let plant_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_plant(plant_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Handle archiving with confirmation: returns the plant details if it
    /// was found and archived, or `None` if it doesn't exist.
    pub async fn archive_plant_with_confirmation(&self, params: &Id) -> Result<Option<Plant>> {
        let plant = self.get_plant(params).await?;
        if plant.is_some() {
            self.archive_plant(params).await?;
        }
        Ok(plant)
    }

    /// Handle unarchiving with confirmation.
    pub async fn unarchive_plant_with_confirmation(&self, params: &Id) -> Result<Option<Plant>> {
        let plant = self.get_plant(params).await?;
        if plant.is_some() {
            self.unarchive_plant(params).await?;
        }
        Ok(plant)
    }

    /// Handle permanent deletion with confirmation. Returns the deleted
    /// plant's details, or `None` if it doesn't exist.
    pub async fn delete_plant_with_confirmation(&self, params: &Id) -> Result<Option<Plant>> {
        let plant = self.get_plant(params).await?;
        if plant.is_some() {
            self.delete_plant(params).await?;
        }
        Ok(plant)
    }

    /// Retrieves a plant's phase sequence in order.
    pub async fn get_phases(&self, params: &Id) -> Result<Vec<PhaseInstance>> {
        let db_path = self.db_path.clone();
        let plant_id = params.id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.get_phases(plant_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Sets or clears one phase's start date. The candidate is validated
    /// against the started neighbors; the rewritten sequence is returned.
    pub async fn set_phase_date(&self, params: &SetPhaseDate) -> Result<Vec<PhaseInstance>> {
        let date = params.validate()?;
        let db_path = self.db_path.clone();
        let phase_id = params.phase_id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.set_phase_date(phase_id, date)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Starts the plant's next phase at now.
    ///
    /// Without `force`, the current phase must have met its minimum
    /// duration first; with it, the advance is unconditional.
    pub async fn advance(&self, params: &Advance) -> Result<Vec<PhaseInstance>> {
        let db_path = self.db_path.clone();
        let plant_id = params.plant_id;
        let force = params.force;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;

            if !force {
                let phases = db.get_phases(plant_id)?;
                let timeline = PhaseTimeline::compute(&phases, Timestamp::now());
                if !timeline.summary().can_advance {
                    let remaining = timeline.summary().days_until_next_phase.unwrap_or(0);
                    return Err(TrackerError::invalid_input(
                        "plant_id",
                        if remaining > 0 {
                            format!(
                                "current phase needs {remaining} more day(s) to meet its minimum; \
                                 use force to advance anyway"
                            )
                        } else {
                            "plant cannot advance (no phase started, or already on the last \
                             phase)"
                                .to_string()
                        },
                    ));
                }
            }

            db.advance_plant(plant_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Inserts a new unstarted phase at a position in the sequence.
    pub async fn insert_phase(&self, params: &InsertPhase) -> Result<Vec<PhaseInstance>> {
        let template = params.validate()?;
        let db_path = self.db_path.clone();
        let plant_id = params.plant_id;
        let position = params.position as usize;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.insert_phase(plant_id, &template, position)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Rearranges a plant's phases to the given ID order.
    pub async fn reorder_phases(&self, params: &ReorderPhases) -> Result<Vec<PhaseInstance>> {
        let db_path = self.db_path.clone();
        let plant_id = params.plant_id;
        let order = params.order.clone();

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.reorder_phases(plant_id, &order)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Deletes an unstarted phase. Started phases and the last remaining
    /// phase are rejected.
    pub async fn delete_phase(&self, params: &Id) -> Result<Vec<PhaseInstance>> {
        let db_path = self.db_path.clone();
        let phase_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_phase(phase_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Records a care event, stamped with the plant's current phase.
    pub async fn record_event(&self, params: &RecordEvent) -> Result<Event> {
        let (kind, timestamp) = params.validate()?;
        let db_path = self.db_path.clone();
        let plant_id = params.plant_id;
        let note = params.note.clone();
        let amount = params.amount;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.create_event(plant_id, kind, note.as_deref(), amount, timestamp)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Edits a recorded event. Omitted fields keep their stored values.
    pub async fn update_event(&self, params: &UpdateEvent) -> Result<Event> {
        let (kind, timestamp) = params.validate()?;
        let db_path = self.db_path.clone();
        let event_id = params.event_id;
        let note = params.note.clone();
        let amount = params.amount;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.update_event(event_id, kind, note.as_deref(), amount, timestamp)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Lists a plant's events, optionally filtered by kind or start date.
    pub async fn list_events(&self, params: &ListEvents) -> Result<Vec<Event>> {
        let (kind, since) = params.validate()?;
        let db_path = self.db_path.clone();
        let plant_id = params.plant_id;

        task::spawn_blocking(move || {
            let db = Database::new(&db_path)?;
            db.list_events(plant_id, kind, since)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }

    /// Deletes a single event.
    pub async fn delete_event(&self, params: &Id) -> Result<()> {
        let db_path = self.db_path.clone();
        let event_id = params.id;

        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            db.delete_event(event_id)
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })?
    }
}

/// Builder for creating and configuring Tracker instances.
#[derive(Debug, Clone, Default)]
pub struct TrackerBuilder {
    database_path: Option<PathBuf>,
}

impl TrackerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/verdant/verdant.db` or
    /// `~/.local/share/verdant/verdant.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.database_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Builds the configured tracker instance.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::FileSystem` if the database path is invalid
    /// Returns `TrackerError::Database` if database initialization fails
    pub async fn build(self) -> Result<Tracker> {
        let db_path = match self.database_path {
            Some(path) => path,
            None => Self::default_database_path()?,
        };

        // Create parent directories if they don't exist
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| TrackerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        // Test database connection
        let db_path_clone = db_path.clone();
        task::spawn_blocking(move || {
            let _db = Database::new(&db_path_clone)?;
            Ok::<(), TrackerError>(())
        })
        .await
        .map_err(|e| TrackerError::Configuration {
            message: format!("Task join error: {e}"),
        })??;

        Ok(Tracker::new(db_path))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("verdant")
            .place_data_file("verdant.db")
            .map_err(|e| TrackerError::XdgDirectory(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EventKind;
    use crate::timeline::PhaseStanding;
    use tempfile::TempDir;

    /// Helper function to create a test tracker
    async fn create_test_tracker() -> (TempDir, Tracker) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let tracker = TrackerBuilder::new()
            .with_database_path(&db_path)
            .build()
            .await
            .expect("Failed to create tracker");
        (temp_dir, tracker)
    }

    async fn create_test_plant(tracker: &Tracker) -> Plant {
        tracker
            .create_plant(&CreatePlant {
                name: "Aurora".to_string(),
                strain: Some("Northern Lights".to_string()),
                medium: Some("soil".to_string()),
                lifecycle: Some("photoperiod".to_string()),
                templates: vec![],
            })
            .await
            .expect("Failed to create plant")
    }

    #[tokio::test]
    async fn test_create_plant_starts_first_phase() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        assert!(!plant.phases.is_empty());
        assert!(plant.phases[0].is_active);
        assert!(plant.phases[0].start_date.is_some());
        assert!(plant.phases[1..].iter().all(|p| p.start_date.is_none()));
    }

    #[tokio::test]
    async fn test_get_plant_round_trip() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let loaded = tracker
            .get_plant(&Id { id: plant.id })
            .await
            .expect("Failed to get plant")
            .expect("Plant should exist");

        assert_eq!(loaded.name, "Aurora");
        assert_eq!(loaded.strain, Some("Northern Lights".to_string()));
        assert_eq!(loaded.phases.len(), plant.phases.len());
        assert_eq!(loaded.phases[0].name, plant.phases[0].name);
    }

    #[tokio::test]
    async fn test_get_plant_not_found() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let result = tracker
            .get_plant(&Id { id: 999 })
            .await
            .expect("Should not fail on non-existent plant");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_plant_timeline_has_single_current_phase() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let (_, timeline) = tracker
            .plant_timeline(&Id { id: plant.id })
            .await
            .expect("Failed to compute timeline")
            .expect("Plant should exist");

        let current_count = timeline
            .entries()
            .iter()
            .filter(|e| e.standing == PhaseStanding::Current)
            .count();
        assert_eq!(current_count, 1);
        assert_eq!(timeline.current_index(), Some(0));
    }

    #[tokio::test]
    async fn test_advance_requires_minimum_without_force() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        // The first default phase has a multi-day minimum and just started.
        let result = tracker
            .advance(&Advance {
                plant_id: plant.id,
                force: false,
            })
            .await;
        assert!(matches!(result, Err(TrackerError::InvalidInput { .. })));

        let phases = tracker
            .advance(&Advance {
                plant_id: plant.id,
                force: true,
            })
            .await
            .expect("Forced advance should succeed");
        assert!(phases[1].is_active);
        assert!(phases[0].is_completed);
    }

    #[tokio::test]
    async fn test_set_phase_date_validates_bounds() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        // Phase 2 cannot start before phase 1 did.
        let result = tracker
            .set_phase_date(&SetPhaseDate {
                phase_id: plant.phases[1].id,
                date: Some("2000-01-01".to_string()),
                clear: false,
            })
            .await;
        assert!(matches!(result, Err(TrackerError::PhaseRule(_))));
    }

    #[tokio::test]
    async fn test_set_phase_date_clear() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let phases = tracker
            .set_phase_date(&SetPhaseDate {
                phase_id: plant.phases[0].id,
                date: None,
                clear: true,
            })
            .await
            .expect("Clearing should succeed");

        assert!(phases.iter().all(|p| p.start_date.is_none()));
        assert!(phases.iter().all(|p| !p.is_active));
    }

    #[tokio::test]
    async fn test_insert_and_delete_phase() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let before = plant.phases.len();

        let phases = tracker
            .insert_phase(&InsertPhase {
                plant_id: plant.id,
                name: "Topping recovery".to_string(),
                duration_min: 2,
                duration_max: 4,
                description: None,
                counts_toward_harvest: false,
                position: 2,
            })
            .await
            .expect("Failed to insert phase");

        assert_eq!(phases.len(), before + 1);
        assert_eq!(phases[2].name, "Topping recovery");
        assert_eq!(phases[2].position, 2);

        let after_delete = tracker
            .delete_phase(&Id { id: phases[2].id })
            .await
            .expect("Failed to delete phase");
        assert_eq!(after_delete.len(), before);
    }

    #[tokio::test]
    async fn test_delete_started_phase_rejected() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let result = tracker.delete_phase(&Id { id: plant.phases[0].id }).await;
        assert!(matches!(result, Err(TrackerError::PhaseRule(_))));
    }

    #[tokio::test]
    async fn test_reorder_keeps_start_dates() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let mut order: Vec<u64> = plant.phases.iter().map(|p| p.id).collect();
        order.swap(1, 2);

        let phases = tracker
            .reorder_phases(&ReorderPhases {
                plant_id: plant.id,
                order: order.clone(),
            })
            .await
            .expect("Failed to reorder");

        let got: Vec<u64> = phases.iter().map(|p| p.id).collect();
        assert_eq!(got, order);
        assert_eq!(phases[0].start_date, plant.phases[0].start_date);
    }

    #[tokio::test]
    async fn test_record_event_stamps_current_phase() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let event = tracker
            .record_event(&RecordEvent {
                plant_id: plant.id,
                kind: "watering".to_string(),
                note: Some("1L, pH 6.3".to_string()),
                amount: Some(1000.0),
                timestamp: None,
            })
            .await
            .expect("Failed to record event");

        assert_eq!(event.kind, EventKind::Watering);
        assert_eq!(event.phase_id, Some(plant.phases[0].id));
    }

    #[tokio::test]
    async fn test_update_event_keeps_omitted_fields() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let event = tracker
            .record_event(&RecordEvent {
                plant_id: plant.id,
                kind: "watering".to_string(),
                note: Some("1L".to_string()),
                amount: Some(1000.0),
                timestamp: None,
            })
            .await
            .expect("Failed to record event");

        let updated = tracker
            .update_event(&UpdateEvent {
                event_id: event.id,
                kind: Some("feeding".to_string()),
                note: None,
                amount: Some(2.5),
                timestamp: None,
            })
            .await
            .expect("Failed to update event");

        assert_eq!(updated.kind, EventKind::Feeding);
        assert_eq!(updated.note.as_deref(), Some("1L"));
        assert_eq!(updated.amount, Some(2.5));
        assert_eq!(updated.phase_id, event.phase_id);

        // A no-op update is rejected rather than silently accepted.
        let result = tracker
            .update_event(&UpdateEvent {
                event_id: event.id,
                ..Default::default()
            })
            .await;
        assert!(matches!(result, Err(TrackerError::InvalidInput { .. })));
    }

    #[tokio::test]
    async fn test_events_survive_phase_deletion() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;

        // Park the sequence on an inserted phase, log an event against it,
        // then move off and delete it.
        let phases = tracker
            .insert_phase(&InsertPhase {
                plant_id: plant.id,
                name: "Quarantine".to_string(),
                duration_min: 1,
                duration_max: 3,
                description: None,
                counts_toward_harvest: false,
                position: 99,
            })
            .await
            .expect("Failed to insert phase");
        let parked_id = phases.last().expect("Sequence is never empty").id;

        // The date must fall after the first phase's start (set to "now" at
        // plant creation), so derive it from the clock instead of hardcoding.
        let parked_start = (Timestamp::now() + jiff::SignedDuration::from_secs(86_400)).to_string();
        tracker
            .set_phase_date(&SetPhaseDate {
                phase_id: parked_id,
                date: Some(parked_start),
                clear: false,
            })
            .await
            .expect("Failed to start phase");

        let event = tracker
            .record_event(&RecordEvent {
                plant_id: plant.id,
                kind: "observation".to_string(),
                note: Some("spider mites".to_string()),
                amount: None,
                timestamp: None,
            })
            .await
            .expect("Failed to record event");
        assert_eq!(event.phase_id, Some(parked_id));

        tracker
            .set_phase_date(&SetPhaseDate {
                phase_id: parked_id,
                date: None,
                clear: true,
            })
            .await
            .expect("Failed to clear date");
        tracker
            .delete_phase(&Id { id: parked_id })
            .await
            .expect("Failed to delete phase");

        // The event remains, with a dangling phase reference.
        let events = tracker
            .list_events(&ListEvents {
                plant_id: plant.id,
                kind: Some("observation".to_string()),
                since: None,
            })
            .await
            .expect("Failed to list events");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].phase_id, Some(parked_id));
    }

    #[tokio::test]
    async fn test_archive_and_list() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        tracker
            .archive_plant(&Id { id: plant.id })
            .await
            .expect("Failed to archive");

        let active = tracker
            .list_plants_summary(&ListPlants { archived: false })
            .await
            .expect("Failed to list active");
        assert!(active.is_empty());

        let archived = tracker
            .list_plants_summary(&ListPlants { archived: true })
            .await
            .expect("Failed to list archived");
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].name, "Aurora");
    }

    #[tokio::test]
    async fn test_delete_plant_with_confirmation() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        let deleted = tracker
            .delete_plant_with_confirmation(&Id { id: plant.id })
            .await
            .expect("Failed to delete plant")
            .expect("Plant should exist");
        assert_eq!(deleted.id, plant.id);

        let result = tracker
            .get_plant(&Id { id: plant.id })
            .await
            .expect("Should not fail on deleted plant");
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_list_summary_counts_started_phases() {
        let (_temp_dir, tracker) = create_test_tracker().await;

        let plant = create_test_plant(&tracker).await;
        tracker
            .advance(&Advance {
                plant_id: plant.id,
                force: true,
            })
            .await
            .expect("Failed to advance");

        let summaries = tracker
            .list_plants_summary(&ListPlants { archived: false })
            .await
            .expect("Failed to list");
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].started_phases, 2);
        assert_eq!(
            summaries[0].current_phase.as_deref(),
            Some(plant.phases[1].name.as_str())
        );
    }
}

//! Database operations for plants, phases, and events.
//!
//! Every phase mutation goes through the timeline engine: the stored
//! sequence is loaded, transformed by a pure helper, and written back in
//! one transaction, so the cached `is_active`/`is_completed` flags and
//! positions can never drift from the current-phase rule.

use std::path::Path;
use std::str::FromStr;

use jiff::Timestamp;
use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    error::{Result, TrackerError},
    models::{
        Event, EventKind, LifecycleKind, PhaseInstance, PhaseTemplate, Plant, PlantFilter,
        PlantStatus, PlantSummary,
    },
    templates, timeline,
};

/// Database connection and operations handler.
pub struct Database {
    connection: Connection,
}

fn conversion_error(index: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            message,
        )),
    )
}

fn timestamp_column(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<Timestamp> {
    row.get::<_, String>(index)?
        .parse::<Timestamp>()
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                index,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

fn phase_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<PhaseInstance> {
    let start_date = match row.get::<_, Option<String>>(7)? {
        Some(s) => Some(s.parse::<Timestamp>().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(7, rusqlite::types::Type::Text, Box::new(e))
        })?),
        None => None,
    };

    Ok(PhaseInstance {
        id: row.get::<_, i64>(0)? as u64,
        plant_id: row.get::<_, i64>(1)? as u64,
        name: row.get(2)?,
        duration_min: row.get::<_, i64>(3)? as u32,
        duration_max: row.get::<_, i64>(4)? as u32,
        description: row.get(5)?,
        counts_toward_harvest: row.get(6)?,
        start_date,
        is_active: row.get(8)?,
        is_completed: row.get(9)?,
        position: row.get::<_, i64>(10)? as u32,
        created_at: timestamp_column(row, 11)?,
        updated_at: timestamp_column(row, 12)?,
    })
}

fn event_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Event> {
    let kind_str: String = row.get(3)?;
    let kind = EventKind::from_str(&kind_str)
        .map_err(|message| conversion_error(3, message))?;

    Ok(Event {
        id: row.get::<_, i64>(0)? as u64,
        plant_id: row.get::<_, i64>(1)? as u64,
        phase_id: row.get::<_, Option<i64>>(2)?.map(|id| id as u64),
        kind,
        note: row.get(4)?,
        amount: row.get(5)?,
        timestamp: timestamp_column(row, 6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

const PHASE_COLUMNS: &str = "id, plant_id, name, duration_min, duration_max, description, \
     counts_toward_harvest, start_date, is_active, is_completed, position, created_at, updated_at";

const EVENT_COLUMNS: &str = "id, plant_id, phase_id, kind, note, amount, timestamp, created_at";

fn query_phases(connection: &Connection, plant_id: u64) -> Result<Vec<PhaseInstance>> {
    let mut stmt = connection
        .prepare(&format!(
            "SELECT {PHASE_COLUMNS} FROM phases WHERE plant_id = ?1 ORDER BY position"
        ))
        .map_err(|e| TrackerError::database_error("Failed to prepare query", e))?;

    let phases = stmt
        .query_map(params![plant_id as i64], phase_from_row)
        .map_err(|e| TrackerError::database_error("Failed to query phases", e))?
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| TrackerError::database_error("Failed to fetch phases", e))?;

    Ok(phases)
}

fn plant_exists(connection: &Connection, plant_id: u64) -> Result<bool> {
    connection
        .query_row(
            "SELECT EXISTS(SELECT 1 FROM plants WHERE id = ?1)",
            params![plant_id as i64],
            |row| row.get(0),
        )
        .map_err(|e| TrackerError::database_error("Failed to check plant existence", e))
}

/// Write a transformed phase sequence back, row by row.
///
/// A phase with id 0 is new and gets inserted; everything else is updated
/// in place. Updated timestamps are stamped into the in-memory sequence so
/// the caller can return it as-is.
fn write_phases(
    connection: &Connection,
    phases: &mut [PhaseInstance],
    now: Timestamp,
) -> Result<()> {
    let now_str = now.to_string();

    for phase in phases.iter_mut() {
        phase.updated_at = now;
        if phase.id == 0 {
            connection
                .execute(
                    "INSERT INTO phases (plant_id, name, duration_min, duration_max, description, \
                     counts_toward_harvest, start_date, is_active, is_completed, position, \
                     created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
                    params![
                        phase.plant_id as i64,
                        &phase.name,
                        phase.duration_min as i64,
                        phase.duration_max as i64,
                        phase.description.as_deref(),
                        phase.counts_toward_harvest,
                        phase.start_date.map(|t| t.to_string()),
                        phase.is_active,
                        phase.is_completed,
                        phase.position as i64,
                        phase.created_at.to_string(),
                        &now_str,
                    ],
                )
                .map_err(|e| TrackerError::database_error("Failed to insert phase", e))?;
            phase.id = connection.last_insert_rowid() as u64;
        } else {
            connection
                .execute(
                    "UPDATE phases SET start_date = ?1, is_active = ?2, is_completed = ?3, \
                     position = ?4, updated_at = ?5 WHERE id = ?6",
                    params![
                        phase.start_date.map(|t| t.to_string()),
                        phase.is_active,
                        phase.is_completed,
                        phase.position as i64,
                        &now_str,
                        phase.id as i64,
                    ],
                )
                .map_err(|e| TrackerError::database_error("Failed to update phase", e))?;
        }
    }

    Ok(())
}

fn touch_plant(connection: &Connection, plant_id: u64, now_str: &str) -> Result<()> {
    connection
        .execute(
            "UPDATE plants SET updated_at = ?1 WHERE id = ?2",
            params![now_str, plant_id as i64],
        )
        .map_err(|e| TrackerError::database_error("Failed to update plant timestamp", e))?;
    Ok(())
}

impl Database {
    /// Creates a new database connection and initializes the schema.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let connection = Connection::open(path)
            .map_err(|e| TrackerError::database_error("Failed to open database connection", e))?;

        let db = Self { connection };
        db.initialize_schema()?;
        Ok(db)
    }

    /// Initializes the database schema using the embedded SQL file.
    fn initialize_schema(&self) -> Result<()> {
        // Enable foreign keys for this connection
        self.connection
            .execute("PRAGMA foreign_keys = ON", [])
            .map_err(|e| TrackerError::database_error("Failed to enable foreign keys", e))?;

        let schema_sql = include_str!("../assets/schema.sql");
        self.connection
            .execute_batch(schema_sql)
            .map_err(|e| TrackerError::database_error("Failed to initialize database schema", e))?;

        self.apply_migrations()?;

        Ok(())
    }

    /// Apply database migrations for existing databases
    fn apply_migrations(&self) -> Result<()> {
        // Databases created before the harvest tag lack the column
        let has_harvest_column: bool = self
            .connection
            .query_row(
                "SELECT COUNT(*) FROM pragma_table_info('phases') WHERE name = 'counts_toward_harvest'",
                [],
                |row| row.get(0),
            )
            .map(|count: i64| count > 0)
            .unwrap_or(false);

        if !has_harvest_column {
            self.connection
                .execute(
                    "ALTER TABLE phases ADD COLUMN counts_toward_harvest INTEGER NOT NULL DEFAULT 0",
                    [],
                )
                .map_err(|e| {
                    TrackerError::database_error(
                        "Failed to add counts_toward_harvest column to phases table",
                        e,
                    )
                })?;
        }

        Ok(())
    }

    /// Creates a new plant and instantiates its phase sequence in one
    /// transaction. Empty `strain_templates` falls back to the built-in
    /// defaults for the lifecycle; the first phase starts immediately.
    pub fn create_plant(
        &mut self,
        name: &str,
        strain: Option<&str>,
        medium: Option<&str>,
        lifecycle: LifecycleKind,
        strain_templates: &[PhaseTemplate],
    ) -> Result<Plant> {
        if name.trim().is_empty() {
            return Err(TrackerError::invalid_input("name", "cannot be empty"));
        }
        let resolved = templates::resolve_templates(lifecycle, strain_templates)?;

        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        let now = Timestamp::now();
        let now_str = now.to_string();

        tx.execute(
            "INSERT INTO plants (name, strain, medium, lifecycle, status, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                name,
                strain,
                medium,
                lifecycle.as_str(),
                PlantStatus::Active.as_str(),
                &now_str,
                &now_str
            ],
        )
        .map_err(|e| TrackerError::database_error("Failed to insert plant", e))?;

        let id = tx.last_insert_rowid() as u64;

        let mut phases = templates::instantiate(&resolved, id, now);
        write_phases(&tx, &mut phases, now)?;

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(Plant {
            id,
            name: name.to_string(),
            strain: strain.map(String::from),
            medium: medium.map(String::from),
            lifecycle,
            status: PlantStatus::Active,
            created_at: now,
            updated_at: now,
            phases,
            events: Vec::new(),
        })
    }

    /// Retrieves a plant by its ID, with phases in sequence order and
    /// events in log order.
    pub fn get_plant(&self, id: u64) -> Result<Option<Plant>> {
        let mut stmt = self
            .connection
            .prepare(
                "SELECT id, name, strain, medium, lifecycle, status, created_at, updated_at
                 FROM plants WHERE id = ?1",
            )
            .map_err(|e| TrackerError::database_error("Failed to prepare query", e))?;

        let plant = stmt
            .query_row(params![id as i64], |row| {
                let lifecycle_str: String = row.get(4)?;
                let lifecycle = LifecycleKind::from_str(&lifecycle_str)
                    .map_err(|message| conversion_error(4, message))?;
                let status_str: String = row.get(5)?;
                let status = PlantStatus::from_str(&status_str)
                    .map_err(|message| conversion_error(5, message))?;

                Ok(Plant {
                    id: row.get::<_, i64>(0)? as u64,
                    name: row.get(1)?,
                    strain: row.get(2)?,
                    medium: row.get(3)?,
                    lifecycle,
                    status,
                    created_at: timestamp_column(row, 6)?,
                    updated_at: timestamp_column(row, 7)?,
                    phases: Vec::new(),
                    events: Vec::new(),
                })
            })
            .optional()
            .map_err(|e| TrackerError::database_error("Failed to query plant", e))?;

        let Some(mut plant) = plant else {
            return Ok(None);
        };

        plant.phases = query_phases(&self.connection, id)?;
        plant.events = self.list_events(id, None, None)?;

        Ok(Some(plant))
    }

    /// Lists plant summaries with optional filtering. Archived plants are
    /// hidden unless the filter asks for them.
    pub fn list_plants(&self, filter: Option<&PlantFilter>) -> Result<Vec<PlantSummary>> {
        let view_name = if filter.as_ref().is_some_and(|f| f.include_archived) {
            "all_plant_summaries"
        } else {
            "plant_summaries"
        };

        let mut query = format!(
            "SELECT id, name, strain, status, created_at, updated_at, total_phases, \
             started_phases, current_phase FROM {view_name}"
        );

        let mut conditions = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(f) = filter {
            if let Some(ref name) = f.name_contains {
                conditions.push("name LIKE ?");
                params_vec.push(Box::new(format!("%{name}%")));
            }

            if let Some(ref status) = f.status {
                conditions.push("status = ?");
                params_vec.push(Box::new(status.as_str().to_string()));
            }
        }

        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }

        query.push_str(" ORDER BY created_at DESC");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| TrackerError::database_error("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let summaries = stmt
            .query_map(&params_refs[..], |row| {
                let status_str: String = row.get(3)?;
                let status = PlantStatus::from_str(&status_str)
                    .map_err(|message| conversion_error(3, message))?;

                Ok(PlantSummary {
                    id: row.get::<_, i64>(0)? as u64,
                    name: row.get(1)?,
                    strain: row.get(2)?,
                    status,
                    created_at: timestamp_column(row, 4)?,
                    updated_at: timestamp_column(row, 5)?,
                    total_phases: row.get::<_, i64>(6)? as u32,
                    started_phases: row.get::<_, i64>(7)? as u32,
                    current_phase: row.get(8)?,
                })
            })
            .map_err(|e| TrackerError::database_error("Failed to query plants", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TrackerError::database_error("Failed to fetch plants", e))?;

        Ok(summaries)
    }

    /// Archives a plant (soft delete).
    pub fn archive_plant(&mut self, id: u64) -> Result<()> {
        self.set_plant_status(id, PlantStatus::Archived, PlantStatus::Active)
    }

    /// Unarchives a plant (restores from archive).
    pub fn unarchive_plant(&mut self, id: u64) -> Result<()> {
        self.set_plant_status(id, PlantStatus::Active, PlantStatus::Archived)
    }

    fn set_plant_status(&mut self, id: u64, to: PlantStatus, from: PlantStatus) -> Result<()> {
        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        let now = Timestamp::now().to_string();
        let rows_affected = tx
            .execute(
                "UPDATE plants SET status = ?1, updated_at = ?2 WHERE id = ?3 AND status = ?4",
                params![to.as_str(), &now, id as i64, from.as_str()],
            )
            .map_err(|e| TrackerError::database_error("Failed to update plant status", e))?;

        if rows_affected == 0 {
            let exists: bool = tx
                .query_row(
                    "SELECT EXISTS(SELECT 1 FROM plants WHERE id = ?1)",
                    params![id as i64],
                    |row| row.get(0),
                )
                .map_err(|e| TrackerError::database_error("Failed to check plant existence", e))?;

            if !exists {
                return Err(TrackerError::PlantNotFound { id });
            }
            // Plant exists but is already in the target status, which is okay
        }

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(())
    }

    /// Permanently deletes a plant, its phases, and its events.
    pub fn delete_plant(&mut self, id: u64) -> Result<()> {
        let rows_affected = self
            .connection
            .execute("DELETE FROM plants WHERE id = ?1", params![id as i64])
            .map_err(|e| TrackerError::database_error("Failed to delete plant", e))?;

        if rows_affected == 0 {
            return Err(TrackerError::PlantNotFound { id });
        }

        Ok(())
    }

    /// Retrieves a plant's phase sequence in order.
    pub fn get_phases(&self, plant_id: u64) -> Result<Vec<PhaseInstance>> {
        if !plant_exists(&self.connection, plant_id)? {
            return Err(TrackerError::PlantNotFound { id: plant_id });
        }
        query_phases(&self.connection, plant_id)
    }

    /// Sets or clears one phase's start date, validated against its
    /// started neighbors, and returns the rewritten sequence.
    pub fn set_phase_date(
        &mut self,
        phase_id: u64,
        date: Option<Timestamp>,
    ) -> Result<Vec<PhaseInstance>> {
        let plant_id = self.plant_of_phase(phase_id)?;

        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        let phases = query_phases(&tx, plant_id)?;
        let mut next = timeline::with_start_date(&phases, phase_id, date)?;

        let now = Timestamp::now();
        write_phases(&tx, &mut next, now)?;
        touch_plant(&tx, plant_id, &now.to_string())?;

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(next)
    }

    /// Starts the phase after the current one at now, unconditionally, and
    /// returns the rewritten sequence.
    pub fn advance_plant(&mut self, plant_id: u64) -> Result<Vec<PhaseInstance>> {
        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        if !plant_exists(&tx, plant_id)? {
            return Err(TrackerError::PlantNotFound { id: plant_id });
        }

        let phases = query_phases(&tx, plant_id)?;
        let now = Timestamp::now();
        let mut next = timeline::advanced(&phases, now)?;

        write_phases(&tx, &mut next, now)?;
        touch_plant(&tx, plant_id, &now.to_string())?;

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(next)
    }

    /// Rearranges a plant's phases to the given ID order and returns the
    /// rewritten sequence. Start dates are untouched.
    pub fn reorder_phases(&mut self, plant_id: u64, order: &[u64]) -> Result<Vec<PhaseInstance>> {
        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        if !plant_exists(&tx, plant_id)? {
            return Err(TrackerError::PlantNotFound { id: plant_id });
        }

        let phases = query_phases(&tx, plant_id)?;
        let mut next = timeline::reordered(&phases, order)?;

        let now = Timestamp::now();
        write_phases(&tx, &mut next, now)?;
        touch_plant(&tx, plant_id, &now.to_string())?;

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(next)
    }

    /// Inserts a new unstarted phase from a template at the given position
    /// and returns the rewritten sequence. Positions past the end append.
    pub fn insert_phase(
        &mut self,
        plant_id: u64,
        template: &PhaseTemplate,
        position: usize,
    ) -> Result<Vec<PhaseInstance>> {
        template.validate()?;

        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        if !plant_exists(&tx, plant_id)? {
            return Err(TrackerError::PlantNotFound { id: plant_id });
        }

        let phases = query_phases(&tx, plant_id)?;
        let now = Timestamp::now();

        let new_phase = PhaseInstance {
            id: 0,
            plant_id,
            name: template.name.clone(),
            duration_min: template.duration_min,
            duration_max: template.duration_max,
            description: template.description.clone(),
            counts_toward_harvest: template.counts_toward_harvest,
            start_date: None,
            is_active: false,
            is_completed: false,
            position: 0,
            created_at: now,
            updated_at: now,
        };
        let mut next = timeline::with_inserted(&phases, new_phase, position);

        write_phases(&tx, &mut next, now)?;
        touch_plant(&tx, plant_id, &now.to_string())?;

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(next)
    }

    /// Deletes an unstarted phase and returns the rewritten sequence.
    /// Started phases and the last remaining phase are rejected; events
    /// linked to the deleted phase keep their dangling reference.
    pub fn delete_phase(&mut self, phase_id: u64) -> Result<Vec<PhaseInstance>> {
        let plant_id = self.plant_of_phase(phase_id)?;

        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        let phases = query_phases(&tx, plant_id)?;
        let mut next = timeline::without_phase(&phases, phase_id)?;

        tx.execute("DELETE FROM phases WHERE id = ?1", params![phase_id as i64])
            .map_err(|e| TrackerError::database_error("Failed to delete phase", e))?;

        let now = Timestamp::now();
        write_phases(&tx, &mut next, now)?;
        touch_plant(&tx, plant_id, &now.to_string())?;

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(next)
    }

    fn plant_of_phase(&self, phase_id: u64) -> Result<u64> {
        self.connection
            .query_row(
                "SELECT plant_id FROM phases WHERE id = ?1",
                params![phase_id as i64],
                |row| row.get::<_, i64>(0),
            )
            .optional()
            .map_err(|e| TrackerError::database_error("Failed to query phase", e))?
            .map(|id| id as u64)
            .ok_or(TrackerError::PhaseNotFound { id: phase_id })
    }

    /// Records a new event, stamped with the plant's current phase at
    /// creation time. `timestamp` defaults to now.
    pub fn create_event(
        &mut self,
        plant_id: u64,
        kind: EventKind,
        note: Option<&str>,
        amount: Option<f64>,
        timestamp: Option<Timestamp>,
    ) -> Result<Event> {
        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        if !plant_exists(&tx, plant_id)? {
            return Err(TrackerError::PlantNotFound { id: plant_id });
        }

        let phases = query_phases(&tx, plant_id)?;
        let phase_id = timeline::current_phase_id(&phases);

        let now = Timestamp::now();
        let timestamp = timestamp.unwrap_or(now);
        let now_str = now.to_string();

        tx.execute(
            "INSERT INTO events (plant_id, phase_id, kind, note, amount, timestamp, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                plant_id as i64,
                phase_id.map(|id| id as i64),
                kind.as_str(),
                note,
                amount,
                timestamp.to_string(),
                &now_str,
            ],
        )
        .map_err(|e| TrackerError::database_error("Failed to insert event", e))?;

        let id = tx.last_insert_rowid() as u64;

        touch_plant(&tx, plant_id, &now_str)?;

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(Event {
            id,
            plant_id,
            phase_id,
            kind,
            note: note.map(String::from),
            amount,
            timestamp,
            created_at: now,
        })
    }

    /// Retrieves a single event by its ID.
    pub fn get_event(&self, event_id: u64) -> Result<Option<Event>> {
        self.connection
            .query_row(
                &format!("SELECT {EVENT_COLUMNS} FROM events WHERE id = ?1"),
                params![event_id as i64],
                event_from_row,
            )
            .optional()
            .map_err(|e| TrackerError::database_error("Failed to query event", e))
    }

    /// Edits a recorded event in place. `None` fields keep their stored
    /// values; the phase stamp is never touched.
    pub fn update_event(
        &mut self,
        event_id: u64,
        kind: Option<EventKind>,
        note: Option<&str>,
        amount: Option<f64>,
        timestamp: Option<Timestamp>,
    ) -> Result<Event> {
        let mut event = self
            .get_event(event_id)?
            .ok_or(TrackerError::EventNotFound { id: event_id })?;

        if let Some(kind) = kind {
            event.kind = kind;
        }
        if let Some(note) = note {
            event.note = Some(note.to_string());
        }
        if let Some(amount) = amount {
            event.amount = Some(amount);
        }
        if let Some(timestamp) = timestamp {
            event.timestamp = timestamp;
        }

        let tx = self
            .connection
            .transaction()
            .map_err(|e| TrackerError::database_error("Failed to begin transaction", e))?;

        tx.execute(
            "UPDATE events SET kind = ?1, note = ?2, amount = ?3, timestamp = ?4 WHERE id = ?5",
            params![
                event.kind.as_str(),
                event.note.as_deref(),
                event.amount,
                event.timestamp.to_string(),
                event_id as i64,
            ],
        )
        .map_err(|e| TrackerError::database_error("Failed to update event", e))?;

        touch_plant(&tx, event.plant_id, &Timestamp::now().to_string())?;

        tx.commit()
            .map_err(|e| TrackerError::database_error("Failed to commit transaction", e))?;

        Ok(event)
    }

    /// Lists a plant's events in log order, optionally limited to one kind
    /// or to events at or after `since`.
    pub fn list_events(
        &self,
        plant_id: u64,
        kind: Option<EventKind>,
        since: Option<Timestamp>,
    ) -> Result<Vec<Event>> {
        let mut query =
            format!("SELECT {EVENT_COLUMNS} FROM events WHERE plant_id = ?");

        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(plant_id as i64)];

        if let Some(kind) = kind {
            query.push_str(" AND kind = ?");
            params_vec.push(Box::new(kind.as_str().to_string()));
        }

        if let Some(since) = since {
            query.push_str(" AND timestamp >= ?");
            params_vec.push(Box::new(since.to_string()));
        }

        query.push_str(" ORDER BY timestamp");

        let mut stmt = self
            .connection
            .prepare(&query)
            .map_err(|e| TrackerError::database_error("Failed to prepare query", e))?;

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|b| &**b).collect();

        let events = stmt
            .query_map(&params_refs[..], event_from_row)
            .map_err(|e| TrackerError::database_error("Failed to query events", e))?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| TrackerError::database_error("Failed to fetch events", e))?;

        Ok(events)
    }

    /// Deletes a single event.
    pub fn delete_event(&mut self, event_id: u64) -> Result<()> {
        let rows_affected = self
            .connection
            .execute("DELETE FROM events WHERE id = ?1", params![event_id as i64])
            .map_err(|e| TrackerError::database_error("Failed to delete event", e))?;

        if rows_affected == 0 {
            return Err(TrackerError::EventNotFound { id: event_id });
        }

        Ok(())
    }
}

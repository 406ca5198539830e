use std::str::FromStr;

use tempfile::NamedTempFile;
use verdant_core::{
    Database, EventKind, LifecycleKind, PhaseTemplate, PlantFilter, PlantStatus, TrackerError,
};

/// Helper function to create a temporary database for testing
fn create_test_db() -> (NamedTempFile, Database) {
    let temp_file = NamedTempFile::new().expect("Failed to create temporary file");
    let db = Database::new(temp_file.path()).expect("Failed to create test database");
    (temp_file, db)
}

fn create_test_plant(db: &mut Database) -> verdant_core::Plant {
    db.create_plant(
        "Aurora",
        Some("Northern Lights"),
        Some("soil"),
        LifecycleKind::Photoperiod,
        &[],
    )
    .expect("Failed to create plant")
}

#[test]
fn test_database_initialization() {
    let (temp_file, _db) = create_test_db();
    assert!(temp_file.path().exists());
}

#[test]
fn test_reopening_existing_database() {
    let (temp_file, mut db) = create_test_db();
    let plant = create_test_plant(&mut db);
    drop(db);

    // Schema initialization and migrations must be idempotent.
    let reopened = Database::new(temp_file.path()).expect("Failed to reopen database");
    let loaded = reopened
        .get_plant(plant.id)
        .expect("Failed to get plant")
        .expect("Plant should exist");
    assert_eq!(loaded.name, "Aurora");
    assert_eq!(loaded.phases.len(), plant.phases.len());
}

#[test]
fn test_create_plant_instantiates_default_phases() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    assert!(plant.id > 0);
    assert_eq!(plant.lifecycle, LifecycleKind::Photoperiod);
    assert_eq!(plant.status, PlantStatus::Active);
    assert!(plant.phases.len() >= 5);
    assert!(plant.phases[0].is_active);
    assert!(plant.phases[0].start_date.is_some());
    assert!(plant.phases.iter().all(|p| p.id > 0));
    assert!(plant.events.is_empty());
}

#[test]
fn test_create_plant_with_strain_templates() {
    let (_temp_file, mut db) = create_test_db();

    let templates = vec![
        PhaseTemplate::new("Sprout", 2, 4),
        PhaseTemplate {
            counts_toward_harvest: true,
            ..PhaseTemplate::new("Bloom", 30, 60)
        },
    ];
    let plant = db
        .create_plant("Custom", None, None, LifecycleKind::Autoflower, &templates)
        .expect("Failed to create plant");

    assert_eq!(plant.phases.len(), 2);
    assert_eq!(plant.phases[1].name, "Bloom");
    assert!(plant.phases[1].counts_toward_harvest);
}

#[test]
fn test_create_plant_rejects_blank_name() {
    let (_temp_file, mut db) = create_test_db();

    let result = db.create_plant("   ", None, None, LifecycleKind::Photoperiod, &[]);
    assert!(matches!(result, Err(TrackerError::InvalidInput { .. })));
}

#[test]
fn test_list_plants_respects_status_filter() {
    let (_temp_file, mut db) = create_test_db();

    let kept = create_test_plant(&mut db);
    let archived = db
        .create_plant("Old one", None, None, LifecycleKind::Autoflower, &[])
        .expect("Failed to create plant");
    db.archive_plant(archived.id).expect("Failed to archive");

    let active = db.list_plants(None).expect("Failed to list");
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].id, kept.id);
    assert_eq!(active[0].current_phase.as_deref(), Some("Germination"));

    let all = db
        .list_plants(Some(&PlantFilter {
            include_archived: true,
            ..Default::default()
        }))
        .expect("Failed to list all");
    assert_eq!(all.len(), 2);
}

#[test]
fn test_list_plants_name_filter() {
    let (_temp_file, mut db) = create_test_db();

    create_test_plant(&mut db);
    db.create_plant("Bruce", None, None, LifecycleKind::Photoperiod, &[])
        .expect("Failed to create plant");

    let hits = db
        .list_plants(Some(&PlantFilter {
            name_contains: Some("uro".to_string()),
            ..Default::default()
        }))
        .expect("Failed to list");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Aurora");
}

#[test]
fn test_archive_unarchive_round_trip() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    db.archive_plant(plant.id).expect("Failed to archive");
    // Archiving twice is a no-op, not an error.
    db.archive_plant(plant.id).expect("Repeat archive failed");
    db.unarchive_plant(plant.id).expect("Failed to unarchive");

    let active = db.list_plants(None).expect("Failed to list");
    assert_eq!(active.len(), 1);

    assert!(matches!(
        db.archive_plant(999),
        Err(TrackerError::PlantNotFound { id: 999 })
    ));
}

#[test]
fn test_delete_plant_cascades() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    db.create_event(plant.id, EventKind::Watering, None, Some(500.0), None)
        .expect("Failed to create event");

    db.delete_plant(plant.id).expect("Failed to delete");

    assert!(db.get_plant(plant.id).expect("query failed").is_none());
    assert!(matches!(
        db.get_phases(plant.id),
        Err(TrackerError::PlantNotFound { .. })
    ));
}

#[test]
fn test_advance_rewrites_flags() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    let phases = db.advance_plant(plant.id).expect("Failed to advance");

    assert!(phases[0].is_completed);
    assert!(!phases[0].is_active);
    assert!(phases[1].is_active);
    assert!(phases[1].start_date.is_some());

    // The rewrite is persisted, not just returned.
    let stored = db.get_phases(plant.id).expect("Failed to load phases");
    assert!(stored[1].is_active);
}

#[test]
fn test_set_phase_date_validates_and_persists() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    let second = plant.phases[1].id;

    let too_early = "2000-01-01T00:00:00Z".parse().unwrap();
    assert!(matches!(
        db.set_phase_date(second, Some(too_early)),
        Err(TrackerError::PhaseRule(_))
    ));

    let phases = db
        .set_phase_date(second, plant.phases[0].start_date)
        .expect("Same instant as predecessor is allowed");
    assert!(phases[1].is_active);
    assert!(phases[0].is_completed);
}

#[test]
fn test_set_phase_date_unknown_phase() {
    let (_temp_file, mut db) = create_test_db();
    create_test_plant(&mut db);

    assert!(matches!(
        db.set_phase_date(12345, None),
        Err(TrackerError::PhaseNotFound { id: 12345 })
    ));
}

#[test]
fn test_insert_phase_at_position() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    let template = PhaseTemplate::new("Recovery", 2, 4);
    let phases = db
        .insert_phase(plant.id, &template, 1)
        .expect("Failed to insert");

    assert_eq!(phases.len(), plant.phases.len() + 1);
    assert_eq!(phases[1].name, "Recovery");
    assert_eq!(phases[1].start_date, None);
    let positions: Vec<u32> = phases.iter().map(|p| p.position).collect();
    let expected: Vec<u32> = (0..phases.len() as u32).collect();
    assert_eq!(positions, expected);
}

#[test]
fn test_delete_phase_rules() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    // Started phase is protected.
    assert!(matches!(
        db.delete_phase(plant.phases[0].id),
        Err(TrackerError::PhaseRule(_))
    ));

    let removed_id = plant.phases[2].id;
    let phases = db.delete_phase(removed_id).expect("Failed to delete");
    assert!(phases.iter().all(|p| p.id != removed_id));
    assert_eq!(phases.len(), plant.phases.len() - 1);
}

#[test]
fn test_reorder_persists_new_positions() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    let mut order: Vec<u64> = plant.phases.iter().map(|p| p.id).collect();
    order.reverse();

    let phases = db
        .reorder_phases(plant.id, &order)
        .expect("Failed to reorder");
    let got: Vec<u64> = phases.iter().map(|p| p.id).collect();
    assert_eq!(got, order);

    // The started first phase is now last, so it stays current.
    let stored = db.get_phases(plant.id).expect("Failed to load");
    assert!(stored.last().expect("non-empty").is_active);

    assert!(matches!(
        db.reorder_phases(plant.id, &order[1..]),
        Err(TrackerError::PhaseRule(_))
    ));
}

#[test]
fn test_event_round_trip_and_filters() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    let watering = db
        .create_event(plant.id, EventKind::Watering, Some("1L"), Some(1000.0), None)
        .expect("Failed to create event");
    db.create_event(plant.id, EventKind::Feeding, None, Some(2.5), None)
        .expect("Failed to create event");

    assert_eq!(watering.phase_id, Some(plant.phases[0].id));

    let all = db
        .list_events(plant.id, None, None)
        .expect("Failed to list");
    assert_eq!(all.len(), 2);

    let just_water = db
        .list_events(plant.id, Some(EventKind::Watering), None)
        .expect("Failed to list");
    assert_eq!(just_water.len(), 1);
    assert_eq!(just_water[0].note.as_deref(), Some("1L"));
    assert_eq!(just_water[0].amount, Some(1000.0));

    let future = "2099-01-01T00:00:00Z".parse().unwrap();
    let none = db
        .list_events(plant.id, None, Some(future))
        .expect("Failed to list");
    assert!(none.is_empty());
}

#[test]
fn test_event_with_explicit_timestamp() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    let when = "2026-02-01T08:00:00Z".parse().unwrap();
    let event = db
        .create_event(plant.id, EventKind::Observation, Some("pistils"), None, Some(when))
        .expect("Failed to create event");
    assert_eq!(event.timestamp, when);

    let loaded = db
        .get_plant(plant.id)
        .expect("Failed to get plant")
        .expect("Plant should exist");
    assert_eq!(loaded.events.len(), 1);
    assert_eq!(loaded.events[0].timestamp, when);
}

#[test]
fn test_update_event_partial_fields() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    let event = db
        .create_event(plant.id, EventKind::Watering, Some("1L"), Some(1000.0), None)
        .expect("Failed to create event");

    let when = "2026-02-01T08:00:00Z".parse().unwrap();
    let updated = db
        .update_event(event.id, None, Some("1.5L, pH 6.1"), Some(1500.0), Some(when))
        .expect("Failed to update event");

    // Omitted fields keep their stored values.
    assert_eq!(updated.kind, EventKind::Watering);
    assert_eq!(updated.note.as_deref(), Some("1.5L, pH 6.1"));
    assert_eq!(updated.amount, Some(1500.0));
    assert_eq!(updated.timestamp, when);
    assert_eq!(updated.phase_id, event.phase_id);

    let stored = db
        .list_events(plant.id, None, None)
        .expect("Failed to list");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].note.as_deref(), Some("1.5L, pH 6.1"));
    assert_eq!(stored[0].timestamp, when);

    assert!(matches!(
        db.update_event(999, Some(EventKind::Feeding), None, None, None),
        Err(TrackerError::EventNotFound { id: 999 })
    ));
}

#[test]
fn test_delete_event() {
    let (_temp_file, mut db) = create_test_db();

    let plant = create_test_plant(&mut db);
    let event = db
        .create_event(plant.id, EventKind::Training, None, None, None)
        .expect("Failed to create event");

    db.delete_event(event.id).expect("Failed to delete event");
    assert!(matches!(
        db.delete_event(event.id),
        Err(TrackerError::EventNotFound { .. })
    ));
}

#[test]
fn test_event_kind_parsing_matches_storage() {
    for kind in EventKind::ALL {
        assert_eq!(EventKind::from_str(kind.as_str()), Ok(kind));
    }
}

#[test]
fn test_event_for_unknown_plant() {
    let (_temp_file, mut db) = create_test_db();

    assert!(matches!(
        db.create_event(42, EventKind::Watering, None, None, None),
        Err(TrackerError::PlantNotFound { id: 42 })
    ));
}

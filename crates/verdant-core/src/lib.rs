//! Core library for the Verdant cultivation tracking application.
//!
//! This crate provides the core business logic for tracking plants through
//! their growth phases: the pure timeline engine, phase templates, event
//! aggregation, database operations, data models, and error handling.
//!
//! # Timeline Architecture
//!
//! The heart of the crate is the [`timeline`] module: a pure computation
//! over an ordered phase sequence and a reference instant. The current
//! phase is always derived (the last phase with a start date), never
//! stored, and every phase mutation flows through the engine's pure
//! helpers so the cached flags stay consistent with that rule. The
//! [`db`]/[`tracker`] layers persist what the engine produces.
//!
//! # Quick Start
//!
//! ```rust
//! use verdant_core::{TrackerBuilder, params::CreatePlant};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a tracker instance
//! let tracker = TrackerBuilder::new()
//!     .with_database_path("test.db")
//!     .build()
//!     .await?;
//!
//! // Create a plant with the default photoperiod phase sequence
//! let create_params = CreatePlant {
//!     name: "Aurora".to_string(),
//!     strain: Some("Northern Lights".to_string()),
//!     ..Default::default()
//! };
//!
//! let plant = tracker.create_plant(&create_params).await?;
//! println!("Created plant: {}", plant);
//!
//! // Show its timeline
//! use verdant_core::{display::TimelineView, params::Id};
//! if let Some((plant, timeline)) = tracker.plant_timeline(&Id { id: plant.id }).await? {
//!     println!("{}", TimelineView::new(&plant, &timeline));
//! }
//! # Ok(())
//! # }
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod events;
pub mod models;
pub mod params;
pub mod templates;
pub mod timeline;
pub mod tracker;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    ActivityView, CreateResult, DeleteResult, EventList, OperationStatus, PhaseList, PlantList,
    TimelineView,
};
pub use error::{Result, TrackerError};
pub use models::{
    Event, EventKind, LifecycleKind, LocalDateTime, PhaseInstance, PhaseTemplate, Plant,
    PlantFilter, PlantStatus, PlantSummary,
};
pub use params::{
    Advance, CreatePlant, Id, InsertPhase, ListEvents, ListPlants, RecordEvent, ReorderPhases,
    SetPhaseDate, UpdateEvent,
};
pub use timeline::{
    PhaseRuleViolation, PhaseStanding, PhaseTimeline, TimelineEntry, TimelineSummary,
};
pub use tracker::{Tracker, TrackerBuilder};

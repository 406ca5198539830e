//! Phase templates and the built-in default sequences.
//!
//! A new plant's phase sequence is instantiated from a strain's templates,
//! or from one of two built-in sequences selected by [`LifecycleKind`] when
//! the strain supplies none. Template validation happens here, at the
//! boundary; the timeline engine assumes well-formed phases.

use jiff::Timestamp;

use crate::error::{Result, TrackerError};
use crate::models::{LifecycleKind, PhaseInstance, PhaseTemplate};

impl PhaseTemplate {
    /// Build a template with no description and no harvest tag.
    pub fn new(name: impl Into<String>, duration_min: u32, duration_max: u32) -> Self {
        Self {
            name: name.into(),
            duration_min,
            duration_max,
            description: None,
            counts_toward_harvest: false,
        }
    }

    fn harvest(name: impl Into<String>, duration_min: u32, duration_max: u32) -> Self {
        Self {
            counts_toward_harvest: true,
            ..Self::new(name, duration_min, duration_max)
        }
    }

    /// Check the duration range: both bounds positive, min not above max.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TrackerError::invalid_input("name", "cannot be empty"));
        }
        if self.duration_min == 0 || self.duration_max == 0 {
            return Err(TrackerError::invalid_input(
                "duration",
                "phase durations must be at least one day",
            ));
        }
        if self.duration_min > self.duration_max {
            return Err(TrackerError::invalid_input(
                "duration",
                format!(
                    "minimum duration ({} days) exceeds maximum ({} days)",
                    self.duration_min, self.duration_max
                ),
            ));
        }
        Ok(())
    }
}

/// The built-in default sequence for a lifecycle.
///
/// Photoperiod strains get a pre-flower stretch stage that autoflowers
/// skip. The flowering and flush stages carry the harvest tag, so the
/// harvest estimate projects to the end of the flush.
pub fn default_templates(lifecycle: LifecycleKind) -> Vec<PhaseTemplate> {
    match lifecycle {
        LifecycleKind::Photoperiod => vec![
            PhaseTemplate::new("Germination", 3, 10),
            PhaseTemplate::new("Seedling", 14, 21),
            PhaseTemplate::new("Vegetation", 28, 56),
            PhaseTemplate::new("Pre-flower", 7, 14),
            PhaseTemplate::harvest("Flowering", 49, 70),
            PhaseTemplate::harvest("Flush", 7, 14),
            PhaseTemplate::new("Drying", 7, 14),
            PhaseTemplate::new("Curing", 14, 56),
        ],
        LifecycleKind::Autoflower => vec![
            PhaseTemplate::new("Germination", 1, 7),
            PhaseTemplate::new("Seedling", 7, 14),
            PhaseTemplate::new("Vegetation", 21, 28),
            PhaseTemplate::harvest("Flowering", 35, 49),
            PhaseTemplate::harvest("Flush", 7, 10),
            PhaseTemplate::new("Drying", 7, 14),
            PhaseTemplate::new("Curing", 14, 42),
        ],
    }
}

/// Pick the strain's templates, falling back to the built-in defaults when
/// the strain supplies none. Every template is validated.
pub fn resolve_templates(
    lifecycle: LifecycleKind,
    strain_templates: &[PhaseTemplate],
) -> Result<Vec<PhaseTemplate>> {
    let templates = if strain_templates.is_empty() {
        default_templates(lifecycle)
    } else {
        strain_templates.to_vec()
    };
    for template in &templates {
        template.validate()?;
    }
    Ok(templates)
}

/// Instantiate the initial phase sequence for a new plant.
///
/// Copies each template's fields, marks the first phase started at `now`
/// and active, everything else unstarted. IDs are left at zero; the store
/// assigns real IDs on insert.
pub fn instantiate(templates: &[PhaseTemplate], plant_id: u64, now: Timestamp) -> Vec<PhaseInstance> {
    templates
        .iter()
        .enumerate()
        .map(|(index, template)| PhaseInstance {
            id: 0,
            plant_id,
            name: template.name.clone(),
            duration_min: template.duration_min,
            duration_max: template.duration_max,
            description: template.description.clone(),
            counts_toward_harvest: template.counts_toward_harvest,
            start_date: (index == 0).then_some(now),
            is_active: index == 0,
            is_completed: false,
            position: index as u32,
            created_at: now,
            updated_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sequences_are_valid_and_ordered() {
        for lifecycle in [LifecycleKind::Photoperiod, LifecycleKind::Autoflower] {
            let templates = default_templates(lifecycle);
            assert!(!templates.is_empty());
            for template in &templates {
                template.validate().unwrap();
            }
            assert_eq!(templates[0].name, "Germination");
            assert!(templates.iter().any(|t| t.counts_toward_harvest));
        }
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let template = PhaseTemplate::new("Veg", 0, 5);
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let template = PhaseTemplate::new("Veg", 9, 5);
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let template = PhaseTemplate::new("  ", 1, 5);
        assert!(template.validate().is_err());
    }

    #[test]
    fn test_resolve_falls_back_to_defaults() {
        let resolved = resolve_templates(LifecycleKind::Autoflower, &[]).unwrap();
        assert_eq!(resolved.len(), default_templates(LifecycleKind::Autoflower).len());
    }

    #[test]
    fn test_resolve_prefers_strain_templates() {
        let strain = vec![
            PhaseTemplate::new("Sprout", 2, 4),
            PhaseTemplate::harvest("Bloom", 30, 60),
        ];
        let resolved = resolve_templates(LifecycleKind::Photoperiod, &strain).unwrap();
        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[1].name, "Bloom");
    }

    #[test]
    fn test_instantiate_starts_only_first_phase() {
        let now = Timestamp::from_second(1_700_000_000).unwrap();
        let templates = default_templates(LifecycleKind::Photoperiod);
        let phases = instantiate(&templates, 7, now);

        assert_eq!(phases.len(), templates.len());
        assert_eq!(phases[0].start_date, Some(now));
        assert!(phases[0].is_active);
        for (index, phase) in phases.iter().enumerate() {
            assert_eq!(phase.plant_id, 7);
            assert_eq!(phase.position, index as u32);
            if index > 0 {
                assert_eq!(phase.start_date, None);
                assert!(!phase.is_active);
            }
            assert!(!phase.is_completed);
        }
    }
}

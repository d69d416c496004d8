//! Core filtering functionality for classified encounters
//!
//! Filters select which already-classified encounters feed the aggregator.
//! They never run before classification, so a filter cannot change the
//! flags of the encounters it keeps.

use crate::filter::date::DateRange;
use crate::models::encounter::{ClassifiedEncounter, Encounter};

/// Trait for encounter predicates used by report queries
pub trait EncounterFilter: std::fmt::Debug {
    /// Whether the encounter should be kept
    fn matches(&self, encounter: &Encounter) -> bool;
}

impl EncounterFilter for DateRange {
    fn matches(&self, encounter: &Encounter) -> bool {
        self.contains(encounter.encounter_date)
    }
}

/// Keep the classified encounters that match a filter, preserving order
pub fn apply_filter<'a, F>(
    encounters: &'a [ClassifiedEncounter],
    filter: &'a F,
) -> impl Iterator<Item = &'a ClassifiedEncounter> + 'a
where
    F: EncounterFilter + ?Sized,
{
    encounters
        .iter()
        .filter(move |classified| filter.matches(&classified.encounter))
}

//! The immutable classified dataset shared by every report query

use crate::filter::date::DateRange;
use crate::models::dimension::CategoryIndex;
use crate::models::encounter::ClassifiedEncounter;
use crate::models::period::PeriodKey;

/// Encounters with their flags, plus dataset-level facts
///
/// Built once per loaded dataset by [`classify`](super::classifier::classify)
/// and never mutated afterwards; queries only read it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedDataset {
    encounters: Vec<ClassifiedEncounter>,
    max_period: Option<PeriodKey>,
    date_bounds: Option<DateRange>,
    categories: CategoryIndex,
    patient_count: usize,
}

impl ClassifiedDataset {
    pub(crate) const fn new(
        encounters: Vec<ClassifiedEncounter>,
        max_period: Option<PeriodKey>,
        date_bounds: Option<DateRange>,
        categories: CategoryIndex,
        patient_count: usize,
    ) -> Self {
        Self {
            encounters,
            max_period,
            date_bounds,
            categories,
            patient_count,
        }
    }

    /// Classified encounters, in loader order
    #[must_use]
    pub fn encounters(&self) -> &[ClassifiedEncounter] {
        &self.encounters
    }

    /// Number of encounters
    #[must_use]
    pub fn len(&self) -> usize {
        self.encounters.len()
    }

    /// Whether the dataset has no encounters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.encounters.is_empty()
    }

    /// The most recent period in the dataset, treated as still open
    #[must_use]
    pub const fn max_period(&self) -> Option<PeriodKey> {
        self.max_period
    }

    /// Earliest and latest encounter dates; the default report window
    #[must_use]
    pub const fn date_bounds(&self) -> Option<DateRange> {
        self.date_bounds
    }

    /// Known facility and jurisdiction values
    #[must_use]
    pub const fn categories(&self) -> &CategoryIndex {
        &self.categories
    }

    /// Number of distinct patients
    #[must_use]
    pub const fn patient_count(&self) -> usize {
        self.patient_count
    }
}

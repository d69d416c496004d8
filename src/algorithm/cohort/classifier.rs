//! Cohort-flow classification
//!
//! Flags every encounter as new, egress and/or prevalent from the patient's
//! complete history:
//!
//! - **new**: the encounter is on the patient's earliest date. Every
//!   encounter tied on that date is flagged.
//! - **egress**: the encounter is on the patient's latest date, unless it
//!   falls in the dataset's most recent period. That month is still open, so
//!   a last visit there is not yet a confirmed discharge.
//! - **prevalent**: the encounter is the patient's first in its month. Exactly
//!   one per patient and month; same-day ties go to the earlier input row.

use std::collections::hash_map::Entry;
use std::time::Instant;

use chrono::NaiveDate;
use log::{debug, info};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::algorithm::cohort::dataset::ClassifiedDataset;
use crate::error::Result;
use crate::filter::date::DateRange;
use crate::models::dimension::CategoryIndex;
use crate::models::encounter::{
    ClassificationFlags, ClassifiedEncounter, Encounter, EncounterRecord,
};
use crate::models::period::PeriodKey;

/// Row indices of one patient's encounters
type PatientRows = SmallVec<[usize; 16]>;

/// Validate and classify a complete set of loaded records
///
/// The input must be the whole dataset. Classifying a date-filtered subset
/// would make mid-history visits look like first or last ones.
///
/// # Errors
/// Returns a data error naming the first record without a patient
/// identifier or encounter date. Nothing is dropped or coerced.
pub fn classify(records: &[EncounterRecord]) -> Result<ClassifiedDataset> {
    let encounters = records
        .iter()
        .enumerate()
        .map(|(row, record)| Encounter::from_record(row, record))
        .collect::<Result<Vec<_>>>()?;

    Ok(classify_encounters(encounters))
}

/// Classify encounters that have already been validated
#[must_use]
pub fn classify_encounters(encounters: Vec<Encounter>) -> ClassifiedDataset {
    let start = Instant::now();

    let Some(max_period) = encounters.iter().map(|e| e.period).max() else {
        return ClassifiedDataset::default();
    };
    let date_bounds = date_bounds(&encounters);

    let patients = group_by_patient(&encounters);
    let patient_count = patients.len();

    let mut flags = vec![ClassificationFlags::default(); encounters.len()];
    let patient_flags: Vec<Vec<(usize, ClassificationFlags)>> = patients
        .par_iter()
        .map(|rows| classify_patient(&encounters, rows, max_period))
        .collect();
    for (row, row_flags) in patient_flags.into_iter().flatten() {
        flags[row] = row_flags;
    }

    let categories = CategoryIndex::from_encounters(&encounters);
    let classified: Vec<ClassifiedEncounter> = encounters
        .into_iter()
        .zip(flags)
        .map(|(encounter, flags)| ClassifiedEncounter { encounter, flags })
        .collect();

    info!(
        "Classified {} encounters for {} patients in {:?} (open period {max_period})",
        classified.len(),
        patient_count,
        start.elapsed()
    );

    ClassifiedDataset::new(
        classified,
        Some(max_period),
        date_bounds,
        categories,
        patient_count,
    )
}

/// Group row indices by patient, keeping first-seen patient order
fn group_by_patient(encounters: &[Encounter]) -> Vec<PatientRows> {
    let mut slots: FxHashMap<&str, usize> = FxHashMap::default();
    let mut patients: Vec<PatientRows> = Vec::new();

    for (row, encounter) in encounters.iter().enumerate() {
        match slots.entry(encounter.patient_id.as_str()) {
            Entry::Occupied(slot) => patients[*slot.get()].push(row),
            Entry::Vacant(slot) => {
                slot.insert(patients.len());
                let mut rows = PatientRows::new();
                rows.push(row);
                patients.push(rows);
            }
        }
    }

    debug!(
        "Grouped {} encounters into {} patients",
        encounters.len(),
        patients.len()
    );
    patients
}

/// Flags for one patient's encounters, keyed by row index
fn classify_patient(
    encounters: &[Encounter],
    rows: &[usize],
    max_period: PeriodKey,
) -> Vec<(usize, ClassificationFlags)> {
    let dates = rows.iter().map(|&row| encounters[row].encounter_date);
    let (Some(first_date), Some(last_date)) = (dates.clone().min(), dates.max()) else {
        return Vec::new();
    };

    // Earliest row per month; rows are ascending so the first minimum wins ties
    let mut first_in_period: FxHashMap<PeriodKey, usize> = FxHashMap::default();
    for &row in rows {
        let encounter = &encounters[row];
        first_in_period
            .entry(encounter.period)
            .and_modify(|current| {
                if encounter.encounter_date < encounters[*current].encounter_date {
                    *current = row;
                }
            })
            .or_insert(row);
    }

    rows.iter()
        .map(|&row| {
            let encounter = &encounters[row];
            let flags = ClassificationFlags {
                is_new: encounter.encounter_date == first_date,
                is_egress: encounter.encounter_date == last_date && encounter.period != max_period,
                is_prevalent: first_in_period.get(&encounter.period) == Some(&row),
            };
            (row, flags)
        })
        .collect()
}

fn date_bounds(encounters: &[Encounter]) -> Option<DateRange> {
    let dates = encounters.iter().map(|e| e.encounter_date);
    let min: NaiveDate = dates.clone().min()?;
    let max: NaiveDate = dates.max()?;
    DateRange::new(min, max).ok()
}

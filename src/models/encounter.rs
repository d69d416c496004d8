//! Encounter entity models
//!
//! An `EncounterRecord` is one row as it comes out of the loader, with every
//! field optional. An `Encounter` is the validated form the classifier works
//! on: patient and date are guaranteed present.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::dimension::{Dimension, UNASSIGNED_LABEL};
use crate::models::period::PeriodKey;

/// One loaded encounter row, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EncounterRecord {
    /// Patient identifier
    pub patient_id: Option<String>,
    /// Date of the encounter
    pub encounter_date: Option<NaiveDate>,
    /// Facility where the encounter took place
    pub facility_id: Option<String>,
    /// Jurisdiction of the facility
    pub jurisdiction_id: Option<String>,
}

impl EncounterRecord {
    /// Create a record with patient and date set
    pub fn new(patient_id: impl Into<String>, encounter_date: NaiveDate) -> Self {
        Self {
            patient_id: Some(patient_id.into()),
            encounter_date: Some(encounter_date),
            facility_id: None,
            jurisdiction_id: None,
        }
    }

    /// Set the facility
    #[must_use]
    pub fn with_facility(mut self, facility_id: impl Into<String>) -> Self {
        self.facility_id = Some(facility_id.into());
        self
    }

    /// Set the jurisdiction
    #[must_use]
    pub fn with_jurisdiction(mut self, jurisdiction_id: impl Into<String>) -> Self {
        self.jurisdiction_id = Some(jurisdiction_id.into());
        self
    }
}

/// A validated clinical encounter
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encounter {
    /// Patient identifier, stable per patient
    pub patient_id: String,
    /// Date of the encounter
    pub encounter_date: NaiveDate,
    /// Facility where the encounter took place
    pub facility_id: Option<String>,
    /// Jurisdiction of the facility
    pub jurisdiction_id: Option<String>,
    /// Month containing `encounter_date`
    pub period: PeriodKey,
}

impl Encounter {
    /// Validate a loaded record
    ///
    /// `row` is the record's position in loader order and is reported in the
    /// error if the patient or date is missing, or if a dimension value is
    /// the label reserved for missing values.
    pub fn from_record(row: usize, record: &EncounterRecord) -> Result<Self> {
        let patient_id = match record.patient_id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => return Err(Error::data(row, "missing patient identifier")),
        };
        let encounter_date = record
            .encounter_date
            .ok_or_else(|| Error::data(row, "missing encounter date"))?;

        for (dimension, value) in [
            (Dimension::Facility, &record.facility_id),
            (Dimension::Jurisdiction, &record.jurisdiction_id),
        ] {
            if value.as_deref() == Some(UNASSIGNED_LABEL) {
                return Err(Error::data(
                    row,
                    format!(
                        "{} value '{UNASSIGNED_LABEL}' is reserved for missing values",
                        dimension.as_str().to_lowercase()
                    ),
                ));
            }
        }

        Ok(Self {
            patient_id,
            encounter_date,
            facility_id: record.facility_id.clone(),
            jurisdiction_id: record.jurisdiction_id.clone(),
            period: PeriodKey::from_date(encounter_date),
        })
    }

    /// Value of a grouping dimension, if recorded
    #[must_use]
    pub fn dimension_value(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::Facility => self.facility_id.as_deref(),
            Dimension::Jurisdiction => self.jurisdiction_id.as_deref(),
        }
    }
}

/// Per-encounter cohort-flow flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassificationFlags {
    /// Encounter is on the patient's first date
    pub is_new: bool,
    /// Encounter is on the patient's last date, outside the open period
    pub is_egress: bool,
    /// Encounter is the patient's first in its month
    pub is_prevalent: bool,
}

/// An encounter together with its flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifiedEncounter {
    /// The encounter
    pub encounter: Encounter,
    /// Flags computed from the patient's full history
    pub flags: ClassificationFlags,
}

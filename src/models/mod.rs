//! Domain models for cohort-flow reporting
//!
//! This module contains the encounter entities, the classification flags
//! derived from them, and the report parameters and rows built on top.

pub mod dimension;
pub mod encounter;
pub mod period;
pub mod report;

// Re-export commonly used types
pub use dimension::{ALL_VALUES, CategoryIndex, Dimension, DimensionSelection, UNASSIGNED_LABEL};
pub use encounter::{ClassificationFlags, ClassifiedEncounter, Encounter, EncounterRecord};
pub use period::PeriodKey;
pub use report::{CohortFlowRow, Level, Metric, ReportRow};

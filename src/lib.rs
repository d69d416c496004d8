//! Cohort-flow reporting over longitudinal patient encounters.
//!
//! Encounters are loaded from Parquet, classified per patient as new,
//! egress or prevalent using each patient's full history, and aggregated
//! into monthly report series by facility, by jurisdiction, or globally.

pub mod algorithm;
pub mod async_io;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod models;
pub mod utils;

// Re-export the most common types for easier use
pub use config::{CohortConfig, ColumnNames};
pub use error::{Error, Result};
pub use filter::DateRange;
pub use models::{
    ALL_VALUES, ClassificationFlags, ClassifiedEncounter, CohortFlowRow, Dimension,
    DimensionSelection, Encounter, EncounterRecord, Level, Metric, PeriodKey, ReportRow,
};

// Classification and reporting
pub use algorithm::cohort::{
    ClassificationCache, ClassifiedDataset, DatasetKey, ReportQuery, build_report, classify,
    dimension_options,
};

// Loading
pub use async_io::load_encounters_async;
pub use loader::load_encounters;

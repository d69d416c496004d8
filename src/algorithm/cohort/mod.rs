//! Cohort-flow classification and reporting
//!
//! Pipeline: loaded records are classified once per dataset (through the
//! [`ClassificationCache`]), then each report query filters the classified
//! encounters to a date window and aggregates them.

pub mod aggregator;
pub mod cache;
pub mod classifier;
pub mod dataset;
pub mod query;

// Re-export commonly used items
pub use aggregator::{aggregate, aggregate_all};
pub use cache::{ClassificationCache, DatasetKey};
pub use classifier::{classify, classify_encounters};
pub use dataset::ClassifiedDataset;
pub use query::{ReportQuery, build_report, dimension_options};

//! Configuration for encounter loading.

use std::fmt;

/// Default batch size for Parquet reading
pub const DEFAULT_BATCH_SIZE: usize = 16384;

/// Environment variable that overrides the Parquet batch size
pub const BATCH_SIZE_ENV: &str = "PARQUET_BATCH_SIZE";

/// Source column names for the four encounter fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    /// Patient identifier column
    pub patient_id: String,
    /// Encounter date column
    pub encounter_date: String,
    /// Facility column
    pub facility_id: String,
    /// Jurisdiction column
    pub jurisdiction_id: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            patient_id: "NumeroDocumento".to_string(),
            encounter_date: "FechaAtencion".to_string(),
            facility_id: "IPRESS".to_string(),
            jurisdiction_id: "JURISDICCION".to_string(),
        }
    }
}

impl ColumnNames {
    /// All four column names, in record field order
    #[must_use]
    pub fn all(&self) -> [&str; 4] {
        [
            &self.patient_id,
            &self.encounter_date,
            &self.facility_id,
            &self.jurisdiction_id,
        ]
    }
}

/// Configuration for date format handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFormatConfig {
    /// List of date format strings to try when parsing dates
    pub date_formats: Vec<String>,
    /// Enable heuristic format detection
    pub enable_format_detection: bool,
}

impl Default for DateFormatConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(), // ISO format: 2023-01-15
                "%Y%m%d".to_string(),   // Compact: 20230115
                "%d/%m/%Y".to_string(), // 15/01/2023
            ],
            enable_format_detection: true,
        }
    }
}

/// Configuration for loading encounter tables
#[derive(Debug, Clone)]
pub struct CohortConfig {
    /// Source column names
    pub columns: ColumnNames,
    /// Rows per record batch when reading Parquet
    pub batch_size: usize,
    /// Date format configuration for string-to-date conversions
    pub date_format_config: DateFormatConfig,
}

impl Default for CohortConfig {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            batch_size: DEFAULT_BATCH_SIZE,
            date_format_config: DateFormatConfig::default(),
        }
    }
}

impl CohortConfig {
    /// Create a new configuration with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default settings with environment overrides applied
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(batch_size) = batch_size_from_env() {
            config.batch_size = batch_size;
        }
        config
    }

    /// Set the source column names
    #[must_use]
    pub fn with_columns(mut self, columns: ColumnNames) -> Self {
        self.columns = columns;
        self
    }

    /// Set the Parquet batch size
    #[must_use]
    pub const fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Replace the accepted string date formats
    #[must_use]
    pub fn with_date_formats(mut self, formats: &[&str]) -> Self {
        self.date_format_config.date_formats = formats.iter().map(ToString::to_string).collect();
        self
    }
}

impl fmt::Display for CohortConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Cohort Configuration:")?;
        writeln!(f, "  Patient Column: {}", self.columns.patient_id)?;
        writeln!(f, "  Date Column: {}", self.columns.encounter_date)?;
        writeln!(f, "  Facility Column: {}", self.columns.facility_id)?;
        writeln!(f, "  Jurisdiction Column: {}", self.columns.jurisdiction_id)?;
        writeln!(f, "  Batch Size: {}", self.batch_size)?;
        writeln!(
            f,
            "  Date Formats: {}",
            self.date_format_config.date_formats.join(", ")
        )
    }
}

/// Batch size from `PARQUET_BATCH_SIZE`, if set and valid
#[must_use]
pub fn batch_size_from_env() -> Option<usize> {
    std::env::var(BATCH_SIZE_ENV)
        .ok()
        .and_then(|s| s.parse::<usize>().ok())
        .filter(|&n| n > 0)
}

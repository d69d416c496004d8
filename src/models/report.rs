//! Report parameters and report rows

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::dimension::Dimension;
use crate::models::encounter::ClassificationFlags;
use crate::models::period::PeriodKey;

/// Aggregation level of a report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Level {
    /// One series over every encounter
    #[default]
    Global,
    /// One series per facility
    Facility,
    /// One series per jurisdiction
    Jurisdiction,
}

impl Level {
    /// The grouping dimension, `None` for the global level
    #[must_use]
    pub const fn dimension(&self) -> Option<Dimension> {
        match self {
            Self::Global => None,
            Self::Facility => Some(Dimension::Facility),
            Self::Jurisdiction => Some(Dimension::Jurisdiction),
        }
    }

    /// Upper-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Global => "GLOBAL",
            Self::Facility => "FACILITY",
            Self::Jurisdiction => "JURISDICTION",
        }
    }
}

impl From<Option<Dimension>> for Level {
    fn from(dimension: Option<Dimension>) -> Self {
        match dimension {
            None => Self::Global,
            Some(Dimension::Facility) => Self::Facility,
            Some(Dimension::Jurisdiction) => Self::Jurisdiction,
        }
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "GLOBAL" | "NONE" => Ok(Self::Global),
            "FACILITY" | "IPRESS" => Ok(Self::Facility),
            "JURISDICTION" | "JURISDICCION" => Ok(Self::Jurisdiction),
            _ => Err(Error::validation(format!("Unknown report level '{s}'"))),
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cohort-flow metric counted by a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Patients entering care
    New,
    /// Patients leaving care
    Egress,
    /// Patients under care in the period
    Prevalent,
}

impl Metric {
    /// Every metric, in display order
    pub const ALL: [Self; 3] = [Self::New, Self::Egress, Self::Prevalent];

    /// The 0/1 contribution of one encounter
    #[must_use]
    pub const fn count(&self, flags: &ClassificationFlags) -> u64 {
        let set = match self {
            Self::New => flags.is_new,
            Self::Egress => flags.is_egress,
            Self::Prevalent => flags.is_prevalent,
        };
        set as u64
    }

    /// Lower-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Egress => "egress",
            Self::Prevalent => "prevalent",
        }
    }
}

impl FromStr for Metric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "new" | "nuevos" => Ok(Self::New),
            "egress" | "egresos" => Ok(Self::Egress),
            "prevalent" | "prevalence" | "prevalencia" => Ok(Self::Prevalent),
            _ => Err(Error::validation(format!("Unknown metric '{s}'"))),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One point of a report series
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    /// Month of the point
    pub period: PeriodKey,
    /// Series the point belongs to; absent for global reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_value: Option<String>,
    /// Count of flagged encounters
    pub value: u64,
}

/// All three metrics for one group
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CohortFlowRow {
    /// Month of the group
    pub period: PeriodKey,
    /// Dimension value of the group; absent for global grouping
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension_value: Option<String>,
    /// Encounters flagged new
    pub new: u64,
    /// Encounters flagged egress
    pub egress: u64,
    /// Encounters flagged prevalent
    pub prevalent: u64,
}

impl CohortFlowRow {
    /// An empty group
    #[must_use]
    pub const fn new(period: PeriodKey, dimension_value: Option<String>) -> Self {
        Self {
            period,
            dimension_value,
            new: 0,
            egress: 0,
            prevalent: 0,
        }
    }

    /// The value of a single metric
    #[must_use]
    pub const fn get(&self, metric: Metric) -> u64 {
        match metric {
            Metric::New => self.new,
            Metric::Egress => self.egress,
            Metric::Prevalent => self.prevalent,
        }
    }

    pub(crate) fn add(&mut self, flags: &ClassificationFlags) {
        self.new += Metric::New.count(flags);
        self.egress += Metric::Egress.count(flags);
        self.prevalent += Metric::Prevalent.count(flags);
    }
}

//! Grouping dimensions and their known values

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::encounter::Encounter;

/// Sentinel selecting every value of a dimension
pub const ALL_VALUES: &str = "ALL";

/// Label used for encounters without a recorded dimension value
///
/// Reserved: a record carrying it as a real value fails validation.
pub const UNASSIGNED_LABEL: &str = "(unassigned)";

/// Categorical axis an encounter can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    /// Facility where care was given
    Facility,
    /// Jurisdiction the facility belongs to
    Jurisdiction,
}

impl Dimension {
    /// Both dimensions, in display order
    pub const ALL: [Self; 2] = [Self::Facility, Self::Jurisdiction];

    /// Upper-case name used in captions and query strings
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Facility => "FACILITY",
            Self::Jurisdiction => "JURISDICTION",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which values of a dimension a report should contain
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum DimensionSelection {
    /// Every value, one series each
    #[default]
    All,
    /// A single value
    Value(String),
}

impl DimensionSelection {
    /// The selected value, or `None` for `All`
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Value(v) => Some(v),
        }
    }
}

impl From<&str> for DimensionSelection {
    fn from(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_VALUES) {
            Self::All
        } else {
            Self::Value(trimmed.to_string())
        }
    }
}

impl From<Option<&str>> for DimensionSelection {
    fn from(s: Option<&str>) -> Self {
        s.map_or(Self::All, Self::from)
    }
}

impl FromStr for DimensionSelection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(Self::from(s))
    }
}

impl fmt::Display for DimensionSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_VALUES),
            Self::Value(v) => f.write_str(v),
        }
    }
}

/// Known values per dimension, collected from a full dataset
///
/// Query parameters naming a dimension value are checked against this index
/// instead of being accepted as free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryIndex {
    facilities: BTreeSet<String>,
    jurisdictions: BTreeSet<String>,
}

impl CategoryIndex {
    /// Collect the recorded facility and jurisdiction values
    pub fn from_encounters<'a>(encounters: impl IntoIterator<Item = &'a Encounter>) -> Self {
        let mut index = Self::default();
        for encounter in encounters {
            index.insert(encounter);
        }
        index
    }

    fn insert(&mut self, encounter: &Encounter) {
        if let Some(facility) = &encounter.facility_id {
            if !self.facilities.contains(facility) {
                self.facilities.insert(facility.clone());
            }
        }
        if let Some(jurisdiction) = &encounter.jurisdiction_id {
            if !self.jurisdictions.contains(jurisdiction) {
                self.jurisdictions.insert(jurisdiction.clone());
            }
        }
    }

    fn set(&self, dimension: Dimension) -> &BTreeSet<String> {
        match dimension {
            Dimension::Facility => &self.facilities,
            Dimension::Jurisdiction => &self.jurisdictions,
        }
    }

    /// Whether `value` was recorded for `dimension`
    #[must_use]
    pub fn contains(&self, dimension: Dimension, value: &str) -> bool {
        self.set(dimension).contains(value)
    }

    /// Sorted known values of a dimension
    pub fn values(&self, dimension: Dimension) -> impl Iterator<Item = &str> {
        self.set(dimension).iter().map(String::as_str)
    }

    /// Number of known values of a dimension
    #[must_use]
    pub fn len(&self, dimension: Dimension) -> usize {
        self.set(dimension).len()
    }

    /// Check that a selection names a known value
    pub fn validate(&self, dimension: Dimension, selection: &DimensionSelection) -> Result<()> {
        match selection {
            DimensionSelection::All => Ok(()),
            DimensionSelection::Value(v) if v == UNASSIGNED_LABEL => Ok(()),
            DimensionSelection::Value(v) if self.contains(dimension, v) => Ok(()),
            DimensionSelection::Value(v) => Err(Error::validation(format!(
                "Unknown {} value '{v}'",
                dimension.as_str().to_lowercase()
            ))),
        }
    }
}

//! Report queries over a classified dataset
//!
//! A query restricts the classified encounters to a date window, aggregates
//! them, and optionally keeps a single dimension value's series. The window
//! is applied after classification, so narrowing it only changes which rows
//! are emitted, never the counts behind them.

use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDate;
use log::debug;

use crate::algorithm::cohort::aggregator::{aggregate, aggregate_all};
use crate::algorithm::cohort::dataset::ClassifiedDataset;
use crate::error::{Error, Result};
use crate::filter::core::apply_filter;
use crate::filter::date::DateRange;
use crate::models::dimension::DimensionSelection;
use crate::models::report::{CohortFlowRow, Level, Metric, ReportRow};

/// Parameters of one report
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReportQuery {
    /// Aggregation level
    pub level: Level,
    /// Metric to count
    pub metric: Metric,
    /// Inclusive date window
    pub range: DateRange,
    /// Dimension value(s) to keep
    pub selection: DimensionSelection,
}

impl ReportQuery {
    /// Create a query over `[date_from, date_to]`
    ///
    /// # Errors
    /// Returns a validation error if `date_from` is after `date_to`
    pub fn new(
        level: Level,
        metric: Metric,
        date_from: NaiveDate,
        date_to: NaiveDate,
        selection: DimensionSelection,
    ) -> Result<Self> {
        Ok(Self {
            level,
            metric,
            range: DateRange::new(date_from, date_to)?,
            selection,
        })
    }

    /// Create a query from user-facing strings
    ///
    /// # Errors
    /// Returns a validation error for an unknown level or metric, or an
    /// inverted date range
    pub fn parse(
        level: &str,
        metric: &str,
        date_from: NaiveDate,
        date_to: NaiveDate,
        dimension_value: &str,
    ) -> Result<Self> {
        Self::new(
            level.parse()?,
            metric.parse()?,
            date_from,
            date_to,
            DimensionSelection::from(dimension_value),
        )
    }

    /// Check the selection against the dataset's known dimension values
    ///
    /// # Errors
    /// Returns a validation error if a value is selected at the global level
    /// or the value is not recorded for the level's dimension
    pub fn validate(&self, dataset: &ClassifiedDataset) -> Result<()> {
        match (self.level.dimension(), &self.selection) {
            (None, DimensionSelection::All) => Ok(()),
            (None, DimensionSelection::Value(v)) => Err(Error::validation(format!(
                "Dimension value '{v}' cannot be selected for a GLOBAL report"
            ))),
            (Some(dimension), selection) => dataset.categories().validate(dimension, selection),
        }
    }

    /// Run the query
    ///
    /// # Errors
    /// Returns a validation error if [`validate`](Self::validate) fails
    pub fn run(&self, dataset: &ClassifiedDataset) -> Result<Vec<ReportRow>> {
        self.validate(dataset)?;

        let window = apply_filter(dataset.encounters(), &self.range);
        let mut rows = aggregate(window, self.level.dimension(), self.metric);

        if let Some(value) = self.selection.value() {
            rows.retain(|row| row.dimension_value.as_deref() == Some(value));
        }

        debug!("Report {self} over {} produced {} rows", self.range, rows.len());
        Ok(rows)
    }

    /// Run the query for all three metrics at once
    ///
    /// The `metric` field is ignored.
    ///
    /// # Errors
    /// Returns a validation error if [`validate`](Self::validate) fails
    pub fn run_all_metrics(&self, dataset: &ClassifiedDataset) -> Result<Vec<CohortFlowRow>> {
        self.validate(dataset)?;

        let window = apply_filter(dataset.encounters(), &self.range);
        let mut rows = aggregate_all(window, self.level.dimension());

        if let Some(value) = self.selection.value() {
            rows.retain(|row| row.dimension_value.as_deref() == Some(value));
        }
        Ok(rows)
    }
}

impl fmt::Display for ReportQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.metric, self.level)?;
        if let Some(value) = self.selection.value() {
            write!(f, " - {value}")?;
        }
        Ok(())
    }
}

/// Build one report series (or one per dimension value) for a date window
///
/// # Errors
/// Returns a validation error for an inverted range, a value selected at the
/// global level, or an unknown dimension value
pub fn build_report(
    dataset: &ClassifiedDataset,
    level: Level,
    metric: Metric,
    date_from: NaiveDate,
    date_to: NaiveDate,
    selection: impl Into<DimensionSelection>,
) -> Result<Vec<ReportRow>> {
    ReportQuery::new(level, metric, date_from, date_to, selection.into())?.run(dataset)
}

/// Sorted distinct values of the level's dimension among encounters in the
/// window, for populating a value selector
///
/// Encounters without a recorded value are not listed. The global level has
/// no values.
#[must_use]
pub fn dimension_options(
    dataset: &ClassifiedDataset,
    level: Level,
    range: &DateRange,
) -> Vec<String> {
    let Some(dimension) = level.dimension() else {
        return Vec::new();
    };

    apply_filter(dataset.encounters(), range)
        .filter_map(|classified| classified.encounter.dimension_value(dimension))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(ToString::to_string)
        .collect()
}

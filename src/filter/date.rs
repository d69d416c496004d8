//! Date range filtering
//!
//! Report queries restrict classified encounters to an inclusive date range.

use std::fmt;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::period::PeriodKey;

/// An inclusive calendar date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// The start date (inclusive)
    start_date: NaiveDate,

    /// The end date (inclusive)
    end_date: NaiveDate,
}

impl DateRange {
    /// Create a new date range
    ///
    /// # Errors
    /// Returns a validation error if `start_date` is after `end_date`
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self> {
        if start_date > end_date {
            return Err(Error::validation(format!(
                "Invalid date range: start {start_date} is after end {end_date}"
            )));
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// A range covering whole months, from the first day of `from` to the
    /// last day of `to`
    pub fn from_periods(from: PeriodKey, to: PeriodKey) -> Result<Self> {
        Self::new(from.first_day(), to.last_day())
    }

    /// A range that contains every representable date
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start_date: NaiveDate::MIN,
            end_date: NaiveDate::MAX,
        }
    }

    /// The start date (inclusive)
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// The end date (inclusive)
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    /// Check if a date is within the range
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Intersection with another range, `None` if they do not overlap
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let start_date = self.start_date.max(other.start_date);
        let end_date = self.end_date.min(other.end_date);
        (start_date <= end_date).then_some(Self {
            start_date,
            end_date,
        })
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start_date, self.end_date)
    }
}

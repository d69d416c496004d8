//! Column extraction for Arrow record batches
//!
//! Encounter tables arrive with whatever physical types the producer chose:
//! dictionary-encoded categories, integer identifiers, timestamps, or dates
//! stored as strings. These helpers normalise a column into plain Rust
//! values with one Arrow cast per column instead of per-row conversion.

use arrow::array::{Array, ArrayRef, Date32Array, StringArray};
use arrow::compute::kernels::cast::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use log::warn;

use crate::config::DateFormatConfig;
use crate::error::{Error, Result};
use crate::utils::date::parse_date_string;

/// Get a column that must be present
///
/// # Errors
///
/// Returns a schema error if the column is missing
pub fn require_column(batch: &RecordBatch, column_name: &str) -> Result<ArrayRef> {
    batch.column_by_name(column_name).cloned().ok_or_else(|| {
        Error::Schema(format!("Required column '{column_name}' not found in record batch"))
    })
}

/// Get an optional column by name, logging a warning if it is missing
#[must_use]
pub fn get_column(batch: &RecordBatch, column_name: &str) -> Option<ArrayRef> {
    let column = batch.column_by_name(column_name).cloned();
    if column.is_none() {
        warn!("Column '{column_name}' not found in record batch");
    }
    column
}

/// Downcast a column to a specific array type with a clear error message
pub fn downcast_array<'a, A: Array + 'static>(
    array: &'a ArrayRef,
    column_name: &str,
    expected_type_name: &str,
) -> Result<&'a A> {
    array.as_any().downcast_ref::<A>().ok_or_else(|| {
        Error::Schema(format!(
            "Column '{column_name}' could not be read as {expected_type_name}"
        ))
    })
}

/// Extract a column as optional strings, one per row
///
/// Any type Arrow can cast to Utf8 is accepted. Empty strings become `None`.
pub fn extract_strings(array: &ArrayRef, column_name: &str) -> Result<Vec<Option<String>>> {
    let utf8 = if array.data_type() == &DataType::Utf8 {
        array.clone()
    } else {
        cast(array, &DataType::Utf8).map_err(|e| {
            Error::Schema(format!(
                "Column '{column_name}' of type {} cannot be read as text: {e}",
                array.data_type()
            ))
        })?
    };
    let strings = downcast_array::<StringArray>(&utf8, column_name, "String")?;

    Ok(strings
        .iter()
        .map(|value| value.filter(|s| !s.is_empty()).map(ToString::to_string))
        .collect())
}

/// Extract a column as optional dates, one per row
///
/// String columns are parsed with `date_config`; values that do not parse
/// become `None`. Other types (dates, timestamps) are cast to Date32.
pub fn extract_dates(
    array: &ArrayRef,
    column_name: &str,
    date_config: &DateFormatConfig,
) -> Result<Vec<Option<NaiveDate>>> {
    match array.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 | DataType::Utf8View | DataType::Dictionary(_, _) => {
            let strings = extract_strings(array, column_name)?;
            let mut unparsed = 0usize;
            let dates = strings
                .iter()
                .map(|value| {
                    let parsed = value.as_deref().and_then(|s| parse_date_string(s, date_config));
                    if value.is_some() && parsed.is_none() {
                        unparsed += 1;
                    }
                    parsed
                })
                .collect();
            if unparsed > 0 {
                warn!("{unparsed} values in column '{column_name}' could not be parsed as dates");
            }
            Ok(dates)
        }
        other => {
            let date32 = if other == &DataType::Date32 {
                array.clone()
            } else {
                cast(array, &DataType::Date32).map_err(|e| {
                    Error::Schema(format!(
                        "Column '{column_name}' of type {other} cannot be read as a date: {e}"
                    ))
                })?
            };
            let dates = downcast_array::<Date32Array>(&date32, column_name, "Date32")?;

            Ok((0..dates.len())
                .map(|i| {
                    if dates.is_null(i) {
                        None
                    } else {
                        dates.value_as_date(i)
                    }
                })
                .collect())
        }
    }
}

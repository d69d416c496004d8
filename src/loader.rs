//! Encounter loading from Parquet
//!
//! Reads a Parquet file, or a directory of Parquet files, and turns the
//! configured columns into [`EncounterRecord`]s. Records keep the row order
//! of the source (files in path order, rows in file order). No validation
//! happens here beyond column presence; missing dates surface as data errors
//! when the records are classified.

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use rayon::prelude::*;

use crate::config::CohortConfig;
use crate::error::Result;
use crate::models::encounter::EncounterRecord;
use crate::utils::arrow::{extract_dates, extract_strings, get_column, require_column};
use crate::utils::io::parquet::{load_parquet_files_parallel, read_parquet};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Load encounter records from a Parquet file or directory
///
/// # Errors
/// Returns an error if the source cannot be read, or if the patient or date
/// column is missing
pub fn load_encounters(path: &Path, config: &CohortConfig) -> Result<Vec<EncounterRecord>> {
    let start = Instant::now();
    log_operation_start("Loading encounters from", path);

    let columns = config.columns.all();
    let batches = if path.is_dir() {
        load_parquet_files_parallel(path, &columns, config.batch_size)?
    } else {
        read_parquet(path, &columns, config.batch_size)?
    };

    let records = records_from_batches(&batches, config)?;
    log_operation_complete("loaded", path, records.len(), Some(start.elapsed()));
    Ok(records)
}

/// Convert record batches into encounter records, preserving order
pub fn records_from_batches(
    batches: &[RecordBatch],
    config: &CohortConfig,
) -> Result<Vec<EncounterRecord>> {
    let per_batch = batches
        .par_iter()
        .map(|batch| records_from_batch(batch, config))
        .collect::<Result<Vec<_>>>()?;

    Ok(per_batch.into_iter().flatten().collect())
}

/// Convert one record batch into encounter records
///
/// The patient and date columns are required. A missing facility or
/// jurisdiction column is logged and read as all-null.
pub fn records_from_batch(
    batch: &RecordBatch,
    config: &CohortConfig,
) -> Result<Vec<EncounterRecord>> {
    let columns = &config.columns;
    let rows = batch.num_rows();

    let patient_column = require_column(batch, &columns.patient_id)?;
    let date_column = require_column(batch, &columns.encounter_date)?;

    let patients = extract_strings(&patient_column, &columns.patient_id)?;
    let dates = extract_dates(&date_column, &columns.encounter_date, &config.date_format_config)?;
    let facilities = match get_column(batch, &columns.facility_id) {
        Some(array) => extract_strings(&array, &columns.facility_id)?,
        None => vec![None; rows],
    };
    let jurisdictions = match get_column(batch, &columns.jurisdiction_id) {
        Some(array) => extract_strings(&array, &columns.jurisdiction_id)?,
        None => vec![None; rows],
    };

    Ok(patients
        .into_iter()
        .zip(dates)
        .zip(facilities)
        .zip(jurisdictions)
        .map(
            |(((patient_id, encounter_date), facility_id), jurisdiction_id)| EncounterRecord {
                patient_id,
                encounter_date,
                facility_id,
                jurisdiction_id,
            },
        )
        .collect())
}

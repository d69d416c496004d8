//! Parquet file operations
//!
//! This module provides utilities for finding Parquet files and reading them
//! into Arrow record batches, projected to the columns a caller needs.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use itertools::Itertools;
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use rayon::prelude::*;

use crate::error::{Error, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Validates that a directory exists and is a directory
pub fn validate_directory(dir: &Path) -> Result<()> {
    if !dir.is_dir() {
        return Err(Error::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("Directory does not exist: {}", dir.display()),
        )));
    }
    Ok(())
}

/// Root column indices of `columns` present in the file schema
///
/// Columns missing from the file are skipped with a warning; the caller
/// decides whether a missing column is fatal.
#[must_use]
pub fn create_projection(
    columns: &[&str],
    file_schema: &arrow::datatypes::Schema,
    parquet_schema: &parquet::schema::types::SchemaDescriptor,
) -> Option<ProjectionMask> {
    let projection = columns
        .iter()
        .filter_map(|name| {
            file_schema.index_of(name).map_or_else(
                |_| {
                    log_warning(&format!("Field {name} not found in parquet file, skipping"), None);
                    None
                },
                Some,
            )
        })
        .sorted()
        .dedup()
        .collect_vec();

    if projection.is_empty() {
        log_warning(
            "No matching fields found in schema projection, reading all columns",
            None,
        );
        None
    } else {
        Some(ProjectionMask::roots(parquet_schema, projection))
    }
}

/// Read a parquet file into Arrow record batches
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `columns` - Columns to read; an empty slice reads every column
/// * `batch_size` - Rows per record batch
pub fn read_parquet(path: &Path, columns: &[&str], batch_size: usize) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading parquet file", path);

    let file = File::open(path)?;
    let mut builder = ParquetRecordBatchReaderBuilder::try_new(file)?.with_batch_size(batch_size);

    if !columns.is_empty() {
        if let Some(mask) = create_projection(columns, builder.schema(), builder.parquet_schema()) {
            builder = builder.with_projection(mask);
        }
    }

    let batches = builder
        .build()?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    log_operation_complete("read", path, batches.len(), Some(start.elapsed()));
    Ok(batches)
}

/// Find all Parquet files in a directory, sorted by path
pub fn find_parquet_files(dir: &Path) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for parquet files in", dir);
    validate_directory(dir)?;

    let mut parquet_files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "parquet") {
            parquet_files.push(path);
        }
    }
    parquet_files.sort();

    if parquet_files.is_empty() {
        log_warning("No Parquet files found in directory", Some(dir));
    } else {
        log_operation_complete("found", dir, parquet_files.len(), None);
    }

    Ok(parquet_files)
}

/// Load all parquet files from a directory in parallel
///
/// Batches are returned file by file in path order, so repeated loads of the
/// same directory yield rows in the same order.
pub fn load_parquet_files_parallel(
    dir: &Path,
    columns: &[&str],
    batch_size: usize,
) -> Result<Vec<RecordBatch>> {
    let parquet_files = find_parquet_files(dir)?;
    if parquet_files.is_empty() {
        return Ok(Vec::new());
    }

    let all_batches = parquet_files
        .par_iter()
        .map(|path| read_parquet(path, columns, batch_size))
        .collect::<Result<Vec<_>>>()?;

    let combined_batches = all_batches.into_iter().flatten().collect_vec();
    log::info!(
        "Successfully loaded {} batches from {} Parquet files",
        combined_batches.len(),
        parquet_files.len()
    );

    Ok(combined_batches)
}

//! Async operations for working with Parquet files

use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;
use futures::TryStreamExt;
use parquet::arrow::ParquetRecordBatchStreamBuilder;
use tokio::fs::{self, File};

use crate::error::Result;
use crate::utils::io::parquet::{create_projection, validate_directory};
use crate::utils::logging::{log_operation_complete, log_operation_start, log_warning};

/// Find all Parquet files in a directory asynchronously, sorted by path
pub async fn find_parquet_files_async(dir: &Path) -> Result<Vec<PathBuf>> {
    log_operation_start("Searching for parquet files asynchronously in", dir);
    validate_directory(dir)?;

    let mut parquet_files = Vec::<PathBuf>::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let metadata = fs::metadata(&path).await?;
        if metadata.is_file() && path.extension().is_some_and(|ext| ext == "parquet") {
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

/// Read a Parquet file into record batches with the async reader
///
/// # Arguments
/// * `path` - Path to the Parquet file
/// * `columns` - Columns to read; an empty slice reads every column
/// * `batch_size` - Rows per record batch
pub async fn read_parquet_async(
    path: &Path,
    columns: &[&str],
    batch_size: usize,
) -> Result<Vec<RecordBatch>> {
    let start = std::time::Instant::now();
    log_operation_start("Reading parquet file asynchronously", path);

    let file = File::open(path).await?;
    let mut builder = ParquetRecordBatchStreamBuilder::new(file)
        .await?
        .with_batch_size(batch_size);

    if !columns.is_empty() {
        if let Some(mask) = create_projection(columns, builder.schema(), builder.parquet_schema()) {
            builder = builder.with_projection(mask);
        }
    }

    let batches: Vec<RecordBatch> = builder.build()?.try_collect().await?;

    log_operation_complete("read", path, batches.len(), Some(start.elapsed()));
    Ok(batches)
}

//! Async encounter loader
//!
//! Directory loads read up to one file per CPU concurrently. Results are
//! kept in path order so the record order matches the synchronous loader.

use std::path::Path;
use std::time::Instant;

use arrow::record_batch::RecordBatch;
use futures::stream::{self, StreamExt, TryStreamExt};

use crate::async_io::file_ops::{find_parquet_files_async, read_parquet_async};
use crate::config::CohortConfig;
use crate::error::{Error, Result};
use crate::loader::records_from_batches;
use crate::models::encounter::EncounterRecord;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Load all Parquet files in a directory asynchronously
pub async fn load_parquet_files_async(
    dir: &Path,
    columns: &[&str],
    batch_size: usize,
) -> Result<Vec<RecordBatch>> {
    let files = find_parquet_files_async(dir).await?;
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let per_file: Vec<Vec<RecordBatch>> = stream::iter(files.iter())
        .map(|path| read_parquet_async(path, columns, batch_size))
        .buffered(num_cpus::get().max(1))
        .inspect_err(|e| log::error!("Error loading file: {e}"))
        .try_collect()
        .await?;

    Ok(per_file.into_iter().flatten().collect())
}

/// Load encounter records from a Parquet file or directory asynchronously
///
/// Column extraction runs on the blocking thread pool.
pub async fn load_encounters_async(
    path: &Path,
    config: &CohortConfig,
) -> Result<Vec<EncounterRecord>> {
    let start = Instant::now();
    log_operation_start("Loading encounters asynchronously from", path);

    let columns = config.columns.all();
    let batches = if tokio::fs::metadata(path).await?.is_dir() {
        load_parquet_files_async(path, &columns, config.batch_size).await?
    } else {
        read_parquet_async(path, &columns, config.batch_size).await?
    };

    let owned_config = config.clone();
    let records = tokio::task::spawn_blocking(move || records_from_batches(&batches, &owned_config))
        .await
        .map_err(|e| Error::Task(e.to_string()))??;

    log_operation_complete("loaded", path, records.len(), Some(start.elapsed()));
    Ok(records)
}

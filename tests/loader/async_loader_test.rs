//! Tests for the async Parquet loader

use cohort_flow::async_io::loader::load_parquet_files_async;
use cohort_flow::{CohortConfig, load_encounters, load_encounters_async};

use crate::utils::{scenario_records, scratch_dir, synthetic_cohort, write_encounters};

#[tokio::test]
async fn test_async_file_load_matches_sync() {
    let dir = scratch_dir("async-file");
    let path = dir.join("encounters.parquet");
    let records = synthetic_cohort(9, 80);
    write_encounters(&path, &records);

    let config = CohortConfig::new().with_batch_size(16);
    let loaded = load_encounters_async(&path, &config).await.unwrap();
    assert_eq!(loaded, records);
    assert_eq!(loaded, load_encounters(&path, &config).unwrap());
}

#[tokio::test]
async fn test_async_directory_load_keeps_path_order() {
    let dir = scratch_dir("async-directory");
    let records = scenario_records();
    for (i, chunk) in records.chunks(2).enumerate().rev() {
        write_encounters(&dir.join(format!("part-{i}.parquet")), chunk);
    }

    let loaded = load_encounters_async(&dir, &CohortConfig::new()).await.unwrap();
    assert_eq!(loaded, records);
}

#[tokio::test]
async fn test_async_directory_batches() {
    let dir = scratch_dir("async-batches");
    let records = scenario_records();
    write_encounters(&dir.join("a.parquet"), &records[..4]);
    write_encounters(&dir.join("b.parquet"), &records[4..]);

    let config = CohortConfig::new();
    let columns = config.columns.all();
    let batches = load_parquet_files_async(&dir, &columns, config.batch_size)
        .await
        .unwrap();
    let rows: usize = batches.iter().map(|b| b.num_rows()).sum();
    assert_eq!(rows, records.len());
    assert!(batches.iter().all(|b| b.num_columns() == 4));
}

#[tokio::test]
async fn test_async_missing_source() {
    let dir = scratch_dir("async-missing");
    let result = load_encounters_async(&dir.join("nope.parquet"), &CohortConfig::new()).await;
    assert!(result.is_err());
}

//! Shared fixtures for cohort-flow tests

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use arrow::array::{ArrayRef, Date32Array, DictionaryArray, StringArray};
use arrow::datatypes::Int32Type;
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use cohort_flow::{ColumnNames, EncounterRecord};
use parquet::arrow::ArrowWriter;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shorthand for a calendar date
#[must_use]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// An encounter record with every field set
#[must_use]
pub fn record(patient: &str, on: NaiveDate, facility: &str, jurisdiction: &str) -> EncounterRecord {
    EncounterRecord::new(patient, on)
        .with_facility(facility)
        .with_jurisdiction(jurisdiction)
}

/// Three patients over Q1 2024; 2024-03 is the open period
///
/// Rows:
/// 0-2: P1 on 01-10, 02-15, 03-20 at F1/J1
/// 3-4: P2 on 01-05 at F2/J1, 02-01 at F1/J1 (last seen before the open month)
/// 5:   P3 once on 02-20 at F2/J2
#[must_use]
pub fn scenario_records() -> Vec<EncounterRecord> {
    vec![
        record("P1", date(2024, 1, 10), "F1", "J1"),
        record("P1", date(2024, 2, 15), "F1", "J1"),
        record("P1", date(2024, 3, 20), "F1", "J1"),
        record("P2", date(2024, 1, 5), "F2", "J1"),
        record("P2", date(2024, 2, 1), "F1", "J1"),
        record("P3", date(2024, 2, 20), "F2", "J2"),
    ]
}

/// A seeded random cohort with repeat visits, same-day ties and some
/// encounters missing facility or jurisdiction
#[must_use]
pub fn synthetic_cohort(seed: u64, patients: usize) -> Vec<EncounterRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    let facilities = ["F1", "F2", "F3", "F4"];
    let jurisdictions = ["J1", "J2"];
    let origin = date(2023, 1, 1);

    let mut records = Vec::new();
    for p in 0..patients {
        let visits = rng.random_range(1..=8);
        let first_offset = rng.random_range(0..540);
        for _ in 0..visits {
            let offset = first_offset + rng.random_range(0..180);
            let on = origin + chrono::Days::new(offset);
            let mut rec = EncounterRecord::new(format!("P{p:04}"), on);
            if rng.random_bool(0.9) {
                rec = rec.with_facility(facilities[rng.random_range(0..facilities.len())]);
            }
            if rng.random_bool(0.95) {
                let jurisdiction = jurisdictions[rng.random_range(0..jurisdictions.len())];
                rec = rec.with_jurisdiction(jurisdiction);
            }
            records.push(rec);
        }
    }

    // Interleave patients so nothing relies on grouped input
    for i in (1..records.len()).rev() {
        let j = rng.random_range(0..=i);
        records.swap(i, j);
    }
    records
}

/// A fresh, empty scratch directory under the system temp dir
#[must_use]
pub fn scratch_dir(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let dir = std::env::temp_dir().join(format!(
        "cohort-flow-{name}-{}-{nanos}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn days_since_epoch(on: NaiveDate) -> i32 {
    let epoch = date(1970, 1, 1);
    i32::try_from((on - epoch).num_days()).unwrap()
}

/// Build a record batch in the default column layout
///
/// Patient and jurisdiction are plain strings, the facility is
/// dictionary-encoded and the date is a Date32 column.
#[must_use]
pub fn encounter_batch(records: &[EncounterRecord]) -> RecordBatch {
    let columns = ColumnNames::default();
    let patients: StringArray = records.iter().map(|r| r.patient_id.as_deref()).collect();
    let dates: Date32Array = records
        .iter()
        .map(|r| r.encounter_date.map(days_since_epoch))
        .collect();
    let facilities: DictionaryArray<Int32Type> =
        records.iter().map(|r| r.facility_id.as_deref()).collect();
    let jurisdictions: StringArray = records.iter().map(|r| r.jurisdiction_id.as_deref()).collect();

    RecordBatch::try_from_iter(vec![
        (columns.patient_id.as_str(), Arc::new(patients) as ArrayRef),
        (columns.encounter_date.as_str(), Arc::new(dates) as ArrayRef),
        (columns.facility_id.as_str(), Arc::new(facilities) as ArrayRef),
        (columns.jurisdiction_id.as_str(), Arc::new(jurisdictions) as ArrayRef),
    ])
    .unwrap()
}

/// Write record batches to a Parquet file
pub fn write_parquet(path: &Path, batches: &[RecordBatch]) {
    let file = File::create(path).unwrap();
    let mut writer = ArrowWriter::try_new(file, batches[0].schema(), None).unwrap();
    for batch in batches {
        writer.write(batch).unwrap();
    }
    writer.close().unwrap();
}

/// Write encounter records to a Parquet file in the default column layout
pub fn write_encounters(path: &Path, records: &[EncounterRecord]) {
    write_parquet(path, &[encounter_batch(records)]);
}

//! Tests for report aggregation

use std::collections::BTreeMap;

use cohort_flow::algorithm::cohort::{aggregate, aggregate_all, classify};
use cohort_flow::models::UNASSIGNED_LABEL;
use cohort_flow::{Dimension, Metric, PeriodKey, ReportRow};

use crate::utils::{scenario_records, synthetic_cohort};

fn period(s: &str) -> PeriodKey {
    s.parse().unwrap()
}

fn series(rows: &[ReportRow]) -> Vec<(String, Option<&str>, u64)> {
    rows.iter()
        .map(|r| (r.period.to_string(), r.dimension_value.as_deref(), r.value))
        .collect()
}

#[test]
fn test_global_series() {
    let dataset = classify(&scenario_records()).unwrap();

    let new = aggregate(dataset.encounters(), None, Metric::New);
    assert_eq!(
        series(&new),
        vec![
            ("2024-01".to_string(), None, 2),
            ("2024-02".to_string(), None, 1),
            ("2024-03".to_string(), None, 0),
        ]
    );

    let egress = aggregate(dataset.encounters(), None, Metric::Egress);
    let values: Vec<u64> = egress.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![0, 2, 0]);

    let prevalent = aggregate(dataset.encounters(), None, Metric::Prevalent);
    let values: Vec<u64> = prevalent.iter().map(|r| r.value).collect();
    assert_eq!(values, vec![2, 3, 1]);
}

#[test]
fn test_facility_series_sorted_with_zero_rows() {
    let dataset = classify(&scenario_records()).unwrap();
    let rows = aggregate(dataset.encounters(), Some(Dimension::Facility), Metric::Egress);

    assert_eq!(
        series(&rows),
        vec![
            ("2024-01".to_string(), Some("F1"), 0),
            ("2024-01".to_string(), Some("F2"), 0),
            ("2024-02".to_string(), Some("F1"), 1),
            ("2024-02".to_string(), Some("F2"), 1),
            ("2024-03".to_string(), Some("F1"), 0),
        ]
    );
}

#[test]
fn test_dimension_rows_add_up_to_global() {
    let dataset = classify(&synthetic_cohort(11, 300)).unwrap();

    for metric in Metric::ALL {
        let global: BTreeMap<PeriodKey, u64> = aggregate(dataset.encounters(), None, metric)
            .into_iter()
            .map(|r| (r.period, r.value))
            .collect();

        for dimension in Dimension::ALL {
            let mut summed: BTreeMap<PeriodKey, u64> = BTreeMap::new();
            for row in aggregate(dataset.encounters(), Some(dimension), metric) {
                assert!(row.dimension_value.is_some());
                *summed.entry(row.period).or_default() += row.value;
            }
            assert_eq!(summed, global, "{metric} by {}", dimension.as_str());
        }
    }
}

#[test]
fn test_missing_values_are_unassigned() {
    let mut records = scenario_records();
    records.push(cohort_flow::EncounterRecord::new(
        "P4",
        chrono::NaiveDate::from_ymd_opt(2024, 1, 9).unwrap(),
    ));
    let dataset = classify(&records).unwrap();

    let rows = aggregate(dataset.encounters(), Some(Dimension::Jurisdiction), Metric::New);
    let unassigned: Vec<&ReportRow> = rows
        .iter()
        .filter(|r| r.dimension_value.as_deref() == Some(UNASSIGNED_LABEL))
        .collect();

    assert_eq!(unassigned.len(), 1);
    assert_eq!(unassigned[0].period, period("2024-01"));
    assert_eq!(unassigned[0].value, 1);
}

#[test]
fn test_aggregate_all_matches_single_metrics() {
    let dataset = classify(&synthetic_cohort(3, 200)).unwrap();

    for dimension in [None, Some(Dimension::Facility), Some(Dimension::Jurisdiction)] {
        let combined = aggregate_all(dataset.encounters(), dimension);

        for metric in Metric::ALL {
            let single = aggregate(dataset.encounters(), dimension, metric);
            assert_eq!(single.len(), combined.len());
            for (row, flow) in single.iter().zip(&combined) {
                assert_eq!(row.period, flow.period);
                assert_eq!(row.dimension_value, flow.dimension_value);
                assert_eq!(row.value, flow.get(metric));
            }
        }
    }
}

#[test]
fn test_empty_input() {
    assert!(aggregate(std::iter::empty(), None, Metric::New).is_empty());
    assert!(aggregate_all(std::iter::empty(), Some(Dimension::Facility)).is_empty());
}

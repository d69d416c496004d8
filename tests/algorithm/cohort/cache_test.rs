//! Tests for the classification cache

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use cohort_flow::{ClassificationCache, DatasetKey, Error};

use crate::utils::{date, record, scenario_records};

#[test]
fn test_classifies_once_per_key() {
    let cache = ClassificationCache::new();
    let key = DatasetKey::from_records(&scenario_records());
    let loads = AtomicUsize::new(0);

    let first = cache
        .get_or_classify(&key, || {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(scenario_records())
        })
        .unwrap();
    let second = cache
        .get_or_classify(&key, || {
            loads.fetch_add(1, Ordering::SeqCst);
            Ok(scenario_records())
        })
        .unwrap();

    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn test_concurrent_first_requests_share_one_classification() {
    let cache = Arc::new(ClassificationCache::new());
    let key = DatasetKey::from_records(&scenario_records());
    let loads = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let key = key.clone();
            let loads = Arc::clone(&loads);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                cache
                    .get_or_classify(&key, || {
                        loads.fetch_add(1, Ordering::SeqCst);
                        Ok(scenario_records())
                    })
                    .unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(loads.load(Ordering::SeqCst), 1);
    assert!(results.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
}

#[test]
fn test_failures_are_not_cached() {
    let cache = ClassificationCache::new();
    let key = DatasetKey::Content(42);

    let err = cache
        .get_or_classify(&key, || Err(Error::validation("source unavailable")))
        .unwrap_err();
    assert!(err.is_validation());
    assert!(cache.get(&key).is_none());
    assert!(cache.is_empty());

    let dataset = cache.get_or_classify(&key, || Ok(scenario_records())).unwrap();
    assert_eq!(dataset.len(), 6);
    assert!(cache.get(&key).is_some());
}

#[test]
fn test_data_errors_are_not_cached() {
    let cache = ClassificationCache::new();
    let mut bad = scenario_records();
    bad[2].patient_id = None;

    assert!(cache.get_or_classify_records(&bad).unwrap_err().is_data());
    assert!(cache.is_empty());
}

#[test]
fn test_content_keys() {
    let records = scenario_records();
    assert_eq!(DatasetKey::from_records(&records), DatasetKey::from_records(&records.clone()));

    let mut changed = records.clone();
    changed.push(record("P4", date(2024, 3, 2), "F1", "J1"));
    assert_ne!(DatasetKey::from_records(&records), DatasetKey::from_records(&changed));

    let cache = ClassificationCache::new();
    let a = cache.get_or_classify_records(&records).unwrap();
    let b = cache.get_or_classify_records(&changed).unwrap();
    assert_eq!(a.len() + 1, b.len());
    assert_eq!(cache.len(), 2);
}

#[test]
fn test_evict_and_clear() {
    let cache = ClassificationCache::new();
    let records = scenario_records();
    let key = DatasetKey::from_records(&records);

    let first = cache.get_or_classify_records(&records).unwrap();
    cache.evict(&key);
    assert!(cache.get(&key).is_none());

    let second = cache.get_or_classify_records(&records).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(*first, *second);

    cache.clear();
    assert!(cache.is_empty());
}

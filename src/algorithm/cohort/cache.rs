//! Memoized classification keyed by dataset identity
//!
//! Classification runs once per distinct dataset. Concurrent first requests
//! for the same key wait on a per-key lock, so only one of them classifies
//! and the others receive the shared result. Failures are returned to the
//! caller that hit them and are not cached.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::SystemTime;

use log::{debug, info};
use rustc_hash::FxHasher;

use crate::algorithm::cohort::classifier::classify;
use crate::algorithm::cohort::dataset::ClassifiedDataset;
use crate::config::CohortConfig;
use crate::error::Result;
use crate::loader::load_encounters;
use crate::models::encounter::EncounterRecord;
use crate::utils::io::parquet::find_parquet_files;

/// Stable identity of a loaded dataset
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DatasetKey {
    /// A file or directory on disk, identified by path, latest modification
    /// time and total size
    Source {
        /// Canonical path of the source
        path: PathBuf,
        /// Latest modification time among the source files
        modified: Option<SystemTime>,
        /// Total size in bytes of the source files
        len: u64,
    },
    /// In-memory records, identified by a hash of their content
    Content(u64),
}

impl DatasetKey {
    /// Identity of a Parquet file or a directory of Parquet files
    pub fn from_path(path: &Path) -> Result<Self> {
        let canonical = path.canonicalize()?;
        let files = if canonical.is_dir() {
            find_parquet_files(&canonical)?
        } else {
            vec![canonical.clone()]
        };

        let mut modified = None;
        let mut len = 0;
        for file in &files {
            let metadata = std::fs::metadata(file)?;
            len += metadata.len();
            modified = modified.max(metadata.modified().ok());
        }

        Ok(Self::Source {
            path: canonical,
            modified,
            len,
        })
    }

    /// Identity of an in-memory record set
    #[must_use]
    pub fn from_records(records: &[EncounterRecord]) -> Self {
        let mut hasher = FxHasher::default();
        records.hash(&mut hasher);
        Self::Content(hasher.finish())
    }
}

type Slot = Arc<Mutex<Option<Arc<ClassifiedDataset>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Explicit memo of classified datasets
#[derive(Debug, Default)]
pub struct ClassificationCache {
    slots: Mutex<HashMap<DatasetKey, Slot>>,
}

impl ClassificationCache {
    /// Create an empty cache
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, key: &DatasetKey) -> Slot {
        Arc::clone(lock(&self.slots).entry(key.clone()).or_default())
    }

    /// Return the classified dataset for `key`, loading and classifying it
    /// with `load` on first access
    ///
    /// # Errors
    /// Propagates errors from `load` and from classification
    pub fn get_or_classify<F>(&self, key: &DatasetKey, load: F) -> Result<Arc<ClassifiedDataset>>
    where
        F: FnOnce() -> Result<Vec<EncounterRecord>>,
    {
        let slot = self.slot(key);
        let mut entry = lock(&slot);

        if let Some(dataset) = entry.as_ref() {
            debug!("Classification cache hit for {key:?}");
            return Ok(Arc::clone(dataset));
        }

        info!("Classification cache miss for {key:?}");
        match load().and_then(|records| classify(&records)) {
            Ok(dataset) => {
                let dataset = Arc::new(dataset);
                *entry = Some(Arc::clone(&dataset));
                Ok(dataset)
            }
            Err(e) => {
                self.release_empty_slot(key, &slot);
                Err(e)
            }
        }
    }

    /// Remove `key`'s slot after a failed classification
    ///
    /// The slot stays while other callers hold it; one of them retries and
    /// either fills it or releases it in turn.
    fn release_empty_slot(&self, key: &DatasetKey, slot: &Slot) {
        let mut slots = lock(&self.slots);
        let unshared = slots
            .get(key)
            .is_some_and(|current| Arc::ptr_eq(current, slot) && Arc::strong_count(slot) == 2);
        if unshared {
            slots.remove(key);
        }
    }

    /// Drop entries for `key`'s source path that were recorded under an
    /// older modification time or size
    fn evict_stale_sources(&self, key: &DatasetKey) {
        let DatasetKey::Source { path, .. } = key else {
            return;
        };
        lock(&self.slots).retain(|cached, _| match cached {
            DatasetKey::Source { path: cached_path, .. } => cached_path != path || cached == key,
            DatasetKey::Content(_) => true,
        });
    }

    /// Load and classify the Parquet source at `path`, reusing an earlier
    /// result while the source is unchanged
    ///
    /// Once the source changes, the result for its previous state is dropped.
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or contains malformed
    /// encounters
    pub fn get_or_load(
        &self,
        path: &Path,
        config: &CohortConfig,
    ) -> Result<Arc<ClassifiedDataset>> {
        let key = DatasetKey::from_path(path)?;
        self.evict_stale_sources(&key);
        self.get_or_classify(&key, || load_encounters(path, config))
    }

    /// Classify in-memory records, reusing an earlier result for identical
    /// content
    ///
    /// # Errors
    /// Returns a data error for malformed records
    pub fn get_or_classify_records(
        &self,
        records: &[EncounterRecord],
    ) -> Result<Arc<ClassifiedDataset>> {
        let key = DatasetKey::from_records(records);
        self.get_or_classify(&key, || Ok(records.to_vec()))
    }

    /// The cached dataset for `key`, without classifying
    #[must_use]
    pub fn get(&self, key: &DatasetKey) -> Option<Arc<ClassifiedDataset>> {
        let slot = lock(&self.slots).get(key).cloned()?;
        let entry = lock(&slot);
        entry.clone()
    }

    /// Drop the entry for `key`
    pub fn evict(&self, key: &DatasetKey) {
        lock(&self.slots).remove(key);
    }

    /// Drop every entry
    pub fn clear(&self) {
        lock(&self.slots).clear();
    }

    /// Number of classified datasets held
    #[must_use]
    pub fn len(&self) -> usize {
        let slots: Vec<Slot> = lock(&self.slots).values().cloned().collect();
        slots.iter().filter(|slot| lock(slot).is_some()).count()
    }

    /// Whether no classified dataset is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

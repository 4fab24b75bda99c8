use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use crate::harvester::JobRecord;
use crate::store::{get_json, set_json, KvStore, StoreError};

/// Seen-id set shared by every query of a harvester.
///
/// The check-and-insert is one short synchronous critical section, so two
/// tasks racing on the same id see exactly one survivor.
#[derive(Debug, Default)]
pub struct Deduplicator {
    seen: Mutex<HashSet<String>>,
}

impl Deduplicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn store_key(source: &str) -> String {
        format!("harvester:seen:{source}")
    }

    fn with_seen<R>(&self, f: impl FnOnce(&mut HashSet<String>) -> R) -> R {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut seen)
    }

    /// Drops records whose id was already seen (in earlier batches or
    /// earlier in this one) and marks the survivors as seen.
    pub fn deduplicate(&self, records: Vec<JobRecord>) -> (Vec<JobRecord>, usize) {
        let total = records.len();
        let unique: Vec<JobRecord> = self.with_seen(|seen| {
            records
                .into_iter()
                .filter(|r| seen.insert(r.external_job_id.clone()))
                .collect()
        });
        let duplicates = total - unique.len();
        debug!(total, unique = unique.len(), duplicates, "deduplicated batch");
        (unique, duplicates)
    }

    /// Un-marks ids whose records were never persisted.
    pub fn forget<'a>(&self, ids: impl IntoIterator<Item = &'a str>) {
        self.with_seen(|seen| {
            for id in ids {
                seen.remove(id);
            }
        });
    }

    pub fn reset(&self) {
        self.with_seen(|seen| seen.clear());
    }

    pub fn len(&self) -> usize {
        self.with_seen(|seen| seen.len())
    }

    /// Sorted ids, for persistence.
    pub fn snapshot(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.with_seen(|seen| seen.iter().cloned().collect());
        ids.sort();
        ids
    }

    /// Merges the persisted set for `source` into memory.
    pub async fn load(&self, store: &dyn KvStore, source: &str) -> Result<usize, StoreError> {
        let ids: Vec<String> = get_json(store, &Self::store_key(source))
            .await?
            .unwrap_or_default();
        let loaded = ids.len();
        self.with_seen(|seen| seen.extend(ids));
        Ok(loaded)
    }

    pub async fn persist(&self, store: &dyn KvStore, source: &str) -> Result<(), StoreError> {
        set_json(store, &Self::store_key(source), &self.snapshot()).await
    }
}

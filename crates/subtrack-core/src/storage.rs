//! Persistence contract consumed by the record store.

use std::sync::Mutex;

use subtrack_domain::SubscriptionRecord;

use crate::CoreError;

/// External collaborator that round-trips the full record set.
pub trait RecordStorage: Send + Sync {
    /// Returns `Ok(None)` when nothing has ever been saved.
    fn load(&self) -> Result<Option<Vec<SubscriptionRecord>>, CoreError>;
    fn save(&self, records: &[SubscriptionRecord]) -> Result<(), CoreError>;
}

/// Process-local storage for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    records: Option<Vec<SubscriptionRecord>>,
    fail_saves: bool,
    fail_loads: bool,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SubscriptionRecord>) -> Self {
        let storage = Self::default();
        storage.lock().records = Some(records);
        storage
    }

    /// Makes subsequent saves fail with [`CoreError::Storage`].
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Makes subsequent loads fail as if the stored data were corrupt.
    pub fn set_fail_loads(&self, fail: bool) {
        self.lock().fail_loads = fail;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.lock().saves
    }

    pub fn snapshot(&self) -> Option<Vec<SubscriptionRecord>> {
        self.lock().records.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RecordStorage for MemoryStorage {
    fn load(&self) -> Result<Option<Vec<SubscriptionRecord>>, CoreError> {
        let state = self.lock();
        if state.fail_loads {
            return Err(CoreError::Serde("stored records are corrupt".into()));
        }
        Ok(state.records.clone())
    }

    fn save(&self, records: &[SubscriptionRecord]) -> Result<(), CoreError> {
        let mut state = self.lock();
        if state.fail_saves {
            return Err(CoreError::Storage("storage unavailable".into()));
        }
        state.records = Some(records.to_vec());
        state.saves += 1;
        Ok(())
    }
}

impl<T: RecordStorage + ?Sized> RecordStorage for std::sync::Arc<T> {
    fn load(&self) -> Result<Option<Vec<SubscriptionRecord>>, CoreError> {
        (**self).load()
    }

    fn save(&self, records: &[SubscriptionRecord]) -> Result<(), CoreError> {
        (**self).save(records)
    }
}

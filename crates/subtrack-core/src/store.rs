//! Owner of the canonical record collection.

use chrono::NaiveDate;
use uuid::Uuid;

use subtrack_domain::{AnalyticsPeriod, SubscriptionRecord};

use crate::{
    aggregate::{AggregateService, AnalyticsReport, DashboardSummary},
    renewal::RenewalService,
    sample::sample_records,
    storage::RecordStorage,
    validation::validate_record,
    CoreError,
};

/// Behaviour switches for [`RecordStore`].
#[derive(Debug, Clone, Copy)]
pub struct StoreOptions {
    /// Seed example records when storage reports nothing was ever saved.
    pub seed_sample_data: bool,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            seed_sample_data: true,
        }
    }
}

/// Change notifications delivered to subscribers after each mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded { count: usize },
    Added(Uuid),
    Updated(Uuid),
    Deleted(Uuid),
    Toggled { id: Uuid, active: bool },
    Renewed(Vec<Uuid>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

/// Holds the record set, applies CRUD, runs renewal passes, and writes
/// through to a [`RecordStorage`] after every change.
///
/// Persistence failures never fail a mutation: the in-memory state stays
/// authoritative and the failure is kept in [`RecordStore::last_persistence_error`].
pub struct RecordStore {
    records: Vec<SubscriptionRecord>,
    storage: Box<dyn RecordStorage>,
    options: StoreOptions,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
    last_persistence_error: Option<String>,
}

impl RecordStore {
    pub fn new(storage: Box<dyn RecordStorage>, options: StoreOptions) -> Self {
        Self {
            records: Vec::new(),
            storage,
            options,
            listeners: Vec::new(),
            next_listener: 0,
            last_persistence_error: None,
        }
    }

    /// Replaces the in-memory set with persisted records, seeds samples on
    /// first run, then runs one renewal pass. Returns the resulting count.
    pub fn load(&mut self, today: NaiveDate) -> usize {
        let (records, seeded) = match self.storage.load() {
            Ok(Some(records)) => {
                tracing::info!(count = records.len(), "loaded subscription records");
                (records, false)
            }
            Ok(None) if self.options.seed_sample_data => {
                let samples = sample_records(today);
                tracing::info!(count = samples.len(), "seeding sample subscriptions");
                (samples, true)
            }
            Ok(None) => (Vec::new(), false),
            Err(err) => {
                tracing::warn!(error = %err, "failed to load subscriptions; starting empty");
                (Vec::new(), false)
            }
        };
        self.records = records;
        self.dedupe_ids();
        if seeded {
            self.persist();
        }
        let count = self.records.len();
        self.emit(StoreEvent::Loaded { count });
        self.process_renewals(today);
        count
    }

    pub fn records(&self) -> &[SubscriptionRecord] {
        &self.records
    }

    pub fn get(&self, id: Uuid) -> Option<&SubscriptionRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Validates and appends a record. A nil or already-used id is replaced.
    pub fn add(&mut self, mut record: SubscriptionRecord) -> Result<Uuid, CoreError> {
        validate_record(&record)?;
        if record.id.is_nil() || self.get(record.id).is_some() {
            record.id = Uuid::new_v4();
        }
        let id = record.id;
        tracing::debug!(%id, name = %record.name, "adding subscription");
        self.records.push(record);
        self.persist();
        self.emit(StoreEvent::Added(id));
        Ok(id)
    }

    /// Replaces the record with the same id. Returns `Ok(false)` when no such
    /// record exists; nothing is persisted in that case.
    pub fn update(&mut self, record: SubscriptionRecord) -> Result<bool, CoreError> {
        validate_record(&record)?;
        let id = record.id;
        let Some(slot) = self.records.iter_mut().find(|existing| existing.id == id) else {
            tracing::debug!(%id, "update ignored; unknown subscription");
            return Ok(false);
        };
        *slot = record;
        self.persist();
        self.emit(StoreEvent::Updated(id));
        Ok(true)
    }

    /// Removes the record with `id`, returning whether one was removed.
    pub fn delete(&mut self, id: Uuid) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        if self.records.len() == before {
            tracing::debug!(%id, "delete ignored; unknown subscription");
            return false;
        }
        self.persist();
        self.emit(StoreEvent::Deleted(id));
        true
    }

    /// Flips `is_active`, returning the new value or `None` for an unknown id.
    pub fn toggle_active(&mut self, id: Uuid) -> Option<bool> {
        let record = self.records.iter_mut().find(|record| record.id == id)?;
        record.is_active = !record.is_active;
        let active = record.is_active;
        self.persist();
        self.emit(StoreEvent::Toggled { id, active });
        Some(active)
    }

    /// Advances every overdue auto-renewing record and persists once if any changed.
    pub fn process_renewals(&mut self, today: NaiveDate) -> Vec<Uuid> {
        let changed = RenewalService::advance_all(&mut self.records, today);
        if !changed.is_empty() {
            tracing::info!(count = changed.len(), %today, "renewed overdue subscriptions");
            self.persist();
            self.emit(StoreEvent::Renewed(changed.clone()));
        }
        changed
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StoreEvent) + Send + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Message from the most recent failed save, cleared by the next successful one.
    pub fn last_persistence_error(&self) -> Option<&str> {
        self.last_persistence_error.as_deref()
    }

    pub fn active(&self) -> Vec<&SubscriptionRecord> {
        AggregateService::active(&self.records)
    }

    pub fn overdue(&self, today: NaiveDate) -> Vec<&SubscriptionRecord> {
        AggregateService::overdue(&self.records, today)
    }

    pub fn upcoming(&self, today: NaiveDate) -> Vec<&SubscriptionRecord> {
        AggregateService::upcoming(&self.records, today)
    }

    pub fn total_monthly(&self) -> f64 {
        AggregateService::total_monthly(&self.records)
    }

    pub fn total_yearly(&self) -> f64 {
        AggregateService::total_yearly(&self.records)
    }

    pub fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        AggregateService::dashboard(&self.records, today)
    }

    pub fn analytics(&self, period: AnalyticsPeriod) -> AnalyticsReport {
        AggregateService::analytics(&self.records, period)
    }

    fn persist(&mut self) {
        match self.storage.save(&self.records) {
            Ok(()) => self.last_persistence_error = None,
            Err(err) => {
                tracing::warn!(error = %err, "failed to save subscriptions");
                self.last_persistence_error = Some(err.to_string());
            }
        }
    }

    fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }

    fn dedupe_ids(&mut self) {
        let mut seen = std::collections::HashSet::new();
        for record in self.records.iter_mut() {
            if !seen.insert(record.id) {
                let replacement = Uuid::new_v4();
                tracing::warn!(old = %record.id, new = %replacement, "reassigned duplicate subscription id");
                record.id = replacement;
                seen.insert(replacement);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::storage::MemoryStorage;
    use subtrack_domain::{BillingCycle, SubscriptionCategory};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
    }

    fn record(name: &str, price: f64) -> SubscriptionRecord {
        SubscriptionRecord::new(
            name,
            price,
            BillingCycle::Monthly,
            SubscriptionCategory::Other,
            NaiveDate::from_ymd_opt(2025, 3, 20).unwrap(),
        )
    }

    fn empty_store() -> (RecordStore, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let mut store = RecordStore::new(
            Box::new(Arc::clone(&storage)),
            StoreOptions {
                seed_sample_data: false,
            },
        );
        store.load(today());
        (store, storage)
    }

    #[test]
    fn add_rejects_invalid_records_without_storing() {
        let (mut store, storage) = empty_store();
        let err = store.add(record("", 5.0)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.is_empty());
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn add_replaces_nil_and_duplicate_ids() {
        let (mut store, _) = empty_store();
        let mut nil = record("Nil", 1.0);
        nil.id = Uuid::nil();
        let first = store.add(nil).unwrap();
        assert!(!first.is_nil());

        let dup = store.get(first).cloned().unwrap();
        let second = store.add(dup).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn lookup_misses_are_silent() {
        let (mut store, storage) = empty_store();
        assert!(!store.update(record("Ghost", 1.0)).unwrap());
        assert!(!store.delete(Uuid::new_v4()));
        assert!(store.toggle_active(Uuid::new_v4()).is_none());
        assert_eq!(storage.save_count(), 0);
    }

    #[test]
    fn listeners_receive_events_until_unsubscribed() {
        let (mut store, _) = empty_store();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let listener = store.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

        let id = store.add(record("Notion", 8.0)).unwrap();
        assert_eq!(store.toggle_active(id), Some(false));
        assert!(store.unsubscribe(listener));
        store.delete(id);

        let events = seen.lock().unwrap().clone();
        assert_eq!(
            events,
            vec![
                StoreEvent::Added(id),
                StoreEvent::Toggled { id, active: false },
            ]
        );
    }

    #[test]
    fn failed_save_keeps_memory_state_and_reports() {
        let (mut store, storage) = empty_store();
        storage.set_fail_saves(true);
        let id = store.add(record("Offline", 3.0)).unwrap();
        assert!(store.get(id).is_some());
        assert!(store.last_persistence_error().is_some());

        storage.set_fail_saves(false);
        store.toggle_active(id);
        assert!(store.last_persistence_error().is_none());
    }
}

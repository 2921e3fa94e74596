//! In-memory medications store used by the service tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{DayEntry, DaysChange, MedicationRecord};
use std::collections::HashSet;
use std::sync::Mutex;

use super::traits::MedicationStorage;

/// A stored document with its audit fields
#[derive(Debug, Clone, PartialEq)]
pub struct StoredMedication {
    pub id: String,
    pub days: Vec<DayEntry>,
    pub days_old: Option<Vec<DayEntry>>,
    pub days_migrated_at: Option<DateTime<Utc>>,
}

/// Medication store backed by a `Vec`, with failure injection per document
#[derive(Debug, Default)]
pub struct InMemoryMedicationStore {
    documents: Mutex<Vec<StoredMedication>>,
    failing_ids: Mutex<HashSet<String>>,
    write_log: Mutex<Vec<String>>,
    fail_listing: Mutex<bool>,
}

impl InMemoryMedicationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from `(id, days)` pairs
    pub fn with_documents<'a>(documents: impl IntoIterator<Item = (&'a str, Vec<DayEntry>)>) -> Self {
        let store = Self::new();
        for (id, days) in documents {
            store.insert(id, days);
        }
        store
    }

    pub fn insert(&self, id: &str, days: Vec<DayEntry>) {
        self.documents.lock().unwrap().push(StoredMedication {
            id: id.to_string(),
            days,
            days_old: None,
            days_migrated_at: None,
        });
    }

    /// Make every write to `id` fail
    pub fn fail_updates_for(&self, id: &str) {
        self.failing_ids.lock().unwrap().insert(id.to_string());
    }

    /// Make `list_medications` fail
    pub fn fail_listing(&self) {
        *self.fail_listing.lock().unwrap() = true;
    }

    pub fn get(&self, id: &str) -> Option<StoredMedication> {
        self.documents.lock().unwrap().iter().find(|doc| doc.id == id).cloned()
    }

    /// IDs of every attempted write, in call order, including failed ones
    pub fn write_attempts(&self) -> Vec<String> {
        self.write_log.lock().unwrap().clone()
    }

    fn reference_for(id: &str) -> String {
        format!("memory/medications/{}", id)
    }
}

#[async_trait]
impl MedicationStorage for InMemoryMedicationStore {
    async fn list_medications(&self) -> Result<Vec<MedicationRecord>> {
        if *self.fail_listing.lock().unwrap() {
            return Err(anyhow!("medications collection is unavailable"));
        }

        Ok(self
            .documents
            .lock()
            .unwrap()
            .iter()
            .map(|doc| MedicationRecord {
                id: doc.id.clone(),
                reference: Self::reference_for(&doc.id),
                days: doc.days.clone(),
            })
            .collect())
    }

    async fn migrate_days(&self, change: &DaysChange) -> Result<()> {
        self.write_log.lock().unwrap().push(change.id.clone());

        if self.failing_ids.lock().unwrap().contains(&change.id) {
            return Err(anyhow!("permission denied on {}", change.reference));
        }

        let mut documents = self.documents.lock().unwrap();
        let doc = documents
            .iter_mut()
            .find(|doc| doc.id == change.id)
            .ok_or_else(|| anyhow!("no document to update: {}", change.reference))?;

        doc.days_old = Some(change.old.clone());
        doc.days = change.new.clone();
        doc.days_migrated_at = Some(Utc::now());
        Ok(())
    }
}

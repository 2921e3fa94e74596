//! # Storage Traits
//!
//! This module defines the storage abstraction the migration service works
//! against, so the domain layer can run over Firestore in production and an
//! in-memory store in tests.

use anyhow::Result;
use async_trait::async_trait;
use shared::{DaysChange, MedicationRecord};

/// Trait defining the operations the migrator needs from the medications collection
#[async_trait]
pub trait MedicationStorage: Send + Sync {
    /// Fetch every document in the collection
    async fn list_medications(&self) -> Result<Vec<MedicationRecord>>;

    /// Write one migrated record: sets `days` to `change.new`, `days_old` to
    /// `change.old` and `days_migrated_at` to a store-assigned timestamp.
    /// Fails if the document no longer exists.
    async fn migrate_days(&self, change: &DaysChange) -> Result<()>;
}

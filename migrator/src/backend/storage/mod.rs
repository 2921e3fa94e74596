//! # Storage Module
//!
//! Handles all reads and writes against the medications collection.
//!
//! The migration service only sees the [`MedicationStorage`] trait; the
//! Firestore implementation can be swapped for the in-memory store in tests
//! without touching domain logic.

pub mod firestore;
pub mod traits;

#[cfg(test)]
pub mod memory;

pub use firestore::{FirestoreConnection, FirestoreMedicationRepository, ServiceAccountKey};
pub use traits::MedicationStorage;

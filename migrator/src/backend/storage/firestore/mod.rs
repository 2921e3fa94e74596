//! # Firestore Storage
//!
//! Medications collection access over the Firestore REST API, authenticated
//! with a service account key (or the local emulator).

pub mod connection;
pub mod credentials;
pub mod medication_repository;
pub mod value;

pub use connection::FirestoreConnection;
pub use credentials::ServiceAccountKey;
pub use medication_repository::{FirestoreMedicationRepository, DEFAULT_COLLECTION};

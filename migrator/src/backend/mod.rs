//! # Backend Module
//!
//! Contains all logic for the day-code migrator.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (CLI arguments, report)
//!     ↓
//! Domain Layer (normalizer, migration service)
//!     ↓
//! Storage Layer (Firestore REST)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use std::sync::Arc;
use tracing::info;

use crate::backend::domain::{DayMigrationService, MigrateDaysCommand, MigrationOutcome, MigratorError};
use crate::backend::io::MigratorConfig;
use crate::backend::storage::{FirestoreConnection, FirestoreMedicationRepository, ServiceAccountKey};

/// Load credentials and open the medications repository described by `config`
pub fn connect(config: &MigratorConfig) -> Result<FirestoreMedicationRepository, MigratorError> {
    let key = ServiceAccountKey::load(&config.credentials_path)?;

    let connection = match &config.emulator_host {
        Some(host) => {
            info!("Using Firestore emulator at {}", host);
            FirestoreConnection::emulator(host, &key.project_id, &config.database_id)
        }
        None => FirestoreConnection::new(key, &config.database_id)?,
    };
    info!(
        "Connected to project {} (database {}), collection '{}'",
        connection.project_id(),
        config.database_id,
        config.collection
    );

    Ok(FirestoreMedicationRepository::new(Arc::new(connection), &config.collection))
}

/// Run the whole migration: connect, plan, then report or apply
pub async fn run_migration(config: &MigratorConfig) -> Result<MigrationOutcome, MigratorError> {
    let repository = connect(config)?;
    let service = DayMigrationService::new(Arc::new(repository));

    let outcome = service
        .run(MigrateDaysCommand { mode: config.mode })
        .await?;
    Ok(outcome)
}

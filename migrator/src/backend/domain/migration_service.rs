use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info};

use crate::backend::domain::commands::{MigrateDaysCommand, MigrationOutcome, MigrationPlan};
use crate::backend::domain::day_codes::{needs_update, normalize_days};
use crate::backend::storage::MedicationStorage;
use shared::{DaysChange, FailedUpdate, MigrationMode, MigrationSummary};

/// Service that rewrites legacy weekday codes across the medications collection
pub struct DayMigrationService<S: MedicationStorage> {
    storage: Arc<S>,
}

impl<S: MedicationStorage> Clone for DayMigrationService<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: MedicationStorage> DayMigrationService<S> {
    /// Create a new DayMigrationService
    pub fn new(storage: Arc<S>) -> Self {
        Self { storage }
    }

    /// Fetch the collection once and work out which records need rewriting
    pub async fn plan(&self) -> Result<MigrationPlan> {
        let records = self
            .storage
            .list_medications()
            .await
            .context("Failed to fetch medications")?;
        info!("Found {} documents in medications collection", records.len());

        let total = records.len();
        let changes: Vec<DaysChange> = records
            .into_iter()
            .filter_map(|record| {
                let normalized = normalize_days(&record.days);
                needs_update(&record.days, &normalized).then(|| DaysChange {
                    id: record.id,
                    reference: record.reference,
                    old: record.days,
                    new: normalized,
                })
            })
            .collect();

        info!("Documents to update: {}", changes.len());
        Ok(MigrationPlan { total, changes })
    }

    /// Run the migration in the requested mode
    pub async fn run(&self, command: MigrateDaysCommand) -> Result<MigrationOutcome> {
        info!(
            "Starting migration ({}): mapping legacy single-letter day codes to 3-letter Spanish labels",
            command.mode
        );

        let plan = self.plan().await?;

        if plan.is_empty() {
            info!("Nothing to do");
            return Ok(MigrationOutcome::NothingToDo { total: plan.total });
        }

        match command.mode {
            MigrationMode::DryRun => {
                info!("Dry run: {} documents would be updated", plan.changes.len());
                Ok(MigrationOutcome::DryRun {
                    total: plan.total,
                    changes: plan.changes,
                })
            }
            MigrationMode::Apply => Ok(MigrationOutcome::Applied(self.apply(plan).await)),
        }
    }

    /// Write every change, one at a time. A failed write is recorded and the
    /// loop moves on; nothing is retried or rolled back.
    async fn apply(&self, plan: MigrationPlan) -> MigrationSummary {
        let mut summary = MigrationSummary {
            total: plan.total,
            unchanged: plan.unchanged(),
            ..MigrationSummary::default()
        };

        for change in plan.changes {
            match self.storage.migrate_days(&change).await {
                Ok(()) => {
                    info!("Updated {}", change);
                    summary.updated.push(change);
                }
                Err(e) => {
                    error!("Failed updating {}: {:#}", change.id, e);
                    summary.failed.push(FailedUpdate {
                        id: change.id,
                        message: format!("{:#}", e),
                    });
                }
            }
        }

        info!(
            "Migration complete. Updated: {}, Unchanged: {}, Failed: {}",
            summary.updated_count(),
            summary.unchanged,
            summary.failed_count()
        );
        summary
    }
}

//! Domain-level command and result types for the day-code migration.
//! The CLI layer builds these from its parsed arguments; the report layer
//! renders the results.

use shared::{DaysChange, MigrationMode, MigrationSummary};

/// Input for a migration run.
#[derive(Debug, Clone, Copy)]
pub struct MigrateDaysCommand {
    pub mode: MigrationMode,
}

/// Records that need rewriting, computed from one collection snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MigrationPlan {
    /// Size of the snapshot
    pub total: usize,
    /// The worklist, in snapshot order
    pub changes: Vec<DaysChange>,
}

impl MigrationPlan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Records already in canonical form
    pub fn unchanged(&self) -> usize {
        self.total - self.changes.len()
    }
}

/// Result of a migration run.
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationOutcome {
    /// Every record was already normalized
    NothingToDo { total: usize },
    /// Changes computed but not written
    DryRun { total: usize, changes: Vec<DaysChange> },
    /// Changes written; some may have failed
    Applied(MigrationSummary),
}

impl MigrationOutcome {
    /// Size of the worklist the run acted on
    pub fn pending(&self) -> usize {
        match self {
            MigrationOutcome::NothingToDo { .. } => 0,
            MigrationOutcome::DryRun { changes, .. } => changes.len(),
            MigrationOutcome::Applied(summary) => summary.updated_count() + summary.failed_count(),
        }
    }
}

//! Operator-facing report of a migration run.

use std::io::{self, Write};

use crate::backend::domain::commands::MigrationOutcome;

/// Write the report for `outcome` to `out`
pub fn render<W: Write>(outcome: &MigrationOutcome, out: &mut W) -> io::Result<()> {
    writeln!(out, "Documents to update: {}", outcome.pending())?;

    match outcome {
        MigrationOutcome::NothingToDo { .. } => {
            writeln!(out, "Nothing to do.")?;
        }
        MigrationOutcome::DryRun { changes, .. } => {
            writeln!(out, "Dry run mode (no changes will be written). Use --apply to perform updates.")?;
            for change in changes {
                writeln!(out, "{}", change)?;
            }
            writeln!(out, "Dry run complete. To apply changes re-run with --apply flag.")?;
        }
        MigrationOutcome::Applied(summary) => {
            for change in &summary.updated {
                writeln!(out, "Updated {}", change)?;
            }
            for failure in &summary.failed {
                writeln!(out, "Failed updating {}: {}", failure.id, failure.message)?;
            }
            writeln!(
                out,
                "Migration complete. Updated: {}, Skipped: {} (unchanged: {}, failed: {})",
                summary.updated_count(),
                summary.skipped(),
                summary.unchanged,
                summary.failed_count()
            )?;
        }
    }

    Ok(())
}

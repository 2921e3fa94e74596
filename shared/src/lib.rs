use serde::{Deserialize, Serialize};
use std::fmt;

/// One element of a medication's `days` array.
///
/// Text values are the only ones the migrator understands. Anything else
/// (numbers, maps, nulls...) is carried verbatim as it came from the store so
/// it can be written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DayEntry {
    /// A text entry such as `"L"`, `" m "` or `"Lun"`
    Label(String),
    /// A non-text entry, kept in the store's own encoding
    Opaque(serde_json::Value),
}

impl DayEntry {
    pub fn label(value: impl Into<String>) -> Self {
        DayEntry::Label(value.into())
    }

    /// The text of this entry, if it is one
    pub fn as_label(&self) -> Option<&str> {
        match self {
            DayEntry::Label(text) => Some(text),
            DayEntry::Opaque(_) => None,
        }
    }
}

impl From<&str> for DayEntry {
    fn from(value: &str) -> Self {
        DayEntry::Label(value.to_string())
    }
}

/// Render a `days` sequence the way it is shown to operators: a compact JSON array.
pub fn format_days(days: &[DayEntry]) -> String {
    serde_json::to_string(days).unwrap_or_else(|_| format!("{:?}", days))
}

/// A document from the medications collection, narrowed to the fields the
/// migrator reads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationRecord {
    /// Document ID (last segment of the reference)
    pub id: String,
    /// Full resource name of the document, used to address updates
    pub reference: String,
    /// Raw `days` entries; empty when the field is missing or not an array
    pub days: Vec<DayEntry>,
}

/// A record whose `days` value changes during migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaysChange {
    pub id: String,
    pub reference: String,
    /// Value before migration, written to `days_old`
    pub old: Vec<DayEntry>,
    /// Normalized value, written to `days`
    pub new: Vec<DayEntry>,
}

impl fmt::Display for DaysChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} -> {}",
            self.id,
            format_days(&self.old),
            format_days(&self.new)
        )
    }
}

/// Whether the migrator reports or persists the computed changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MigrationMode {
    /// Report proposed changes without writing anything
    DryRun,
    /// Persist the changes
    Apply,
}

impl MigrationMode {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, MigrationMode::DryRun)
    }
}

impl fmt::Display for MigrationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationMode::DryRun => write!(f, "dry-run"),
            MigrationMode::Apply => write!(f, "apply"),
        }
    }
}

/// A single record whose update was rejected by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedUpdate {
    pub id: String,
    pub message: String,
}

/// Tally of an apply run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MigrationSummary {
    /// Number of documents in the collection snapshot
    pub total: usize,
    /// Documents whose `days` were already normalized
    pub unchanged: usize,
    /// Changes that were written successfully, in processing order
    pub updated: Vec<DaysChange>,
    /// Changes the store rejected, in processing order
    pub failed: Vec<FailedUpdate>,
}

impl MigrationSummary {
    pub fn updated_count(&self) -> usize {
        self.updated.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Everything that was not updated: no-op records and failed ones together.
    pub fn skipped(&self) -> usize {
        self.total.saturating_sub(self.updated.len())
    }
}

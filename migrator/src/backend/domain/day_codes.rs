//! # Day Code Normalization
//!
//! Pure conversion of a medication's raw `days` entries into the canonical
//! form: 3-letter Spanish labels, no duplicates, Monday-first order.
//!
//! Entries the normalizer cannot recognize are never dropped silently: when
//! nothing in a record maps to a weekday, the cleaned-up entries are kept as
//! they are so the record is not emptied.

use shared::DayEntry;

use crate::backend::domain::models::weekday::Weekday;

/// Normalize a single entry. Non-text entries pass through untouched.
pub fn normalize_entry(entry: &DayEntry) -> DayEntry {
    let raw = match entry {
        DayEntry::Label(text) => text,
        DayEntry::Opaque(_) => return entry.clone(),
    };

    let trimmed = raw.trim();

    if let Some(day) = Weekday::from_legacy_code(trimmed) {
        return DayEntry::label(day.label());
    }

    // Already migrated. Checked before the first-letter fallback, which would
    // otherwise turn "Mié" into "Mar".
    if let Some(day) = Weekday::from_label(trimmed) {
        return DayEntry::label(day.label());
    }

    if let Some(day) = first_letter_code(trimmed).and_then(|code| Weekday::from_legacy_code(&code)) {
        return DayEntry::label(day.label());
    }

    DayEntry::label(trimmed)
}

/// Upper-cased first character, e.g. `"m"` -> `"M"`, `"lunes"` -> `"L"`
fn first_letter_code(value: &str) -> Option<String> {
    value.chars().next().map(|c| c.to_uppercase().collect())
}

/// Compute the normalized `days` sequence for one record.
pub fn normalize_days(raw: &[DayEntry]) -> Vec<DayEntry> {
    let mut unique: Vec<DayEntry> = Vec::with_capacity(raw.len());
    for entry in raw.iter().map(normalize_entry) {
        if !unique.contains(&entry) {
            unique.push(entry);
        }
    }

    let ordered: Vec<DayEntry> = Weekday::ALL
        .iter()
        .map(|day| DayEntry::label(day.label()))
        .filter(|label| unique.contains(label))
        .collect();

    if ordered.is_empty() {
        unique
    } else {
        ordered
    }
}

/// True when writing `normalized` would change the stored value
pub fn needs_update(raw: &[DayEntry], normalized: &[DayEntry]) -> bool {
    raw != normalized
}

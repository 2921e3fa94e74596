//! Conversion between Firestore REST documents and the migrator's records.
//!
//! Firestore encodes every field as a typed value object such as
//! `{"stringValue": "L"}` or `{"arrayValue": {"values": [...]}}`. Only string
//! values are decoded; any other array element is kept as the raw value
//! object so it round-trips unchanged.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use shared::{DayEntry, MedicationRecord};

pub const DAYS_FIELD: &str = "days";
pub const DAYS_OLD_FIELD: &str = "days_old";
pub const DAYS_MIGRATED_AT_FIELD: &str = "days_migrated_at";

/// A document as returned by the `documents.list` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreDocument {
    /// Full resource name, `projects/{p}/databases/{d}/documents/{collection}/{id}`
    pub name: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl FirestoreDocument {
    /// Document ID: the last segment of the resource name
    pub fn id(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(&self.name)
    }

    pub fn into_record(self) -> MedicationRecord {
        let days = self.fields.get(DAYS_FIELD).map(decode_days).unwrap_or_default();
        MedicationRecord {
            id: self.id().to_string(),
            reference: self.name,
            days,
        }
    }
}

/// A page of the `documents.list` response
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListDocumentsPage {
    #[serde(default)]
    pub documents: Vec<FirestoreDocument>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Decode a `days` field value. Anything other than an array reads as empty.
pub fn decode_days(value: &Value) -> Vec<DayEntry> {
    let Some(array) = value.get("arrayValue") else {
        return Vec::new();
    };

    array
        .get("values")
        .and_then(Value::as_array)
        .map(|values| values.iter().map(decode_entry).collect())
        .unwrap_or_default()
}

fn decode_entry(value: &Value) -> DayEntry {
    match value.get("stringValue").and_then(Value::as_str) {
        Some(text) => DayEntry::label(text),
        None => DayEntry::Opaque(value.clone()),
    }
}

/// Encode a `days` sequence as a Firestore array value
pub fn encode_days(days: &[DayEntry]) -> Value {
    let values: Vec<Value> = days
        .iter()
        .map(|entry| match entry {
            DayEntry::Label(text) => json!({ "stringValue": text }),
            DayEntry::Opaque(raw) => raw.clone(),
        })
        .collect();
    json!({ "arrayValue": { "values": values } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_document_with_legacy_days() {
        let doc: FirestoreDocument = serde_json::from_value(json!({
            "name": "projects/mediscan/databases/(default)/documents/medications/abc123",
            "fields": {
                "name": { "stringValue": "Ibuprofeno" },
                "days": { "arrayValue": { "values": [
                    { "stringValue": "L" },
                    { "integerValue": "3" },
                    { "stringValue": " x " }
                ] } }
            },
            "createTime": "2024-01-01T00:00:00Z",
            "updateTime": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        let record = doc.into_record();

        assert_eq!(record.id, "abc123");
        assert_eq!(
            record.reference,
            "projects/mediscan/databases/(default)/documents/medications/abc123"
        );
        assert_eq!(
            record.days,
            vec![
                DayEntry::label("L"),
                DayEntry::Opaque(json!({ "integerValue": "3" })),
                DayEntry::label(" x "),
            ]
        );
    }

    #[test]
    fn test_missing_or_non_array_days_read_as_empty() {
        let missing: FirestoreDocument =
            serde_json::from_value(json!({ "name": "projects/p/databases/d/documents/medications/a" })).unwrap();
        assert!(missing.into_record().days.is_empty());

        assert!(decode_days(&json!({ "stringValue": "L" })).is_empty());
        // Firestore omits `values` for an empty array
        assert!(decode_days(&json!({ "arrayValue": {} })).is_empty());
    }

    #[test]
    fn test_encode_keeps_opaque_entries_verbatim() {
        let days = vec![DayEntry::label("Mié"), DayEntry::Opaque(json!({ "nullValue": null }))];

        assert_eq!(
            encode_days(&days),
            json!({ "arrayValue": { "values": [
                { "stringValue": "Mié" },
                { "nullValue": null }
            ] } })
        );
        assert_eq!(decode_days(&encode_days(&days)), days);
    }

    #[test]
    fn test_list_page_defaults() {
        let page: ListDocumentsPage = serde_json::from_value(json!({})).unwrap();
        assert!(page.documents.is_empty());
        assert!(page.next_page_token.is_none());
    }
}

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use shared::{DaysChange, MedicationRecord};
use std::sync::Arc;
use tracing::debug;

use super::connection::{read_json, FirestoreConnection};
use super::value::{
    encode_days, ListDocumentsPage, DAYS_FIELD, DAYS_MIGRATED_AT_FIELD, DAYS_OLD_FIELD,
};
use crate::backend::storage::MedicationStorage;

pub const DEFAULT_COLLECTION: &str = "medications";
const PAGE_SIZE: u32 = 300;

/// Repository for the medications collection in Firestore
#[derive(Clone)]
pub struct FirestoreMedicationRepository {
    connection: Arc<FirestoreConnection>,
    collection: String,
}

impl FirestoreMedicationRepository {
    pub fn new(connection: Arc<FirestoreConnection>, collection: &str) -> Self {
        Self {
            connection,
            collection: collection.to_string(),
        }
    }

    fn collection_path(&self) -> String {
        format!("{}/{}", self.connection.documents_path(), self.collection)
    }

    /// Body of a `documents:commit` request that migrates one document
    pub fn commit_body(change: &DaysChange) -> Value {
        json!({
            "writes": [{
                "update": {
                    "name": change.reference,
                    "fields": {
                        DAYS_FIELD: encode_days(&change.new),
                        DAYS_OLD_FIELD: encode_days(&change.old),
                    }
                },
                "updateMask": { "fieldPaths": [DAYS_FIELD, DAYS_OLD_FIELD] },
                "updateTransforms": [{
                    "fieldPath": DAYS_MIGRATED_AT_FIELD,
                    "setToServerValue": "REQUEST_TIME"
                }],
                "currentDocument": { "exists": true }
            }]
        })
    }
}

#[async_trait]
impl MedicationStorage for FirestoreMedicationRepository {
    async fn list_medications(&self) -> Result<Vec<MedicationRecord>> {
        let path = self.collection_path();
        let mut records = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query: Vec<(&str, String)> = vec![("pageSize", PAGE_SIZE.to_string())];
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let response = self
                .connection
                .get(&path)
                .await?
                .query(&query)
                .send()
                .await
                .with_context(|| format!("Failed to list {}", path))?;
            let page: ListDocumentsPage = read_json(response)
                .await
                .with_context(|| format!("Failed to list {}", path))?;

            debug!("Fetched page of {} documents", page.documents.len());
            records.extend(page.documents.into_iter().map(|doc| doc.into_record()));

            match page.next_page_token.filter(|token| !token.is_empty()) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(records)
    }

    async fn migrate_days(&self, change: &DaysChange) -> Result<()> {
        let path = format!("{}:commit", self.connection.documents_path());
        let response = self
            .connection
            .post(&path)
            .await?
            .json(&Self::commit_body(change))
            .send()
            .await
            .with_context(|| format!("Failed to send update for {}", change.id))?;

        let _: Value = read_json(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::firestore::connection::DEFAULT_DATABASE_ID;
    use shared::DayEntry;

    #[test]
    fn test_collection_path() {
        let conn = Arc::new(FirestoreConnection::emulator("localhost:8080", "demo", DEFAULT_DATABASE_ID));
        let repo = FirestoreMedicationRepository::new(conn, DEFAULT_COLLECTION);

        assert_eq!(
            repo.collection_path(),
            "projects/demo/databases/(default)/documents/medications"
        );
    }

    #[test]
    fn test_commit_body_sets_days_audit_and_server_timestamp() {
        let change = DaysChange {
            id: "abc".to_string(),
            reference: "projects/demo/databases/(default)/documents/medications/abc".to_string(),
            old: vec![DayEntry::label("L"), DayEntry::label("M")],
            new: vec![DayEntry::label("Lun"), DayEntry::label("Mar")],
        };

        let body = FirestoreMedicationRepository::commit_body(&change);
        let write = &body["writes"][0];

        assert_eq!(write["update"]["name"], json!(change.reference));
        assert_eq!(
            write["update"]["fields"]["days"],
            json!({ "arrayValue": { "values": [{ "stringValue": "Lun" }, { "stringValue": "Mar" }] } })
        );
        assert_eq!(
            write["update"]["fields"]["days_old"],
            json!({ "arrayValue": { "values": [{ "stringValue": "L" }, { "stringValue": "M" }] } })
        );
        assert_eq!(write["updateMask"]["fieldPaths"], json!(["days", "days_old"]));
        assert_eq!(
            write["updateTransforms"],
            json!([{ "fieldPath": "days_migrated_at", "setToServerValue": "REQUEST_TIME" }])
        );
        assert_eq!(write["currentDocument"]["exists"], json!(true));
    }
}

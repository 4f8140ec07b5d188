use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::{DatabaseError, StoredDocument};
use crate::id::DocumentId;
use crate::model::Entity;

/// A typed document as returned to clients: `_id`, the entity fields, and
/// `deletedAt` once soft-deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record<T> {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub body: T,
    #[serde(rename = "deletedAt", default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

impl<T: Entity> TryFrom<StoredDocument> for Record<T> {
    type Error = DatabaseError;

    fn try_from(doc: StoredDocument) -> Result<Self, Self::Error> {
        let body = serde_json::from_value(serde_json::Value::Object(doc.body))
            .map_err(|e| DatabaseError::invalid_document(T::COLLECTION, format!("{}: {}", doc.id, e)))?;
        Ok(Record {
            id: doc.id,
            body,
            deleted_at: doc.deleted_at,
        })
    }
}

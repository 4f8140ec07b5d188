use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::database::manager::DatabaseError;
use crate::filter::{Filter, Scope};
use crate::id::DocumentId;

/// A document as persisted: identifier, JSON body and bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: DocumentId,
    pub body: Map<String, Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl StoredDocument {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Collection-oriented JSON document store.
///
/// Single-document writes are atomic; nothing else is coordinated. `update` and
/// `soft_delete` only ever touch live (not soft-deleted) documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and the health endpoint.
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), DatabaseError>;

    /// Create the collection if it does not exist yet.
    async fn ensure_collection(&self, collection: &str) -> Result<(), DatabaseError>;

    async fn find(&self, collection: &str, filter: &Filter, scope: Scope) -> Result<Vec<StoredDocument>, DatabaseError>;

    async fn find_by_id(&self, collection: &str, id: &DocumentId, scope: Scope) -> Result<Option<StoredDocument>, DatabaseError>;

    async fn find_by_ids(&self, collection: &str, ids: &[DocumentId], scope: Scope) -> Result<Vec<StoredDocument>, DatabaseError>;

    async fn insert(&self, collection: &str, id: DocumentId, body: Map<String, Value>) -> Result<StoredDocument, DatabaseError>;

    /// Shallow-merge `patch` into the body. `None` when no live document has `id`.
    async fn update(&self, collection: &str, id: &DocumentId, patch: Map<String, Value>) -> Result<Option<StoredDocument>, DatabaseError>;

    /// Remove the document. Returns what was removed.
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, DatabaseError>;

    /// Flag the document as deleted. Returns the flagged document.
    async fn soft_delete(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, DatabaseError>;

    /// Release connections on shutdown.
    async fn close(&self) {}
}

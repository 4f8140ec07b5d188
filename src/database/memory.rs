use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use crate::database::manager::DatabaseError;
use crate::database::store::{DocumentStore, StoredDocument};
use crate::filter::{Filter, Scope};
use crate::id::DocumentId;

type Collection = BTreeMap<DocumentId, StoredDocument>;

/// Process-local document store. Collections are ordered by identifier so
/// listings come back in creation order, as they do from Postgres.
#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Collection>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_name(collection: &str) -> Result<(), DatabaseError> {
        Filter::validate_table_name(collection).map_err(|_| DatabaseError::InvalidCollection(collection.to_string()))
    }

    fn in_scope(doc: &StoredDocument, scope: Scope) -> bool {
        scope.includes_deleted() || !doc.is_deleted()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }

    async fn ensure_collection(&self, collection: &str) -> Result<(), DatabaseError> {
        Self::check_name(collection)?;
        self.collections.write().await.entry(collection.to_string()).or_default();
        Ok(())
    }

    async fn find(&self, collection: &str, filter: &Filter, scope: Scope) -> Result<Vec<StoredDocument>, DatabaseError> {
        Self::check_name(collection)?;
        let collections = self.collections.read().await;
        let docs = collections
            .get(collection)
            .map(|docs| {
                docs.values()
                    .filter(|doc| Self::in_scope(doc, scope) && filter.matches(&doc.id, &doc.body))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        Ok(docs)
    }

    async fn find_by_id(&self, collection: &str, id: &DocumentId, scope: Scope) -> Result<Option<StoredDocument>, DatabaseError> {
        Self::check_name(collection)?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(id))
            .filter(|doc| Self::in_scope(doc, scope))
            .cloned())
    }

    async fn find_by_ids(&self, collection: &str, ids: &[DocumentId], scope: Scope) -> Result<Vec<StoredDocument>, DatabaseError> {
        Self::check_name(collection)?;
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(vec![]);
        };
        Ok(docs
            .values()
            .filter(|doc| ids.contains(&doc.id) && Self::in_scope(doc, scope))
            .cloned()
            .collect())
    }

    async fn insert(&self, collection: &str, id: DocumentId, body: Map<String, Value>) -> Result<StoredDocument, DatabaseError> {
        Self::check_name(collection)?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(&id) {
            return Err(DatabaseError::DuplicateId {
                collection: collection.to_string(),
                id: id.to_hex(),
            });
        }
        let now = Utc::now();
        let doc = StoredDocument {
            id,
            body,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        docs.insert(id, doc.clone());
        Ok(doc)
    }

    async fn update(&self, collection: &str, id: &DocumentId, patch: Map<String, Value>) -> Result<Option<StoredDocument>, DatabaseError> {
        Self::check_name(collection)?;
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .filter(|doc| !doc.is_deleted())
        else {
            return Ok(None);
        };
        doc.body.extend(patch);
        doc.updated_at = Utc::now();
        Ok(Some(doc.clone()))
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, DatabaseError> {
        Self::check_name(collection)?;
        let mut collections = self.collections.write().await;
        Ok(collections.get_mut(collection).and_then(|docs| docs.remove(id)))
    }

    async fn soft_delete(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, DatabaseError> {
        Self::check_name(collection)?;
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .filter(|doc| !doc.is_deleted())
        else {
            return Ok(None);
        };
        doc.deleted_at = Some(Utc::now());
        Ok(Some(doc.clone()))
    }
}

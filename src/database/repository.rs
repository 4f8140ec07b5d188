use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::store::DocumentStore;
use crate::filter::{Filter, Scope};
use crate::id::DocumentId;
use crate::model::{Entity, Record};

/// Typed data-access facade over one collection.
pub struct Repository<T> {
    store: Arc<dyn DocumentStore>,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _phantom: std::marker::PhantomData,
        }
    }

    pub async fn find_by_id(&self, id: &DocumentId) -> Result<Option<Record<T>>, DatabaseError> {
        debug!("{}: find_by_id {}", T::COLLECTION, id);
        self.store
            .find_by_id(T::COLLECTION, id, Scope::Live)
            .await?
            .map(Record::try_from)
            .transpose()
    }

    /// Live documents matching `filter`, in creation order.
    pub async fn find(&self, filter: &Filter) -> Result<Vec<Record<T>>, DatabaseError> {
        self.select(filter, Scope::Live).await
    }

    /// Like `find`, but soft-deleted documents are included.
    pub async fn find_with_deleted(&self, filter: &Filter) -> Result<Vec<Record<T>>, DatabaseError> {
        self.select(filter, Scope::WithDeleted).await
    }

    /// Batch lookup keyed by id, soft-deleted documents included. Used to resolve references.
    pub async fn find_by_ids_with_deleted(&self, ids: &[DocumentId]) -> Result<HashMap<DocumentId, Record<T>>, DatabaseError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        debug!("{}: find_by_ids ({} ids)", T::COLLECTION, ids.len());
        self.store
            .find_by_ids(T::COLLECTION, ids, Scope::WithDeleted)
            .await?
            .into_iter()
            .map(|doc| Record::try_from(doc).map(|record: Record<T>| (record.id, record)))
            .collect()
    }

    pub async fn create(&self, body: &T) -> Result<Record<T>, DatabaseError> {
        let id = DocumentId::new();
        debug!("{}: create {}", T::COLLECTION, id);
        let doc = self.store.insert(T::COLLECTION, id, Self::to_object(body)?).await?;
        Record::try_from(doc)
    }

    /// Merge the fields present in `patch` into the live document `id`.
    pub async fn update<P: Serialize>(&self, id: &DocumentId, patch: &P) -> Result<Option<Record<T>>, DatabaseError> {
        debug!("{}: update {}", T::COLLECTION, id);
        let fields: Map<String, Value> = Self::to_object(patch)?
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .collect();
        self.store
            .update(T::COLLECTION, id, fields)
            .await?
            .map(Record::try_from)
            .transpose()
    }

    /// Hard delete, or soft delete for entities that keep their history.
    pub async fn delete_by_id(&self, id: &DocumentId) -> Result<Option<Record<T>>, DatabaseError> {
        debug!("{}: delete {} (soft: {})", T::COLLECTION, id, T::SOFT_DELETE);
        let removed = if T::SOFT_DELETE {
            self.store.soft_delete(T::COLLECTION, id).await?
        } else {
            self.store.delete(T::COLLECTION, id).await?
        };
        removed.map(Record::try_from).transpose()
    }

    async fn select(&self, filter: &Filter, scope: Scope) -> Result<Vec<Record<T>>, DatabaseError> {
        debug!("{}: find {:?} ({:?})", T::COLLECTION, filter.conditions(), scope);
        self.store
            .find(T::COLLECTION, filter, scope)
            .await?
            .into_iter()
            .map(Record::try_from)
            .collect()
    }

    fn to_object<S: Serialize>(value: &S) -> Result<Map<String, Value>, DatabaseError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(map),
            other => Err(DatabaseError::invalid_document(T::COLLECTION, format!("expected an object, got {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryDocumentStore;
    use crate::model::{Employee, EmployeePatch, Project, Task, TaskKind};
    use chrono::NaiveDate;

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(MemoryDocumentStore::new())
    }

    fn employee(name: &str) -> Employee {
        Employee {
            name: name.into(),
            last_name: "B".into(),
            phone: "1".into(),
            email: "a@b.com".into(),
            password: "p".into(),
        }
    }

    #[tokio::test]
    async fn create_assigns_id_and_round_trips() {
        let repo = Repository::<Employee>::new(store());
        let created = repo.create(&employee("A")).await.unwrap();
        let found = repo.find_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert_eq!(found.body, employee("A"));
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let repo = Repository::<Employee>::new(store());
        let created = repo.create(&employee("A")).await.unwrap();

        let patch = EmployeePatch { phone: Some("555".into()), ..Default::default() };
        let updated = repo.update(&created.id, &patch).await.unwrap().unwrap();
        assert_eq!(updated.body.phone, "555");
        assert_eq!(updated.body.name, "A");
        assert_eq!(updated.body.email, "a@b.com");

        assert!(repo.update(&DocumentId::new(), &patch).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn filters_on_exact_field_values() {
        let repo = Repository::<Employee>::new(store());
        repo.create(&employee("A")).await.unwrap();
        let b = repo.create(&employee("B")).await.unwrap();

        let filter = Filter::all().equals("name", "B").unwrap();
        let found = repo.find(&filter).await.unwrap();
        assert_eq!(found, vec![b]);
        assert_eq!(repo.find(&Filter::all()).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn hard_delete_for_plain_entities() {
        let shared = store();
        let repo = Repository::<Task>::new(shared.clone());
        let task = repo.create(&Task { description: TaskKind::Backend }).await.unwrap();

        assert!(repo.delete_by_id(&task.id).await.unwrap().is_some());
        assert!(repo.delete_by_id(&task.id).await.unwrap().is_none());
        assert!(shared.find_by_id("tasks", &task.id, Scope::WithDeleted).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn soft_delete_for_projects() {
        let repo = Repository::<Project>::new(store());
        let project = repo
            .create(&Project {
                name: "P".into(),
                description: "D".into(),
                start_date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
                end_date: None,
                client_name: "C".into(),
                employees: vec![],
            })
            .await
            .unwrap();

        let removed = repo.delete_by_id(&project.id).await.unwrap().unwrap();
        assert!(removed.deleted_at.is_some());
        assert!(repo.find_by_id(&project.id).await.unwrap().is_none());
        assert!(repo.find(&Filter::all()).await.unwrap().is_empty());

        let with_deleted = repo.find_with_deleted(&Filter::all()).await.unwrap();
        assert_eq!(with_deleted.len(), 1);
        assert!(with_deleted[0].deleted_at.is_some());

        let by_id = repo.find_by_ids_with_deleted(&[project.id]).await.unwrap();
        assert!(by_id.contains_key(&project.id));
    }

    #[tokio::test]
    async fn corrupt_documents_surface_as_invalid() {
        let shared = store();
        shared
            .insert("tasks", DocumentId::new(), serde_json::json!({ "description": "QA" }).as_object().cloned().unwrap())
            .await
            .unwrap();
        let err = Repository::<Task>::new(shared).find(&Filter::all()).await.unwrap_err();
        assert!(matches!(err, DatabaseError::InvalidDocument { .. }));
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::{debug, info};

use crate::database::manager::DatabaseError;
use crate::database::store::{DocumentStore, StoredDocument};
use crate::filter::filter::DOCUMENT_COLUMNS;
use crate::filter::{Filter, Scope, SqlParam};
use crate::id::DocumentId;

/// Document store on PostgreSQL: one table per collection with the body in a JSONB
/// column and soft deletion tracked in `deleted_at`.
pub struct PgDocumentStore {
    pool: PgPool,
}

#[derive(Debug, FromRow)]
struct DocumentRow {
    id: String,
    doc: Json<Map<String, Value>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<DocumentRow> for StoredDocument {
    type Error = DatabaseError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        let id = DocumentId::parse(row.id.trim())
            .map_err(|e| DatabaseError::invalid_document("row", e))?;
        Ok(StoredDocument {
            id,
            body: row.doc.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
        })
    }
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn table(collection: &str) -> Result<String, DatabaseError> {
        Filter::validate_table_name(collection).map_err(|_| DatabaseError::InvalidCollection(collection.to_string()))?;
        Ok(format!("\"{}\"", collection))
    }

    fn rows_to_documents(rows: Vec<DocumentRow>) -> Result<Vec<StoredDocument>, DatabaseError> {
        rows.into_iter().map(StoredDocument::try_from).collect()
    }

    async fn fetch_optional(&self, sql: &str, id: &DocumentId, body: Option<Map<String, Value>>) -> Result<Option<StoredDocument>, DatabaseError> {
        let mut q = sqlx::query_as::<_, DocumentRow>(sql).bind(id.to_hex());
        if let Some(body) = body {
            q = q.bind(Json(body));
        }
        q.fetch_optional(&self.pool).await?.map(StoredDocument::try_from).transpose()
    }
}

fn bind_param<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    param: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, PgRow>,
{
    match param {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Json(v) => q.bind(Json(v)),
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn ensure_collection(&self, collection: &str) -> Result<(), DatabaseError> {
        let table = Self::table(collection)?;
        let create = format!(
            "CREATE TABLE IF NOT EXISTS {} (
                \"id\" VARCHAR(24) PRIMARY KEY,
                \"doc\" JSONB NOT NULL,
                \"created_at\" TIMESTAMPTZ NOT NULL DEFAULT now(),
                \"updated_at\" TIMESTAMPTZ NOT NULL DEFAULT now(),
                \"deleted_at\" TIMESTAMPTZ
            )",
            table
        );
        sqlx::query(&create).execute(&self.pool).await?;

        let index = format!(
            "CREATE INDEX IF NOT EXISTS \"{}_doc_idx\" ON {} USING GIN (\"doc\" jsonb_path_ops)",
            collection, table
        );
        sqlx::query(&index).execute(&self.pool).await?;

        info!("Ensured collection table: {}", collection);
        Ok(())
    }

    async fn find(&self, collection: &str, filter: &Filter, scope: Scope) -> Result<Vec<StoredDocument>, DatabaseError> {
        Self::table(collection)?;
        let sql_result = filter.to_sql(collection, scope)?;
        debug!("find {}: {}", collection, sql_result.query);

        let mut q = sqlx::query_as::<_, DocumentRow>(&sql_result.query);
        for p in sql_result.params.iter() {
            q = bind_param(q, p);
        }
        let rows = q.fetch_all(&self.pool).await?;
        Self::rows_to_documents(rows)
    }

    async fn find_by_id(&self, collection: &str, id: &DocumentId, scope: Scope) -> Result<Option<StoredDocument>, DatabaseError> {
        let table = Self::table(collection)?;
        let deleted_clause = if scope.includes_deleted() { "" } else { " AND \"deleted_at\" IS NULL" };
        let sql = format!("SELECT {} FROM {} WHERE \"id\" = $1{}", DOCUMENT_COLUMNS, table, deleted_clause);
        self.fetch_optional(&sql, id, None).await
    }

    async fn find_by_ids(&self, collection: &str, ids: &[DocumentId], scope: Scope) -> Result<Vec<StoredDocument>, DatabaseError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let table = Self::table(collection)?;
        let deleted_clause = if scope.includes_deleted() { "" } else { " AND \"deleted_at\" IS NULL" };
        let sql = format!(
            "SELECT {} FROM {} WHERE \"id\" = ANY($1){} ORDER BY \"id\" ASC",
            DOCUMENT_COLUMNS, table, deleted_clause
        );
        let hex_ids: Vec<String> = ids.iter().map(DocumentId::to_hex).collect();
        let rows = sqlx::query_as::<_, DocumentRow>(&sql).bind(hex_ids).fetch_all(&self.pool).await?;
        Self::rows_to_documents(rows)
    }

    async fn insert(&self, collection: &str, id: DocumentId, body: Map<String, Value>) -> Result<StoredDocument, DatabaseError> {
        let table = Self::table(collection)?;
        let sql = format!(
            "INSERT INTO {} (\"id\", \"doc\") VALUES ($1, $2::jsonb) RETURNING {}",
            table, DOCUMENT_COLUMNS
        );
        match sqlx::query_as::<_, DocumentRow>(&sql)
            .bind(id.to_hex())
            .bind(Json(body))
            .fetch_one(&self.pool)
            .await
        {
            Ok(row) => row.try_into(),
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => Err(DatabaseError::DuplicateId {
                collection: collection.to_string(),
                id: id.to_hex(),
            }),
            Err(other) => Err(other.into()),
        }
    }

    async fn update(&self, collection: &str, id: &DocumentId, patch: Map<String, Value>) -> Result<Option<StoredDocument>, DatabaseError> {
        let table = Self::table(collection)?;
        let sql = format!(
            "UPDATE {} SET \"doc\" = \"doc\" || $2::jsonb, \"updated_at\" = now() \
             WHERE \"id\" = $1 AND \"deleted_at\" IS NULL RETURNING {}",
            table, DOCUMENT_COLUMNS
        );
        self.fetch_optional(&sql, id, Some(patch)).await
    }

    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, DatabaseError> {
        let table = Self::table(collection)?;
        let sql = format!("DELETE FROM {} WHERE \"id\" = $1 RETURNING {}", table, DOCUMENT_COLUMNS);
        self.fetch_optional(&sql, id, None).await
    }

    async fn soft_delete(&self, collection: &str, id: &DocumentId) -> Result<Option<StoredDocument>, DatabaseError> {
        let table = Self::table(collection)?;
        let sql = format!(
            "UPDATE {} SET \"deleted_at\" = now(), \"updated_at\" = now() \
             WHERE \"id\" = $1 AND \"deleted_at\" IS NULL RETURNING {}",
            table, DOCUMENT_COLUMNS
        );
        self.fetch_optional(&sql, id, None).await
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}

use std::path::Path;

use anyhow::Context;
use serde_json::{json, Map, Value};

use crate::cli::utils::{output_success, require_persistent_store};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::{DatabaseManager, DocumentStore};
use crate::filter::ID_FIELD;
use crate::id::DocumentId;
use crate::model;

pub async fn handle(collection: &str, file: &Path, output_format: OutputFormat) -> anyhow::Result<()> {
    if !model::COLLECTIONS.contains(&collection) {
        anyhow::bail!("unknown collection '{}' (expected one of: {})", collection, model::COLLECTIONS.join(", "));
    }

    require_persistent_store(&config().database, "seed")?;

    let raw = std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;
    let documents = parse_fixture(file, &raw)?;

    let store = DatabaseManager::connect(&config().database).await?;
    DatabaseManager::migrate(store.as_ref()).await?;
    let inserted = seed_documents(store.as_ref(), collection, documents).await;
    store.close().await;
    let inserted = inserted?;

    output_success(
        output_format,
        &format!("Seeded {} documents into {}", inserted.len(), collection),
        Some(json!({ "collection": collection, "ids": inserted })),
    )
}

/// A fixture is a single document or an array of documents.
pub fn parse_fixture(file: &Path, raw: &str) -> anyhow::Result<Vec<Map<String, Value>>> {
    let value: Value = match file.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(raw).context("invalid YAML fixture")?,
        _ => serde_json::from_str(raw).context("invalid JSON fixture")?,
    };

    let items = match value {
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        other => anyhow::bail!("fixture must be an object or an array of objects, got {}", other),
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!("fixture entry {} is not an object: {}", index, other),
        })
        .collect()
}

/// Validate then insert each document, keeping a preset `_id` when present.
pub async fn seed_documents(
    store: &dyn DocumentStore,
    collection: &str,
    documents: Vec<Map<String, Value>>,
) -> anyhow::Result<Vec<DocumentId>> {
    let mut inserted = Vec::with_capacity(documents.len());

    for (index, mut body) in documents.into_iter().enumerate() {
        let id = match body.remove(ID_FIELD) {
            Some(Value::String(hex)) => DocumentId::parse(&hex).with_context(|| format!("fixture entry {}", index))?,
            Some(other) => anyhow::bail!("fixture entry {}: _id must be a string, got {}", index, other),
            None => DocumentId::new(),
        };
        model::validate_document(collection, &body).with_context(|| format!("fixture entry {}", index))?;

        store.insert(collection, id, body).await?;
        tracing::debug!("seeded {}/{}", collection, id);
        inserted.push(id);
    }

    Ok(inserted)
}

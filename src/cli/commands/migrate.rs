use serde_json::json;

use crate::cli::utils::{output_success, require_persistent_store};
use crate::cli::OutputFormat;
use crate::config::config;
use crate::database::DatabaseManager;
use crate::model;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    require_persistent_store(&config().database, "migrate")?;

    let store = DatabaseManager::connect(&config().database).await?;
    DatabaseManager::migrate(store.as_ref()).await?;
    let backend = store.backend();
    store.close().await;

    output_success(
        output_format,
        &format!("Migrated {} collections on {} store", model::COLLECTIONS.len(), backend),
        Some(json!({ "backend": backend, "collections": model::COLLECTIONS })),
    )
}

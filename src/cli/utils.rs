use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config::{DatabaseConfig, StoreBackend};

/// Writing commands are pointless against the in-memory store: it is gone when
/// the process exits.
pub fn require_persistent_store(database: &DatabaseConfig, command: &str) -> anyhow::Result<()> {
    if database.backend == StoreBackend::Memory {
        anyhow::bail!(
            "{} requires STORE_BACKEND=postgres (set DATABASE_URL); the in-memory store does not outlive this command",
            command
        );
    }
    Ok(())
}

/// Output a success message in the appropriate format
pub fn output_success(output_format: OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(data_value) = data {
                response["data"] = data_value;
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output a list of names, one per line in text mode
pub fn output_list(output_format: OutputFormat, key: &str, items: &[&str]) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&json!({ key: items }))?);
        }
        OutputFormat::Text => {
            for item in items {
                println!("{}", item);
            }
        }
    }
    Ok(())
}

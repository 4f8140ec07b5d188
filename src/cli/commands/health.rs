use anyhow::Context;
use serde_json::Value;

use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::config;

pub async fn handle(url: Option<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let base_url = url.unwrap_or_else(|| format!("http://127.0.0.1:{}", config().api.port));
    let endpoint = format!("{}/health", base_url.trim_end_matches('/'));

    let response = reqwest::get(&endpoint)
        .await
        .with_context(|| format!("failed to reach {}", endpoint))?;
    let status = response.status();
    let body: Value = response.json().await.context("health endpoint returned invalid JSON")?;

    if !status.is_success() {
        anyhow::bail!("{} is unhealthy ({}): {}", base_url, status, body["message"]);
    }

    output_success(output_format, &format!("{} is healthy", base_url), body.get("data").cloned())
}

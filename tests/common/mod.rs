#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use hr_tracker_api::{app, config::AppConfig, database::MemoryDocumentStore, AppState};
use reqwest::StatusCode;
use serde_json::Value;

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Serve a fresh router backed by an empty in-memory store on an unused port.
pub async fn spawn_server() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);

    let mut config = AppConfig::development();
    config.api.port = port;
    config.api.enable_request_logging = false;

    let state = AppState::new(Arc::new(MemoryDocumentStore::new()));
    let router = app(state, &config);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .with_context(|| format!("failed to bind port {}", port))?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    let server = TestServer {
        port,
        base_url,
        client: reqwest::Client::new(),
    };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// POST a body and return the new document's `_id`.
pub async fn create(server: &TestServer, path: &str, body: Value) -> Result<String> {
    let res = server.client.post(server.url(path)).json(&body).send().await?;
    let status = res.status();
    let json: Value = res.json().await?;
    anyhow::ensure!(status == StatusCode::CREATED, "create {} failed with {}: {}", path, status, json);
    json["data"]["_id"]
        .as_str()
        .map(str::to_string)
        .with_context(|| format!("missing data._id: {}", json))
}

/// A well-formed id that no document has.
pub const UNASSIGNED_ID: &str = "63533d49fc13ae16b7000000";

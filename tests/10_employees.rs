mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn employee() -> Value {
    json!({
        "name": "Ada",
        "lastName": "Lovelace",
        "phone": "1234567890",
        "email": "ada@example.com",
        "password": "analytical1"
    })
}

#[tokio::test]
async fn create_get_delete_scenario() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.post(server.url("/api/employees")).json(&employee()).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Employee created successfully");
    assert_eq!(body["error"], false);
    let id = body["data"]["_id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let res = server.client.get(server.url(&format!("/api/employees/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Employee with id:{} found", id));
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["lastName"], "Lovelace");

    let res = server.client.delete(server.url(&format!("/api/employees/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.bytes().await?.is_empty());

    // A missing employee on get is reported as a server error.
    let res = server.client.get(server.url(&format!("/api/employees/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert!(body["message"].as_str().unwrap().starts_with("Server Error"));
    assert_eq!(body["error"], true);

    Ok(())
}

#[tokio::test]
async fn partial_update_keeps_other_fields() -> Result<()> {
    let server = common::spawn_server().await?;
    let id = common::create(&server, "/api/employees", employee()).await?;

    let res = server
        .client
        .put(server.url(&format!("/api/employees/{}", id)))
        .json(&json!({ "phone": "555" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Employee with id:{} updated successfully", id));
    assert_eq!(body["data"]["phone"], "555");
    assert_eq!(body["data"]["name"], "Ada");
    assert_eq!(body["data"]["email"], "ada@example.com");

    Ok(())
}

#[tokio::test]
async fn unassigned_ids_on_writes_are_404() -> Result<()> {
    let server = common::spawn_server().await?;
    let url = server.url(&format!("/api/employees/{}", common::UNASSIGNED_ID));

    let res = server.client.put(&url).json(&json!({ "phone": "1" })).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Employee with id:{} not found", common::UNASSIGNED_ID));

    let res = server.client.delete(&url).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn list_filters_by_query() -> Result<()> {
    let server = common::spawn_server().await?;
    common::create(&server, "/api/employees", employee()).await?;
    let mut other = employee();
    other["name"] = json!("Grace");
    let grace = common::create(&server, "/api/employees", other).await?;

    let body: Value = server.client.get(server.url("/api/employees")).send().await?.json().await?;
    assert_eq!(body["message"], "Employees found");
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let body: Value = server
        .client
        .get(server.url("/api/employees?name=Grace"))
        .send()
        .await?
        .json()
        .await?;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["_id"], grace);

    let res = server.client.get(server.url("/api/employees?na.me=x")).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

#[tokio::test]
async fn incomplete_payload_is_a_server_error() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/api/employees"))
        .json(&json!({ "name": "Ada" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);

    Ok(())
}

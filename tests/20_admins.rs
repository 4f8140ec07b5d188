mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

fn admin() -> Value {
    json!({
        "name": "Carlitos",
        "lastName": "Bala",
        "email": "calibala@example.com",
        "password": "chuchugua1"
    })
}

#[tokio::test]
async fn empty_list_is_404() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.get(server.url("/api/admins")).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Admin not found");

    Ok(())
}

#[tokio::test]
async fn unassigned_id_get_scenario() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .get(server.url(&format!("/api/admins/{}", common::UNASSIGNED_ID)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert!(body["message"].as_str().unwrap().starts_with("Something was wrong:"), "{}", body);
    // Catch-path bodies carry only the message
    assert!(body.get("error").is_none(), "{}", body);

    Ok(())
}

#[tokio::test]
async fn create_list_update_delete() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server.client.post(server.url("/api/admins")).json(&admin()).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Admin created");
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let body: Value = server.client.get(server.url("/api/admins")).send().await?.json().await?;
    assert_eq!(body["message"], "Admins found");
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let body: Value = server
        .client
        .get(server.url(&format!("/api/admins/{}", id)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["message"], "Admin Found");

    let res = server
        .client
        .put(server.url(&format!("/api/admins/{}", id)))
        .json(&json!({ "lastName": "Balita" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Admin with id {} found and successfully edited!", id));
    assert_eq!(body["data"]["lastName"], "Balita");
    assert_eq!(body["data"]["name"], "Carlitos");

    let res = server.client.delete(server.url(&format!("/api/admins/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.client.delete(server.url(&format!("/api/admins/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Something was wrong: ID doesnt match with a valid admin!");
    assert_eq!(body["error"], true);

    Ok(())
}

#[tokio::test]
async fn invalid_payloads_are_not_acceptable() -> Result<()> {
    let server = common::spawn_server().await?;

    let mut bad = admin();
    bad["password"] = json!("AmAzInG-password-123");
    let res = server.client.post(server.url("/api/admins")).json(&bad).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], true);

    let res = server
        .client
        .post(server.url("/api/admins"))
        .json(&json!({ "name": "Carlitos" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);

    let id = common::create(&server, "/api/admins", admin()).await?;
    let res = server
        .client
        .put(server.url(&format!("/api/admins/{}", id)))
        .json(&json!({ "email": "----" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_ACCEPTABLE);

    Ok(())
}

#[tokio::test]
async fn update_of_unassigned_id_is_404() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .put(server.url(&format!("/api/admins/{}", common::UNASSIGNED_ID)))
        .json(&json!({ "name": "Someone" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Admin with {} dont exist on DB.", common::UNASSIGNED_ID));
    assert_eq!(body["error"], true);

    Ok(())
}

mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

async fn employee(server: &common::TestServer, name: &str) -> Result<String> {
    common::create(
        server,
        "/api/employees",
        json!({ "name": name, "lastName": "L", "phone": "1", "email": "e@example.com", "password": "secret123" }),
    )
    .await
}

fn project(employees: &[&str]) -> Value {
    json!({
        "name": "Trackr",
        "description": "Time tracking",
        "startDate": "2022-10-01",
        "endDate": "2022-12-31",
        "clientName": "ACME",
        "employees": employees.iter().map(|id| json!({ "employee": id })).collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn reads_populate_assignments() -> Result<()> {
    let server = common::spawn_server().await?;
    let ada = employee(&server, "Ada").await?;

    let res = server.client.post(server.url("/api/projects")).json(&project(&[&ada])).send().await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Project created successfully");
    let id = body["data"]["_id"].as_str().unwrap().to_string();

    let res = server.client.get(server.url(&format!("/api/projects/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Project found");
    assert_eq!(body["data"]["startDate"], "2022-10-01");
    assert_eq!(body["data"]["employees"][0]["employee"]["_id"], ada);
    assert_eq!(body["data"]["employees"][0]["employee"]["name"], "Ada");

    let body: Value = server.client.get(server.url("/api/projects")).send().await?.json().await?;
    assert_eq!(body["message"], "Projects list");
    assert_eq!(body["data"][0]["employees"][0]["employee"]["name"], "Ada");

    Ok(())
}

#[tokio::test]
async fn soft_delete_hides_from_default_reads() -> Result<()> {
    let server = common::spawn_server().await?;
    let id = common::create(&server, "/api/projects", project(&[])).await?;

    let res = server.client.delete(server.url(&format!("/api/projects/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = server.client.get(server.url(&format!("/api/projects/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Project with id {} not found", id));

    let body: Value = server.client.get(server.url("/api/projects")).send().await?.json().await?;
    assert!(body["data"].as_array().unwrap().is_empty());

    let body: Value = server
        .client
        .get(server.url("/api/projects/withDeleted"))
        .send()
        .await?
        .json()
        .await?;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["_id"], id);
    assert!(data[0]["deletedAt"].is_string());

    // Deleted projects cannot be edited or deleted again.
    let res = server
        .client
        .put(server.url(&format!("/api/projects/{}", id)))
        .json(&json!({ "name": "Renamed" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = server.client.delete(server.url(&format!("/api/projects/{}", id))).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn partial_update() -> Result<()> {
    let server = common::spawn_server().await?;
    let id = common::create(&server, "/api/projects", project(&[])).await?;

    let res = server
        .client
        .put(server.url(&format!("/api/projects/{}", id)))
        .json(&json!({ "clientName": "Globex" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Project with id {} updated successfully", id));
    assert_eq!(body["data"]["clientName"], "Globex");
    assert_eq!(body["data"]["name"], "Trackr");

    let res = server
        .client
        .put(server.url(&format!("/api/projects/{}", common::UNASSIGNED_ID)))
        .json(&json!({ "clientName": "Globex" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], format!("Project with id:{} not found", common::UNASSIGNED_ID));

    Ok(())
}

#[tokio::test]
async fn by_employee_matches_assignments() -> Result<()> {
    let server = common::spawn_server().await?;
    let ada = employee(&server, "Ada").await?;
    let bob = employee(&server, "Bob").await?;

    let both = common::create(&server, "/api/projects", project(&[&ada, &bob])).await?;
    common::create(&server, "/api/projects", project(&[&bob])).await?;

    let res = server
        .client
        .get(server.url(&format!("/api/projects/byEmployee/{}", ada)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["message"], "Projects found");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["_id"], both);

    let body: Value = server
        .client
        .get(server.url(&format!("/api/projects/byEmployee/{}", bob)))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    Ok(())
}

#[tokio::test]
async fn malformed_payload_is_a_server_error() -> Result<()> {
    let server = common::spawn_server().await?;

    let mut bad = project(&[]);
    bad["startDate"] = json!("yesterday");
    let res = server.client.post(server.url("/api/projects")).json(&bad).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await?;
    assert!(body["message"].as_str().unwrap().starts_with("Server Error"));

    Ok(())
}

#[tokio::test]
async fn list_filters_on_dotted_paths() -> Result<()> {
    let server = common::spawn_server().await?;
    let ada = employee(&server, "Ada").await?;
    let bob = employee(&server, "Bob").await?;
    let with_ada = common::create(&server, "/api/projects", project(&[&bob, &ada])).await?;
    common::create(&server, "/api/projects", project(&[&bob])).await?;

    let res = server
        .client
        .get(server.url(&format!("/api/projects?employees.employee={}", ada)))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["_id"], with_ada);

    let res = server.client.get(server.url("/api/projects?employees..employee=x")).send().await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    Ok(())
}

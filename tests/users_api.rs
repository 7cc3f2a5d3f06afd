//! End-to-end HTTP tests: router, layers and PostgreSQL together.

mod common;

use anyhow::Result;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use common::TestDb;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app(db: &TestDb) -> Result<Router> {
    userdir::api::app(db.pool.clone(), "http://localhost:3000")
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> Result<(StatusCode, Value)> {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(body) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(body.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body)?).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;

    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn empty_table_lists_empty_array() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    let app = app(&db)?;

    let (status, body) = send(&app, Method::GET, "/users", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    db.close().await
}

#[tokio::test]
async fn get_non_existent_user() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    let app = app(&db)?;

    let (status, body) = send(&app, Method::GET, "/users/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"error": "User not found"}));

    db.close().await
}

#[tokio::test]
async fn create_user() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    let app = app(&db)?;

    let (status, body) = send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"name": "Test User", "email": "email@example.com"})),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        body,
        json!({"id": 1, "name": "Test User", "email": "email@example.com"})
    );

    db.close().await
}

#[tokio::test]
async fn create_duplicate_email_is_server_error() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    let app = app(&db)?;
    let payload = json!({"name": "Test User", "email": "email@example.com"});

    let (status, _) = send(&app, Method::POST, "/users", Some(payload.clone())).await?;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, Method::POST, "/users", Some(payload)).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));

    db.close().await
}

#[tokio::test]
async fn update_duplicate_email_is_server_error() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    db.add_users(2).await?;
    let app = app(&db)?;
    let payload = json!({"name": "User 1", "email": "user0@example.com"});

    let (status, body) = send(&app, Method::PUT, "/users/2", Some(payload)).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().is_some_and(|msg| !msg.is_empty()));

    let (status, body) = send(&app, Method::GET, "/users/2", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "user1@example.com");

    db.close().await
}

#[tokio::test]
async fn get_user() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    db.add_users(1).await?;
    let app = app(&db)?;

    let (status, body) = send(&app, Method::GET, "/users/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"id": 1, "name": "User 0", "email": "user0@example.com"})
    );

    db.close().await
}

#[tokio::test]
async fn update_user() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    db.add_users(1).await?;
    let app = app(&db)?;

    let (_, original) = send(&app, Method::GET, "/users/1", None).await?;

    let (status, body) = send(
        &app,
        Method::PUT,
        "/users/1",
        Some(json!({"name": "Test User - updated name", "email": "updated_email@example.com"})),
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], original["id"]);
    assert_eq!(body["name"], "Test User - updated name");
    assert_eq!(body["email"], "updated_email@example.com");

    let (status, stored) = send(&app, Method::GET, "/users/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored, body);

    db.close().await
}

#[tokio::test]
async fn delete_user() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    db.add_users(1).await?;
    let app = app(&db)?;

    let (status, _) = send(&app, Method::GET, "/users/1", None).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::DELETE, "/users/1", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"result": "success"}));

    let (status, _) = send(&app, Method::GET, "/users/1", None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);

    db.close().await
}

#[tokio::test]
async fn list_paginates_and_clamps_count() -> Result<()> {
    let Some(db) = TestDb::new().await? else {
        return Ok(());
    };
    db.add_users(15).await?;
    let app = app(&db)?;

    let (status, first) = send(&app, Method::GET, "/users?count=10&start=0", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first.as_array().map(Vec::len), Some(10));

    let (_, rest) = send(&app, Method::GET, "/users?count=10&start=10", None).await?;
    assert_eq!(rest.as_array().map(Vec::len), Some(5));

    let (_, clamped) = send(&app, Method::GET, "/users?count=50", None).await?;
    assert_eq!(clamped.as_array().map(Vec::len), Some(10));

    let (_, small) = send(&app, Method::GET, "/users?count=3&start=-4", None).await?;
    assert_eq!(small.as_array().map(Vec::len), Some(3));

    let (status, garbage) = send(&app, Method::GET, "/users?count=abc&start=xyz", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(garbage.as_array().map(Vec::len), Some(10));

    db.close().await
}

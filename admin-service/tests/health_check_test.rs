//! Health endpoint integration tests.

mod common;

use common::TestApp;

#[tokio::test]
async fn health_check_returns_ok() {
    let app = TestApp::spawn().await.expect("failed to spawn test app");

    let response = app
        .client()
        .get(app.url("/health"))
        .send()
        .await
        .expect("failed to execute request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert_eq!(body["ok"], true);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::spawn().await.expect("failed to spawn test app");

    let response = app
        .client()
        .get(app.url("/.well-known/openapi.json"))
        .send()
        .await
        .expect("failed to execute request");

    assert_eq!(response.status(), 200);
    let body: serde_json::Value = response.json().await.expect("failed to parse response");
    assert!(body["paths"]["/api/users"].is_object());
}

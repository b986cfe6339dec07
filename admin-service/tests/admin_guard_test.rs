//! Access guard integration tests - forwarded-header authorization.

mod common;

use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn admin_routes_deny_requests_without_group_headers() {
    let app = TestApp::spawn().await.expect("failed to spawn test app");
    let client = app.client();

    let list = client.get(app.url("/api/users")).send().await.unwrap();
    assert_eq!(list.status(), 403);

    let create = client
        .post(app.url("/api/users"))
        .json(&json!({"username": "alice", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(create.status(), 403);

    let update = client
        .put(app.url("/api/users/alice"))
        .json(&json!({"displayname": "Alice"}))
        .send()
        .await
        .unwrap();
    assert_eq!(update.status(), 403);

    let password = client
        .post(app.url("/api/users/alice/password"))
        .json(&json!({"password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(password.status(), 403);

    let delete = client.delete(app.url("/api/users/alice")).send().await.unwrap();
    assert_eq!(delete.status(), 403);

    let invite = client
        .post(app.url("/api/invite"))
        .json(&json!({"email": "bob@example.com"}))
        .send()
        .await
        .unwrap();
    assert_eq!(invite.status(), 403);
}

#[tokio::test]
async fn non_admin_groups_are_denied() {
    let app = TestApp::spawn().await.expect("failed to spawn test app");

    let response = app
        .client()
        .get(app.url("/api/users"))
        .header("Remote-Groups", "users,dev")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("administrator"));
}

#[tokio::test]
async fn alias_group_header_is_honored() {
    let app = TestApp::spawn().await.expect("failed to spawn test app");

    let response = app
        .client()
        .get(app.url("/api/users"))
        .header("X-Forwarded-Groups", "admins")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn canonical_header_shadows_alias_headers() {
    let app = TestApp::spawn().await.expect("failed to spawn test app");

    // a proxy that sets the canonical header wins even when a stale alias
    // claims more privilege
    let response = app
        .client()
        .get(app.url("/api/users"))
        .header("Remote-Groups", "users")
        .header("X-Forwarded-Groups", "admins")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
}

#[tokio::test]
async fn public_routes_stay_open() {
    let app = TestApp::spawn().await.expect("failed to spawn test app");
    let client = app.client();

    let health = client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);

    // the acceptance path must work without any forwarded identity; a bad
    // token is a 400, never a 403
    let accept = client
        .post(app.url("/api/invite/accept"))
        .json(&json!({"token": "nope", "username": "bob", "password": "pw"}))
        .send()
        .await
        .unwrap();
    assert_eq!(accept.status(), 400);

    let details = client.get(app.url("/api/invite/nope")).send().await.unwrap();
    assert_eq!(details.status(), 400);
}

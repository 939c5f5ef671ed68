mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use axum_test::TestServer;

use relay_api::relay::gate;
use relay_api::relay::Identity;

// ---------------------------------------------------------------------------
// GET /api/v1/channels
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_channels_requires_auth() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let resp = server.get("/api/v1/channels").await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_channels_starts_empty() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::login_test_user(&server, "alice").await;

    let resp = server
        .get("/api/v1/channels")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;

    resp.assert_status_ok();
    assert_eq!(resp.json::<Vec<String>>(), Vec::<String>::new());
}

// ---------------------------------------------------------------------------
// POST /api/v1/channels/:name
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_channel_is_idempotent() {
    let (app, state) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::login_test_user(&server, "alice").await;

    for _ in 0..2 {
        server
            .post("/api/v1/channels/general")
            .add_header(AUTHORIZATION, format!("Bearer {token}"))
            .await
            .assert_status_ok();
    }
    server
        .post("/api/v1/channels/random")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await
        .assert_status_ok();

    let resp = server
        .get("/api/v1/channels")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    assert_eq!(resp.json::<Vec<String>>(), vec!["general", "random"]);
    assert_eq!(state.channels.len(), 2);
}

#[tokio::test]
async fn create_channel_requires_auth() {
    let (app, state) = common::test_app();
    let server = TestServer::new(app).unwrap();

    let resp = server.post("/api/v1/channels/general").await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert!(state.channels.is_empty());
}

#[tokio::test]
async fn create_channel_rejects_blank_name() {
    let (app, state) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::login_test_user(&server, "alice").await;

    let resp = server
        .post("/api/v1/channels/%20")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    assert!(state.channels.is_empty());
}

// ---------------------------------------------------------------------------
// DELETE /api/v1/channels/:name
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_missing_channel_is_noop() {
    let (app, _state) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::login_test_user(&server, "alice").await;

    server
        .delete("/api/v1/channels/ghost")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await
        .assert_status_ok();
}

#[tokio::test]
async fn delete_empty_channel_removes_it() {
    let (app, state) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::login_test_user(&server, "alice").await;
    state.channels.create("general");

    server
        .delete("/api/v1/channels/general")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await
        .assert_status_ok();

    assert!(state.channels.get("general").is_none());
}

#[tokio::test]
async fn delete_channel_with_members_is_rejected() {
    let (app, state) = common::test_app();
    let server = TestServer::new(app).unwrap();
    let token = common::login_test_user(&server, "alice").await;
    state.channels.create("general");

    let admission = gate::admit(
        &state.channels,
        Some(Identity::new("bob")),
        Some("general"),
        state.config.outbound_queue_capacity,
    )
    .unwrap();

    let resp = server
        .delete("/api/v1/channels/general")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json();
    assert_eq!(body["error"]["code"], "CHANNEL_NOT_EMPTY");
    assert_eq!(body["error"]["message"], "There are still users in the channel!");
    assert!(state.channels.get("general").is_some());

    admission.connection.leave();

    server
        .delete("/api/v1/channels/general")
        .add_header(AUTHORIZATION, format!("Bearer {token}"))
        .await
        .assert_status_ok();
    assert!(state.channels.get("general").is_none());
}

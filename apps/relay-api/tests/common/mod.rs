#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use futures_util::StreamExt;
use tokio::time;
use tokio_tungstenite::tungstenite;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;

use relay_api::config::Config;
use relay_api::AppState;

pub type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Build a test AppState with the in-memory session store.
pub fn test_state() -> AppState {
    AppState::in_memory(Config::default())
}

/// Build the full application router wired to the test state.
pub fn test_app() -> (Router, AppState) {
    let state = test_state();
    let app = relay_api::routes::router().with_state(state.clone());
    (app, state)
}

/// Login a test user through the router and return their session token.
pub async fn login_test_user(server: &axum_test::TestServer, username: &str) -> String {
    let resp = server
        .post("/api/v1/auth/login")
        .add_query_param("username", username)
        .await;
    resp.assert_status_ok();
    resp.json::<serde_json::Value>()["session_token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Start an actual TCP server for WebSocket testing.
/// Returns (addr, state). The server runs in the background.
pub async fn start_ws_server() -> (SocketAddr, AppState) {
    let (app, state) = test_app();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, state)
}

/// Log a user in over real HTTP and return the session token.
pub async fn login_over_http(addr: SocketAddr, username: &str) -> String {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/api/v1/auth/login"))
        .query(&[("username", username)])
        .send()
        .await
        .expect("login request");
    assert_eq!(resp.status(), reqwest::StatusCode::OK);

    let body: serde_json::Value = resp.json().await.expect("parse login response");
    body["session_token"]
        .as_str()
        .expect("session_token present")
        .to_string()
}

/// Open a WebSocket to `/channel/{name}`, optionally with a bearer token.
pub async fn connect(addr: SocketAddr, channel: &str, token: Option<&str>) -> WsStream {
    let mut request = format!("ws://{addr}/channel/{channel}")
        .into_client_request()
        .expect("client request");
    if let Some(token) = token {
        request.headers_mut().insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
    }

    let (ws, _) = tokio_tungstenite::connect_async(request)
        .await
        .expect("ws connect");
    ws
}

/// Read the next text frame as JSON, failing after five seconds.
pub async fn next_json(ws: &mut WsStream) -> serde_json::Value {
    loop {
        let msg = time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timeout waiting for frame")
            .expect("stream ended")
            .expect("ws read error");

        match msg {
            tungstenite::Message::Text(text) => {
                return serde_json::from_str(&text).expect("parse frame");
            }
            tungstenite::Message::Ping(_) | tungstenite::Message::Pong(_) => continue,
            other => panic!("Expected text frame, got: {other:?}"),
        }
    }
}

/// Assert that nothing arrives within a short window.
pub async fn assert_silent(ws: &mut WsStream) {
    let res = time::timeout(Duration::from_millis(200), ws.next()).await;
    assert!(res.is_err(), "expected no frame, got: {res:?}");
}

/// Read the next frame and return its close code, if it is a close frame.
pub async fn expect_close(ws: &mut WsStream) -> Option<u16> {
    let msg = time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timeout waiting for close");

    match msg {
        Some(Ok(tungstenite::Message::Close(Some(frame)))) => Some(frame.code.into()),
        Some(Ok(tungstenite::Message::Close(None))) | None => None,
        Some(Err(_)) => None,
        Some(Ok(other)) => panic!("Expected Close frame, got: {other:?}"),
    }
}

// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use taskdesk::config::{Config, IdentityConfig};
use taskdesk::db::{FirestoreDb, MemoryStore};
use taskdesk::routes::create_router;
use taskdesk::services::IdentityVerifier;
use taskdesk::AppState;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection against the emulator.
#[allow(dead_code)]
pub async fn test_db(profiles: &str, tasks: &str) -> FirestoreDb {
    FirestoreDb::new("test-project", profiles, tasks)
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Shared secret used by the test config.
#[allow(dead_code)]
pub fn test_secret(config: &Config) -> Vec<u8> {
    match &config.identity {
        IdentityConfig::SharedSecret { secret } => secret.clone(),
        IdentityConfig::Jwks { .. } => panic!("test config must use a shared secret"),
    }
}

/// Create a test app backed by a fresh memory store.
/// Returns the router, the shared state and the store for inspection.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>, MemoryStore) {
    let config = Config::test_default();
    let identity = IdentityVerifier::shared_secret(&test_secret(&config))
        .expect("Failed to build identity verifier");
    let store = MemoryStore::new();

    let state = Arc::new(AppState::new(
        config,
        identity,
        Arc::new(store.clone()),
        Arc::new(store.clone()),
    ));

    (create_router(state.clone()), state, store)
}

/// Serve a test app on an ephemeral local port. Returns its base URL.
#[allow(dead_code)]
pub async fn spawn_test_server() -> (String, Arc<AppState>, MemoryStore) {
    let (app, state, store) = create_test_app();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}"), state, store)
}

/// Create an identity token for `sub` signed with the test secret.
#[allow(dead_code)]
pub fn create_test_token(state: &AppState, sub: &str, email: Option<&str>) -> String {
    #[derive(Serialize)]
    struct Claims<'a> {
        sub: &'a str,
        exp: u64,
        iat: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        email: Option<&'a str>,
    }

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs();

    encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub,
            exp: now + 3600,
            iat: now,
            email,
        },
        &EncodingKey::from_secret(&test_secret(&state.config)),
    )
    .unwrap()
}

/// Build a JSON request, optionally authenticated with a raw token.
#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, token);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send a request through the router and decode the JSON body (Null if empty).
#[allow(dead_code)]
pub async fn send(
    app: &axum::Router,
    request: Request<Body>,
) -> (StatusCode, HeaderMap, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, headers, body)
}

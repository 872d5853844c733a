// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use guide_book_persistence::{GuideSeed, Persistence};
use serde_json::{Value, json};
use std::time::Duration;
use tower::ServiceExt;

use crate::{AppState, build_router};

pub const PASSWORD: &str = "Tr@ilHead42";
pub const SLOTS: [&str; 2] = ["2024-01-01T10:00:00Z", "2024-01-01T12:00:00Z"];

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState::new(persistence, Duration::from_secs(10))
}

pub async fn insert_test_guide(app_state: &AppState, name: &str, expertise: &str) -> i64 {
    let mut anchor = app_state.anchor.lock().await;
    anchor
        .insert_guide(&GuideSeed {
            name: name.to_string(),
            expertise: expertise.to_string(),
            availability: SLOTS.iter().map(ToString::to_string).collect(),
        })
        .unwrap()
        .value()
}

/// Sends a request and returns the status and the decoded JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body_bytes).unwrap())
}

/// Registers a user and returns their session token.
pub async fn register(app: &Router, name: &str, email: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "name": name, "email": email, "password": PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

pub fn app(app_state: &AppState) -> Router {
    build_router(app_state.clone())
}

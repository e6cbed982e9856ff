use std::sync::Arc;

use axum::{
    Router,
    body::{self, Body},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use group_service::{
    group::repository::InMemoryGroupRepository, identity,
    message::repository::InMemoryMessageRepository, state::AppState,
};

pub fn app() -> Router {
    group_service::app(AppState::new(
        Arc::new(InMemoryGroupRepository::new()),
        Arc::new(InMemoryMessageRepository::new()),
    ))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    match body {
        Some(body) => {
            send_raw(
                app,
                method,
                uri,
                user_id,
                Some("application/json"),
                &body.to_string(),
            )
            .await
        }
        None => send_raw(app, method, uri, user_id, None, "").await,
    }
}

/// Sends `payload` as is. Every response body must still be JSON or empty.
pub async fn send_raw(
    app: &Router,
    method: Method,
    uri: &str,
    user_id: Option<&str>,
    content_type: Option<&str>,
    payload: &str,
) -> (StatusCode, Value) {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(user_id) = user_id {
        req = req.header(identity::HEADER, user_id);
    }
    if let Some(content_type) = content_type {
        req = req.header(header::CONTENT_TYPE, content_type);
    }
    let req = req.body(Body::from(payload.to_owned())).unwrap();

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

/// Creates a group owned by `owner` and returns its id.
pub async fn create_group(app: &Router, owner: &str, name: &str) -> String {
    let (status, json) = send(
        app,
        Method::POST,
        "/groups",
        Some(owner),
        Some(serde_json::json!({ "name": name })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{json}");

    json["group"]["id"].as_str().unwrap().to_owned()
}

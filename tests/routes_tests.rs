mod common;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use pyrador::{app, AppState};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn router() -> Router {
    app(AppState {
        sessions: common::factory().await,
    })
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(b) => builder
            .header("content-type", "application/json")
            .body(Body::from(b.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    read(router, request).await
}

async fn send_raw(router: &Router, method: Method, uri: &str, body: &'static str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    read(router, request).await
}

async fn read(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_and_ready() {
    let router = router().await;
    let (status, body) = send(&router, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));

    let (status, body) = send(&router, Method::GET, "/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn host_lifecycle_over_http() {
    let router = router().await;

    let (status, created) =
        send(&router, Method::POST, "/api/v1/hosts", Some(json!({"hostname": "web-01"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["hostname"], "web-01");
    let id = created["data"]["id"].as_str().expect("id in response").to_string();

    let (status, read) = send(&router, Method::GET, &format!("/api/v1/hosts/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(read["data"], created["data"]);

    let (status, patched) = send(
        &router,
        Method::PATCH,
        &format!("/api/v1/hosts/{id}"),
        Some(json!({"hostname": "web-02"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["data"]["hostname"], "web-02");

    let (status, _) = send(&router, Method::DELETE, &format!("/api/v1/hosts/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, Method::GET, &format!("/api/v1/hosts/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn list_filters_by_query_and_find_requires_a_single_match() {
    let router = router().await;
    for name in ["a", "b"] {
        let (status, _) =
            send(&router, Method::POST, "/api/v1/hosts", Some(json!({"hostname": name}))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, all) = send(&router, Method::GET, "/api/v1/hosts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["meta"]["count"], 2);

    let (_, filtered) = send(&router, Method::GET, "/api/v1/hosts?hostname=a", None).await;
    assert_eq!(filtered["meta"]["count"], 1);
    assert_eq!(filtered["data"][0]["hostname"], "a");

    let (status, found) = send(&router, Method::GET, "/api/v1/hosts/find?hostname=b", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["data"]["hostname"], "b");

    let (status, _) = send(&router, Method::GET, "/api/v1/hosts/find?hostname=zzz", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, Method::GET, "/api/v1/hosts/find", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn find_without_filters_returns_the_only_row() {
    let router = router().await;
    send(&router, Method::POST, "/api/v1/host-groups", Some(json!({"name": "edge"}))).await;
    let (status, found) = send(&router, Method::GET, "/api/v1/host-groups/find", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["data"]["name"], "edge");
}

#[tokio::test]
async fn ambiguous_group_lookup_answers_not_found() {
    let router = router().await;
    for _ in 0..2 {
        send(&router, Method::POST, "/api/v1/host-groups", Some(json!({"name": "edge"}))).await;
    }
    let (status, _) = send(&router, Method::GET, "/api/v1/host-groups/find?name=edge", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_input_maps_to_client_errors() {
    let router = router().await;

    let (status, body) = send(&router, Method::POST, "/api/v1/hosts", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, body) = send_raw(&router, Method::POST, "/api/v1/hosts", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) = send_raw(&router, Method::PATCH, "/api/v1/hosts/abc", "{").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");

    let (status, body) =
        send(&router, Method::POST, "/api/v1/host-groups", Some(json!({"name": " "}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "validation_error");

    let (status, _) = send(&router, Method::GET, "/api/v1/hosts?colour=red", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, created) =
        send(&router, Method::POST, "/api/v1/hosts", Some(json!({"hostname": "web-01"}))).await;
    let id = created["data"]["id"].as_str().unwrap().to_string();
    let (status, _) = send(
        &router,
        Method::PATCH,
        &format!("/api/v1/hosts/{id}"),
        Some(json!({"nonexistent_col": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &router,
        Method::PATCH,
        &format!("/api/v1/hosts/{id}"),
        Some(json!(["not", "an", "object"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn duplicate_hostname_is_a_conflict() {
    let router = router().await;
    let body = json!({"hostname": "web-01"});
    let (status, _) = send(&router, Method::POST, "/api/v1/hosts", Some(body.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, err) = send(&router, Method::POST, "/api/v1/hosts", Some(body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"]["code"], "conflict");

    let (_, all) = send(&router, Method::GET, "/api/v1/hosts", None).await;
    assert_eq!(all["meta"]["count"], 1);
}

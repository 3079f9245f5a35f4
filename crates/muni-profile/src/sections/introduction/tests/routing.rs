use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use super::common::{build_manager, duduwa_facts, StaticProvider};
use crate::sections::introduction::introduction_router;

fn build_router() -> axum::Router {
    let (manager, _, _) = build_manager(StaticProvider::new(duduwa_facts()));
    introduction_router(manager)
}

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router dispatch");

    let status = response.status();
    let body = to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let payload: Value = serde_json::from_slice(&body).expect("json");
    (status, payload)
}

#[tokio::test]
async fn get_introduction_returns_section_content() {
    let (status, payload) = get_json(
        build_router(),
        "/api/v1/sections/introduction/duduwa",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payload.get("section"), Some(&Value::from("introduction")));
    assert_eq!(payload.get("municipality"), Some(&Value::from("duduwa")));
    assert!(payload.get("fingerprint").is_some());

    let blocks = payload
        .get("blocks")
        .and_then(Value::as_array)
        .expect("blocks array");
    assert_eq!(
        blocks[0].get("type"),
        Some(&Value::from("paragraph"))
    );
    assert!(blocks
        .iter()
        .any(|block| block.get("type") == Some(&Value::from("chart"))));
}

#[tokio::test]
async fn include_chart_false_drops_the_chart_block() {
    let (status, payload) = get_json(
        build_router(),
        "/api/v1/sections/introduction/duduwa?include_chart=false",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let blocks = payload
        .get("blocks")
        .and_then(Value::as_array)
        .expect("blocks array");
    assert!(blocks
        .iter()
        .all(|block| block.get("type") != Some(&Value::from("chart"))));
}

#[tokio::test]
async fn nepali_locale_is_honored() {
    let (status, payload) = get_json(
        build_router(),
        "/api/v1/sections/introduction/duduwa?locale=ne",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = payload["blocks"][0]["text"].as_str().expect("paragraph text");
    assert!(text.contains("गाउँपालिका"));
}

#[tokio::test]
async fn unknown_locale_is_unprocessable() {
    let (status, payload) = get_json(
        build_router(),
        "/api/v1/sections/introduction/duduwa?locale=tlh",
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("tlh"));
}

#[tokio::test]
async fn unknown_municipality_is_not_found() {
    let (status, payload) = get_json(
        build_router(),
        "/api/v1/sections/introduction/narainapur",
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(payload.get("error").is_some());
}

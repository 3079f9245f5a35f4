use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;

use muni_profile::sections::introduction::introduction_router;
use muni_profile::sections::SectionKind;

use crate::infra::{AppState, IntroManager};

pub(crate) fn with_section_routes(manager: Arc<IntroManager>) -> axum::Router {
    introduction_router(manager)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/sections", axum::routing::get(sections_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Report sections known to the suite, in document order. Only the
/// introduction is served by this deployment; the rest are listed so
/// rendering clients can lay out placeholders.
pub(crate) async fn sections_endpoint() -> Json<serde_json::Value> {
    let sections: Vec<_> = SectionKind::ordered()
        .into_iter()
        .map(|section| {
            json!({
                "slug": section.slug(),
                "label": section.label(),
                "implemented": section == SectionKind::Introduction,
            })
        })
        .collect();
    Json(json!({ "sections": sections }))
}

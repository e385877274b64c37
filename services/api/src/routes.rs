use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use castbase::analytics::engagement::{engagement_router, EngagementService, InteractionFeed};
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) fn with_engagement_routes<F>(service: Arc<EngagementService<F>>) -> Router
where
    F: InteractionFeed + 'static,
{
    engagement_router(service)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::InMemoryInteractionFeed;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use castbase::analytics::{ScoreWeights, SelectionMode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::Value;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn build_router(ready: bool) -> Router {
        let feed = Arc::new(InMemoryInteractionFeed::default());
        let service = EngagementService::new(feed, ScoreWeights::default(), SelectionMode::TopN { n: 10 })
            .expect("valid service");
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_engagement_routes(Arc::new(service)).layer(Extension(state))
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
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
        (status, serde_json::from_slice(&body).expect("json"))
    }

    #[tokio::test]
    async fn health_is_always_ok() {
        let (status, payload) = get_json(build_router(false), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload, json!({ "status": "ok" }));
    }

    #[tokio::test]
    async fn readiness_tracks_flag() {
        let (status, payload) = get_json(build_router(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload["status"], "initializing");

        let (status, payload) = get_json(build_router(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["status"], "ready");
    }

    #[tokio::test]
    async fn engagement_routes_are_mounted() {
        let (status, payload) = get_json(build_router(true), "/api/v1/eligibility/12345").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload["total_amount"], 2_400);
    }
}

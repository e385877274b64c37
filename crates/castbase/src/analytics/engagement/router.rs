use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::super::eligibility::{estimate, EligibilityResult, Seed};
use super::super::interactions::InteractionEvent;
use super::super::profiles::{lookup_profile, ProfileSnapshot};
use super::super::quality::{AccountSignals, QualityRuleSet, QualityVerdict};
use super::super::ranking::SelectionMode;
use super::feed::InteractionFeed;
use super::service::{EngagementService, EngagementServiceError};

/// Router builder exposing eligibility, profile, and recipient endpoints.
pub fn engagement_router<F>(service: Arc<EngagementService<F>>) -> Router
where
    F: InteractionFeed + 'static,
{
    Router::new()
        .route("/api/v1/eligibility/:seed", get(eligibility_handler))
        .route("/api/v1/profiles/:query", get(profile_handler))
        .route("/api/v1/quality", post(quality_handler))
        .route("/api/v1/interactions", post(record_handler::<F>))
        .route("/api/v1/recipients", get(latest_handler::<F>))
        .route("/api/v1/recipients/select", post(select_handler::<F>))
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub struct EligibilityView {
    #[serde(flatten)]
    pub result: EligibilityResult,
    pub share_message: String,
}

#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub profile: ProfileSnapshot,
    pub quality: QualityVerdict,
}

#[derive(Debug, Deserialize)]
pub struct RecordRequest {
    pub events: Vec<InteractionEvent>,
}

/// Ranks `events` when supplied, otherwise everything recorded in the feed.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub events: Option<Vec<InteractionEvent>>,
    #[serde(default)]
    pub now: Option<DateTime<Utc>>,
    pub mode: SelectionMode,
}

pub(crate) async fn eligibility_handler(Path(raw_seed): Path<String>) -> Response {
    match raw_seed.parse::<Seed>() {
        Ok(seed) => {
            let result = estimate(seed);
            let share_message = result.share_message();
            let view = EligibilityView {
                result,
                share_message,
            };
            (StatusCode::OK, Json(view)).into_response()
        }
        Err(error) => bad_request(error.to_string()),
    }
}

pub(crate) async fn profile_handler(Path(query): Path<String>) -> Response {
    match lookup_profile(&query) {
        Ok(profile) => {
            let quality = QualityRuleSet::standard().evaluate(&profile.signals());
            (StatusCode::OK, Json(ProfileView { profile, quality })).into_response()
        }
        Err(error) => bad_request(error.to_string()),
    }
}

/// Evaluate signals reported by a social-graph provider, such as its `active_status`.
pub(crate) async fn quality_handler(Json(signals): Json<AccountSignals>) -> Json<QualityVerdict> {
    Json(QualityRuleSet::standard().evaluate(&signals))
}

pub(crate) async fn record_handler<F>(
    State(service): State<Arc<EngagementService<F>>>,
    Json(request): Json<RecordRequest>,
) -> Response
where
    F: InteractionFeed + 'static,
{
    let received = request.events.len();
    match service.record(request.events) {
        Ok(stored) => (
            StatusCode::ACCEPTED,
            Json(json!({ "received": received, "stored": stored })),
        )
            .into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn select_handler<F>(
    State(service): State<Arc<EngagementService<F>>>,
    Json(request): Json<SelectRequest>,
) -> Response
where
    F: InteractionFeed + 'static,
{
    let now = request.now.unwrap_or_else(Utc::now);
    let outcome = match request.events {
        Some(events) => service.rank(&events, now, request.mode),
        None => service.rank_feed(now, request.mode),
    };

    match outcome {
        Ok(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn latest_handler<F>(State(service): State<Arc<EngagementService<F>>>) -> Response
where
    F: InteractionFeed + 'static,
{
    match service.latest() {
        Some(snapshot) => (StatusCode::OK, Json(snapshot)).into_response(),
        None => {
            let payload = json!({
                "status": "pending",
                "mode": service.refresh_mode(),
                "recipients": [],
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
    }
}

fn bad_request(message: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn service_error(error: EngagementServiceError) -> Response {
    match error {
        EngagementServiceError::Scoring(error) => bad_request(error.to_string()),
        EngagementServiceError::Feed(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

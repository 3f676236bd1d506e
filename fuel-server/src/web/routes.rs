//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};

use crate::planner::{PlanError, TripPlanner};

use super::dto::*;
use super::state::AppState;
use super::templates::MapTemplate;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(map_page))
        .route("/health", get(health))
        .route("/api/plan_route", post(plan_route))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let snapshot = state.stations.snapshot().await;
    Json(HealthResponse {
        status: "ok",
        stations: snapshot.len(),
        eligible_stations: snapshot.iter().filter(|s| s.is_eligible()).count(),
        cached_geocodes: state.geocoder.cache_entry_count(),
    })
}

/// Map page with the route form.
async fn map_page() -> impl IntoResponse {
    Html(
        MapTemplate
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Plan fuel stops between two addresses.
async fn plan_route(
    State(state): State<AppState>,
    payload: Result<Json<PlanRouteRequest>, JsonRejection>,
) -> Result<Json<PlanRouteResponse>, AppError> {
    let Json(req) = payload.map_err(|e| AppError::BadRequest {
        message: format!("Invalid JSON: {}", e.body_text()),
    })?;

    let start = req.start.unwrap_or_default();
    let end = req.end.unwrap_or_default();
    info!(%start, %end, "planning route");

    // One snapshot for the whole request.
    let stations = state.stations.snapshot().await;

    let planner = TripPlanner::new(state.geocoder.as_ref(), state.router.as_ref(), &state.config);
    let plan = planner.plan(&start, &end, &stations).await?;

    info!(
        stops = plan.stops.len(),
        total_miles = plan.total_distance_miles,
        total_cost = plan.total_cost,
        "planned route"
    );

    Ok(Json(PlanRouteResponse::from_plan(&plan)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// A planning failure, mapped by kind
    Plan(PlanError),
    /// Request body could not be read
    BadRequest { message: String },
    /// Server-side failure
    Internal { message: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Plan(PlanError::RoutingFailure(_)) => StatusCode::BAD_GATEWAY,
            AppError::Plan(_) | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            AppError::Plan(e) => e.kind(),
            AppError::BadRequest { .. } => "invalid_request",
            AppError::Internal { .. } => "internal",
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        AppError::Plan(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let kind = self.kind();
        let message = match &self {
            AppError::Plan(e) => e.to_string(),
            AppError::BadRequest { message } | AppError::Internal { message } => message.clone(),
        };

        if status.is_server_error() {
            error!(%status, kind, %message, "request failed");
        } else {
            warn!(%status, kind, %message, "request rejected");
        }

        let body = Json(ErrorResponse {
            error: message,
            kind: kind.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheConfig, CachedGeocoder};
    use crate::geocode::{NominatimClient, NominatimConfig};
    use crate::planner::PlannerConfig;
    use crate::routing::{OsrmClient, OsrmConfig};
    use crate::store::StationStore;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    // Nothing listens here; tests never get as far as an upstream call.
    const UNUSED_UPSTREAM: &str = "http://127.0.0.1:9";

    fn app() -> Router {
        let geocoder = NominatimClient::new(NominatimConfig::new().with_base_url(UNUSED_UPSTREAM))
            .unwrap();
        let router = OsrmClient::new(OsrmConfig::new().with_base_url(UNUSED_UPSTREAM)).unwrap();
        let state = AppState::new(
            CachedGeocoder::new(geocoder, &CacheConfig::default()),
            router,
            StationStore::in_memory(Vec::new()),
            PlannerConfig::default(),
        );
        create_router(state, "static")
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/plan_route")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[test]
    fn plan_error_status_codes() {
        let cases = [
            (PlanError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (
                PlanError::GeocodeFailure {
                    address: "x".into(),
                    message: "y".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (PlanError::RoutingFailure("x".into()), StatusCode::BAD_GATEWAY),
            (
                PlanError::RangeGap {
                    window_start: 0.0,
                    window_end: 500.0,
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                PlanError::UnreachableDestination {
                    remaining_miles: 600.0,
                    range_miles: 500.0,
                },
                StatusCode::BAD_REQUEST,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(AppError::from(err).into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn error_body_carries_kind() {
        let response = AppError::from(PlanError::RangeGap {
            window_start: 0.0,
            window_end: 500.0,
        })
        .into_response();

        let body = read_json(response).await;
        assert_eq!(body["kind"], "range_gap");
        assert_eq!(body["error"], "no stations between 0.00 and 500.00 miles");
    }

    #[tokio::test]
    async fn health_reports_station_counts() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = read_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["stations"], 0);
        assert_eq!(body["eligible_stations"], 0);
        assert_eq!(body["cached_geocodes"], 0);
    }

    #[tokio::test]
    async fn map_page_renders() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("/api/plan_route"));
    }

    #[tokio::test]
    async fn missing_address_is_bad_request() {
        let response = app()
            .oneshot(post_json(r#"{"start": "Tulsa, OK"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = read_json(response).await;
        assert_eq!(body["kind"], "invalid_request");
        assert_eq!(body["error"], "invalid request: end address is required");
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request() {
        let response = app().oneshot(post_json("{not json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_json(response).await["kind"], "invalid_request");
    }

    #[tokio::test]
    async fn plan_route_requires_post() {
        let request = Request::builder()
            .uri("/api/plan_route")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}

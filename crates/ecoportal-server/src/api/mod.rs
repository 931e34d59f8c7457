mod lookups;
mod recommendations;
mod sync;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use ecoportal_core::CatalogStore;
use ecoportal_recommend::RecommendationEngine;
use ecoportal_sync::{SyncCoordinator, SyncStatus};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_bearer_auth, AuthState, RateLimitState, RequestId,
};

/// Shared handles for every request. Generic over the upstream store so the
/// router can run against Postgres in production and in-memory data in tests.
pub struct AppState<S> {
    pub coordinator: Arc<SyncCoordinator<S>>,
    pub engine: Arc<RecommendationEngine>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            coordinator: Arc::clone(&self.coordinator),
            engine: Arc::clone(&self.engine),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    sync: SyncStatus,
    sectors_in_catalog: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(data: T, request_id: String) -> Self {
        Self {
            data,
            meta: ResponseMeta::new(request_id),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router<S>(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState<S>>
where
    S: CatalogStore + 'static,
{
    Router::new()
        .route("/api/v1/sync/complete-sync", get(sync::complete_sync::<S>))
        .route("/api/v1/sync/force-refresh", post(sync::force_refresh::<S>))
        .route("/api/v1/sync/status", get(sync::sync_status::<S>))
        .route(
            "/api/v1/sectors/{sector_id}/brands",
            get(lookups::brands_by_sector::<S>),
        )
        .route(
            "/api/v1/brands/{brand_id}/sector",
            get(lookups::sector_for_brand::<S>),
        )
        .route(
            "/api/v1/brands/{brand_id}/subnodes",
            get(lookups::subnodes_by_parent::<S>),
        )
        .route(
            "/api/v1/integrations/{tag}/brands",
            get(lookups::brands_by_integration::<S>),
        )
        .route(
            "/api/v1/recommendations",
            post(recommendations::recommend::<S>),
        )
        .route(
            "/api/v1/recommendations/graph",
            get(recommendations::relationship_graph::<S>),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

pub fn build_app<S>(state: AppState<S>, auth: AuthState, rate_limit: RateLimitState) -> Router
where
    S: CatalogStore + 'static,
{
    let public_routes = Router::new().route("/api/v1/health", get(health::<S>));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<HealthData>> {
    let sync = state.coordinator.sync_status();
    let status = if sync.has_index { "ok" } else { "starting" };

    Json(ApiResponse::new(
        HealthData {
            status,
            sync,
            sectors_in_catalog: state.engine.catalog().sectors.len(),
        },
        req_id.0,
    ))
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

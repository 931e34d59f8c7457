use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use ecoportal_core::CatalogStore;
use ecoportal_recommend::{
    explain_recommendation, weights::DEFAULT_MAX_RESULTS, RecommendationScore, UserProfile,
};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

const MAX_RESULTS_CAP: usize = 50;

#[derive(Debug, Deserialize)]
pub(super) struct RecommendationRequest {
    #[serde(default)]
    profile: UserProfile,
    max_results: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(super) struct RecommendationItem {
    #[serde(flatten)]
    score: RecommendationScore,
    explanation: String,
}

#[derive(Debug, Serialize)]
pub(super) struct GraphData {
    sectors: usize,
    edge_count: usize,
    edges: BTreeMap<String, Vec<String>>,
}

pub(super) async fn recommend<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<RecommendationRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<Vec<RecommendationItem>>>, ApiError> {
    let Json(request) =
        body.map_err(|e| ApiError::new(req_id.0.clone(), "validation_error", e.body_text()))?;

    let max_results = request
        .max_results
        .unwrap_or(DEFAULT_MAX_RESULTS)
        .min(MAX_RESULTS_CAP);

    let data: Vec<RecommendationItem> = state
        .engine
        .generate_recommendations(&request.profile, max_results)
        .into_iter()
        .map(|score| RecommendationItem {
            explanation: explain_recommendation(&score),
            score,
        })
        .collect();

    tracing::debug!(
        selected = request.profile.selected_sectors.len(),
        returned = data.len(),
        "recommendations generated"
    );

    Ok(Json(ApiResponse::new(data, req_id.0)))
}

pub(super) async fn relationship_graph<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<GraphData>> {
    let graph = state.engine.graph();
    let edges = graph
        .adjacency()
        .iter()
        .map(|(from, to)| (from.clone(), to.iter().cloned().collect()))
        .collect();

    Json(ApiResponse::new(
        GraphData {
            sectors: graph.sector_keys().count(),
            edge_count: graph.edge_count(),
            edges,
        },
        req_id.0,
    ))
}

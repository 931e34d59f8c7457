use axum::{extract::State, http::StatusCode, Extension, Json};
use ecoportal_core::CatalogStore;
use ecoportal_sync::{ProbeReport, SyncMetrics, SyncStatus};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct BrandBreakdown {
    total: usize,
    core: usize,
    subnodes: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct SyncBreakdown {
    sectors: usize,
    brands: BrandBreakdown,
    system: usize,
}

impl From<&SyncMetrics> for SyncBreakdown {
    fn from(metrics: &SyncMetrics) -> Self {
        Self {
            sectors: metrics.sectors,
            brands: BrandBreakdown {
                total: metrics.total_brands,
                core: metrics.core_brands,
                subnodes: metrics.subnodes,
            },
            system: metrics.system_status_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct CompleteSyncData {
    status: &'static str,
    #[serde(flatten)]
    metrics: SyncMetrics,
    breakdown: SyncBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

/// Runs (or joins, when one is already in flight) a comprehensive sync.
///
/// A malformed snapshot is reported in-band with `status: "error"` and zeroed
/// counts rather than through the error envelope.
pub(super) async fn complete_sync<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> (StatusCode, Json<ApiResponse<CompleteSyncData>>) {
    match state.coordinator.perform_comprehensive_sync().await {
        Ok(metrics) => (
            StatusCode::OK,
            Json(ApiResponse::new(
                CompleteSyncData {
                    status: "synchronized",
                    breakdown: SyncBreakdown::from(&metrics),
                    metrics,
                    message: None,
                },
                req_id.0,
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "complete-sync failed");
            let metrics = SyncMetrics::default();
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::new(
                    CompleteSyncData {
                        status: "error",
                        breakdown: SyncBreakdown::from(&metrics),
                        metrics,
                        message: Some(e.to_string()),
                    },
                    req_id.0,
                )),
            )
        }
    }
}

pub(super) async fn force_refresh<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ProbeReport>> {
    let report = state.coordinator.probe_store().await;
    tracing::info!(
        succeeded = report.succeeded,
        attempted = report.attempted,
        "force-refresh probe complete"
    );
    Json(ApiResponse::new(report, req_id.0))
}

pub(super) async fn sync_status<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<SyncStatus>> {
    Json(ApiResponse::new(state.coordinator.sync_status(), req_id.0))
}

//! Read-only index lookups against the last published sync.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use ecoportal_core::{Brand, CatalogStore, Sector};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState};

pub(super) async fn brands_by_sector<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(sector_id): Path<i64>,
) -> Json<ApiResponse<Vec<Brand>>> {
    Json(ApiResponse::new(
        state.coordinator.brands_by_sector(sector_id),
        req_id.0,
    ))
}

pub(super) async fn sector_for_brand<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(brand_id): Path<i64>,
) -> Result<Json<ApiResponse<Sector>>, ApiError> {
    match state.coordinator.sector_for_brand(brand_id) {
        Some(sector) => Ok(Json(ApiResponse::new(sector, req_id.0))),
        None => Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no sector indexed for brand {brand_id}"),
        )),
    }
}

pub(super) async fn subnodes_by_parent<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(brand_id): Path<i64>,
) -> Json<ApiResponse<Vec<Brand>>> {
    Json(ApiResponse::new(
        state.coordinator.subnodes_by_parent(brand_id),
        req_id.0,
    ))
}

pub(super) async fn brands_by_integration<S: CatalogStore + 'static>(
    State(state): State<AppState<S>>,
    Extension(req_id): Extension<RequestId>,
    Path(tag): Path<String>,
) -> Json<ApiResponse<Vec<Brand>>> {
    Json(ApiResponse::new(
        state.coordinator.brands_by_integration(tag.trim()),
        req_id.0,
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use super::super::test_support::{app, get, send, state, MemoryStore};

    #[tokio::test]
    async fn lookups_are_empty_before_any_sync() {
        let router = app(state(MemoryStore::healthy()));
        let (status, json) = send(router.clone(), get("/api/v1/sectors/1/brands")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], serde_json::json!([]));

        let (status, json) = send(router, get("/api/v1/brands/101/sector")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"]["code"], "not_found");
    }

    #[tokio::test]
    async fn lookups_read_the_published_index() {
        let shared = state(MemoryStore::healthy());
        shared
            .coordinator
            .perform_comprehensive_sync()
            .await
            .expect("sync");
        let router = app(shared);

        let (_, json) = send(router.clone(), get("/api/v1/sectors/4/brands")).await;
        let names: Vec<&str> = json["data"]
            .as_array()
            .expect("array")
            .iter()
            .filter_map(|b| b["name"].as_str())
            .collect();
        assert_eq!(names, vec!["FreightFlow", "FleetTrack", "DataSync"]);

        let (status, json) = send(router.clone(), get("/api/v1/brands/402/sector")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["name"], "Logistics");

        let (_, json) = send(router.clone(), get("/api/v1/brands/101/subnodes")).await;
        assert_eq!(json["data"].as_array().map(Vec::len), Some(2));

        let (_, json) = send(router, get("/api/v1/integrations/stripe/brands")).await;
        assert_eq!(json["data"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn non_numeric_id_is_rejected() {
        let (status, _) = send(
            app(state(MemoryStore::healthy())),
            get("/api/v1/sectors/abc/brands"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

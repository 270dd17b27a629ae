//! Handlers for map viewport helpers.

use axum::Json;
use serde::Deserialize;

use safetrack_core::error::CoreError;
use safetrack_core::geo::bounds::{self, BoundsOptions, MapView};
use safetrack_core::geo::cluster::{self, ClusterOptions, MapMarker, MarkerCluster};
use safetrack_core::geo::GeoPoint;

use crate::error::AppResult;
use crate::response::DataResponse;

/// Deepest zoom level slippy-map clients request.
const MAX_ZOOM: u8 = 22;

#[derive(Debug, Deserialize)]
pub struct BoundsRequest {
    pub points: Vec<GeoPoint>,
    #[serde(default)]
    pub options: Option<BoundsOptions>,
}

/// POST /api/v1/map/bounds
///
/// Invalid points are skipped, so this never fails on data.
pub async fn compute_bounds(Json(input): Json<BoundsRequest>) -> Json<DataResponse<MapView>> {
    let options = input.options.unwrap_or_default();
    let view = bounds::compute_bounds(&input.points, &options);
    tracing::debug!(points = input.points.len(), zoom = view.zoom, "Computed map bounds");
    Json(DataResponse { data: view })
}

#[derive(Debug, Deserialize)]
pub struct ClusterRequest {
    pub markers: Vec<MapMarker>,
    pub zoom: u8,
    #[serde(default)]
    pub options: Option<ClusterOptions>,
}

/// POST /api/v1/map/clusters
pub async fn cluster_markers(
    Json(input): Json<ClusterRequest>,
) -> AppResult<Json<DataResponse<Vec<MarkerCluster>>>> {
    if input.zoom > MAX_ZOOM {
        return Err(CoreError::Validation(format!(
            "zoom must be between 0 and {MAX_ZOOM}, got {}",
            input.zoom
        ))
        .into());
    }
    let options = input.options.unwrap_or_default();
    if !options.cell_size_px.is_finite() || options.cell_size_px <= 0.0 {
        return Err(CoreError::Validation("cellSizePx must be a positive number".into()).into());
    }

    let clusters = cluster::cluster_markers(&input.markers, input.zoom, &options);
    tracing::debug!(
        markers = input.markers.len(),
        clusters = clusters.len(),
        zoom = input.zoom,
        "Clustered map markers"
    );
    Ok(Json(DataResponse { data: clusters }))
}

//! HTTP-level integration tests for the `/map` endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app, post_json};
use serde_json::json;

// ---------------------------------------------------------------------------
// Test: POST /api/v1/map/bounds
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bounds_of_nothing_is_the_fallback_view() {
    let response = post_json(build_test_app(), "/api/v1/map/bounds", json!({ "points": [] })).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["center"], json!({ "lat": 20.0, "lng": 0.0 }));
    assert_eq!(json["data"]["zoom"], 2);
}

#[tokio::test]
async fn bounds_of_one_point_zooms_in_on_it() {
    let response = post_json(
        build_test_app(),
        "/api/v1/map/bounds",
        json!({ "points": [{ "lat": 10.0, "lng": 20.0 }] }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["center"], json!({ "lat": 10.0, "lng": 20.0 }));
    assert_eq!(json["data"]["zoom"], 12);
}

#[tokio::test]
async fn bounds_respects_caller_zoom_range() {
    let response = post_json(
        build_test_app(),
        "/api/v1/map/bounds",
        json!({
            "points": [{ "lat": 10.0, "lng": 20.0 }],
            "options": { "maxZoom": 9 }
        }),
    )
    .await;

    let json = body_json(response).await;
    assert_eq!(json["data"]["zoom"], 9);
}

#[tokio::test]
async fn bounds_zoom_drops_as_points_spread() {
    let near = json!({ "points": [{ "lat": 0.0, "lng": 0.0 }, { "lat": 0.0, "lng": 0.09 }] });
    let far = json!({ "points": [{ "lat": 0.0, "lng": 0.0 }, { "lat": 0.0, "lng": 9.0 }] });

    let near_json = body_json(post_json(build_test_app(), "/api/v1/map/bounds", near).await).await;
    let far_json = body_json(post_json(build_test_app(), "/api/v1/map/bounds", far).await).await;

    let near_zoom = near_json["data"]["zoom"].as_u64().unwrap();
    let far_zoom = far_json["data"]["zoom"].as_u64().unwrap();
    assert!(far_zoom < near_zoom);
}

// ---------------------------------------------------------------------------
// Test: POST /api/v1/map/clusters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clusters_group_nearby_markers() {
    let response = post_json(
        build_test_app(),
        "/api/v1/map/clusters",
        json!({
            "zoom": 4,
            "markers": [
                { "id": "a", "lat": 51.50, "lng": -0.12 },
                { "id": "b", "lat": 51.51, "lng": -0.13 },
                { "id": "c", "lat": 40.71, "lng": -74.0 }
            ]
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let clusters = json["data"].as_array().unwrap();
    assert_eq!(clusters.len(), 2);
    assert_eq!(clusters[0]["count"], 2);
    assert_eq!(clusters[0]["markerIds"], json!(["a", "b"]));
    assert_eq!(clusters[1]["markerIds"], json!(["c"]));
}

#[tokio::test]
async fn clusters_reject_out_of_range_zoom() {
    let response = post_json(
        build_test_app(),
        "/api/v1/map/clusters",
        json!({ "zoom": 30, "markers": [] }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn clusters_reject_non_positive_cell_size() {
    let response = post_json(
        build_test_app(),
        "/api/v1/map/clusters",
        json!({ "zoom": 3, "markers": [], "options": { "cellSizePx": 0.0 } }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

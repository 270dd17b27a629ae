pub mod assets;
pub mod health;
pub mod map;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /assets/import/fields                            field definitions (GET)
/// /assets/import/upload                            parse + map + validate a file (POST, multipart)
/// /assets/import/mapping/guess                     guess mapping from headers (POST)
/// /assets/import/mapping/validate                  check a mapping is complete (POST)
/// /assets/import/validate                          normalise + validate parsed rows (POST)
/// /assets/validate                                 validate already-normalised assets (POST)
///
/// /map/bounds                                      centre and zoom for points (POST)
/// /map/clusters                                    grid-clustered markers (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Asset hierarchy import and validation.
        .nest("/assets", assets::router())
        // Map viewport helpers.
        .nest("/map", map::router())
}

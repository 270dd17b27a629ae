//! Route definitions for map viewport helpers.
//!
//! Mounted at `/map`.

use axum::routing::post;
use axum::Router;

use crate::handlers::map;
use crate::state::AppState;

/// Routes mounted at `/map`.
///
/// ```text
/// POST   /bounds     -> compute_bounds
/// POST   /clusters   -> cluster_markers
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bounds", post(map::compute_bounds))
        .route("/clusters", post(map::cluster_markers))
}

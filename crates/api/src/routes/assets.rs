//! Route definitions for asset hierarchy import and validation.
//!
//! Mounted at `/assets`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::asset_import;
use crate::state::AppState;

/// Routes mounted at `/assets`.
///
/// ```text
/// GET    /import/fields             -> list_fields
/// POST   /import/upload             -> upload_file      (multipart)
/// POST   /import/mapping/guess      -> guess_mapping
/// POST   /import/mapping/validate   -> validate_mapping
/// POST   /import/validate           -> validate_rows
/// POST   /validate                  -> validate_assets
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/import/fields", get(asset_import::list_fields))
        .route("/import/upload", post(asset_import::upload_file))
        .route("/import/mapping/guess", post(asset_import::guess_mapping))
        .route("/import/mapping/validate", post(asset_import::validate_mapping))
        .route("/import/validate", post(asset_import::validate_rows))
        .route("/validate", post(asset_import::validate_assets))
}

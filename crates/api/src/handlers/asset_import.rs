//! Handlers for asset hierarchy import.
//!
//! The import screen drives these in order: upload a file (or send rows it
//! already parsed), confirm the column mapping, then read the validation
//! report. Nothing is persisted; every call recomputes from its input.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use safetrack_core::hierarchy::fields::{standard_field_defs, AssetFieldDef};
use safetrack_core::hierarchy::mapping::{self, AssetColumnMappings, MappingCheck};
use safetrack_core::hierarchy::normalizer::{normalize_rows, CellDefault, DroppedRow, ParsedAsset};
use safetrack_core::hierarchy::validator::{validate_with_policy, ValidationResult};
use safetrack_core::tabular::{parse_table, RawTable, TableError};

use crate::config::ImportConfig;
use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Data rows echoed back in an upload preview.
const PREVIEW_ROW_LIMIT: usize = 20;

/// Normalised assets plus everything the validator found.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub assets: Vec<ParsedAsset>,
    pub dropped: Vec<DroppedRow>,
    pub defaults: Vec<CellDefault>,
    pub validation: ValidationResult,
}

/// Response for the file upload endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadPreview {
    pub file_name: String,
    pub headers: Vec<String>,
    pub row_count: usize,
    /// First rows of the file, for the mapping screen.
    pub sample_rows: Vec<Vec<String>>,
    pub mapping: AssetColumnMappings,
    pub mapping_check: MappingCheck,
    /// Present once the mapping covers every required field.
    pub report: Option<ImportReport>,
}

/// GET /api/v1/assets/import/fields
pub async fn list_fields() -> Json<DataResponse<Vec<AssetFieldDef>>> {
    Json(DataResponse {
        data: standard_field_defs(),
    })
}

// ── Upload ───────────────────────────────────────────────────────────

/// POST /api/v1/assets/import/upload
///
/// Multipart parts:
/// - `file` (required): CSV/TSV bytes.
/// - `mapping` (optional): JSON object of field key to header. Guessed from
///   the header row when absent.
///
/// Returns the header row, a sample of rows, the mapping in effect and, if
/// that mapping is complete, the full import report.
pub async fn upload_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<UploadPreview>>> {
    let mut file_data: Option<(String, Vec<u8>)> = None;
    let mut mapping: Option<AssetColumnMappings> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.csv").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file_data = Some((filename, data.to_vec()));
            }
            "mapping" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("Invalid 'mapping' field: {e}")))?;
                mapping = Some(parsed);
            }
            _ => {} // ignore unknown fields
        }
    }

    let (file_name, data) =
        file_data.ok_or_else(|| AppError::BadRequest("Missing required 'file' field".into()))?;

    let import = &state.config.import;
    let table = parse_table(&data, &import.table_options(&file_name))?;
    tracing::info!(
        file_name = %file_name,
        bytes = data.len(),
        columns = table.headers.len(),
        rows = table.row_count(),
        "Parsed import file"
    );

    let mapping = mapping.unwrap_or_else(|| mapping::guess_mapping(&table.headers));
    let mapping_check = mapping::validate_mapping(&mapping, &standard_field_defs());

    let report = if mapping_check.valid {
        Some(run_import(import, &table, &mapping)?)
    } else {
        tracing::debug!(missing = ?mapping_check.missing, "Mapping incomplete, skipping validation");
        None
    };

    Ok(Json(DataResponse {
        data: UploadPreview {
            file_name,
            sample_rows: table.rows.iter().take(PREVIEW_ROW_LIMIT).cloned().collect(),
            row_count: table.row_count(),
            headers: table.headers,
            mapping,
            mapping_check,
            report,
        },
    }))
}

// ── Mapping ──────────────────────────────────────────────────────────

/// Request body for the mapping guess endpoint.
#[derive(Debug, Deserialize)]
pub struct GuessMappingRequest {
    pub headers: Vec<String>,
}

/// A proposed mapping and whether it is already complete.
#[derive(Debug, Serialize)]
pub struct MappingGuess {
    pub mapping: AssetColumnMappings,
    pub check: MappingCheck,
}

/// POST /api/v1/assets/import/mapping/guess
pub async fn guess_mapping(
    Json(input): Json<GuessMappingRequest>,
) -> Json<DataResponse<MappingGuess>> {
    let mapping = mapping::guess_mapping(&input.headers);
    let check = mapping::validate_mapping(&mapping, &standard_field_defs());
    Json(DataResponse {
        data: MappingGuess { mapping, check },
    })
}

/// Request body for the mapping check endpoint.
#[derive(Debug, Deserialize)]
pub struct ValidateMappingRequest {
    pub mapping: AssetColumnMappings,
}

/// POST /api/v1/assets/import/mapping/validate
///
/// An incomplete mapping is a normal answer (`valid: false`), not an error.
pub async fn validate_mapping(
    Json(input): Json<ValidateMappingRequest>,
) -> Json<DataResponse<MappingCheck>> {
    Json(DataResponse {
        data: mapping::validate_mapping(&input.mapping, &standard_field_defs()),
    })
}

// ── Validation ───────────────────────────────────────────────────────

/// Request body for validating rows the client already parsed.
#[derive(Debug, Deserialize)]
pub struct ValidateRowsRequest {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub mapping: AssetColumnMappings,
}

/// POST /api/v1/assets/import/validate
///
/// Normalise `rows` with a confirmed mapping and validate the result.
/// Rejects mappings that do not cover every required field.
pub async fn validate_rows(
    State(state): State<AppState>,
    Json(input): Json<ValidateRowsRequest>,
) -> AppResult<Json<DataResponse<ImportReport>>> {
    let import = &state.config.import;
    ensure_row_limit(input.rows.len(), import.max_rows)?;

    let check = mapping::validate_mapping(&input.mapping, &standard_field_defs());
    if !check.valid {
        let missing: Vec<String> = check.missing.iter().map(|f| f.to_string()).collect();
        return Err(AppError::BadRequest(format!(
            "Mapping is missing required fields: {}",
            missing.join(", ")
        )));
    }

    let table = RawTable {
        headers: input.headers,
        rows: input.rows,
    };
    let report = run_import(import, &table, &input.mapping)?;

    Ok(Json(DataResponse { data: report }))
}

/// Request body for validating normalised assets.
#[derive(Debug, Deserialize)]
pub struct ValidateAssetsRequest {
    pub assets: Vec<ParsedAsset>,
}

/// POST /api/v1/assets/validate
pub async fn validate_assets(
    State(state): State<AppState>,
    Json(input): Json<ValidateAssetsRequest>,
) -> AppResult<Json<DataResponse<ValidationResult>>> {
    let import = &state.config.import;
    ensure_row_limit(input.assets.len(), import.max_rows)?;

    let result = validate_with_policy(&input.assets, &import.policy());
    log_validation(&result);

    Ok(Json(DataResponse { data: result }))
}

// ── Helpers ──────────────────────────────────────────────────────────

fn ensure_row_limit(rows: usize, limit: usize) -> AppResult<()> {
    if rows > limit {
        return Err(TableError::TooManyRows { limit }.into());
    }
    Ok(())
}

/// Normalise `table` through `mapping` and validate the surviving assets.
fn run_import(
    import: &ImportConfig,
    table: &RawTable,
    mapping: &AssetColumnMappings,
) -> AppResult<ImportReport> {
    let outcome = normalize_rows(table, mapping, &import.normalize_options())?;
    tracing::info!(
        assets = outcome.assets.len(),
        dropped = outcome.dropped_count(),
        defaulted_cells = outcome.defaults.len(),
        "Normalised import rows"
    );

    let validation = validate_with_policy(&outcome.assets, &import.policy());
    log_validation(&validation);

    Ok(ImportReport {
        assets: outcome.assets,
        dropped: outcome.dropped,
        defaults: outcome.defaults,
        validation,
    })
}

fn log_validation(result: &ValidationResult) {
    tracing::info!(
        rows = result.summary.row_count,
        duplicates = result.duplicates.len(),
        orphan_groups = result.orphans.len(),
        cycles = result.cycles.len(),
        missing_names = result.missing_names.len(),
        blocking = result.has_blocking_errors,
        "Validated asset hierarchy"
    );
}

//! Row normalisation: raw table rows plus a confirmed mapping become
//! [`ParsedAsset`] records.
//!
//! Counter fields are lossy-but-permissive: an unreadable value becomes `0`
//! and the substitution is recorded in [`NormalizeOutcome::defaults`]. Rows
//! without an id (or without a name, unless the caller opts in) cannot be
//! addressed later and are dropped, each one listed in
//! [`NormalizeOutcome::dropped`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::cell::{parse_count, parse_identity, parse_parent, CellParse, DefaultReason, DropReason};
use super::fields::{standard_field_defs, AssetField};
use super::mapping::AssetColumnMappings;
use super::ImportError;
use crate::tabular::RawTable;

/// One asset row after column mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedAsset {
    pub id: String,
    pub name: String,
    /// Parent asset id; `None` marks a root.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fmea: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actions: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub criticality_assessment: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspection_points: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Zero-based data-row index in the source file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_row: Option<usize>,
}

impl ParsedAsset {
    /// A bare asset with only identity and parent set.
    pub fn new(id: impl Into<String>, name: impl Into<String>, parent: Option<&str>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent: parent.map(str::to_string),
            level: None,
            fmea: None,
            actions: None,
            criticality_assessment: None,
            inspection_points: None,
            description: None,
            source_row: None,
        }
    }

    /// Parent id, treating a blank reference as a root.
    pub fn parent_id(&self) -> Option<&str> {
        self.parent.as_deref().filter(|p| !p.trim().is_empty())
    }
}

/// Options for [`normalize_rows`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NormalizeOptions {
    /// Keep rows with a blank name (as an empty `name`) so the validator
    /// reports them, instead of dropping them here.
    pub keep_unnamed: bool,
}

/// A source row that did not become an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DroppedRow {
    pub row_index: usize,
    pub field: AssetField,
    pub reason: DropReason,
}

/// A cell whose value was replaced during normalisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDefault {
    pub row_index: usize,
    pub field: AssetField,
    pub raw: String,
    pub value: i64,
    pub reason: DefaultReason,
}

/// Everything [`normalize_rows`] produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizeOutcome {
    pub assets: Vec<ParsedAsset>,
    pub dropped: Vec<DroppedRow>,
    pub defaults: Vec<CellDefault>,
}

impl NormalizeOutcome {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Resolve every mapped field to its column index in `table`.
///
/// Fails if a required field is unmapped or a mapped header is not in the
/// table; both mean the caller skipped mapping validation.
pub fn resolve_columns(
    table: &RawTable,
    mapping: &AssetColumnMappings,
) -> Result<BTreeMap<AssetField, usize>, ImportError> {
    if let Some(def) = standard_field_defs()
        .into_iter()
        .find(|def| def.is_required && !mapping.is_mapped(def.field))
    {
        return Err(ImportError::UnmappedField(def.field));
    }

    mapping
        .mapped()
        .map(|(field, header)| {
            table
                .column_index(header)
                .map(|col| (field, col))
                .ok_or_else(|| ImportError::UnknownColumn {
                    field,
                    header: header.to_string(),
                })
        })
        .collect()
}

/// Convert `table` rows into assets using `mapping`.
pub fn normalize_rows(
    table: &RawTable,
    mapping: &AssetColumnMappings,
    options: &NormalizeOptions,
) -> Result<NormalizeOutcome, ImportError> {
    let columns = resolve_columns(table, mapping)?;
    let mut outcome = NormalizeOutcome::default();

    for row in 0..table.row_count() {
        let cell = |field: AssetField| columns.get(&field).map(|&col| table.cell(row, col));

        let Some(id) = parse_identity(cell(AssetField::Id).unwrap_or("")).value() else {
            outcome.dropped.push(DroppedRow {
                row_index: row,
                field: AssetField::Id,
                reason: DropReason::Blank,
            });
            continue;
        };

        let name = match parse_identity(cell(AssetField::Name).unwrap_or("")) {
            CellParse::Dropped(_) if options.keep_unnamed => String::new(),
            CellParse::Dropped(reason) => {
                outcome.dropped.push(DroppedRow {
                    row_index: row,
                    field: AssetField::Name,
                    reason,
                });
                continue;
            }
            parsed => parsed.value().unwrap_or_default(),
        };

        let mut count = |field: AssetField| {
            cell(field).and_then(|raw| read_count(row, field, raw, &mut outcome.defaults))
        };

        let asset = ParsedAsset {
            level: count(AssetField::Level),
            fmea: count(AssetField::Fmea),
            actions: count(AssetField::Actions),
            criticality_assessment: count(AssetField::CriticalityAssessment),
            inspection_points: count(AssetField::InspectionPoints),
            description: cell(AssetField::Description)
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(str::to_string),
            parent: cell(AssetField::Parent).and_then(parse_parent),
            source_row: Some(row),
            ..ParsedAsset::new(id, name, None)
        };
        outcome.assets.push(asset);
    }

    Ok(outcome)
}

/// Blank counter cells stay absent; anything else lossy is recorded.
fn read_count(
    row: usize,
    field: AssetField,
    raw: &str,
    defaults: &mut Vec<CellDefault>,
) -> Option<i64> {
    match parse_count(raw) {
        CellParse::Ok(value) => Some(value),
        CellParse::Defaulted {
            reason: DefaultReason::Blank,
            ..
        } => None,
        CellParse::Defaulted { value, reason } => {
            defaults.push(CellDefault {
                row_index: row,
                field,
                raw: raw.to_string(),
                value,
                reason,
            });
            Some(value)
        }
        CellParse::Dropped(_) => None,
    }
}

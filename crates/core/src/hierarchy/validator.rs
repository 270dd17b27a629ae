//! Structural validation of an asset hierarchy before import.
//!
//! [`validate`] is a pure function over the full row set: it holds no state
//! between calls and every problem it finds is returned as a finding in
//! [`ValidationResult`], never as an error. Each finding carries the ids and
//! row indices the import screen needs to render it on its own.
//!
//! Row indices point into the source file: a row's
//! [`source_row`](ParsedAsset::source_row) when it has one, otherwise its
//! position in the slice. Indices in a report therefore line up with the
//! `rowIndex` of rows the normaliser dropped or defaulted.

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::normalizer::ParsedAsset;
use super::tree::{first_index_by_id, walk_parent_chains};

/// Which findings block the import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationPolicy {
    /// Treat blank names as blocking instead of a warning.
    #[serde(default)]
    pub block_on_missing_names: bool,
}

/// An id carried by more than one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateInfo {
    pub id: String,
    /// Every row carrying the id, ascending.
    pub row_indices: Vec<usize>,
}

/// A row whose parent id is not in the import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanInfo {
    pub row_index: usize,
    pub id: String,
}

/// All rows referencing the same missing parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrphanGroup {
    pub missing_parent_id: String,
    pub children: Vec<OrphanInfo>,
}

/// A loop in the parent relation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleInfo {
    /// Ids in parent-following order, rotated so the smallest id is first.
    pub ids: Vec<String>,
    pub row_indices: Vec<usize>,
}

/// A row with a blank name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingNameInfo {
    pub row_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Counts for the import summary banner.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    pub row_count: usize,
    /// Rows with no parent.
    pub root_count: usize,
    /// Deepest root-to-row distance among rows that reach a root.
    pub max_depth: Option<usize>,
    pub blocking_count: usize,
    pub warning_count: usize,
}

/// Full structural report for one row set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub duplicates: Vec<DuplicateInfo>,
    pub orphans: Vec<OrphanGroup>,
    pub cycles: Vec<CycleInfo>,
    pub missing_names: Vec<MissingNameInfo>,
    /// Rows whose id is blank.
    pub missing_ids: Vec<usize>,
    pub has_blocking_errors: bool,
    pub summary: ValidationSummary,
}

impl ValidationResult {
    /// Flat view of [`orphans`](Self::orphans).
    pub fn orphan_rows(&self) -> impl Iterator<Item = &OrphanInfo> {
        self.orphans.iter().flat_map(|g| g.children.iter())
    }
}

/// Validate with the default policy (blank names warn, do not block).
pub fn validate(rows: &[ParsedAsset]) -> ValidationResult {
    validate_with_policy(rows, &ValidationPolicy::default())
}

pub fn validate_with_policy(rows: &[ParsedAsset], policy: &ValidationPolicy) -> ValidationResult {
    let missing_ids: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.id.trim().is_empty())
        .map(|(i, _)| row_number(rows, i))
        .collect();

    let duplicates = find_duplicates(rows);
    let orphans = find_orphans(rows);

    let walk = walk_parent_chains(rows);
    let mut seen = HashSet::new();
    let cycles: Vec<CycleInfo> = walk
        .cycles
        .iter()
        .map(|loop_rows| normalize_cycle(rows, loop_rows))
        .filter(|cycle| seen.insert(cycle.ids.clone()))
        .collect();

    let missing_names: Vec<MissingNameInfo> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.name.trim().is_empty())
        .map(|(i, row)| MissingNameInfo {
            row_index: row_number(rows, i),
            id: Some(row.id.trim())
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        })
        .collect();

    let mut blocking_count = duplicates.len() + orphans.len() + cycles.len() + missing_ids.len();
    let mut warning_count = 0;
    if policy.block_on_missing_names {
        blocking_count += missing_names.len();
    } else {
        warning_count += missing_names.len();
    }

    ValidationResult {
        summary: ValidationSummary {
            row_count: rows.len(),
            root_count: walk.root_count(),
            max_depth: walk.max_depth(),
            blocking_count,
            warning_count,
        },
        has_blocking_errors: blocking_count > 0,
        duplicates,
        orphans,
        cycles,
        missing_names,
        missing_ids,
    }
}

/// Ids seen on more than one row, in first-occurrence order.
fn find_duplicates(rows: &[ParsedAsset]) -> Vec<DuplicateInfo> {
    let mut order: Vec<&str> = Vec::new();
    let mut indices: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, row) in rows.iter().enumerate() {
        if row.id.trim().is_empty() {
            continue;
        }
        let slot = indices.entry(row.id.as_str()).or_default();
        if slot.is_empty() {
            order.push(row.id.as_str());
        }
        slot.push(row_number(rows, i));
    }

    order
        .into_iter()
        .filter_map(|id| {
            let found = indices.remove(id)?;
            (found.len() > 1).then(|| DuplicateInfo {
                id: id.to_string(),
                row_indices: found,
            })
        })
        .collect()
}

/// Rows whose parent id is unknown, grouped by that id in first-seen order.
fn find_orphans(rows: &[ParsedAsset]) -> Vec<OrphanGroup> {
    let known = first_index_by_id(rows);
    let mut groups: Vec<OrphanGroup> = Vec::new();
    let mut group_of: HashMap<&str, usize> = HashMap::new();

    for (i, row) in rows.iter().enumerate() {
        let Some(parent) = row.parent_id() else {
            continue;
        };
        if known.contains_key(parent) {
            continue;
        }
        let slot = *group_of.entry(parent).or_insert_with(|| {
            groups.push(OrphanGroup {
                missing_parent_id: parent.to_string(),
                children: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].children.push(OrphanInfo {
            row_index: row_number(rows, i),
            id: row.id.clone(),
        });
    }

    groups
}

/// Rotate a loop so its lexicographically smallest id leads.
fn normalize_cycle(rows: &[ParsedAsset], loop_rows: &[usize]) -> CycleInfo {
    let start = loop_rows
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| rows[**a].id.cmp(&rows[**b].id))
        .map(|(pos, _)| pos)
        .unwrap_or(0);

    let rotated: Vec<usize> = loop_rows[start..]
        .iter()
        .chain(&loop_rows[..start])
        .copied()
        .collect();

    CycleInfo {
        ids: rotated.iter().map(|&i| rows[i].id.clone()).collect(),
        row_indices: rotated.iter().map(|&i| row_number(rows, i)).collect(),
    }
}

/// Source-file row of `rows[i]`.
fn row_number(rows: &[ParsedAsset], i: usize) -> usize {
    rows[i].source_row.unwrap_or(i)
}

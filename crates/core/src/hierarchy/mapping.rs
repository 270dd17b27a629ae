//! Column mapping: which source column feeds which asset field.
//!
//! [`guess_mapping`] proposes a mapping from the header row for the user to
//! confirm; [`validate_mapping`] decides whether a confirmed mapping is
//! complete enough to run the import. An incomplete mapping is an expected
//! state while the user is still editing, so neither function errors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::fields::{normalize_header, AssetField, AssetFieldDef};

/// Header value the mapping form uses for "no column".
pub const NO_COLUMN: &str = "none";

/// Mapping from asset field to source column header.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetColumnMappings(BTreeMap<AssetField, String>);

impl AssetColumnMappings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `header` to `field`, replacing any earlier assignment.
    pub fn set(&mut self, field: AssetField, header: impl Into<String>) {
        self.0.insert(field, header.into());
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, field: AssetField, header: impl Into<String>) -> Self {
        self.set(field, header);
        self
    }

    /// The header `field` is mapped to, ignoring blank and [`NO_COLUMN`]
    /// assignments.
    pub fn column_of(&self, field: AssetField) -> Option<&str> {
        self.0
            .get(&field)
            .map(|h| h.as_str())
            .filter(|h| is_real_column(h))
    }

    pub fn is_mapped(&self, field: AssetField) -> bool {
        self.column_of(field).is_some()
    }

    /// Effective (field, header) pairs in field order.
    pub fn mapped(&self) -> impl Iterator<Item = (AssetField, &str)> + '_ {
        self.0
            .iter()
            .filter(|(_, h)| is_real_column(h))
            .map(|(field, h)| (*field, h.as_str()))
    }
}

fn is_real_column(header: &str) -> bool {
    let trimmed = header.trim();
    !trimmed.is_empty() && !trimmed.eq_ignore_ascii_case(NO_COLUMN)
}

/// Outcome of [`validate_mapping`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingCheck {
    pub valid: bool,
    /// Required fields with no usable column, in definition order.
    pub missing: Vec<AssetField>,
}

/// Check that every required field in `defs` is mapped to a real column.
pub fn validate_mapping(mapping: &AssetColumnMappings, defs: &[AssetFieldDef]) -> MappingCheck {
    let missing: Vec<AssetField> = defs
        .iter()
        .filter(|def| def.is_required && !mapping.is_mapped(def.field))
        .map(|def| def.field)
        .collect();

    MappingCheck {
        valid: missing.is_empty(),
        missing,
    }
}

#[derive(Clone, Copy)]
enum MatchKind {
    Exact,
    /// Synonym appears as a whole-word run inside the header.
    Contains,
}

impl MatchKind {
    fn matches(self, header: &str, synonym: &str) -> bool {
        match self {
            Self::Exact => header == synonym,
            Self::Contains => format!(" {header} ").contains(&format!(" {synonym} ")),
        }
    }
}

/// Propose a mapping from a header row.
///
/// Runs an exact-match pass over all fields, then a whole-word substring
/// pass for fields still unmapped. Each field takes the first unclaimed
/// header matching one of its synonyms; a header feeds at most one field.
/// Fields with no match stay unmapped.
///
/// In the substring pass a header containing synonyms of several fields
/// ("Parent Equipment ID") is only offered to a reference field.
pub fn guess_mapping<S: AsRef<str>>(headers: &[S]) -> AssetColumnMappings {
    let normalized: Vec<String> = headers
        .iter()
        .map(|h| normalize_header(h.as_ref()))
        .collect();
    let ambiguous: Vec<bool> = normalized
        .iter()
        .map(|header| {
            AssetField::ALL
                .into_iter()
                .filter(|f| field_matches(*f, MatchKind::Contains, header))
                .count()
                > 1
        })
        .collect();
    let mut claimed = vec![false; headers.len()];
    let mut mapping = AssetColumnMappings::new();

    for kind in [MatchKind::Exact, MatchKind::Contains] {
        for field in AssetField::ALL {
            if mapping.is_mapped(field) {
                continue;
            }
            let hit = normalized.iter().enumerate().position(|(i, header)| {
                !claimed[i]
                    && !header.is_empty()
                    && field_matches(field, kind, header)
                    && (matches!(kind, MatchKind::Exact) || !ambiguous[i] || field.is_reference())
            });
            if let Some(i) = hit {
                claimed[i] = true;
                mapping.set(field, headers[i].as_ref());
            }
        }
    }

    mapping
}

fn field_matches(field: AssetField, kind: MatchKind, header: &str) -> bool {
    field.synonyms().iter().any(|s| kind.matches(header, s))
}

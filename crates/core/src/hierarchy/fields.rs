//! Semantic fields an imported asset row can carry.
//!
//! This is a compile-time schema: the set of fields is closed and the
//! mapping UI only ever assigns columns to these keys.

use serde::{Deserialize, Serialize};

/// The data type of an asset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Number,
    /// Holds the id of another row in the same import.
    Reference,
}

/// Semantic key of an asset field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetField {
    Id,
    Name,
    Parent,
    Level,
    Fmea,
    Actions,
    CriticalityAssessment,
    InspectionPoints,
    Description,
}

impl AssetField {
    /// Every field, in definition order.
    pub const ALL: [AssetField; 9] = [
        Self::Id,
        Self::Name,
        Self::Parent,
        Self::Level,
        Self::Fmea,
        Self::Actions,
        Self::CriticalityAssessment,
        Self::InspectionPoints,
        Self::Description,
    ];

    /// Stable key, matching the serde representation.
    pub fn key(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Parent => "parent",
            Self::Level => "level",
            Self::Fmea => "fmea",
            Self::Actions => "actions",
            Self::CriticalityAssessment => "criticalityAssessment",
            Self::InspectionPoints => "inspectionPoints",
            Self::Description => "description",
        }
    }

    /// Header spellings recognised when guessing a mapping.
    ///
    /// Entries are already in [`normalize_header`] form.
    pub fn synonyms(self) -> &'static [&'static str] {
        match self {
            Self::Id => &[
                "id",
                "asset id",
                "assetid",
                "asset tag",
                "tag",
                "tag number",
                "asset code",
                "asset number",
            ],
            Self::Name => &["name", "asset name", "assetname", "title", "label"],
            Self::Parent => &[
                "parent",
                "parent id",
                "parentid",
                "parent asset",
                "parent asset id",
                "parent tag",
                "parent code",
            ],
            Self::Level => &["level", "hierarchy level", "depth", "tier"],
            Self::Fmea => &["fmea", "fmeas", "fmea count"],
            Self::Actions => &["actions", "action count", "open actions"],
            Self::CriticalityAssessment => &[
                "criticality assessment",
                "criticalityassessment",
                "criticality",
            ],
            Self::InspectionPoints => &[
                "inspection points",
                "inspectionpoints",
                "inspection point count",
                "inspections",
            ],
            Self::Description => &["description", "desc", "details", "notes"],
        }
    }

    /// Whether values of this field name another asset.
    pub fn is_reference(self) -> bool {
        matches!(self, Self::Parent)
    }

    /// Whether values of this field go through the tolerant integer parser.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Level
                | Self::Fmea
                | Self::Actions
                | Self::CriticalityAssessment
                | Self::InspectionPoints
        )
    }
}

impl std::fmt::Display for AssetField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for AssetField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| format!("Unknown asset field '{s}'"))
    }
}

/// Definition of a single asset field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetFieldDef {
    pub field: AssetField,
    /// Human-readable label for the mapping form.
    pub label: String,
    pub field_type: FieldType,
    /// Whether the import cannot run without this field mapped.
    pub is_required: bool,
}

/// Return the canonical asset field definitions.
pub fn standard_field_defs() -> Vec<AssetFieldDef> {
    AssetField::ALL
        .into_iter()
        .map(|field| {
            let label = match field {
                AssetField::Id => "Asset ID",
                AssetField::Name => "Asset Name",
                AssetField::Parent => "Parent ID",
                AssetField::Level => "Level",
                AssetField::Fmea => "FMEA",
                AssetField::Actions => "Actions",
                AssetField::CriticalityAssessment => "Criticality Assessment",
                AssetField::InspectionPoints => "Inspection Points",
                AssetField::Description => "Description",
            };
            let field_type = match field {
                f if f.is_reference() => FieldType::Reference,
                f if f.is_numeric() => FieldType::Number,
                _ => FieldType::Text,
            };
            AssetFieldDef {
                field,
                label: label.into(),
                field_type,
                is_required: matches!(field, AssetField::Id | AssetField::Name),
            }
        })
        .collect()
}

/// Canonical form of a column header for synonym matching: trimmed,
/// lowercase, `_`/`-` read as spaces, whitespace runs collapsed.
pub fn normalize_header(header: &str) -> String {
    header
        .to_lowercase()
        .replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

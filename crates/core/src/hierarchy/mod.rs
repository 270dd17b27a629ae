//! Asset-hierarchy import: column mapping, row normalisation and
//! structural validation.
//!
//! The pipeline runs on data the API layer has already read into memory:
//!
//! ```text
//! RawTable ──guess_mapping──▶ AssetColumnMappings (user confirms)
//!     │                              │
//!     └────────normalize_rows────────┘
//!                   │
//!            Vec<ParsedAsset> ──validate──▶ ValidationResult
//! ```
//!
//! Data-quality problems (duplicates, orphans, cycles, blank names) are
//! reported as findings, never as errors. [`ImportError`] is reserved for
//! calls whose inputs break the contract between pipeline steps.

pub mod cell;
pub mod fields;
pub mod mapping;
pub mod normalizer;
pub mod tree;
pub mod validator;

use crate::tabular::TableError;
use fields::AssetField;

/// Import-pipeline error type.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("Required field '{0}' is not mapped to a column")]
    UnmappedField(AssetField),

    #[error("Field '{field}' is mapped to column '{header}', which the file does not contain")]
    UnknownColumn { field: AssetField, header: String },
}

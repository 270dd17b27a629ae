//! Per-cell parsing with an explicit record of every lossy default.

use serde::{Deserialize, Serialize};

/// Why a cell value was replaced with a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultReason {
    /// The cell was empty.
    Blank,
    /// Only a leading integer prefix was usable (`"12 pts"`, `"3.7"`).
    Truncated,
    /// Nothing numeric in the cell.
    Unparsable,
    /// The integer does not fit the target type.
    OutOfRange,
}

/// Why a cell made its whole row unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Blank,
}

/// Result of parsing one cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellParse<T> {
    Ok(T),
    Defaulted { value: T, reason: DefaultReason },
    Dropped(DropReason),
}

impl<T> CellParse<T> {
    /// The usable value, if the row survives.
    pub fn value(self) -> Option<T> {
        match self {
            Self::Ok(value) | Self::Defaulted { value, .. } => Some(value),
            Self::Dropped(_) => None,
        }
    }

    pub fn default_reason(&self) -> Option<DefaultReason> {
        match self {
            Self::Defaulted { reason, .. } => Some(*reason),
            _ => None,
        }
    }
}

/// Tolerant integer parse for counter-style fields.
///
/// Accepts an optional sign followed by digits. A usable leading prefix is
/// kept; anything else falls back to `0`. Never drops the row.
pub fn parse_count(raw: &str) -> CellParse<i64> {
    let text = raw.trim();
    if text.is_empty() {
        return CellParse::Defaulted {
            value: 0,
            reason: DefaultReason::Blank,
        };
    }
    if let Ok(value) = text.parse::<i64>() {
        return CellParse::Ok(value);
    }

    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits == 0 {
        return CellParse::Defaulted {
            value: 0,
            reason: DefaultReason::Unparsable,
        };
    }

    match text[..sign_len + digits].parse::<i64>() {
        Ok(value) => CellParse::Defaulted {
            value,
            reason: DefaultReason::Truncated,
        },
        Err(_) => CellParse::Defaulted {
            value: 0,
            reason: DefaultReason::OutOfRange,
        },
    }
}

/// Parse an identity-bearing cell (`id`, `name`); blank drops the row.
pub fn parse_identity(raw: &str) -> CellParse<String> {
    let text = raw.trim();
    if text.is_empty() {
        CellParse::Dropped(DropReason::Blank)
    } else {
        CellParse::Ok(text.to_string())
    }
}

/// Parse a parent reference; blank means "root".
pub fn parse_parent(raw: &str) -> Option<String> {
    let text = raw.trim();
    (!text.is_empty()).then(|| text.to_string())
}

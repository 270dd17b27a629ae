//! Delimited-text parsing for uploaded import files.
//!
//! Turns raw file bytes into a header row plus data rows of string cells.
//! Quoting, escaped quotes and embedded newlines are handled by the `csv`
//! tokenizer; rows may be shorter or longer than the header.

use serde::{Deserialize, Serialize};

/// Default cap on data rows accepted from a single file.
pub const DEFAULT_MAX_ROWS: usize = 10_000;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Errors raised while turning file bytes into a [`RawTable`].
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("File contains no header row")]
    EmptyTable,

    #[error("Malformed file at line {line}: {message}")]
    Malformed { line: u64, message: String },

    #[error("File has more than {limit} data rows")]
    TooManyRows { limit: usize },
}

/// Field separator for delimited files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
}

impl Delimiter {
    pub fn as_byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
            Self::Tab => b'\t',
        }
    }

    /// Pick a delimiter from the uploaded file name, if the extension says.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "tsv" | "tab" => Some(Self::Tab),
            "csv" => Some(Self::Comma),
            _ => None,
        }
    }

    /// Guess the delimiter from the first line of the file.
    ///
    /// Counts candidate separators outside quotes; the most frequent wins
    /// and ties fall back to comma.
    pub fn sniff(data: &[u8]) -> Self {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let mut counts = [0usize; 3];
        let mut in_quotes = false;
        for &b in data.iter().take_while(|&&b| b != b'\n') {
            match b {
                b'"' => in_quotes = !in_quotes,
                b',' if !in_quotes => counts[0] += 1,
                b';' if !in_quotes => counts[1] += 1,
                b'\t' if !in_quotes => counts[2] += 1,
                _ => {}
            }
        }
        let best = [Self::Comma, Self::Semicolon, Self::Tab]
            .into_iter()
            .zip(counts)
            .fold((Self::Comma, 0), |acc, (d, n)| if n > acc.1 { (d, n) } else { acc });
        best.0
    }
}

/// Options for [`parse_table`].
#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Explicit delimiter; sniffed from the header line when `None`.
    pub delimiter: Option<Delimiter>,
    pub max_rows: usize,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            max_rows: DEFAULT_MAX_ROWS,
        }
    }
}

/// A header row plus data rows, exactly as read from the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Cell text at (`row`, `col`); missing trailing cells read as `""`.
    pub fn cell(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Position of `header` in the header row (exact match).
    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Parse delimited bytes into a [`RawTable`].
///
/// Cells are trimmed, a leading UTF-8 BOM is ignored and rows whose cells
/// are all blank are skipped.
pub fn parse_table(data: &[u8], options: &TableOptions) -> Result<RawTable, TableError> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    let delimiter = options.delimiter.unwrap_or_else(|| Delimiter::sniff(data));

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .delimiter(delimiter.as_byte())
        .from_reader(data);

    let headers: Vec<String> = reader
        .headers()
        .map_err(malformed)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(TableError::EmptyTable);
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(malformed)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        if rows.len() == options.max_rows {
            return Err(TableError::TooManyRows {
                limit: options.max_rows,
            });
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

fn malformed(err: csv::Error) -> TableError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    TableError::Malformed {
        line,
        message: err.to_string(),
    }
}

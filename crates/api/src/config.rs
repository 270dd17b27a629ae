use safetrack_core::hierarchy::normalizer::NormalizeOptions;
use safetrack_core::hierarchy::validator::ValidationPolicy;
use safetrack_core::tabular::{Delimiter, TableOptions, DEFAULT_MAX_ROWS};

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Largest accepted request body, uploads included (default: 10 MiB).
    pub max_upload_bytes: usize,
    /// Import behaviour (row cap, normaliser and validator switches).
    pub import: ImportConfig,
}

/// Knobs for the asset import pipeline.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Data rows accepted from a single file or request.
    pub max_rows: usize,
    /// Blank names block the import instead of warning.
    pub block_on_missing_names: bool,
    /// Keep blank-name rows so they surface as findings.
    pub keep_unnamed_rows: bool,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            max_rows: DEFAULT_MAX_ROWS,
            block_on_missing_names: false,
            keep_unnamed_rows: false,
        }
    }
}

impl ImportConfig {
    pub fn policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            block_on_missing_names: self.block_on_missing_names,
        }
    }

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            keep_unnamed: self.keep_unnamed_rows,
        }
    }

    /// Table options for an uploaded file; the delimiter comes from the
    /// extension when it names one.
    pub fn table_options(&self, file_name: &str) -> TableOptions {
        TableOptions {
            delimiter: Delimiter::from_file_name(file_name),
            max_rows: self.max_rows,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                         | Default                 |
    /// |---------------------------------|-------------------------|
    /// | `HOST`                          | `0.0.0.0`               |
    /// | `PORT`                          | `3000`                  |
    /// | `CORS_ORIGINS`                  | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`          | `30`                    |
    /// | `MAX_UPLOAD_BYTES`              | `10485760`              |
    /// | `MAX_IMPORT_ROWS`               | `10000`                 |
    /// | `IMPORT_BLOCK_ON_MISSING_NAMES` | `false`                 |
    /// | `IMPORT_KEEP_UNNAMED_ROWS`      | `false`                 |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let max_upload_bytes: usize = std::env::var("MAX_UPLOAD_BYTES")
            .unwrap_or_else(|_| "10485760".into())
            .parse()
            .expect("MAX_UPLOAD_BYTES must be a valid usize");

        let max_rows: usize = std::env::var("MAX_IMPORT_ROWS")
            .unwrap_or_else(|_| DEFAULT_MAX_ROWS.to_string())
            .parse()
            .expect("MAX_IMPORT_ROWS must be a valid usize");

        let block_on_missing_names: bool = std::env::var("IMPORT_BLOCK_ON_MISSING_NAMES")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("IMPORT_BLOCK_ON_MISSING_NAMES must be true or false");

        let keep_unnamed_rows: bool = std::env::var("IMPORT_KEEP_UNNAMED_ROWS")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("IMPORT_KEEP_UNNAMED_ROWS must be true or false");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            max_upload_bytes,
            import: ImportConfig {
                max_rows,
                block_on_missing_names,
                keep_unnamed_rows,
            },
        }
    }
}

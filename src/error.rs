use std::path::PathBuf;
use thiserror::Error;

use crate::validation::ValidationReport;

/// The main error type for periochart operations.
///
/// Only I/O, encoding and malformed companion files are errors. Irregular
/// annotation content is tolerated by the parser and surfaces as diagnostics.
#[derive(Debug, Error)]
pub enum PeriochartError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Annotation input {path} is not valid UTF-8: {source}")]
    InvalidUtf8 {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    #[error("Failed to parse document JSON from {path}: {source}")]
    DocumentJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write document JSON to {path}: {source}")]
    DocumentJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse tooth status sheet {path}: {source}")]
    StatusSheetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("No {kind} file matching '{stem}' under {dir}")]
    CompanionNotFound {
        dir: PathBuf,
        stem: String,
        kind: &'static str,
    },

    #[error("Failed to traverse {path}: {message}")]
    DirectoryWalk { path: PathBuf, message: String },

    #[error("Failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed with {error_count} error(s) and {warning_count} warning(s)")]
    ValidationFailed {
        error_count: usize,
        warning_count: usize,
        report: ValidationReport,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

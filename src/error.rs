use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, MergeError>;

/// Error type covering the different failure cases that can occur while
/// files are decoded, validated against the reference schema, and merged.
///
/// Every variant is terminal for the merge that raised it: no partial output
/// is ever produced alongside an error.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Raised when the merge is invoked without any input file.
    #[error("no input files were supplied")]
    NoInput,

    /// Raised when a file's bytes could not be read as a workbook.
    #[error("failed to decode '{file}': {message}")]
    Decode { file: String, message: String },

    /// Raised when the first file has no detectable header to act as the
    /// reference schema.
    #[error("reference file '{file}' has no detectable header")]
    EmptyReference { file: String },

    /// Raised when a file omits more than the tolerated share of the
    /// reference columns.
    #[error(
        "'{file}' is missing {} of {reference_len} reference columns: {}",
        missing.len(),
        missing.join(", ")
    )]
    SchemaDivergence {
        file: String,
        missing: Vec<String>,
        reference_len: usize,
    },

    /// Errors bubbled up from the Excel writer implementation.
    #[error("failed to encode merged workbook: {0}")]
    Encode(#[from] rust_xlsxwriter::XlsxError),

    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the merge report could not be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl MergeError {
    /// Identifier of the input file responsible for the failure, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            MergeError::Decode { file, .. }
            | MergeError::EmptyReference { file }
            | MergeError::SchemaDivergence { file, .. } => Some(file),
            _ => None,
        }
    }
}
